//! Create/edit form for a single track.

mod draft;
mod view;

pub use draft::*;
pub use view::*;
