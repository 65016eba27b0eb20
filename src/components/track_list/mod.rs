//! Paginated, filterable track list: controller state, bulk selection, and the view.

mod bulk_delete;
mod controller;
mod query;
mod selection;
mod view;

pub use bulk_delete::*;
pub use controller::*;
pub use query::*;
pub use selection::*;
pub use view::*;
