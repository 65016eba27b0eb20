//! The components module contains all shared components for our app.

mod actions;
mod app;
mod audio_player;
mod debounce;
mod icons;
mod modals;
#[cfg(test)]
mod test_dom;
mod toast;
mod track_form;
mod track_item;
mod track_list;

pub use app::*;
pub use icons::*;
