//! Typed access to the remote track and genre service.

mod client;
mod error;
mod models;
mod upload;

pub use client::*;
pub use error::*;
pub use models::*;
pub use upload::*;
