pub mod api;
pub mod core;
mod error;

pub use error::{AppError, Result};
