pub mod actions;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod logging;
pub mod network;
pub mod package;
pub mod registry;
pub mod test_utils;

pub use error::{OllamactlError, Result};
