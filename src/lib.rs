pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod hierarchy;
pub mod logging;
pub mod schools;

pub use error::{Error, Result};
