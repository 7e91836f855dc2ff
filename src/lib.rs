pub mod attendance;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod reports;
pub mod utils;

pub use error::{AttendanceError, Result};
