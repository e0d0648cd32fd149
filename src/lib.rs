//! mleak: resident memory leak monitor for a single process

pub mod collector;
pub mod config;
pub mod detector;
pub mod error;
pub mod monitor;
pub mod report;
pub mod trend;

pub use error::{MonitorError, Result};
