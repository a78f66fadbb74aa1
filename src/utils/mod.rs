//! Utility modules for common functionality
//!
//! Logging to a file and progress reporting for the command line.

pub mod logger;
pub mod progress;
