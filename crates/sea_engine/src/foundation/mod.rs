//! Foundation module - Core utilities and types
//!
//! - Time management for the fixed-rate update loop
//! - Logging utilities

pub mod time;
pub mod logging;
