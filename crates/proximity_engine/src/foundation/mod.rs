//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and transforms
//! - Clocks for interval gating
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
