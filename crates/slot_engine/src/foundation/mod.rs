//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types
//! - Handles and handle recycling
//! - The dense slot pool every subsystem stores its records in
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod pool;
pub mod logging;
