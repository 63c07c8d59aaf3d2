// utils/mod.rs

//! # Utilities Module
//!
//! Logging helpers for hosts of the template error model.

pub mod logging;
