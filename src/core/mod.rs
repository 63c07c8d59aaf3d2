// core/mod.rs

//! # Core Module
//!
//! Reporter configuration and the environment variables that override it.

pub mod config;
pub mod env;
