//! Configuration Module
//!
//! Runtime settings, read once at startup from the process environment.
//!
//! Numeric settings that fail to parse abort startup. Missing Firebase credentials do
//! not: they leave the store unavailable and the server answers 503 until restarted
//! with credentials.

pub mod env;
pub mod types;
