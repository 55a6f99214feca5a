//! CLI utilities for Tabimap tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Distance, duration and count formatting
//! - Progress indicators

#![warn(missing_docs)]

pub mod output;
pub mod progress;
