//! Subcommand implementations.

pub mod classify;
pub mod exif;
pub mod nearest;
pub mod rank;
pub mod trips;
