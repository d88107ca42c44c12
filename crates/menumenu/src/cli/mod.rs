//! Command implementations.

pub mod config;
pub mod scan;
pub mod search;
pub mod serve;
