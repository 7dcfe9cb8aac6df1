//! reportrun CLI library
//!
//! Command implementations for the `reportrun` binary. The binary itself
//! only parses arguments and dispatches here.

pub mod commands;
