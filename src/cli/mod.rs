//! Command-line interface for boxbreath.

pub mod args;
pub mod commands;
