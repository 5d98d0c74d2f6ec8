//! boxbreath - a guided box-breathing timer for the terminal
//!
//! This crate provides the breathing state machine, optional background
//! audio that follows it, and the terminal front ends that drive it.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod audio;
pub mod breath;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod output;
pub mod tui;

pub use breath::{BreathSession, SessionSnapshot, SessionUpdate, Stage};
pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::BreathError;
