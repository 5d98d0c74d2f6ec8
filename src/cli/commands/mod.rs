//! Command implementations for boxbreath.
//!
//! Each command returns the text to print; `main` does the printing.

mod completions;
mod config;
mod run;
mod simulate;

pub use completions::completions;
pub use config::config;
pub use run::{run, AudioSettings};
pub use simulate::{simulate, simulate_updates};
