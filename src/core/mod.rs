//! Core building blocks shared by the breathing timer and its front ends.

mod duration;
mod scheduler;

pub use duration::{format_duration, format_duration_mmss, from_std, render_progress_bar};
pub use scheduler::{Scheduler, TimerId};
