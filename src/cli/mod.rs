//! CLI module for the survey-query command-line interface.
//!
//! Command handlers load the survey extract once and answer questions
//! against it; `output` renders responses as text or JSON.

mod commands;
mod output;

pub use commands::*;
