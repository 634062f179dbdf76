//! Survey question answering.
//!
//! This module provides:
//! - Keyword-rule intent classification for free-text questions
//! - Execution of each intent as a scan over the record store
//! - Term frequency summaries of flyer comments

pub mod classifier;
pub mod executor;
pub mod summarizer;
pub mod types;

pub use classifier::*;
pub use executor::*;
pub use summarizer::*;
pub use types::*;
