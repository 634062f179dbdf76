//! Configuration loading for survey-query.

mod settings;

pub use settings::*;
