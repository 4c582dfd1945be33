//! Resume ↔ job-description matching: contact lookup, facet scoring, weighting,
//! ranking and export.

pub mod aggregate;
pub mod contact;
pub mod distiller;
pub mod export;
pub mod handlers;
pub mod keywords;
pub mod pipeline;
pub mod prompts;
pub mod ranking;
pub mod scorer;
pub mod weights;
