// src/types/mod.rs
pub mod report;
pub mod response;

pub use report::{AnalysisReport, AtsItem, PredictedRole, Score};
