//! croprec Core
//!
//! Core types shared across croprec components.
//!
//! This crate provides:
//! - Error types and result handling
//! - Predicted labels
//! - The raw prediction request body and the tabular model input
//! - The explicit input schema that turns one into the other

pub mod error;
pub mod label;
pub mod schema;
pub mod table;

pub use error::{Error, Result};
pub use label::Label;
pub use schema::{FeatureKind, FeatureSpec, InputSchema};
pub use table::{ColumnValues, FeatureTable, PredictionRequest};
