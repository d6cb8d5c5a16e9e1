//! Core business logic abstractions

pub mod config;
pub mod estimate;
pub mod form;
pub mod log;
pub mod price;

// Re-export main types for cleaner imports
pub use estimate::{ConversionEstimator, ConversionQuery, ConversionResult, EstimationError};
pub use form::{FormEvent, FormState, SwapForm};
pub use price::{IngestionFailure, PriceBook, PriceObservation, SnapshotProvider};
