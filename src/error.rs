//! Error types for section analysis

use thiserror::Error;

/// Main error type for section analysis operations
#[derive(Error, Debug)]
pub enum SectionError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error(
        "No sign change in bracket [{a}, {b}] (f(a) = {fa}, f(b) = {fb})"
    )]
    Bracket { a: f64, b: f64, fa: f64, fb: f64 },

    #[error("Root finding did not converge after {iterations} iterations")]
    Convergence { iterations: usize },

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for section analysis operations
pub type SectionResult<T> = Result<T, SectionError>;
