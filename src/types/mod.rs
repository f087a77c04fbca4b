use thiserror::Error;

mod domain_types;
mod ids;

pub use domain_types::*;
pub use ids::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("URL {url} is missing the '{name}' query parameter")]
    MissingParameter { url: String, name: &'static str },

    #[error("Invalid cookie string: {reason}")]
    InvalidCookies { reason: String },

    #[error("Invalid value for {name}: {value}")]
    InvalidOption { name: &'static str, value: String },

    #[error("Invalid delay range: {min_secs}s..={max_secs}s")]
    InvalidDelayRange { min_secs: f64, max_secs: f64 },
}
