//! Error types for palette extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for palette extraction operations
pub type Result<T> = std::result::Result<T, PaletteError>;

/// Everything that can go wrong between raw bytes and a finished palette.
#[derive(Error, Debug)]
pub enum PaletteError {
    /// Input bytes are not a decodable image
    #[error("Unable to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Fetching the image bytes failed (network, DNS or HTTP status)
    #[error("Unable to fetch image from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Too few pixels survived the perceptual filter to form the requested clusters
    #[error("Only {available} pixels passed the brightness/saturation filter, {required} are needed")]
    InsufficientSamples { available: usize, required: usize },

    /// A configuration value is outside its valid range
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: &'static str, value: String },

    /// A configuration file could not be read or parsed
    #[error("Unable to load configuration from {}: {source}", path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Coarse classification of a [`PaletteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Decode,
    Transport,
    InsufficientSamples,
    Configuration,
}

impl PaletteError {
    pub fn transport<E>(url: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Transport {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn invalid(parameter: &'static str, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter,
            value: value.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PaletteError::Decode(_) => ErrorKind::Decode,
            PaletteError::Transport { .. } => ErrorKind::Transport,
            PaletteError::InsufficientSamples { .. } => ErrorKind::InsufficientSamples,
            PaletteError::InvalidParameter { .. } | PaletteError::ConfigLoad { .. } => {
                ErrorKind::Configuration
            }
        }
    }
}
