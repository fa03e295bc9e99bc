//! Error types for ngr-convert

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting an NGR export
#[derive(Error, Debug)]
pub enum NgrConvertError {
    #[error("Failed to read input file: {path}")]
    InputReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML input: {source}")]
    MalformedInput {
        #[source]
        source: roxmltree::Error,
    },

    #[error("CSV generation error: {message}")]
    CsvError { message: String },

    #[error("Failed to write artifact to {path}")]
    ArtifactWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ZIP creation error: {message}")]
    ZipError { message: String },
}

impl From<zip::result::ZipError> for NgrConvertError {
    fn from(err: zip::result::ZipError) -> Self {
        NgrConvertError::ZipError {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for NgrConvertError {
    fn from(err: csv::Error) -> Self {
        NgrConvertError::CsvError {
            message: err.to_string(),
        }
    }
}
