//! Error types for OBJ/MTL reading and writing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for OBJ/MTL operations.
pub type ObjResult<T> = Result<T, ObjError>;

/// Errors that can occur while reading, writing or building OBJ/MTL data.
///
/// Line numbers are 1-based and refer to the first physical line of the
/// logical (continuation-joined) line that failed.
#[derive(Debug, Error)]
pub enum ObjError {
    /// A token that should be a number could not be parsed.
    #[error("line {line}: malformed number: {details}")]
    MalformedNumber { line: usize, details: String },

    /// An index is zero, out of range, or an enumerated code is unknown.
    #[error("line {line}: malformed index: {details}")]
    MalformedIndex { line: usize, details: String },

    /// A keyword value (e.g. `-imfchan x`) is not one of the allowed values.
    #[error("line {line}: invalid value: {details}")]
    InvalidEnumValue { line: usize, details: String },

    /// A directive appeared where its context is missing.
    #[error("line {line}: missing context: {details}")]
    MissingContext { line: usize, details: String },

    /// A required field (such as a texture file name) was never given.
    #[error("line {line}: missing required field: {details}")]
    MissingRequiredField { line: usize, details: String },

    /// The input ended while more tokens were required.
    #[error("line {line}: truncated input: {details}")]
    TruncatedInput { line: usize, details: String },

    /// A face was built with inconsistent index arrays.
    #[error("invalid face: {details}")]
    InvalidFace { details: String },

    /// Error reading from or writing to the supplied stream.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Error opening or reading a file.
    #[error("failed to read {path}: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error creating or writing a file.
    #[error("failed to write {path}: {source}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension is not `.obj` or `.mtl`.
    #[error("unsupported file format: {extension:?}")]
    UnsupportedFormat { extension: Option<String> },
}

impl ObjError {
    /// Whether this error describes malformed OBJ/MTL content rather than
    /// an I/O or file-type problem.
    pub fn is_format_error(&self) -> bool {
        !matches!(
            self,
            ObjError::Io { .. }
                | ObjError::IoRead { .. }
                | ObjError::IoWrite { .. }
                | ObjError::UnsupportedFormat { .. }
        )
    }

    /// Line number for format errors, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ObjError::MalformedNumber { line, .. }
            | ObjError::MalformedIndex { line, .. }
            | ObjError::InvalidEnumValue { line, .. }
            | ObjError::MissingContext { line, .. }
            | ObjError::MissingRequiredField { line, .. }
            | ObjError::TruncatedInput { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Replace the line number of a format error.
    ///
    /// Parsers below the line level report line 0; the line-oriented readers
    /// stamp the real number on the way out.
    pub(crate) fn at_line(mut self, at: usize) -> Self {
        match &mut self {
            ObjError::MalformedNumber { line, .. }
            | ObjError::MalformedIndex { line, .. }
            | ObjError::InvalidEnumValue { line, .. }
            | ObjError::MissingContext { line, .. }
            | ObjError::MissingRequiredField { line, .. }
            | ObjError::TruncatedInput { line, .. } => *line = at,
            _ => {}
        }
        self
    }
}
