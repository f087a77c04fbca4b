// src/output/types.rs
//! What an export is and where it goes.

use crate::error::AppError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a harvested document is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A file; parent directories are created on delivery.
    File(PathBuf),
    Stdout,
}

impl Destination {
    /// Pipe mode always writes to stdout; otherwise the output file wins when given.
    pub fn choose(output_file: Option<&Path>, pipe: bool) -> Self {
        match output_file {
            Some(path) if !pipe => Self::File(path.to_path_buf()),
            _ => Self::Stdout,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdout => f.write_str("stdout"),
        }
    }
}

/// A harvested document rendered as pretty JSON, bound to its destination.
#[derive(Debug, Clone)]
pub struct Export {
    pub destination: Destination,
    pub content: String,
}

impl Export {
    pub fn json<T: Serialize + ?Sized>(document: &T, destination: Destination) -> Result<Self, AppError> {
        let mut content = serde_json::to_string_pretty(document)?;
        content.push('\n');
        Ok(Self {
            destination,
            content,
        })
    }
}

/// Outcome of a delivered export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub destination: Destination,
    pub bytes_written: usize,
}
