// src/output/writer.rs
//! Performs the I/O of an export. Nothing else in the crate writes files.

use super::types::{Delivery, Destination, Export};
use crate::error::AppError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes an export to its destination.
pub fn deliver(export: Export) -> Result<Delivery, AppError> {
    let Export {
        destination,
        content,
    } = export;

    let written = match &destination {
        Destination::File(path) => write_file(path, &content),
        Destination::Stdout => print_to_stdout(&content),
    };

    match written {
        Ok(()) => {
            log::info!("Exported {} bytes to {}", content.len(), destination);
            Ok(Delivery {
                destination,
                bytes_written: content.len(),
            })
        }
        Err(e) => {
            log::error!("Export to {} failed: {}", destination, e);
            Err(AppError::DeliveryFailed {
                failures: vec![format!("{}: {}", destination, e)],
            })
        }
    }
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

fn print_to_stdout(content: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()
}
