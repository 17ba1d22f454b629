//! Output directory handling.
//!
//! Data files are named `LoadCellData_<N>.csv`. Each run writes to
//! `1 + max(N)` over the files already present, or `0` for an empty
//! directory.
//!
//! Two runs writing into the same directory at the same time can both pick
//! the same index and the later write wins. No locking is attempted.

use std::path::{Path, PathBuf};

use lcs_core::error::{LcsError, Result};
use regex::Regex;
use tracing::{debug, warn};

/// File name prefix of every data file.
pub const FILE_PREFIX: &str = "LoadCellData_";

/// File name extension of every data file.
pub const FILE_EXTENSION: &str = "csv";

/// File name for the data file with the given index.
pub fn file_name(index: u64) -> String {
    format!("{FILE_PREFIX}{index}.{FILE_EXTENSION}")
}

/// A pre-existing directory that receives the CSV data files.
#[derive(Debug, Clone)]
pub struct OutputDirectory {
    root: PathBuf,
}

impl OutputDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Fail unless the directory exists.
    pub fn validate(&self) -> Result<()> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(LcsError::OutputDirMissing(self.root.clone()))
        }
    }

    /// Indices of all `LoadCellData_<N>.csv` files directly inside the
    /// directory, sorted ascending.
    ///
    /// Files without the prefix are ignored. A prefixed `.csv` file whose
    /// index is not a non-negative integer makes the next index ambiguous and
    /// is an error.
    pub fn existing_indices(&self) -> Result<Vec<u64>> {
        let re = Regex::new(r"^LoadCellData_(.*)\.csv$").expect("regex is valid");
        let mut indices = Vec::new();

        for entry in walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| LcsError::DirectoryScan {
                path: self.root.clone(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            let Some(caps) = re.captures(&name) else {
                continue;
            };
            match caps[1].parse::<u64>() {
                Ok(index) => indices.push(index),
                Err(_) => {
                    warn!("Cannot extract an index from {}", name);
                    return Err(LcsError::AmbiguousIndex(name.to_string()));
                }
            }
        }

        indices.sort_unstable();
        Ok(indices)
    }

    /// Index the next data file will be written under.
    pub fn next_index(&self) -> Result<u64> {
        let next = match self.existing_indices()?.last() {
            Some(&max) => max
                .checked_add(1)
                .ok_or_else(|| LcsError::AmbiguousIndex(file_name(max)))?,
            None => 0,
        };
        debug!(next, dir = %self.root.display(), "computed next output index");
        Ok(next)
    }

    /// Write `contents` to the next free data file and return its path.
    pub fn write_next(&self, contents: &str) -> Result<PathBuf> {
        let path = self.root.join(file_name(self.next_index()?));
        std::fs::write(&path, contents).map_err(|source| LcsError::FileWrite {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
