// Copyright (c) The checkpoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence of a [`Lap`] to its durable location.

use crate::errors::{LapReadError, LapWriteError};
use crate::lap::Lap;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::{Utf8Path, Utf8PathBuf};
use std::{fs, io, io::Write};
use tracing::debug;

/// Reads and writes the lap file for one suite.
#[derive(Clone, Debug)]
pub struct LapStore {
    path: Utf8PathBuf,
}

impl LapStore {
    /// Creates a store for the lap file at `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The durable location of the lap file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Loads the lap recorded by a previous run.
    ///
    /// A missing or empty file means this is the first run of the suite and
    /// produces an empty lap. A file that exists but cannot be read or parsed
    /// is fatal: dispositions must not be decided from partial history.
    pub fn load(&self) -> Result<Lap, LapReadError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!("no lap file at {}, treating as first run", self.path);
                return Ok(Lap::new());
            }
            Err(error) => {
                return Err(LapReadError::Read {
                    path: self.path.clone(),
                    error,
                });
            }
        };

        if contents.trim().is_empty() {
            return Ok(Lap::new());
        }

        let lap: Lap = serde_json::from_str(&contents).map_err(|error| LapReadError::Malformed {
            path: self.path.clone(),
            error,
        })?;
        debug!(
            "loaded lap from {} ({} passed, {} failed)",
            self.path,
            lap.passed().len(),
            lap.failed().len()
        );
        Ok(lap)
    }

    /// Writes `lap` to the durable location, replacing any previous record.
    ///
    /// The write goes through a temporary file and a rename, so a crash
    /// mid-write cannot corrupt a previously valid record.
    pub fn store(&self, lap: &Lap) -> Result<(), LapWriteError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|error| LapWriteError::CreateDir {
                path: parent.to_owned(),
                error,
            })?;
        }

        let contents =
            serde_json::to_string_pretty(lap).map_err(|error| LapWriteError::Serialize { error })?;

        AtomicFile::new(&self.path, OverwriteBehavior::AllowOverwrite)
            .write(|file| file.write_all(contents.as_bytes()))
            .map_err(|error| match error {
                atomicwrites::Error::Internal(error) | atomicwrites::Error::User(error) => {
                    LapWriteError::Write {
                        path: self.path.clone(),
                        error,
                    }
                }
            })?;

        debug!(
            "stored lap at {} ({} passed, {} failed)",
            self.path,
            lap.passed().len(),
            lap.failed().len()
        );
        Ok(())
    }
}
