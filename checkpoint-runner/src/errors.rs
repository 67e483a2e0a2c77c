// Copyright (c) The checkpoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by checkpoint replay.

use crate::config::{COLLECT_BEHAVIOR_ENV, LAP_OUT_ENV};
use crate::runner::CollectBehavior;
use camino::Utf8PathBuf;
use std::io;
use thiserror::Error;

/// An error that occurred while reading a lap file.
///
/// A genuinely missing lap file is not an error (it means this is the first
/// run of the suite), so it never surfaces here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LapReadError {
    /// The lap file exists but could not be read.
    #[error("failed to read lap file at `{path}`")]
    Read {
        /// The location that could not be read.
        path: Utf8PathBuf,
        /// The underlying IO error.
        #[source]
        error: io::Error,
    },

    /// The lap file exists but is not a record with `passed` and `failed`
    /// string arrays.
    ///
    /// This is fatal: disposition decisions must not be made from corrupt or
    /// partial history.
    #[error("malformed lap file at `{path}`")]
    Malformed {
        /// The location holding the malformed record.
        path: Utf8PathBuf,
        /// The underlying deserialization error.
        #[source]
        error: serde_json::Error,
    },
}

/// An error that occurred while writing a lap file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LapWriteError {
    /// The lap file's parent directory could not be created.
    #[error("failed to create lap directory `{path}`")]
    CreateDir {
        /// The directory that could not be created.
        path: Utf8PathBuf,
        /// The underlying IO error.
        #[source]
        error: io::Error,
    },

    /// The lap could not be serialized.
    #[error("failed to serialize lap")]
    Serialize {
        /// The underlying serialization error.
        #[source]
        error: serde_json::Error,
    },

    /// The lap file could not be written.
    #[error("failed to write lap file to `{path}`")]
    Write {
        /// The location that could not be written.
        path: Utf8PathBuf,
        /// The underlying IO error.
        #[source]
        error: io::Error,
    },
}

/// Error returned while parsing a [`CollectBehavior`] value from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized value for collect behavior: {input}\n(known values: {})",
    CollectBehavior::variants().join(", "),
)]
pub struct CollectBehaviorParseError {
    input: String,
}

impl CollectBehaviorParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// An error that occurred while assembling the checkpoint configuration from
/// the host environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The required lap location is not set.
    #[error("`{LAP_OUT_ENV}` is not set to a usable path")]
    LapOutNotSet,

    /// The collect behavior value is unrecognized.
    #[error("invalid `{COLLECT_BEHAVIOR_ENV}` value")]
    CollectBehavior(#[source] CollectBehaviorParseError),
}
