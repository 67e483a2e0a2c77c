// Copyright (c) The checkpoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Checkpoint replay for test suites.
//!
//! Across runs of one suite, a [`Lap`](lap::Lap) records which cases have
//! terminally passed and which have terminally failed. The next run consults
//! it before executing anything: previously-passed cases are deselected or
//! skipped, failed and never-seen cases run again. Cases marked as expected
//! to fail are recorded as passing when they do fail, even though the host
//! process surfaces that run as a failure.

pub mod config;
pub mod errors;
pub mod lap;
pub mod runner;
pub mod store;
