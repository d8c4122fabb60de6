//! # radiodraft-types
//!
//! Core type definitions for radiodraft.
//!
//! This crate is the foundation of the dependency graph -- every other
//! radiodraft crate depends on it. It contains:
//!
//! - **[`error`]** -- [`RadiodraftError`] and the crate [`Result`] alias
//! - **[`config`]** -- [`Settings`] schema, env overrides, validation
//! - **[`secret`]** -- [`ApiKey`], a redacting key wrapper
//! - **[`study`]** -- [`ImageType`], [`XrayImage`], [`StudyRequest`]
//! - **[`triage`]** -- [`TriageVerdict`] and its enums
//! - **[`report`]** -- [`ModelTier`] and [`PipelineResult`]

pub mod config;
pub mod error;
pub mod report;
pub mod secret;
pub mod study;
pub mod triage;

pub use config::Settings;
pub use error::{RadiodraftError, Result};
pub use report::{ModelTier, PipelineResult};
pub use secret::ApiKey;
pub use study::{ImageType, StudyRequest, XrayImage};
pub use triage::{Complexity, TriageVerdict, Urgency};
