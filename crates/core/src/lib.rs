#![deny(unused)]
//! Core types, traits, and the detection pipeline for CropSight.
//!
//! This crate holds everything the front ends share: the structured result
//! schema, the prompt sent to the vision model, the defensive JSON extractor,
//! the validator that turns an untrusted payload into a guaranteed-shaped
//! result, and the orchestrator that sequences the stages.

pub mod config;
pub mod detector;
pub mod error;
pub mod extract;
pub mod media;
pub mod mocks;
pub mod prompt;
pub mod schema;
pub mod traits;
pub mod validate;

pub use detector::CropDetector;
pub use error::{Error, ExternalServiceKind, Result};
pub use schema::*;
pub use traits::VisionClient;
