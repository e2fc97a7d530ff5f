#![deny(unused)]
//! Vision provider client for CropSight.
//!
//! Implements [`cropsight_core::VisionClient`] against an OpenAI-compatible
//! chat-completions endpoint.

pub mod openai;

pub use openai::OpenAiVisionClient;
