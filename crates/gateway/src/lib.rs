#![deny(unused)]
//! HTTP front end for CropSight.
//!
//! A thin transport layer around the core pipeline: multipart upload in,
//! validated JSON result out. Error kinds map to status codes here and
//! nowhere else.

pub mod server;

pub use server::{GatewayConfig, GatewayServer};
