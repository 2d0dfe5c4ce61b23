//! Relay Core
//!
//! Core types and rendering logic for the Relay HTTP resource.
//!
//! This crate contains:
//! - Protocol types: the JSON documents exchanged with the CI engine
//! - Parameter rendering: placeholder interpolation and file-reference injection
//! - HTTP parameters: the typed request description handed to the client

pub mod error;
pub mod file_ref;
pub mod params;
pub mod protocol;
pub mod pyjson;
pub mod render;
pub mod template;

pub use error::{CoreError, Result};
