//! # smartschool-core
//!
//! Typed records and shared helpers for the Smartschool client.
//!
//! This crate provides the foundational types used by `smartschool-client`:
//! - Entity structs mirroring the portal's JSON and XML payloads
//! - Message box / sort / label enums
//! - Lenient deserializers for the stringly-typed XML dispatcher responses
//! - Text helpers (decimal commas, sizes, filesystem-safe names)
//! - Cross-cutting error types

pub mod de;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod text;

pub use errors::CoreError;
