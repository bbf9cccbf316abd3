//! Core layer: pure classification, matching and option resolution.

pub mod payload;
pub mod registry;
pub mod uri;

pub use payload::{FromPayload, resolve};
pub use registry::SignatureRegistry;
pub use uri::{DataUri, Location, classify};
