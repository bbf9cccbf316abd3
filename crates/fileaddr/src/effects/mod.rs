//! Effects layer: sources, targets, the upload bridge and the parser facade.

mod copier;
mod http;
mod parser;
mod source;
mod target;
mod upload;

pub use copier::{Probe, copy, probe};
pub use parser::Parser;
