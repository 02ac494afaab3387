//! Writing and rendering tables.

mod display;
mod writer;

pub use writer::{OutputFormat, Writer};
