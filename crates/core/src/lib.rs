//! Domain layer for the Scribe service.
//!
//! Holds everything that does not talk to the network or the database:
//! prompt templates, upload validation and format conversion, the XML
//! helper routines, and summary field validation.

pub mod error;
pub mod ingest;
pub mod prompts;
pub mod summary;
pub mod types;
pub mod xml;
