//! Compiles canonical data into a Rust test suite.
//!
//! The suite is one stub helper per property followed by one test function
//! per leaf case. Everything is rendered into memory, so a failure part way
//! through leaves nothing half-written.

pub mod emit;
pub mod item_name;
pub mod literal;
pub mod properties;

use thiserror::Error;
use tracing::debug;

use crate::api::types::CanonicalData;
use emit::Emitter;
use literal::MapStyle;
use properties::PropertyIndex;

pub const GENERATOR_URL: &str = "https://github.com/exercism/rust/tree/master/util/exercise";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// A case description had nothing left after sanitizing.
    #[error("could not produce an item name from description {description:?}")]
    EmptyItemName { description: String },
}

/// Stubs and tests for every case in `data`, ready to append to a test file.
pub fn generate_suite(data: &CanonicalData, map_style: MapStyle) -> Result<String, GenerateError> {
    let index = PropertyIndex::build(&data.cases);

    let mut emitter = Emitter::new(map_style);
    for property in index.properties() {
        emitter.emit_stub(property, index.shapes(property));
    }
    emitter.walk(&data.cases)?;

    debug!(
        properties = index.properties().count(),
        tests = emitter.tests_emitted(),
        "generated test suite"
    );
    Ok(emitter.finish())
}

/// Module docs placed at the top of a generated test file.
pub fn suite_header(exercise: &str, data: &CanonicalData, canonical_data_url: &str) -> String {
    let mut header = String::new();
    header.push_str(&format!("//! Tests for {exercise}\n"));
    header.push_str("//!\n");
    header.push_str("//! Generated by [utility][utility] using [canonical data][canonical_data]\n");
    header.push_str("//!\n");
    header.push_str(&format!("//! [utility]: {GENERATOR_URL}\n"));
    header.push_str(&format!("//! [canonical_data]: {canonical_data_url}\n"));
    if let Some(comments) = &data.comments {
        header.push_str("//!\n");
        for line in comments.lines() {
            header.push_str(&format!("//! {line}\n"));
        }
    }
    header.push_str("\n\n");
    header
}
