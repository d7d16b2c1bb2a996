//! prose_miner extracts named entities from manuscript text and resolves
//! them into deduplicated, typed, alias-aware records ready for author
//! review. Raw tagger spans flow through a fixed pipeline: span cleaning,
//! aggregation, alias resolution, type classification, and a confidence
//! partition into confident and review buckets.

pub mod config;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod pipeline;
pub mod tagger;

pub use error::{MinerError, Result};
pub use pipeline::ExtractionPipeline;
