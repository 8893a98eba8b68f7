//! Collection orchestrator: source fan-out, dedup, concurrent downloads.
//!
//! [`collect::Collector`] runs the pipeline; [`dedup`] collapses records
//! into unique artifact references.

pub mod collect;
pub mod dedup;
