//! Outdoor-activity weather index for municipalities.
//!
//! One run reads the municipal boundary dataset, queries current weather at
//! each municipality's centroid, scores how suitable conditions are for
//! being outdoors, and writes a single JSON snapshot for the map display.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod geometry;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod output;
pub mod process;
pub mod regions;
