/// Weather interpretation for the outdoor-activity index.
///
/// Raw observations come in from `ingest`; this module turns them into
/// something a person can act on.
///
/// Submodules:
/// - `suitability`: scores an observation and produces level, color and advice.

pub mod suitability;
