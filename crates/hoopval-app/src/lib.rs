// Application layer: dataset loading, session state and text reports on top
// of `hoopval_core`.

pub mod commands;
pub mod ingest;
pub mod report;
pub mod session;
