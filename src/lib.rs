pub mod chunker;
pub mod error;
pub mod ingest;
pub mod retrieval;
pub mod runtime;
pub mod sources;
pub mod types;
