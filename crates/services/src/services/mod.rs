pub mod auth;
pub mod color;
pub mod config;
pub mod ingest;
pub mod metadata;
pub mod storage;
