pub mod command;
pub mod config;
pub mod gesture;
pub mod hand;
pub mod ingest;
pub mod logging;
pub mod osc;
pub mod protocol;
pub mod shape;
pub mod tracker;
