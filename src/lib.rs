//! Faculty desk core: copy-on-write record stores for each panel, the
//! statistics derived from them, and a JSON-lines sidecar protocol.

pub mod config;
pub mod desk;
pub mod error;
pub mod ipc;
pub mod models;
pub mod sample;
pub mod schedule;
pub mod stats;
pub mod store;
