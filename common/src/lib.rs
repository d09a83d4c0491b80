//! Types shared by every `jumpr` crate.
//!
//! Nothing in here performs IO: the configuration is read from an injectable
//! lookup, and the network types are plain values that the probe engine and
//! the renderer pass between each other.

pub mod config;
pub mod network;
pub mod utils;
