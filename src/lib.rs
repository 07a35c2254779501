//! Workspace facade crate.
//!
//! This crate exposes the feature flags that map to the individual workspace
//! crates. Host applications can depend on `soundsource-workspace`, enable
//! `decoder-mp3`, and reach the decode engine through this re-export without
//! wiring `core-decode` themselves.

#[cfg(feature = "decoder-mp3")]
pub use core_decode as decode;
