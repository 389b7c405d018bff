//! # clipr - Clipboard sinks for terminal applications
//!
//! A small clipboard layer that lets an application hand text to the system
//! clipboard without caring which backend is active.
//!
//! ## Key Features
//! - `ClipboardSink` trait for any text destination
//! - `SystemClipboard` backed by `arboard`, connected lazily
//! - `MemoryClipboard` for headless sessions and tests
//! - Bounded history of copied entries

pub mod clipboard;
pub mod config;
pub mod error;

// Re-export main types for easy use
pub use clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard, sink_from_config};
pub use config::{ClipboardBackend, ClipboardConfig};
pub use error::{ClipError, ClipResult};
