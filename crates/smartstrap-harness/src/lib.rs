//! Test harness for the smartstrap accessory protocol engine.
//!
//! `RecordingTransport` is a [`smartstrap_core::Transport`] test double that
//! records every emitted frame and control call instead of touching real
//! hardware, standing in for the Turmoil-based simulated transport the
//! teacher crate uses for its network protocol — a single synchronous,
//! half-duplex wire needs nothing that elaborate.
//!
//! The `scenario` module replays the concrete scenarios from the engine's
//! test plan (S1–S6) against a `RecordingTransport`, for use by both crates'
//! test suites and the fuzz targets.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod recording_transport;
pub mod scenario;

pub use recording_transport::{EmittedFrame, RecordingTransport};
