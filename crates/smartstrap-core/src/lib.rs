//! Frame assembler, profile dispatcher, link manager, and public façade for
//! the smartstrap accessory protocol engine.
//!
//! `no_std`, no allocation. The engine owns no heap buffer: the payload
//! buffer is supplied by the integrator at [`Engine::prepare_for_read`] and
//! every byte the engine writes goes through a borrowed slice or the
//! [`Transport`] trait.

#![no_std]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

#[cfg(test)]
extern crate std;

pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod frame_assembler;
pub mod link_manager;
pub mod transport;
mod wire;

pub use engine::Engine;
pub use error::WriteError;
pub use link_manager::{BAUD_TABLE, DEFAULT_BAUD, INACTIVITY_TIMEOUT_MS, LinkManager};
pub use transport::Transport;
