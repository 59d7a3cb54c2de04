//! Types shared between the PikkuOS kernel crates.

#![cfg_attr(not(test), no_std)]

pub mod error;
pub mod gate;

pub use error::{ControllerError, InitError, TableError};
pub use gate::GateAttributes;
