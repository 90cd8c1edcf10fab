//! Identity generation
//!
//! Two kinds of identifiers flow through the node tree:
//! - 64-bit Snowflake-style ids, time-ordered and unique within a process.
//!   One generator instance exists per process; see [`init`] and
//!   [`generator`].
//! - Random 128-bit UUIDs in hyphenated text form, assigned to every node
//!   and doubling as path-safe names for debug dumps.

pub mod snowflake;

pub use snowflake::Snowflake;

use crate::error::IdentityError;
use std::sync::OnceLock;
use uuid::Uuid;

static GENERATOR: OnceLock<Snowflake> = OnceLock::new();

/// Initialize the process-wide id generator with explicit instance bits.
///
/// May be called at most once, before the first [`generator`] access.
pub fn init(datacenter: u16, machine: u16) -> Result<(), IdentityError> {
    let instance = Snowflake::new(datacenter, machine)?;
    GENERATOR
        .set(instance)
        .map_err(|_| IdentityError::AlreadyInitialized)
}

/// The process-wide id generator.
///
/// Falls back to instance `(0, 0)` when [`init`] was never called.
pub fn generator() -> &'static Snowflake {
    GENERATOR.get_or_init(|| Snowflake::new(0, 0).expect("instance (0, 0) is always in range"))
}

/// A fresh random UUID in hyphenated text form.
pub fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}
