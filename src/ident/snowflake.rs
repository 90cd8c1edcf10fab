//! Snowflake-style 64-bit id generation
//!
//! Layout, high to low:
//!
//! ```text
//! | 41 bits: ms since EPOCH | 5 bits: datacenter | 5 bits: machine | 12 bits: sequence |
//! ```
//!
//! Ids are strictly monotonic within a process. Within one millisecond the
//! sequence field increments; on overflow the generator spin-waits for the
//! next millisecond. A wall clock that moves backwards is refused rather
//! than risking duplicate ids.

use crate::error::IdentityError;
use parking_lot::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Generator epoch: 2024-01-01T00:00:00Z in Unix milliseconds.
const EPOCH_MS: u64 = 1_704_067_200_000;

const SEQUENCE_BITS: u32 = 12;
const MACHINE_BITS: u32 = 5;
const DATACENTER_BITS: u32 = 5;

const MACHINE_SHIFT: u32 = SEQUENCE_BITS;
const DATACENTER_SHIFT: u32 = SEQUENCE_BITS + MACHINE_BITS;
const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + MACHINE_BITS + DATACENTER_BITS;

const MAX_SEQUENCE: u64 = (1 << SEQUENCE_BITS) - 1;
const MAX_MACHINE: u16 = (1 << MACHINE_BITS) - 1;
const MAX_DATACENTER: u16 = (1 << DATACENTER_BITS) - 1;

#[derive(Debug)]
struct ClockState {
    last_ms: u64,
    sequence: u64,
}

/// Monotonic 64-bit id generator
#[derive(Debug)]
pub struct Snowflake {
    datacenter: u64,
    machine: u64,
    state: Mutex<ClockState>,
}

impl Snowflake {
    /// Create a generator for the given instance bits.
    ///
    /// Both ids must fit their 5-bit fields, i.e. lie in `[0, 31]`.
    pub fn new(datacenter: u16, machine: u16) -> Result<Self, IdentityError> {
        if datacenter > MAX_DATACENTER {
            return Err(IdentityError::DatacenterOutOfRange(datacenter));
        }
        if machine > MAX_MACHINE {
            return Err(IdentityError::MachineOutOfRange(machine));
        }
        Ok(Self {
            datacenter: u64::from(datacenter),
            machine: u64::from(machine),
            state: Mutex::new(ClockState {
                last_ms: 0,
                sequence: 0,
            }),
        })
    }

    /// Generate the next id.
    ///
    /// Fails with [`IdentityError::ClockBackwards`] when the wall clock has
    /// regressed since the previous id.
    pub fn next_id(&self) -> Result<u64, IdentityError> {
        let mut state = self.state.lock();

        let mut now_ms = current_ms();
        if now_ms < state.last_ms {
            return Err(IdentityError::ClockBackwards {
                last_ms: state.last_ms,
                now_ms,
            });
        }

        if now_ms == state.last_ms {
            state.sequence = (state.sequence + 1) & MAX_SEQUENCE;
            if state.sequence == 0 {
                // Sequence exhausted for this millisecond
                now_ms = wait_next_ms(state.last_ms);
            }
        } else {
            state.sequence = 0;
        }
        state.last_ms = now_ms;

        Ok(((now_ms - EPOCH_MS) << TIMESTAMP_SHIFT)
            | (self.datacenter << DATACENTER_SHIFT)
            | (self.machine << MACHINE_SHIFT)
            | state.sequence)
    }
}

/// Milliseconds since the Unix epoch.
fn current_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Spin until the wall clock advances past `last_ms`.
fn wait_next_ms(last_ms: u64) -> u64 {
    let mut now = current_ms();
    while now <= last_ms {
        std::hint::spin_loop();
        now = current_ms();
    }
    now
}
