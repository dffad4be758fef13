//! Request size limits
//!
//! Values live in fixed-capacity slots; a request that writes (or expects)
//! a value larger than the slot, or that carries more operations than the
//! engine accepts in one batch, is rejected as malformed.
//!
//! The limits also bound the size of a response: every operation may come
//! back carrying a full value, and that worst case must still fit in one
//! frame.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default value slot capacity in bytes
pub const DEFAULT_MAX_VALUE_SIZE: usize = 16;

/// Default cap on operations per transaction
pub const DEFAULT_MAX_OPS_PER_TXN: usize = 64;

/// Hard ceiling imposed by the one-byte op count in the frame header
pub const MAX_OPS_ON_WIRE: usize = u8::MAX as usize;

/// Largest frame body either side will send or accept
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Bytes of message header ahead of the operations
pub const MESSAGE_HEADER_LEN: usize = 11;

/// Bytes of a response operation besides its value:
/// code, key, presence, version and value length
pub const RESPONSE_OP_OVERHEAD: usize = 1 + 4 + 1 + 8 + 2;

/// Limits enforced on every request before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Largest value that may be written or expected, in bytes
    pub max_value_size: usize,
    /// Largest number of operations in one batch
    pub max_ops_per_txn: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
            max_ops_per_txn: DEFAULT_MAX_OPS_PER_TXN,
        }
    }
}

impl Limits {
    /// Check the limits themselves are usable
    ///
    /// # Errors
    ///
    /// `Error::Config` if a limit is zero, the op cap exceeds what a
    /// frame header can count, or a response at both limits would not fit
    /// in one frame.
    pub fn validate(&self) -> Result<()> {
        if self.max_value_size == 0 {
            return Err(Error::Config("max_value_size must be at least 1".to_string()));
        }
        if self.max_value_size > u16::MAX as usize {
            return Err(Error::Config(format!(
                "max_value_size {} exceeds {}",
                self.max_value_size,
                u16::MAX
            )));
        }
        if self.max_ops_per_txn == 0 || self.max_ops_per_txn > MAX_OPS_ON_WIRE {
            return Err(Error::Config(format!(
                "max_ops_per_txn must be within 1..={}, got {}",
                MAX_OPS_ON_WIRE, self.max_ops_per_txn
            )));
        }
        let worst = self.max_response_len();
        if worst > MAX_FRAME_LEN {
            return Err(Error::Config(format!(
                "{} ops of {} bytes need a {} byte response, frames hold at most {}",
                self.max_ops_per_txn, self.max_value_size, worst, MAX_FRAME_LEN
            )));
        }
        Ok(())
    }

    /// Size of the largest response body these limits allow
    pub fn max_response_len(&self) -> usize {
        self.max_ops_per_txn
            .saturating_mul(RESPONSE_OP_OVERHEAD.saturating_add(self.max_value_size))
            .saturating_add(MESSAGE_HEADER_LEN)
    }
}
