//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::util::{Error, Result};

/// Shared stop flag, checked by the decoders at every section boundary.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Decodes already past their last section
    /// boundary still complete.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Section-boundary check for decoders with an optional handle.
#[inline]
pub(crate) fn check_cancelled(handle: Option<&CancelHandle>) -> Result<()> {
    match handle {
        Some(h) if h.is_cancelled() => {
            tracing::debug!("decode cancelled at section boundary");
            Err(Error::Cancelled)
        }
        _ => Ok(()),
    }
}
