//! Interrupt flag shared between the Ctrl+C handler and long-running loops.

use std::sync::atomic::{AtomicBool, Ordering};

static CANCEL: AtomicBool = AtomicBool::new(false);

/// Mark the current run as interrupted.
pub fn request_cancel() {
    CANCEL.store(true, Ordering::SeqCst);
}

/// Whether an interrupt was requested.
pub fn cancelled() -> bool {
    CANCEL.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag_set_once() {
        assert!(!cancelled());
        request_cancel();
        assert!(cancelled());
    }
}
