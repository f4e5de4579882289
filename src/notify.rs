// Notification capability - transient, auto-dismissing user messages
//
// The visual toast is an external concern; what the engine owns is the
// capability: fire a message with a dismiss timeout, never fail, never
// return anything. Messages land in a bounded in-memory rack (ring buffer)
// so the driver can show them, and are mirrored to the log.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Maximum number of toasts kept in memory
const MAX_TOASTS: usize = 32;

/// Fire-and-forget notification sink
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, timeout: Duration);
}

/// One emitted notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub at: DateTime<Utc>,
    pub message: String,
    /// How long the toast stays visible before auto-dismissing
    pub timeout: Duration,
}

/// Bounded in-memory toast store. Cloning shares the same rack.
#[derive(Clone, Default)]
pub struct ToastRack {
    entries: Arc<Mutex<VecDeque<Toast>>>,
}

impl ToastRack {
    pub fn new() -> Self {
        Self::default()
    }

    /// All toasts emitted so far, oldest first
    pub fn recent(&self) -> Vec<Toast> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }
}

impl Notifier for ToastRack {
    fn notify(&self, message: &str, timeout: Duration) {
        tracing::info!(timeout_ms = timeout.as_millis() as u64, "toast: {message}");
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= MAX_TOASTS {
            entries.pop_front();
        }
        entries.push_back(Toast {
            at: Utc::now(),
            message: message.to_string(),
            timeout,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_are_recorded_in_order() {
        let rack = ToastRack::new();
        rack.notify("primeiro", Duration::from_millis(3000));
        rack.notify("segundo", Duration::from_millis(3000));
        let toasts = rack.recent();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].message, "primeiro");
        assert_eq!(toasts[1].message, "segundo");
    }

    #[test]
    fn test_rack_is_bounded() {
        let rack = ToastRack::new();
        for i in 0..(MAX_TOASTS + 5) {
            rack.notify(&format!("t{i}"), Duration::from_millis(100));
        }
        let toasts = rack.recent();
        assert_eq!(toasts.len(), MAX_TOASTS);
        assert_eq!(toasts[0].message, "t5");
    }

    #[test]
    fn test_clones_share_the_rack() {
        let rack = ToastRack::new();
        let clone = rack.clone();
        clone.notify("compartilhado", Duration::from_millis(100));
        assert_eq!(rack.recent().len(), 1);
    }
}
