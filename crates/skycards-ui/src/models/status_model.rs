//! Transient status line ("Loading...", errors) that clears itself.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

pub const LOADING: &str = "Loading...";
pub const LOCATION_NOT_FOUND: &str = "Error: Location not found";
pub const DEFAULT_CLEAR_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
struct Slot {
    /// Bumped on every `set`; a pending clear only fires for its own sequence
    seq: u64,
    text: String,
}

/// Cheap to clone; clones share the same line.
#[derive(Debug, Clone)]
pub struct StatusLine {
    slot: Arc<Mutex<Slot>>,
    clear_after: Duration,
}

impl StatusLine {
    pub fn new(clear_after: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            clear_after,
        }
    }

    /// Show `message`. After the clear delay it is removed, unless a newer
    /// message replaced it in the meantime. Must be called inside a tokio
    /// runtime.
    pub fn set(&self, message: impl Into<String>) {
        let seq = {
            let mut slot = self.slot.lock();
            slot.seq += 1;
            slot.text = message.into();
            slot.seq
        };

        let slot = self.slot.clone();
        let delay = self.clear_after;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut slot = slot.lock();
            if slot.seq == seq {
                slot.text.clear();
            }
        });
    }

    pub fn clear(&self) {
        let mut slot = self.slot.lock();
        slot.seq += 1;
        slot.text.clear();
    }

    pub fn text(&self) -> String {
        self.slot.lock().text.clone()
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new(DEFAULT_CLEAR_AFTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn message_clears_after_delay() {
        let status = StatusLine::default();
        status.set(LOADING);
        assert_eq!(status.text(), LOADING);

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(status.text(), LOADING);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(status.text(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn newer_message_survives_older_timer() {
        let status = StatusLine::default();
        status.set(LOADING);

        tokio::time::sleep(Duration::from_secs(3)).await;
        status.set(LOCATION_NOT_FOUND);

        // First timer fires at t=5s and must leave the newer text alone
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(status.text(), LOCATION_NOT_FOUND);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(status.text(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn same_text_set_twice_keeps_full_lifetime() {
        let status = StatusLine::default();
        status.set(LOCATION_NOT_FOUND);
        tokio::time::sleep(Duration::from_secs(4)).await;
        status.set(LOCATION_NOT_FOUND);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(status.text(), LOCATION_NOT_FOUND);
    }

    #[tokio::test]
    async fn clones_share_the_line() {
        let status = StatusLine::default();
        let other = status.clone();
        status.set("hello");
        assert_eq!(other.text(), "hello");
        other.clear();
        assert_eq!(status.text(), "");
    }
}
