//! Cosmetic timers: heading style rotation and the delayed page
//! indicator refresh. Both stop when the shutdown token fires.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::UiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMessage {
    /// One-shot refresh of the page indicator after startup
    PageIndicatorDue,
}

/// Advance `index` modulo `len` every `period` until cancelled
pub fn spawn_heading_rotation(
    index: Arc<AtomicUsize>,
    len: usize,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let _ = index.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |i| {
                        Some((i + 1) % len.max(1))
                    });
                }
            }
        }
    })
}

/// Send `PageIndicatorDue` once after `delay`
pub fn spawn_page_indicator_refresh(
    tx: &UnboundedSender<UiEvent>,
    delay: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(delay) => {
                let _ = tx.send(UiEvent::Timer(TimerMessage::PageIndicatorDue));
            }
        }
    })
}
