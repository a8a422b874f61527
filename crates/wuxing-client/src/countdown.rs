//! The code-validity countdown shown under the code inputs.
//!
//! A countdown runs in its own Tokio task — a 1 Hz loop that publishes
//! label state through a `watch` channel and listens for cancellation on a
//! `oneshot`. This keeps the timer isolated from the UI: the shell just
//! watches the channel and renders whatever state is current.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// What the countdown label should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    /// Nothing to show — the countdown was stopped and cleared.
    Cleared,
    /// Counting down; render with [`format_remaining`].
    Running { remaining_secs: u32 },
    /// The window closed with no successful verify.
    Expired,
}

/// Formats remaining seconds as `mm:ss` for the label.
pub fn format_remaining(remaining_secs: u32) -> String {
    format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

/// A running countdown.
///
/// Created with [`start`](Self::start); consumed by [`stop`](Self::stop)
/// or by dropping the handle (which aborts the timer task — no orphaned
/// timers either way).
pub struct Countdown {
    state_tx: Arc<watch::Sender<CountdownState>>,
    state_rx: watch::Receiver<CountdownState>,
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Countdown {
    /// Starts a countdown from `total_secs` seconds.
    ///
    /// The published state begins at `Running { total_secs }`, ticks down
    /// once per second, and ends at `Expired` when it reaches zero.
    pub fn start(total_secs: u32) -> Self {
        let (state_tx, state_rx) = watch::channel(CountdownState::Running {
            remaining_secs: total_secs,
        });
        let state_tx = Arc::new(state_tx);
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let tx = Arc::clone(&state_tx);
        let task = tokio::spawn(async move {
            let mut remaining = total_secs;
            loop {
                if remaining == 0 {
                    let _ = tx.send(CountdownState::Expired);
                    tracing::debug!("countdown expired");
                    return;
                }
                tokio::select! {
                    _ = &mut cancel_rx => {
                        tracing::debug!(remaining, "countdown cancelled");
                        return;
                    }
                    _ = sleep(Duration::from_secs(1)) => {
                        remaining -= 1;
                        let _ = tx.send(CountdownState::Running {
                            remaining_secs: remaining,
                        });
                    }
                }
            }
        });

        Self {
            state_tx,
            state_rx,
            cancel: Some(cancel_tx),
            task: Some(task),
        }
    }

    /// The current label state.
    pub fn state(&self) -> CountdownState {
        *self.state_rx.borrow()
    }

    /// A receiver the UI can watch for label changes.
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state_rx.clone()
    }

    /// Stops the countdown and clears the label.
    ///
    /// Deterministic: when this returns, the timer task has exited and the
    /// published state is [`CountdownState::Cleared`] — including when the
    /// countdown had already expired (stopping an expired countdown clears
    /// the "expired" text, matching what the back button does).
    pub async fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            // Fails only if the task already finished; either way the join
            // below settles it.
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        let _ = self.state_tx.send(CountdownState::Cleared);
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        // A dropped handle must not leave a ticking task behind.
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Countdown tests run under Tokio's paused clock
    //! (`start_paused = true`): the timer's sleeps auto-advance whenever
    //! the test awaits, so a 300-second countdown plays out instantly and
    //! deterministically. Ticks are observed through the watch channel
    //! rather than by sleeping alongside the timer.

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_countdown_starts_at_total() {
        let mut countdown = Countdown::start(300);
        assert_eq!(
            countdown.state(),
            CountdownState::Running { remaining_secs: 300 }
        );
        countdown.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_ticks_down_one_second_at_a_time() {
        let mut countdown = Countdown::start(300);
        let mut rx = countdown.subscribe();

        for expected in (297..=299).rev() {
            rx.changed().await.expect("tick");
            assert_eq!(
                *rx.borrow(),
                CountdownState::Running {
                    remaining_secs: expected
                }
            );
        }

        countdown.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_expires_at_zero() {
        let countdown = Countdown::start(3);
        let mut rx = countdown.subscribe();

        loop {
            rx.changed().await.expect("state change");
            match *rx.borrow() {
                CountdownState::Expired => break,
                CountdownState::Running { .. } => continue,
                CountdownState::Cleared => panic!("cleared without stop"),
            }
        }

        assert_eq!(countdown.state(), CountdownState::Expired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_clears_state_and_ends_task() {
        let mut countdown = Countdown::start(300);
        countdown.stop().await;

        assert_eq!(countdown.state(), CountdownState::Cleared);
        assert!(countdown.task.is_none(), "timer task must be joined");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_after_expiry_clears_the_expired_text() {
        let mut countdown = Countdown::start(1);
        let mut rx = countdown.subscribe();
        loop {
            rx.changed().await.expect("state change");
            if *rx.borrow() == CountdownState::Expired {
                break;
            }
        }

        countdown.stop().await;
        assert_eq!(countdown.state(), CountdownState::Cleared);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_twice_is_idempotent() {
        let mut countdown = Countdown::start(300);
        countdown.stop().await;
        countdown.stop().await;
        assert_eq!(countdown.state(), CountdownState::Cleared);
    }

    #[test]
    fn test_format_remaining_mm_ss() {
        assert_eq!(format_remaining(300), "05:00");
        assert_eq!(format_remaining(61), "01:01");
        assert_eq!(format_remaining(9), "00:09");
        assert_eq!(format_remaining(0), "00:00");
    }
}
