//! Copy-to-clipboard button controller.
//!
//! Each code block gets one [`CopyButton`]. Its lifecycle is a small state
//! machine:
//!
//! ```text
//!           activate              write ok              delay elapsed
//!   Idle ────────────▶ Copying ────────────▶ Copied ─────────────────▶ Idle
//!                         │
//!                         ├── write failed ──▶ Idle   (error returned)
//!                         └── future dropped ─▶ Idle
//! ```
//!
//! The button is disabled in every state except `Idle`, so a second
//! activation while a copy is in flight or confirmed is rejected with
//! [`CopyError::Busy`] rather than queued.
//!
//! ## Cancellation and Teardown
//!
//! Dropping an [`CopyButton::activate`] future mid-write (a timeout, a lost
//! `select!` branch) puts the button back to `Idle`.
//!
//! The reset back to `Idle` runs on a spawned tokio task. Dropping the
//! button aborts that task, and the task only holds a weak reference to the
//! button state, so a pending reset can never touch a torn-down button.

use crate::clipboard::{ClipboardError, ClipboardProvider};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Delay before a confirmed copy returns to idle.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(5000);

#[derive(Error, Debug)]
pub enum CopyError {
    #[error("Copy already in progress")]
    Busy,
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyState {
    Idle,
    /// Clipboard write in flight.
    Copying,
    Copied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyEvent {
    Activate,
    WriteSucceeded,
    WriteFailed,
    /// The activation future was dropped before the write finished.
    WriteCancelled,
    ResetElapsed,
}

impl CopyState {
    /// State after `event`, or `None` if the event is not valid here.
    pub fn next(self, event: CopyEvent) -> Option<CopyState> {
        match (self, event) {
            (CopyState::Idle, CopyEvent::Activate) => Some(CopyState::Copying),
            (CopyState::Copying, CopyEvent::WriteSucceeded) => Some(CopyState::Copied),
            (CopyState::Copying, CopyEvent::WriteFailed | CopyEvent::WriteCancelled) => {
                Some(CopyState::Idle)
            }
            (CopyState::Copied, CopyEvent::ResetElapsed) => Some(CopyState::Idle),
            _ => None,
        }
    }

    pub fn is_disabled(self) -> bool {
        self != CopyState::Idle
    }

    /// Visible button caption.
    pub fn caption(self) -> &'static str {
        match self {
            CopyState::Copied => "Copied",
            CopyState::Idle | CopyState::Copying => "Copy",
        }
    }
}

/// Accessible label for a copy button.
///
/// The `"<file>: "` prefix is left out entirely when `file_name` is empty.
pub fn copy_label(file_name: &str, copied: bool) -> String {
    let action = if copied {
        "copied to clipboard"
    } else {
        "copy code to clipboard"
    };
    if file_name.is_empty() {
        action.to_string()
    } else {
        format!("{file_name}: {action}")
    }
}

#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// How long the button stays in `Copied` before resetting.
    pub reset_delay: Duration,
    /// Shown in the accessible label.
    pub file_name: String,
    /// Trim leading/trailing whitespace before copying.
    pub trim: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            reset_delay: DEFAULT_RESET_DELAY,
            file_name: String::new(),
            trim: false,
        }
    }
}

pub struct CopyButton<P> {
    content: String,
    options: CopyOptions,
    provider: Arc<P>,
    state: Arc<watch::Sender<CopyState>>,
    reset_task: Mutex<Option<JoinHandle<()>>>,
}

impl<P: ClipboardProvider + 'static> CopyButton<P> {
    pub fn new(content: impl Into<String>, options: CopyOptions, provider: Arc<P>) -> Self {
        let (state, _) = watch::channel(CopyState::Idle);
        Self {
            content: content.into(),
            options,
            provider,
            state: Arc::new(state),
            reset_task: Mutex::new(None),
        }
    }

    pub fn state(&self) -> CopyState {
        *self.state.borrow()
    }

    pub fn is_disabled(&self) -> bool {
        self.state().is_disabled()
    }

    pub fn label(&self) -> String {
        copy_label(&self.options.file_name, self.state() == CopyState::Copied)
    }

    pub fn caption(&self) -> &'static str {
        self.state().caption()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<CopyState> {
        self.state.subscribe()
    }

    /// Text that an activation puts on the clipboard.
    pub fn copy_text(&self) -> &str {
        if self.options.trim {
            self.content.trim()
        } else {
            &self.content
        }
    }

    /// Copy the content and enter `Copied`.
    ///
    /// Returns once the clipboard write has finished; the reset to `Idle`
    /// happens in the background after the configured delay. On a failed
    /// write the button goes straight back to `Idle` and the error is
    /// returned. Dropping the future mid-write also returns it to `Idle`.
    pub async fn activate(&self) -> Result<(), CopyError> {
        if !transition(&self.state, CopyEvent::Activate) {
            return Err(CopyError::Busy);
        }

        let mut pending = PendingWrite {
            state: &self.state,
            armed: true,
        };
        let written = self.provider.write_text(self.copy_text()).await;
        pending.armed = false;

        if let Err(e) = written {
            warn!(provider = self.provider.name(), error = %e, "clipboard write failed");
            transition(&self.state, CopyEvent::WriteFailed);
            return Err(e.into());
        }

        transition(&self.state, CopyEvent::WriteSucceeded);
        debug!(
            provider = self.provider.name(),
            bytes = self.copy_text().len(),
            "copied to clipboard"
        );
        self.schedule_reset();
        Ok(())
    }

    fn schedule_reset(&self) {
        let state = Arc::downgrade(&self.state);
        let delay = self.options.reset_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            reset(state);
        });
        let mut slot = match self.reset_task.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }
}

/// Returns a `Copying` button to `Idle` if the write never completes.
struct PendingWrite<'a> {
    state: &'a watch::Sender<CopyState>,
    armed: bool,
}

impl Drop for PendingWrite<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!("copy cancelled during clipboard write");
            transition(self.state, CopyEvent::WriteCancelled);
        }
    }
}

fn reset(state: Weak<watch::Sender<CopyState>>) {
    match state.upgrade() {
        Some(state) => {
            transition(&state, CopyEvent::ResetElapsed);
        }
        None => debug!("copy button torn down before reset, discarding"),
    }
}

/// Apply `event` to the published state. Returns false if it was rejected.
fn transition(state: &watch::Sender<CopyState>, event: CopyEvent) -> bool {
    state.send_if_modified(|current| match current.next(event) {
        Some(next) => {
            *current = next;
            true
        }
        None => false,
    })
}

impl<P> Drop for CopyButton<P> {
    fn drop(&mut self) {
        let slot = match self.reset_task.get_mut() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FailingClipboard, RecordingClipboard, SlowClipboard};

    fn button_with(
        content: &str,
        options: CopyOptions,
    ) -> (CopyButton<RecordingClipboard>, Arc<RecordingClipboard>) {
        let provider = Arc::new(RecordingClipboard::default());
        let button = CopyButton::new(content, options, Arc::clone(&provider));
        (button, provider)
    }

    // =========================================================================
    // State machine
    // =========================================================================

    #[test]
    fn valid_transitions() {
        assert_eq!(
            CopyState::Idle.next(CopyEvent::Activate),
            Some(CopyState::Copying)
        );
        assert_eq!(
            CopyState::Copying.next(CopyEvent::WriteSucceeded),
            Some(CopyState::Copied)
        );
        assert_eq!(
            CopyState::Copying.next(CopyEvent::WriteFailed),
            Some(CopyState::Idle)
        );
        assert_eq!(
            CopyState::Copying.next(CopyEvent::WriteCancelled),
            Some(CopyState::Idle)
        );
        assert_eq!(
            CopyState::Copied.next(CopyEvent::ResetElapsed),
            Some(CopyState::Idle)
        );
    }

    #[test]
    fn rejected_transitions() {
        assert_eq!(CopyState::Copying.next(CopyEvent::Activate), None);
        assert_eq!(CopyState::Copied.next(CopyEvent::Activate), None);
        assert_eq!(CopyState::Idle.next(CopyEvent::ResetElapsed), None);
        assert_eq!(CopyState::Idle.next(CopyEvent::WriteSucceeded), None);
    }

    #[test]
    fn only_idle_is_enabled() {
        assert!(!CopyState::Idle.is_disabled());
        assert!(CopyState::Copying.is_disabled());
        assert!(CopyState::Copied.is_disabled());
    }

    #[test]
    fn captions() {
        assert_eq!(CopyState::Idle.caption(), "Copy");
        assert_eq!(CopyState::Copying.caption(), "Copy");
        assert_eq!(CopyState::Copied.caption(), "Copied");
    }

    // =========================================================================
    // Labels
    // =========================================================================

    #[test]
    fn label_with_file_name() {
        assert_eq!(copy_label("app.js", false), "app.js: copy code to clipboard");
        assert_eq!(copy_label("app.js", true), "app.js: copied to clipboard");
    }

    #[test]
    fn label_without_file_name_has_no_separator() {
        let idle = copy_label("", false);
        let copied = copy_label("", true);
        assert_eq!(idle, "copy code to clipboard");
        assert_eq!(copied, "copied to clipboard");
        assert!(!idle.starts_with(':') && !idle.contains(": "));
        assert!(!copied.starts_with(':') && !copied.contains(": "));
    }

    // =========================================================================
    // Button lifecycle
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn copy_then_reset_after_delay() {
        let options = CopyOptions {
            file_name: "app.js".into(),
            ..CopyOptions::default()
        };
        let (button, provider) = button_with("console.log(1)", options);
        let mut states = button.subscribe();

        assert_eq!(button.label(), "app.js: copy code to clipboard");
        assert!(!button.is_disabled());

        button.activate().await.unwrap();
        assert_eq!(provider.copied(), vec!["console.log(1)".to_string()]);
        assert_eq!(button.state(), CopyState::Copied);
        assert!(button.is_disabled());
        assert!(button.label().contains("copied to clipboard"));

        // Still copied just before the delay elapses
        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert_eq!(button.state(), CopyState::Copied);

        states
            .wait_for(|s| *s == CopyState::Idle)
            .await
            .unwrap();
        assert!(!button.is_disabled());
        assert!(button.label().contains("copy code to clipboard"));
    }

    #[tokio::test(start_paused = true)]
    async fn custom_reset_delay() {
        let options = CopyOptions {
            reset_delay: Duration::from_millis(250),
            ..CopyOptions::default()
        };
        let (button, _) = button_with("x", options);
        let started = tokio::time::Instant::now();
        button.activate().await.unwrap();
        button
            .subscribe()
            .wait_for(|s| *s == CopyState::Idle)
            .await
            .unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(250), "{elapsed:?}");
        assert!(elapsed < DEFAULT_RESET_DELAY, "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn activation_while_copied_is_rejected() {
        let (button, provider) = button_with("x", CopyOptions::default());
        button.activate().await.unwrap();
        let second = button.activate().await;
        assert!(matches!(second, Err(CopyError::Busy)));
        assert_eq!(provider.copied().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn can_copy_again_after_reset() {
        let (button, provider) = button_with("x", CopyOptions::default());
        button.activate().await.unwrap();
        button
            .subscribe()
            .wait_for(|s| *s == CopyState::Idle)
            .await
            .unwrap();
        button.activate().await.unwrap();
        assert_eq!(provider.copied().len(), 2);
    }

    #[tokio::test]
    async fn trim_option_trims_copied_text() {
        let options = CopyOptions {
            trim: true,
            ..CopyOptions::default()
        };
        let (button, provider) = button_with("\n  fn main() {}\n\n", options);
        button.activate().await.unwrap();
        assert_eq!(provider.copied(), vec!["fn main() {}".to_string()]);
    }

    #[tokio::test]
    async fn untrimmed_by_default() {
        let (button, provider) = button_with("  x\n", CopyOptions::default());
        button.activate().await.unwrap();
        assert_eq!(provider.copied(), vec!["  x\n".to_string()]);
    }

    #[tokio::test]
    async fn failed_write_returns_to_idle() {
        let button = CopyButton::new("x", CopyOptions::default(), Arc::new(FailingClipboard));
        let result = button.activate().await;
        assert!(matches!(result, Err(CopyError::Clipboard(_))));
        assert_eq!(button.state(), CopyState::Idle);
        assert!(!button.is_disabled());
        assert_eq!(button.label(), "copy code to clipboard");
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_write_returns_to_idle() {
        let provider = Arc::new(SlowClipboard::default());
        let button = CopyButton::new("x", CopyOptions::default(), Arc::clone(&provider));

        let result = tokio::time::timeout(Duration::from_millis(10), button.activate()).await;
        assert!(result.is_err());
        assert_eq!(button.state(), CopyState::Idle);
        assert!(!button.is_disabled());

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(button.state(), CopyState::Idle);
        assert!(provider.copied().is_empty());

        // Usable again once the stuck write is gone
        button.activate().await.unwrap();
        assert_eq!(button.state(), CopyState::Copied);
        assert_eq!(provider.copied(), vec!["x".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_discards_pending_reset() {
        let (button, _) = button_with("x", CopyOptions::default());
        let mut states = button.subscribe();
        button.activate().await.unwrap();
        let _ = states.borrow_and_update();
        let reset_task = button
            .reset_task
            .lock()
            .unwrap()
            .as_ref()
            .map(|handle| handle.abort_handle())
            .unwrap();
        assert!(!reset_task.is_finished());
        drop(button);

        tokio::time::sleep(DEFAULT_RESET_DELAY * 2).await;
        assert!(reset_task.is_finished());
        // The sender is gone and no reset was published after teardown
        assert!(!states.has_changed().unwrap_or(false));
        assert_eq!(*states.borrow(), CopyState::Copied);
    }

    #[test]
    fn reset_on_dropped_state_is_a_no_op() {
        let (sender, receiver) = watch::channel(CopyState::Copied);
        let state = Arc::new(sender);
        let weak = Arc::downgrade(&state);
        drop(state);
        reset(weak);
        assert_eq!(*receiver.borrow(), CopyState::Copied);
    }
}
