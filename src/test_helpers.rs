//! Shared test utilities for the devnotes test suite.
//!
//! Provides in-memory clipboard providers for driving a
//! [`CopyButton`](crate::copy::CopyButton) without touching the real
//! clipboard, plus fixtures for markdown rendering tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let provider = Arc::new(RecordingClipboard::default());
//! let button = CopyButton::new("let a = 1;", CopyOptions::default(), provider.clone());
//! button.activate().await.unwrap();
//! assert_eq!(provider.copied(), vec!["let a = 1;"]);
//! ```

use std::sync::Mutex;

use crate::clipboard::{ClipboardError, ClipboardProvider};
use crate::components::Components;
use crate::config::SiteConfig;

// =========================================================================
// Clipboard providers
// =========================================================================

/// Keeps every successful write in order.
#[derive(Default)]
pub struct RecordingClipboard {
    writes: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    pub fn copied(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

impl ClipboardProvider for RecordingClipboard {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Rejects every write.
pub struct FailingClipboard;

impl ClipboardProvider for FailingClipboard {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Write("permission denied".into()))
    }
}

/// Takes a minute per write, then records it like [`RecordingClipboard`].
#[derive(Default)]
pub struct SlowClipboard {
    inner: RecordingClipboard,
}

impl SlowClipboard {
    pub fn copied(&self) -> Vec<String> {
        self.inner.copied()
    }
}

impl ClipboardProvider for SlowClipboard {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        self.inner.write_text(text).await
    }
}

// =========================================================================
// Rendering fixtures
// =========================================================================

/// Components built from the stock config.
pub fn components() -> Components {
    Components::new(&SiteConfig::default()).unwrap()
}

/// A post exercising titles, highlight ranges and external links.
pub const SAMPLE_POST: &str = r#"# Copy to clipboard

Reading the [MDN docs](https://developer.mozilla.org) first.

```js:title=copy.js {2-3}
const copy = async (text) => {
  await navigator.clipboard.writeText(text)
  return true
}
```

```noLineNumbers
$ npm install
```
"#;
