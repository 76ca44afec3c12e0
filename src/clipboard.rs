//! Clipboard providers.
//!
//! Two ways of putting text on the user's clipboard, chosen by probing the
//! environment at runtime:
//!
//! | Provider | Mechanism | Failure signal |
//! |----------|-----------|----------------|
//! | [`SystemClipboard`] | native clipboard via `arboard` | propagated to the caller |
//! | [`Osc52Clipboard`] | OSC 52 escape written to the terminal | none, treated as success |
//!
//! The terminal never acknowledges an OSC 52 write, so once the sequence has
//! been written the copy counts as done. [`Clipboard::detect`] only fails
//! when neither provider can be used.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Clipboard write failed: {0}")]
    Write(String),
    #[error("No clipboard is available (no system clipboard and stdout is not a terminal)")]
    Unavailable,
}

/// Something that can write text to a clipboard.
///
/// Implementations must be `Send + Sync` so a copy button can share its
/// provider with the task that performs the write.
pub trait ClipboardProvider: Send + Sync {
    /// Short name used in logs and CLI output.
    fn name(&self) -> &'static str;

    /// Write `text` to the clipboard.
    fn write_text(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), ClipboardError>> + Send;
}

/// Native system clipboard.
///
/// Holds the `arboard` handle for its whole lifetime: on X11 and Wayland the
/// copied text is served by this process and disappears once the handle is
/// dropped.
pub struct SystemClipboard {
    inner: Arc<Mutex<arboard::Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Write(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(clipboard)),
        })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn name(&self) -> &'static str {
        "system"
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard = inner
                .lock()
                .map_err(|_| ClipboardError::Write("clipboard lock poisoned".into()))?;
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::Write(e.to_string()))
        })
        .await
        .map_err(|e| ClipboardError::Write(e.to_string()))?
    }
}

/// Legacy selection writer: asks the terminal to set the clipboard.
pub struct Osc52Clipboard<W> {
    out: Mutex<W>,
}

impl Osc52Clipboard<io::Stdout> {
    /// Writer on stdout, or `None` when stdout is not an interactive terminal.
    pub fn stdout() -> Option<Self> {
        let stdout = io::stdout();
        stdout.is_terminal().then(|| Self::new(stdout))
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> ClipboardProvider for Osc52Clipboard<W> {
    fn name(&self) -> &'static str {
        "osc52"
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let sequence = osc52_sequence(text);
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        out.write_all(sequence.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// OSC 52 "set clipboard" sequence: `ESC ] 52 ; c ; <base64> BEL`.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", BASE64.encode(text))
}

/// Provider picked by [`Clipboard::detect`].
pub enum Clipboard {
    System(SystemClipboard),
    Osc52(Osc52Clipboard<io::Stdout>),
}

impl Clipboard {
    /// Probe for the native clipboard, falling back to OSC 52 on a terminal.
    pub fn detect() -> Result<Self, ClipboardError> {
        match SystemClipboard::new() {
            Ok(system) => {
                debug!("using system clipboard");
                return Ok(Self::System(system));
            }
            Err(e) => info!(error = %e, "system clipboard unavailable, trying OSC 52"),
        }
        Osc52Clipboard::stdout()
            .map(Self::Osc52)
            .ok_or(ClipboardError::Unavailable)
    }
}

impl ClipboardProvider for Clipboard {
    fn name(&self) -> &'static str {
        match self {
            Self::System(p) => p.name(),
            Self::Osc52(p) => p.name(),
        }
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        match self {
            Self::System(p) => p.write_text(text).await,
            Self::Osc52(p) => p.write_text(text).await,
        }
    }
}

/// Copy `text` with whichever provider the environment supports.
pub async fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let clipboard = Clipboard::detect()?;
    clipboard.write_text(text).await
}
