use std::process::Stdio;

use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, warn};

pub trait ClipboardSink {
    /// Write `text` to the clipboard. Never fails loudly; `false` on failure.
    async fn write(&self, text: &str) -> bool;
}

/// Synchronous last resort when the clipboard is unavailable.
pub trait FallbackSink {
    fn write_sync(&self, text: &str) -> bool;
}

/// Where copied text ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Clipboard,
    Fallback,
    Failed,
}

impl CopyOutcome {
    /// The text reached the user one way or the other.
    pub fn delivered(self) -> bool {
        self != CopyOutcome::Failed
    }
}

/// Try the clipboard first, then the fallback.
pub async fn copy_text<S, F>(sink: &S, fallback: &F, text: &str) -> CopyOutcome
where
    S: ClipboardSink,
    F: FallbackSink,
{
    if sink.write(text).await {
        return CopyOutcome::Clipboard;
    }
    warn!("Clipboard write failed; using fallback");
    if fallback.write_sync(text) {
        CopyOutcome::Fallback
    } else {
        CopyOutcome::Failed
    }
}

type Helper = (&'static str, &'static [&'static str]);

const CLIPBOARD_HELPERS: &[Helper] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("pbcopy", &[]),
];

/// Pipes text into the first clipboard helper that accepts it.
pub struct CommandClipboard {
    programs: &'static [Helper],
}

impl Default for CommandClipboard {
    fn default() -> Self {
        Self {
            programs: CLIPBOARD_HELPERS,
        }
    }
}

impl CommandClipboard {
    async fn pipe_to(program: &str, args: &[&str], text: &str) -> std::io::Result<bool> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }
        Ok(child.wait().await?.success())
    }
}

impl ClipboardSink for CommandClipboard {
    async fn write(&self, text: &str) -> bool {
        for (program, args) in self.programs {
            match Self::pipe_to(program, args, text).await {
                Ok(true) => {
                    debug!(program, bytes = text.len(), "Copied to clipboard");
                    return true;
                }
                Ok(false) => debug!(program, "Clipboard helper exited with failure"),
                Err(err) => debug!(program, "Clipboard helper unavailable: {err}"),
            }
        }
        false
    }
}
