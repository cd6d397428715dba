//! Terminal rendering of assessment snapshots.
//!
//! The streamer hands out cumulative snapshots; the display writes only the
//! part of each snapshot that has not been printed yet.

use std::io::{self, Write};
use std::sync::Mutex;

use indicatif::ProgressBar;

use crate::cli::ui::{StatusPrinter, progress};

/// Event types for streaming callbacks
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Full text received so far
    Snapshot(String),
    /// Stream closed normally
    Complete { chars: usize },
    /// Stream failed after whatever snapshots were already delivered
    Error(String),
}

/// Callback trait for streaming events
pub trait StreamCallback: Send + Sync {
    /// A failed write of the assessment text is returned to the caller.
    fn on_event(&self, event: StreamEvent) -> io::Result<()>;
}

struct OutputState {
    out: Box<dyn Write + Send>,
    printed: usize,
    ends_with_newline: bool,
}

/// Writes new text to stdout as snapshots arrive
pub struct StreamingDisplay {
    printer: StatusPrinter,
    output: Mutex<OutputState>,
    spinner: Mutex<Option<ProgressBar>>,
}

impl StreamingDisplay {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Display that writes the assessment text to `out` instead of stdout.
    pub fn with_writer<W: Write + Send + 'static>(out: W) -> Self {
        Self {
            printer: StatusPrinter::new(),
            output: Mutex::new(OutputState {
                out: Box::new(out),
                printed: 0,
                ends_with_newline: true,
            }),
            spinner: Mutex::new(None),
        }
    }

    /// Show a spinner until the first snapshot arrives.
    pub fn with_spinner(self, message: &str) -> Self {
        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(progress::create_spinner(message));
        }
        self
    }

    fn clear_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn lock_output(&self) -> io::Result<std::sync::MutexGuard<'_, OutputState>> {
        self.output
            .lock()
            .map_err(|_| io::Error::other("output lock poisoned"))
    }

    fn write_snapshot(&self, snapshot: &str) -> io::Result<()> {
        let mut state = self.lock_output()?;
        let Some(new_text) = unprinted_suffix(snapshot, state.printed) else {
            return Ok(());
        };
        if new_text.is_empty() {
            return Ok(());
        }

        state.out.write_all(new_text.as_bytes())?;
        state.out.flush()?;
        state.printed = snapshot.len();
        state.ends_with_newline = new_text.ends_with('\n');
        Ok(())
    }

    fn finish_line(&self) -> io::Result<()> {
        let mut state = self.lock_output()?;
        if !state.ends_with_newline {
            state.out.write_all(b"\n")?;
            state.out.flush()?;
            state.ends_with_newline = true;
        }
        Ok(())
    }
}

impl Default for StreamingDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamCallback for StreamingDisplay {
    fn on_event(&self, event: StreamEvent) -> io::Result<()> {
        self.clear_spinner();
        match event {
            StreamEvent::Snapshot(text) => self.write_snapshot(&text),
            StreamEvent::Complete { chars } => {
                self.finish_line()?;
                self.printer
                    .success("Finished", &format!("{} characters", chars));
                Ok(())
            }
            StreamEvent::Error(err) => {
                let result = self.finish_line();
                self.printer.error("Error", &err);
                result
            }
        }
    }
}

/// The part of `snapshot` after the first `printed` bytes.
///
/// `None` when `printed` does not fall on a character boundary.
fn unprinted_suffix(snapshot: &str, printed: usize) -> Option<&str> {
    snapshot.get(printed..)
}

/// Silent callback that collects events without displaying
pub struct SilentStreamingDisplay {
    events: Mutex<Vec<StreamEvent>>,
}

impl SilentStreamingDisplay {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<StreamEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Snapshots received so far, in order
    pub fn snapshots(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                StreamEvent::Snapshot(text) => Some(text),
                _ => None,
            })
            .collect()
    }
}

impl Default for SilentStreamingDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamCallback for SilentStreamingDisplay {
    fn on_event(&self, event: StreamEvent) -> io::Result<()> {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
        Ok(())
    }
}
