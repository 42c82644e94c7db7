use std::io::{stdout, Write};
use std::time::Duration;

use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, QueueableCommand};

use crate::stash_error::Result;

pub(crate) static TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Transient feedback surfaces: one loading indicator and short toasts.
pub(crate) trait Notifier: Send + Sync {
    fn show_loading(&self, message: &str);
    fn hide_loading(&self);
    fn toast(&self, message: &str, duration: Duration);
}

/// Keeps the loading indicator up while alive, hides it once on drop.
pub(crate) struct Loading<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> Loading<'a> {
    pub(crate) fn show(notifier: &'a dyn Notifier, message: &str) -> Self {
        notifier.show_loading(message);
        Loading { notifier }
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.notifier.hide_loading();
    }
}

/// Draws the loading line in place and prints toasts on their own line.
pub(crate) struct TerminalNotifier;

impl TerminalNotifier {
    fn rewrite_message(&self, msg: &str) -> Result<()> {
        let mut stdout = stdout();
        stdout.queue(cursor::SavePosition)?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(msg))?;
        stdout.queue(cursor::RestorePosition)?;
        stdout.flush()?;
        Ok(())
    }
}

impl Notifier for TerminalNotifier {
    fn show_loading(&self, message: &str) {
        if let Err(err) = self.rewrite_message(&format!("⏳  {}", message)) {
            tracing::warn!("failed to draw loading indicator: {}", err);
        }
    }

    fn hide_loading(&self) {
        if let Err(err) = self.rewrite_message("") {
            tracing::warn!("failed to clear loading indicator: {}", err);
        }
    }

    fn toast(&self, message: &str, duration: Duration) {
        tracing::debug!(duration_ms = duration.as_millis() as u64, "toast");
        println!("{}", message);
    }
}
