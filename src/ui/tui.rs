use std::io::{Stdout, Write};

use color_eyre::eyre::Result;

use crossterm::{
    cursor,
    event::{Event as CrosstermEvent, EventStream, KeyEventKind},
    style::Print,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use flume::Sender;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::session::SessionEvent;

/// The local terminal acting as a session transport: raw mode, alternate
/// screen, input forwarded as [`SessionEvent`]s, frames painted as strings.
pub struct Tui {
    stdout: Stdout,
    reader: Option<JoinHandle<()>>,
}

impl Default for Tui {
    fn default() -> Self {
        Self::new()
    }
}

impl Tui {
    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
            reader: None,
        }
    }

    pub fn size() -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }

    pub fn start(&mut self, events: Sender<SessionEvent>) {
        self.reader = Some(tokio::spawn(async move {
            let mut reader = EventStream::new();
            while let Some(Ok(evt)) = reader.next().await {
                let event = match evt {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        SessionEvent::Key(key)
                    }
                    CrosstermEvent::Resize(width, height) => SessionEvent::Resize(width, height),
                    _ => continue,
                };
                if events.send_async(event).await.is_err() {
                    break;
                }
            }
        }));
    }

    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(self.stdout, EnterAlternateScreen, cursor::Hide)?;
        Ok(())
    }

    /// Paints a frame from the top-left corner, one line per row.
    pub fn draw(&mut self, frame: &str) -> Result<()> {
        for (y, line) in frame.split('\n').enumerate() {
            crossterm::queue!(
                self.stdout,
                cursor::MoveTo(0, y as u16),
                Print(line),
                Clear(ClearType::UntilNewLine)
            )?;
        }
        crossterm::queue!(self.stdout, Clear(ClearType::FromCursorDown))?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.stdout.flush()?;
            Self::restore()?;
        }
        Ok(())
    }

    pub fn restore() -> Result<()> {
        crossterm::execute!(std::io::stdout(), LeaveAlternateScreen, cursor::Show)?;
        crossterm::terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
