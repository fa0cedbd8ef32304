pub mod context;
pub mod message;
pub mod runner;

use std::time::Duration;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::Widget,
};
use tracing::debug;

use crate::{
    albumart::render_placeholder,
    config::Config,
    spotify::{SpotifyError, Track, TrackSource},
    ui::{ansi::buffer_to_ansi, widgets::NowPlaying},
    util::colors,
};

pub use context::Services;
pub use message::{Command, SessionEvent};
pub use runner::SessionRunner;

pub const LOADING: &str = "● Loading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub poll_interval: Duration,
    pub art_cols: u16,
    pub art_rows: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval,
            art_cols: config.art_cols,
            art_rows: config.art_rows,
        }
    }
}

/// State of one connected terminal. `update` is pure: it mutates the model
/// and returns the I/O it wants done instead of doing it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SessionConfig,
    width: u16,
    height: u16,
    track: Option<Track>,
    artwork_url: Option<String>,
    artwork: Option<String>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The frame to show for the current track: the rendered cover once it
    /// has arrived, the placeholder until then.
    pub fn artwork(&self) -> String {
        self.artwork
            .clone()
            .unwrap_or_else(|| render_placeholder(self.config.art_cols, self.config.art_rows))
    }

    pub fn init(&self) -> Vec<Command> {
        vec![
            Command::FetchTrack,
            Command::ScheduleTick(self.config.poll_interval),
        ]
    }

    pub fn update(&mut self, event: SessionEvent) -> Vec<Command> {
        match event {
            SessionEvent::Resize(width, height) => {
                self.width = width;
                self.height = height;
                vec![]
            }
            SessionEvent::Key(key) => {
                let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Enter)
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL));
                if quit { vec![Command::Quit] } else { vec![] }
            }
            SessionEvent::Tick => vec![
                Command::FetchTrack,
                Command::ScheduleTick(self.config.poll_interval),
            ],
            SessionEvent::TrackArrived(Ok(Some(track))) => self.set_track(track),
            SessionEvent::TrackArrived(Ok(None)) => vec![],
            SessionEvent::TrackArrived(Err(err)) => {
                debug!(error = err.as_str(), "track_fetch_failed");
                vec![]
            }
            SessionEvent::ArtworkReady { url, frame } => {
                if self.artwork_url.as_deref() == Some(url.as_str()) {
                    self.artwork = Some(frame);
                }
                vec![]
            }
            // Failures are not cached, so forget the request and let the
            // next poll of the same track ask again.
            SessionEvent::ArtworkFailed { url } => {
                if self.artwork_url.as_deref() == Some(url.as_str()) {
                    self.artwork_url = None;
                    self.artwork = None;
                }
                vec![]
            }
        }
    }

    fn set_track(&mut self, track: Track) -> Vec<Command> {
        let mut commands = vec![];
        if self.artwork_url.as_deref() != Some(track.artwork_url.as_str()) {
            self.artwork_url = Some(track.artwork_url.clone());
            self.artwork = None;
            commands.push(Command::RenderArtwork {
                url: track.artwork_url.clone(),
                cols: self.config.art_cols,
                rows: self.config.art_rows,
            });
        }
        self.track = Some(track);
        commands
    }

    /// The full terminal frame as a string of 24-bit ANSI escapes, one line
    /// per terminal row.
    pub fn view(&self) -> String {
        if self.width == 0 || self.height == 0 {
            let line = Line::from(LOADING).style(Style::new().fg(colors::PRIMARY).bold());
            let mut buf = Buffer::empty(Rect::new(0, 0, line.width() as u16, 1));
            line.render(buf.area, &mut buf);
            return buffer_to_ansi(&buf);
        }

        let area = Rect::new(0, 0, self.width, self.height);
        let mut buf = Buffer::empty(area);
        let artwork = self.artwork();
        NowPlaying::new(self.track.as_ref(), &artwork).render(area, &mut buf);
        buffer_to_ansi(&buf)
    }
}

/// Now playing, or the last played track marked as paused when nothing is.
pub async fn fetch_track(source: &dyn TrackSource) -> Result<Option<Track>, SpotifyError> {
    if let Some(track) = source.currently_playing().await? {
        return Ok(Some(track));
    }

    Ok(source.recently_played().await?.map(|track| Track {
        is_playing: false,
        ..track
    }))
}
