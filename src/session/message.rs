use std::time::Duration;

use crossterm::event::KeyEvent;

use crate::spotify::Track;

/// Everything a session reacts to, delivered one at a time.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    // From the transport
    Resize(u16, u16),
    Key(KeyEvent),

    // From the session's own tasks
    Tick,
    TrackArrived(Result<Option<Track>, String>),
    ArtworkReady { url: String, frame: String },
    ArtworkFailed { url: String },
}

/// Side effects requested by [`Session::update`](super::Session::update).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchTrack,
    ScheduleTick(Duration),
    RenderArtwork { url: String, cols: u16, rows: u16 },
    Quit,
}
