use flume::{Receiver, Sender};
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::{
    session::{Command, Services, Session, SessionConfig, SessionEvent, fetch_track},
    util::task::TaskManager,
};

/// Drives one [`Session`]: feeds it events, runs the commands it returns on
/// background tasks and pushes every changed frame to the transport.
pub struct SessionRunner {
    id: Uuid,
    session: Session,
    services: Services,
    event_tx: Sender<SessionEvent>,
    event_rx: Receiver<SessionEvent>,
    frame_tx: Sender<String>,
    tasks: TaskManager,
    last_frame: Option<String>,
}

impl SessionRunner {
    pub fn new(config: SessionConfig, services: Services, frame_tx: Sender<String>) -> Self {
        let (event_tx, event_rx) = flume::unbounded();
        Self {
            id: Uuid::new_v4(),
            session: Session::new(config),
            services,
            event_tx,
            event_rx,
            frame_tx,
            tasks: TaskManager::new(),
            last_frame: None,
        }
    }

    /// Sender the transport uses for resize and key events.
    pub fn handle(&self) -> Sender<SessionEvent> {
        self.event_tx.clone()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Runs until the session quits or the frame receiver goes away.
    pub async fn run(mut self) {
        let span = info_span!("session", id = %self.id);
        async move {
            info!("session_started");

            let commands = self.session.init();
            if self.execute(commands) || !self.present().await {
                return self.finish();
            }

            while let Ok(event) = self.event_rx.recv_async().await {
                let commands = self.session.update(event);
                if self.execute(commands) || !self.present().await {
                    break;
                }
            }

            self.finish();
        }
        .instrument(span)
        .await
    }

    /// Returns `true` when the session asked to quit.
    fn execute(&mut self, commands: Vec<Command>) -> bool {
        for command in commands {
            match command {
                Command::FetchTrack => self.fetch(),
                Command::ScheduleTick(delay) => {
                    let tx = self.event_tx.clone();
                    self.tasks.spawn("tick", async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send_async(SessionEvent::Tick).await;
                    });
                }
                Command::RenderArtwork { url, cols, rows } => {
                    let tx = self.event_tx.clone();
                    let renderer = self.services.renderer.clone();
                    self.tasks.spawn(
                        "artwork",
                        async move {
                            let rendered = renderer.render_from_url(&url, cols, rows).await;
                            let event = match rendered {
                                Ok(frame) => SessionEvent::ArtworkReady { url, frame },
                                Err(failure) => {
                                    debug!(error = %failure, "artwork_placeholder_used");
                                    SessionEvent::ArtworkFailed { url }
                                }
                            };
                            let _ = tx.send_async(event).await;
                        }
                        .in_current_span(),
                    );
                }
                Command::Quit => return true,
            }
        }
        false
    }

    // Fetches are detached: a slow one is never cancelled by the next tick,
    // and whichever result lands last wins.
    fn fetch(&self) {
        let tx = self.event_tx.clone();
        let Some(source) = self.services.source.clone() else {
            let _ = tx.send(SessionEvent::TrackArrived(Ok(None)));
            return;
        };

        tokio::spawn(
            async move {
                let result = fetch_track(source.as_ref()).await.map_err(|e| e.to_string());
                let _ = tx.send_async(SessionEvent::TrackArrived(result)).await;
            }
            .in_current_span(),
        );
    }

    /// Sends the current frame if it changed. Returns `false` once the
    /// transport has hung up.
    async fn present(&mut self) -> bool {
        let frame = self.session.view();
        if self.last_frame.as_ref() == Some(&frame) {
            return true;
        }
        self.last_frame = Some(frame.clone());
        self.frame_tx.send_async(frame).await.is_ok()
    }

    fn finish(&mut self) {
        self.tasks.abort_all();
        info!("session_ended");
    }
}
