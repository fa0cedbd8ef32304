use tracing::info;

use crate::{
    config::Config,
    session::{Services, SessionConfig, SessionEvent, SessionRunner},
};

use super::tui::Tui;

/// Hosts a single session on the local terminal.
pub struct App {
    pub config: Config,
    pub services: Services,
}

impl App {
    pub fn new(config: Config) -> color_eyre::Result<Self> {
        let services = Services::from_config(&config)?;
        Ok(Self { config, services })
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new();
        tui.enter()?;

        let (frame_tx, frame_rx) = flume::unbounded();
        let runner = SessionRunner::new(
            SessionConfig::from(&self.config),
            self.services.clone(),
            frame_tx,
        );
        let events = runner.handle();
        let (width, height) = Tui::size()?;
        events.send_async(SessionEvent::Resize(width, height)).await?;
        tui.start(events);

        info!(id = %runner.id(), width, height, "local_session_attached");
        let session = tokio::spawn(runner.run());

        while let Ok(frame) = frame_rx.recv_async().await {
            tui.draw(&frame)?;
        }

        session.await?;
        tui.exit()?;
        Ok(())
    }
}
