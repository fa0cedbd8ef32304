use tracing::error;

use crate::ui::tui::Tui;

/// Leaves the alternate screen before the default hook prints, and records
/// the panic in the log file, the only place diagnostics go.
pub fn set_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        error!(location = location.as_str(), panic = %info, "panicked");

        let _ = Tui::restore();
        previous(info);
    }));
}
