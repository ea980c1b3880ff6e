//! Interactive terminal session.

pub mod event_loop;
pub mod keybindings;
pub mod lifecycle;

use std::error::Error;
use std::sync::Arc;

use tracing::info;

use crate::core::app::App;
use crate::core::chat_stream::{ChatStreamService, HttpTransport};
use crate::core::config::Settings;
use crate::ui::theme::Theme;
use crate::utils::logging::TranscriptLog;

use event_loop::run_event_loop;
use lifecycle::{restore_terminal, setup_terminal};

pub use keybindings::KeyLoopAction;

pub async fn run_chat(
    settings: Settings,
    transcript_log: TranscriptLog,
) -> Result<(), Box<dyn Error>> {
    let transport = Arc::new(HttpTransport::new(
        reqwest::Client::new(),
        settings.endpoint.clone(),
    ));
    let (stream_service, mut stream_rx) = ChatStreamService::new(transport, settings.idle_timeout);
    let mut app = App::new(&settings, transcript_log);
    let theme = Theme::default();

    info!(
        endpoint = %settings.endpoint,
        idle_timeout = ?settings.idle_timeout,
        transcript = %app.transcript_log_status(),
        "starting interactive session"
    );

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(
        &mut terminal,
        &mut app,
        &stream_service,
        &mut stream_rx,
        &theme,
    )
    .await;
    restore_terminal(&mut terminal)?;

    info!(
        messages = app.session.transcript().len(),
        "interactive session ended"
    );
    result
}
