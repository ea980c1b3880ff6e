//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use tracing::info;

use crate::core::chat_stream::{ChatStreamService, HttpTransport, TurnStatus};
use crate::core::config::Settings;
use crate::core::session::{Session, TURN_ERROR_MESSAGE};
use crate::utils::logging::TranscriptLog;

pub async fn run_say(
    prompt: Vec<String>,
    settings: Settings,
    transcript_log: TranscriptLog,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: headstart say <message>");
        std::process::exit(1);
    }

    let transport = Arc::new(HttpTransport::new(
        reqwest::Client::new(),
        settings.endpoint.clone(),
    ));
    let (stream_service, _stream_rx) = ChatStreamService::new(transport, settings.idle_timeout);
    let mut session = Session::new();

    info!(endpoint = %settings.endpoint, "sending one-shot message");

    let status = stream_service
        .send_turn(&mut session, &prompt, |text| {
            let mut stdout = io::stdout().lock();
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        })
        .await;

    for message in session.transcript() {
        transcript_log.log_message(message)?;
    }

    match status {
        TurnStatus::Completed => {
            println!();
            Ok(())
        }
        TurnStatus::Failed => {
            eprintln!("\n❌ {TURN_ERROR_MESSAGE}");
            std::process::exit(1);
        }
        TurnStatus::Rejected => {
            eprintln!("❌ Nothing to send");
            std::process::exit(1);
        }
    }
}
