//! Interactive application state.
//!
//! [`App`] pairs the [`Session`] with the presentation-only [`UiState`] and
//! the optional transcript log. Stream events from the background turn are
//! folded in through [`App::apply_stream_message`].

pub mod ui_state;

#[cfg(test)]
mod tests;

use tracing::{debug, warn};

use crate::core::chat_stream::StreamMessage;
use crate::core::config::Settings;
use crate::core::session::{PendingTurn, Session};
use crate::utils::logging::TranscriptLog;

pub use ui_state::{FormField, UiState};

pub struct App {
    pub session: Session,
    pub ui: UiState,
    pub services: Vec<String>,
    transcript_log: TranscriptLog,
    /// Transcript entries already written to the log.
    logged_messages: usize,
}

impl App {
    pub fn new(settings: &Settings, transcript_log: TranscriptLog) -> Self {
        let mut app = Self {
            session: Session::with_greeting(settings.greeting.clone()),
            ui: UiState::default(),
            services: settings.services.clone(),
            transcript_log,
            logged_messages: 0,
        };
        app.flush_transcript_log();
        app
    }

    /// Start a turn from the draft input. Clears the preview for the new turn.
    pub fn submit_draft(&mut self) -> Option<PendingTurn> {
        let turn = self.session.submit_draft()?;
        self.ui.reply_preview.clear();
        self.ui.pulse_start = std::time::Instant::now();
        self.flush_transcript_log();
        Some(turn)
    }

    pub fn apply_stream_message(&mut self, message: StreamMessage, turn_id: u64) {
        if self.session.pending_turn_id() != Some(turn_id) {
            debug!(turn_id, "dropping stream event for inactive turn");
            return;
        }

        match message {
            StreamMessage::Chunk(text) => self.ui.reply_preview.push_str(&text),
            StreamMessage::End(reply) => self.commit_turn(turn_id, Ok(reply)),
            StreamMessage::Error(err) => self.commit_turn(turn_id, Err(err)),
        }
    }

    fn commit_turn(
        &mut self,
        turn_id: u64,
        outcome: Result<String, crate::core::chat_stream::TurnError>,
    ) {
        if self.session.finish_turn(turn_id, outcome) {
            self.ui.reply_preview.clear();
            self.flush_transcript_log();
        }
    }

    /// Record the booking request built from the form fields.
    pub fn book_now(&mut self) {
        let name = self
            .session
            .field(FormField::Name.key())
            .map(str::trim)
            .unwrap_or_default();
        let contact = self
            .session
            .field(FormField::Contact.key())
            .map(str::trim)
            .unwrap_or_default();

        if name.is_empty() || contact.is_empty() {
            self.ui
                .set_status("Please enter your name and a phone number or email to book.");
            return;
        }

        let status = format!("Thanks, {name}! We'll reach out at {contact} to confirm your booking.");
        self.ui.set_status(status);
    }

    /// Edit the focused booking field through the session's form mapping.
    pub fn edit_focused_field(&mut self, edit: impl FnOnce(&mut String)) {
        let key = self.ui.form_focus.key();
        let mut value = self.session.field(key).unwrap_or_default().to_string();
        edit(&mut value);
        self.session.update_field(key, value);
    }

    pub fn transcript_log_status(&self) -> String {
        self.transcript_log.get_status_string()
    }

    fn flush_transcript_log(&mut self) {
        let transcript = self.session.transcript();
        for message in &transcript[self.logged_messages..] {
            if let Err(e) = self.transcript_log.log_message(message) {
                warn!(error = %e, "failed to write transcript log");
            }
        }
        self.logged_messages = transcript.len();
    }
}
