//! Event polling, dispatching, and redraw loop.
//!
//! Terminal input is read on a blocking task and forwarded over a channel so
//! the loop can wait on input, stream events, and the busy-indicator tick at
//! the same time. The loop is the only owner of the [`App`].

use std::{error::Error, time::Duration};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::core::app::App;
use crate::core::chat_stream::{ChatStreamService, StreamMessage};
use crate::ui::renderer::ui;
use crate::ui::theme::Theme;

use super::keybindings::{handle_key_event, KeyLoopAction};
use super::lifecycle::ChatTerminal;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);
const INDICATOR_FRAME: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

fn spawn_event_reader(tx: mpsc::UnboundedSender<UiEvent>) {
    tokio::task::spawn_blocking(move || loop {
        match event::poll(INPUT_POLL_INTERVAL) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.send(UiEvent::Crossterm(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => continue,
            },
            Ok(false) => {
                if tx.is_closed() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

pub async fn run_event_loop(
    terminal: &mut ChatTerminal,
    app: &mut App,
    stream_service: &ChatStreamService,
    stream_rx: &mut mpsc::UnboundedReceiver<(StreamMessage, u64)>,
    theme: &Theme,
) -> Result<(), Box<dyn Error>> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    spawn_event_reader(event_tx);

    let mut indicator_tick = tokio::time::interval(INDICATOR_FRAME);
    indicator_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        if app.session.take_scroll_request() {
            app.ui.pin_to_bottom();
        }
        terminal.draw(|f| ui(f, app, theme))?;

        if app.ui.exit_requested {
            break;
        }

        tokio::select! {
            Some(UiEvent::Crossterm(ev)) = event_rx.recv() => {
                if let Event::Key(key) = ev {
                    if key.kind == KeyEventKind::Press {
                        match handle_key_event(app, &key, terminal.size()?) {
                            KeyLoopAction::Continue => {}
                            KeyLoopAction::Break => app.ui.exit_requested = true,
                            KeyLoopAction::StartTurn(turn) => {
                                debug!(
                                    turn_id = turn.id,
                                    messages = turn.payload.len(),
                                    "sending turn"
                                );
                                stream_service.spawn_turn(turn);
                            }
                        }
                    }
                }
            }
            Some((message, turn_id)) = stream_rx.recv() => {
                app.apply_stream_message(message, turn_id);
            }
            _ = indicator_tick.tick(), if app.session.is_pending() => {}
            else => break,
        }
    }

    Ok(())
}
