use crossterm::event::{self, Event, KeyEvent};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use vending_tokens::{GatewayResult, RefreshTicket, Token, TokenAction, TokenCollection};

/// Event types for the TUI application
#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    /// A list call started by a refresh ticket resolved
    TokensFetched {
        ticket: RefreshTicket,
        result: GatewayResult<TokenCollection>,
    },
    /// A create or revoke call resolved; `Some` carries a created token
    ActionFinished {
        action: TokenAction,
        result: GatewayResult<Option<Token>>,
    },
}

/// Event handler merging terminal input, ticks and gateway results
pub struct EventHandler {
    sender: mpsc::UnboundedSender<AppEvent>,
    receiver: mpsc::UnboundedReceiver<AppEvent>,
    handler: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate);
        let (sender, receiver) = mpsc::unbounded_channel();
        let input_sender = sender.clone();

        // crossterm polling blocks, keep it off the async workers
        let handler = tokio::task::spawn_blocking(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                if let Ok(true) = event::poll(timeout) {
                    if let Ok(Event::Key(key)) = event::read() {
                        if key.kind == event::KeyEventKind::Press
                            && input_sender.send(AppEvent::Key(key)).is_err()
                        {
                            break;
                        }
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if input_sender.send(AppEvent::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self {
            sender,
            receiver,
            handler,
        }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.receiver.recv().await
    }

    /// Sender for background tasks reporting back to the loop
    pub fn sender(&self) -> &mpsc::UnboundedSender<AppEvent> {
        &self.sender
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
