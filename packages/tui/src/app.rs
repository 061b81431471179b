use crate::events::{AppEvent, EventHandler};
use crate::state::{Mode, UiState};
use crate::ui;
use crate::ui::widgets::{ConfirmationDialog, DialogResult};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use vending_tokens::{
    AppId, CreateTokenParams, EnglishCatalog, ListContainer, ListController, ListView,
    MessageCatalog, RefreshTicket, TokenAction, TokenId,
};

/// Gateway work requested by the UI, run off the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Fetch(RefreshTicket),
    Revoke { app_id: AppId, token_id: TokenId },
    Create { app_id: AppId, params: CreateTokenParams },
}

/// Row under the cursor
enum SelectedRow {
    Nothing,
    Token {
        id: TokenId,
        revoke: Option<TokenAction>,
    },
    Create,
}

/// Token list TUI for one application
pub struct App {
    container: ListContainer,
    ui: UiState,
    catalog: Arc<dyn MessageCatalog>,
    app_id: AppId,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: ListController, app_id: AppId) -> Self {
        Self {
            container: ListContainer::new(controller),
            ui: UiState::new(),
            catalog: Arc::new(EnglishCatalog),
            app_id,
            should_quit: false,
        }
    }

    pub fn container(&self) -> &ListContainer {
        &self.container
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn catalog(&self) -> &dyn MessageCatalog {
        self.catalog.as_ref()
    }

    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    /// Associate the list with the application; yields the initial fetch
    pub fn start(&mut self) -> Option<Command> {
        self.container
            .controller_mut()
            .initialize(self.app_id.clone())
            .map(Command::Fetch)
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut event_handler = EventHandler::new(250); // 250ms tick rate
        let sender = event_handler.sender().clone();

        if let Some(command) = self.start() {
            self.dispatch(command, &sender);
        }

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            if let Some(event) = event_handler.next().await {
                if let Some(command) = self.handle_event(event) {
                    self.dispatch(command, &sender);
                }
            }
        }

        Ok(())
    }

    /// Run a command on a background task; its outcome comes back as an event
    pub fn dispatch(&self, command: Command, sender: &UnboundedSender<AppEvent>) {
        let gateway = self.container.controller().gateway();
        let tx = sender.clone();

        match command {
            Command::Fetch(ticket) => {
                tokio::spawn(async move {
                    let result = ticket.fetch(gateway.as_ref()).await;
                    let _ = tx.send(AppEvent::TokensFetched { ticket, result });
                });
            }
            Command::Revoke { app_id, token_id } => {
                tokio::spawn(async move {
                    let result = gateway.revoke(&app_id, &token_id).await.map(|_| None);
                    let _ = tx.send(AppEvent::ActionFinished {
                        action: TokenAction::Revoke(token_id),
                        result,
                    });
                });
            }
            Command::Create { app_id, params } => {
                tokio::spawn(async move {
                    let result = match params.validate() {
                        Ok(()) => gateway.create(&app_id, &params).await.map(Some),
                        Err(err) => Err(err),
                    };
                    let _ = tx.send(AppEvent::ActionFinished {
                        action: TokenAction::Create,
                        result,
                    });
                });
            }
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Option<Command> {
        match event {
            AppEvent::Key(key) => self.handle_key_event(key),
            AppEvent::Tick => {
                self.ui.advance_spinner();
                None
            }
            AppEvent::TokensFetched { ticket, result } => {
                if self.container.apply(&ticket, result) {
                    let rows = self.row_count();
                    self.ui.clamp_selection(rows);
                }
                None
            }
            AppEvent::ActionFinished { action, result } => {
                let created = self
                    .container
                    .controller_mut()
                    .finish_action(action, result)
                    .flatten();

                if let Some(token) = created {
                    let secret = token.token.as_deref().unwrap_or("-");
                    self.ui.notice = Some(format!(
                        "{}: {} ({})",
                        self.catalog.translate("token-created"),
                        token.name,
                        secret
                    ));
                }

                // The list is the source of truth after any mutation
                self.container
                    .controller_mut()
                    .begin_refresh()
                    .map(Command::Fetch)
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return None;
        }

        match self.ui.mode {
            Mode::Browse => self.handle_browse_key(key.code),
            Mode::CreatePrompt => self.handle_prompt_key(key.code),
            Mode::ConfirmRevoke(_) => self.handle_dialog_key(key.code),
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) -> Option<Command> {
        let rows = self.row_count();

        match code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Esc => {
                self.ui.notice = None;
                self.container.controller_mut().dismiss_failure();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.ui.select_previous(rows);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.ui.select_next(rows);
            }
            KeyCode::Char('r') => {
                return self
                    .container
                    .controller_mut()
                    .begin_refresh()
                    .map(Command::Fetch);
            }
            KeyCode::Char('n') => {
                if rows > 0 {
                    self.ui.open_create_prompt();
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.selected_row() {
                SelectedRow::Token { id, .. } => {
                    self.container.disclosure_mut().toggle(&id);
                }
                SelectedRow::Create => self.ui.open_create_prompt(),
                SelectedRow::Nothing => {}
            },
            KeyCode::Char('x') | KeyCode::Delete => {
                if let SelectedRow::Token {
                    revoke: Some(TokenAction::Revoke(id)),
                    ..
                } = self.selected_row()
                {
                    let dialog = ConfirmationDialog::revoke(
                        id,
                        self.catalog.translate("revoke-token"),
                        self.catalog.translate("revoke-token-confirm"),
                    );
                    self.ui.open_revoke_dialog(dialog);
                }
            }
            _ => {}
        }

        None
    }

    fn handle_prompt_key(&mut self, code: KeyCode) -> Option<Command> {
        let input = &mut self.ui.name_input;
        match code {
            KeyCode::Enter => {
                let name = input.take();
                self.ui.close_overlay();
                debug!(app_id = %self.app_id, "Submitting new token");
                return Some(Command::Create {
                    app_id: self.app_id.clone(),
                    params: CreateTokenParams::new(name.trim()),
                });
            }
            KeyCode::Esc => {
                input.clear();
                self.ui.close_overlay();
            }
            KeyCode::Char(c) => {
                input.insert_char(c);
            }
            KeyCode::Backspace => {
                input.backspace();
            }
            KeyCode::Delete => {
                input.delete_char();
            }
            KeyCode::Left => {
                input.move_left();
            }
            KeyCode::Right => {
                input.move_right();
            }
            KeyCode::Home => input.move_to_start(),
            KeyCode::End => input.move_to_end(),
            _ => {}
        }
        None
    }

    fn handle_dialog_key(&mut self, code: KeyCode) -> Option<Command> {
        let Mode::ConfirmRevoke(dialog) = &mut self.ui.mode else {
            return None;
        };

        match dialog.handle_key(code) {
            DialogResult::Pending => None,
            DialogResult::Cancelled => {
                self.ui.close_overlay();
                None
            }
            DialogResult::Confirmed(action) => {
                self.ui.close_overlay();
                match action {
                    TokenAction::Revoke(token_id) => Some(Command::Revoke {
                        app_id: self.app_id.clone(),
                        token_id,
                    }),
                    TokenAction::Create => None,
                }
            }
        }
    }

    /// Tokens plus the create row, or zero while loading or failed
    fn row_count(&self) -> usize {
        match self.container.view() {
            ListView::Populated { items, .. } => items.len() + 1,
            _ => 0,
        }
    }

    fn selected_row(&self) -> SelectedRow {
        let view = self.container.view();
        let Some(index) = self.ui.selected else {
            return SelectedRow::Nothing;
        };

        match &view {
            ListView::Populated { items, .. } => match items.get(index) {
                Some(item) => SelectedRow::Token {
                    id: item.key().clone(),
                    revoke: item.revoke_action(),
                },
                None if index == items.len() => SelectedRow::Create,
                None => SelectedRow::Nothing,
            },
            _ => SelectedRow::Nothing,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
