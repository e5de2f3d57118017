//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the board,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Input Modes
//!
//! - **Browse**: move the selection, expand threads, open composers.
//! - **ComposePost**: keys go to the new-post composer at the bottom.
//! - **ComposeReply**: keys go to the inline reply composer.
//!
//! ## Background Work
//!
//! Every transport call runs in a spawned tokio task holding a child of
//! `App.lifetime`. The task races the call against cancellation and sends the
//! completion back over an `mpsc` channel; the loop feeds it to `update()`.
//!
//! ## Redraw Strategy
//!
//! Draws only after input, after a background completion, or when the age
//! labels may have gone stale. Polls quickly while a request is in flight.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::future::Future;
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::{HttpTransport, PostTransport, TransportError};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::thread::Threads;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    Composer, ComposerEvent, ComposerMode, Row, ThreadViewState, visible_rows,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Poll interval while a request is in flight, so completions show up promptly.
const BUSY_POLL: Duration = Duration::from_millis(50);
const IDLE_POLL: Duration = Duration::from_millis(500);
/// Redraw at least this often so "Nm ago" labels stay current.
const AGE_REFRESH: Duration = Duration::from_secs(30);

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    ComposePost,
    ComposeReply,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub thread_view: ThreadViewState,
    pub post_composer: Composer,
    /// Mirrors `Interaction::composer()`; rebuilt when the target changes
    pub reply_composer: Option<Composer>,
    pub input_mode: InputMode,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            thread_view: ThreadViewState::new(),
            post_composer: Composer::new(ComposerMode::Post),
            reply_composer: None,
            input_mode: InputMode::Browse,
        }
    }

    /// Brings composers in line with the app: reply composer follows the
    /// interaction state, busy/focus props follow the store and input mode.
    pub fn sync(&mut self, app: &App) {
        match app.interaction.composer().target() {
            None => {
                self.reply_composer = None;
                if self.input_mode == InputMode::ComposeReply {
                    self.input_mode = InputMode::Browse;
                }
            }
            Some(target) => {
                let current = self
                    .reply_composer
                    .as_ref()
                    .is_some_and(|c| matches!(c.mode(), ComposerMode::Reply(id) if id == target));
                if !current {
                    self.reply_composer = Some(Composer::new(ComposerMode::Reply(target.clone())));
                }
            }
        }

        let busy = app.store.is_busy();
        self.post_composer.busy = busy;
        self.post_composer.focused = self.input_mode == InputMode::ComposePost;
        if let Some(composer) = self.reply_composer.as_mut() {
            composer.busy = busy;
            composer.focused = self.input_mode == InputMode::ComposeReply;
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is harmlessly ignored by terminals without it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste
        );
    }
}

/// Turns effects into spawned transport calls.
struct Dispatcher {
    transport: Arc<dyn PostTransport>,
    tx: mpsc::Sender<Action>,
}

impl Dispatcher {
    /// Applies `action` and performs the resulting effect. Returns true on quit.
    fn dispatch(&self, app: &mut App, tui: &mut TuiState, action: Action) -> bool {
        debug!("Dispatching {:?}", action);
        match update(app, action) {
            Effect::None => {}
            Effect::Quit => return true,
            Effect::Fetch => {
                let transport = Arc::clone(&self.transport);
                spawn_operation(
                    "fetch",
                    app.request_token(),
                    self.tx.clone(),
                    async move { transport.get_posts().await },
                    |token, result| Action::PostsLoaded { token, result },
                );
            }
            Effect::Create(payload) => {
                let transport = Arc::clone(&self.transport);
                spawn_operation(
                    "create",
                    app.request_token(),
                    self.tx.clone(),
                    async move { transport.create_post(&payload).await },
                    |token, result| Action::PostCreated { token, result },
                );
            }
            Effect::Reply { parent_id, payload } => {
                let transport = Arc::clone(&self.transport);
                let target = parent_id.clone();
                spawn_operation(
                    "reply",
                    app.request_token(),
                    self.tx.clone(),
                    async move { transport.create_reply(&target, &payload).await },
                    move |token, result| Action::ReplyCreated {
                        token,
                        parent_id,
                        result,
                    },
                );
            }
            Effect::SubmitResolved { success } => tui.post_composer.resolve(success),
        }
        tui.sync(app);
        false
    }
}

/// Runs `operation` in the background unless `token` is cancelled first, then
/// reports the result as the action built by `complete`.
fn spawn_operation<T, F, C>(
    label: &'static str,
    token: CancellationToken,
    tx: mpsc::Sender<Action>,
    operation: F,
    complete: C,
) -> JoinHandle<()>
where
    T: Send + 'static,
    F: Future<Output = Result<T, TransportError>> + Send + 'static,
    C: FnOnce(CancellationToken, Result<T, TransportError>) -> Action + Send + 'static,
{
    info!("Spawning {} request", label);
    tokio::spawn(async move {
        let result = tokio::select! {
            _ = token.cancelled() => {
                debug!("{} request cancelled before completion", label);
                return;
            }
            result = operation => result,
        };
        if tx.send(complete(token, result)).is_err() {
            warn!("Failed to deliver {} result: receiver dropped", label);
        }
    })
}

/// Maps a terminal event to an action for the reducer, updating presentation
/// state along the way.
fn handle_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::ForceQuit => return Some(Action::Quit),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.thread_view.handle_event(event);
            return None;
        }
        _ => {}
    }

    match tui.input_mode {
        InputMode::Browse => handle_browse(app, tui, event),
        InputMode::ComposePost => match tui.post_composer.handle_event(event)? {
            ComposerEvent::Submit(payload) => Some(Action::SubmitPost(payload)),
            ComposerEvent::Cancel => {
                tui.input_mode = InputMode::Browse;
                None
            }
            ComposerEvent::ContentChanged => None,
        },
        InputMode::ComposeReply => {
            let composer = tui.reply_composer.as_mut()?;
            match composer.handle_event(event)? {
                ComposerEvent::Submit(payload) => {
                    let parent_id = payload.parent_id.clone()?;
                    Some(Action::SubmitReply { parent_id, payload })
                }
                ComposerEvent::Cancel => {
                    tui.input_mode = InputMode::Browse;
                    let target = app.interaction.composer().target()?.clone();
                    Some(Action::ToggleReply(target))
                }
                ComposerEvent::ContentChanged => {
                    tui.thread_view.follow();
                    None
                }
            }
        }
    }
}

fn handle_browse(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    let threads = Threads::group(app.store.posts());
    let rows = visible_rows(&threads, &app.interaction);
    let selected = tui.thread_view.selected_row(&rows);

    match event {
        TuiEvent::InputChar('j') | TuiEvent::CursorDown => {
            tui.thread_view.select_next(&rows);
            None
        }
        TuiEvent::InputChar('k') | TuiEvent::CursorUp => {
            tui.thread_view.select_prev(&rows);
            None
        }
        TuiEvent::Submit | TuiEvent::InputChar(' ') => match selected? {
            Row::Post {
                post, reply_count, ..
            } if reply_count > 0 => Some(Action::ToggleExpanded(post.id.clone())),
            _ => None,
        },
        TuiEvent::InputChar('r') => match selected? {
            Row::Post { post, .. } => {
                tui.input_mode = if app.interaction.is_composing(&post.id) {
                    InputMode::Browse
                } else {
                    InputMode::ComposeReply
                };
                tui.thread_view.follow();
                Some(Action::ToggleReply(post.id.clone()))
            }
            // Replies cannot be replied to
            _ => None,
        },
        TuiEvent::InputChar('n') => {
            tui.input_mode = InputMode::ComposePost;
            None
        }
        TuiEvent::InputChar('R') | TuiEvent::Refresh => {
            if app.store.is_busy() {
                debug!("Refresh ignored: operation in flight");
                return None;
            }
            Some(Action::FetchPosts)
        }
        TuiEvent::InputChar('q') => Some(Action::Quit),
        _ => None,
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let transport = HttpTransport::new(config.api_base_url.clone(), config.timeout)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let dispatcher = Dispatcher {
        transport: Arc::new(transport),
        tx,
    };

    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Failed to enable terminal modes: {}", e))
        .ok();

    let mut should_quit = dispatcher.dispatch(&mut app, &mut tui, Action::FetchPosts);
    let mut needs_redraw = true;
    let mut last_draw = Instant::now();

    while !should_quit {
        if needs_redraw || last_draw.elapsed() >= AGE_REFRESH {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, Utc::now()))?;
            needs_redraw = false;
            last_draw = Instant::now();
        }

        let timeout = if app.store.is_busy() { BUSY_POLL } else { IDLE_POLL };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            needs_redraw = true;
            if matches!(event, TuiEvent::Resize) {
                continue;
            }
            if app.notice.is_some() {
                dispatcher.dispatch(&mut app, &mut tui, Action::DismissNotice);
            }
            if let Some(action) = handle_event(&app, &mut tui, &event) {
                should_quit = dispatcher.dispatch(&mut app, &mut tui, action);
            } else {
                tui.sync(&app);
            }
            if should_quit {
                break;
            }
        }

        // Completions from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if dispatcher.dispatch(&mut app, &mut tui, action) {
                should_quit = true;
                break;
            }
        }
    }

    info!("Shutting down");
    ratatui::restore();
    Ok(())
}
