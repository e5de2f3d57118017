//! # Composer Component
//!
//! The text box used to draft a new post or a reply.
//!
//! ## Responsibilities
//!
//! - Capture and edit text (typing, paste, backspace, delete, cursor movement)
//! - Reject blank submissions before anything is dispatched
//! - Build the `PostCreate` payload (with `parent_id` only in reply mode)
//! - Keep the draft until the owner reports the submission succeeded
//!
//! ## State Management
//!
//! The buffer is internal state. `busy` and `focused` are props synced from the
//! application state every frame. While busy, `Submit` is ignored but editing
//! keeps working.

mod editor;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::post::{PostCreate, PostId};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use editor::Editor;

/// What the composer is drafting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerMode {
    Post,
    Reply(PostId),
}

/// High-level events emitted by the Composer
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerEvent {
    /// A non-blank draft was submitted. The buffer is kept until `resolve()`.
    Submit(PostCreate),
    /// User left the composer (Esc)
    Cancel,
    ContentChanged,
}

pub struct Composer {
    editor: Editor,
    mode: ComposerMode,
    /// Owner has an operation in flight (Prop)
    pub busy: bool,
    /// Keyboard focus is here (Prop)
    pub focused: bool,
}

impl Composer {
    pub fn new(mode: ComposerMode) -> Self {
        Self {
            editor: Editor::new(),
            mode,
            busy: false,
            focused: false,
        }
    }

    pub fn mode(&self) -> &ComposerMode {
        &self.mode
    }

    pub fn buffer(&self) -> &str {
        self.editor.text()
    }

    /// The owner's verdict on the last submission: clear the draft on success,
    /// keep it on failure so nothing typed is lost.
    pub fn resolve(&mut self, success: bool) {
        if success {
            self.editor.clear();
        }
    }

    /// Rendered height for a given width, including borders.
    pub fn calculate_height(&self, width: u16) -> u16 {
        self.editor.height(width)
    }

    /// Terminal cursor position when drawn in `area`.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        self.editor.screen_pos(area)
    }

    fn title(&self) -> String {
        let base = match self.mode {
            ComposerMode::Post => "New post",
            ComposerMode::Reply(_) => "Reply",
        };
        if self.busy {
            format!("{base} (sending...)")
        } else {
            base.to_string()
        }
    }

    fn payload(&self) -> Option<PostCreate> {
        let parent = match &self.mode {
            ComposerMode::Post => None,
            ComposerMode::Reply(id) => Some(id.clone()),
        };
        PostCreate::new(self.editor.text(), parent)
    }
}

impl Widget for &mut Composer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.editor.update_scroll(area.width);

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title())
            .padding(Padding::horizontal(1));

        let lines: Vec<Line> = self
            .editor
            .visible_rows(area.width)
            .into_iter()
            .map(Line::from)
            .collect();

        Paragraph::new(lines)
            .block(block)
            .style(Style::default().fg(Color::Green))
            .render(area, buf);
    }
}

impl Component for Composer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(&mut *self, area);
        if self.focused {
            frame.set_cursor_position(self.cursor_position(area));
        }
    }
}

impl EventHandler for Composer {
    type Event = ComposerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let changed = match event {
            TuiEvent::InputChar(c) => {
                self.editor.insert_char(*c);
                true
            }
            TuiEvent::Paste(text) => {
                self.editor.insert_str(text);
                true
            }
            TuiEvent::Backspace => self.editor.backspace(),
            TuiEvent::Delete => self.editor.delete(),
            TuiEvent::CursorLeft => self.editor.move_left(),
            TuiEvent::CursorRight => self.editor.move_right(),
            TuiEvent::CursorHome => self.editor.move_home(),
            TuiEvent::CursorEnd => self.editor.move_end(),
            TuiEvent::CursorUp => self.editor.move_vertically(true),
            TuiEvent::CursorDown => self.editor.move_vertically(false),
            TuiEvent::Submit => {
                if self.busy {
                    log::debug!("Submit ignored: operation in flight");
                    return None;
                }
                return self.payload().map(ComposerEvent::Submit);
            }
            TuiEvent::Escape => return Some(ComposerEvent::Cancel),
            _ => false,
        };
        changed.then_some(ComposerEvent::ContentChanged)
    }
}
