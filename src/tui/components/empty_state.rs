//! # Empty State Component
//!
//! Shown in place of the thread view when there are no posts to draw.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::tui::component::Component;

pub const EMPTY_MESSAGE: &str = "No posts yet. Press n to write the first one.";
pub const LOADING_MESSAGE: &str = "Loading posts...";

pub struct EmptyState<'a> {
    pub board_title: &'a str,
    /// A fetch is in flight, so "no posts" is not known yet
    pub loading: bool,
    /// The last fetch failed, so the board may not actually be empty
    pub error: Option<&'a str>,
}

impl EmptyState<'_> {
    fn message(&self) -> (String, Color) {
        match (self.loading, self.error) {
            (true, _) => (LOADING_MESSAGE.to_string(), Color::DarkGray),
            (false, Some(error)) => (
                format!("Could not load posts: {error}. Press R to retry."),
                Color::Red,
            ),
            (false, None) => (EMPTY_MESSAGE.to_string(), Color::DarkGray),
        }
    }
}

impl Component for EmptyState<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (message, color) = self.message();
        // Title, blank line, then the message wrapped to the area
        let message_rows = textwrap::wrap(&message, area.width.max(1) as usize).len();
        let height = u16::try_from(message_rows + 2).unwrap_or(u16::MAX);
        let lines = vec![
            Line::from(Span::styled(
                self.board_title.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(color))),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        let [centered] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);

        frame.render_widget(paragraph, centered);
    }
}
