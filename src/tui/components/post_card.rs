use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::post::{Post, relative_age};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Where a card sits in the two-level tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    /// A top-level post, with the reply toggle state.
    Thread { reply_count: usize, expanded: bool },
    /// A reply. Never gets its own toggle.
    Reply,
}

impl CardKind {
    /// The reply toggle label, for threads with at least one reply.
    fn footer_text(self) -> Option<String> {
        let CardKind::Thread {
            reply_count,
            expanded,
        } = self
        else {
            return None;
        };
        if reply_count == 0 {
            return None;
        }
        let marker = if expanded { "▾" } else { "▸" };
        let noun = if reply_count == 1 { "reply" } else { "replies" };
        let action = if expanded { "hide" } else { "show" };
        Some(format!("{marker} {reply_count} {noun} ({action})"))
    }
}

fn wrapped_line_count(text: &str, content_width: u16) -> u16 {
    let options = textwrap::Options::new(content_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    u16::try_from(textwrap::wrap(text, options).len()).unwrap_or(u16::MAX)
}

/// A single post rendered as a bordered card.
///
/// Transient: built fresh each frame with everything it needs. The title shows
/// author and age; threads with replies get a footer with the count and an
/// expand/collapse marker.
#[derive(Clone, Copy)]
pub struct PostCard<'a> {
    pub post: &'a Post,
    pub kind: CardKind,
    pub is_selected: bool,
    pub anonymous_name: &'a str,
    pub now: DateTime<Utc>,
}

impl<'a> PostCard<'a> {
    /// Predicts rendered height without rendering, using the same wrapping
    /// rules as ratatui's `Paragraph`.
    pub fn calculate_height(post: &Post, kind: CardKind, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        // The footer wraps like the content at narrow widths
        let footer = kind
            .footer_text()
            .map_or(0, |text| wrapped_line_count(&text, content_width));
        let content = post.content.trim();
        let content_lines = if content.is_empty() {
            0
        } else {
            wrapped_line_count(content, content_width).max(1)
        };
        content_lines
            .saturating_add(VERTICAL_OVERHEAD)
            .saturating_add(footer)
    }

    fn footer(&self) -> Option<Line<'static>> {
        self.kind
            .footer_text()
            .map(|text| Line::from(Span::styled(text, Style::default().fg(Color::Yellow))))
    }
}

impl<'a> Widget for PostCard<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = match self.kind {
            CardKind::Thread { .. } => Style::default().fg(Color::White),
            CardKind::Reply => Style::default().fg(Color::Gray),
        };

        // Selection gets a cyan border, everything else is dimmed
        let border_style = if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let title = Line::from(vec![
            Span::styled(
                self.post.author(self.anonymous_name).to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" · "),
            Span::raw(relative_age(self.post.created_at, self.now)),
        ]);

        let block = Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = self
            .post
            .content
            .trim()
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect();
        if let Some(footer) = self.footer() {
            lines.push(footer);
        }

        Paragraph::new(lines)
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}
