//! # TitleBar Component
//!
//! Top status line: board title, a loading marker while a request is in
//! flight, and the current notice (green for success, red for errors).
//!
//! Stateless. All fields are props copied from `App` each frame:
//!
//! ```text
//! Community Board | Loading... | Failed to load posts
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::state::{Notice, NoticeLevel};
use crate::tui::component::Component;

pub struct TitleBar<'a> {
    pub board_title: &'a str,
    pub busy: bool,
    pub notice: Option<&'a Notice>,
}

impl TitleBar<'_> {
    fn line(&self) -> Line<'static> {
        let separator = || Span::styled(" | ", Style::default().fg(Color::DarkGray));

        let mut spans = vec![Span::styled(
            self.board_title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if self.busy {
            spans.push(separator());
            spans.push(Span::styled(
                "Loading...",
                Style::default().fg(Color::Yellow),
            ));
        }
        if let Some(notice) = self.notice {
            let color = match notice.level {
                NoticeLevel::Success => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            spans.push(separator());
            spans.push(Span::styled(
                notice.message.clone(),
                Style::default().fg(color),
            ));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(mut title_bar: TitleBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_only_when_idle() {
        let text = draw(TitleBar {
            board_title: "Community Board",
            busy: false,
            notice: None,
        });
        assert!(text.contains("Community Board"));
        assert!(!text.contains('|'));
    }

    #[test]
    fn test_busy_and_notice_are_appended() {
        let notice = Notice::error("Failed to load posts");
        let text = draw(TitleBar {
            board_title: "Community Board",
            busy: true,
            notice: Some(&notice),
        });
        assert!(text.contains("Community Board | Loading... | Failed to load posts"));
    }

    #[test]
    fn test_notice_color_follows_level() {
        let ok = TitleBar {
            board_title: "b",
            busy: false,
            notice: Some(&Notice::success("Post created")),
        }
        .line();
        assert_eq!(ok.spans[2].style.fg, Some(Color::Green));

        let err = Notice::error("nope");
        let bad = TitleBar {
            board_title: "b",
            busy: false,
            notice: Some(&err),
        }
        .line();
        assert_eq!(bad.spans[2].style.fg, Some(Color::Red));
    }
}
