//! # ThreadView Component
//!
//! Scrollable two-level view of the board.
//!
//! ## Responsibilities
//!
//! - Flatten `Threads` + `Interaction` into display rows
//! - Render post cards, indented replies and the inline reply composer
//! - Track the selected post and keep it scrolled into view
//!
//! ## Architecture
//!
//! `ThreadView` is a transient component (created each frame) that wraps
//! `&'a mut ThreadViewState` (persistent state) and the rows for this frame.
//! Rows are derived by [`visible_rows`], a pure function, so the shape of the
//! tree can be tested without a terminal.
//!
//! ```text
//! Post 1            ← Row::Post (toggle shows reply count)
//!   [Reply box]     ← Row::Composer (only under the active reply target)
//!     Reply 1a      ← Row::Reply (only when Post 1 is expanded)
//!     Reply 1b
//! Post 2
//! ```
//!
//! Only top-level posts are traversed, so reply buckets keyed under a missing
//! parent are never reached, and replies never get a third level.

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::interaction::Interaction;
use crate::core::post::{Post, PostId};
use crate::core::thread::Threads;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::composer::Composer;
use crate::tui::components::post_card::{CardKind, PostCard};
use crate::tui::event::TuiEvent;

/// Columns replies and the reply composer are shifted right by.
pub const REPLY_INDENT: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Row<'a> {
    Post {
        post: &'a Post,
        reply_count: usize,
        expanded: bool,
    },
    Composer {
        parent_id: &'a PostId,
    },
    Reply {
        post: &'a Post,
    },
}

impl<'a> Row<'a> {
    /// The post this row shows, if it is selectable.
    pub fn post(&self) -> Option<&'a Post> {
        match self {
            Row::Post { post, .. } | Row::Reply { post } => Some(post),
            Row::Composer { .. } => None,
        }
    }

    fn indent(&self) -> u16 {
        match self {
            Row::Post { .. } => 0,
            Row::Composer { .. } | Row::Reply { .. } => REPLY_INDENT,
        }
    }
}

/// Flattens the two-tier structure into the rows to draw, top to bottom.
pub fn visible_rows<'a>(threads: &Threads<'a>, interaction: &Interaction) -> Vec<Row<'a>> {
    let mut rows = Vec::new();
    for &post in &threads.top_level {
        let expanded = interaction.is_expanded(&post.id);
        rows.push(Row::Post {
            post,
            reply_count: threads.reply_count(post.id.as_str()),
            expanded,
        });
        if interaction.is_composing(&post.id) {
            rows.push(Row::Composer {
                parent_id: &post.id,
            });
        }
        if expanded {
            let replies = threads.replies_of(post.id.as_str());
            rows.extend(replies.iter().map(|&reply| Row::Reply { post: reply }));
        }
    }
    rows
}

/// Scroll and selection state for the thread view.
/// Must be persisted in the parent TuiState.
pub struct ThreadViewState {
    pub scroll_state: ScrollViewState,
    /// Selected post, by id so it survives refetches
    pub selected: Option<PostId>,
    /// Scroll the selection into view on the next render
    follow_selection: bool,
    /// Last known viewport height (for paging and clamping)
    pub viewport_height: u16,
}

impl Default for ThreadViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadViewState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            selected: None,
            follow_selection: true,
            viewport_height: 0,
        }
    }

    fn selected_index(&self, rows: &[Row]) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        rows.iter()
            .position(|row| row.post().is_some_and(|p| &p.id == selected))
    }

    /// Falls back to the first post when nothing (or a vanished post) is selected.
    pub fn ensure_selection(&mut self, rows: &[Row]) {
        if self.selected_index(rows).is_none() {
            self.selected = rows.iter().find_map(|row| row.post()).map(|p| p.id.clone());
            self.follow_selection = true;
        }
    }

    pub fn select_next(&mut self, rows: &[Row]) {
        let start = self.selected_index(rows).map_or(0, |i| i + 1);
        if let Some(post) = rows.iter().skip(start).find_map(|row| row.post()) {
            self.selected = Some(post.id.clone());
            self.follow_selection = true;
        }
    }

    pub fn select_prev(&mut self, rows: &[Row]) {
        let end = self.selected_index(rows).unwrap_or(rows.len());
        if let Some(post) = rows[..end].iter().rev().find_map(|row| row.post()) {
            self.selected = Some(post.id.clone());
            self.follow_selection = true;
        }
    }

    /// The selected row, looked up in this frame's rows.
    pub fn selected_row<'a>(&self, rows: &[Row<'a>]) -> Option<Row<'a>> {
        self.selected_index(rows).map(|i| rows[i])
    }

    /// Bring the selection into view on the next render.
    pub fn follow(&mut self) {
        self.follow_selection = true;
    }

    /// Adjusts the offset so `[top, bottom)` is inside the viewport.
    fn scroll_into_view(&mut self, top: u16, bottom: u16) {
        let offset_y = self.scroll_state.offset().y;
        if top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: top });
        } else if bottom > offset_y.saturating_add(self.viewport_height) {
            let new_y = bottom.saturating_sub(self.viewport_height).min(top);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
        }
    }

    /// Pages by the last rendered viewport height; the next render clamps.
    fn scroll_by_page(&mut self, down: bool) {
        let page = self.viewport_height.max(1);
        let y = self.scroll_state.offset().y;
        let y = if down {
            y.saturating_add(page)
        } else {
            y.saturating_sub(page)
        };
        self.scroll_state.set_offset(Position { x: 0, y });
    }

    fn clamp_scroll(&mut self, content_height: u16) {
        let max_y = content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable thread view component.
/// Created fresh each frame with references to state and data.
pub struct ThreadView<'a, 'r> {
    pub state: &'a mut ThreadViewState,
    pub rows: &'a [Row<'r>],
    /// The inline reply composer, drawn at the `Row::Composer` position
    pub reply_composer: Option<&'a mut Composer>,
    pub anonymous_name: &'a str,
    pub now: DateTime<Utc>,
}

impl ThreadView<'_, '_> {
    fn row_height(&self, row: &Row, width: u16) -> u16 {
        let width = width.saturating_sub(row.indent());
        match *row {
            Row::Post {
                post,
                reply_count,
                expanded,
            } => PostCard::calculate_height(
                post,
                CardKind::Thread {
                    reply_count,
                    expanded,
                },
                width,
            ),
            Row::Reply { post } => PostCard::calculate_height(post, CardKind::Reply, width),
            Row::Composer { .. } => self
                .reply_composer
                .as_ref()
                .map_or(0, |composer| composer.calculate_height(width)),
        }
    }
}

impl Component for ThreadView<'_, '_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        self.state.viewport_height = area.height;

        // 1. Measure rows. Offsets are u16, so content past u16::MAX is unreachable.
        let heights: Vec<u16> = self
            .rows
            .iter()
            .map(|row| self.row_height(row, content_width))
            .collect();
        let tops: Vec<u16> = heights
            .iter()
            .scan(0u16, |acc, &h| {
                let top = *acc;
                *acc = acc.saturating_add(h);
                Some(top)
            })
            .collect();
        let total_height = heights.iter().fold(0u16, |acc, &h| acc.saturating_add(h));

        // 2. Scroll: follow selection, then clamp
        let selected_index = self.state.selected_index(self.rows);
        if self.state.follow_selection {
            if let Some(i) = selected_index {
                // Keep the composer under the selected post visible as well
                let mut bottom = tops[i].saturating_add(heights[i]);
                if let Some(Row::Composer { .. }) = self.rows.get(i + 1) {
                    bottom = bottom.saturating_add(heights[i + 1]);
                }
                self.state.scroll_into_view(tops[i], bottom);
            }
            self.state.follow_selection = false;
        }
        self.state.clamp_scroll(total_height);
        let offset_y = self.state.scroll_state.offset().y;
        let view_bottom = offset_y.saturating_add(area.height);

        // 3. Only rows intersecting the viewport are drawn, into a ScrollView
        //    sized to that window rather than the whole board.
        let window: Vec<usize> = (0..self.rows.len())
            .skip_while(|&i| tops[i].saturating_add(heights[i]) <= offset_y)
            .take_while(|&i| tops[i] < view_bottom)
            .filter(|&i| heights[i] > 0)
            .collect();
        let window_top = window.first().map_or(offset_y, |&i| tops[i]);
        let window_height = window
            .iter()
            .fold(0u16, |acc, &i| acc.saturating_add(heights[i]));

        let mut scroll_view = ScrollView::new(Size::new(content_width, window_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Never)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut composer_rect = None;
        for &i in &window {
            let row = self.rows[i];
            let indent = row.indent();
            let rect = Rect::new(
                indent,
                tops[i] - window_top,
                content_width.saturating_sub(indent),
                heights[i],
            );
            let is_selected = selected_index == Some(i);
            match row {
                Row::Post {
                    post,
                    reply_count,
                    expanded,
                } => {
                    let card = PostCard {
                        post,
                        kind: CardKind::Thread {
                            reply_count,
                            expanded,
                        },
                        is_selected,
                        anonymous_name: self.anonymous_name,
                        now: self.now,
                    };
                    scroll_view.render_widget(card, rect);
                }
                Row::Reply { post } => {
                    let card = PostCard {
                        post,
                        kind: CardKind::Reply,
                        is_selected,
                        anonymous_name: self.anonymous_name,
                        now: self.now,
                    };
                    scroll_view.render_widget(card, rect);
                }
                Row::Composer { .. } => {
                    if let Some(composer) = self.reply_composer.as_deref_mut() {
                        scroll_view.render_widget(composer, rect);
                        composer_rect = Some(Rect { y: tops[i], ..rect });
                    }
                }
            }
        }

        let content_area = Rect {
            width: content_width,
            ..area
        };
        let mut window_state =
            ScrollViewState::with_offset(Position::new(0, offset_y.saturating_sub(window_top)));
        frame.render_stateful_widget(scroll_view, content_area, &mut window_state);

        if total_height > area.height {
            let mut scrollbar_state = ScrollbarState::new(total_height as usize)
                .viewport_content_length(area.height as usize)
                .position(offset_y as usize);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut scrollbar_state,
            );
        }

        // 4. Place the terminal cursor in the reply composer when it is on screen
        if let (Some(rect), Some(composer)) = (composer_rect, self.reply_composer.as_deref()) {
            let on_screen = rect.y >= offset_y && rect.y.saturating_add(rect.height) <= view_bottom;
            if composer.focused && on_screen {
                let screen = Rect::new(
                    area.x + rect.x,
                    area.y + (rect.y - offset_y),
                    rect.width,
                    rect.height,
                );
                frame.set_cursor_position(composer.cursor_position(screen));
            }
        }
    }
}

/// Implemented on the state rather than `ThreadView` since the view is
/// recreated each frame and scrolling must persist.
impl EventHandler for ThreadViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_by_page(false),
            TuiEvent::ScrollPageDown => self.scroll_by_page(true),
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::post::PostId;
    use crate::test_support::{post, reply, test_time};
    use crate::tui::components::composer::ComposerMode;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn describe(rows: &[Row]) -> Vec<String> {
        rows.iter()
            .map(|row| match row {
                Row::Post {
                    post,
                    reply_count,
                    expanded,
                } => format!("post {} ({reply_count}{})", post.id, if *expanded { "+" } else { "" }),
                Row::Composer { parent_id } => format!("composer {parent_id}"),
                Row::Reply { post } => format!("reply {}", post.id),
            })
            .collect()
    }

    fn sample() -> Vec<Post> {
        vec![
            post("1", "A"),
            reply("2", "B", "1"),
            post("3", "C"),
            reply("4", "D", "1"),
            reply("5", "E", "2"),
            reply("6", "orphan", "999"),
        ]
    }

    #[test]
    fn test_collapsed_threads_show_counts_only() {
        let posts = sample();
        let threads = Threads::group(&posts);
        let rows = visible_rows(&threads, &Interaction::new());
        assert_eq!(describe(&rows), vec!["post 1 (2)", "post 3 (0)"]);
    }

    #[test]
    fn test_expanded_thread_lists_direct_replies_only() {
        let posts = sample();
        let threads = Threads::group(&posts);
        let mut interaction = Interaction::new();
        interaction.toggle_expanded(&PostId::from("1"));
        // Expanding a reply id has no visible effect: no third level
        interaction.toggle_expanded(&PostId::from("2"));

        let rows = visible_rows(&threads, &interaction);
        assert_eq!(
            describe(&rows),
            vec!["post 1 (2+)", "reply 2", "reply 4", "post 3 (0)"]
        );
    }

    #[test]
    fn test_orphans_are_never_rendered() {
        let posts = sample();
        let threads = Threads::group(&posts);
        let mut interaction = Interaction::new();
        interaction.toggle_expanded(&PostId::from("999"));

        let rows = visible_rows(&threads, &interaction);
        assert!(rows.iter().all(|r| r.post().is_none_or(|p| p.id.as_str() != "6")));
    }

    #[test]
    fn test_composer_row_sits_under_its_target() {
        let posts = sample();
        let threads = Threads::group(&posts);
        let mut interaction = Interaction::new();
        interaction.toggle_reply(&PostId::from("1"));
        interaction.toggle_expanded(&PostId::from("1"));

        let rows = visible_rows(&threads, &interaction);
        assert_eq!(
            describe(&rows),
            vec!["post 1 (2+)", "composer 1", "reply 2", "reply 4", "post 3 (0)"]
        );
    }

    #[test]
    fn test_selection_skips_composer_rows() {
        let posts = sample();
        let threads = Threads::group(&posts);
        let mut interaction = Interaction::new();
        interaction.toggle_reply(&PostId::from("1"));
        interaction.toggle_expanded(&PostId::from("1"));
        let rows = visible_rows(&threads, &interaction);

        let mut state = ThreadViewState::new();
        state.ensure_selection(&rows);
        assert_eq!(state.selected, Some(PostId::from("1")));

        state.select_next(&rows);
        assert_eq!(state.selected, Some(PostId::from("2")));
        state.select_next(&rows);
        state.select_next(&rows);
        assert_eq!(state.selected, Some(PostId::from("3")));
        // Stays on the last post
        state.select_next(&rows);
        assert_eq!(state.selected, Some(PostId::from("3")));

        state.select_prev(&rows);
        state.select_prev(&rows);
        state.select_prev(&rows);
        assert_eq!(state.selected, Some(PostId::from("1")));
        state.select_prev(&rows);
        assert_eq!(state.selected, Some(PostId::from("1")));
    }

    #[test]
    fn test_vanished_selection_falls_back_to_first_post() {
        let posts = vec![post("1", "A"), post("3", "C")];
        let threads = Threads::group(&posts);
        let rows = visible_rows(&threads, &Interaction::new());

        let mut state = ThreadViewState::new();
        state.selected = Some(PostId::from("gone"));
        state.ensure_selection(&rows);
        assert_eq!(state.selected, Some(PostId::from("1")));
    }

    #[test]
    fn test_render_draws_posts_replies_and_composer() {
        let posts = sample();
        let threads = Threads::group(&posts);
        let mut interaction = Interaction::new();
        interaction.toggle_expanded(&PostId::from("1"));
        interaction.toggle_reply(&PostId::from("1"));
        let rows = visible_rows(&threads, &interaction);

        let mut state = ThreadViewState::new();
        let mut composer = Composer::new(ComposerMode::Reply(PostId::from("1")));
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal
            .draw(|f| {
                let mut view = ThreadView {
                    state: &mut state,
                    rows: &rows,
                    reply_composer: Some(&mut composer),
                    anonymous_name: "Anonymous",
                    now: test_time(),
                };
                view.render(f, f.area());
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("2 replies (hide)"));
        assert!(text.contains("Reply"));
        assert!(text.contains("B"));
        assert!(!text.contains("orphan"));
    }

    fn render_to_text(
        state: &mut ThreadViewState,
        rows: &[Row],
        width: u16,
        height: u16,
    ) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let mut view = ThreadView {
                    state,
                    rows,
                    reply_composer: None,
                    anonymous_name: "Anonymous",
                    now: test_time(),
                };
                view.render(f, f.area());
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
    fn test_board_taller_than_u16_renders() {
        let posts: Vec<Post> = (0..25_000)
            .map(|i| post(&i.to_string(), &format!("hello {i}")))
            .collect();
        let threads = Threads::group(&posts);
        let rows = visible_rows(&threads, &Interaction::new());
        let mut state = ThreadViewState::new();
        state.ensure_selection(&rows);

        let text = render_to_text(&mut state, &rows, 60, 20);
        assert!(text.contains("hello 0"));

        // Deep selection still scrolls into view
        state.selected = Some(PostId::from("5000"));
        state.follow();
        let text = render_to_text(&mut state, &rows, 60, 20);
        assert!(text.contains("hello 5000"));
        assert!(!text.contains("hello 0 "));

        // Selection past the addressable range does not panic
        state.selected = Some(PostId::from("24999"));
        state.follow();
        render_to_text(&mut state, &rows, 60, 20);
        assert_eq!(state.scroll_state.offset().y, u16::MAX - 20);
    }

    #[test]
    fn test_page_down_moves_by_viewport_and_clamps() {
        let posts: Vec<Post> = (0..50)
            .map(|i| post(&i.to_string(), &format!("hello {i}")))
            .collect();
        let threads = Threads::group(&posts);
        let rows = visible_rows(&threads, &Interaction::new());
        let mut state = ThreadViewState::new();
        render_to_text(&mut state, &rows, 60, 20);

        state.handle_event(&TuiEvent::ScrollPageDown);
        assert_eq!(state.scroll_state.offset().y, 20);
        state.handle_event(&TuiEvent::ScrollPageUp);
        assert_eq!(state.scroll_state.offset().y, 0);

        for _ in 0..100 {
            state.handle_event(&TuiEvent::ScrollPageDown);
        }
        render_to_text(&mut state, &rows, 60, 20);
        let total: u16 = rows
            .iter()
            .map(|row| {
                let kind = CardKind::Thread {
                    reply_count: 0,
                    expanded: false,
                };
                PostCard::calculate_height(row.post().unwrap(), kind, 59)
            })
            .sum();
        assert_eq!(state.scroll_state.offset().y, total - 20);
    }
}
