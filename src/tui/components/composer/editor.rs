//! Text buffer with a cursor, used by the `Composer`.
//!
//! The cursor is a byte offset that always sits on a char boundary.
//! Layout helpers wrap with the same `textwrap` options the post cards use,
//! so the cursor lands where ratatui draws the text.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Content lines shown before the editor scrolls internally
pub(super) const MAX_VISIBLE_LINES: u16 = 4;
/// Offset from area edge to first content column (border + padding)
const CONTENT_OFFSET_X: u16 = 2;
const CONTENT_OFFSET_Y: u16 = 1;

fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width.max(1) as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Inner text width for a block of `outer_width` columns.
pub(super) fn inner_width(outer_width: u16) -> u16 {
    outer_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wrapped rows of one logical line (no `\n` inside). Never less than one.
fn wrapped_rows(line: &str, width: u16) -> Vec<String> {
    let rows: Vec<String> = textwrap::wrap(line, wrap_options(width))
        .into_iter()
        .map(|row| row.into_owned())
        .collect();
    if rows.is_empty() { vec![String::new()] } else { rows }
}

fn row_len(rows: &[String]) -> u16 {
    u16::try_from(rows.len()).unwrap_or(u16::MAX)
}

#[derive(Debug, Default)]
pub struct Editor {
    text: String,
    cursor: usize,
    /// First visible wrapped row when the text is taller than the viewport.
    scroll: u16,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Returns whether anything was removed.
    pub fn backspace(&mut self) -> bool {
        let Some((prev, _)) = self.text[..self.cursor].char_indices().next_back() else {
            return false;
        };
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    pub fn delete(&mut self) -> bool {
        let Some(c) = self.text[self.cursor..].chars().next() else {
            return false;
        };
        self.text.drain(self.cursor..self.cursor + c.len_utf8());
        true
    }

    pub fn move_left(&mut self) -> bool {
        match self.text[..self.cursor].chars().next_back() {
            Some(c) => {
                self.cursor -= c.len_utf8();
                true
            }
            None => false,
        }
    }

    pub fn move_right(&mut self) -> bool {
        match self.text[self.cursor..].chars().next() {
            Some(c) => {
                self.cursor += c.len_utf8();
                true
            }
            None => false,
        }
    }

    fn line_start(&self) -> usize {
        self.text[..self.cursor].rfind('\n').map_or(0, |i| i + 1)
    }

    fn line_end(&self) -> usize {
        self.text[self.cursor..]
            .find('\n')
            .map_or(self.text.len(), |i| self.cursor + i)
    }

    pub fn move_home(&mut self) -> bool {
        let start = self.line_start();
        let moved = start != self.cursor;
        self.cursor = start;
        moved
    }

    pub fn move_end(&mut self) -> bool {
        let end = self.line_end();
        let moved = end != self.cursor;
        self.cursor = end;
        moved
    }

    /// Moves to the previous (`up`) or next logical line, keeping the column
    /// where possible.
    pub fn move_vertically(&mut self, up: bool) -> bool {
        let start = self.line_start();
        let column = self.text[start..self.cursor].chars().count();

        let (target_start, target_end) = if up {
            if start == 0 {
                return false;
            }
            let prev_end = start - 1;
            let prev_start = self.text[..prev_end].rfind('\n').map_or(0, |i| i + 1);
            (prev_start, prev_end)
        } else {
            let end = self.line_end();
            if end == self.text.len() {
                return false;
            }
            let next_start = end + 1;
            let next_end = self.text[next_start..]
                .find('\n')
                .map_or(self.text.len(), |i| next_start + i);
            (next_start, next_end)
        };

        let target = &self.text[target_start..target_end];
        self.cursor = target_start
            + target
                .char_indices()
                .nth(column)
                .map_or(target.len(), |(i, _)| i);
        true
    }

    /// Total wrapped rows for the current text at `outer_width`.
    pub fn row_count(&self, outer_width: u16) -> u16 {
        let width = inner_width(outer_width);
        if width == 0 {
            return 1;
        }
        self.text
            .split('\n')
            .map(|line| row_len(&wrapped_rows(line, width)))
            .fold(0u16, u16::saturating_add)
    }

    /// Block height for `outer_width`, clamped to the visible line limit.
    pub fn height(&self, outer_width: u16) -> u16 {
        self.row_count(outer_width).min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// (row, column) of the cursor within the wrapped text.
    fn cursor_row_col(&self, width: u16) -> (u16, u16) {
        let before = &self.text[..self.cursor];
        let mut logical = before.split('\n').peekable();
        let mut row = 0u16;
        while let Some(line) = logical.next() {
            let rows = wrapped_rows(line, width);
            if logical.peek().is_some() {
                row = row.saturating_add(row_len(&rows));
                continue;
            }
            // Last logical line: cursor sits at the end of its last wrapped row.
            // Column counts from the raw text so trailing spaces are kept.
            let consumed: usize = rows[..rows.len() - 1].iter().map(|r| r.width()).sum();
            let col = line.width().saturating_sub(consumed).min(width as usize) as u16;
            row = row.saturating_add(row_len(&rows) - 1);
            return (row, col);
        }
        (row, 0)
    }

    /// Keeps the cursor row inside the visible window. Call before rendering.
    pub fn update_scroll(&mut self, outer_width: u16) {
        let width = inner_width(outer_width);
        if width == 0 || self.row_count(outer_width) <= MAX_VISIBLE_LINES {
            self.scroll = 0;
            return;
        }
        let (row, _) = self.cursor_row_col(width);
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll.saturating_add(MAX_VISIBLE_LINES) {
            self.scroll = row - MAX_VISIBLE_LINES + 1;
        }
    }

    /// The wrapped rows currently inside the visible window.
    pub fn visible_rows(&self, outer_width: u16) -> Vec<String> {
        let width = inner_width(outer_width);
        if width == 0 {
            return Vec::new();
        }
        self.text
            .split('\n')
            .flat_map(|line| wrapped_rows(line, width))
            .skip(self.scroll as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .collect()
    }

    /// Terminal position of the cursor when the editor is drawn in `area`.
    pub fn screen_pos(&self, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        let (row, col) = if width == 0 {
            (0, 0)
        } else {
            self.cursor_row_col(width)
        };
        (
            area.x + CONTENT_OFFSET_X + col,
            area.y + CONTENT_OFFSET_Y + row.saturating_sub(self.scroll),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(text: &str) -> Editor {
        let mut e = Editor::new();
        e.insert_str(text);
        e
    }

    #[test]
    fn test_insert_and_backspace_multibyte() {
        let mut e = editor("hé");
        assert_eq!(e.cursor(), 3);
        assert!(e.backspace());
        assert_eq!(e.text(), "h");
        assert!(e.backspace());
        assert!(!e.backspace());
        assert_eq!(e.text(), "");
    }

    #[test]
    fn test_left_right_and_delete() {
        let mut e = editor("abc");
        assert!(e.move_left());
        assert!(e.move_left());
        assert!(e.delete());
        assert_eq!(e.text(), "ac");
        assert!(e.move_right());
        assert!(!e.move_right());
        assert!(!e.delete());
    }

    #[test]
    fn test_home_end_work_per_line() {
        let mut e = editor("first\nsecond");
        assert!(e.move_home());
        assert_eq!(e.cursor(), 6);
        assert!(!e.move_home());
        assert!(e.move_end());
        assert_eq!(e.cursor(), e.text().len());
    }

    #[test]
    fn test_vertical_movement_keeps_column() {
        let mut e = editor("abcdef\nxy\nlonger line");
        // Cursor at end of "longer line" (column 11) → up clamps to "xy"
        assert!(e.move_vertically(true));
        assert_eq!(e.cursor(), 9);
        assert!(e.move_vertically(true));
        assert_eq!(e.cursor(), 2);
        assert!(!e.move_vertically(true));
        assert!(e.move_vertically(false));
        assert_eq!(e.cursor(), 9);
    }

    #[test]
    fn test_row_count_wraps_and_counts_newlines() {
        // inner width = 10 - 4 = 6
        assert_eq!(editor("").row_count(10), 1);
        assert_eq!(editor("abc").row_count(10), 1);
        assert_eq!(editor("abc def ghi").row_count(10), 3);
        assert_eq!(editor("a\n").row_count(10), 2);
    }

    #[test]
    fn test_height_is_clamped() {
        let e = editor("1\n2\n3\n4\n5\n6\n7");
        assert_eq!(e.height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
        assert_eq!(editor("one").height(40), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_row_count_saturates_on_huge_drafts() {
        let mut e = editor(&"x\n".repeat(70_000));
        assert_eq!(e.row_count(40), u16::MAX);
        assert_eq!(e.height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);

        e.update_scroll(40);
        let area = Rect::new(0, 0, 40, 6);
        assert_eq!(e.screen_pos(area), (2, 1 + MAX_VISIBLE_LINES - 1));
    }

    #[test]
    fn test_screen_pos_tracks_newlines_and_spaces() {
        let area = Rect::new(0, 0, 40, 6);
        assert_eq!(editor("").screen_pos(area), (2, 1));
        assert_eq!(editor("ab ").screen_pos(area), (5, 1));
        assert_eq!(editor("ab\n").screen_pos(area), (2, 2));
        assert_eq!(editor("ab\ncd").screen_pos(area), (4, 2));
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut e = editor("1\n2\n3\n4\n5\n6");
        e.update_scroll(40);
        assert_eq!(e.visible_rows(40), vec!["3", "4", "5", "6"]);
        let area = Rect::new(0, 0, 40, 6);
        assert_eq!(e.screen_pos(area), (3, 4));

        e.clear();
        e.update_scroll(40);
        assert_eq!(e.visible_rows(40), vec![""]);
    }
}
