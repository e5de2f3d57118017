use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Span;

use crate::core::state::App;
use crate::core::thread::Threads;
use crate::tui::component::Component;
use crate::tui::components::{EmptyState, ThreadView, TitleBar, visible_rows};
use crate::tui::{InputMode, TuiState};

/// Draws one frame: title bar, thread view, key hints, new-post composer.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, now: DateTime<Utc>) {
    use Constraint::{Length, Min};

    let composer_height = tui.post_composer.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(1), Length(composer_height)]);
    let [title_area, main_area, hint_area, composer_area] = layout.areas(frame.area());

    TitleBar {
        board_title: &app.board_title,
        busy: app.store.is_busy(),
        notice: app.notice.as_ref(),
    }
    .render(frame, title_area);

    let threads = Threads::group(app.store.posts());
    if threads.is_empty() {
        EmptyState {
            board_title: &app.board_title,
            loading: app.store.is_busy(),
            error: app.store.error(),
        }
        .render(frame, main_area);
    } else {
        let rows = visible_rows(&threads, &app.interaction);
        tui.thread_view.ensure_selection(&rows);
        ThreadView {
            state: &mut tui.thread_view,
            rows: &rows,
            reply_composer: tui.reply_composer.as_mut(),
            anonymous_name: &app.anonymous_name,
            now,
        }
        .render(frame, main_area);
    }

    frame.render_widget(
        Span::styled(key_hints(tui.input_mode), Style::default().fg(Color::DarkGray)),
        hint_area,
    );

    tui.post_composer.render(frame, composer_area);
}

fn key_hints(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Browse => {
            "j/k select · enter expand · r reply · n new post · R refresh · q quit"
        }
        InputMode::ComposePost | InputMode::ComposeReply => {
            "enter send · ctrl+j newline · esc back"
        }
    }
}
