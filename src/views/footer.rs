use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{system::Status, ui::styles};

pub fn render(frame: &mut Frame, rect: Rect, status: &Status) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rect);

    let refreshed = status.last_refresh.as_ref().map_or_else(
        || t!("Status.never"),
        |at| t!("Status.refreshed", time = at),
    );
    let mut spans = vec![Span::styled(refreshed, styles::dark_gray())];
    if status.busy {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(t!("Status.busy"), styles::busy()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    if let Some(message) = &status.message {
        frame.render_widget(
            Paragraph::new(Span::styled(message.as_str(), styles::label()))
                .alignment(Alignment::Right),
            chunks[1],
        );
    }
}
