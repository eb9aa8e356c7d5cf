use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

use crate::{app::AppState, helper::date, ui::styles};

pub fn render(frame: &mut Frame, rect: Rect, state: AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rect);

    let tabs = vec![
        Line::from(format!(" {} ", t!("tabs.Panel"))),
        Line::from(format!(" {} ", t!("tabs.Chart"))),
    ];
    let tabs = Tabs::new(tabs)
        .style(styles::text())
        .highlight_style(styles::text_selected())
        .divider("|")
        .select(match state {
            AppState::Panel => 0,
            AppState::Chart => 1,
        });

    let dark_gray_style = styles::dark_gray();
    let hints = match state {
        AppState::Panel => t!("Keyboard.Panel"),
        AppState::Chart => t!("Keyboard.Chart"),
    };
    let right = Paragraph::new(Line::from(vec![
        Span::styled(hints, dark_gray_style),
        Span::styled(" | ", dark_gray_style),
        Span::styled(date::clock(date::now_local()), styles::label()),
    ]))
    .alignment(Alignment::Right);

    frame.render_widget(tabs, chunks[0]);
    frame.render_widget(right, chunks[1]);
}
