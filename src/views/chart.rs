use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{system::ChartView, ui::styles, widgets::Candles};

pub fn render(frame: &mut Frame, rect: Rect, view: &ChartView) {
    let title = format!(" {} {} ", view.code, view.name);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(Span::styled(title, styles::title()));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let Some(chart) = &view.chart else {
        let hint = if view.loading {
            t!("Chart.loading")
        } else {
            t!("Chart.empty")
        };
        frame.render_widget(
            Paragraph::new(hint)
                .style(styles::dark_gray())
                .alignment(Alignment::Center),
            chunks[1],
        );
        return;
    };

    let range = format!("{} - {}  ", chart.start, chart.end);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(range, styles::dark_gray()),
            Span::styled(chart.averages_line(), styles::label()),
        ])),
        chunks[0],
    );

    let (bull, bear) = styles::bull_bear_color();
    frame.render_widget(
        Candles::new(&chart.bars)
            .colors(bull, bear)
            .axis_style(styles::dark_gray()),
        chunks[1],
    );
}
