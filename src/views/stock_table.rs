use ratatui::{
    layout::{Alignment, Margin, Rect},
    prelude::Constraint,
    style::Modifier,
    widgets::{
        Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        Table,
    },
    Frame,
};

use crate::{
    data::fields::TABLE_COLUMNS,
    render::StockTable,
    ui::{styles, text::align_right},
};

// code and name stay left aligned, numbers right aligned
const COLUMN_WIDTHS: [usize; TABLE_COLUMNS.len()] = [8, 10, 9, 8, 9, 9, 9, 9, 11];

fn widths() -> Vec<Constraint> {
    COLUMN_WIDTHS
        .iter()
        .map(|&w| Constraint::Length(u16::try_from(w).unwrap_or(u16::MAX)))
        .collect()
}

fn cell_text(column: usize, text: &str) -> String {
    if column < 2 {
        text.to_string()
    } else {
        align_right(text, COLUMN_WIDTHS[column])
    }
}

pub fn render(frame: &mut Frame, rect: Rect, table: &mut StockTable) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(format!(" {} ({}) ", t!("StockTable.title"), table.len()));
    frame.render_widget(block, rect);

    let inner = rect.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });

    if table.is_empty() {
        frame.render_widget(
            Paragraph::new(t!("StockTable.empty"))
                .style(styles::dark_gray())
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let header = Row::new(
        TABLE_COLUMNS
            .iter()
            .enumerate()
            .map(|(column, name)| Cell::from(cell_text(column, name)).style(styles::header())),
    );

    let rows: Vec<Row> = table
        .rows()
        .iter()
        .map(|row| {
            Row::new(
                row.cells
                    .iter()
                    .enumerate()
                    .map(|(column, text)| Cell::from(cell_text(column, text))),
            )
            .style(styles::signal(row.color))
        })
        .collect();

    let highlight_style = table
        .selected()
        .map(|row| styles::signal(row.color).add_modifier(Modifier::REVERSED))
        .unwrap_or_default();

    let widths = widths();
    let len = table.len();
    let position = table.state.selected().unwrap_or(0);
    let widget = Table::new(rows)
        .header(header)
        .highlight_style(highlight_style)
        .widths(&widths)
        .column_spacing(1);
    frame.render_stateful_widget(widget, inner, &mut table.state);

    let mut scrollbar_state = ScrollbarState::new(len).position(position);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(None)
        .end_symbol(None);
    frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
}
