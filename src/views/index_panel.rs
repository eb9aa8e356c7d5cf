use ratatui::{
    prelude::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::{
    data::fields::INDEX_COLUMNS,
    render::IndexPanel,
    ui::{styles, text::align_right},
};

const COLUMN_WIDTH: u16 = 12;

/// Rows the panel needs, borders and header included
pub fn height(panel: &IndexPanel) -> u16 {
    u16::try_from(panel.row_count()).unwrap_or(u16::MAX).saturating_add(3)
}

pub fn render(frame: &mut Frame, rect: Rect, panel: &IndexPanel) {
    const WIDTHS: [Constraint; INDEX_COLUMNS.len()] =
        [Constraint::Length(COLUMN_WIDTH); INDEX_COLUMNS.len()];

    let header = Row::new(INDEX_COLUMNS.iter().enumerate().map(|(column, name)| {
        let text = if column == 0 {
            (*name).to_string()
        } else {
            align_right(name, usize::from(COLUMN_WIDTH))
        };
        Cell::from(text).style(styles::header())
    }));

    let rows = panel.grid().map(|cells| {
        Row::new(cells.into_iter().enumerate().map(|(column, cell)| {
            let text = if column == 0 {
                cell.text.clone()
            } else {
                align_right(&cell.text, usize::from(COLUMN_WIDTH))
            };
            Cell::from(text).style(styles::signal(cell.color))
        }))
    });

    let table = Table::new(rows)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border())
                .title(format!(" {} ", t!("IndexPanel.title"))),
        )
        .widths(&WIDTHS)
        .column_spacing(1);

    frame.render_widget(table, rect);
}
