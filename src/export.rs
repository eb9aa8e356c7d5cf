use std::path::PathBuf;

use anyhow::Context;

use crate::{data::fields::TABLE_COLUMNS, render::sync::StockTable, ui::text::center};

/// Display columns each exported field is centered in
pub const EXPORT_FIELD_WIDTH: usize = 10;

/// Destination of copied table text
pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> anyhow::Result<()>;

    /// Where the text went, shown in the status footer
    fn describe(&self) -> String;
}

/// Writes the copied text to a file, overwriting the previous copy
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ClipboardSink for FileSink {
    fn set_text(&self, text: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        std::fs::write(&self.path, text).with_context(|| format!("write {}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Header line plus one line per row, every field centered to [`EXPORT_FIELD_WIDTH`]
pub fn clipboard_text(table: &StockTable) -> String {
    let mut content: String = TABLE_COLUMNS
        .iter()
        .map(|name| center(name, EXPORT_FIELD_WIDTH))
        .collect();
    content.push('\n');

    for row in table.rows() {
        content.extend(row.cells.iter().map(|cell| center(cell, EXPORT_FIELD_WIDTH)));
        content.push('\n');
    }

    content
}

/// Copy the table into `sink`, returning the sink description
pub fn copy_table(table: &StockTable, sink: &dyn ClipboardSink) -> anyhow::Result<String> {
    let text = clipboard_text(table);
    tracing::debug!(rows = table.len(), "复制个股表格\n{text}");
    sink.set_text(&text)?;
    Ok(sink.describe())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{
        data::{ColorState, StockRow},
        ui::text::display_width,
    };

    #[derive(Default)]
    struct MemorySink(Mutex<String>);

    impl ClipboardSink for MemorySink {
        fn set_text(&self, text: &str) -> anyhow::Result<()> {
            *self.0.lock().unwrap() = text.to_string();
            Ok(())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    fn stock_row(code: &str, name: &str) -> StockRow {
        let mut cells = vec![code.to_string(), name.to_string()];
        cells.extend(["1700", "0.59", "1690", "1690", "1705", "1688", "12.30亿"].map(String::from));
        StockRow {
            cells,
            color: ColorState::Up,
        }
    }

    #[test]
    fn two_rows_give_three_padded_lines() {
        let mut table = StockTable::default();
        table.apply_stock(vec![stock_row("600519", "贵州茅台"), stock_row("000858", "五粮液")]);

        let text = clipboard_text(&table);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert_eq!(display_width(line), EXPORT_FIELD_WIDTH * TABLE_COLUMNS.len());
        }
        assert!(lines[0].starts_with("   代码   "));
        assert!(lines[1].starts_with("  600519  "));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn empty_table_exports_header_only() {
        let text = clipboard_text(&StockTable::default());
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn copy_hands_text_to_sink() {
        let mut table = StockTable::default();
        table.apply_stock(vec![stock_row("600519", "贵州茅台")]);
        let sink = MemorySink::default();

        let target = copy_table(&table, &sink).unwrap();
        assert_eq!(target, "memory");
        assert_eq!(*sink.0.lock().unwrap(), clipboard_text(&table));
    }

    #[test]
    fn file_sink_writes_text() {
        let path = std::env::temp_dir()
            .join(format!("ashare-panel-export-{}", std::process::id()))
            .join("export.txt");
        let sink = FileSink::new(&path);
        sink.set_text("hello\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
        _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
