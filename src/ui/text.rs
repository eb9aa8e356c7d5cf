use unicode_width::UnicodeWidthStr;

/// Columns `text` occupies on screen, wide (CJK) characters counting as two
pub fn display_width(text: &str) -> usize {
    text.width()
}

/// Extra columns taken by wide characters compared to one column per char
fn wide_extra(text: &str) -> usize {
    display_width(text).saturating_sub(text.chars().count())
}

pub fn align_right(text: &str, width: usize) -> String {
    format!(
        "{text:>width$}",
        width = width.saturating_sub(wide_extra(text))
    )
}

/// Center `text` in `width` display columns; the odd pad column goes right
pub fn center(text: &str, width: usize) -> String {
    format!(
        "{text:^width$}",
        width = width.saturating_sub(wide_extra(text))
    )
}
