use ratatui::layout::{Margin, Rect};

/// A `width` × `height` area in the middle of `r`, clamped to `r`
pub fn centered(width: u16, height: u16, r: Rect) -> Rect {
    r.inner(&Margin {
        horizontal: r.width.saturating_sub(width) / 2,
        vertical: r.height.saturating_sub(height) / 2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered(20, 4, area), Rect::new(10, 3, 20, 4));
        assert_eq!(centered(80, 40, area), area);
    }
}
