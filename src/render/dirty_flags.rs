use bitflags::bitflags;
use std::time::Instant;

bitflags! {
    /// Which parts of the screen need redrawing
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DirtyFlags: u32 {
        const NONE = 0;
        /// Index labels changed
        const INDEX_PANEL = 0b0000_0001;
        /// Stock rows or selection changed
        const STOCK_TABLE = 0b0000_0010;
        /// Candlestick chart replaced
        const CHART = 0b0000_0100;
        /// Footer (refresh time, in-flight marker, export message)
        const STATUS = 0b0000_1000;
        /// Help popup opened or closed
        const POPUP_HELP = 0b0001_0000;
        /// Navigation bar (clock)
        const NAVBAR = 0b0010_0000;
        const ALL = 0xFFFF_FFFF;
    }
}

impl DirtyFlags {
    #[inline]
    pub fn needs_render(self) -> bool {
        !self.is_empty()
    }

    /// Mark components for a state change
    #[inline]
    #[must_use]
    pub fn mark_state_change(mut self) -> Self {
        self.insert(Self::ALL);
        self
    }
}

/// Tracks pending redraws so idle frames can be skipped
#[derive(Debug)]
pub struct RenderState {
    dirty: DirtyFlags,
    last_render: Instant,
    render_count: u64,
    skip_count: u64,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderState {
    /// Starts dirty so the first frame is drawn
    pub fn new() -> Self {
        Self {
            dirty: DirtyFlags::ALL,
            last_render: Instant::now(),
            render_count: 0,
            skip_count: 0,
        }
    }

    #[inline]
    pub fn needs_render(&self) -> bool {
        self.dirty.needs_render()
    }

    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty.insert(flags);
    }

    #[inline]
    pub fn mark_all_dirty(&mut self) {
        self.dirty = DirtyFlags::ALL;
    }

    /// Clear all dirty flags after a successful render
    #[inline]
    pub fn clear(&mut self) {
        self.dirty = DirtyFlags::NONE;
        self.last_render = Instant::now();
        self.render_count += 1;
    }

    #[inline]
    pub fn skip(&mut self) {
        self.skip_count += 1;
    }

    #[inline]
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Percentage of frames that were skipped
    #[allow(clippy::cast_precision_loss)]
    pub fn efficiency(&self) -> f64 {
        let total = self.render_count + self.skip_count;
        if total == 0 {
            0.0
        } else {
            (self.skip_count as f64 / total as f64) * 100.0
        }
    }

    pub fn stats(&self) -> String {
        format!(
            "渲染次数: {}, 跳过次数: {}, 跳过率: {:.1}%",
            self.render_count,
            self.skip_count,
            self.efficiency()
        )
    }
}
