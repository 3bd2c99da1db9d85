/// Responsive breakpoints and the details side panel
///
/// The panel is forced closed when the window shrinks to one of the two
/// smallest tiers. Growing the window again does not reopen it.
use log::info;

/// Window widths (logical pixels) at which a new tier starts
pub const BREAKPOINTS: [f32; 6] = [360.0, 600.0, 900.0, 1200.0, 1800.0, 2400.0];

/// Tiers at or below this index are too narrow for the panel
const NARROW_TIER: usize = 1;

/// Index of the tier a window of `width` falls into (0 = narrowest)
pub fn breakpoint_index(width: f32) -> usize {
    BREAKPOINTS.iter().filter(|&&bp| width >= bp).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailsPanel {
    visible: bool,
}

impl DetailsPanel {
    pub fn new(visible: bool) -> Self {
        Self { visible }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// React to a breakpoint change. Returns true if the panel was closed.
    pub fn on_breakpoint(&mut self, index: usize) -> bool {
        if index <= NARROW_TIER && self.visible {
            self.visible = false;
            info!("📐 Window narrowed to tier {}; hiding details panel", index);
            return true;
        }
        false
    }
}
