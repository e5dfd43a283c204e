use serde::{Deserialize, Serialize};

/// Width thresholds matching the stylesheet media queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub xs_max: f64,
    pub sm_max: f64,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            xs_max: 767.0,
            sm_max: 991.0,
        }
    }
}

impl Breakpoints {
    pub fn width_class(&self, width: f64) -> WidthClass {
        if width <= self.xs_max {
            WidthClass::Narrow
        } else {
            WidthClass::Wide
        }
    }
}

/// Device class as reported by the host (user-agent sniffing or similar).
/// Distinct from [`WidthClass`]: a desktop window can be narrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    NonMobile,
}

impl DeviceClass {
    pub fn is_mobile(self) -> bool {
        matches!(self, Self::Mobile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthClass {
    Narrow,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

/// Read-only geometry queries answered by the host page.
pub trait Viewport: Send {
    fn size(&self) -> ViewportSize;
    fn scroll_top(&self) -> f64;
    /// Vertical offset of a section's top edge from the document top.
    fn section_top(&self, section: &str) -> Option<f64>;
    fn section_height(&self, section: &str) -> Option<f64>;
    /// Current rendered height of the main menu.
    fn menu_height(&self) -> f64;
}
