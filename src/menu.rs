use crate::viewport::WidthClass;

/// Result of a mobile menu toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuToggle {
    Opened,
    Closed,
    /// Toggling only applies on narrow viewports.
    NotApplicable,
}

/// Last state explicitly set while the viewport was narrow. `Untouched`
/// means the stylesheet default applies: visible on wide viewports,
/// hidden on narrow ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum MenuMemory {
    #[default]
    Untouched,
    OpenedOnNarrow,
    ClosedOnNarrow,
}

/// View collaborator for the menu and the page chrome around it.
pub trait MenuView: Send {
    /// Animated open (mobile slide-down).
    fn slide_open(&mut self);
    /// Animated close (mobile slide-up).
    fn slide_closed(&mut self);
    /// Non-animated visibility, used when the viewport class changes.
    fn set_visible(&mut self, visible: bool);
    fn set_active_item(&mut self, menu_item: Option<&str>);
    /// The "top" shortcut icon inside the menu, highlighted while the
    /// first section is active.
    fn set_top_icon_active(&mut self, active: bool);
    /// The go-to-top icon shown once the page is scrolled past the first
    /// viewport height.
    fn set_go_to_top_visible(&mut self, visible: bool);
}

#[derive(Debug, Default)]
pub struct MobileMenu {
    memory: MenuMemory,
}

impl MobileMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, width: WidthClass) -> bool {
        match self.memory {
            MenuMemory::Untouched => width == WidthClass::Wide,
            MenuMemory::OpenedOnNarrow => true,
            MenuMemory::ClosedOnNarrow => false,
        }
    }

    /// Toggles the menu. No-op on wide viewports.
    pub fn toggle(&mut self, width: WidthClass, view: &mut dyn MenuView) -> MenuToggle {
        if width == WidthClass::Wide {
            return MenuToggle::NotApplicable;
        }

        if self.is_open(width) {
            self.memory = MenuMemory::ClosedOnNarrow;
            view.slide_closed();
            MenuToggle::Closed
        } else {
            self.memory = MenuMemory::OpenedOnNarrow;
            view.slide_open();
            MenuToggle::Opened
        }
    }

    /// Closes the menu if it is open on a narrow viewport. Used when a
    /// navigation starts from a menu tap.
    pub fn close_if_open(&mut self, width: WidthClass, view: &mut dyn MenuView) -> bool {
        if width == WidthClass::Narrow && self.is_open(width) {
            self.memory = MenuMemory::ClosedOnNarrow;
            view.slide_closed();
            return true;
        }
        false
    }

    /// Reconciles visibility after the viewport crossed (or stayed on
    /// either side of) the narrow/wide threshold. A menu left closed on a
    /// narrow viewport must become visible again on a wide one; on narrow
    /// viewports the last explicit state is preserved.
    pub fn reconcile(&self, width: WidthClass, view: &mut dyn MenuView) {
        match (width, self.memory) {
            (WidthClass::Wide, MenuMemory::ClosedOnNarrow) => view.set_visible(true),
            (WidthClass::Narrow, MenuMemory::ClosedOnNarrow) => view.set_visible(false),
            (WidthClass::Narrow, MenuMemory::OpenedOnNarrow) => view.set_visible(true),
            _ => {}
        }
    }
}
