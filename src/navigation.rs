use std::time::Duration;

use crate::background::{self, BackgroundPresenter, BackgroundSettings, Crossfade};
use crate::document::PageModel;
use crate::menu::{MenuToggle, MenuView, MobileMenu};
use crate::viewport::{Breakpoints, DeviceClass, Viewport};

/// Timing and geometry knobs for the controller. The defaults mirror the
/// stock theme; hosts with different animation curves tune them here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavTuning {
    /// Duration of an animated scroll to a section.
    pub scroll_duration: Duration,
    /// Crossfade duration for click-driven activation.
    pub click_fade: Duration,
    /// Crossfade duration for scroll-driven activation (faster, the
    /// gesture already moved the page).
    pub scroll_fade: Duration,
    /// Fraction of the viewport height subtracted from each section's
    /// top edge, so sections activate slightly before the exact boundary.
    pub buffer_fraction: f64,
}

impl Default for NavTuning {
    fn default() -> Self {
        Self {
            scroll_duration: Duration::from_millis(1500),
            click_fade: Duration::from_millis(1500),
            scroll_fade: Duration::from_millis(550),
            buffer_fraction: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavConfig {
    pub device: DeviceClass,
    pub background: BackgroundSettings,
    pub breakpoints: Breakpoints,
}

/// The controller's position in the activation state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    Idle,
    /// An animated scroll is in flight; passive activation is suppressed
    /// until it completes or is superseded.
    ScrollingToTarget,
    Active(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTrigger {
    Click,
    Scroll,
}

/// Result of a navigation request. Misses are reported, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Started,
    AlreadyActive,
    NotFound,
    /// The link leaves the page; the default action applies.
    ExternalLink,
}

/// Animated scroll collaborator. Starting a new animation must stop the
/// current one; a stopped animation's completion must not be delivered.
/// The `token` identifies the animation and is handed back through
/// [`NavController::animation_complete`].
pub trait ScrollAnimator: Send {
    fn animate_to(&mut self, offset: f64, duration: Duration, token: u64);
    fn stop(&mut self);
}

#[derive(Debug)]
struct PendingNav {
    target: String,
    menu_item: Option<String>,
    change_background: bool,
}

pub struct NavController {
    model: PageModel,
    config: NavConfig,
    tuning: NavTuning,
    state: NavState,
    menu: MobileMenu,
    pending: Option<PendingNav>,
    /// Generation counter for animated scrolls; completions carrying a
    /// stale token are dropped.
    generation: u64,
    default_bg_set: bool,
    go_to_top_visible: bool,
    animator: Box<dyn ScrollAnimator>,
    background: Box<dyn BackgroundPresenter>,
    menu_view: Box<dyn MenuView>,
    viewport: Box<dyn Viewport>,
}

impl NavController {
    pub fn new(
        model: PageModel,
        config: NavConfig,
        tuning: NavTuning,
        animator: Box<dyn ScrollAnimator>,
        background: Box<dyn BackgroundPresenter>,
        menu_view: Box<dyn MenuView>,
        viewport: Box<dyn Viewport>,
    ) -> Self {
        Self {
            model,
            config,
            tuning,
            state: NavState::Idle,
            menu: MobileMenu::new(),
            pending: None,
            generation: 0,
            default_bg_set: false,
            go_to_top_visible: false,
            animator,
            background,
            menu_view,
            viewport,
        }
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn active_section(&self) -> Option<&str> {
        match &self.state {
            NavState::Active(id) => Some(id),
            _ => None,
        }
    }

    pub fn scroll_in_progress(&self) -> bool {
        matches!(self.state, NavState::ScrollingToTarget)
    }

    /// Entry point for page load: activate whichever section contains the
    /// current scroll offset and hand the declared backgrounds to the
    /// presenter for prefetching.
    pub fn page_loaded(&mut self) {
        if self.config.background.change_allowed(self.config.device) {
            let sources = background::preload_sources(&self.model);
            if !sources.is_empty() {
                self.background.preload(&sources);
            }
        }
        self.scroll_stopped();
    }

    /// Click on a main menu item. Scroll-enabled items navigate in-page;
    /// the rest keep their default link behavior.
    pub fn menu_click(&mut self, menu_item: &str) -> NavOutcome {
        let Some(item) = self.model.menu_item(menu_item) else {
            return NavOutcome::NotFound;
        };
        if !item.scroll {
            return NavOutcome::ExternalLink;
        }
        let Some(target) = self.model.section_for_menu_item(menu_item) else {
            return NavOutcome::NotFound;
        };
        let target = target.to_owned();
        let change_background = self.config.background.change_allowed(self.config.device);
        self.start_navigation(target, Some(menu_item.to_owned()), change_background)
    }

    /// Click on a generic in-page link (`#section-id`). Anything else is
    /// left to the default action.
    pub fn link_click(&mut self, href: &str) -> NavOutcome {
        let Some(target) = href.strip_prefix('#') else {
            return NavOutcome::ExternalLink;
        };
        if target.is_empty() {
            // A bare "#" placeholder link.
            return NavOutcome::NotFound;
        }
        let target = target.to_owned();
        let menu_item = self
            .model
            .menu_item_for_section(&target)
            .map(str::to_owned);
        self.start_navigation(target, menu_item, true)
    }

    /// Programmatic jump to a section.
    pub fn navigate(&mut self, section: &str) -> NavOutcome {
        let menu_item = self
            .model
            .menu_item_for_section(section)
            .map(str::to_owned);
        self.start_navigation(section.to_owned(), menu_item, true)
    }

    /// Animated scroll back to the first section.
    pub fn scroll_to_top(&mut self) -> NavOutcome {
        let Some(first) = self.model.first_section() else {
            return NavOutcome::NotFound;
        };
        let first = first.id.clone();
        self.navigate(&first)
    }

    fn start_navigation(
        &mut self,
        target: String,
        menu_item: Option<String>,
        change_background: bool,
    ) -> NavOutcome {
        if self.model.section(&target).is_none() {
            tracing::debug!(section = %target, "navigation target not found");
            return NavOutcome::NotFound;
        }
        if self.active_section() == Some(target.as_str()) {
            return NavOutcome::AlreadyActive;
        }
        let Some(mut offset) = self.viewport.section_top(&target) else {
            tracing::debug!(section = %target, "no geometry for navigation target");
            return NavOutcome::NotFound;
        };

        // Navigating from an open mobile menu closes it; the menu's own
        // height no longer pushes the page down once it slides up.
        let width = self.config.breakpoints.width_class(self.viewport.size().width);
        if self.menu.close_if_open(width, self.menu_view.as_mut()) {
            offset -= self.viewport.menu_height();
        }

        self.generation += 1;
        self.pending = Some(PendingNav {
            target: target.clone(),
            menu_item,
            change_background,
        });
        self.state = NavState::ScrollingToTarget;

        self.animator.stop();
        self.animator
            .animate_to(offset, self.tuning.scroll_duration, self.generation);
        tracing::debug!(section = %target, generation = self.generation, "animated scroll started");
        NavOutcome::Started
    }

    /// Completion callback for an animated scroll. Stale tokens belong to
    /// superseded animations and are dropped; their side effects never
    /// run. The scroll session is cleared here and nowhere else.
    pub fn animation_complete(&mut self, token: u64) {
        if token != self.generation {
            tracing::debug!(
                token,
                current = self.generation,
                "stale animation completion ignored"
            );
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };
        self.activate(
            pending.target,
            pending.menu_item,
            NavTrigger::Click,
            pending.change_background,
        );
    }

    /// Scroll gesture ended. Activates the section under the current
    /// offset unless an animated scroll is in flight (the explicit
    /// navigation target wins).
    pub fn scroll_stopped(&mut self) {
        if self.scroll_in_progress() {
            return;
        }
        let Some(target) = self.section_at_scroll_position() else {
            return;
        };
        if self.active_section() == Some(target.as_str()) {
            return;
        }
        let menu_item = self
            .model
            .menu_item_for_section(&target)
            .map(str::to_owned);
        self.activate(target, menu_item, NavTrigger::Scroll, true);
    }

    /// Raw scroll tick: only the go-to-top icon reacts on every tick;
    /// section activation waits for the stop signal.
    pub fn scroll_ticked(&mut self) {
        let visible = self.viewport.scroll_top() >= self.viewport.size().height;
        if visible != self.go_to_top_visible {
            self.go_to_top_visible = visible;
            self.menu_view.set_go_to_top_visible(visible);
        }
    }

    /// Viewport crossed (or moved within) the width classes: reconcile
    /// the mobile menu visibility.
    pub fn viewport_resized(&mut self) {
        let width = self.config.breakpoints.width_class(self.viewport.size().width);
        self.menu.reconcile(width, self.menu_view.as_mut());
    }

    pub fn toggle_menu(&mut self) -> MenuToggle {
        let width = self.config.breakpoints.width_class(self.viewport.size().width);
        self.menu.toggle(width, self.menu_view.as_mut())
    }

    fn section_at_scroll_position(&self) -> Option<String> {
        let buffer = self.tuning.buffer_fraction * self.viewport.size().height;
        let scroll_top = self.viewport.scroll_top();

        for section in self.model.sections() {
            let Some(top) = self.viewport.section_top(&section.id) else {
                continue;
            };
            let height = self.viewport.section_height(&section.id).unwrap_or(0.0);
            let from = top - buffer;
            if scroll_top > from && scroll_top <= from + height {
                return Some(section.id.clone());
            }
        }
        None
    }

    /// The activation side effects, applied as one unit: exactly one
    /// section and menu item end up active, the top icon follows whether
    /// the first section is the target, and at most one crossfade is
    /// requested.
    fn activate(
        &mut self,
        target: String,
        menu_item: Option<String>,
        trigger: NavTrigger,
        change_background: bool,
    ) {
        let menu_item = menu_item.or_else(|| {
            self.model
                .menu_item_for_section(&target)
                .map(str::to_owned)
        });
        self.menu_view.set_active_item(menu_item.as_deref());

        let is_first = self
            .model
            .first_section()
            .is_some_and(|section| section.id == target);
        self.menu_view.set_top_icon_active(is_first);

        let policy_allows = self.config.background.change_allowed(self.config.device);
        if change_background && policy_allows {
            let src = self
                .model
                .section(&target)
                .and_then(|section| section.custom_background.clone())
                .or_else(|| self.model.default_background().map(str::to_owned));
            if let Some(src) = src {
                let fade = match trigger {
                    NavTrigger::Click => self.tuning.click_fade,
                    NavTrigger::Scroll => self.tuning.scroll_fade,
                };
                self.background.crossfade(&Crossfade {
                    src,
                    fade,
                    overlay_opacity: self.model.overlay_opacity(),
                });
                self.default_bg_set = true;
            }
        } else if self.config.background.use_script && !self.default_bg_set {
            // Changes are disabled for this device class, but the page
            // default still has to be put up once.
            if let Some(src) = self.model.default_background().map(str::to_owned) {
                self.background.crossfade(&Crossfade {
                    src,
                    fade: self.tuning.click_fade,
                    overlay_opacity: self.model.overlay_opacity(),
                });
                self.default_bg_set = true;
            }
        }

        tracing::debug!(section = %target, ?trigger, "section activated");
        self.state = NavState::Active(target);
    }
}
