use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::document::PageModel;
use crate::viewport::DeviceClass;

pub const DEFAULT_OVERLAY_OPACITY: f64 = 0.35;

/// Page-wide policy for background crossfades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundSettings {
    /// Change the background on mobile devices.
    pub change_on_mobile: bool,
    /// Change the background on tablet and desktop devices.
    pub change_on_nonmobile: bool,
    /// Set to false when the host provides its own background (css, video).
    pub use_script: bool,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            change_on_mobile: false,
            change_on_nonmobile: true,
            use_script: true,
        }
    }
}

impl BackgroundSettings {
    pub fn change_allowed(&self, device: DeviceClass) -> bool {
        match device {
            DeviceClass::Mobile => self.change_on_mobile,
            DeviceClass::NonMobile => self.change_on_nonmobile,
        }
    }
}

/// One requested crossfade to a new background image.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossfade {
    pub src: String,
    pub fade: Duration,
    /// Overlay opacity, or `None` when the page overlay is disabled.
    pub overlay_opacity: Option<f64>,
}

/// View collaborator that performs the actual crossfade.
pub trait BackgroundPresenter: Send {
    fn crossfade(&mut self, request: &Crossfade);
    /// Prefetch image sources so later crossfades do not flash.
    fn preload(&mut self, sources: &[String]);
}

/// Every declared section background, for prefetching.
pub fn preload_sources(model: &PageModel) -> Vec<String> {
    model
        .sections()
        .iter()
        .filter_map(|section| section.custom_background.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_changes_on_nonmobile_only() {
        let settings = BackgroundSettings::default();
        assert!(!settings.change_allowed(DeviceClass::Mobile));
        assert!(settings.change_allowed(DeviceClass::NonMobile));
    }

    #[test]
    fn mobile_change_can_be_enabled() {
        let settings = BackgroundSettings {
            change_on_mobile: true,
            ..BackgroundSettings::default()
        };
        assert!(settings.change_allowed(DeviceClass::Mobile));
    }
}
