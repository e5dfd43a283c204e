use std::time::Duration;

use chrono::Utc;

/// Delay before a freshly issued challenge image is revealed, so the
/// stale image never shows while the new one is still loading.
pub const REVEAL_DELAY: Duration = Duration::from_millis(500);

pub const DEFAULT_IMAGE_PATH: &str = "assets/captcha/captcha_img.php";

/// One server-rendered challenge image reference. The timestamp query
/// parameter busts every cache between the page and the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptchaChallenge {
    pub image_url: String,
}

/// Issues challenge references with a strictly increasing cache-busting
/// stamp: re-issuing within the same millisecond still produces a new
/// parameter.
#[derive(Debug, Clone)]
pub struct CaptchaIssuer {
    image_path: String,
    last_stamp: i64,
}

impl CaptchaIssuer {
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            last_stamp: 0,
        }
    }

    pub fn issue(&mut self) -> CaptchaChallenge {
        self.issue_at(Utc::now().timestamp_millis())
    }

    pub fn issue_at(&mut self, now_ms: i64) -> CaptchaChallenge {
        let stamp = now_ms.max(self.last_stamp.saturating_add(1));
        self.last_stamp = stamp;
        CaptchaChallenge {
            image_url: format!("{}?t={stamp}", self.image_path),
        }
    }
}

impl Default for CaptchaIssuer {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_url_carries_timestamp() {
        let mut issuer = CaptchaIssuer::new("assets/captcha/img.php");
        let challenge = issuer.issue_at(1_700_000_000_000);
        assert_eq!(
            challenge.image_url,
            "assets/captcha/img.php?t=1700000000000"
        );
    }

    #[test]
    fn same_instant_still_produces_fresh_parameter() {
        let mut issuer = CaptchaIssuer::default();
        let first = issuer.issue_at(1_700_000_000_000);
        let second = issuer.issue_at(1_700_000_000_000);
        assert_ne!(first, second);
    }

    #[test]
    fn clock_going_backwards_never_reuses_a_stamp() {
        let mut issuer = CaptchaIssuer::default();
        let first = issuer.issue_at(2_000);
        let second = issuer.issue_at(1_000);
        assert_ne!(first, second);
    }
}
