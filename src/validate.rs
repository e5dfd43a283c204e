use std::sync::LazyLock;

use regex::Regex;

pub const MSG_SUCCESS: &str = "success";
pub const MSG_REQUIRED: &str = "This field is required";
pub const MSG_INVALID_CHARS: &str = "Invalid characters found.";
pub const MSG_INVALID_EMAIL: &str = "Please enter a valid email address.";

/// Letters, digits, space, period and hyphen only.
static TEXT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9 .\-]+$").expect("text pattern"));

/// RFC-5322-lite: dot-atom or quoted local part, dotted labels with a
/// 2+ letter TLD, or a bracketed IPv4 literal.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern")
});

/// Digits, spaces, parentheses, hyphens, optional leading `+`.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?\+?[\d\(\-\s\)]+$").expect("phone pattern"));

/// Closed set of field validation rules, parsed from the page document's
/// rule attribute strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationRule {
    #[default]
    None,
    NonEmpty,
    Text,
    Email,
    Phone,
}

impl ValidationRule {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "non-empty" => Ok(Self::NonEmpty),
            "string" => Ok(Self::Text),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            other => anyhow::bail!("unsupported validation rule: {other}"),
        }
    }
}

/// Outcome of validating one field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    Ok,
    Err(&'static str),
}

impl FieldCheck {
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn error(self) -> Option<&'static str> {
        match self {
            Self::Ok => None,
            Self::Err(message) => Some(message),
        }
    }

    /// The per-field message: the `"success"` sentinel or the error text.
    pub fn message(self) -> &'static str {
        match self {
            Self::Ok => MSG_SUCCESS,
            Self::Err(message) => message,
        }
    }
}

/// Validates a raw field value against its rule. Pure: the result depends
/// only on the arguments. Values are trimmed first; an empty value passes
/// every rule unless the field is required.
pub fn validate(rule: ValidationRule, required: bool, raw: &str) -> FieldCheck {
    let value = raw.trim();

    if value.is_empty() {
        return if required {
            FieldCheck::Err(MSG_REQUIRED)
        } else {
            FieldCheck::Ok
        };
    }

    match rule {
        ValidationRule::None | ValidationRule::NonEmpty => FieldCheck::Ok,
        ValidationRule::Text => {
            if TEXT_PATTERN.is_match(value) {
                FieldCheck::Ok
            } else {
                FieldCheck::Err(MSG_INVALID_CHARS)
            }
        }
        ValidationRule::Email => {
            if EMAIL_PATTERN.is_match(value) {
                FieldCheck::Ok
            } else {
                FieldCheck::Err(MSG_INVALID_EMAIL)
            }
        }
        ValidationRule::Phone => {
            if PHONE_PATTERN.is_match(value) {
                FieldCheck::Ok
            } else {
                FieldCheck::Err(MSG_INVALID_CHARS)
            }
        }
    }
}
