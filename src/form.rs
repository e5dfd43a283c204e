use std::time::Duration;

use crate::captcha::{CaptchaChallenge, CaptchaIssuer, REVEAL_DELAY};
use crate::document::FormDecl;
use crate::transport::SubmissionTransport;
use crate::validate::{self, FieldCheck, ValidationRule};

/// Field name that holds the user-entered CAPTCHA text.
pub const CAPTCHA_FIELD: &str = "captcha";

/// How long the success banner stays up before auto-hiding.
pub const BANNER_AUTO_HIDE: Duration = Duration::from_secs(10);

/// The submission endpoint's response protocol: a single lowercase token
/// body. Anything else degrades to `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    Captcha,
    Incomplete,
    Error,
}

impl ResponseCode {
    pub fn from_body(body: &str) -> Self {
        match body.trim() {
            "success" => Self::Success,
            "captcha" => Self::Captcha,
            "incomplete" => Self::Incomplete,
            _ => Self::Error,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "Form submitted successfully.",
            Self::Captcha => "Incorrect text entered. (Case-sensitive)",
            Self::Incomplete => "Please fill in all required fields.",
            Self::Error => "An error occured. Please try again later.",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// View collaborator for one form: inline messages, the general banner,
/// the loading indicator and the CAPTCHA image.
pub trait FormView: Send {
    fn clear_field_message(&mut self, field: &str);
    fn show_field_error(&mut self, field: &str, message: &str);
    /// Clears all inline messages and the general banner.
    fn clear_messages(&mut self);
    fn show_banner(&mut self, kind: BannerKind, message: &str, auto_hide: Option<Duration>);
    fn show_loader(&mut self);
    fn hide_loader(&mut self);
    /// Swaps in a fresh challenge image; the view reveals it only after
    /// `reveal_after`.
    fn set_captcha_image(&mut self, challenge: &CaptchaChallenge, reveal_after: Duration);
    fn clear_values(&mut self);
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub rule: ValidationRule,
    pub required: bool,
    pub value: String,
    /// Result of the most recent validation, if any.
    pub last_check: Option<FieldCheck>,
}

/// Outcome of one submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submit of this form is already in flight.
    InFlight,
    /// The form has no configured endpoint; refused silently.
    NoEndpoint,
    /// Local validation failed; no request was issued.
    Rejected,
    Completed(ResponseCode),
}

pub struct FormController {
    id: String,
    endpoint: Option<String>,
    fields: Vec<Field>,
    captcha: Option<CaptchaIssuer>,
    view: Box<dyn FormView>,
    submitting: bool,
    visible: bool,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint)
            .field("fields", &self.fields)
            .field("submitting", &self.submitting)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl FormController {
    pub fn from_decl(decl: &FormDecl, view: Box<dyn FormView>) -> anyhow::Result<Self> {
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            let rule = match field.rule.as_deref() {
                Some(raw) => ValidationRule::parse(raw)?,
                None => ValidationRule::None,
            };
            fields.push(Field {
                name: field.name.clone(),
                rule,
                required: field.required,
                value: String::new(),
                last_check: None,
            });
        }

        Ok(Self {
            id: decl.id.clone(),
            endpoint: decl.endpoint.clone(),
            fields,
            captcha: decl.captcha.then(CaptchaIssuer::default),
            view,
            submitting: false,
            visible: true,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    /// Sets a value without running validation, the way autofill writes
    /// into fields without firing change events.
    pub fn set_value(&mut self, name: &str, value: &str) {
        if let Some(field) = self.field_mut(name) {
            field.value = value.to_owned();
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Change-event entry point: stores the value and validates it,
    /// surfacing an inline error. Validation is skipped while the trimmed
    /// value is empty; the required check waits for submit.
    pub fn field_changed(&mut self, name: &str, value: &str) {
        let Some(field) = self.field_mut(name) else {
            return;
        };
        field.value = value.to_owned();
        let rule = field.rule;
        let required = field.required;
        let trimmed_empty = field.value.trim().is_empty();

        self.view.clear_field_message(name);
        if trimmed_empty {
            if let Some(field) = self.field_mut(name) {
                field.last_check = None;
            }
            return;
        }

        let check = validate::validate(rule, required, value);
        if let Some(message) = check.error() {
            self.view.show_field_error(name, message);
        }
        if let Some(field) = self.field_mut(name) {
            field.last_check = Some(check);
        }
    }

    /// Serialized payload in declaration order.
    pub fn payload(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect()
    }

    /// Runs the full submit pipeline: re-validates every field regardless
    /// of prior change events, posts the payload, maps the response token
    /// and applies the protocol side effects. The CAPTCHA is re-issued
    /// after every attempt that reaches the network.
    pub async fn submit(
        &mut self,
        transport: &dyn SubmissionTransport,
    ) -> anyhow::Result<SubmitOutcome> {
        if self.submitting {
            tracing::debug!(form = %self.id, "submit ignored; already in flight");
            return Ok(SubmitOutcome::InFlight);
        }

        self.view.show_loader();

        let Some(endpoint) = self.endpoint.clone() else {
            self.view.hide_loader();
            return Ok(SubmitOutcome::NoEndpoint);
        };

        self.view.clear_messages();

        let mut rejected = false;
        for index in 0..self.fields.len() {
            let field = &self.fields[index];
            let check = validate::validate(field.rule, field.required, &field.value);
            let name = field.name.clone();
            self.fields[index].last_check = Some(check);
            if let Some(message) = check.error() {
                self.view.show_field_error(&name, message);
                rejected = true;
            }
        }
        if rejected {
            self.view.hide_loader();
            return Ok(SubmitOutcome::Rejected);
        }

        self.submitting = true;
        let result = transport.submit(&endpoint, &self.payload()).await;
        self.submitting = false;
        self.view.hide_loader();

        let code = match result {
            Ok(body) => ResponseCode::from_body(&body),
            Err(err) => {
                tracing::debug!(form = %self.id, ?err, "submission transport failed");
                ResponseCode::Error
            }
        };

        match code {
            ResponseCode::Success => {
                self.view
                    .show_banner(BannerKind::Success, code.message(), Some(BANNER_AUTO_HIDE));
                self.clear_values();
            }
            ResponseCode::Captcha => {
                self.view.show_field_error(CAPTCHA_FIELD, code.message());
            }
            ResponseCode::Incomplete | ResponseCode::Error => {
                self.view.show_banner(BannerKind::Error, code.message(), None);
            }
        }

        self.reset_captcha();
        tracing::debug!(form = %self.id, ?code, "submit attempt completed");
        Ok(SubmitOutcome::Completed(code))
    }

    fn clear_values(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
            field.last_check = None;
        }
        self.view.clear_values();
    }

    /// Issues a fresh challenge, clears the entered CAPTCHA text and
    /// hands the image to the view with the reveal delay. Only applies to
    /// visible forms with a CAPTCHA; idempotent otherwise.
    pub fn reset_captcha(&mut self) {
        if !self.visible {
            return;
        }
        let Some(issuer) = self.captcha.as_mut() else {
            return;
        };
        let challenge = issuer.issue();
        if let Some(field) = self.field_mut(CAPTCHA_FIELD) {
            field.value.clear();
            field.last_check = None;
        }
        self.view.set_captcha_image(&challenge, REVEAL_DELAY);
    }

    /// Full reset: values, messages, CAPTCHA.
    pub fn reset(&mut self) {
        self.clear_values();
        self.view.clear_messages();
        self.reset_captcha();
    }
}

/// All validated forms on the page, including ones living inside popups.
#[derive(Default)]
pub struct FormRegistry {
    forms: Vec<FormController>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, form: FormController) {
        self.forms.push(form);
    }

    pub fn form(&self, id: &str) -> Option<&FormController> {
        self.forms.iter().find(|form| form.id() == id)
    }

    pub fn form_mut(&mut self, id: &str) -> Option<&mut FormController> {
        self.forms.iter_mut().find(|form| form.id() == id)
    }

    /// Resets the CAPTCHA of one form, or of every form when no target is
    /// given. Hidden forms are skipped either way.
    pub fn reset_captcha(&mut self, target: Option<&str>) {
        for form in &mut self.forms {
            if target.is_none_or(|id| id == form.id()) {
                form.reset_captcha();
            }
        }
    }

    /// A popup containing this form became visible: the form starts from
    /// a clean slate with a fresh CAPTCHA.
    pub fn popup_shown(&mut self, form: &str) {
        if let Some(form) = self.form_mut(form) {
            form.set_visible(true);
            form.reset();
        }
    }

    /// The popup closed: hide its form and re-issue the CAPTCHAs of the
    /// forms still on the page.
    pub fn popup_hidden(&mut self, form: &str) {
        if let Some(form) = self.form_mut(form) {
            form.set_visible(false);
        }
        self.reset_captcha(None);
    }
}
