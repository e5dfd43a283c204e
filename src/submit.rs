use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::captcha::CaptchaChallenge;
use crate::cli::SubmitArgs;
use crate::document;
use crate::form::{BannerKind, FormController, FormView, ResponseCode, SubmitOutcome};
use crate::transport::HttpTransport;

pub async fn run(args: SubmitArgs) -> anyhow::Result<()> {
    let path = PathBuf::from(&args.page);
    let doc = document::load(&path)?;

    let decl = doc
        .forms
        .iter()
        .find(|form| form.id == args.form)
        .with_context(|| format!("form not found in page document: {}", args.form))?;

    let mut form = FormController::from_decl(decl, Box::new(ConsoleFormView))
        .with_context(|| format!("build form: {}", args.form))?;

    for raw in &args.fields {
        let (name, value) = raw
            .split_once('=')
            .with_context(|| format!("invalid --field (expected name=value): {raw}"))?;
        if form.field(name).is_none() {
            anyhow::bail!("form {} has no field named {name}", args.form);
        }
        form.set_value(name, value);
    }

    let base_url = Url::parse(&args.base_url).context("parse --base-url")?;
    let transport = HttpTransport::with_base_url(base_url)?;

    match form.submit(&transport).await? {
        SubmitOutcome::Completed(ResponseCode::Success) => Ok(()),
        SubmitOutcome::Completed(code) => {
            anyhow::bail!("submission not accepted: {code:?}")
        }
        SubmitOutcome::Rejected => anyhow::bail!("form rejected by local validation"),
        SubmitOutcome::NoEndpoint => anyhow::bail!("form {} has no endpoint", args.form),
        SubmitOutcome::InFlight => unreachable!("one-shot submit"),
    }
}

/// Prints the pipeline's view effects to stdout, one line each.
struct ConsoleFormView;

impl FormView for ConsoleFormView {
    fn clear_field_message(&mut self, _field: &str) {}

    fn show_field_error(&mut self, field: &str, message: &str) {
        println!("{field}: {message}");
    }

    fn clear_messages(&mut self) {}

    fn show_banner(&mut self, kind: BannerKind, message: &str, _auto_hide: Option<Duration>) {
        match kind {
            BannerKind::Success => println!("{message}"),
            BannerKind::Error => println!("error: {message}"),
        }
    }

    fn show_loader(&mut self) {}

    fn hide_loader(&mut self) {}

    fn set_captcha_image(&mut self, challenge: &CaptchaChallenge, _reveal_after: Duration) {
        tracing::debug!(image_url = %challenge.image_url, "captcha re-issued");
    }

    fn clear_values(&mut self) {}
}
