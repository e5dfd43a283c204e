use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    onepager::logging::init().context("init logging")?;

    let cli = onepager::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        onepager::cli::Command::Check(args) => {
            onepager::check::run(args).context("check")?;
        }
        onepager::cli::Command::Submit(args) => {
            onepager::submit::run(args).await.context("submit")?;
        }
    }

    Ok(())
}
