use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Check(CheckArgs),
    Submit(SubmitArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Input path to the page document (JSON).
    #[arg(long)]
    pub page: String,
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Input path to the page document (JSON).
    #[arg(long)]
    pub page: String,

    /// Id of the form to submit (must exist in the page document).
    #[arg(long)]
    pub form: String,

    /// Base URL the form's endpoint is resolved against.
    #[arg(long)]
    pub base_url: String,

    /// Field value as name=value (repeatable).
    #[arg(long = "field", value_name = "NAME=VALUE")]
    pub fields: Vec<String>,
}
