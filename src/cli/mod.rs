use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;

use crate::config::{DEFAULT_OUT_FILE, DEFAULT_SCHEMA_PATTERN, expand_schema_globs};
use crate::operation::root_operations;
use crate::render::Target;
use crate::schema::Schema;

mod generate;
mod operations;
mod render;

#[derive(Debug, Clone, Copy, ValueEnum, Serialize, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "clientgen")]
#[command(about = "Generate typed GraphQL clients from schema files", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Schema files or glob patterns (repeatable or comma-separated; `**` recurses).
    #[arg(
        long,
        short = 's',
        global = true,
        env = "CLIENTGEN_SCHEMA",
        value_delimiter = ',',
        default_value = DEFAULT_SCHEMA_PATTERN
    )]
    pub schema: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub output: OutputFormat,

    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    /// Destination for the generated client.
    #[arg(
        long,
        short = 'o',
        global = true,
        env = "CLIENTGEN_OUT",
        default_value = DEFAULT_OUT_FILE
    )]
    pub out: PathBuf,

    #[arg(long, value_enum, default_value_t = Target::Rust, global = true)]
    pub target: Target,

    /// Fail if the destination differs from what would be generated.
    #[arg(long, global = true, default_value_t = false, conflicts_with = "stdout")]
    pub check: bool,

    /// Print the generated client instead of writing it.
    #[arg(long, global = true, default_value_t = false)]
    pub stdout: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate the client (default).
    Generate,
    /// List the operations derived from the schema's root fields.
    Operations,
    /// Print the operation for one root field (`user` or `Query.user`).
    Show { field: String },
    Version,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.command.clone().unwrap_or(Command::Generate);
    if let Command::Version = command {
        println!("clientgen {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let schema = load_schema(&cli)?;
    let operations = root_operations(&schema);
    debug!(operations = operations.len(), "built root operations");

    match command {
        Command::Generate => generate::run_generate(&cli, &schema, &operations),
        Command::Operations => operations::run_operations(&cli, &operations),
        Command::Show { field } => operations::run_show(&cli, &operations, &field),
        Command::Version => unreachable!(),
    }
}

fn load_schema(cli: &Cli) -> anyhow::Result<Schema> {
    let files = expand_schema_globs(&cli.schema)?;
    if files.is_empty() {
        anyhow::bail!("no schema files matched {}", cli.schema.join(", "));
    }
    debug!(files = ?files, "loading schema");
    Schema::load(&files).context("error processing graphql schemas")
}

fn should_color(cli: &Cli) -> bool {
    match cli.color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    }
}
