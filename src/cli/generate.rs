use anyhow::Context;
use clap::ValueEnum;
use tracing::info;

use crate::config::{check_output, write_output};
use crate::operation::RootOperation;
use crate::render::render;
use crate::schema::Schema;

use super::Cli;
use super::render::{GeneratedRow, print_rows};

pub(super) fn run_generate(
    cli: &Cli,
    schema: &Schema,
    operations: &[RootOperation],
) -> anyhow::Result<()> {
    let contents = render(cli.target, schema, operations).context("error generating client")?;

    if cli.stdout {
        print!("{contents}");
        return Ok(());
    }

    let status = if cli.check {
        check_output(&cli.out, &contents)?;
        "up to date"
    } else {
        write_output(&cli.out, &contents)?;
        info!(path = %cli.out.display(), operations = operations.len(), "wrote client");
        "written"
    };

    let target = cli
        .target
        .to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_default();
    print_rows(
        cli,
        &[GeneratedRow {
            target,
            path: cli.out.display().to_string(),
            operations: operations.len(),
            status,
        }],
    )
}
