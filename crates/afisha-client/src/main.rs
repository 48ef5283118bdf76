//! afisha CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use afisha_client::cli::{Cli, Command, ConfigAction, PeriodArgs};
use afisha_client::commands::{self, Context};
use afisha_client::config::{AppConfig, ClientConfig};
use afisha_client::error::ClientResult;
use afisha_core::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.tracing_config()) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let file = ClientConfig::load(cli.config.as_deref())?;

    if let Some(Command::Config { action }) = &cli.command {
        return match action {
            ConfigAction::Dump => commands::config::dump(&file, cli.config.as_deref()),
            ConfigAction::Validate => {
                commands::config::validate(&AppConfig::resolve(&file, &cli.overrides())?)
            }
            ConfigAction::Path => commands::config::path(cli.config.as_deref()),
        };
    }

    let mut config = AppConfig::resolve(&file, &cli.overrides())?;
    if let Some(max) = cli.max_name_length {
        config.display.max_name_length = Some(max);
    }
    if cli.hyperlinks {
        config.display.hyperlinks = true;
    }
    let ctx = Context::new(config, cli.identity(), cli.output_format());

    match &cli.command {
        Some(Command::Events { period }) => commands::events::list(&ctx, period).await,
        Some(Command::Calendar { period }) => commands::events::calendar(&ctx, period).await,
        Some(Command::Show { id, year }) => commands::events::show(&ctx, id, *year).await,
        Some(Command::Export(args)) => commands::export::export(&ctx, args).await,
        Some(Command::Draft(args)) => commands::draft::draft(&ctx, args),
        Some(Command::Browse { period }) => commands::browse::browse(&ctx, period).await,
        Some(Command::Config { .. }) => Ok(()),
        None => commands::events::calendar(&ctx, &PeriodArgs::default()).await,
    }
}
