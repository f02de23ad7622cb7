mod cli;
mod commands;
mod config;
mod dispatch;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::*;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "gacha=debug,gacha_store=debug,gacha_cli=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = dispatch::Context::new(cli.db, cli.catalog)?;

    match cli.command {
        Commands::Account { command } => dispatch::dispatch_account(&ctx, command)?,

        Commands::Pull {
            username,
            password,
            ten,
        } => commands::pull::handle(&ctx, &username, &password, ten)?,

        Commands::Admin {
            admin_password,
            command,
        } => dispatch::dispatch_admin(&ctx, &admin_password, command)?,

        Commands::Catalog { format } => commands::catalog::handle(&ctx, format)?,

        Commands::Collection { username } => commands::collection::handle(&ctx, &username)?,

        Commands::History { username, limit } => {
            commands::history::handle(&ctx, &username, limit)?;
        }

        Commands::Simulate { pulls, seed, pity } => {
            commands::simulate::handle(&ctx, pulls, seed, pity)?;
        }

        Commands::Configure {
            set_db,
            set_catalog,
            show,
        } => commands::configure::handle(set_db, set_catalog, show)?,
    }

    Ok(())
}
