//! nlgas - command line explorer for Dutch municipal gas consumption.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "nlgas",
    version,
    about = "Dutch municipal gas consumption toolkit (2015-2024)"
)]
struct Cli {
    #[command(flatten)]
    options: nlgas_cmd::Options,

    #[command(subcommand)]
    command: nlgas_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[nlgas] cli: data={} boundaries={}", cli.options.data, cli.options.boundaries);
    nlgas_cmd::run(&cli.options, cli.command).await
}
