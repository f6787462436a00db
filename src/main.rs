mod cli;

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli::app::init_tracing(cli.verbose);
    cli::app::run(cli).await
}
