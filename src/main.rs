use anyhow::Result;
use clap::Parser;
use weather_report::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    weather_report::run(cli).await
}
