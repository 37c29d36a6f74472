use clap::Parser;

mod cli;
mod github;
mod telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();
    let app = cli::App::parse();
    cli::run(app).await
}
