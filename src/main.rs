use anyhow::Result;
use trace_assist::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
