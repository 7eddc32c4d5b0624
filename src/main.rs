use anyhow::Result;
use notekeeper::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
