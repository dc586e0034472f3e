use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dbchat_cli::run().await
}
