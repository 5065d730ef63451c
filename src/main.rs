#[tokio::main]
async fn main() -> anyhow::Result<()> {
    placegrab::cli::run().await
}
