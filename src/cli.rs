use crate::engine::Engine;
use crate::impls::ReqwestFetcher;
use crate::types::{CookieSet, ScrapeRequest};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "placegrab",
    version,
    about = "Fetch a map listing page and extract its embedded business record"
)]
pub struct Cli {
    /// Listing page URL to fetch
    url: String,

    /// Browser cookies as a JSON object literal, e.g. '{"NID":"..."}'
    cookies: String,

    /// Search query label echoed into the output record
    query: String,
}

/// Run one scrape invocation.
///
/// Emits exactly one line of compact JSON on stdout. Logs go to stderr so
/// the output stream stays machine-readable. Usage errors (missing
/// arguments, malformed cookies) abort before any network activity; fetch
/// failures still produce a record, with the `error` field set.
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    // Cookies are validated up front; a bad argument never hits the network.
    let cookies = CookieSet::from_json(&cli.cookies)?;
    let request = ScrapeRequest::new(cli.url, cookies, cli.query);

    let fetcher = ReqwestFetcher::new()?;
    let record = Engine::new(&fetcher).scrape(&request).await;

    println!("{}", serde_json::to_string(&record)?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
