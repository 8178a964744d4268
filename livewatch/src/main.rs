use std::time::Duration;

use clap::{Parser, Subcommand};
use helix_client::HelixClient;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use livewatch::config::{Settings, TransportKind};
use livewatch::monitor::{LiveMonitor, channel_url};
use livewatch::notification::{LogSink, NotificationSink, WebhookSink, spawn_dispatcher};

/// Default log filter directive.
const DEFAULT_LOG_FILTER: &str = "livewatch=info,helix_client=info";

#[derive(Parser)]
#[command(
    name = "livewatch",
    version,
    about = "Watches Twitch channels and announces online/offline transitions"
)]
struct Args {
    /// Space-separated channel logins to watch.
    #[arg(long, env = "LIVEWATCH_CHANNELS", default_value = "")]
    channels: String,

    /// Helix application client id.
    #[arg(long, env = "TWITCH_CLIENT_ID")]
    client_id: String,

    /// OAuth bearer token.
    #[arg(long, env = "TWITCH_BEARER_TOKEN", hide_env_values = true)]
    token: String,

    /// Seconds between poll cycles.
    #[arg(long, default_value_t = 60)]
    interval: u64,

    /// Transport used for API requests.
    #[arg(long, value_enum, default_value = "http")]
    transport: TransportKind,

    /// Webhook URL to POST transition events to.
    #[arg(long, env = "LIVEWATCH_WEBHOOK_URL")]
    webhook_url: Option<String>,

    /// Log filter directive (falls back to RUST_LOG, then the default).
    #[arg(long)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the watcher until interrupted.
    Watch,
    /// Run one resolution cycle and print each live channel's URL.
    Live,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(args.log_filter.as_deref())?;

    let settings = Settings {
        channels: args.channels,
        client_id: args.client_id,
        token: args.token,
        poll_interval: Duration::from_secs(args.interval),
        transport: args.transport,
        webhook_url: args.webhook_url,
    };
    settings.validate()?;

    match args.command {
        Command::Watch => watch(settings).await,
        Command::Live => live_once(settings).await,
    }
}

/// Run the monitor engine and the notification dispatcher until Ctrl-C.
async fn watch(settings: Settings) -> anyhow::Result<()> {
    let monitor = LiveMonitor::new(settings.clone())?;
    let cancel = CancellationToken::new();

    let mut sinks: Vec<Box<dyn NotificationSink>> = vec![Box::new(LogSink)];
    if let Some(url) = &settings.webhook_url {
        sinks.push(Box::new(WebhookSink::new(url.clone())));
    }

    let dispatcher = spawn_dispatcher(monitor.broadcaster(), sinks, cancel.clone());
    let engine = tokio::spawn(monitor.run(cancel.clone()));

    tokio::signal::ctrl_c().await?;
    info!("interrupt received, shutting down");
    cancel.cancel();

    engine.await?;
    dispatcher.await?;

    Ok(())
}

/// One-shot command surface: resolve the watchlist once and print the
/// currently live channels as URLs.
async fn live_once(settings: Settings) -> anyhow::Result<()> {
    let transport = settings.build_transport()?;
    let client = HelixClient::new(transport);

    let mut live = client.live_channels(&settings.watchlist()).await;
    live.sort();
    live.dedup();

    for login in live {
        println!("{}", channel_url(&login));
    }

    Ok(())
}

fn init_logging(directive: Option<&str>) -> anyhow::Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}
