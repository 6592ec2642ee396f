//! Smart-home dashboard server.
//!
//! Polls the Hubitat Maker API and pushes state changes to connected browsers
//! over Server-Sent Events.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin homedash-server
//! cargo run --bin homedash-server -- --port 8083 --hubitat-url http://192.168.1.10 \
//!     --hubitat-app-id 19 --hubitat-token <token> --thermostat-id 42
//! ```

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use homedash_server::{
    config::{HubitatConfig, NamedDevice, ServerConfig},
    infrastructure::device::build_sources,
    ui::Server,
};
use homedash_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "homedash-server")]
#[command(about = "Smart-home dashboard server with Server-Sent Events", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOMEDASH_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HOMEDASH_PORT", default_value = "8083")]
    port: u16,

    /// Directory containing index.html and other static assets
    #[arg(long, env = "HOMEDASH_STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "HOMEDASH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Maximum number of concurrent SSE clients
    #[arg(long, env = "HOMEDASH_MAX_CONNECTIONS", default_value = "50")]
    max_connections: usize,

    /// Fraction of capacity at which idle connections are evicted
    #[arg(long, env = "HOMEDASH_EMERGENCY_RATIO", default_value = "0.8")]
    emergency_ratio: f64,

    /// Seconds between heartbeat passes
    #[arg(long, env = "HOMEDASH_HEARTBEAT_INTERVAL", default_value = "120")]
    heartbeat_interval: u64,

    /// Seconds between sweep passes
    #[arg(long, env = "HOMEDASH_SWEEP_INTERVAL", default_value = "120")]
    sweep_interval: u64,

    /// Seconds a new connection is exempt from heartbeats
    #[arg(long, env = "HOMEDASH_HEARTBEAT_GRACE", default_value = "30")]
    heartbeat_grace: u64,

    /// Seconds after which an idle connection may be evicted under pressure
    #[arg(long, env = "HOMEDASH_CONNECTION_TIMEOUT", default_value = "180")]
    connection_timeout: u64,

    /// Seconds since the last write during which a connection is never evicted
    #[arg(long, env = "HOMEDASH_DATA_GRACE", default_value = "30")]
    data_grace: u64,

    /// Retry-After seconds sent to clients rejected at capacity
    #[arg(long, env = "HOMEDASH_RETRY_AFTER", default_value = "5")]
    retry_after: u64,

    /// Frames buffered per client before writes fail
    #[arg(long, env = "HOMEDASH_SEND_BUFFER", default_value = "32")]
    send_buffer: usize,

    /// Seconds between device polls
    #[arg(long, env = "HOMEDASH_POLL_INTERVAL", default_value = "30")]
    poll_interval: u64,

    /// Seconds a cached snapshot may be reused for new subscribers
    #[arg(long, env = "HOMEDASH_SNAPSHOT_MAX_AGE", default_value = "30")]
    snapshot_max_age: u64,

    /// Timeout in seconds for each device API request
    #[arg(long, env = "HOMEDASH_DEVICE_TIMEOUT", default_value = "10")]
    device_timeout: u64,

    /// Hubitat hub base URL
    #[arg(long, env = "HOMEDASH_HUBITAT_URL")]
    hubitat_url: Option<String>,

    /// Hubitat Maker API app id
    #[arg(long, env = "HOMEDASH_HUBITAT_APP_ID")]
    hubitat_app_id: Option<String>,

    /// Hubitat Maker API access token
    #[arg(long, env = "HOMEDASH_HUBITAT_TOKEN", hide_env_values = true)]
    hubitat_token: Option<String>,

    /// Thermostat device id
    #[arg(long, env = "HOMEDASH_THERMOSTAT_ID")]
    thermostat_id: Option<String>,

    /// Room sensors as `id:Name` (comma separated)
    #[arg(long = "sensor", env = "HOMEDASH_SENSORS", value_delimiter = ',')]
    sensors: Vec<NamedDevice>,

    /// Weather device id
    #[arg(long, env = "HOMEDASH_WEATHER_ID")]
    weather_id: Option<String>,

    /// Lights / switches as `id:Name` (comma separated)
    #[arg(long = "light", env = "HOMEDASH_LIGHTS", value_delimiter = ',')]
    lights: Vec<NamedDevice>,

    /// Discover smart locks among all Hubitat devices
    #[arg(long, env = "HOMEDASH_DISCOVER_LOCKS")]
    discover_locks: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            static_dir: args.static_dir,
            max_connections: args.max_connections,
            emergency_ratio: args.emergency_ratio,
            heartbeat_interval: Duration::from_secs(args.heartbeat_interval),
            sweep_interval: Duration::from_secs(args.sweep_interval),
            heartbeat_grace: Duration::from_secs(args.heartbeat_grace),
            connection_timeout: Duration::from_secs(args.connection_timeout),
            data_grace: Duration::from_secs(args.data_grace),
            retry_after: Duration::from_secs(args.retry_after),
            send_buffer: args.send_buffer,
            poll_interval: Duration::from_secs(args.poll_interval),
            snapshot_max_age: Duration::from_secs(args.snapshot_max_age),
            device_timeout: Duration::from_secs(args.device_timeout),
            hubitat: HubitatConfig {
                url: args.hubitat_url,
                app_id: args.hubitat_app_id,
                token: args.hubitat_token,
                thermostat_id: args.thermostat_id,
                sensors: args.sensors,
                weather_id: args.weather_id,
                lights: args.lights,
                discover_locks: args.discover_locks,
            },
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Config
    // 2. Device sources
    // 3. Server (UseCases are wired inside)

    // 1. Validate configuration
    let config = ServerConfig::from(args);
    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
    tracing::info!(
        "Max SSE clients: {}, emergency cleanup at {}",
        config.max_connections,
        config.emergency_threshold()
    );

    // 2. Create device sources (Hubitat Maker API)
    let sources = match build_sources(&config.hubitat, config.device_timeout) {
        Ok(sources) => sources,
        Err(e) => {
            tracing::error!("Failed to create device sources: {}", e);
            std::process::exit(1);
        }
    };

    // 3. Create and run the server
    let server = Server::new(config, sources);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
