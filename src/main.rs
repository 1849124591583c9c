use clap::Parser;
use std::path::PathBuf;

use vhost_proxy::config::loader::{check_settings, load_settings};
use vhost_proxy::config::{ProxyConfig, EXAMPLE_ROUTES};
use vhost_proxy::lifecycle::prepare;
use vhost_proxy::net::listener::parse_bind_address;
use vhost_proxy::observability::logging::{init_logging, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "vhost-proxy", version)]
#[command(about = "Host-based HTTP/TLS reverse proxy", long_about = None)]
struct Cli {
    /// Serve HTTP on this address (empty to disable) [default: :80]
    #[arg(long = "http")]
    http: Option<String>,

    /// Serve TLS on this address (empty to disable) [default: disabled]
    #[arg(long = "tls")]
    tls: Option<String>,

    /// TLS certificate [default: server.crt]
    #[arg(long)]
    cert: Option<PathBuf>,

    /// TLS key [default: server.key]
    #[arg(long)]
    key: Option<PathBuf>,

    /// Routing file [default: proxy.conf]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print an example routing file to stdout and exit
    #[arg(long)]
    example: bool,

    /// Optional TOML settings file; flags override its values
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Shutdown grace period per listener, in milliseconds [default: 1000]
    #[arg(long)]
    grace_period_ms: Option<u64>,

    /// Also reload when the routing file changes on disk
    #[arg(long)]
    watch: bool,

    /// Log level (trace, debug, info, warn, error) [default: info]
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, compact) [default: pretty]
    #[arg(long)]
    log_format: Option<String>,

    /// Serve Prometheus metrics on this address [default: disabled]
    #[arg(long)]
    metrics: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut ProxyConfig) {
        if let Some(http) = self.http {
            config.listener.http_address = http;
        }
        if let Some(tls) = self.tls {
            config.listener.tls_address = tls;
        }
        if let Some(cert) = self.cert {
            config.listener.tls.cert_path = cert;
        }
        if let Some(key) = self.key {
            config.listener.tls.key_path = key;
        }
        if let Some(path) = self.config {
            config.routes.path = path;
        }
        if self.watch {
            config.routes.watch = true;
        }
        if let Some(grace) = self.grace_period_ms {
            config.lifecycle.grace_period_ms = grace;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
        if let Some(metrics) = self.metrics {
            config.observability.metrics_address = metrics;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.example {
        print!("{}", EXAMPLE_ROUTES);
        return Ok(());
    }

    let mut config = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => ProxyConfig::default(),
    };
    cli.apply(&mut config);
    check_settings(&config)?;

    let format: LogFormat = config.observability.log_format.parse()?;
    init_logging(&config.observability.log_level, format)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        routes = %config.routes.path.display(),
        "vhost-proxy starting"
    );

    if !config.observability.metrics_address.is_empty() {
        match parse_bind_address(&config.observability.metrics_address) {
            Ok(addr) => vhost_proxy::observability::metrics::init_metrics(addr),
            Err(e) => tracing::error!(error = %e, "Failed to parse metrics address"),
        }
    }

    let supervisor = prepare(&config).map_err(|e| {
        tracing::error!(error = %e, "Startup failed");
        e
    })?;

    let reason = supervisor.run().await;
    tracing::info!("exit: {}", reason);

    if reason.is_failure() {
        return Err(reason.into());
    }
    Ok(())
}
