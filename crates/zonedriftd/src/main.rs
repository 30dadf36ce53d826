// # zonedriftd - Dynamic DNS Daemon
//
// The zonedriftd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Constructing the address source, provider and record cache
// 4. Driving the reconciliation engine on a fixed interval
//
// All reconciliation logic lives in zonedrift-core; this is a thin
// integration layer.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `EMAIL`: provider account email (required)
// - `API_TOKEN`: provider API token (required)
// - `DOMAIN`: zone name (required)
// - `HOSTS`: comma-separated subdomain labels to reconcile
// - `IPSTACK`: addressing mode — ipv4, ipv6 or dual (default: ipv4)
// - `LOG_LEVEL`: trace, debug, info, warn or error (default: info)
// - `CHECK_INTERVAL_SECS`: reconciliation period in seconds (default: 1)
// - `DRY_RUN`: if true, detect drift but never modify records
//
// ## Example
//
// ```bash
// export EMAIL=ops@example.com
// export API_TOKEN=your_token
// export DOMAIN=example.com
// export HOSTS=www,mail
// export IPSTACK=dual
//
// zonedriftd
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use zonedrift_core::{
    Credentials, RecordCache, ReconciliationConfig, ReconciliationEngine, StackMode,
};
use zonedrift_ip_local::LocalAddressSource;
use zonedrift_provider_cloudflare::CloudflareProvider;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Period of the liveness heartbeat task
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    email: String,
    api_token: String,
    domain: String,
    hosts: Vec<String>,
    stack: StackMode,
    log_level: String,
    check_interval_secs: u64,
    dry_run: bool,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Missing required keys are a hard error here: the process exits
    /// with a non-zero status instead of idling without work to do.
    fn from_env() -> Result<Self> {
        let email = env::var("EMAIL").map_err(|_| {
            anyhow::anyhow!("EMAIL is required. Set it via: export EMAIL=you@example.com")
        })?;
        let api_token = env::var("API_TOKEN").map_err(|_| {
            anyhow::anyhow!("API_TOKEN is required. Set it via: export API_TOKEN=your_token")
        })?;
        let domain = env::var("DOMAIN").map_err(|_| {
            anyhow::anyhow!("DOMAIN is required. Set it via: export DOMAIN=example.com")
        })?;

        let hosts = env::var("HOSTS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let stack = StackMode::from_str(&env::var("IPSTACK").unwrap_or_else(|_| "ipv4".to_string()))
            .map_err(|e| anyhow::anyhow!("IPSTACK is not valid: {e}. Valid values: ipv4, ipv6, dual"))?;

        let check_interval_secs = match env::var("CHECK_INTERVAL_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("CHECK_INTERVAL_SECS must be an integer. Got: {raw}"))?,
            Err(_) => 1,
        };

        let dry_run = env::var("DRY_RUN")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            email,
            api_token,
            domain,
            hosts,
            stack,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            check_interval_secs,
            dry_run,
        })
    }

    /// Validate the configuration
    ///
    /// Checks value formats (account email, domain names, host labels),
    /// numeric ranges and the log level. An empty host list is allowed —
    /// it is warned about at startup instead.
    fn validate(&self) -> Result<()> {
        if !self.email.contains('@') {
            anyhow::bail!(
                "EMAIL does not look like an account email. Got: {}",
                self.email
            );
        }

        if self.api_token.len() < 20 {
            anyhow::bail!(
                "API_TOKEN appears too short ({} chars). \
                Cloudflare keys are typically 37+ characters. \
                Verify your token is correct.",
                self.api_token.len()
            );
        }

        // Check for obvious placeholder tokens (common mistake)
        let token_lower = self.api_token.to_lowercase();
        if token_lower.contains("your_token")
            || token_lower.contains("replace_me")
            || token_lower.contains("example")
        {
            anyhow::bail!(
                "API_TOKEN appears to be a placeholder. \
                Use an actual API token from your DNS provider."
            );
        }

        validate_domain_name(&self.domain)?;

        for host in &self.hosts {
            validate_label(host)?;
        }

        if !(1..=3600).contains(&self.check_interval_secs) {
            anyhow::bail!(
                "CHECK_INTERVAL_SECS must be between 1 and 3600 seconds. Got: {}",
                self.check_interval_secs
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

/// Validate that a string is a valid domain name
///
/// This implements basic DNS domain name validation per RFC 1035.
/// It's not comprehensive but catches common errors.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        anyhow::bail!("DOMAIN cannot be empty");
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        anyhow::bail!(
            "DOMAIN too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        );
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("DOMAIN has an empty label: '{}'", domain);
        }
        validate_label(label)?;
    }

    Ok(())
}

/// Validate a single DNS label (a HOSTS entry or one segment of DOMAIN)
fn validate_label(label: &str) -> Result<()> {
    if label.is_empty() {
        anyhow::bail!("DNS label cannot be empty");
    }

    if label.len() > 63 {
        anyhow::bail!(
            "DNS label too long: {} chars (max 63). Label: '{}'",
            label.len(),
            label
        );
    }

    if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
        anyhow::bail!(
            "DNS label contains invalid characters. Label: '{}'. \
            Valid: alphanumeric and hyphen only.",
            label
        );
    }

    if label.starts_with('-') || label.ends_with('-') {
        anyhow::bail!(
            "DNS label cannot start or end with hyphen. Label: '{}'",
            label
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return DaemonExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    info!("starting zonedriftd");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {e}");
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("daemon error: {e}");
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    if config.hosts.is_empty() {
        warn!("HOSTS is empty; nothing will be reconciled");
    }
    if config.dry_run {
        warn!("running in DRY-RUN mode - no records will be modified");
    }

    let provider = CloudflareProvider::new(
        config.email.clone(),
        config.api_token.clone(),
        config.dry_run,
    )?;
    let source = LocalAddressSource::new();
    let cache = RecordCache::new();

    let recon_config = ReconciliationConfig {
        domain: config.domain.clone(),
        hosts: config.hosts.clone(),
        stack: config.stack,
        credentials: Credentials {
            email: config.email.clone(),
            api_token: config.api_token.clone(),
        },
    };

    let engine = ReconciliationEngine::new(
        Box::new(source),
        Box::new(provider),
        cache,
        &recon_config,
    )?;

    info!(
        domain = %recon_config.domain,
        hosts = recon_config.hosts.len(),
        stack = %recon_config.stack,
        interval_secs = config.check_interval_secs,
        "configuration OK"
    );

    // Heartbeat runs on its own interval and shares no state with the
    // engine.
    let heartbeat = tokio::spawn(heartbeat_task());

    let mut ticker = tokio::time::interval(Duration::from_secs(config.check_interval_secs));
    // Awaiting the tick body inline keeps at most one reconciliation in
    // flight; a slow provider delays the next tick instead of overlapping
    // it.
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    info!(
        "zonedriftd started; reconciling every {} second(s)",
        config.check_interval_secs
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => engine.run_tick().await,
            received = &mut shutdown => {
                match received {
                    Ok(name) => info!("received {name}, shutting down"),
                    Err(e) => {
                        error!("signal handler error: {e}");
                        heartbeat.abort();
                        return Err(e);
                    }
                }
                break;
            }
        }
    }

    heartbeat.abort();
    info!("zonedriftd stopped");

    Ok(())
}

/// Log liveness once per minute, independently of the reconciliation loop
async fn heartbeat_task() {
    let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
    loop {
        ticker.tick().await;
        info!("heartbeat: zonedriftd is alive");
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn shutdown_signal() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {e}"))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {e}"))?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    Ok(name)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {e}"))?;
    Ok("SIGINT")
}
