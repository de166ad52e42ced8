//! Device link monitor.
//!
//! Demonstrates:
//! - Building a client for a device endpoint
//! - Listening for lifecycle events and telemetry
//! - Pushing a normalized configuration once the link is up
//! - Graceful shutdown on Ctrl+C
//!
//! Usage:
//!   cargo run --example monitor
//!   cargo run --example monitor -- ws://192.168.4.1/ws
//!   cargo run --example monitor -- ws://192.168.4.1/ws --debug
//!   RC_LINK_ENDPOINT=ws://10.0.0.7/ws cargo run --example monitor

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use rc_link::protocol::{default_channels, normalize_config};
use rc_link::{Client, ConfigData, Payload, RadioMode, ReceiverInfo, Result};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

/// Environment variable overriding the endpoint.
const ENDPOINT_VAR: &str = "RC_LINK_ENDPOINT";

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    endpoint: Option<String>,
    debug: bool,
    push_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    fn parse() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self {
            endpoint: args
                .iter()
                .find(|a| !a.starts_with("--"))
                .cloned()
                .or_else(|| std::env::var(ENDPOINT_VAR).ok()),
            debug: args.iter().any(|a| a == "--debug"),
            push_config: args.iter().any(|a| a == "--push-config"),
        }
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    println!("=== RC Link Monitor ===\n");

    let mut builder = Client::builder().retry_delay(Duration::from_secs(2));
    if let Some(endpoint) = &args.endpoint {
        builder = builder.endpoint(endpoint.as_str());
    }
    let client = builder.build()?;

    println!("[Setup] Endpoint: {}", client.endpoint());
    println!(
        "        Retry: {} attempts, {:?} apart\n",
        client.config().max_attempts,
        client.config().retry_delay
    );

    // ========================================================================
    // Listeners
    // ========================================================================

    let sender = client.clone();
    let push_config = args.push_config;
    client.on_connected(move || {
        println!("[Link] ✓ Connected");
        if push_config {
            let config = normalize_config(ConfigData {
                radio_mode: RadioMode::EspNow,
                channel_settings: default_channels(),
            });
            match Payload::structured(&config) {
                Ok(payload) => {
                    let sent = sender.send(payload);
                    println!("        Config pushed: {sent}");
                }
                Err(e) => eprintln!("        Config encode failed: {e}"),
            }
        }
    });

    client.on_disconnected(|| println!("[Link] ✗ Disconnected"));

    client.on_error(|e| println!("[Link] ! {e}"));

    client.on_message(|payload| match payload.parse::<ReceiverInfo>() {
        Ok(info) => println!(
            "[Telemetry] rssi {}/{} dBm, battery {:.2} V, fw {}, outputs {:?}",
            info.rssi_ground,
            info.rssi_air,
            info.battery_voltage,
            info.firmware_version,
            info.channel_outputs
        ),
        Err(_) => println!("[Device] {payload}"),
    });

    client.connect();

    // ========================================================================
    // Wait
    // ========================================================================

    println!("Press Ctrl+C to exit...\n");
    tokio::signal::ctrl_c().await?;

    println!("\n[Shutdown] State before exit: {}", client.state());
    client.disconnect();

    Ok(())
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging.
fn init_logging(debug: bool) {
    let filter = if debug { "rc_link=debug" } else { "rc_link=info" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}
