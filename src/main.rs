use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use telemetry_gate::gate::consent::TELEMETRY_ENABLED_KEY;
use telemetry_gate::gate::event::EventPayload;
use telemetry_gate::services::{FileSettings, InMemorySettings, SettingsStore, TracingLogger};
use telemetry_gate::sinks::{AnalyticsSink, HttpAnalyticsSink, LocalAnalyticsSink, LocalDiagnosticsSink};
use telemetry_gate::{GateConfig, TelemetryDispatcher};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Settings store the console can flip, whichever backing it has.
enum Preferences {
    Memory(Arc<InMemorySettings>),
    File(Arc<FileSettings>),
}

impl Preferences {
    fn store(&self) -> Arc<dyn SettingsStore> {
        match self {
            Preferences::Memory(s) => s.clone() as Arc<dyn SettingsStore>,
            Preferences::File(s) => s.clone() as Arc<dyn SettingsStore>,
        }
    }

    fn set_consent(&self, enabled: bool) -> Result<()> {
        match self {
            Preferences::Memory(s) => s.set_boolean(TELEMETRY_ENABLED_KEY, enabled)?,
            Preferences::File(s) => s.set_boolean(TELEMETRY_ENABLED_KEY, enabled)?,
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    // 2. Configuration (process override is captured here, once)
    let config = GateConfig::from_env()?;
    tracing::info!(?config, "Starting telemetry gate");

    let prefs = match &config.settings_path {
        Some(path) => Preferences::File(Arc::new(FileSettings::new(path.clone()))),
        None => Preferences::Memory(Arc::new(InMemorySettings::new())),
    };

    let http_sink = config
        .analytics_endpoint
        .as_ref()
        .map(|url| Arc::new(HttpAnalyticsSink::new(url.clone())));
    let analytics: Arc<dyn AnalyticsSink> = match &http_sink {
        Some(sink) => sink.clone() as Arc<dyn AnalyticsSink>,
        None => Arc::new(LocalAnalyticsSink::new()),
    };

    // 3. Setup Dispatcher
    let dispatcher = TelemetryDispatcher::new(
        &config,
        Arc::new(TracingLogger),
        prefs.store(),
        analytics,
        Arc::new(LocalDiagnosticsSink::new()),
    );

    // 4. Console loop
    println!("Commands: event <name> [k=v..] | default [k=v..] | bare <name> | message <text> | exception <text> | consent on|off | reconfigure | status");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Err(e) = run_command(&dispatcher, &prefs, line) {
            tracing::error!("Command failed: {:#}", e);
        }
    }

    tracing::info!("Input closed, shutting down.");

    // 5. Give in-flight analytics posts a moment to land
    if let Some(sink) = &http_sink {
        let dropped = sink.flush(SHUTDOWN_GRACE).await;
        if dropped > 0 {
            tracing::warn!(dropped, "analytics deliveries still pending at shutdown were dropped");
        }
    }
    Ok(())
}

fn run_command(dispatcher: &TelemetryDispatcher, prefs: &Preferences, line: &str) -> Result<()> {
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match cmd {
        "event" => {
            let (name, params) = rest.split_once(' ').unwrap_or((rest, ""));
            dispatcher.log_named_event(name, &parse_payload(params)?)?;
        }
        "default" => dispatcher.log_default_event(&parse_payload(rest)?)?,
        "bare" => dispatcher.log_bare_event(rest)?,
        "message" => dispatcher.log_diagnostic_message(rest)?,
        "exception" => {
            let err = anyhow!("{}", rest).context("reported from console");
            dispatcher.log_anyhow(&err)?;
        }
        "consent" => match rest {
            "on" => prefs.set_consent(true)?,
            "off" => prefs.set_consent(false)?,
            other => return Err(anyhow!("expected 'on' or 'off', got '{}'", other)),
        },
        "reconfigure" => {
            let enabled = dispatcher.reconfigure_collection();
            println!("collection enabled: {}", enabled);
        }
        "status" => println!("telemetry enabled: {}", dispatcher.is_enabled()),
        other => return Err(anyhow!("unknown command '{}'", other)),
    }
    Ok(())
}

/// `k=v` pairs; integers, floats and booleans are typed, the rest is text.
fn parse_payload(params: &str) -> Result<EventPayload> {
    let mut builder = EventPayload::builder();
    for pair in params.split_whitespace() {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("malformed parameter '{}'", pair))?;
        builder = if let Ok(i) = value.parse::<i64>() {
            builder.put(key, i)
        } else if let Ok(f) = value.parse::<f64>() {
            builder.put(key, f)
        } else if let Ok(b) = value.parse::<bool>() {
            builder.put(key, b)
        } else {
            builder.put(key, value)
        };
    }
    Ok(builder.build())
}
