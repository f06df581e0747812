//! # SDK Host
//!
//! Drives a simulated host application through a full lifecycle against the
//! SDK runtime and prints the collected metrics.
//!
//! ## Sequence
//!
//! 1. Initialize telemetry (logging + metrics)
//! 2. Load and validate configuration from the environment
//! 3. Build the SDK context and register a logging observer
//! 4. Finish launching (bootstrap happens here)
//! 5. Post host lifecycle events through the notification center
//! 6. Open a URL addressed to the app
//! 7. Dump metrics
//!
//! Configuration is read from `SDK_*` environment variables; see
//! `SdkConfig::from_env` and `TelemetryConfig::from_env`.

use std::sync::Arc;

use anyhow::{Context, Result};
use lifecycle_bus::HostEvent;
use sdk_runtime::subsystems::Subsystems;
use sdk_runtime::{
    ApplicationDelegate, ApplicationObserver, DidBecomeActiveListener,
    DidEnterBackgroundListener, DidFinishLaunchingListener, OpenUrlListener, SdkConfig,
    WillResignActiveListener,
};
use sdk_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use sdk_types::{
    AppUrl, LaunchContext, LaunchOptions, OpenUrlOptions, LAUNCH_OPTION_SOURCE_APPLICATION,
    LAUNCH_OPTION_URL,
};
use serde_json::Value;
use tracing::info;

const HOST_BUNDLE_ID: &str = "com.example.sdk-host";

/// Logs every lifecycle callback it receives.
struct HostObserver;

impl DidFinishLaunchingListener for HostObserver {
    fn application_did_finish_launching(&self, launch: &LaunchContext) -> bool {
        info!(
            source = launch.source_application().unwrap_or("-"),
            "Observer: finished launching"
        );
        false
    }
}

impl DidBecomeActiveListener for HostObserver {
    fn application_did_become_active(&self) {
        info!("Observer: became active");
    }
}

impl WillResignActiveListener for HostObserver {
    fn application_will_resign_active(&self) {
        info!("Observer: will resign active");
    }
}

impl DidEnterBackgroundListener for HostObserver {
    fn application_did_enter_background(&self) {
        info!("Observer: entered background");
    }
}

impl OpenUrlListener for HostObserver {
    fn application_open_url(&self, url: &AppUrl, _options: &OpenUrlOptions) -> bool {
        let handled = url.host() == Some("authorize");
        info!(url = %url, handled, "Observer: URL opened");
        handled
    }
}

impl ApplicationObserver for HostObserver {
    fn as_did_finish_launching(&self) -> Option<&dyn DidFinishLaunchingListener> {
        Some(self)
    }

    fn as_did_become_active(&self) -> Option<&dyn DidBecomeActiveListener> {
        Some(self)
    }

    fn as_will_resign_active(&self) -> Option<&dyn WillResignActiveListener> {
        Some(self)
    }

    fn as_did_enter_background(&self) -> Option<&dyn DidEnterBackgroundListener> {
        Some(self)
    }

    fn as_open_url(&self) -> Option<&dyn OpenUrlListener> {
        Some(self)
    }
}

/// URL the simulated host is launched with and later opens.
fn app_url(config: &SdkConfig) -> Result<AppUrl> {
    let scheme = match (&config.app_id, config.url_schemes.first()) {
        (Some(app_id), _) => format!("fb{}", app_id),
        (None, Some(scheme)) => scheme.clone(),
        (None, None) => "sdkhost".to_string(),
    };
    AppUrl::parse(&format!("{}://authorize", scheme)).context("Failed to build host URL")
}

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::for_host("sdk-host"))
        .context("Failed to initialize telemetry")?;

    let config = SdkConfig::from_env();
    config.validate().context("Invalid SDK configuration")?;
    info!(
        app_id = config.app_id.as_deref().unwrap_or("-"),
        graph_api_version = %config.graph_api_version,
        kits = ?config.installed_kits,
        "Configuration loaded"
    );

    let url = app_url(&config)?;
    let delegate = ApplicationDelegate::builder()
        .config(config)
        .subsystems(Subsystems::shared())
        .build();

    let observer = Arc::new(HostObserver);
    delegate.add_observer(&observer);

    let mut launch_options = LaunchOptions::new();
    launch_options.insert(
        LAUNCH_OPTION_SOURCE_APPLICATION.to_string(),
        Value::from(HOST_BUNDLE_ID),
    );
    launch_options.insert(LAUNCH_OPTION_URL.to_string(), Value::from(url.as_str()));
    delegate.application_did_finish_launching(&launch_options);
    info!(state = ?delegate.initialization_state(), "Launch complete");

    let center = delegate.dependencies().notification_center();
    for event in [
        HostEvent::DidBecomeActive,
        HostEvent::WillResignActive,
        HostEvent::DidEnterBackground,
        HostEvent::DidBecomeActive,
    ] {
        let delivered = center.post(event);
        info!(
            event = event.name(),
            delivered,
            state = ?delegate.application_state(),
            "Host event posted"
        );
    }

    let handled = delegate.application_open_url_from_source(&url, Some(HOST_BUNDLE_ID), None);
    info!(url = %url, handled, "URL open complete");

    // Let the fire-and-forget server configuration load finish.
    tokio::task::yield_now().await;

    let metrics = encode_metrics().context("Failed to encode metrics")?;
    println!("{}", metrics);

    delegate.remove_observer(&observer);
    Ok(())
}
