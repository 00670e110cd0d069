//! actionloop binary
//!
//! Serves the built-in actions over the action-loop protocol, or runs one
//! action locally.

use actionloop::{
    actions::ActionRegistry,
    cli::{Cli, Command, DEFAULT_CONFIG_PATH, generate_config_template},
    config::Config,
    handlers::{self, AppState},
    params::{EnvSnapshot, Params},
    telemetry,
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = &cli.command {
        return write_config_template(output.as_deref());
    }

    // The default path is optional; an explicit --config must exist
    let config = if cli.config == DEFAULT_CONFIG_PATH {
        Config::from_file_or_default(&cli.config)?
    } else {
        Config::from_file(&cli.config)?
    };

    telemetry::init(&config.observability.log_level);

    match cli.command {
        None | Some(Command::Serve) => serve(config).await,
        Some(Command::Invoke { action, params }) => invoke(&config, &action, params).await,
        Some(Command::Actions) => {
            for name in ActionRegistry::builtin(&config)?.names() {
                println!("{}", name);
            }
            Ok(())
        }
        Some(Command::Config { .. }) => Ok(()),
    }
}

fn write_config_template(output: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, generate_config_template())?;
            eprintln!("Wrote configuration template to {}", path);
        }
        None => print!("{}", generate_config_template()),
    }
    Ok(())
}

async fn invoke(
    config: &Config,
    action: &str,
    params: Vec<(String, serde_json::Value)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = ActionRegistry::builtin(config)?;
    let Some(action) = registry.get(action) else {
        return Err(format!(
            "Unknown action '{}' (available: {})",
            action,
            registry.names().join(", ")
        )
        .into());
    };

    let mut invocation = Params::new();
    for (key, value) in params {
        invocation.insert(key, value);
    }

    let response = action
        .invoke(&invocation, &EnvSnapshot::from_process())
        .await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        config.server.port,
    ));

    let state = AppState::new(Arc::new(config), EnvSnapshot::from_process())?;
    tracing::info!(
        actions = ?state.registry().names(),
        "Starting actionloop runtime"
    );

    let app = handlers::router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Finished server cleanup");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Caught signal: interrupt"),
        _ = terminate => tracing::info!("Caught signal: terminate"),
    }
}
