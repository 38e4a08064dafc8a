use anyhow::Context;
use clap::Parser;
use flux_config::{ConfigLoader, RouterConfig};
use flux_core::bus::ModuleBus;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "router.toml")]
    config: String,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        println!("{}", RouterConfig::default().to_toml_string()?);
        return Ok(());
    }

    let config = ConfigLoader::new(&args.config)
        .load()
        .with_context(|| format!("failed to load config from {}", args.config))?;

    flux_logging::init_logging(&config.logging)?;
    tracing::info!(
        "Starting {} {} with config: {}",
        config.system.name,
        config.system.version,
        args.config
    );

    flux_core::init();

    if let Some(port) = config.server.metrics_port {
        let addr: SocketAddr = format!("{}:{}", config.server.host, port).parse()?;
        flux_server::metrics::init_metrics(addr)?;
    }

    let bus = Arc::new(ModuleBus::new());
    let (state, workers) = flux_server::build_app(&config, bus)?;
    let app = flux_server::api::create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address")?;
    tracing::info!("Admission server listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    workers.relay.stop();
    workers.relay.join().await;
    workers.reconciler.abort();
    tracing::info!("Router stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
