mod cli;
mod config;
mod report;

use std::sync::Arc;

use clap::Parser;
use ljobs_api::{HttpApi, SnapshotAdapter};
use ljobs_model::FarmSnapshot;
use ljobs_observe::{LoggerTimeZone, init_local_offset, init_logger};
use tracing::info;

use crate::{
    cli::{Cli, Command},
    config::DashdConfig,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = DashdConfig::load(cli.config.as_deref())?;
    cli.apply(&mut cfg)?;

    // Local offset detection must run before the runtime spawns threads.
    if cfg.logger.tz == LoggerTimeZone::Local {
        init_local_offset();
    }
    init_logger(&cfg.logger)?;

    let snapshot = cfg.load_snapshot()?;
    info!(
        path = %cfg.snapshot_path.display(),
        jobs = snapshot.jobs.len(),
        nodes = snapshot.nodes.len() + 1,
        clouds = snapshot.clouds.len(),
        "farm snapshot loaded"
    );

    match &cli.command {
        Command::Serve { .. } => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(serve(cfg, snapshot)),
        Command::Report(command) => {
            println!("{}", report::render(command, &snapshot, cfg.settings)?);
            Ok(())
        }
    }
}

async fn serve(cfg: DashdConfig, snapshot: FarmSnapshot) -> anyhow::Result<()> {
    let mut adapter = SnapshotAdapter::new(Arc::new(snapshot), cfg.settings);
    if let Some(path) = &cfg.settings_path {
        adapter = adapter.with_settings_path(path);
    }
    let router = HttpApi::new(Arc::new(adapter)).router();

    let listener = tokio::net::TcpListener::bind(cfg.listen).await?;
    info!(addr = %listener.local_addr()?, "http api listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await?;
    Ok(())
}
