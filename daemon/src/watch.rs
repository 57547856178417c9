//! Watch mode: reconcile whenever the set of installed chains changes.

use starter_store::StarterStore;
use starter_store_fs::FileStarterStore;
use starter_types::{BinaryInstallations, ChainConfig};
use starter_wallet_core::{
    installed_chains, InstallDirectory, ReconcileReport, ReconciliationRunner, StarterConfig,
    StarterService,
};
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::signal;

pub async fn run(
    service: &StarterService<FileStarterStore>,
    config: &StarterConfig,
) -> anyhow::Result<()> {
    let installs = InstallDirectory::new(config.install_dir());
    let interval = Duration::from_secs(config.watch_interval_secs.max(1));
    tracing::info!(
        install_dir = %installs.dir().display(),
        interval_secs = interval.as_secs(),
        "watching for chain installations"
    );

    let mut ticker = tokio::time::interval(interval);
    let mut state = WatchState::default();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                state.tick(service, &config.chains, &installs);
            }
            result = &mut shutdown => {
                result?;
                break;
            }
        }
    }

    tracing::info!("watch stopped");
    Ok(())
}

/// Remembers the installed set of the last pass that finished without failures.
#[derive(Debug, Default)]
struct WatchState {
    settled: Option<BTreeSet<String>>,
}

impl WatchState {
    /// Reconcile unless the installed set matches the last clean pass.
    ///
    /// A pass with failures leaves nothing settled, so the next tick retries
    /// even when no binary was added or removed.
    fn tick<S: StarterStore>(
        &mut self,
        service: &StarterService<S>,
        chains: &[ChainConfig],
        installations: &dyn BinaryInstallations,
    ) -> Option<ReconcileReport> {
        let installed = installed_chains(chains, installations);
        if self.settled.as_ref() == Some(&installed) {
            return None;
        }

        tracing::info!(installed = installed.len(), "reconciling installed chains");
        let report = ReconciliationRunner::new(service).reconcile_installed(chains, installations);
        let mut failed = false;
        for (chain, reason) in report.failures() {
            tracing::warn!(chain, reason, "chain left without a starter, retrying next tick");
            failed = true;
        }
        self.settled = (!failed).then_some(installed);
        Some(report)
    }
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    #[cfg(unix)]
    let terminate = async move {
        terminate.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        result = signal::ctrl_c() => {
            result?;
            tracing::info!("received SIGINT, shutting down");
        }
        _ = terminate => { tracing::info!("received SIGTERM, shutting down"); }
    }
    Ok(())
}
