//! Bring persisted starters in line with the chains installed on this machine.

use starter_store::StarterStore;
use starter_types::{BinaryInstallations, ChainConfig, StarterKind};

use crate::service::StarterService;

/// What reconciliation did for one chain entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// A starter was derived and persisted.
    Derived(StarterKind),
    /// The layer-1 starter already existed and was left alone.
    AlreadyPresent,
    NotInstalled,
    /// An earlier installed layer-1 entry was already handled.
    OtherL1Handled,
    /// A layer-2 entry without a sidechain slot has nothing to derive.
    NoSlot,
    /// Derivation or persistence failed; the message never contains secrets.
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub outcomes: Vec<(String, ChainOutcome)>,
}

impl ReconcileReport {
    fn record(&mut self, chain: &ChainConfig, outcome: ChainOutcome) {
        self.outcomes.push((chain.name.clone(), outcome));
    }

    pub fn derived(&self) -> impl Iterator<Item = StarterKind> + '_ {
        self.outcomes.iter().filter_map(|(_, outcome)| match outcome {
            ChainOutcome::Derived(kind) => Some(*kind),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.outcomes.iter().filter_map(|(chain, outcome)| match outcome {
            ChainOutcome::Failed(reason) => Some((chain.as_str(), reason.as_str())),
            _ => None,
        })
    }

    pub fn outcome_for(&self, chain: &str) -> Option<&ChainOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == chain)
            .map(|(_, outcome)| outcome)
    }
}

/// Derives missing starters for installed chains.
///
/// The runner never fails: each chain's error is logged and recorded in the
/// report, and the next chain is processed.
pub struct ReconciliationRunner<'a, S> {
    service: &'a StarterService<S>,
}

impl<'a, S: StarterStore> ReconciliationRunner<'a, S> {
    pub fn new(service: &'a StarterService<S>) -> Self {
        Self { service }
    }

    /// Walk `chains` in order.
    ///
    /// The first installed layer-1 chain gets an L1 starter if none exists;
    /// later layer-1 entries are ignored. Every installed chain with a
    /// sidechain slot has its starter rederived, which rewrites identical
    /// bytes when it already exists.
    pub fn reconcile_installed(
        &self,
        chains: &[ChainConfig],
        installations: &dyn BinaryInstallations,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut l1_handled = false;

        for chain in chains {
            let binary = chain.binary.for_current_platform();

            if chain.is_layer1() {
                if l1_handled {
                    report.record(chain, ChainOutcome::OtherL1Handled);
                    continue;
                }
                if !installations.is_installed(binary) {
                    tracing::debug!(chain = %chain.name, binary, "layer-1 binary not installed");
                    report.record(chain, ChainOutcome::NotInstalled);
                    continue;
                }
                l1_handled = true;
                let outcome = self.reconcile_l1(chain);
                report.record(chain, outcome);
                continue;
            }

            let Some(slot) = chain.sidechain_slot else {
                tracing::debug!(chain = %chain.name, "layer-2 chain has no sidechain slot");
                report.record(chain, ChainOutcome::NoSlot);
                continue;
            };
            if !installations.is_installed(binary) {
                tracing::debug!(chain = %chain.name, slot, binary, "sidechain binary not installed");
                report.record(chain, ChainOutcome::NotInstalled);
                continue;
            }
            let outcome = match self.service.derive_sidechain_starter(slot, &chain.name) {
                Ok(_) => ChainOutcome::Derived(StarterKind::Sidechain(slot)),
                Err(e) => {
                    tracing::warn!(chain = %chain.name, slot, error = %e, "failed to derive sidechain starter");
                    ChainOutcome::Failed(e.to_string())
                }
            };
            report.record(chain, outcome);
        }

        let derived = report.derived().count();
        let failed = report.failures().count();
        tracing::info!(chains = chains.len(), derived, failed, "reconciliation finished");
        report
    }

    fn reconcile_l1(&self, chain: &ChainConfig) -> ChainOutcome {
        match self.service.store().has_l1() {
            Ok(true) => {
                tracing::debug!(chain = %chain.name, "layer-1 starter already present");
                ChainOutcome::AlreadyPresent
            }
            Ok(false) => match self.service.derive_l1_starter(&chain.name) {
                Ok(_) => ChainOutcome::Derived(StarterKind::L1),
                Err(e) => {
                    tracing::warn!(chain = %chain.name, error = %e, "failed to derive layer-1 starter");
                    ChainOutcome::Failed(e.to_string())
                }
            },
            Err(e) => {
                tracing::error!(chain = %chain.name, error = %e, "cannot check for layer-1 starter");
                ChainOutcome::Failed(e.to_string())
            }
        }
    }
}
