//! Starter storage trait.

use starter_types::{StarterKind, StarterRecord};

use crate::StoreError;

/// Storage for starter records, one record per [`StarterKind`].
///
/// Backends implement the four primitives; the per-kind helpers are provided.
/// Every save validates that the record's secret fields are present before
/// anything is written, so a partial record is never persisted.
pub trait StarterStore {
    /// Load the record for `kind`, or `None` if none is persisted.
    fn load(&self, kind: StarterKind) -> Result<Option<StarterRecord>, StoreError>;

    /// Persist `record` for `kind`, replacing any existing one.
    ///
    /// Callers go through [`save_checked`](Self::save_checked) or the per-kind
    /// helpers, which validate first.
    fn write(&self, kind: StarterKind, record: &StarterRecord) -> Result<(), StoreError>;

    /// Remove the record for `kind`. Returns whether one existed.
    fn delete(&self, kind: StarterKind) -> Result<bool, StoreError>;

    /// Every kind currently persisted, in [`StarterKind`] order.
    fn kinds(&self) -> Result<Vec<StarterKind>, StoreError>;

    fn exists(&self, kind: StarterKind) -> Result<bool, StoreError> {
        Ok(self.kinds()?.contains(&kind))
    }

    fn save_checked(&self, kind: StarterKind, record: &StarterRecord) -> Result<(), StoreError> {
        if let Some(field) = record.first_missing_field() {
            tracing::warn!(%kind, field, "refusing to save incomplete starter");
            return Err(StoreError::MissingRequiredField(field));
        }
        self.write(kind, record)
    }

    // ── Master ──────────────────────────────────────────────────────────

    fn has_master(&self) -> Result<bool, StoreError> {
        self.exists(StarterKind::Master)
    }

    fn save_master(&self, record: &StarterRecord) -> Result<(), StoreError> {
        self.save_checked(StarterKind::Master, record)
    }

    fn load_master(&self) -> Result<Option<StarterRecord>, StoreError> {
        self.load(StarterKind::Master)
    }

    fn delete_master(&self) -> Result<bool, StoreError> {
        self.delete(StarterKind::Master)
    }

    // ── Layer 1 ─────────────────────────────────────────────────────────

    fn has_l1(&self) -> Result<bool, StoreError> {
        self.exists(StarterKind::L1)
    }

    fn save_l1(&self, record: &StarterRecord) -> Result<(), StoreError> {
        self.save_checked(StarterKind::L1, record)
    }

    fn load_l1(&self) -> Result<Option<StarterRecord>, StoreError> {
        self.load(StarterKind::L1)
    }

    fn delete_l1(&self) -> Result<bool, StoreError> {
        self.delete(StarterKind::L1)
    }

    // ── Sidechains ──────────────────────────────────────────────────────

    fn save_sidechain(&self, slot: u8, record: &StarterRecord) -> Result<(), StoreError> {
        self.save_checked(StarterKind::Sidechain(slot), record)
    }

    fn load_sidechain(&self, slot: u8) -> Result<Option<StarterRecord>, StoreError> {
        self.load(StarterKind::Sidechain(slot))
    }

    fn delete_sidechain(&self, slot: u8) -> Result<bool, StoreError> {
        self.delete(StarterKind::Sidechain(slot))
    }

    /// Slots that currently have a persisted starter, ascending.
    fn list_sidechains(&self) -> Result<Vec<u8>, StoreError> {
        Ok(self
            .kinds()?
            .into_iter()
            .filter_map(|kind| match kind {
                StarterKind::Sidechain(slot) => Some(slot),
                _ => None,
            })
            .collect())
    }

    /// Every persisted record with its kind.
    fn list(&self) -> Result<Vec<(StarterKind, StarterRecord)>, StoreError> {
        let mut records = Vec::new();
        for kind in self.kinds()? {
            if let Some(record) = self.load(kind)? {
                records.push((kind, record));
            }
        }
        Ok(records)
    }
}
