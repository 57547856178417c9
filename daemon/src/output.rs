//! Rendering of starter records for the terminal.

use starter_types::{Network, StarterKind, StarterRecord};
use std::fmt::Write;

/// One record as printable text. Secrets appear only when `reveal` is set.
pub fn render_record(kind: StarterKind, record: &StarterRecord, network: Network, reveal: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{kind}: {}", record.name);
    if let Some(path) = &record.derivation_path {
        let _ = writeln!(out, "  path:       {path}");
    }
    let _ = writeln!(out, "  words:      {}", record.word_count());
    if reveal {
        let _ = writeln!(out, "  mnemonic:   {}", record.mnemonic);
        let _ = writeln!(out, "  xprv:       {}", record.xprv);
        let _ = writeln!(
            out,
            "  descriptor: {}",
            record.wpkh_descriptor(network.coin_type())
        );
    }
    out
}
