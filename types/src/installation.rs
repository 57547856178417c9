//! Binary-installation gate used by reconciliation.

/// Reports whether a chain's node binary is present on this machine.
///
/// Any `Fn(&str) -> bool` closure works as an implementation.
pub trait BinaryInstallations {
    /// `binary` is the platform-specific file name from the chain config.
    fn is_installed(&self, binary: &str) -> bool;
}

impl<F> BinaryInstallations for F
where
    F: Fn(&str) -> bool,
{
    fn is_installed(&self, binary: &str) -> bool {
        self(binary)
    }
}
