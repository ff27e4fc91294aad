//! Unified error type for blescout.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Every variant maps to a static description for diagnostic output.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Host-stack bring-up failed.  Fatal: the scanner never starts.
    InitFailed(HostError),

    /// Scan interval/window combination violates the GAP rules.
    InvalidScanParameters,

    /// The host stack rejected the scan-parameter update.
    SetParamsFailed(HostError),

    /// The scan-start command was rejected.
    ScanStartFailed(HostError),

    /// The requested PHY set is not available on this radio.
    PhyNotSupported,

    /// An event or command arrived in a state that does not allow it.
    InvalidState,
}

/// Failure reported by the underlying BLE host stack for one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostError {
    /// Raw error code from the vendor stack.
    Raw(u32),
    /// The radio is busy with another operation.
    Busy,
    /// The stack is not initialized (or already shut down).
    NotInitialized,
    /// The controller does not support the requested feature.
    NotSupported,
}

impl Error {
    /// Static description for diagnostic lines.
    pub fn describe(&self) -> &'static str {
        match self {
            Error::InitFailed(_) => "host stack initialization failed",
            Error::InvalidScanParameters => "invalid scan parameters",
            Error::SetParamsFailed(_) => "failed to apply scan parameters",
            Error::ScanStartFailed(_) => "failed to start scan",
            Error::PhyNotSupported => "preferred PHYs not supported",
            Error::InvalidState => "command not allowed in current state",
        }
    }
}

impl HostError {
    pub fn describe(&self) -> &'static str {
        match self {
            HostError::Raw(_) => "vendor stack error",
            HostError::Busy => "radio busy",
            HostError::NotInitialized => "stack not initialized",
            HostError::NotSupported => "not supported by controller",
        }
    }
}
