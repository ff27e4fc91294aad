//! Application-wide constants and compile-time configuration.
//!
//! All scan timing parameters and protocol constants live here so they
//! can be tuned in one place.

// Scan timing
//
// Interval and window are in the GAP unit of 0.625 ms; the window must
// not exceed the interval (the radio listens for `window` out of every
// `interval`).

/// Scan interval in 0.625 ms units (160 = 100 ms).
pub const SCAN_INTERVAL_UNITS: u16 = 160;

/// Scan window in 0.625 ms units (80 = 50 ms).
pub const SCAN_WINDOW_UNITS: u16 = 80;

/// Scan duration before the host stack reports a timeout, in 10 ms
/// units (1000 = 10 s).  The controller re-arms on every timeout, so
/// scanning is continuous from the user's point of view.
pub const SCAN_TIMEOUT_10MS: u16 = 1_000;

/// Active scanning sends scan requests to advertisers for their
/// scan-response data.  Off by default: this is a passive scanner.
pub const ACTIVE_SCANNING: bool = false;

// Advertising payload handling

/// Longest local name copied out of an advertisement.  Names on the air
/// are not null-terminated; anything longer is truncated.
pub const ADV_NAME_MAX: usize = 127;
