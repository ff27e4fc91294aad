//! Scan lifecycle controller.
//!
//! Owns the scan configuration and drives the start/timeout/restart
//! state machine against the host stack.  Every entry point runs on the
//! host stack's single dispatch context and returns promptly; outbound
//! commands are fire-and-forget, with completion (where one exists)
//! delivered later through the matching `on_*` handler.

use super::adv_parser::AdvDataParser;
use super::fields::{self, DecodedField};
use super::scan_params::{PhySet, ScanParameters};
use super::{AdvReport, PeerAddress, Phy};
use crate::error::{Error, HostError};

/// Commands the controller issues to the underlying BLE host stack.
pub trait HostStack {
    /// Kick off stack bring-up; completion arrives later via
    /// [`ScanController::on_init_complete`].
    fn request_init(&mut self) -> Result<(), HostError>;

    /// Apply scan parameters for the next scan-start.
    fn set_scan_params(&mut self, params: &ScanParameters) -> Result<(), HostError>;

    /// Start one scan window/interval cycle.
    fn start_scan(&mut self) -> Result<(), HostError>;

    /// Cancel an active scan.
    fn stop_scan(&mut self) -> Result<(), HostError>;

    /// Preferred radio PHYs; best-effort, the radio may ignore it.
    fn set_preferred_phys(&mut self, phys: PhySet) -> Result<(), HostError>;

    /// The device's own address.
    fn own_address(&mut self) -> Result<PeerAddress, HostError>;

    /// Tear the stack down.  Called at most once, during shutdown.
    fn shutdown(&mut self);
}

/// Sink for the scanner's human-readable output lines.
pub trait Reporter {
    fn own_address(&mut self, address: &PeerAddress);
    /// Scanning is active with the given (already applied) parameters.
    fn scan_started(&mut self, params: &ScanParameters);
    /// Summary line for one received advertisement.
    fn advertisement(&mut self, report: &AdvReport<'_>);
    /// One decoded field of the advertisement reported last.
    fn field(&mut self, field: &DecodedField<'_>);
    fn error(&mut self, error: Error);

    // Bookkeeping notices; most sinks have no use for them.
    fn peer_connected(&mut self, _peer: &PeerAddress) {}
    fn peer_disconnected(&mut self, _peer: &PeerAddress) {}
    fn phy_updated(&mut self, _phy: Phy) {}
    fn data_length_changed(&mut self, _tx_octets: u16, _rx_octets: u16) {}
}

/// Lifecycle of one scanning session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanState {
    Uninitialized,
    Initializing,
    Scanning,
    ShuttingDown,
    Stopped,
}

/// Drives scanning against a host stack and reports what it hears.
///
/// Exactly one session at a time; the state machine is
/// `Uninitialized → Initializing → Scanning → (timeout → Scanning …)
/// → ShuttingDown → Stopped`, with initialization failure jumping
/// straight to `Stopped`.
pub struct ScanController<H: HostStack, R: Reporter> {
    host: H,
    reporter: R,
    params: ScanParameters,
    state: ScanState,
}

impl<H: HostStack, R: Reporter> ScanController<H, R> {
    pub fn new(host: H, reporter: R, params: ScanParameters) -> Self {
        Self {
            host,
            reporter,
            params,
            state: ScanState::Uninitialized,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn params(&self) -> &ScanParameters {
        &self.params
    }

    /// Request host-stack bring-up.  The session stays in
    /// `Initializing` until `on_init_complete` is delivered.
    pub fn start(&mut self) {
        if self.state != ScanState::Uninitialized {
            self.reporter.error(Error::InvalidState);
            return;
        }
        match self.host.request_init() {
            Ok(()) => self.state = ScanState::Initializing,
            Err(e) => {
                self.reporter.error(Error::InitFailed(e));
                self.state = ScanState::Stopped;
            }
        }
    }

    /// Host-stack bring-up finished.  Failure is fatal: the session
    /// stops without ever scanning, and is not retried.
    pub fn on_init_complete(&mut self, result: Result<(), HostError>) {
        if self.state != ScanState::Initializing {
            self.reporter.error(Error::InvalidState);
            return;
        }
        if let Err(e) = result {
            self.reporter.error(Error::InitFailed(e));
            self.state = ScanState::Stopped;
            return;
        }

        if let Ok(address) = self.host.own_address() {
            self.reporter.own_address(&address);
        }

        // Best-effort: on failure the radio stays on its default PHY.
        if self.host.set_preferred_phys(self.params.phys()).is_err() {
            self.reporter.error(Error::PhyNotSupported);
        }

        self.state = ScanState::Scanning;
        self.scan();
    }

    /// Push the configured parameters to the radio and start a scan
    /// cycle.  Either command failing is reported here and not retried;
    /// the session keeps its `Scanning` intent without an active radio
    /// scan until the next timeout or restart.
    fn scan(&mut self) {
        if let Err(e) = self.host.set_scan_params(&self.params) {
            self.reporter.error(Error::SetParamsFailed(e));
            return;
        }
        match self.host.start_scan() {
            Ok(()) => self.reporter.scan_started(&self.params),
            Err(e) => self.reporter.error(Error::ScanStartFailed(e)),
        }
    }

    /// One advertisement received while scanning.
    ///
    /// Reports the summary, then walks the payload field by field.  A
    /// malformed trailing structure silently ends the walk; whatever
    /// decoded before it is still reported.
    pub fn on_adv_report(&mut self, report: &AdvReport<'_>) {
        if self.state != ScanState::Scanning {
            return;
        }
        self.reporter.advertisement(report);
        for raw in AdvDataParser::new(report.data) {
            self.reporter.field(&fields::decode(&raw));
        }
    }

    /// The scan duration elapsed; re-arm with unchanged parameters so
    /// scanning is logically continuous.
    pub fn on_scan_timeout(&mut self) {
        if self.state != ScanState::Scanning {
            return;
        }
        self.scan();
    }

    /// Connection bookkeeping.  The scanner never initiates
    /// connections, so this only reports.
    pub fn on_connection_complete(&mut self, peer: &PeerAddress) {
        self.reporter.peer_connected(peer);
    }

    pub fn on_disconnection_complete(&mut self, peer: &PeerAddress) {
        self.reporter.peer_disconnected(peer);
    }

    /// Radio bookkeeping events delivered by the host stack; the
    /// scanner only passes them along.
    pub fn on_phy_update(&mut self, phy: Phy) {
        self.reporter.phy_updated(phy);
    }

    pub fn on_data_length_change(&mut self, tx_octets: u16, rx_octets: u16) {
        self.reporter.data_length_changed(tx_octets, rx_octets);
    }

    /// Stop scanning and tear the host stack down.  Safe to call from
    /// any state; terminal states are left alone.
    pub fn shutdown(&mut self) {
        match self.state {
            ScanState::Initializing | ScanState::Scanning => {
                self.state = ScanState::ShuttingDown;
                // Teardown path: a failed stop changes nothing here.
                let _ = self.host.stop_scan();
                self.host.shutdown();
                self.state = ScanState::Stopped;
            }
            ScanState::Uninitialized | ScanState::ShuttingDown | ScanState::Stopped => {}
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════
