//! SoftDevice-backed host stack glue.
//!
//! Translates the controller's fire-and-forget commands into
//! SoftDevice calls and pumps SoftDevice scan events back into the
//! controller's handlers.  Everything here runs on the single Embassy
//! executor, so the handlers never overlap and the controller needs no
//! locking.

use defmt::{info, warn};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use nrf_softdevice::ble::central;
use nrf_softdevice::{raw, Softdevice};

use crate::ble::controller::{HostStack, Reporter, ScanController};
use crate::ble::fields::DecodedField;
use crate::ble::scan_params::{PhySet, ScanParameters};
use crate::ble::{AddressKind, AdvReport, PeerAddress, Phy};
use crate::config;
use crate::error::{Error, HostError};

/// Scan-start requests from the controller to the scan pump, carrying
/// the parameters most recently applied with `set_scan_params`.
static SCAN_START: Signal<CriticalSectionRawMutex, ScanParameters> = Signal::new();

/// Stop requests; cancels the scan future in flight.
static SCAN_STOP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// `HostStack` implementation over the Nordic SoftDevice S140.
pub struct SoftdeviceHost {
    sd: &'static Softdevice,
    /// Parameters last pushed by the controller; what the next
    /// scan-start applies.
    applied: ScanParameters,
}

impl SoftdeviceHost {
    pub fn new(sd: &'static Softdevice) -> Self {
        Self {
            sd,
            applied: ScanParameters::default(),
        }
    }
}

impl HostStack for SoftdeviceHost {
    fn request_init(&mut self) -> Result<(), HostError> {
        // `Softdevice::enable` ran before the executor started; the
        // matching completion event is delivered by the scan pump.
        Ok(())
    }

    fn set_scan_params(&mut self, params: &ScanParameters) -> Result<(), HostError> {
        self.applied = *params;
        Ok(())
    }

    fn start_scan(&mut self) -> Result<(), HostError> {
        SCAN_START.signal(self.applied);
        Ok(())
    }

    fn stop_scan(&mut self) -> Result<(), HostError> {
        SCAN_STOP.signal(());
        Ok(())
    }

    fn set_preferred_phys(&mut self, phys: PhySet) -> Result<(), HostError> {
        // Advertisements arrive on the primary channels, which only
        // exist on 1M and Coded.  The actual PHY set travels with the
        // scan parameters on every scan-start.
        if !phys.contains(PhySet::LE_1M) && !phys.contains(PhySet::LE_CODED) {
            return Err(HostError::NotSupported);
        }
        Ok(())
    }

    fn own_address(&mut self) -> Result<PeerAddress, HostError> {
        Ok(address_from_softdevice(nrf_softdevice::ble::get_address(
            self.sd,
        )))
    }

    fn shutdown(&mut self) {
        let _ = unsafe { raw::sd_softdevice_disable() };
    }
}

fn address_from_softdevice(address: nrf_softdevice::ble::Address) -> PeerAddress {
    use nrf_softdevice::ble::AddressType;

    let kind = match address.address_type() {
        AddressType::Public => AddressKind::Public,
        AddressType::RandomStatic => AddressKind::RandomStatic,
        AddressType::RandomPrivateResolvable => AddressKind::RandomPrivateResolvable,
        AddressType::RandomPrivateNonResolvable => AddressKind::RandomPrivateNonResolvable,
        AddressType::Anonymous => AddressKind::Anonymous,
    };
    PeerAddress {
        kind,
        octets: address.bytes(),
    }
}

fn phy_from_raw(phy: u8) -> Option<Phy> {
    match phy as u32 {
        raw::BLE_GAP_PHY_1MBPS => Some(Phy::Le1M),
        raw::BLE_GAP_PHY_2MBPS => Some(Phy::Le2M),
        raw::BLE_GAP_PHY_CODED => Some(Phy::LeCoded),
        _ => None,
    }
}

/// Map the portable PHY bitmask onto the SoftDevice scan PHY set.
fn scan_phys(phys: PhySet) -> nrf_softdevice::ble::PhySet {
    use nrf_softdevice::ble::PhySet as SdPhySet;

    match (phys.contains(PhySet::LE_1M), phys.contains(PhySet::LE_CODED)) {
        (true, true) => SdPhySet::M1Coded,
        (false, true) => SdPhySet::Coded,
        // 2M has no primary advertising channel; 1M is the fallback.
        _ => SdPhySet::M1,
    }
}

/// Build one advertising report view over a raw SoftDevice event.
///
/// The returned report borrows the event's payload; it must be consumed
/// before the callback returns.
fn adv_report_from_raw<'a>(
    params: &raw::ble_gap_evt_adv_report_t,
    data: &'a [u8],
) -> AdvReport<'a> {
    let address = nrf_softdevice::ble::Address::from_raw(params.peer_addr);
    let tx_power = (params.tx_power != raw::BLE_GAP_POWER_LEVEL_INVALID as i8)
        .then_some(params.tx_power);

    AdvReport {
        peer: address_from_softdevice(address),
        primary_phy: phy_from_raw(params.primary_phy).unwrap_or(Phy::Le1M),
        secondary_phy: phy_from_raw(params.secondary_phy),
        tx_power,
        rssi: params.rssi,
        data,
    }
}

/// `Reporter` implementation printing defmt diagnostic lines.
pub struct DefmtReporter;

impl Reporter for DefmtReporter {
    fn own_address(&mut self, address: &PeerAddress) {
        info!(
            "device address {=[u8]:02x} ({})",
            &address.octets[..],
            address.kind
        );
    }

    fn scan_started(&mut self, params: &ScanParameters) {
        info!(
            "scanning started ({} ms interval, {} ms window, active={})",
            params.interval_ms(),
            params.window_ms(),
            params.active()
        );
    }

    fn advertisement(&mut self, report: &AdvReport<'_>) {
        info!(
            "adv from {=[u8]:02x} ({}) phy {} tx {} rssi {} dBm",
            &report.peer.octets[..],
            report.peer.kind,
            report.primary_phy,
            report.tx_power,
            report.rssi
        );
    }

    fn field(&mut self, field: &DecodedField<'_>) {
        match field {
            DecodedField::Flags(flags) => info!(
                "  flags: limited={} general={} no-bredr={} simul-ctrl={} simul-host={}",
                flags.limited_discoverable(),
                flags.general_discoverable(),
                flags.br_edr_not_supported(),
                flags.simultaneous_le_br_edr_controller(),
                flags.simultaneous_le_br_edr_host()
            ),
            DecodedField::ServiceUuids16 { complete, uuids } => {
                info!("  service uuids (16-bit, complete={}):", complete);
                for uuid in uuids.iter() {
                    info!("    0x{=u16:04x}", uuid);
                }
            }
            DecodedField::ServiceUuids32 { complete, uuids } => {
                info!("  service uuids (32-bit, complete={}):", complete);
                for uuid in uuids.iter() {
                    info!("    0x{=u32:08x}", uuid);
                }
            }
            DecodedField::ServiceUuids128 { complete, uuids } => {
                info!("  service uuids (128-bit, complete={}):", complete);
                for uuid in uuids.iter() {
                    info!("    {=[u8]:02x}", uuid);
                }
            }
            DecodedField::LocalName { complete, name } => {
                info!("  name (complete={}): {=str}", complete, name.as_str());
            }
            DecodedField::TxPowerLevel(dbm) => info!("  tx power: {} dBm", dbm),
            DecodedField::PeripheralConnIntervalRange { min, max } => {
                info!("  conn interval range: {}..{} (1.25 ms units)", min, max);
            }
            DecodedField::SolicitUuids16(uuids) => {
                info!("  solicited uuids (16-bit): {} entries", uuids.len());
            }
            DecodedField::SolicitUuids32(uuids) => {
                info!("  solicited uuids (32-bit): {} entries", uuids.len());
            }
            DecodedField::SolicitUuids128(uuids) => {
                info!("  solicited uuids (128-bit): {} entries", uuids.len());
            }
            DecodedField::ServiceData16 { uuid, data } => {
                info!("  service data 0x{=u16:04x}: {=[u8]:02x}", *uuid, *data);
            }
            DecodedField::ServiceData32 { uuid, data } => {
                info!("  service data 0x{=u32:08x}: {=[u8]:02x}", *uuid, *data);
            }
            DecodedField::ServiceData128 { uuid, data } => {
                info!("  service data {=[u8]:02x}: {=[u8]:02x}", *uuid, *data);
            }
            DecodedField::Appearance(value) => info!("  appearance: 0x{=u16:04x}", *value),
            DecodedField::AdvertisingInterval(units) => {
                info!("  advertising interval: {} (0.625 ms units)", units);
            }
            DecodedField::ManufacturerData { company, payload } => {
                info!(
                    "  manufacturer data (company 0x{=u16:04x}): {=[u8]:02x}",
                    *company, *payload
                );
            }
            DecodedField::Unknown { ad_type, value } => {
                info!("  type 0x{=u8:02x}: {=[u8]:02x}", *ad_type, *value);
            }
        }
    }

    fn peer_connected(&mut self, peer: &PeerAddress) {
        info!("peer connected: {=[u8]:02x}", &peer.octets[..]);
    }

    fn peer_disconnected(&mut self, peer: &PeerAddress) {
        info!("peer disconnected: {=[u8]:02x}", &peer.octets[..]);
    }

    fn phy_updated(&mut self, phy: Phy) {
        info!("phy updated: {}", phy);
    }

    fn data_length_changed(&mut self, tx_octets: u16, rx_octets: u16) {
        info!("data length changed: tx {} rx {}", tx_octets, rx_octets);
    }

    fn error(&mut self, error: Error) {
        warn!("{=str}: {}", error.describe(), error);
    }
}

/// Drive the scan controller against the SoftDevice central API.
///
/// Waits for scan-start requests from the controller, runs one scan
/// cycle per request, and feeds every received report and timeout back
/// into the controller.
pub async fn scanner_task(sd: &'static Softdevice) -> ! {
    let mut ctrl = ScanController::new(
        SoftdeviceHost::new(sd),
        DefmtReporter,
        ScanParameters::default(),
    );

    ctrl.start();
    // The stack came up before the executor; deliver the completion a
    // live bring-up would post.
    ctrl.on_init_complete(Ok(()));

    loop {
        let params = SCAN_START.wait().await;

        let scan_config = central::ScanConfig {
            active: params.active(),
            phys: scan_phys(params.phys()),
            interval: params.interval_units() as u32,
            window: params.window_units() as u32,
            timeout: config::SCAN_TIMEOUT_10MS,
            ..Default::default()
        };

        let scan = central::scan(sd, &scan_config, |raw_report| {
            let data = unsafe {
                core::slice::from_raw_parts(raw_report.data.p_data, raw_report.data.len as usize)
            };
            ctrl.on_adv_report(&adv_report_from_raw(raw_report, data));
            // Keep scanning until the SoftDevice ends the cycle.
            None::<()>
        });

        // Bind first so the scan future (and its borrow of the
        // controller) is dropped before the handlers below run.
        let outcome = select(scan, SCAN_STOP.wait()).await;
        match outcome {
            Either::First(Err(central::ScanError::Timeout)) => ctrl.on_scan_timeout(),
            Either::First(Err(_)) => {
                // Treat an aborted window like an expired one, with a
                // short back-off so a wedged radio cannot busy-loop us.
                warn!("scan cycle aborted, re-arming");
                Timer::after(Duration::from_millis(100)).await;
                ctrl.on_scan_timeout();
            }
            Either::First(Ok(_)) => {}
            Either::Second(()) => info!("scan stopped"),
        }
    }
}
