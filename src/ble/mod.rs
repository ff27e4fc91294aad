//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Observer** role:
//!
//! 1. **Advertising Data Parser** - walks the length-prefixed structures
//!    of a raw advertisement payload.
//! 2. **Field Decoders** - turn recognized structure types (flags, local
//!    name, service UUID lists, ...) into typed values.
//! 3. **Scan Controller** - owns the scan configuration and the
//!    start/timeout/restart lifecycle, feeding every received report
//!    through the parser.
//!
//! The SoftDevice-facing glue lives in the `host` module and is only
//! compiled for the embedded target; everything else is pure logic
//! that tests on the host.

pub mod adv_parser;
pub mod controller;
pub mod fields;
pub mod scan_params;

#[cfg(feature = "embedded")]
pub mod host;

/// GAP address type of a peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressKind {
    Public,
    RandomStatic,
    RandomPrivateResolvable,
    RandomPrivateNonResolvable,
    Anonymous,
}

/// 48-bit BLE device address plus its GAP address type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerAddress {
    pub kind: AddressKind,
    /// Address bytes in over-the-air (little-endian) order.
    pub octets: [u8; 6],
}

/// Radio PHY an advertisement was received on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phy {
    Le1M,
    Le2M,
    LeCoded,
}

/// One advertising report delivered by the host stack.
///
/// `data` borrows the payload owned by the stack's event object and is
/// only valid for the duration of the delivering callback; nothing may
/// retain it past that call.
#[derive(Clone, Copy, Debug)]
pub struct AdvReport<'a> {
    pub peer: PeerAddress,
    pub primary_phy: Phy,
    /// PHY of the auxiliary packet, for extended advertisements.
    pub secondary_phy: Option<Phy>,
    /// Radiated power in dBm; `None` when the advertiser did not
    /// include it.
    pub tx_power: Option<i8>,
    /// Received signal strength in dBm.
    pub rssi: i8,
    /// Raw advertising payload.
    pub data: &'a [u8],
}
