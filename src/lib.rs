//! Host-testable library surface for blescout.
//!
//! The advertising-data parser, field decoders, scan parameters, and
//! the scan-controller state machine are pure logic with no hardware
//! dependencies; they compile on the host for `cargo test`.
//!
//! The SoftDevice glue (`ble::host`) and the embedded entry point in
//! `main.rs` only build with the `embedded` feature on an nRF52840
//! target.

#![cfg_attr(not(test), no_std)]

pub mod ble;
pub mod config;
pub mod error;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests - cross-module behavior through the public API
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::ble::adv_parser::AdvDataParser;
    use crate::ble::fields::{decode, DecodedField};
    use crate::ble::scan_params::{PhySet, ScanParameters};

    #[test]
    fn parse_and_decode_a_typical_advertisement() {
        // Flags, battery service, name, tx power - the shape a real
        // peripheral broadcasts.
        let payload = [
            0x02, 0x01, 0x06, // Flags
            0x03, 0x03, 0x0F, 0x18, // Complete 16-bit UUIDs
            0x05, 0x09, b'D', b'e', b'm', b'o', // Complete Local Name
            0x02, 0x0A, 0x04, // TX Power Level
        ];

        let decoded: Vec<DecodedField<'_>> = AdvDataParser::new(&payload)
            .map(|f| decode(&f))
            .collect();

        assert_eq!(decoded.len(), 4);
        assert!(matches!(decoded[0], DecodedField::Flags(f) if f.general_discoverable()));
        assert!(
            matches!(&decoded[1], DecodedField::ServiceUuids16 { complete: true, uuids }
                if uuids.iter().eq([0x180F]))
        );
        assert!(matches!(&decoded[2], DecodedField::LocalName { complete: true, name }
            if name.as_str() == "Demo"));
        assert_eq!(decoded[3], DecodedField::TxPowerLevel(4));
    }

    #[test]
    fn garbage_after_valid_fields_is_dropped() {
        let payload = [
            0x02, 0x01, 0x06, // Flags
            0x1F, 0x09, b'X', // Name claiming 30 bytes with 1 present
        ];

        let decoded: Vec<DecodedField<'_>> = AdvDataParser::new(&payload)
            .map(|f| decode(&f))
            .collect();

        assert_eq!(decoded.len(), 1);
        assert!(matches!(decoded[0], DecodedField::Flags(_)));
    }

    #[test]
    fn all_zero_payload_yields_nothing() {
        let payload = [0u8; 31];
        assert_eq!(AdvDataParser::new(&payload).count(), 0);
    }

    #[test]
    fn scan_parameters_reject_window_over_interval() {
        assert!(ScanParameters::new(PhySet::LE_1M, 100, 200, false).is_err());
        assert!(ScanParameters::new(PhySet::LE_1M.union(PhySet::LE_CODED), 200, 100, true).is_ok());
    }
}
