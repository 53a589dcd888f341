//! # MFM Input Register Map
//!
//! Input register addresses of the MFM630/230/220/120/72 energy meters.
//! Every entry is a 32-bit float spanning two 16-bit registers, read with
//! function code 0x04.
//!
//! Not every model publishes every register. Single-phase meters only
//! answer the phase 1 entries and the totals.

// ============================================================================
// Voltage (V)
// ============================================================================

pub const MFM_VOLTAGE_V1N: u16 = 0x0000;
pub const MFM_VOLTAGE_V2N: u16 = 0x0002;
pub const MFM_VOLTAGE_V3N: u16 = 0x0004;
pub const MFM_AVERAGE_VOLTAGE_LN: u16 = 0x0006;
pub const MFM_VOLTAGE_V12: u16 = 0x0008;
pub const MFM_VOLTAGE_V23: u16 = 0x000A;
pub const MFM_VOLTAGE_V31: u16 = 0x000C;
pub const MFM_AVERAGE_VOLTAGE_LL: u16 = 0x000E;

// ============================================================================
// Current (A)
// ============================================================================

pub const MFM_CURRENT_I1: u16 = 0x0010;
pub const MFM_CURRENT_I2: u16 = 0x0012;
pub const MFM_CURRENT_I3: u16 = 0x0014;
pub const MFM_AVERAGE_CURRENT: u16 = 0x0016;
pub const MFM_NEUTRAL_CURRENT: u16 = 0x007A;

// ============================================================================
// Power (kW, kVA, kVAr) and power factor
// ============================================================================

pub const MFM_KW1: u16 = 0x0018;
pub const MFM_KW2: u16 = 0x001A;
pub const MFM_KW3: u16 = 0x001C;
pub const MFM_KVA1: u16 = 0x001E;
pub const MFM_KVA2: u16 = 0x0020;
pub const MFM_KVA3: u16 = 0x0022;
pub const MFM_KVAR1: u16 = 0x0024;
pub const MFM_KVAR2: u16 = 0x0026;
pub const MFM_KVAR3: u16 = 0x0028;
pub const MFM_TOTAL_KW: u16 = 0x002A;
pub const MFM_TOTAL_KVA: u16 = 0x002C;
pub const MFM_TOTAL_KVAR: u16 = 0x002E;
pub const MFM_PF1: u16 = 0x0030;
pub const MFM_PF2: u16 = 0x0032;
pub const MFM_PF3: u16 = 0x0034;
pub const MFM_AVERAGE_PF: u16 = 0x0036;

/// Line frequency (Hz).
pub const MFM_FREQUENCY: u16 = 0x0038;

// ============================================================================
// Energy (kWh, kVAh, kVArh)
// ============================================================================

pub const MFM_KWH: u16 = 0x003A;
pub const MFM_KVAH: u16 = 0x003C;
pub const MFM_KVARH: u16 = 0x003E;

// ============================================================================
// Min/max power since reset
// ============================================================================

pub const MFM_KW_MAX_ACTIVE_POWER: u16 = 0x0040;
pub const MFM_KW_MIN_ACTIVE_POWER: u16 = 0x0042;
pub const MFM_KVAR_MAX_REACTIVE_POWER: u16 = 0x0044;
pub const MFM_KVAR_MIN_REACTIVE_POWER: u16 = 0x0046;
pub const MFM_KVA_MAX_APPARENT_POWER: u16 = 0x0048;

// ============================================================================
// Total harmonic distortion (%)
// ============================================================================

pub const MFM_THD_VOLTAGE_V1N: u16 = 0x007C;
pub const MFM_THD_VOLTAGE_V2N: u16 = 0x007E;
pub const MFM_THD_VOLTAGE_V3N: u16 = 0x0080;
pub const MFM_THD_VOLTAGE_V12: u16 = 0x0082;
pub const MFM_THD_VOLTAGE_V23: u16 = 0x0084;
pub const MFM_THD_VOLTAGE_V31: u16 = 0x0086;
pub const MFM_THD_CURRENT_I1: u16 = 0x0088;
pub const MFM_THD_CURRENT_I2: u16 = 0x008A;
pub const MFM_THD_CURRENT_I3: u16 = 0x008C;

// ============================================================================
// Device info and demand
// ============================================================================

pub const MFM_SERIAL_NUMBER: u16 = 0x02AC;
pub const MFM_MAX_I1_DEMAND: u16 = 0x02B4;
pub const MFM_MAX_I2_DEMAND: u16 = 0x02B6;
pub const MFM_MAX_I3_DEMAND: u16 = 0x02B8;
pub const MFM_MAX_AVERAGE_I_DEMAND: u16 = 0x02BA;
pub const MFM_PHASE_SEQUENCE_INDICATION: u16 = 0x02BC;
pub const MFM_EXISTING_KW_MAX_ACTIVE_POWER: u16 = 0x02BE;
pub const MFM_EXISTING_KW_MIN_ACTIVE_POWER: u16 = 0x02C0;
pub const MFM_EXISTING_KVAR_MAX_REACTIVE_POWER: u16 = 0x02C2;
pub const MFM_EXISTING_KVAR_MIN_REACTIVE_POWER: u16 = 0x02C4;
pub const MFM_EXISTING_KVA_MAX_APPARENT_POWER: u16 = 0x02C6;
pub const MFM_EXISTING_KVA_MAX_I1_DEMAND: u16 = 0x02C8;
pub const MFM_EXISTING_KVA_MAX_I2_DEMAND: u16 = 0x02CA;
pub const MFM_EXISTING_KVA_MAX_I3_DEMAND: u16 = 0x02CC;
pub const MFM_EXISTING_KVA_MAX_AVG_1_DEMAND: u16 = 0x02CE;

// ============================================================================
// DDM18SD single-phase meter
// ============================================================================

pub const DDM_PHASE_1_VOLTAGE: u16 = 0x0000;
pub const DDM_PHASE_1_CURRENT: u16 = 0x0008;
/// Active power (W).
pub const DDM_PHASE_1_POWER: u16 = 0x0012;
/// Reactive power (VAr).
pub const DDM_PHASE_1_REACTIVE_POWER: u16 = 0x001A;
pub const DDM_PHASE_1_POWER_FACTOR: u16 = 0x002A;
pub const DDM_FREQUENCY: u16 = 0x0036;
pub const DDM_IMPORT_ACTIVE_ENERGY: u16 = 0x0100;
pub const DDM_IMPORT_REACTIVE_ENERGY: u16 = 0x0400;

/// Named register, for tools that list or poll by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterInfo {
    pub name: &'static str,
    pub address: u16,
    pub unit: &'static str,
}

const fn info(name: &'static str, address: u16, unit: &'static str) -> RegisterInfo {
    RegisterInfo {
        name,
        address,
        unit,
    }
}

/// Common measurements, in register order.
pub const COMMON: &[RegisterInfo] = &[
    info("V1N", MFM_VOLTAGE_V1N, "V"),
    info("V2N", MFM_VOLTAGE_V2N, "V"),
    info("V3N", MFM_VOLTAGE_V3N, "V"),
    info("I1", MFM_CURRENT_I1, "A"),
    info("I2", MFM_CURRENT_I2, "A"),
    info("I3", MFM_CURRENT_I3, "A"),
    info("Total kW", MFM_TOTAL_KW, "kW"),
    info("Total kVA", MFM_TOTAL_KVA, "kVA"),
    info("Total kVAr", MFM_TOTAL_KVAR, "kVAr"),
    info("Average PF", MFM_AVERAGE_PF, ""),
    info("Frequency", MFM_FREQUENCY, "Hz"),
    info("kWh", MFM_KWH, "kWh"),
];

/// DDM18SD measurements, in register order.
pub const DDM18SD: &[RegisterInfo] = &[
    info("Voltage", DDM_PHASE_1_VOLTAGE, "V"),
    info("Current", DDM_PHASE_1_CURRENT, "A"),
    info("Power", DDM_PHASE_1_POWER, "W"),
    info("Reactive power", DDM_PHASE_1_REACTIVE_POWER, "VAr"),
    info("Power factor", DDM_PHASE_1_POWER_FACTOR, ""),
    info("Frequency", DDM_FREQUENCY, "Hz"),
    info("Import kWh", DDM_IMPORT_ACTIVE_ENERGY, "kWh"),
    info("Import kVArh", DDM_IMPORT_REACTIVE_ENERGY, "kVArh"),
];

/// Look up a register in [`COMMON`] by name (case-insensitive).
pub fn find(name: &str) -> Option<&'static RegisterInfo> {
    find_in(COMMON, name)
}

/// Look up a register in `table` by name (case-insensitive).
pub fn find_in(table: &'static [RegisterInfo], name: &str) -> Option<&'static RegisterInfo> {
    table.iter().find(|r| r.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floats_span_two_registers() {
        for table in [COMMON, DDM18SD] {
            for pair in table.windows(2) {
                assert!(pair[0].address < pair[1].address);
            }
            for r in table {
                assert_eq!(r.address % 2, 0, "{} is not word-pair aligned", r.name);
            }
        }
    }

    #[test]
    fn test_ddm18sd_table() {
        assert_eq!(DDM18SD.len(), 8);
        assert_eq!(
            find_in(DDM18SD, "import kwh").map(|r| r.address),
            Some(DDM_IMPORT_ACTIVE_ENERGY)
        );
        assert_eq!(DDM_IMPORT_REACTIVE_ENERGY, 0x0400);
    }

    #[test]
    fn test_known_addresses() {
        assert_eq!(MFM_KW1, 0x0018);
        assert_eq!(MFM_FREQUENCY, 0x0038);
        assert_eq!(MFM_EXISTING_KVA_MAX_AVG_1_DEMAND, 0x02CE);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("frequency").map(|r| r.address), Some(MFM_FREQUENCY));
        assert_eq!(find("KWH").map(|r| r.unit), Some("kWh"));
        assert!(find("nope").is_none());
    }
}
