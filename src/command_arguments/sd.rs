use bit_field::BitField;

use super::BusWidth;

/// 2.7-3.6V host supply window
pub const SD_CMD8_HIGH_VOLTAGE: u8 = 0x1;
pub const SD_CMD8_PATTERN: u8 = 0xAA;

/// Voltage window requested with ACMD41 (3.2-3.3V, bit 31 set as the host does)
pub const SD_VOLTAGE_WINDOW: u32 = 0x8010_0000;
/// ACMD41 HCS: host supports high capacity cards
pub const SD_ACMD41_HCS: u32 = 0x4000_0000;
/// ACMD41 S18R: host may switch to 1.8V signalling
pub const SD_ACMD41_S18R: u32 = 0x0100_0000;

/// CMD8 argument: supply voltage and check pattern.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cmd8 {
    pub val: u32,
}

impl Cmd8 {
    pub fn set_cmd8_pattern(&mut self, pattern: bool) -> &mut Self {
        let value = if pattern { SD_CMD8_PATTERN } else { 0 };
        self.val.set_bits(0..8, value as u32);
        self
    }

    pub fn set_high_voltage(&mut self, high_voltage: bool) -> &mut Self {
        let value = if high_voltage { SD_CMD8_HIGH_VOLTAGE } else { 0 };
        self.val.set_bits(8..12, value as u32);
        self
    }

    /// Whether an R7 response echoes this argument back.
    pub fn accepted_by(&self, response: u32) -> bool {
        response.get_bits(0..12) == self.val.get_bits(0..12)
    }
}

/// ACMD41 argument: voltage window plus high capacity and 1.8V capability bits.
pub fn sd_send_op_cond_argument() -> u32 {
    SD_VOLTAGE_WINDOW | SD_ACMD41_HCS | SD_ACMD41_S18R
}

/// ACMD6 argument for the given bus width, `None` if SD cards can't do it.
pub fn acmd6_bus_width(bus_width: BusWidth) -> Option<u32> {
    match bus_width {
        BusWidth::_1BIT => Some(0x0),
        BusWidth::_4BIT => Some(0x2),
        BusWidth::_8BIT => None,
    }
}
