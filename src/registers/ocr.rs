use bit_field::BitField;

/// Operating conditions register, as returned by ACMD41 (R3).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OcrRegister {
    pub val: u32,
}

impl OcrRegister {
    /// Supported voltage window, bits 15 to 23
    pub fn voltage_window(&self) -> u32 {
        self.val.get_bits(15..24)
    }

    /// Switching to 1.8V accepted (S18A)
    pub fn switching_to_1v8_accepted(&self) -> bool {
        self.val.get_bit(24)
    }

    /// Card capacity status, set for high and extended capacity cards
    pub fn card_capacity_status(&self) -> bool {
        self.val.get_bit(30)
    }

    /// Card power up status, low while the card is still busy
    pub fn card_powered_up_status(&self) -> bool {
        self.val.get_bit(31)
    }
}
