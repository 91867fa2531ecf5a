use bit_field::BitField;
use bitflags::bitflags;

use crate::card::CardState;

bitflags! {
    /// R1 card status bits.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct CardStatusFlags: u32 {
        const OUT_OF_RANGE = 1 << 31;
        const ADDRESS_ERROR = 1 << 30;
        const BLOCK_LEN_ERROR = 1 << 29;
        const ERASE_SEQ_ERROR = 1 << 28;
        const ERASE_PARAM = 1 << 27;
        const WP_VIOLATION = 1 << 26;
        const CARD_IS_LOCKED = 1 << 25;
        const LOCK_UNLOCK_FAILED = 1 << 24;
        const COM_CRC_ERROR = 1 << 23;
        const ILLEGAL_COMMAND = 1 << 22;
        const CARD_ECC_FAILED = 1 << 21;
        const CC_ERROR = 1 << 20;
        const ERROR = 1 << 19;
        const CSD_OVERWRITE = 1 << 16;
        const WP_ERASE_SKIP = 1 << 15;
        const CARD_ECC_DISABLED = 1 << 14;
        const ERASE_RESET = 1 << 13;
        const READY_FOR_DATA = 1 << 8;
        const FX_EVENT = 1 << 6;
        const APP_CMD = 1 << 5;
        const AKE_SEQ_ERROR = 1 << 3;

        const ERRORS = Self::OUT_OF_RANGE.bits()
            | Self::ADDRESS_ERROR.bits()
            | Self::BLOCK_LEN_ERROR.bits()
            | Self::ERASE_SEQ_ERROR.bits()
            | Self::ERASE_PARAM.bits()
            | Self::WP_VIOLATION.bits()
            | Self::LOCK_UNLOCK_FAILED.bits()
            | Self::COM_CRC_ERROR.bits()
            | Self::ILLEGAL_COMMAND.bits()
            | Self::CARD_ECC_FAILED.bits()
            | Self::CC_ERROR.bits()
            | Self::ERROR.bits()
            | Self::CSD_OVERWRITE.bits()
            | Self::WP_ERASE_SKIP.bits()
            | Self::AKE_SEQ_ERROR.bits();
    }
}

/// Every R1 bit reporting a card side error
pub const R1_ALL_ERROR_FLAGS: u32 = CardStatusFlags::ERRORS.bits();

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CardStatusRegister {
    pub val: u32,
}

impl CardStatusRegister {
    pub fn flags(&self) -> CardStatusFlags {
        CardStatusFlags::from_bits_truncate(self.val)
    }

    pub fn errors(&self) -> CardStatusFlags {
        self.flags() & CardStatusFlags::ERRORS
    }

    pub fn ready_for_data(&self) -> bool {
        self.val.get_bit(8)
    }

    pub fn app_cmd(&self) -> bool {
        self.val.get_bit(5)
    }

    /// CURRENT_STATE, bits 9 to 12
    pub fn current_state(&self) -> Option<CardState> {
        current_card_state(self.val)
    }
}

pub fn current_card_state(status: u32) -> Option<CardState> {
    CardState::from_bits(status.get_bits(9..13) as u8)
}
