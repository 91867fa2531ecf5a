use crate::command_responses::ResponseType;
use crate::registers::card_status::R1_ALL_ERROR_FLAGS;

/// Whether the index is a standard command or needs a CMD55 escape first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommandClass {
    Normal,
    Application,
}

/// One command as handed to the bus controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Command {
    /// Command index, 0 to 63
    pub index: u8,
    pub argument: u32,
    pub class: CommandClass,
    pub response: ResponseType,
    /// Response bits that mean the card rejected the command
    pub error_mask: u32,
}

impl Command {
    /// Command index is truncated to its 6 wire bits.
    pub const fn new(index: u8, response: ResponseType) -> Self {
        Self { index: index & 0x3F, argument: 0, class: CommandClass::Normal, response, error_mask: 0 }
    }

    pub const fn app(index: u8, response: ResponseType) -> Self {
        Self {
            index: index & 0x3F,
            argument: 0,
            class: CommandClass::Application,
            response,
            error_mask: 0,
        }
    }

    pub const fn with_error_mask(self, error_mask: u32) -> Self {
        Self { error_mask, ..self }
    }

    pub const fn with_argument(self, argument: u32) -> Self {
        Self { argument, ..self }
    }

    /// Same command addressed to the card with relative address `rca`.
    pub const fn addressed(self, rca: u16) -> Self {
        self.with_argument((rca as u32) << 16)
    }

    pub fn is_app(&self) -> bool {
        self.class == CommandClass::Application
    }
}

/// Build a normal class command descriptor.
///
/// Only the low 6 bits of `index` go on the wire; larger indices are a caller bug.
pub fn build(index: u8, argument: u32, response: ResponseType, error_mask: u32) -> Command {
    debug_assert!(index < 64, "command index {} out of range", index);
    Command::new(index, response).with_argument(argument).with_error_mask(error_mask)
}

pub const SDMMC_CMD0_GO_IDLE_STATE: Command = Command::new(0, ResponseType::None);
pub const SDMMC_CMD2_ALL_SEND_CID: Command = Command::new(2, ResponseType::Wide128);
pub const SD_CMD3_SEND_RELATIVE_ADDR: Command = Command::new(3, ResponseType::Status);
pub const SDMMC_CMD7_SELECT_CARD_CMD: Command =
    Command::new(7, ResponseType::StatusWithBusy).with_error_mask(R1_ALL_ERROR_FLAGS);
pub const SD_CMD8_SEND_IF_COND: Command = Command::new(8, ResponseType::Status);
pub const SDMMC_CMD9_SEND_CSD: Command = Command::new(9, ResponseType::Wide128);
pub const SDMMC_CMD10_SEND_CID: Command = Command::new(10, ResponseType::Wide128);
pub const SDMMC_CMD13_SEND_STATUS: Command =
    Command::new(13, ResponseType::Status).with_error_mask(R1_ALL_ERROR_FLAGS);
pub const SDMMC_CMD16_SET_BLOCKLEN: Command =
    Command::new(16, ResponseType::Status).with_error_mask(R1_ALL_ERROR_FLAGS);
pub const SDMMC_CMD17_READ_SINGLE_BLOCK: Command =
    Command::new(17, ResponseType::Status).with_error_mask(R1_ALL_ERROR_FLAGS);
pub const SDMMC_CMD18_READ_MULTIPLE_BLOCK: Command =
    Command::new(18, ResponseType::Status).with_error_mask(R1_ALL_ERROR_FLAGS);
pub const SDMMC_CMD24_WRITE_BLOCK: Command =
    Command::new(24, ResponseType::Status).with_error_mask(R1_ALL_ERROR_FLAGS);
pub const SDMMC_CMD25_WRITE_MULTIPLE_BLOCK: Command =
    Command::new(25, ResponseType::Status).with_error_mask(R1_ALL_ERROR_FLAGS);
pub const SDMMC_CMD55_APP_CMD: Command = Command::new(55, ResponseType::Status);

pub const SD_ACMD6_SET_BUS_WIDTH: Command =
    Command::app(6, ResponseType::Status).with_error_mask(R1_ALL_ERROR_FLAGS);
pub const SD_ACMD41_SD_SEND_OP_COND: Command = Command::app(41, ResponseType::Ocr);
