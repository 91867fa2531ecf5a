use crate::bus::SD_MMC_BLOCK_SIZE;
use crate::command_arguments::BusWidth;

use super::state::Stage;

/// State of the card behind one bus instance.
///
/// `block_length` and `block_count` only mean something while `initialized`
/// is set; `rca` once the identification stage is done.
pub struct Card<HOST> {
    /// Bus controller, owned for the lifetime of the slot
    pub host: HOST,
    /// Set once the whole initialization sequence succeeded
    pub initialized: bool,
    /// Last initialization stage reached
    pub stage: Stage,
    /// Relative card address
    pub rca: u16,
    /// Transfer unit in bytes
    pub block_length: u16,
    /// Number of addressable blocks
    pub block_count: u32,
    /// Controller input reference clock
    pub base_clock: u32,
    /// Card access clock as actually set by the controller
    pub clock: u32,
    /// Number of DATA lines on bus
    pub bus_width: BusWidth,
    /// Last R1 card status
    pub status: u32,
    /// Last operating conditions (R7 or R3) word
    pub ocr: u32,
}

impl<HOST> Card<HOST> {
    pub fn new(host: HOST, base_clock: u32) -> Self {
        Self {
            host,
            initialized: false,
            stage: Stage::Idle,
            rca: 0,
            block_length: SD_MMC_BLOCK_SIZE as u16,
            block_count: 0,
            base_clock,
            clock: 0,
            bus_width: BusWidth::_1BIT,
            status: 0,
            ocr: 0,
        }
    }

    /// Forget everything learnt about the card.
    pub fn reset(&mut self) {
        self.initialized = false;
        self.stage = Stage::Idle;
        self.rca = 0;
        self.block_length = SD_MMC_BLOCK_SIZE as u16;
        self.block_count = 0;
        self.status = 0;
        self.ocr = 0;
    }
}
