pub mod transport;

use bitflags::bitflags;
use embedded_error::mci::MciError;

use crate::command_arguments::BusWidth;
use crate::commands::Command;

pub const SD_MMC_BLOCK_SIZE: usize = 512;

bitflags! {
    /// Controller present state flags.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct PresentStatus: u32 {
        /// Command line in use, no new command may be issued
        const COMMAND_INHIBIT = 1 << 0;
        /// Data lines in use, no data command may be issued
        const DATA_INHIBIT = 1 << 1;
        /// Card present on the detect line
        const CARD_INSERTED = 1 << 16;
    }
}

bitflags! {
    /// Parts of the controller to put back into reset state.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct ResetMask: u32 {
        const ALL = 1 << 24;
        const COMMAND = 1 << 25;
        const DATA = 1 << 26;
    }
}

pub enum DataBuffer<'a> {
    /// Card to host
    Read(&'a mut [u8]),
    /// Host to card
    Write(&'a [u8]),
}

/// Data phase of a transfer.
pub struct DataTransfer<'a> {
    pub block_size: u16,
    pub block_count: u32,
    /// Let the controller send STOP_TRANSMISSION after the last block
    pub auto_stop: bool,
    pub buffer: DataBuffer<'a>,
}

impl<'a> DataTransfer<'a> {
    pub fn is_read(&self) -> bool {
        matches!(self.buffer, DataBuffer::Read(_))
    }
}

/// Low level SD host controller driver.
///
/// Only blocking primitives are needed: a transfer returns once the command,
/// and its data phase if any, completed or failed.
pub trait Host {
    /// Initialize host controller low level driver.
    fn init(&mut self) -> Result<(), MciError>;

    /// Deinitialize host controller low level driver.
    fn deinit(&mut self) -> Result<(), MciError>;

    /// Reset controller logic, false if it did not complete within `timeout`
    fn reset(&mut self, mask: ResetMask, timeout: u32) -> bool;

    /// Enable card power, false if not active within `timeout`
    fn set_card_power(&mut self, active: bool, timeout: u32) -> bool;

    /// Divide `base_clock` down to at most `target_clock`, returns the actual bus clock
    fn set_clock(&mut self, base_clock: u32, target_clock: u32) -> u32;

    fn set_data_bus_width(&mut self, bus_width: BusWidth);

    /// Send a command, with its data phase if any, and wait for completion.
    /// Returns the response words in register layout.
    fn submit_transfer(
        &mut self,
        command: &Command,
        data: Option<DataTransfer<'_>>,
    ) -> Result<[u32; 4], MciError>;

    fn present_status(&mut self) -> PresentStatus;

    /// Card detect line, or DAT3 sampling when the board has no detect pin
    fn card_inserted(&mut self) -> bool;
}
