mod controller;
mod sdcard;

use embedded_hal::blocking::delay::DelayUs;
use log::trace;

use crate::bus::{DataBuffer, DataTransfer, Host};
use crate::commands::{
    SDMMC_CMD13_SEND_STATUS, SDMMC_CMD17_READ_SINGLE_BLOCK, SDMMC_CMD18_READ_MULTIPLE_BLOCK,
    SDMMC_CMD24_WRITE_BLOCK, SDMMC_CMD25_WRITE_MULTIPLE_BLOCK,
};
use crate::error::{Error, Result};
use crate::registers::card_status::CardStatusRegister;

pub use controller::Controller;

impl<HOST: Host, DELAY: DelayUs<u32>> Controller<HOST, DELAY> {
    /// CMD13: Get status register.
    pub fn send_status(&mut self) -> Result<CardStatusRegister> {
        if !self.card.initialized {
            return Err(Error::NotInitialized);
        }
        let response = self.send_command(&SDMMC_CMD13_SEND_STATUS.addressed(self.card.rca))?;
        self.track_status(&response);
        Ok(response.status())
    }

    /// Number of bytes `block_count` blocks take, checked against a buffer of `actual` bytes.
    fn transfer_length(&self, block_count: u32, actual: usize) -> Result<usize> {
        if !self.card.initialized {
            return Err(Error::NotInitialized);
        }
        let expected = (self.card.block_length as usize)
            .checked_mul(block_count as usize)
            .unwrap_or(usize::MAX);
        if block_count == 0 || actual < expected {
            return Err(Error::BufferSize { expected, actual });
        }
        Ok(expected)
    }

    /// Read `block_count` blocks starting at block `start` into `buffer`.
    ///
    /// Addresses are in blocks, the card being in block addressing mode.
    pub fn read(&mut self, buffer: &mut [u8], start: u32, block_count: u32) -> Result<()> {
        let length = self.transfer_length(block_count, buffer.len())?;
        let command = if block_count > 1 {
            SDMMC_CMD18_READ_MULTIPLE_BLOCK
        } else {
            SDMMC_CMD17_READ_SINGLE_BLOCK
        };
        trace!("slot {}: read {} block(s) at {}", self.slot, block_count, start);
        let data = DataTransfer {
            block_size: self.card.block_length,
            block_count,
            auto_stop: block_count > 1,
            buffer: DataBuffer::Read(&mut buffer[..length]),
        };
        let response = self.send_data(&command.with_argument(start), data)?;
        self.track_status(&response);
        Ok(())
    }

    /// Write `block_count` blocks from `buffer` starting at block `start`.
    pub fn write(&mut self, buffer: &[u8], start: u32, block_count: u32) -> Result<()> {
        let length = self.transfer_length(block_count, buffer.len())?;
        let command = if block_count > 1 {
            SDMMC_CMD25_WRITE_MULTIPLE_BLOCK
        } else {
            SDMMC_CMD24_WRITE_BLOCK
        };
        trace!("slot {}: write {} block(s) at {}", self.slot, block_count, start);
        let data = DataTransfer {
            block_size: self.card.block_length,
            block_count,
            auto_stop: block_count > 1,
            buffer: DataBuffer::Write(&buffer[..length]),
        };
        let response = self.send_data(&command.with_argument(start), data)?;
        self.track_status(&response);
        Ok(())
    }

    /// Read as many whole blocks as `buffer` holds.
    pub fn read_blocks(&mut self, buffer: &mut [u8], start: u32) -> Result<()> {
        let block_count = self.blocks_in(buffer.len())?;
        self.read(buffer, start, block_count)
    }

    /// Write as many whole blocks as `buffer` holds.
    pub fn write_blocks(&mut self, buffer: &[u8], start: u32) -> Result<()> {
        let block_count = self.blocks_in(buffer.len())?;
        self.write(buffer, start, block_count)
    }

    fn blocks_in(&self, length: usize) -> Result<u32> {
        let block_length = self.block_length()? as usize;
        match block_length {
            0 => Err(Error::NotInitialized),
            _ => Ok((length / block_length) as u32),
        }
    }
}
