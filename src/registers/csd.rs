use core::convert::TryFrom;

use bit_field::BitField;

use crate::bus::SD_MMC_BLOCK_SIZE;
use crate::error::{Error, Result};

// SD/MMC transfer rate unit codes (10K) list
pub const SD_MMC_TRANS_UNITS: [u32; 8] = [10, 100, 1_000, 10_000, 0, 0, 0, 0];
// SD transfer multiplier factor codes (1/10) list
pub const SD_TRANS_MULTIPLIERS: [u32; 16] =
    [0, 10, 12, 13, 15, 20, 25, 30, 35, 40, 45, 50, 55, 60, 70, 80];

/// Blocks of 512 bytes per C_SIZE unit on block addressed cards (512KiB)
const BLOCKS_PER_CAPACITY_UNIT: u64 = 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SdCsdStructureVersion {
    /// Standard capacity, byte addressed
    Ver1d0 = 0,
    /// High capacity, block addressed
    Ver2d0 = 1,
    /// Extended capacity, block addressed
    Ver3d0 = 2,
}

/// Card specific data register, register layout (see `Response`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CsdRegister(pub [u32; 4]);

impl CsdRegister {
    /// CSD_STRUCTURE [127:126]
    pub fn csd_structure(&self) -> u8 {
        self.0[3].get_bits(30..32) as u8
    }

    pub fn sd_csd_structure_version(&self) -> Result<SdCsdStructureVersion> {
        match self.csd_structure() {
            0 => Ok(SdCsdStructureVersion::Ver1d0),
            1 => Ok(SdCsdStructureVersion::Ver2d0),
            2 => Ok(SdCsdStructureVersion::Ver3d0),
            other => Err(Error::UnsupportedCsd(other)),
        }
    }

    /// TRAN_SPEED [103:96]
    pub fn transmission_speed(&self) -> u8 {
        self.0[3].get_bits(0..8) as u8
    }

    /// READ_BL_LEN [83:80]
    pub fn read_bl_length(&self) -> u8 {
        self.0[2].get_bits(16..20) as u8
    }

    /// C_SIZE [73:62] of a version 1.0 CSD
    pub fn card_size(&self) -> u16 {
        ((self.0[2].get_bits(0..10) << 2) | self.0[1].get_bits(30..32)) as u16
    }

    /// C_SIZE_MULT [49:47] of a version 1.0 CSD
    pub fn card_size_multiplier(&self) -> u8 {
        self.0[1].get_bits(15..18) as u8
    }

    /// C_SIZE [69:48] of a version 2.0 CSD
    pub fn sd_2_0_card_size(&self) -> u32 {
        (self.0[2].get_bits(0..6) << 16) | self.0[1].get_bits(16..32)
    }

    /// C_SIZE of a version 3.0 CSD, the 8 bits above bit 63 plus [63:48]
    pub fn sd_3_0_card_size(&self) -> u32 {
        (self.0[2].get_bits(0..8) << 16) | self.0[1].get_bits(16..32)
    }

    /// Maximum data transfer rate in Hz
    pub fn max_transfer_rate(&self) -> u32 {
        let trans_speed = self.transmission_speed() as usize;
        let unit = SD_MMC_TRANS_UNITS[trans_speed & 0x7];
        let mult = SD_TRANS_MULTIPLIERS[(trans_speed >> 3) & 0xF];
        unit * mult * 1000
    }
}

/// Card geometry normalized to 512 byte blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Capacity {
    pub block_length: u16,
    pub block_count: u32,
}

impl Capacity {
    pub fn bytes(&self) -> u64 {
        self.block_count as u64 * self.block_length as u64
    }
}

pub fn decode_csd_structure_version(words: &[u32; 4]) -> u8 {
    CsdRegister(*words).csd_structure()
}

/// Decode block length and count from a CSD.
///
/// Byte addressed cards may report 1024 or 2048 byte blocks; the count is
/// rescaled so the total capacity is kept with a 512 byte block length.
pub fn decode_capacity(words: &[u32; 4]) -> Result<Capacity> {
    let csd = CsdRegister(*words);
    let block_length = SD_MMC_BLOCK_SIZE as u64;
    let block_count = match csd.sd_csd_structure_version()? {
        SdCsdStructureVersion::Ver1d0 => {
            let raw_length = 1u64 << csd.read_bl_length();
            let raw_count =
                (csd.card_size() as u64 + 1) << (csd.card_size_multiplier() as u64 + 2);
            if raw_length != block_length {
                raw_count * raw_length / block_length
            } else {
                raw_count
            }
        }
        SdCsdStructureVersion::Ver2d0 => {
            (csd.sd_2_0_card_size() as u64 + 1) * BLOCKS_PER_CAPACITY_UNIT
        }
        SdCsdStructureVersion::Ver3d0 => {
            (csd.sd_3_0_card_size() as u64 + 1) * BLOCKS_PER_CAPACITY_UNIT
        }
    };
    let block_count = u32::try_from(block_count).map_err(|_| Error::CapacityOverflow)?;
    Ok(Capacity { block_length: SD_MMC_BLOCK_SIZE as u16, block_count })
}
