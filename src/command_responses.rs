use crate::registers::card_status::CardStatusRegister;
use crate::registers::cid::CidRegister;
use crate::registers::csd::CsdRegister;
use crate::registers::ocr::OcrRegister;

/// Shape of the response a command expects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResponseType {
    /// No response (CMD0)
    None,
    /// 32-bit card status (R1), also used for R6 and R7
    Status,
    /// 32-bit operating conditions (R3)
    Ocr,
    /// 128-bit CID or CSD (R2)
    Wide128,
    /// 32-bit card status, card may hold DAT0 busy afterwards (R1b)
    StatusWithBusy,
}

impl ResponseType {
    /// The card may hold DAT0 low after answering
    pub fn card_may_send_busy(self) -> bool {
        match self {
            ResponseType::StatusWithBusy => true,
            ResponseType::None
            | ResponseType::Status
            | ResponseType::Ocr
            | ResponseType::Wide128 => false,
        }
    }

    /// Whether the first word carries R1 card status bits.
    pub fn carries_card_status(self) -> bool {
        match self {
            ResponseType::Status | ResponseType::StatusWithBusy => true,
            ResponseType::None | ResponseType::Ocr | ResponseType::Wide128 => false,
        }
    }
}

/// Raw response words, word 0 holding the least significant bits.
///
/// 128-bit responses are laid out as the register itself (bits 127:8, CRC
/// byte zeroed), so register bit `n` is bit `n % 32` of word `n / 32`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub words: [u32; 4],
}

impl Response {
    pub fn new(words: [u32; 4]) -> Self {
        Self { words }
    }

    pub fn status(&self) -> CardStatusRegister {
        CardStatusRegister { val: self.words[0] }
    }

    pub fn ocr(&self) -> OcrRegister {
        OcrRegister { val: self.words[0] }
    }

    pub fn cid(&self) -> CidRegister {
        CidRegister(self.words)
    }

    pub fn csd(&self) -> CsdRegister {
        CsdRegister(self.words)
    }

    /// R6: card published relative address in the upper half of word 0
    pub fn relative_address(&self) -> u16 {
        decode_relative_address(&self.words)
    }
}

pub fn decode_relative_address(words: &[u32; 4]) -> u16 {
    (words[0] >> 16) as u16
}
