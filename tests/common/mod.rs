#![allow(dead_code)]

use std::collections::HashMap;

use embedded_error::mci::{CommandOrDataError, MciError};
use embedded_hal::blocking::delay::DelayUs;
use hex_literal::hex;

use mci_sdhc::command_arguments::BusWidth;
use mci_sdhc::commands::Command;
use mci_sdhc::{Config, Controller, DataBuffer, DataTransfer, Host, PresentStatus, ResetMask};

pub const RCA: u16 = 0xB368;
pub const BASE_CLOCK: u32 = 198_000_000;

/// 128-bit register as sent on the wire (MSB first) to response words.
pub fn words(bytes: [u8; 16]) -> [u32; 4] {
    let word = |i: usize| u32::from_be_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
    [word(12), word(8), word(4), word(0)]
}

pub fn sandisk_cid() -> [u32; 4] {
    words(hex!("03 53 44 53 55 30 38 47 80 12 34 56 78 00 D6 00"))
}

/// High capacity card, 7710720 blocks
pub fn sdhc_csd() -> [u32; 4] {
    words(hex!("40 0E 00 32 5B 59 00 00 1D 69 7F 80 0A 40 00 8B"))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Submitted {
    pub index: u8,
    pub app: bool,
    pub argument: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DataPhase {
    pub read: bool,
    pub block_size: u16,
    pub block_count: u32,
    pub auto_stop: bool,
}

/// Host controller with a single well behaved card behind it.
pub struct CardHost {
    pub csd: [u32; 4],
    pub cid: [u32; 4],
    /// ACMD41 answers with busy this many times before power up completes
    pub busy_trials: u32,
    /// Fail the transfer of (index, application command)
    pub fail_on: Option<(u8, bool)>,
    /// Answer this command index with an address error status
    pub status_error_on: Option<u8>,
    pub reset_ok: bool,
    pub power_ok: bool,
    pub inserted: bool,
    pub wedged: bool,
    pub powered: bool,
    pub initialized: bool,
    pub clock: u32,
    pub bus_width: BusWidth,
    pub polls: u32,
    pub submitted: Vec<Submitted>,
    pub data: Vec<DataPhase>,
    pub blocks: HashMap<u32, Vec<u8>>,
}

impl Default for CardHost {
    fn default() -> Self {
        Self {
            csd: sdhc_csd(),
            cid: sandisk_cid(),
            busy_trials: 2,
            fail_on: None,
            status_error_on: None,
            reset_ok: true,
            power_ok: true,
            inserted: true,
            wedged: false,
            powered: false,
            initialized: false,
            clock: 0,
            bus_width: BusWidth::_1BIT,
            polls: 0,
            submitted: Vec::new(),
            data: Vec::new(),
            blocks: HashMap::new(),
        }
    }
}

impl CardHost {
    pub fn count(&self, index: u8, app: bool) -> usize {
        self.submitted.iter().filter(|s| s.index == index && s.app == app).count()
    }

    pub fn indices(&self) -> Vec<u8> {
        self.submitted.iter().map(|s| s.index).collect()
    }

    fn block(&self, address: u32) -> Vec<u8> {
        self.blocks.get(&address).cloned().unwrap_or_else(|| vec![0; 512])
    }
}

impl Host for CardHost {
    fn init(&mut self) -> Result<(), MciError> {
        self.initialized = true;
        Ok(())
    }

    fn deinit(&mut self) -> Result<(), MciError> {
        self.initialized = false;
        Ok(())
    }

    fn reset(&mut self, mask: ResetMask, _: u32) -> bool {
        assert!(mask.contains(ResetMask::ALL | ResetMask::COMMAND | ResetMask::DATA));
        self.reset_ok
    }

    fn set_card_power(&mut self, active: bool, _: u32) -> bool {
        self.powered = active && self.power_ok;
        self.power_ok
    }

    fn set_clock(&mut self, base_clock: u32, target_clock: u32) -> u32 {
        self.clock = target_clock.min(base_clock);
        self.clock
    }

    fn set_data_bus_width(&mut self, bus_width: BusWidth) {
        self.bus_width = bus_width;
    }

    fn submit_transfer(
        &mut self,
        command: &Command,
        data: Option<DataTransfer<'_>>,
    ) -> Result<[u32; 4], MciError> {
        let app = command.is_app();
        self.submitted.push(Submitted { index: command.index, app, argument: command.argument });
        if self.fail_on == Some((command.index, app)) {
            return Err(MciError::CommandError(CommandOrDataError::Timeout));
        }
        if self.status_error_on == Some(command.index) {
            return Ok([0x4000_0900, 0, 0, 0]);
        }
        let response = match (command.index, app) {
            (0, false) => 0,
            (8, false) => command.argument & 0xFFF,
            (55, false) => 0x0000_0120,
            (41, true) => {
                if self.busy_trials > 0 {
                    self.busy_trials -= 1;
                    0x00FF_8000
                } else {
                    0xC0FF_8000
                }
            }
            (2, false) | (10, false) => return Ok(self.cid),
            (9, false) => return Ok(self.csd),
            (3, false) => (RCA as u32) << 16 | 0x0500,
            (7, false) => 0x0000_0700,
            (6, true) => 0x0000_0920,
            (13, false) | (16, false) => 0x0000_0900,
            (17, false) | (18, false) | (24, false) | (25, false) => {
                let data = data.expect("block command without data phase");
                self.data.push(DataPhase {
                    read: data.is_read(),
                    block_size: data.block_size,
                    block_count: data.block_count,
                    auto_stop: data.auto_stop,
                });
                let size = data.block_size as usize;
                match data.buffer {
                    DataBuffer::Read(buffer) => {
                        for (i, chunk) in buffer.chunks_mut(size).enumerate() {
                            chunk.copy_from_slice(&self.block(command.argument + i as u32));
                        }
                    }
                    DataBuffer::Write(buffer) => {
                        for (i, chunk) in buffer.chunks(size).enumerate() {
                            self.blocks.insert(command.argument + i as u32, chunk.to_vec());
                        }
                    }
                }
                0x0000_0900
            }
            _ => return Err(MciError::CommandError(CommandOrDataError::Index)),
        };
        Ok([response, 0, 0, 0])
    }

    fn present_status(&mut self) -> PresentStatus {
        self.polls += 1;
        let mut status = PresentStatus::empty();
        if self.inserted {
            status |= PresentStatus::CARD_INSERTED;
        }
        if self.wedged {
            status |= PresentStatus::COMMAND_INHIBIT | PresentStatus::DATA_INHIBIT;
        }
        status
    }

    fn card_inserted(&mut self) -> bool {
        self.inserted
    }
}

/// Tick source that only counts.
#[derive(Default)]
pub struct Ticks {
    pub calls: u32,
    pub elapsed_us: u64,
}

impl DelayUs<u32> for Ticks {
    fn delay_us(&mut self, us: u32) {
        self.calls += 1;
        self.elapsed_us += us as u64;
    }
}

pub fn controller(host: CardHost) -> Controller<CardHost, Ticks> {
    controller_with(host, Config::default())
}

pub fn controller_with(host: CardHost, config: Config) -> Controller<CardHost, Ticks> {
    Controller::new(host, Ticks::default(), BASE_CLOCK, 0, config)
}

/// Controller with a card already brought to transfer state and history cleared.
pub fn initialized() -> Controller<CardHost, Ticks> {
    let mut controller = controller(CardHost::default());
    controller.probe().unwrap();
    controller.power_on().unwrap();
    controller.card.host.submitted.clear();
    controller.card.host.polls = 0;
    controller
}
