use embedded_hal::blocking::delay::DelayUs;
use log::{debug, warn};

use crate::bus::{Host, ResetMask};
use crate::card::Stage;
use crate::command_arguments::sd::{acmd6_bus_width, sd_send_op_cond_argument, Cmd8};
use crate::command_arguments::BusWidth;
use crate::commands::{
    SDMMC_CMD0_GO_IDLE_STATE, SDMMC_CMD10_SEND_CID, SDMMC_CMD16_SET_BLOCKLEN,
    SDMMC_CMD2_ALL_SEND_CID, SDMMC_CMD7_SELECT_CARD_CMD, SDMMC_CMD9_SEND_CSD,
    SD_ACMD41_SD_SEND_OP_COND, SD_ACMD6_SET_BUS_WIDTH, SD_CMD3_SEND_RELATIVE_ADDR,
    SD_CMD8_SEND_IF_COND,
};
use crate::error::{Error, Result};
use crate::registers::cid::Cid;
use crate::registers::csd::{decode_capacity, Capacity};
use crate::registers::ocr::OcrRegister;

use super::controller::Controller;

impl<HOST: Host, DELAY: DelayUs<u32>> Controller<HOST, DELAY> {
    /// Bring the card from power up to transfer state.
    ///
    /// Does nothing if the card is already initialized. On failure the slot
    /// is left uninitialized and the whole sequence may be retried.
    pub fn power_on(&mut self) -> Result<()> {
        if self.card.initialized {
            return Ok(());
        }
        match self.init() {
            Ok(()) => {
                self.card.initialized = true;
                Ok(())
            }
            Err(e) => {
                warn!("slot {}: init aborted after {:?} stage: {}", self.slot, self.card.stage, e);
                self.card.stage = Stage::Failed;
                Err(e)
            }
        }
    }

    /// Initialize the SD card
    /// This function runs the initialization procedure and the identification process, then it
    /// sets the SD card in transfer state.
    fn init(&mut self) -> Result<()> {
        self.card.reset();
        self.set_bus_width(BusWidth::_1BIT);
        self.set_clock(self.config.identification_clock);
        self.reset_host()?;

        // CMD0 - Reset all cards to idle state.
        self.send_command(&SDMMC_CMD0_GO_IDLE_STATE)?;
        self.send_interface_condition()?;

        self.load_ocr_sdcard()?;
        self.card.stage = Stage::Ready;

        // Put the card in Identify Mode
        let cid = Cid::from(self.send_command(&SDMMC_CMD2_ALL_SEND_CID)?.cid());
        debug!("slot {}: CID {}", self.slot, cid);
        self.card.stage = Stage::Identification;

        // Let the card publish its relative address
        self.card.rca = self.send_command(&SD_CMD3_SEND_RELATIVE_ADDR)?.relative_address();
        debug!("slot {}: RCA {:#06x}", self.slot, self.card.rca);
        self.card.stage = Stage::Standby;

        self.set_clock(self.config.transfer_clock);
        let capacity = self.load_csd()?;
        self.card.block_length = capacity.block_length;
        self.card.block_count = capacity.block_count;

        let cid = Cid::from(self.send_command(&SDMMC_CMD10_SEND_CID.addressed(self.card.rca))?.cid());
        debug!("slot {}: CID {}", self.slot, cid);

        // Select the card and put it into Transfer mode
        let response = self.send_command(&SDMMC_CMD7_SELECT_CARD_CMD.addressed(self.card.rca))?;
        self.track_status(&response);
        self.card.stage = Stage::Transfer;

        self.set_block_length()?;
        let bus_width = self.config.bus_width;
        if bus_width != BusWidth::_1BIT && self.set_data_bus_width(bus_width)? {
            // Some cards forget the block length when the bus is reconfigured
            self.set_block_length()?;
        }
        Ok(())
    }

    fn reset_host(&mut self) -> Result<()> {
        let mask = ResetMask::ALL | ResetMask::COMMAND | ResetMask::DATA;
        if !self.card.host.reset(mask, self.config.reset_timeout) {
            return Err(Error::ResetTimeout);
        }
        if !self.card.host.set_card_power(true, self.config.power_timeout) {
            return Err(Error::PowerTimeout);
        }
        Ok(())
    }

    /// CMD8 for SD card - send interface condition command
    /// Send SD Memory Card interface condition, which includes host supply
    /// voltage information and asks the card whether card supports voltage.
    /// Cards that don't answer are version 1.x cards, which are not supported.
    fn send_interface_condition(&mut self) -> Result<()> {
        let mut arg = Cmd8::default();
        arg.set_cmd8_pattern(true).set_high_voltage(true);
        let response = self.send_command(&SD_CMD8_SEND_IF_COND.with_argument(arg.val))?;
        self.card.ocr = response.words[0];
        if !arg.accepted_by(response.words[0]) {
            warn!("slot {}: interface condition echo {:#010x}", self.slot, response.words[0]);
        }
        Ok(())
    }

    /// Ask the card to send its operation conditions until it leaves busy
    ///
    /// Each trial is a full CMD55 + ACMD41 exchange; the card is polled at most
    /// `max_voltage_trials` times.
    pub fn load_ocr_sdcard(&mut self) -> Result<OcrRegister> {
        let command = SD_ACMD41_SD_SEND_OP_COND.with_argument(sd_send_op_cond_argument());
        let trials = self.config.max_voltage_trials;
        for trial in 1..=trials {
            let ocr = self.send_app_command(&command, self.config.op_cond_timeout_ms)?.ocr();
            self.card.ocr = ocr.val;
            if ocr.card_powered_up_status() {
                debug!(
                    "slot {}: OCR {:#010x} after {} trial(s), high capacity {}, 1.8V {}",
                    self.slot,
                    ocr.val,
                    trial,
                    ocr.card_capacity_status(),
                    ocr.switching_to_1v8_accepted()
                );
                return Ok(ocr);
            }
            self.delay.delay_us(self.config.voltage_trial_delay_us);
        }
        Err(Error::VoltageNegotiation { trials })
    }

    /// CMD9: Card sends its card specific data (CSD)
    fn load_csd(&mut self) -> Result<Capacity> {
        let csd = self.send_command(&SDMMC_CMD9_SEND_CSD.addressed(self.card.rca))?.csd();
        debug!(
            "slot {}: CSD structure {}, max rate {}Hz",
            self.slot,
            csd.csd_structure(),
            csd.max_transfer_rate()
        );
        let capacity = decode_capacity(&csd.0)?;
        debug!(
            "slot {}: {} blocks of {} bytes",
            self.slot, capacity.block_count, capacity.block_length
        );
        Ok(capacity)
    }

    /// CMD16: set the transfer unit to the decoded block length
    fn set_block_length(&mut self) -> Result<()> {
        let command = SDMMC_CMD16_SET_BLOCKLEN.with_argument(self.card.block_length as u32);
        let response = self.send_command(&command)?;
        self.track_status(&response);
        Ok(())
    }

    /// ACMD6: switch the card and then the controller to a wider data bus
    /// Returns false if `bus_width` can't be used with an SD card.
    fn set_data_bus_width(&mut self, bus_width: BusWidth) -> Result<bool> {
        let arg = match acmd6_bus_width(bus_width) {
            Some(arg) => arg,
            None => {
                warn!("slot {}: {:?} bus not available for SD, keeping 1 bit", self.slot, bus_width);
                return Ok(false);
            }
        };
        let timeout = self.config.command_timeout_ms;
        let response = self.send_app_command(&SD_ACMD6_SET_BUS_WIDTH.with_argument(arg), timeout)?;
        self.track_status(&response);
        self.set_bus_width(bus_width);
        Ok(true)
    }
}
