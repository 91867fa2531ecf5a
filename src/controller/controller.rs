use embedded_hal::blocking::delay::DelayUs;
use log::{debug, trace, warn};

use crate::bus::transport::transfer;
use crate::bus::{DataTransfer, Host};
use crate::card::Card;
use crate::command_arguments::BusWidth;
use crate::command_responses::Response;
use crate::commands::{Command, SDMMC_CMD55_APP_CMD};
use crate::config::Config;
use crate::error::{Error, Result};

/// One SD host controller instance and the card behind it.
pub struct Controller<HOST, DELAY> {
    pub card: Card<HOST>,
    /// This card's slot number
    pub slot: u8,
    /// Tick source for bus polling
    pub delay: DELAY,
    pub config: Config,
}

impl<HOST: Host, DELAY: DelayUs<u32>> Controller<HOST, DELAY> {
    /// Create a new SD host instance
    ///
    /// `base_clock` is the controller's input clock, from which the bus clock
    /// is divided.
    pub fn new(host: HOST, delay: DELAY, base_clock: u32, slot: u8, config: Config) -> Self {
        Controller { card: Card::new(host, base_clock), slot, delay, config }
    }

    /// Initialize the host controller and check a card is there.
    ///
    /// Pins and controller clock are expected to be set up by the caller.
    pub fn probe(&mut self) -> Result<()> {
        self.card.host.init()?;
        if !self.detect() {
            debug!("slot {}: no card", self.slot);
            return Err(Error::NoCard);
        }
        self.set_bus_width(BusWidth::_1BIT);
        self.set_clock(self.config.identification_clock);
        Ok(())
    }

    pub fn detect(&mut self) -> bool {
        self.card.host.card_inserted()
    }

    pub fn deinit(&mut self) -> Result<()> {
        self.power_off();
        self.card.host.deinit()?;
        Ok(())
    }

    /// Forget card identity and geometry. The card itself stays powered.
    pub fn power_off(&mut self) -> bool {
        self.card.reset();
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.card.initialized
    }

    pub fn block_count(&self) -> Result<u32> {
        if !self.card.initialized {
            return Err(Error::NotInitialized);
        }
        Ok(self.card.block_count)
    }

    pub fn block_length(&self) -> Result<u16> {
        if !self.card.initialized {
            return Err(Error::NotInitialized);
        }
        Ok(self.card.block_length)
    }

    pub(crate) fn set_clock(&mut self, target: u32) {
        self.card.clock = self.card.host.set_clock(self.card.base_clock, target);
        debug!("slot {}: bus clock {}Hz (requested {}Hz)", self.slot, self.card.clock, target);
    }

    pub(crate) fn set_bus_width(&mut self, bus_width: BusWidth) {
        self.card.host.set_data_bus_width(bus_width);
        self.card.bus_width = bus_width;
    }

    /// Issue a command without data phase.
    pub(crate) fn send_command(&mut self, command: &Command) -> Result<Response> {
        let timeout = self.config.command_timeout_ms;
        self.send_command_with_timeout(command, timeout)
    }

    pub(crate) fn send_command_with_timeout(
        &mut self,
        command: &Command,
        timeout_ms: u32,
    ) -> Result<Response> {
        let interval = self.config.poll_interval_us;
        transfer(&mut self.card.host, &mut self.delay, command, None, timeout_ms, interval)
    }

    pub(crate) fn send_data(
        &mut self,
        command: &Command,
        data: DataTransfer<'_>,
    ) -> Result<Response> {
        let (timeout, interval) = (self.config.data_timeout_ms, self.config.poll_interval_us);
        transfer(&mut self.card.host, &mut self.delay, command, Some(data), timeout, interval)
    }

    /// CMD55 then the application specific `command`.
    pub(crate) fn send_app_command(&mut self, command: &Command, timeout_ms: u32) -> Result<Response> {
        let response = self.send_command(&SDMMC_CMD55_APP_CMD.addressed(self.card.rca))?;
        self.track_status(&response);
        self.send_command_with_timeout(command, timeout_ms)
    }

    /// Keep an R1 response for diagnostics.
    pub(crate) fn track_status(&mut self, response: &Response) {
        let status = response.status();
        self.card.status = status.val;
        match status.current_state() {
            Some(state) => trace!("slot {}: card state {:?}", self.slot, state),
            None => warn!("slot {}: invalid card state in {:#010x}", self.slot, status.val),
        }
    }
}
