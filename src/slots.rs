use embedded_hal::blocking::delay::DelayUs;

use crate::bus::Host;
use crate::controller::Controller;
use crate::error::{Error, Result};

/// Statically configured bus instances, one card slot each.
pub struct Slots<HOST, DELAY, const N: usize> {
    controllers: [Controller<HOST, DELAY>; N],
}

impl<HOST: Host, DELAY: DelayUs<u32>, const N: usize> Slots<HOST, DELAY, N> {
    pub fn new(controllers: [Controller<HOST, DELAY>; N]) -> Self {
        Self { controllers }
    }

    /// Initialize the controller of `slot` and detect its card.
    pub fn probe(&mut self, slot: usize) -> Result<&mut Controller<HOST, DELAY>> {
        let controller = self.controllers.get_mut(slot).ok_or(Error::InvalidSlot(slot))?;
        controller.probe()?;
        Ok(controller)
    }

    pub fn get(&mut self, slot: usize) -> Result<&mut Controller<HOST, DELAY>> {
        self.controllers.get_mut(slot).ok_or(Error::InvalidSlot(slot))
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }
}
