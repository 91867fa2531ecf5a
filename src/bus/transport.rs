use embedded_hal::blocking::delay::DelayUs;
use log::{debug, trace};

use crate::command_responses::Response;
use crate::commands::Command;
use crate::error::{Error, Result};

use super::{DataTransfer, Host, PresentStatus};

/// Issue one command once the bus is free.
///
/// Polls the present state every `poll_interval_us` until neither command nor
/// data lines are inhibited, giving up after `timeout_ms` without submitting.
/// A status response intersecting the command's error mask fails with
/// `Error::CardStatus`. Commands answered with busy wait for the card to
/// release the data line before returning.
pub fn transfer<HOST: Host, DELAY: DelayUs<u32>>(
    host: &mut HOST,
    delay: &mut DELAY,
    command: &Command,
    data: Option<DataTransfer<'_>>,
    timeout_ms: u32,
    poll_interval_us: u32,
) -> Result<Response> {
    let poll_interval_us = poll_interval_us.max(1);
    let polls = (timeout_ms.saturating_mul(1000) / poll_interval_us).max(1);
    if !wait_bus_free(host, delay, polls, poll_interval_us) {
        debug!("CMD{} not sent, bus inhibited for {}ms", command.index, timeout_ms);
        return Err(Error::Timeout);
    }

    trace!("CMD{} arg {:#010x}", command.index, command.argument);
    let words = host.submit_transfer(command, data).map_err(|e| {
        debug!("CMD{} failed: {:?}", command.index, e);
        Error::Transport(e)
    })?;
    if command.response.carries_card_status() && words[0] & command.error_mask != 0 {
        debug!("CMD{} card status error {:#010x}", command.index, words[0]);
        return Err(Error::CardStatus(words[0]));
    }
    // Card signals busy on DAT0, seen by the controller as data inhibit
    let busy = command.response.card_may_send_busy();
    if busy && !wait_bus_free(host, delay, polls, poll_interval_us) {
        debug!("CMD{} card still busy after {}ms", command.index, timeout_ms);
        return Err(Error::Timeout);
    }
    Ok(Response::new(words))
}

fn wait_bus_free<HOST: Host, DELAY: DelayUs<u32>>(
    host: &mut HOST,
    delay: &mut DELAY,
    polls: u32,
    poll_interval_us: u32,
) -> bool {
    let inhibit = PresentStatus::COMMAND_INHIBIT | PresentStatus::DATA_INHIBIT;
    for _ in 0..polls {
        if !host.present_status().intersects(inhibit) {
            return true;
        }
        delay.delay_us(poll_interval_us);
    }
    false
}
