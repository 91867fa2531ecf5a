use crate::command_arguments::BusWidth;

pub const SDCARD_CLOCK_400KHZ: u32 = 400_000;
pub const SDCARD_CLOCK_50MHZ: u32 = 50_000_000;

/// Card bring up and transfer parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Bus clock while identifying the card
    pub identification_clock: u32,
    /// Bus clock from standby state on
    pub transfer_clock: u32,
    /// Data bus width to switch to once in transfer state
    pub bus_width: BusWidth,
    /// Operating condition (ACMD41) trials before giving up on the card
    pub max_voltage_trials: u32,
    /// Pause between two operating condition trials
    pub voltage_trial_delay_us: u32,
    /// Controller reset wait, in controller polling units
    pub reset_timeout: u32,
    /// Card power activation wait, in controller polling units
    pub power_timeout: u32,
    /// Bus free wait for commands without data
    pub command_timeout_ms: u32,
    /// Bus free wait for ACMD41
    pub op_cond_timeout_ms: u32,
    /// Bus free wait for block reads and writes
    pub data_timeout_ms: u32,
    /// Present state polling granularity
    pub poll_interval_us: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            identification_clock: SDCARD_CLOCK_400KHZ,
            transfer_clock: SDCARD_CLOCK_50MHZ,
            bus_width: BusWidth::_4BIT,
            max_voltage_trials: 0xFF,
            voltage_trial_delay_us: 1000,
            reset_timeout: 2048,
            power_timeout: 8192,
            command_timeout_ms: 100,
            op_cond_timeout_ms: 250,
            data_timeout_ms: 500,
            poll_interval_us: 10,
        }
    }
}
