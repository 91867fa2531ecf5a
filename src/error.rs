use core::fmt;

use embedded_error::mci::MciError;

pub type Result<T> = core::result::Result<T, Error>;

/// Errors produced by the card driver.
#[derive(Debug)]
pub enum Error {
    /// Bus controller rejected or failed a transfer; code passed through as reported
    Transport(MciError),
    /// Bus stayed command/data inhibited past the deadline
    Timeout,
    /// Controller reset did not complete in time
    ResetTimeout,
    /// Card power rail did not become active in time
    PowerTimeout,
    /// Card set error bits in its status response
    CardStatus(u32),
    /// Card still busy after every operating condition trial
    VoltageNegotiation { trials: u32 },
    /// CSD structure version without a known layout
    UnsupportedCsd(u8),
    /// Card capacity does not fit a 32-bit block count
    CapacityOverflow,
    /// Block I/O requested before the card session was established
    NotInitialized,
    /// No card in the slot
    NoCard,
    /// Slot index outside the configured bus instances
    InvalidSlot(usize),
    /// Buffer too small for the requested transfer
    BufferSize { expected: usize, actual: usize },
}

impl Error {
    /// Whether the error came from the bus rather than from the card's answers.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout)
    }
}

impl From<MciError> for Error {
    fn from(error: MciError) -> Self {
        Error::Transport(error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "bus controller error: {:?}", e),
            Error::Timeout => f.write_str("bus inhibited until timeout"),
            Error::ResetTimeout => f.write_str("controller reset timed out"),
            Error::PowerTimeout => f.write_str("card power activation timed out"),
            Error::CardStatus(status) => write!(f, "card reported error status {:#010x}", status),
            Error::VoltageNegotiation { trials } => {
                write!(f, "card still busy after {} operating condition trials", trials)
            }
            Error::UnsupportedCsd(version) => write!(f, "unsupported CSD structure {}", version),
            Error::CapacityOverflow => f.write_str("card capacity exceeds 32-bit block count"),
            Error::NotInitialized => f.write_str("card not initialized"),
            Error::NoCard => f.write_str("no card present"),
            Error::InvalidSlot(slot) => write!(f, "no card slot {}", slot),
            Error::BufferSize { expected, actual } => {
                write!(f, "buffer of {} bytes, {} required", actual, expected)
            }
        }
    }
}
