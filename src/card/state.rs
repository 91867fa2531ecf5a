/// CURRENT_STATE reported by the card in R1 responses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CardState {
    Idle = 0,
    Ready = 1,
    Identification = 2,
    Standby = 3,
    Transfer = 4,
    SendingData = 5,
    ReceiveData = 6,
    Programming = 7,
    Disconnect = 8,
}

impl CardState {
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(CardState::Idle),
            1 => Some(CardState::Ready),
            2 => Some(CardState::Identification),
            3 => Some(CardState::Standby),
            4 => Some(CardState::Transfer),
            5 => Some(CardState::SendingData),
            6 => Some(CardState::ReceiveData),
            7 => Some(CardState::Programming),
            8 => Some(CardState::Disconnect),
            _ => None,
        }
    }
}

/// How far the host has brought the card through initialization.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Ready,
    Identification,
    Standby,
    Transfer,
    /// Last initialization attempt aborted
    Failed,
}

impl Default for Stage {
    fn default() -> Self {
        Stage::Idle
    }
}
