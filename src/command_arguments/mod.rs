pub mod sd;

/// Number of DATA lines used on the bus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BusWidth {
    _1BIT = 1,
    _4BIT = 4,
    _8BIT = 8,
}

impl Default for BusWidth {
    fn default() -> Self {
        BusWidth::_1BIT
    }
}
