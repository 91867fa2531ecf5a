mod card;
mod state;

pub use card::Card;
pub use state::{CardState, Stage};
