#![no_std]
pub mod bus;
pub mod card;
pub mod command_arguments;
pub mod command_responses;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod registers;
pub mod slots;

pub use bus::{DataBuffer, DataTransfer, Host, PresentStatus, ResetMask, SD_MMC_BLOCK_SIZE};
pub use card::{CardState, Stage};
pub use config::Config;
pub use controller::Controller;
pub use error::{Error, Result};
pub use slots::Slots;
