#![doc = include_str!("../README.md")]

mod error;

pub mod phy;
pub mod telegram;

pub use error::{Error, Result};
pub use phy::Receiver;
pub use telegram::Telegram;
