// Stake raffle registry
// Fixed-price tickets, one per identity. Each ticket is split into a platform
// fee, an organizer share and a stake escrowed for the winner drawn at close.

pub mod constants;
pub mod config;
pub mod error;
pub mod host;
pub mod instruction;
pub mod payout;
pub mod processor;
pub mod registry;
pub mod state;
pub mod utils;
pub mod winner;

pub use crate::config::{PlatformConfig, RafflePolicy};
pub use crate::error::RaffleError;
pub use crate::processor::{ProcessOutput, Processor};
pub use crate::registry::RaffleRegistry;
pub use crate::state::{RaffleId, RaffleSnapshot, RaffleStatus, TicketReceipt, Transfer};
