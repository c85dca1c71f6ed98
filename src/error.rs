use solana_program::{decode_error::DecodeError, program_error::ProgramError};
use thiserror::Error;

/// Errors that may be returned by the raffle registry
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RaffleError {
    /// No raffle is stored under the requested id
    #[error("Raffle not found")]
    NotFound,

    /// Ticket count, price or percentages are outside the configured policy
    #[error("Invalid raffle parameters")]
    InvalidParameters,

    /// Raffle no longer accepts tickets
    #[error("Raffle is closed")]
    RaffleClosed,

    /// Every ticket has been sold
    #[error("Raffle is sold out")]
    SoldOut,

    /// Buyer already holds a ticket for this raffle
    #[error("Buyer already holds a ticket for this raffle")]
    DuplicateParticipant,

    /// Caller is not allowed to perform this action
    #[error("Caller is not authorized for this action")]
    Unauthorized,

    /// Raffle has already been closed
    #[error("Raffle has already been closed")]
    AlreadyClosed,

    /// Raffle cannot be closed without tickets
    #[error("No tickets were sold")]
    NoParticipants,

    /// Prize cannot be claimed before the draw
    #[error("Raffle has not been closed yet")]
    NotClosed,

    /// Escrow holds no stake for the winner
    #[error("Nothing to claim")]
    NothingToClaim,

    /// Platform configuration was already written
    #[error("Platform already initialized")]
    AlreadyInitialized,

    /// Platform configuration has not been written yet
    #[error("Platform not initialized")]
    NotInitialized,

    /// Entropy is too short to seed the draw
    #[error("Entropy must be at least 8 bytes")]
    InsufficientEntropy,

    /// Payer balance cannot cover a transfer
    #[error("Insufficient funds for transfer")]
    InsufficientFunds,

    #[error("Amount overflow")]
    AmountOverflow,

    /// Invalid instruction data passed
    #[error("Invalid instruction data")]
    InvalidInstructionData,

    /// Stored record could not be decoded
    #[error("Invalid record data")]
    InvalidAccountData,
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RaffleError {
    fn type_of() -> &'static str {
        "Raffle Error"
    }
}
