use crate::constants::{
    CONSERVATIVE_COMBINED_PERCENT, MAX_PERCENT, MAX_TICKETS_PER_RAFFLE, MIN_TICKET_PRICE,
};
use crate::error::RaffleError;
use arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs};
use solana_program::{
    msg,
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::Pubkey,
};

/// Platform configuration record, written once at deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformConfig {
    /// Is the record initialized
    pub is_initialized: bool,
    /// Identity that initialized the platform
    pub authority: Pubkey,
    /// Account receiving the fee share of every ticket
    pub fee_account: Pubkey,
}

impl PlatformConfig {
    pub fn new(authority: Pubkey, fee_account: Pubkey) -> Self {
        Self {
            is_initialized: true,
            authority,
            fee_account,
        }
    }
}

impl Sealed for PlatformConfig {}

impl IsInitialized for PlatformConfig {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Pack for PlatformConfig {
    const LEN: usize = 1 + 32 + 32;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, PlatformConfig::LEN];
        let (is_initialized, authority, fee_account) = array_refs![src, 1, 32, 32];

        let is_initialized = match is_initialized {
            [0] => false,
            [1] => true,
            _ => return Err(ProgramError::InvalidAccountData),
        };

        Ok(PlatformConfig {
            is_initialized,
            authority: Pubkey::new_from_array(*authority),
            fee_account: Pubkey::new_from_array(*fee_account),
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, PlatformConfig::LEN];
        let (is_initialized_dst, authority_dst, fee_account_dst) =
            mut_array_refs![dst, 1, 32, 32];

        is_initialized_dst[0] = self.is_initialized as u8;
        authority_dst.copy_from_slice(self.authority.as_ref());
        fee_account_dst.copy_from_slice(self.fee_account.as_ref());
    }
}

/// Validation rules applied when a raffle is created.
///
/// Deployments disagree on how much of a ticket may be diverted to fees and
/// stake, and on whether a price floor applies, so both are carried here
/// instead of being hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RafflePolicy {
    /// Largest `max_tickets` a raffle may declare
    pub max_tickets: u64,
    /// Smallest accepted ticket price
    pub min_ticket_price: u64,
    pub max_fee_percent: u8,
    pub max_stake_percent: u8,
    /// Cap on `fee_percent + stake_percent`
    pub max_combined_percent: u8,
}

impl RafflePolicy {
    /// Fee + stake capped at 70% with a price floor
    pub const CONSERVATIVE: RafflePolicy = RafflePolicy {
        max_tickets: MAX_TICKETS_PER_RAFFLE,
        min_ticket_price: MIN_TICKET_PRICE,
        max_fee_percent: MAX_PERCENT,
        max_stake_percent: MAX_PERCENT,
        max_combined_percent: CONSERVATIVE_COMBINED_PERCENT,
    };

    /// Fee + stake may take the whole ticket, any non-zero price
    pub const PERMISSIVE: RafflePolicy = RafflePolicy {
        max_tickets: MAX_TICKETS_PER_RAFFLE,
        min_ticket_price: 1,
        max_fee_percent: MAX_PERCENT,
        max_stake_percent: MAX_PERCENT,
        max_combined_percent: MAX_PERCENT,
    };

    pub fn validate(
        &self,
        max_tickets: u64,
        ticket_price: u64,
        fee_percent: u8,
        stake_percent: u8,
    ) -> Result<(), RaffleError> {
        if max_tickets == 0 || max_tickets > self.max_tickets {
            msg!("Max tickets must be between 1 and {}", self.max_tickets);
            return Err(RaffleError::InvalidParameters);
        }
        if ticket_price == 0 || ticket_price < self.min_ticket_price {
            msg!("Ticket price must be at least {}", self.min_ticket_price.max(1));
            return Err(RaffleError::InvalidParameters);
        }
        if fee_percent > self.max_fee_percent.min(MAX_PERCENT) {
            msg!("Fee percent cannot exceed {}", self.max_fee_percent);
            return Err(RaffleError::InvalidParameters);
        }
        if stake_percent > self.max_stake_percent.min(MAX_PERCENT) {
            msg!("Stake percent cannot exceed {}", self.max_stake_percent);
            return Err(RaffleError::InvalidParameters);
        }
        let combined = fee_percent as u16 + stake_percent as u16;
        if combined > self.max_combined_percent.min(MAX_PERCENT) as u16 {
            msg!(
                "Fee + stake ({}%) cannot exceed {}%",
                combined,
                self.max_combined_percent
            );
            return Err(RaffleError::InvalidParameters);
        }
        // Gross sales of a sold-out raffle must stay representable
        if ticket_price.checked_mul(max_tickets).is_none() {
            msg!("Ticket price too large for {} tickets", max_tickets);
            return Err(RaffleError::InvalidParameters);
        }
        Ok(())
    }
}

impl Default for RafflePolicy {
    fn default() -> Self {
        Self::CONSERVATIVE
    }
}
