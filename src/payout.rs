use borsh::{BorshDeserialize, BorshSerialize};

/// How one ticket's price is divided
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PayoutSplit {
    /// Routed to the platform fee account
    pub fee_amount: u64,
    /// Kept in the raffle escrow for the winner
    pub stake_amount: u64,
    /// Routed to the organizer; absorbs rounding
    pub organizer_amount: u64,
}

/// Percentage of `amount`, rounded down.
pub fn calculate_share(amount: u64, percent: u8) -> u64 {
    // percent <= 100 keeps the quotient within u64
    ((amount as u128 * percent.min(100) as u128) / 100) as u64
}

/// Split a ticket price into fee, stake and organizer shares.
///
/// `fee_amount + stake_amount + organizer_amount == ticket_price` holds for
/// every pair of percentages whose sum does not exceed 100.
pub fn split(ticket_price: u64, fee_percent: u8, stake_percent: u8) -> PayoutSplit {
    let fee_amount = calculate_share(ticket_price, fee_percent);
    let stake_amount = calculate_share(ticket_price, stake_percent);
    let organizer_amount = ticket_price.saturating_sub(fee_amount.saturating_add(stake_amount));

    PayoutSplit {
        fee_amount,
        stake_amount,
        organizer_amount,
    }
}

impl PayoutSplit {
    pub fn total(&self) -> u64 {
        self.fee_amount + self.stake_amount + self.organizer_amount
    }
}
