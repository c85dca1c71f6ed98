use crate::error::RaffleError;
use crate::payout::{self, PayoutSplit};
use crate::winner;
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

pub type RaffleId = u64;

/// Status of a raffle
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleStatus {
    /// Raffle is selling tickets
    Open,
    /// Winner has been drawn, stake still in escrow
    Closed,
    /// Winner has claimed the stake
    Settled,
}

/// A value movement the host ledger must execute
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u64,
}

/// Proof of a ticket purchase
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TicketReceipt {
    /// 1-based position of the ticket in the raffle
    pub ticket_number: u64,
    pub raffle_id: RaffleId,
    pub buyer: Pubkey,
    /// How the ticket price was divided
    pub split: PayoutSplit,
}

/// Read-only view of a raffle, returned by queries
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RaffleSnapshot {
    pub raffle_id: RaffleId,
    pub organizer: Pubkey,
    pub escrow: Pubkey,
    pub max_tickets: u64,
    pub ticket_price: u64,
    pub fee_percent: u8,
    pub stake_percent: u8,
    pub tickets_sold: u64,
    pub participants: Vec<Pubkey>,
    pub total_stake: u64,
    pub winner: Option<Pubkey>,
    pub draw_seed: Option<[u8; 32]>,
    pub status: RaffleStatus,
}

/// Result of a validated draw, ready to be committed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Draw {
    pub index: u64,
    pub winner: Pubkey,
    pub seed: [u8; 32],
}

/// One raffle and its lifecycle.
///
/// Each transition is split into a `check_*` half that validates and returns
/// everything the host needs to settle, and a `commit_*` half that cannot
/// fail. Callers settle value between the two so a rejected transfer leaves
/// the raffle untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raffle {
    raffle_id: RaffleId,
    organizer: Pubkey,
    escrow: Pubkey,
    max_tickets: u64,
    ticket_price: u64,
    fee_percent: u8,
    stake_percent: u8,
    participants: Vec<Pubkey>,
    total_stake: u64,
    winner: Option<Pubkey>,
    draw_seed: Option<[u8; 32]>,
    status: RaffleStatus,
}

impl Raffle {
    /// Open raffle with zeroed counters. Parameters are expected to have
    /// passed `RafflePolicy::validate`.
    pub fn new(
        raffle_id: RaffleId,
        organizer: Pubkey,
        escrow: Pubkey,
        max_tickets: u64,
        ticket_price: u64,
        fee_percent: u8,
        stake_percent: u8,
    ) -> Self {
        Self {
            raffle_id,
            organizer,
            escrow,
            max_tickets,
            ticket_price,
            fee_percent,
            stake_percent,
            participants: Vec::new(),
            total_stake: 0,
            winner: None,
            draw_seed: None,
            status: RaffleStatus::Open,
        }
    }

    pub fn raffle_id(&self) -> RaffleId {
        self.raffle_id
    }

    pub fn organizer(&self) -> &Pubkey {
        &self.organizer
    }

    pub fn escrow(&self) -> &Pubkey {
        &self.escrow
    }

    pub fn tickets_sold(&self) -> u64 {
        self.participants.len() as u64
    }

    pub fn participants(&self) -> &[Pubkey] {
        &self.participants
    }

    pub fn total_stake(&self) -> u64 {
        self.total_stake
    }

    pub fn winner(&self) -> Option<&Pubkey> {
        self.winner.as_ref()
    }

    pub fn status(&self) -> RaffleStatus {
        self.status
    }

    /// Validate a purchase by `buyer` and compute the price split.
    pub fn check_purchase(&self, buyer: &Pubkey) -> Result<PayoutSplit, RaffleError> {
        if self.status != RaffleStatus::Open {
            msg!("Raffle {} is not open", self.raffle_id);
            return Err(RaffleError::RaffleClosed);
        }
        if self.tickets_sold() >= self.max_tickets {
            msg!("Raffle {} sold out at {} tickets", self.raffle_id, self.max_tickets);
            return Err(RaffleError::SoldOut);
        }
        if self.participants.contains(buyer) {
            msg!("{} already holds a ticket for raffle {}", buyer, self.raffle_id);
            return Err(RaffleError::DuplicateParticipant);
        }

        let split = payout::split(self.ticket_price, self.fee_percent, self.stake_percent);
        self.total_stake
            .checked_add(split.stake_amount)
            .ok_or(RaffleError::AmountOverflow)?;
        Ok(split)
    }

    /// Transfers a purchase settles: the buyer pays the full price into
    /// escrow, which forwards the fee and organizer shares. Zero amounts are
    /// left out.
    pub fn purchase_transfers(
        &self,
        buyer: &Pubkey,
        fee_account: &Pubkey,
        split: &PayoutSplit,
    ) -> Vec<Transfer> {
        [
            Transfer {
                from: *buyer,
                to: self.escrow,
                amount: self.ticket_price,
            },
            Transfer {
                from: self.escrow,
                to: *fee_account,
                amount: split.fee_amount,
            },
            Transfer {
                from: self.escrow,
                to: self.organizer,
                amount: split.organizer_amount,
            },
        ]
        .into_iter()
        .filter(|transfer| transfer.amount > 0)
        .collect()
    }

    /// Record a purchase previously accepted by `check_purchase`.
    pub fn commit_purchase(&mut self, buyer: Pubkey, split: PayoutSplit) -> TicketReceipt {
        self.participants.push(buyer);
        self.total_stake += split.stake_amount;

        TicketReceipt {
            ticket_number: self.tickets_sold(),
            raffle_id: self.raffle_id,
            buyer,
            split,
        }
    }

    /// Validate that `caller` may close the raffle now.
    pub fn check_close(&self, caller: &Pubkey) -> Result<(), RaffleError> {
        if *caller != self.organizer {
            msg!("Only the organizer can close raffle {}", self.raffle_id);
            return Err(RaffleError::Unauthorized);
        }
        if self.status != RaffleStatus::Open {
            msg!("Raffle {} is already closed", self.raffle_id);
            return Err(RaffleError::AlreadyClosed);
        }
        if self.participants.is_empty() {
            msg!("Raffle {} has no participants", self.raffle_id);
            return Err(RaffleError::NoParticipants);
        }
        Ok(())
    }

    /// Pick the winner for `seed` without changing state.
    pub fn draw(&self, seed: [u8; 32]) -> Result<Draw, RaffleError> {
        let index = winner::select_index(&seed, self.tickets_sold())?;
        let winner = *self
            .participants
            .get(index as usize)
            .ok_or(RaffleError::NoParticipants)?;
        Ok(Draw {
            index,
            winner,
            seed,
        })
    }

    pub fn commit_close(&mut self, draw: Draw) -> Pubkey {
        self.winner = Some(draw.winner);
        self.draw_seed = Some(draw.seed);
        self.status = RaffleStatus::Closed;
        draw.winner
    }

    /// Validate a prize claim and return the amount held in escrow.
    pub fn check_claim(&self, caller: &Pubkey) -> Result<u64, RaffleError> {
        if self.status == RaffleStatus::Open {
            msg!("Raffle {} must be closed before claiming", self.raffle_id);
            return Err(RaffleError::NotClosed);
        }
        if self.winner.as_ref() != Some(caller) {
            msg!("Only the winner can claim raffle {}", self.raffle_id);
            return Err(RaffleError::Unauthorized);
        }
        if self.total_stake == 0 {
            msg!("Raffle {} has no stake left to claim", self.raffle_id);
            return Err(RaffleError::NothingToClaim);
        }
        Ok(self.total_stake)
    }

    pub fn claim_transfer(&self, winner: &Pubkey, amount: u64) -> Transfer {
        Transfer {
            from: self.escrow,
            to: *winner,
            amount,
        }
    }

    /// Drain the escrow. Returns the amount released.
    pub fn commit_claim(&mut self) -> u64 {
        let prize = self.total_stake;
        self.total_stake = 0;
        self.status = RaffleStatus::Settled;
        prize
    }

    pub fn snapshot(&self) -> RaffleSnapshot {
        RaffleSnapshot {
            raffle_id: self.raffle_id,
            organizer: self.organizer,
            escrow: self.escrow,
            max_tickets: self.max_tickets,
            ticket_price: self.ticket_price,
            fee_percent: self.fee_percent,
            stake_percent: self.stake_percent,
            tickets_sold: self.tickets_sold(),
            participants: self.participants.clone(),
            total_stake: self.total_stake,
            winner: self.winner,
            draw_seed: self.draw_seed,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_raffle(max_tickets: u64) -> Raffle {
        Raffle::new(
            1,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            max_tickets,
            100_000_000_000,
            5,
            10,
        )
    }

    fn buy(raffle: &mut Raffle, buyer: Pubkey) -> Result<TicketReceipt, RaffleError> {
        let split = raffle.check_purchase(&buyer)?;
        Ok(raffle.commit_purchase(buyer, split))
    }

    fn seed(value: u64) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&value.to_be_bytes());
        bytes
    }

    #[test]
    fn test_new_raffle_is_open_and_empty() {
        let raffle = open_raffle(10);
        assert_eq!(raffle.status(), RaffleStatus::Open);
        assert_eq!(raffle.tickets_sold(), 0);
        assert_eq!(raffle.total_stake(), 0);
        assert!(raffle.winner().is_none());
    }

    #[test]
    fn test_purchase_numbers_tickets_and_accumulates_stake() {
        let mut raffle = open_raffle(10);
        let first = buy(&mut raffle, Pubkey::new_unique()).unwrap();
        let second = buy(&mut raffle, Pubkey::new_unique()).unwrap();

        assert_eq!(first.ticket_number, 1);
        assert_eq!(second.ticket_number, 2);
        assert_eq!(raffle.total_stake(), 20_000_000_000);
        assert_eq!(raffle.tickets_sold(), 2);
    }

    #[test]
    fn test_purchase_rejections_leave_state_unchanged() {
        let mut raffle = open_raffle(1);
        let buyer = Pubkey::new_unique();
        buy(&mut raffle, buyer).unwrap();
        let before = raffle.clone();

        assert_eq!(buy(&mut raffle, buyer), Err(RaffleError::SoldOut));
        assert_eq!(raffle, before);

        let mut raffle = open_raffle(5);
        buy(&mut raffle, buyer).unwrap();
        assert_eq!(buy(&mut raffle, buyer), Err(RaffleError::DuplicateParticipant));
        assert_eq!(raffle.participants(), &[buyer]);
    }

    #[test]
    fn test_sold_out_checked_before_duplicate() {
        let mut raffle = open_raffle(1);
        let buyer = Pubkey::new_unique();
        buy(&mut raffle, buyer).unwrap();
        assert_eq!(raffle.check_purchase(&buyer), Err(RaffleError::SoldOut));
    }

    #[test]
    fn test_purchase_transfers_route_through_escrow() {
        let raffle = open_raffle(10);
        let buyer = Pubkey::new_unique();
        let fee_account = Pubkey::new_unique();
        let split = raffle.check_purchase(&buyer).unwrap();
        let transfers = raffle.purchase_transfers(&buyer, &fee_account, &split);

        assert_eq!(
            transfers,
            vec![
                Transfer {
                    from: buyer,
                    to: *raffle.escrow(),
                    amount: 100_000_000_000
                },
                Transfer {
                    from: *raffle.escrow(),
                    to: fee_account,
                    amount: 5_000_000_000
                },
                Transfer {
                    from: *raffle.escrow(),
                    to: *raffle.organizer(),
                    amount: 85_000_000_000
                },
            ]
        );
    }

    #[test]
    fn test_zero_fee_transfer_is_omitted() {
        let raffle = Raffle::new(
            1,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            10,
            1_000,
            0,
            10,
        );
        let buyer = Pubkey::new_unique();
        let split = raffle.check_purchase(&buyer).unwrap();
        let transfers = raffle.purchase_transfers(&buyer, &Pubkey::new_unique(), &split);
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[1].to, *raffle.organizer());
    }

    #[test]
    fn test_close_checks_in_order() {
        let mut raffle = open_raffle(10);
        let organizer = *raffle.organizer();

        assert_eq!(
            raffle.check_close(&Pubkey::new_unique()),
            Err(RaffleError::Unauthorized)
        );
        assert_eq!(raffle.check_close(&organizer), Err(RaffleError::NoParticipants));

        let buyer = Pubkey::new_unique();
        buy(&mut raffle, buyer).unwrap();
        raffle.check_close(&organizer).unwrap();
        let draw = raffle.draw(seed(9)).unwrap();
        assert_eq!(raffle.commit_close(draw), buyer);

        assert_eq!(raffle.status(), RaffleStatus::Closed);
        assert_eq!(raffle.check_close(&organizer), Err(RaffleError::AlreadyClosed));
        assert_eq!(
            raffle.check_purchase(&Pubkey::new_unique()),
            Err(RaffleError::RaffleClosed)
        );
    }

    #[test]
    fn test_draw_picks_participant_by_seed() {
        let mut raffle = open_raffle(100);
        let first = Pubkey::new_unique();
        let second = Pubkey::new_unique();
        buy(&mut raffle, first).unwrap();
        buy(&mut raffle, second).unwrap();

        let draw = raffle.draw(seed(17)).unwrap();
        assert_eq!(draw.index, 1);
        assert_eq!(draw.winner, second);
        assert_eq!(raffle.draw(seed(4)).unwrap().winner, first);
    }

    #[test]
    fn test_claim_drains_escrow_once() {
        let mut raffle = open_raffle(10);
        let organizer = *raffle.organizer();
        let buyer = Pubkey::new_unique();
        buy(&mut raffle, buyer).unwrap();

        assert_eq!(raffle.check_claim(&buyer), Err(RaffleError::NotClosed));

        raffle.check_close(&organizer).unwrap();
        let draw = raffle.draw(seed(0)).unwrap();
        raffle.commit_close(draw);

        assert_eq!(raffle.check_claim(&organizer), Err(RaffleError::Unauthorized));
        assert_eq!(raffle.check_claim(&buyer), Ok(10_000_000_000));
        assert_eq!(raffle.commit_claim(), 10_000_000_000);
        assert_eq!(raffle.total_stake(), 0);
        assert_eq!(raffle.status(), RaffleStatus::Settled);
        assert_eq!(raffle.check_claim(&buyer), Err(RaffleError::NothingToClaim));
    }

    #[test]
    fn test_snapshot_roundtrips_through_borsh() {
        let mut raffle = open_raffle(10);
        buy(&mut raffle, Pubkey::new_unique()).unwrap();
        let snapshot = raffle.snapshot();

        let bytes = snapshot.try_to_vec().unwrap();
        let decoded = RaffleSnapshot::try_from_slice(&bytes).unwrap();
        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.tickets_sold, 1);
    }
}
