use crate::config::{PlatformConfig, RafflePolicy};
use crate::error::RaffleError;
use crate::host::{EntropySource, Ledger, RaffleStore};
use crate::state::{Raffle, RaffleId, RaffleSnapshot, TicketReceipt};
use crate::utils::find_raffle_escrow_address;
use solana_program::{msg, pubkey::Pubkey};

/// Owns the platform record and every raffle, and routes lifecycle calls.
///
/// Mutating calls follow validate, settle, commit: all preconditions are
/// checked first, the transfer batch is handed to the ledger, and state is
/// written only after the ledger accepted it.
pub struct RaffleRegistry<S: RaffleStore> {
    program_id: Pubkey,
    policy: RafflePolicy,
    store: S,
}

impl<S: RaffleStore> RaffleRegistry<S> {
    pub fn new(program_id: Pubkey, policy: RafflePolicy, store: S) -> Self {
        Self {
            program_id,
            policy,
            store,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn policy(&self) -> &RafflePolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write the platform record. Only the first call succeeds.
    pub fn initialize_platform(
        &mut self,
        authority: &Pubkey,
        fee_account: &Pubkey,
    ) -> Result<PlatformConfig, RaffleError> {
        if self.store.platform_config()?.is_some() {
            msg!("Platform is already initialized");
            return Err(RaffleError::AlreadyInitialized);
        }

        let config = PlatformConfig::new(*authority, *fee_account);
        self.store.save_platform_config(&config)?;

        msg!(
            "Platform initialized: Authority={}, FeeAccount={}",
            authority,
            fee_account
        );
        Ok(config)
    }

    pub fn platform_config(&self) -> Result<PlatformConfig, RaffleError> {
        self.store
            .platform_config()?
            .ok_or(RaffleError::NotInitialized)
    }

    pub fn create_raffle(
        &mut self,
        organizer: &Pubkey,
        max_tickets: u64,
        ticket_price: u64,
        fee_percent: u8,
        stake_percent: u8,
    ) -> Result<RaffleId, RaffleError> {
        self.platform_config()?;
        self.policy
            .validate(max_tickets, ticket_price, fee_percent, stake_percent)?;

        let raffle_id = self.store.allocate_raffle_id()?;
        let (escrow, _) = find_raffle_escrow_address(&self.program_id, raffle_id);
        self.store.insert(Raffle::new(
            raffle_id,
            *organizer,
            escrow,
            max_tickets,
            ticket_price,
            fee_percent,
            stake_percent,
        ))?;

        msg!(
            "Raffle {} created by {}: MaxTickets={}, Price={}, Fee={}%, Stake={}%",
            raffle_id,
            organizer,
            max_tickets,
            ticket_price,
            fee_percent,
            stake_percent
        );
        Ok(raffle_id)
    }

    pub fn buy_ticket<L: Ledger + ?Sized>(
        &mut self,
        raffle_id: RaffleId,
        buyer: &Pubkey,
        ledger: &mut L,
    ) -> Result<TicketReceipt, RaffleError> {
        let raffle = self.raffle(raffle_id)?;
        let split = raffle.check_purchase(buyer)?;
        let config = self.platform_config()?;
        let transfers = raffle.purchase_transfers(buyer, &config.fee_account, &split);

        ledger.settle(&transfers)?;
        let receipt = self.raffle_mut(raffle_id)?.commit_purchase(*buyer, split);

        msg!(
            "Ticket {} of raffle {} sold to {}: Fee={}, Stake={}, Organizer={}",
            receipt.ticket_number,
            raffle_id,
            buyer,
            split.fee_amount,
            split.stake_amount,
            split.organizer_amount
        );
        Ok(receipt)
    }

    /// Close the raffle and draw its winner. Entropy is requested only
    /// after every precondition has passed.
    pub fn close_raffle<E: EntropySource + ?Sized>(
        &mut self,
        raffle_id: RaffleId,
        caller: &Pubkey,
        entropy: &mut E,
    ) -> Result<Pubkey, RaffleError> {
        let raffle = self.raffle(raffle_id)?;
        raffle.check_close(caller)?;
        let seed = entropy.entropy(raffle_id)?;
        let draw = raffle.draw(seed)?;

        let winner = self.raffle_mut(raffle_id)?.commit_close(draw);

        msg!(
            "Raffle {} closed: Winner={} (index {} of {})",
            raffle_id,
            winner,
            draw.index,
            self.raffle(raffle_id)?.tickets_sold()
        );
        Ok(winner)
    }

    pub fn claim_prize<L: Ledger + ?Sized>(
        &mut self,
        raffle_id: RaffleId,
        caller: &Pubkey,
        ledger: &mut L,
    ) -> Result<u64, RaffleError> {
        let raffle = self.raffle(raffle_id)?;
        let prize = raffle.check_claim(caller)?;
        let transfer = raffle.claim_transfer(caller, prize);

        ledger.settle(&[transfer])?;
        let prize = self.raffle_mut(raffle_id)?.commit_claim();

        msg!("Prize of {} from raffle {} claimed by {}", prize, raffle_id, caller);
        Ok(prize)
    }

    pub fn get_raffle_info(&self, raffle_id: RaffleId) -> Result<RaffleSnapshot, RaffleError> {
        Ok(self.raffle(raffle_id)?.snapshot())
    }

    /// Snapshots of every raffle in id order
    pub fn list_raffles(&self) -> Vec<RaffleSnapshot> {
        self.store
            .raffle_ids()
            .into_iter()
            .filter_map(|raffle_id| self.store.get(raffle_id))
            .map(Raffle::snapshot)
            .collect()
    }

    fn raffle(&self, raffle_id: RaffleId) -> Result<&Raffle, RaffleError> {
        self.store.get(raffle_id).ok_or_else(|| {
            msg!("Raffle {} not found", raffle_id);
            RaffleError::NotFound
        })
    }

    fn raffle_mut(&mut self, raffle_id: RaffleId) -> Result<&mut Raffle, RaffleError> {
        self.store.get_mut(raffle_id).ok_or(RaffleError::NotFound)
    }
}
