//! Collaborators supplied by the hosting runtime: entropy for draws, a
//! ledger that moves value, and keyed storage for raffle records. The
//! in-memory implementations back the tests and any off-chain host.
use crate::config::PlatformConfig;
use crate::constants::{DRAW_SEED, FIRST_RAFFLE_ID};
use crate::error::RaffleError;
use crate::state::{Raffle, RaffleId, Transfer};
use solana_program::{
    hash::{hashv, Hash},
    msg,
    program_pack::Pack,
    pubkey::Pubkey,
};
use std::collections::{BTreeMap, HashMap};

/// Source of bytes no participant can predict when a close is submitted
pub trait EntropySource {
    fn entropy(&mut self, raffle_id: RaffleId) -> Result<[u8; 32], RaffleError>;
}

/// Draw seed derived from a recent blockhash.
///
/// The raffle id is mixed in so raffles closed against the same block draw
/// from distinct seeds.
#[derive(Debug, Clone, Copy)]
pub struct BlockhashEntropy {
    pub recent_blockhash: Hash,
}

impl BlockhashEntropy {
    pub fn new(recent_blockhash: Hash) -> Self {
        Self { recent_blockhash }
    }
}

impl EntropySource for BlockhashEntropy {
    fn entropy(&mut self, raffle_id: RaffleId) -> Result<[u8; 32], RaffleError> {
        let seed = hashv(&[
            self.recent_blockhash.as_ref(),
            DRAW_SEED,
            &raffle_id.to_le_bytes(),
        ]);
        Ok(seed.to_bytes())
    }
}

/// Replays recorded entropy verbatim
#[derive(Debug, Clone, Copy)]
pub struct FixedEntropy(pub [u8; 32]);

impl FixedEntropy {
    /// Entropy whose first 8 bytes decode (big-endian) to `seed`
    pub fn from_seed(seed: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&seed.to_be_bytes());
        Self(bytes)
    }
}

impl EntropySource for FixedEntropy {
    fn entropy(&mut self, _raffle_id: RaffleId) -> Result<[u8; 32], RaffleError> {
        Ok(self.0)
    }
}

/// Moves value between identities
pub trait Ledger {
    /// Execute every transfer in order, or none of them
    fn settle(&mut self, transfers: &[Transfer]) -> Result<(), RaffleError>;
}

/// Balance table keyed by identity
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: HashMap<Pubkey, u64>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deposit(&mut self, account: &Pubkey, amount: u64) -> Result<(), RaffleError> {
        let balance = self.balances.entry(*account).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(RaffleError::AmountOverflow)?;
        Ok(())
    }

    pub fn balance(&self, account: &Pubkey) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn apply(
        balances: &mut HashMap<Pubkey, u64>,
        transfer: &Transfer,
    ) -> Result<(), RaffleError> {
        let from_balance = balances.get(&transfer.from).copied().unwrap_or(0);
        if from_balance < transfer.amount {
            msg!(
                "Insufficient funds: {} needs {}, has {}",
                transfer.from,
                transfer.amount,
                from_balance
            );
            return Err(RaffleError::InsufficientFunds);
        }
        balances.insert(transfer.from, from_balance - transfer.amount);

        let to_balance = balances.entry(transfer.to).or_insert(0);
        *to_balance = to_balance
            .checked_add(transfer.amount)
            .ok_or(RaffleError::AmountOverflow)?;
        Ok(())
    }
}

impl Ledger for InMemoryLedger {
    fn settle(&mut self, transfers: &[Transfer]) -> Result<(), RaffleError> {
        // Apply to a scratch copy so a failing transfer discards the batch
        let mut balances = self.balances.clone();
        for transfer in transfers {
            Self::apply(&mut balances, transfer)?;
        }
        self.balances = balances;
        Ok(())
    }
}

/// Durable keyed storage for the platform record and raffles
pub trait RaffleStore {
    fn platform_config(&self) -> Result<Option<PlatformConfig>, RaffleError>;

    fn save_platform_config(&mut self, config: &PlatformConfig) -> Result<(), RaffleError>;

    /// Hand out the next unused raffle id
    fn allocate_raffle_id(&mut self) -> Result<RaffleId, RaffleError>;

    fn get(&self, raffle_id: RaffleId) -> Option<&Raffle>;

    fn get_mut(&mut self, raffle_id: RaffleId) -> Option<&mut Raffle>;

    fn insert(&mut self, raffle: Raffle) -> Result<(), RaffleError>;

    /// Stored raffle ids in ascending order
    fn raffle_ids(&self) -> Vec<RaffleId>;
}

/// Store holding the platform record in packed form, like account data
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    config_data: [u8; PlatformConfig::LEN],
    next_raffle_id: RaffleId,
    raffles: BTreeMap<RaffleId, Raffle>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            config_data: [0u8; PlatformConfig::LEN],
            next_raffle_id: FIRST_RAFFLE_ID,
            raffles: BTreeMap::new(),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RaffleStore for InMemoryStore {
    fn platform_config(&self) -> Result<Option<PlatformConfig>, RaffleError> {
        let config = PlatformConfig::unpack_unchecked(&self.config_data)
            .map_err(|_| RaffleError::InvalidAccountData)?;
        Ok(if config.is_initialized {
            Some(config)
        } else {
            None
        })
    }

    fn save_platform_config(&mut self, config: &PlatformConfig) -> Result<(), RaffleError> {
        PlatformConfig::pack(*config, &mut self.config_data)
            .map_err(|_| RaffleError::InvalidAccountData)
    }

    fn allocate_raffle_id(&mut self) -> Result<RaffleId, RaffleError> {
        let raffle_id = self.next_raffle_id;
        self.next_raffle_id = raffle_id
            .checked_add(1)
            .ok_or(RaffleError::AmountOverflow)?;
        Ok(raffle_id)
    }

    fn get(&self, raffle_id: RaffleId) -> Option<&Raffle> {
        self.raffles.get(&raffle_id)
    }

    fn get_mut(&mut self, raffle_id: RaffleId) -> Option<&mut Raffle> {
        self.raffles.get_mut(&raffle_id)
    }

    fn insert(&mut self, raffle: Raffle) -> Result<(), RaffleError> {
        if self.raffles.contains_key(&raffle.raffle_id()) {
            return Err(RaffleError::InvalidAccountData);
        }
        self.raffles.insert(raffle.raffle_id(), raffle);
        Ok(())
    }

    fn raffle_ids(&self) -> Vec<RaffleId> {
        self.raffles.keys().copied().collect()
    }
}
