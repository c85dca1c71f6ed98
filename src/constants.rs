/// Upper bound on tickets a single raffle may sell
pub const MAX_TICKETS_PER_RAFFLE: u64 = 10_000;

/// Minimum ticket price under the conservative policy (0.001 DOT in planck)
pub const MIN_TICKET_PRICE: u64 = 1_000_000_000;

pub const MAX_PERCENT: u8 = 100;

/// Combined fee + stake cap under the conservative policy
pub const CONSERVATIVE_COMBINED_PERCENT: u8 = 70;

/// Seed prefix for raffle escrow addresses
pub const RAFFLE_SEED: &[u8] = b"raffle";

/// Domain separator mixed into blockhash-derived draw seeds
pub const DRAW_SEED: &[u8] = b"raffle-draw";

/// Raffle ids are allocated from 1
pub const FIRST_RAFFLE_ID: u64 = 1;
