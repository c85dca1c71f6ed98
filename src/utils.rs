use crate::constants::RAFFLE_SEED;
use crate::state::RaffleId;
use solana_program::pubkey::Pubkey;

/// Find the program derived address holding a raffle's escrowed stake
pub fn find_raffle_escrow_address(program_id: &Pubkey, raffle_id: RaffleId) -> (Pubkey, u8) {
    let raffle_id_bytes = raffle_id.to_le_bytes();
    Pubkey::find_program_address(&[RAFFLE_SEED, &raffle_id_bytes], program_id)
}
