//! Winner selection from host-provided entropy.
//!
//! The draw is only as fair as the entropy: the host must supply bytes that
//! neither the organizer nor any buyer can know or influence when the close
//! is submitted (a recent blockhash, a VRF output). That guarantee is assumed
//! here, not checked.
use crate::error::RaffleError;
use crate::state::RaffleSnapshot;
use arrayref::array_ref;
use solana_program::pubkey::Pubkey;

/// Map entropy to a participant index in `[0, tickets_sold)`.
///
/// The first 8 bytes are read as a big-endian `u64` seed and reduced modulo
/// `tickets_sold`. Byte order and modulus are fixed so recorded draws replay
/// identically.
pub fn select_index(entropy: &[u8], tickets_sold: u64) -> Result<u64, RaffleError> {
    if tickets_sold == 0 {
        return Err(RaffleError::NoParticipants);
    }
    if entropy.len() < 8 {
        return Err(RaffleError::InsufficientEntropy);
    }

    let seed = u64::from_be_bytes(*array_ref![entropy, 0, 8]);
    Ok(seed % tickets_sold)
}

/// Re-run the draw recorded in a snapshot and return the winner it yields.
///
/// Returns `None` when the raffle has not been drawn yet.
pub fn replay_draw(snapshot: &RaffleSnapshot) -> Result<Option<Pubkey>, RaffleError> {
    let seed = match snapshot.draw_seed {
        Some(seed) => seed,
        None => return Ok(None),
    };
    let index = select_index(&seed, snapshot.participants.len() as u64)?;
    Ok(snapshot.participants.get(index as usize).copied())
}

/// True when the recorded winner matches a replay of the recorded seed.
pub fn verify_draw(snapshot: &RaffleSnapshot) -> Result<bool, RaffleError> {
    Ok(replay_draw(snapshot)? == snapshot.winner && snapshot.winner.is_some())
}
