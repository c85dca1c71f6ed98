use crate::state::RaffleId;
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
};
use std::mem::size_of;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RaffleInstruction {
    /// Write the platform record; the caller becomes the authority
    ///
    /// Accounts expected:
    /// 0. `[signer]` The platform authority
    InitializePlatform {
        /// Account receiving the fee share of every ticket
        fee_account: Pubkey,
    },

    /// Create a raffle owned by the caller
    ///
    /// Accounts expected:
    /// 0. `[signer]` The organizer
    CreateRaffle {
        max_tickets: u64,
        /// Price per ticket in the smallest currency unit
        ticket_price: u64,
        fee_percent: u8,
        stake_percent: u8,
    },

    /// Buy one ticket; the caller pays the ticket price
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The buyer
    BuyTicket { raffle_id: RaffleId },

    /// Close the raffle and draw the winner (organizer only)
    ///
    /// Accounts expected:
    /// 0. `[signer]` The organizer
    CloseRaffle { raffle_id: RaffleId },

    /// Release the escrowed stake to the winner
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The winner
    ClaimPrize { raffle_id: RaffleId },

    /// Read-only raffle query
    ///
    /// Accounts expected:
    /// 0. `[signer]` Any caller
    GetRaffleInfo { raffle_id: RaffleId },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        let (tag, rest) = input
            .split_first()
            .ok_or(ProgramError::InvalidInstructionData)?;

        Ok(match tag {
            0 => {
                let (fee_account, _) = Self::unpack_pubkey(rest)?;
                Self::InitializePlatform { fee_account }
            }
            1 => {
                let (max_tickets, rest) = Self::unpack_u64(rest)?;
                let (ticket_price, rest) = Self::unpack_u64(rest)?;
                let (fee_percent, rest) = Self::unpack_u8(rest)?;
                let (stake_percent, _) = Self::unpack_u8(rest)?;
                Self::CreateRaffle {
                    max_tickets,
                    ticket_price,
                    fee_percent,
                    stake_percent,
                }
            }
            2 => Self::BuyTicket {
                raffle_id: Self::unpack_u64(rest)?.0,
            },
            3 => Self::CloseRaffle {
                raffle_id: Self::unpack_u64(rest)?.0,
            },
            4 => Self::ClaimPrize {
                raffle_id: Self::unpack_u64(rest)?.0,
            },
            5 => Self::GetRaffleInfo {
                raffle_id: Self::unpack_u64(rest)?.0,
            },
            _ => return Err(ProgramError::InvalidInstructionData),
        })
    }

    /// Packs a RaffleInstruction into a byte buffer
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(size_of::<Self>());
        match *self {
            Self::InitializePlatform { ref fee_account } => {
                buf.push(0);
                buf.extend_from_slice(fee_account.as_ref());
            }
            Self::CreateRaffle {
                max_tickets,
                ticket_price,
                fee_percent,
                stake_percent,
            } => {
                buf.push(1);
                buf.extend_from_slice(&max_tickets.to_le_bytes());
                buf.extend_from_slice(&ticket_price.to_le_bytes());
                buf.push(fee_percent);
                buf.push(stake_percent);
            }
            Self::BuyTicket { raffle_id } => {
                buf.push(2);
                buf.extend_from_slice(&raffle_id.to_le_bytes());
            }
            Self::CloseRaffle { raffle_id } => {
                buf.push(3);
                buf.extend_from_slice(&raffle_id.to_le_bytes());
            }
            Self::ClaimPrize { raffle_id } => {
                buf.push(4);
                buf.extend_from_slice(&raffle_id.to_le_bytes());
            }
            Self::GetRaffleInfo { raffle_id } => {
                buf.push(5);
                buf.extend_from_slice(&raffle_id.to_le_bytes());
            }
        }
        buf
    }

    fn unpack_u64(input: &[u8]) -> Result<(u64, &[u8]), ProgramError> {
        let value = input
            .get(..8)
            .and_then(|slice| slice.try_into().ok())
            .map(u64::from_le_bytes)
            .ok_or(ProgramError::InvalidInstructionData)?;
        Ok((value, &input[8..]))
    }

    fn unpack_u8(input: &[u8]) -> Result<(u8, &[u8]), ProgramError> {
        let (&value, rest) = input
            .split_first()
            .ok_or(ProgramError::InvalidInstructionData)?;
        Ok((value, rest))
    }

    fn unpack_pubkey(input: &[u8]) -> Result<(Pubkey, &[u8]), ProgramError> {
        let bytes: [u8; 32] = input
            .get(..32)
            .and_then(|slice| slice.try_into().ok())
            .ok_or(ProgramError::InvalidInstructionData)?;
        Ok((Pubkey::new_from_array(bytes), &input[32..]))
    }
}

fn signed_by(program_id: &Pubkey, signer: &Pubkey, instruction: RaffleInstruction) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new(*signer, true)],
        data: instruction.pack(),
    }
}

/// Create initialize_platform instruction
pub fn initialize_platform(
    program_id: &Pubkey,
    authority: &Pubkey,
    fee_account: &Pubkey,
) -> Instruction {
    signed_by(
        program_id,
        authority,
        RaffleInstruction::InitializePlatform {
            fee_account: *fee_account,
        },
    )
}

/// Create create_raffle instruction
pub fn create_raffle(
    program_id: &Pubkey,
    organizer: &Pubkey,
    max_tickets: u64,
    ticket_price: u64,
    fee_percent: u8,
    stake_percent: u8,
) -> Instruction {
    signed_by(
        program_id,
        organizer,
        RaffleInstruction::CreateRaffle {
            max_tickets,
            ticket_price,
            fee_percent,
            stake_percent,
        },
    )
}

/// Create buy_ticket instruction
pub fn buy_ticket(program_id: &Pubkey, buyer: &Pubkey, raffle_id: RaffleId) -> Instruction {
    signed_by(program_id, buyer, RaffleInstruction::BuyTicket { raffle_id })
}

/// Create close_raffle instruction
pub fn close_raffle(program_id: &Pubkey, organizer: &Pubkey, raffle_id: RaffleId) -> Instruction {
    signed_by(program_id, organizer, RaffleInstruction::CloseRaffle { raffle_id })
}

/// Create claim_prize instruction
pub fn claim_prize(program_id: &Pubkey, winner: &Pubkey, raffle_id: RaffleId) -> Instruction {
    signed_by(program_id, winner, RaffleInstruction::ClaimPrize { raffle_id })
}

/// Create get_raffle_info instruction
pub fn get_raffle_info(program_id: &Pubkey, caller: &Pubkey, raffle_id: RaffleId) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new_readonly(*caller, true)],
        data: RaffleInstruction::GetRaffleInfo { raffle_id }.pack(),
    }
}
