use crate::config::PlatformConfig;
use crate::host::{EntropySource, Ledger, RaffleStore};
use crate::instruction::RaffleInstruction;
use crate::registry::RaffleRegistry;
use crate::state::{RaffleId, RaffleSnapshot, TicketReceipt};
use solana_program::{
    instruction::Instruction, msg, program_error::ProgramError, pubkey::Pubkey,
};

/// What a dispatched instruction produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessOutput {
    PlatformInitialized(PlatformConfig),
    RaffleCreated(RaffleId),
    TicketIssued(TicketReceipt),
    WinnerDrawn(Pubkey),
    PrizeClaimed(u64),
    RaffleInfo(RaffleSnapshot),
}

pub struct Processor;

impl Processor {
    /// Decode `instruction_data` and run it on behalf of `caller`.
    ///
    /// The host authenticates `caller` and runs the call atomically against
    /// the raffle it addresses.
    pub fn process<S, E, L>(
        registry: &mut RaffleRegistry<S>,
        caller: &Pubkey,
        entropy: &mut E,
        ledger: &mut L,
        instruction_data: &[u8],
    ) -> Result<ProcessOutput, ProgramError>
    where
        S: RaffleStore,
        E: EntropySource + ?Sized,
        L: Ledger + ?Sized,
    {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        let output = match instruction {
            RaffleInstruction::InitializePlatform { fee_account } => {
                msg!("Instruction: Initialize Platform");
                ProcessOutput::PlatformInitialized(
                    registry.initialize_platform(caller, &fee_account)?,
                )
            }
            RaffleInstruction::CreateRaffle {
                max_tickets,
                ticket_price,
                fee_percent,
                stake_percent,
            } => {
                msg!("Instruction: Create Raffle");
                ProcessOutput::RaffleCreated(registry.create_raffle(
                    caller,
                    max_tickets,
                    ticket_price,
                    fee_percent,
                    stake_percent,
                )?)
            }
            RaffleInstruction::BuyTicket { raffle_id } => {
                msg!("Instruction: Buy Ticket");
                ProcessOutput::TicketIssued(registry.buy_ticket(raffle_id, caller, ledger)?)
            }
            RaffleInstruction::CloseRaffle { raffle_id } => {
                msg!("Instruction: Close Raffle");
                ProcessOutput::WinnerDrawn(registry.close_raffle(raffle_id, caller, entropy)?)
            }
            RaffleInstruction::ClaimPrize { raffle_id } => {
                msg!("Instruction: Claim Prize");
                ProcessOutput::PrizeClaimed(registry.claim_prize(raffle_id, caller, ledger)?)
            }
            RaffleInstruction::GetRaffleInfo { raffle_id } => {
                msg!("Instruction: Get Raffle Info");
                ProcessOutput::RaffleInfo(registry.get_raffle_info(raffle_id)?)
            }
        };
        Ok(output)
    }

    /// Run a built instruction; the first signer account is the caller.
    pub fn process_instruction<S, E, L>(
        registry: &mut RaffleRegistry<S>,
        instruction: &Instruction,
        entropy: &mut E,
        ledger: &mut L,
    ) -> Result<ProcessOutput, ProgramError>
    where
        S: RaffleStore,
        E: EntropySource + ?Sized,
        L: Ledger + ?Sized,
    {
        if instruction.program_id != *registry.program_id() {
            msg!("Instruction addressed to program {}", instruction.program_id);
            return Err(ProgramError::IncorrectProgramId);
        }
        let caller = instruction
            .accounts
            .iter()
            .find(|meta| meta.is_signer)
            .map(|meta| meta.pubkey)
            .ok_or_else(|| {
                msg!("Instruction carries no signer");
                ProgramError::MissingRequiredSignature
            })?;

        Self::process(registry, &caller, entropy, ledger, &instruction.data)
    }
}
