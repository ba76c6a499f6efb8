//! Lootery — a permissionless pick-N-of-M number lottery.
//!
//! A round state machine coordinates ticket sales, externally-sourced
//! randomness, prize computation, and claim accounting over discrete,
//! time-bounded rounds. The hard parts are: the `Purchase` / `DrawPending`
//! round lifecycle with a pending randomness request; deterministic
//! winning-number generation from a single uniform seed via a 4-round
//! Feistel shuffle; pick-set identity for O(1) winner lookup; and a
//! jackpot-rollover / unclaimed-payout / apocalypse accounting model that
//! preserves total-funds invariants across every transition.
//!
//! # Architecture
//! - `LotteryState`: the singleton configuration + accounting + round
//!   state machine account.
//! - `Round`: per-round ledger (tickets sold, started-at, winning pick).
//! - `Ticket`: one per purchased pick; burned (closed) on claim.
//! - `WinnerIndex`: per-round, per-pick table of ticket ids, enabling
//!   O(1) winner counting without scanning every ticket.
//!
//! Randomness is sourced from a Switchboard on-demand randomness account;
//! the prize token is held in an SPL token vault owned by the program's
//! `LotteryState` PDA.

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod feistel;
pub mod instructions;
pub mod pick_set;
pub mod state;

pub use constants::*;
pub use errors::*;
pub use events::*;
pub use state::*;

#[allow(ambiguous_glob_reexports)]
pub use instructions::*;

declare_id!("LooteryProgram11111111111111111111111111111");

#[program]
pub mod lootery {
    use super::*;

    /// One-shot configuration of a new lottery instance.
    pub fn initialize(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Buy one ticket for the current round, paying `ticketPrice` from the
    /// caller's token account.
    pub fn purchase(ctx: Context<Purchase>, picks: Vec<u8>) -> Result<()> {
        instructions::purchase::handler(ctx, picks)
    }

    /// Owner-minted ticket; no payment required.
    pub fn owner_pick(ctx: Context<OwnerPick>, picks: Vec<u8>) -> Result<()> {
        instructions::purchase::handler_owner_pick(ctx, picks)
    }

    /// Top up the jackpot outside of ticket sales, rate-limited.
    pub fn seed_jackpot(ctx: Context<SeedJackpot>, value: u64) -> Result<()> {
        instructions::seed_jackpot::handler(ctx, value)
    }

    /// Close the current round: skip straight to the next round if no
    /// tickets were sold, otherwise request randomness from the oracle.
    pub fn draw(ctx: Context<Draw>) -> Result<()> {
        instructions::draw::handler(ctx)
    }

    /// Randomness callback: reveals the oracle's value, derives the
    /// winning pick, finalises the round's accounting, and opens the
    /// next round.
    pub fn on_randomness(ctx: Context<OnRandomness>, claimed_winning_pick_id: [u8; 32]) -> Result<()> {
        instructions::on_randomness::handler(ctx, claimed_winning_pick_id)
    }

    /// Claim a ticket's prize share (winning or apocalypse consolation)
    /// and burn the ticket.
    pub fn claim_winnings(ctx: Context<Claim>) -> Result<()> {
        instructions::claim::handler(ctx)
    }

    /// Withdraw accrued community fees to the owner.
    pub fn withdraw_accrued_fees(ctx: Context<WithdrawAccruedFees>) -> Result<()> {
        instructions::admin::handler_withdraw_accrued_fees(ctx)
    }

    /// Declare the next round the terminal (apocalypse) round.
    pub fn kill(ctx: Context<Kill>) -> Result<()> {
        instructions::admin::handler_kill(ctx)
    }

    /// Rescue the unaccounted portion of the prize-token vault balance.
    pub fn rescue_token(ctx: Context<RescueToken>) -> Result<()> {
        instructions::admin::handler_rescue_token(ctx)
    }

    /// Rescue lamports above the operational floor.
    pub fn rescue_native(ctx: Context<RescueNative>) -> Result<()> {
        instructions::admin::handler_rescue_native(ctx)
    }
}
