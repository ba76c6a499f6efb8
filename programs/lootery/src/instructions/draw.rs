//! `draw()` — spec §4.6.
//!
//! Either rolls an empty round straight into the next one (no randomness
//! requested), or commits a Switchboard randomness account as the
//! in-flight request, mirroring the teacher's commit-phase validation
//! (`RandomnessAccountData::parse`, seed-slot freshness, not-yet-revealed
//! check).

use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::*;
use crate::errors::LooteryError;
use crate::events::{DrawRequested, DrawSkipped, JackpotRollover};
use crate::state::{LotteryState, Round, RoundState};

/// Minimum lamports the lottery state PDA must hold to cover the oracle's
/// request price; a configuration value per spec §9's note that the exact
/// gas/price estimate should be rehosted rather than hardcoded.
pub const MIN_OPERATIONAL_LAMPORTS: u64 = 1_000_000;

#[derive(Accounts)]
pub struct Draw<'info> {
    #[account(mut)]
    pub caller: Signer<'info>,

    /// No `round_state` constraint here: `draw` is callable from both
    /// `Purchase` (fresh close) and `DrawPending` (timed-out re-issue) —
    /// the handler itself branches on which applies.
    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery_state.bump,
        constraint = lottery_state.is_active() @ LooteryError::GameInactive,
    )]
    pub lottery_state: Account<'info, LotteryState>,

    #[account(
        seeds = [ROUND_SEED, &lottery_state.current_game_id.to_le_bytes()],
        bump = round.bump,
    )]
    pub round: Account<'info, Round>,

    /// Only written to when the current round has zero tickets (the
    /// skip-and-roll path); lazily initialised either here or by
    /// `on_randomness`, whichever closes this round first.
    #[account(
        init_if_needed,
        payer = caller,
        space = Round::LEN,
        seeds = [ROUND_SEED, &(lottery_state.current_game_id + 1).to_le_bytes()],
        bump,
    )]
    pub next_round: Account<'info, Round>,

    /// The Switchboard randomness account backing this draw. Only
    /// required when the round has tickets sold.
    /// CHECK: validated manually by parsing `RandomnessAccountData`.
    pub randomness_account_data: Option<UncheckedAccount<'info>>,

    pub system_program: Program<'info, System>,
}

impl<'info> Draw<'info> {
    fn validate_randomness_not_revealed(
        account: &UncheckedAccount<'info>,
        current_slot: u64,
    ) -> Result<()> {
        let randomness_data = RandomnessAccountData::parse(account.data.borrow())
            .map_err(|_| LooteryError::RandomnessParseError)?;
        require!(
            randomness_data.seed_slot >= current_slot.saturating_sub(25),
            LooteryError::RandomnessNotFresh
        );
        let is_revealed = randomness_data.get_value(current_slot).is_ok();
        require!(!is_revealed, LooteryError::RandomnessParseError);
        Ok(())
    }
}

pub fn handler(ctx: Context<Draw>) -> Result<()> {
    let clock = Clock::get()?;

    match ctx.accounts.lottery_state.round_state {
        RoundState::DrawPending => {
            // §4.3's re-issue transition: the only way back into `draw` from
            // `DrawPending` is an in-flight request that has sat unanswered
            // past the timeout. I2 guarantees `tickets_sold > 0` here, so
            // there is no skip-and-roll branch to consider.
            require!(
                ctx.accounts.lottery_state.request_timed_out(clock.unix_timestamp),
                LooteryError::RequestAlreadyInFlight
            );
        }
        RoundState::Purchase => {
            let lottery_state = &mut ctx.accounts.lottery_state;
            let round = &ctx.accounts.round;

            require!(
                clock.unix_timestamp >= round.started_at + lottery_state.game_period,
                LooteryError::WaitLonger
            );

            if round.tickets_sold == 0 {
                lottery_state.finalise_round_accounting(false)?;
                let rolled = lottery_state.jackpot;

                let closed_game_id = lottery_state.current_game_id;
                lottery_state.current_game_id =
                    closed_game_id.checked_add(1).ok_or(LooteryError::Overflow)?;

                let next_round = &mut ctx.accounts.next_round;
                next_round.game_id = lottery_state.current_game_id;
                next_round.tickets_sold = 0;
                next_round.started_at = clock.unix_timestamp;
                next_round.winning_pick_id = [0u64; 4];
                next_round.bump = ctx.bumps.next_round;

                emit!(DrawSkipped {
                    game_id: closed_game_id,
                    timestamp: clock.unix_timestamp,
                });
                emit!(JackpotRollover {
                    game_id: closed_game_id,
                    rolled_amount: rolled,
                    had_winners: false,
                    timestamp: clock.unix_timestamp,
                });

                msg!(
                    "Round #{} skipped (no tickets); rolled {} into round #{}",
                    closed_game_id,
                    rolled,
                    lottery_state.current_game_id
                );
                return Ok(());
            }
        }
    }

    require!(
        ctx.accounts.lottery_state.to_account_info().lamports() >= MIN_OPERATIONAL_LAMPORTS,
        LooteryError::InsufficientOperationalFunds
    );

    let randomness_account = ctx
        .accounts
        .randomness_account_data
        .as_ref()
        .ok_or(LooteryError::InsufficientRandomWords)?;
    Draw::validate_randomness_not_revealed(randomness_account, clock.slot)?;

    let lottery_state = &mut ctx.accounts.lottery_state;
    lottery_state.request_account = randomness_account.key();
    lottery_state.request_issued_at = clock.unix_timestamp;
    lottery_state.round_state = RoundState::DrawPending;

    emit!(DrawRequested {
        game_id: lottery_state.current_game_id,
        randomness_account: randomness_account.key(),
        issued_at: clock.unix_timestamp,
    });

    msg!("Randomness requested for round #{}", lottery_state.current_game_id);

    Ok(())
}
