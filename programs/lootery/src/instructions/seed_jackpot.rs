use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LooteryError;
use crate::events::JackpotSeeded;
use crate::state::{LotteryState, RoundState};

#[derive(Accounts)]
pub struct SeedJackpot<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery_state.bump,
        constraint = lottery_state.is_active() @ LooteryError::GameInactive,
        constraint = lottery_state.round_state == RoundState::Purchase @ LooteryError::UnexpectedState,
    )]
    pub lottery_state: Account<'info, LotteryState>,

    #[account(
        mut,
        constraint = payer_token_account.mint == lottery_state.token_mint @ LooteryError::InvalidBallValue,
        constraint = payer_token_account.owner == payer.key() @ LooteryError::Unauthorized,
    )]
    pub payer_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump,
        constraint = vault.key() == lottery_state.vault @ LooteryError::InvalidBallValue,
    )]
    pub vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// `seedJackpot(value)` — spec §4.5. Rate-limited: one seed per
/// `seedJackpotDelay` seconds, and only above `seedJackpotMinValue`.
pub fn handler(ctx: Context<SeedJackpot>, value: u64) -> Result<()> {
    let clock = Clock::get()?;
    let lottery_state = &mut ctx.accounts.lottery_state;

    require!(
        value >= lottery_state.seed_jackpot_min_value,
        LooteryError::InsufficientJackpotSeed
    );
    require!(
        clock.unix_timestamp >= lottery_state.last_seeded_at + lottery_state.seed_jackpot_delay,
        LooteryError::RateLimited
    );

    let cpi_accounts = Transfer {
        from: ctx.accounts.payer_token_account.to_account_info(),
        to: ctx.accounts.vault.to_account_info(),
        authority: ctx.accounts.payer.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(ctx.accounts.token_program.to_account_info(), cpi_accounts);
    token::transfer(cpi_ctx, value)?;

    let lottery_state = &mut ctx.accounts.lottery_state;
    lottery_state.jackpot = lottery_state
        .jackpot
        .checked_add(value)
        .ok_or(LooteryError::Overflow)?;
    lottery_state.last_seeded_at = clock.unix_timestamp;

    emit!(JackpotSeeded {
        by: ctx.accounts.payer.key(),
        amount: value,
        new_jackpot: lottery_state.jackpot,
        timestamp: clock.unix_timestamp,
    });

    msg!("Jackpot seeded with {}; new jackpot {}", value, lottery_state.jackpot);

    Ok(())
}
