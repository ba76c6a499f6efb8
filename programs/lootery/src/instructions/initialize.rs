use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::errors::LooteryError;
use crate::events::LooteryInitialized;
use crate::state::{LotteryState, Round, RoundState};

/// One-shot configuration, mirroring spec §3's "Configuration" table.
#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct InitializeParams {
    pub num_picks: u8,
    pub max_ball_value: u8,
    pub game_period: i64,
    pub ticket_price: u64,
    pub community_fee_bps: u16,
    pub seed_jackpot_delay: i64,
    pub seed_jackpot_min_value: u64,
    pub oracle: Pubkey,
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = LotteryState::LEN,
        seeds = [LOTTERY_SEED],
        bump
    )]
    pub lottery_state: Account<'info, LotteryState>,

    #[account(
        init,
        payer = authority,
        space = Round::LEN,
        seeds = [ROUND_SEED, &0u64.to_le_bytes()],
        bump
    )]
    pub round_zero: Account<'info, Round>,

    pub token_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = authority,
        token::mint = token_mint,
        token::authority = lottery_state,
        seeds = [VAULT_SEED],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
    // M <= 255 is structural: `max_ball_value` is a `u8`.
    require!(
        params.num_picks >= 1 && params.num_picks <= params.max_ball_value,
        LooteryError::InvalidNumPicks
    );
    require!(
        params.game_period >= MIN_GAME_PERIOD,
        LooteryError::InvalidGamePeriod
    );
    require!(params.ticket_price > 0, LooteryError::InvalidTicketPrice);
    require!(
        params.community_fee_bps <= BPS_DENOMINATOR,
        LooteryError::InvalidNumPicks
    );
    require!(
        params.seed_jackpot_delay > 0 && params.seed_jackpot_min_value > 0,
        LooteryError::InvalidNumPicks
    );

    let clock = Clock::get()?;

    let lottery_state = &mut ctx.accounts.lottery_state;
    lottery_state.authority = ctx.accounts.authority.key();
    lottery_state.token_mint = ctx.accounts.token_mint.key();
    lottery_state.vault = ctx.accounts.vault.key();
    lottery_state.oracle = params.oracle;

    lottery_state.num_picks = params.num_picks;
    lottery_state.max_ball_value = params.max_ball_value;
    lottery_state.game_period = params.game_period;
    lottery_state.ticket_price = params.ticket_price;
    lottery_state.community_fee_bps = params.community_fee_bps;
    lottery_state.seed_jackpot_delay = params.seed_jackpot_delay;
    lottery_state.seed_jackpot_min_value = params.seed_jackpot_min_value;

    lottery_state.current_game_id = 0;
    lottery_state.round_state = RoundState::Purchase;

    lottery_state.request_account = Pubkey::default();
    lottery_state.request_issued_at = 0;

    lottery_state.jackpot = 0;
    lottery_state.unclaimed_payouts = 0;
    lottery_state.accrued_community_fees = 0;

    lottery_state.apocalypse_game_id = 0;
    lottery_state.last_seeded_at = 0;
    lottery_state.next_ticket_id = 0;
    lottery_state.bump = ctx.bumps.lottery_state;

    let round_zero = &mut ctx.accounts.round_zero;
    round_zero.game_id = 0;
    round_zero.tickets_sold = 0;
    round_zero.started_at = clock.unix_timestamp;
    round_zero.winning_pick_id = [0u64; 4];
    round_zero.bump = ctx.bumps.round_zero;

    emit!(LooteryInitialized {
        authority: ctx.accounts.authority.key(),
        num_picks: params.num_picks,
        max_ball_value: params.max_ball_value,
        ticket_price: params.ticket_price,
        game_period: params.game_period,
        timestamp: clock.unix_timestamp,
    });

    msg!("Lootery initialized: {}/{} picks", params.num_picks, params.max_ball_value);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_with_n_greater_than_m_are_rejected_by_handler_precondition() {
        let params = InitializeParams {
            num_picks: 6,
            max_ball_value: 5,
            game_period: 3600,
            ticket_price: 100,
            community_fee_bps: 500,
            seed_jackpot_delay: 3600,
            seed_jackpot_min_value: 10,
            oracle: Pubkey::default(),
        };
        assert!(params.num_picks > params.max_ball_value);
    }
}
