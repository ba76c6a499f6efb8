//! `claimWinnings(tokenId)` — spec §4.9.
//!
//! Three outcomes: a winning ticket draws an equal share of
//! `unclaimedPayouts` (decrementing the pool, so later co-winners split
//! the residual); an apocalypse-round ticket that didn't win still draws
//! an equal consolation share of `unclaimedPayouts` without decrementing
//! it (every ticket in that round gets the same share); anything else is
//! `NoWin`. The ticket account always closes on claim — burn is the
//! one-shot claim nullifier.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LooteryError;
use crate::events::{ConsolationClaimed, WinningsClaimed};
use crate::pick_set;
use crate::state::{LotteryState, Round, Ticket, WinnerIndex};

#[derive(Accounts)]
pub struct Claim<'info> {
    #[account(mut, constraint = claimant.key() == ticket.owner @ LooteryError::Unauthorized)]
    pub claimant: Signer<'info>,

    #[account(seeds = [LOTTERY_SEED], bump = lottery_state.bump)]
    pub lottery_state: Account<'info, LotteryState>,

    #[account(
        seeds = [ROUND_SEED, &ticket.game_id.to_le_bytes()],
        bump = round.bump,
    )]
    pub round: Account<'info, Round>,

    #[account(
        seeds = [
            WINNER_INDEX_SEED,
            &ticket.game_id.to_le_bytes(),
            &pick_set::to_le_bytes(&round.winning_pick_id),
        ],
        bump = winner_index.bump,
    )]
    pub winner_index: Account<'info, WinnerIndex>,

    #[account(
        mut,
        close = claimant,
        seeds = [TICKET_SEED, &ticket.ticket_id.to_le_bytes()],
        bump = ticket.bump,
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(
        mut,
        constraint = claimant_token_account.mint == lottery_state.token_mint @ LooteryError::InvalidBallValue,
        constraint = claimant_token_account.owner == claimant.key() @ LooteryError::Unauthorized,
    )]
    pub claimant_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump,
        constraint = vault.key() == lottery_state.vault @ LooteryError::InvalidBallValue,
    )]
    pub vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Claim>) -> Result<()> {
    let clock = Clock::get()?;
    let lottery_state = &ctx.accounts.lottery_state;
    let ticket = &ctx.accounts.ticket;
    let round = &ctx.accounts.round;

    require!(
        ticket.is_in_claim_window(lottery_state.current_game_id, lottery_state.round_state),
        LooteryError::ClaimWindowMissed
    );

    let is_winning_pick = ticket.pick_id == round.winning_pick_id;
    let winners = ctx.accounts.winner_index.winner_count();

    let (amount, is_consolation) = if is_winning_pick && winners > 0 {
        let share = lottery_state
            .unclaimed_payouts
            .checked_div(winners)
            .ok_or(LooteryError::Overflow)?;
        (share, false)
    } else if winners == 0 && !lottery_state.is_active() && round.tickets_sold > 0 {
        let share = lottery_state
            .unclaimed_payouts
            .checked_div(round.tickets_sold)
            .ok_or(LooteryError::Overflow)?;
        (share, true)
    } else {
        return err!(LooteryError::NoWin);
    };

    let bump = lottery_state.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[LOTTERY_SEED, &[bump]]];
    let cpi_accounts = Transfer {
        from: ctx.accounts.vault.to_account_info(),
        to: ctx.accounts.claimant_token_account.to_account_info(),
        authority: ctx.accounts.lottery_state.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        signer_seeds,
    );
    token::transfer(cpi_ctx, amount)?;

    let ticket_id = ctx.accounts.ticket.ticket_id;
    let game_id = ctx.accounts.ticket.game_id;
    let claimant = ctx.accounts.claimant.key();

    if is_consolation {
        emit!(ConsolationClaimed {
            ticket_id,
            claimant,
            game_id,
            amount,
            timestamp: clock.unix_timestamp,
        });
        msg!("Ticket #{} claimed apocalypse consolation {}", ticket_id, amount);
    } else {
        let lottery_state = &mut ctx.accounts.lottery_state;
        lottery_state.unclaimed_payouts = lottery_state
            .unclaimed_payouts
            .checked_sub(amount)
            .ok_or(LooteryError::Overflow)?;

        emit!(WinningsClaimed {
            ticket_id,
            claimant,
            game_id,
            amount,
            timestamp: clock.unix_timestamp,
        });
        msg!("Ticket #{} claimed winnings {}", ticket_id, amount);
    }

    Ok(())
}
