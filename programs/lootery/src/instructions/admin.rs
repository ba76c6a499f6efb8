//! Administrative operations — spec §4.10. Owner-gated; `kill` is the only
//! one that moves the round state machine (it sets the apocalypse marker,
//! it does not transition `round_state` itself).

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LooteryError;
use crate::events::{AccruedFeesWithdrawn, FundsRescued, LooteryKilled};
use crate::state::{LotteryState, RoundState};

#[derive(Accounts)]
pub struct WithdrawAccruedFees<'info> {
    #[account(constraint = authority.key() == lottery_state.authority @ LooteryError::Unauthorized)]
    pub authority: Signer<'info>,

    #[account(mut, seeds = [LOTTERY_SEED], bump = lottery_state.bump)]
    pub lottery_state: Account<'info, LotteryState>,

    #[account(
        mut,
        constraint = destination.mint == lottery_state.token_mint @ LooteryError::InvalidBallValue,
    )]
    pub destination: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump,
        constraint = vault.key() == lottery_state.vault @ LooteryError::InvalidBallValue,
    )]
    pub vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_withdraw_accrued_fees(ctx: Context<WithdrawAccruedFees>) -> Result<()> {
    let clock = Clock::get()?;
    let amount = ctx.accounts.lottery_state.accrued_community_fees;

    let bump = ctx.accounts.lottery_state.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[LOTTERY_SEED, &[bump]]];
    let cpi_accounts = Transfer {
        from: ctx.accounts.vault.to_account_info(),
        to: ctx.accounts.destination.to_account_info(),
        authority: ctx.accounts.lottery_state.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        signer_seeds,
    );
    token::transfer(cpi_ctx, amount)?;

    ctx.accounts.lottery_state.accrued_community_fees = 0;

    emit!(AccruedFeesWithdrawn {
        authority: ctx.accounts.authority.key(),
        amount,
        destination: ctx.accounts.destination.key(),
        timestamp: clock.unix_timestamp,
    });

    msg!("Withdrew {} accrued community fees", amount);

    Ok(())
}

#[derive(Accounts)]
pub struct Kill<'info> {
    #[account(constraint = authority.key() == lottery_state.authority @ LooteryError::Unauthorized)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery_state.bump,
        constraint = lottery_state.is_active() @ LooteryError::GameInactive,
        constraint = lottery_state.round_state == RoundState::Purchase @ LooteryError::UnexpectedState,
    )]
    pub lottery_state: Account<'info, LotteryState>,
}

/// `kill()` — the *next* round becomes the terminal one; the current round
/// still runs to completion so in-flight tickets aren't orphaned.
pub fn handler_kill(ctx: Context<Kill>) -> Result<()> {
    let clock = Clock::get()?;
    let lottery_state = &mut ctx.accounts.lottery_state;

    lottery_state.apocalypse_game_id = lottery_state
        .current_game_id
        .checked_add(1)
        .ok_or(LooteryError::Overflow)?;

    emit!(LooteryKilled {
        authority: ctx.accounts.authority.key(),
        apocalypse_game_id: lottery_state.apocalypse_game_id,
        timestamp: clock.unix_timestamp,
    });

    msg!("Lottery killed; apocalypse round #{}", lottery_state.apocalypse_game_id);

    Ok(())
}

#[derive(Accounts)]
pub struct RescueToken<'info> {
    #[account(constraint = authority.key() == lottery_state.authority @ LooteryError::Unauthorized)]
    pub authority: Signer<'info>,

    #[account(seeds = [LOTTERY_SEED], bump = lottery_state.bump)]
    pub lottery_state: Account<'info, LotteryState>,

    #[account(
        mut,
        constraint = destination.mint == lottery_state.token_mint @ LooteryError::InvalidBallValue,
    )]
    pub destination: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump,
        constraint = vault.key() == lottery_state.vault @ LooteryError::InvalidBallValue,
    )]
    pub vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// `rescueToken(addr)` — moves the portion of the vault balance not
/// accounted for by `jackpot + unclaimedPayouts + accruedCommunityFees`.
pub fn handler_rescue_token(ctx: Context<RescueToken>) -> Result<()> {
    let clock = Clock::get()?;
    let lottery_state = &ctx.accounts.lottery_state;

    let accounted = lottery_state
        .jackpot
        .checked_add(lottery_state.unclaimed_payouts)
        .and_then(|sum| sum.checked_add(lottery_state.accrued_community_fees))
        .ok_or(LooteryError::Overflow)?;
    let amount = ctx
        .accounts
        .vault
        .amount
        .checked_sub(accounted)
        .ok_or(LooteryError::Overflow)?;

    let bump = lottery_state.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[LOTTERY_SEED, &[bump]]];
    let cpi_accounts = Transfer {
        from: ctx.accounts.vault.to_account_info(),
        to: ctx.accounts.destination.to_account_info(),
        authority: ctx.accounts.lottery_state.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        cpi_accounts,
        signer_seeds,
    );
    token::transfer(cpi_ctx, amount)?;

    emit!(FundsRescued {
        authority: ctx.accounts.authority.key(),
        amount,
        destination: ctx.accounts.destination.key(),
        timestamp: clock.unix_timestamp,
    });

    msg!("Rescued {} unaccounted prize-token units", amount);

    Ok(())
}

#[derive(Accounts)]
pub struct RescueNative<'info> {
    #[account(constraint = authority.key() == lottery_state.authority @ LooteryError::Unauthorized)]
    pub authority: Signer<'info>,

    #[account(mut, seeds = [LOTTERY_SEED], bump = lottery_state.bump)]
    pub lottery_state: Account<'info, LotteryState>,

    /// CHECK: lamport destination only.
    #[account(mut)]
    pub destination: UncheckedAccount<'info>,
}

/// `rescueNativeCoin()` — moves lamports above the operational floor the
/// lottery needs to keep paying the oracle's request price.
pub fn handler_rescue_native(ctx: Context<RescueNative>) -> Result<()> {
    let clock = Clock::get()?;
    let lottery_state_info = ctx.accounts.lottery_state.to_account_info();

    let rescuable = lottery_state_info
        .lamports()
        .checked_sub(super::draw::MIN_OPERATIONAL_LAMPORTS)
        .ok_or(LooteryError::InsufficientOperationalFunds)?;

    **lottery_state_info.try_borrow_mut_lamports()? -= rescuable;
    **ctx.accounts.destination.to_account_info().try_borrow_mut_lamports()? += rescuable;

    emit!(FundsRescued {
        authority: ctx.accounts.authority.key(),
        amount: rescuable,
        destination: ctx.accounts.destination.key(),
        timestamp: clock.unix_timestamp,
    });

    msg!("Rescued {} lamports", rescuable);

    Ok(())
}
