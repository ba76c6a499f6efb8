use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LooteryError;
use crate::events::TicketPurchased;
use crate::pick_set;
use crate::state::{LotteryState, Round, RoundState, Ticket, WinnerIndex};

/// Per-call parameters `record_ticket` needs beyond the four accounts it
/// mutates, bundled so the helper stays under clippy's
/// too-many-arguments threshold.
struct TicketMint {
    owner: Pubkey,
    winner_index_is_fresh: bool,
    ticket_bump: u8,
    winner_index_bump: u8,
}

/// Validates picks, mints a ticket, and records it in the round ledger and
/// winner index. Shared by `purchase` (payment required) and `owner_pick`
/// (no payment, owner only) — spec §4.4 step 6.
fn record_ticket(
    lottery_state: &mut Account<LotteryState>,
    round: &mut Account<Round>,
    winner_index: &mut Account<WinnerIndex>,
    ticket: &mut Account<Ticket>,
    picks: &[u8],
    mint: TicketMint,
) -> Result<[u64; 4]> {
    let pick_id = pick_set::encode(picks, lottery_state.num_picks, lottery_state.max_ball_value)?;

    let ticket_id = lottery_state.next_ticket_id;
    lottery_state.next_ticket_id = lottery_state
        .next_ticket_id
        .checked_add(1)
        .ok_or(LooteryError::Overflow)?;

    round.tickets_sold = round
        .tickets_sold
        .checked_add(1)
        .ok_or(LooteryError::TicketsSoldOverflow)?;

    if mint.winner_index_is_fresh {
        winner_index.game_id = lottery_state.current_game_id;
        winner_index.pick_id = pick_id;
        winner_index.bump = mint.winner_index_bump;
    }
    winner_index.push_ticket(ticket_id)?;

    ticket.owner = mint.owner;
    ticket.ticket_id = ticket_id;
    ticket.game_id = lottery_state.current_game_id;
    ticket.pick_id = pick_id;
    ticket.bump = mint.ticket_bump;

    Ok(pick_id)
}

#[derive(Accounts)]
#[instruction(picks: Vec<u8>)]
pub struct Purchase<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// Recipient of the minted ticket; need not sign.
    /// CHECK: only used as the `owner` field recorded on the ticket.
    pub recipient: UncheckedAccount<'info>,

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
        seeds = [ROUND_SEED, &lottery_state.current_game_id.to_le_bytes()],
        bump = round.bump,
    )]
    pub round: Account<'info, Round>,

    #[account(
        init_if_needed,
        payer = payer,
        space = WinnerIndex::LEN,
        seeds = [
            WINNER_INDEX_SEED,
            &lottery_state.current_game_id.to_le_bytes(),
            &pick_set::to_le_bytes(&pick_set::encode_unchecked(&picks)),
        ],
        bump,
    )]
    pub winner_index: Account<'info, WinnerIndex>,

    #[account(
        init,
        payer = payer,
        space = Ticket::LEN,
        seeds = [TICKET_SEED, &lottery_state.next_ticket_id.to_le_bytes()],
        bump,
    )]
    pub ticket: Account<'info, Ticket>,

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
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Purchase>, picks: Vec<u8>) -> Result<()> {
    let clock = Clock::get()?;
    let winner_index_is_fresh = ctx.accounts.winner_index.ticket_ids.is_empty()
        && ctx.accounts.winner_index.pick_id == [0u64; 4];

    let price = ctx.accounts.lottery_state.ticket_price;
    let fee = ctx.accounts.lottery_state.community_fee(price)?;
    let jackpot_share = price.checked_sub(fee).ok_or(LooteryError::Overflow)?;

    let cpi_accounts = Transfer {
        from: ctx.accounts.payer_token_account.to_account_info(),
        to: ctx.accounts.vault.to_account_info(),
        authority: ctx.accounts.payer.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(ctx.accounts.token_program.to_account_info(), cpi_accounts);
    token::transfer(cpi_ctx, price)?;

    let owner = ctx.accounts.recipient.key();
    let ticket_id = ctx.accounts.lottery_state.next_ticket_id;
    let mint = TicketMint {
        owner,
        winner_index_is_fresh,
        ticket_bump: ctx.bumps.ticket,
        winner_index_bump: ctx.bumps.winner_index,
    };

    let pick_id = record_ticket(
        &mut ctx.accounts.lottery_state,
        &mut ctx.accounts.round,
        &mut ctx.accounts.winner_index,
        &mut ctx.accounts.ticket,
        &picks,
        mint,
    )?;

    let lottery_state = &mut ctx.accounts.lottery_state;
    lottery_state.accrued_community_fees = lottery_state
        .accrued_community_fees
        .checked_add(fee)
        .ok_or(LooteryError::Overflow)?;
    lottery_state.jackpot = lottery_state
        .jackpot
        .checked_add(jackpot_share)
        .ok_or(LooteryError::Overflow)?;

    emit!(TicketPurchased {
        ticket: ctx.accounts.ticket.key(),
        owner,
        game_id: lottery_state.current_game_id,
        ticket_id,
        pick_id,
        price_paid: price,
        timestamp: clock.unix_timestamp,
    });

    msg!("Ticket #{} purchased for game #{}", ticket_id, lottery_state.current_game_id);

    Ok(())
}

#[derive(Accounts)]
#[instruction(picks: Vec<u8>)]
pub struct OwnerPick<'info> {
    #[account(
        mut,
        constraint = authority.key() == lottery_state.authority @ LooteryError::Unauthorized,
    )]
    pub authority: Signer<'info>,

    /// CHECK: only used as the `owner` field recorded on the ticket.
    pub recipient: UncheckedAccount<'info>,

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
        seeds = [ROUND_SEED, &lottery_state.current_game_id.to_le_bytes()],
        bump = round.bump,
    )]
    pub round: Account<'info, Round>,

    #[account(
        init_if_needed,
        payer = authority,
        space = WinnerIndex::LEN,
        seeds = [
            WINNER_INDEX_SEED,
            &lottery_state.current_game_id.to_le_bytes(),
            &pick_set::to_le_bytes(&pick_set::encode_unchecked(&picks)),
        ],
        bump,
    )]
    pub winner_index: Account<'info, WinnerIndex>,

    #[account(
        init,
        payer = authority,
        space = Ticket::LEN,
        seeds = [TICKET_SEED, &lottery_state.next_ticket_id.to_le_bytes()],
        bump,
    )]
    pub ticket: Account<'info, Ticket>,

    pub system_program: Program<'info, System>,
}

pub fn handler_owner_pick(ctx: Context<OwnerPick>, picks: Vec<u8>) -> Result<()> {
    let clock = Clock::get()?;
    let winner_index_is_fresh = ctx.accounts.winner_index.ticket_ids.is_empty()
        && ctx.accounts.winner_index.pick_id == [0u64; 4];

    let owner = ctx.accounts.recipient.key();
    let ticket_id = ctx.accounts.lottery_state.next_ticket_id;
    let mint = TicketMint {
        owner,
        winner_index_is_fresh,
        ticket_bump: ctx.bumps.ticket,
        winner_index_bump: ctx.bumps.winner_index,
    };

    let pick_id = record_ticket(
        &mut ctx.accounts.lottery_state,
        &mut ctx.accounts.round,
        &mut ctx.accounts.winner_index,
        &mut ctx.accounts.ticket,
        &picks,
        mint,
    )?;

    emit!(TicketPurchased {
        ticket: ctx.accounts.ticket.key(),
        owner,
        game_id: ctx.accounts.lottery_state.current_game_id,
        ticket_id,
        pick_id,
        price_paid: 0,
        timestamp: clock.unix_timestamp,
    });

    msg!("Owner-minted ticket #{}", ticket_id);

    Ok(())
}
