//! Lootery events
//!
//! Emitted for off-chain indexing and UI updates. Names follow the
//! semantic event names the round state machine and accounting model are
//! specified against.

use anchor_lang::prelude::*;

// ============================================================================
// TICKET EVENTS
// ============================================================================

#[event]
pub struct TicketPurchased {
    pub ticket: Pubkey,
    pub owner: Pubkey,
    pub game_id: u64,
    pub ticket_id: u64,
    pub pick_id: [u64; 4],
    pub price_paid: u64,
    pub timestamp: i64,
}

// ============================================================================
// DRAW / ROUND EVENTS
// ============================================================================

#[event]
pub struct DrawRequested {
    pub game_id: u64,
    pub randomness_account: Pubkey,
    pub issued_at: i64,
}

#[event]
pub struct DrawSkipped {
    pub game_id: u64,
    pub timestamp: i64,
}

#[event]
pub struct GameFinalised {
    pub game_id: u64,
    pub winning_pick_id: [u64; 4],
    pub winning_balls: Vec<u8>,
    pub winners: u64,
    pub timestamp: i64,
}

#[event]
pub struct JackpotRollover {
    pub game_id: u64,
    pub rolled_amount: u64,
    pub had_winners: bool,
    pub timestamp: i64,
}

// ============================================================================
// CLAIM EVENTS
// ============================================================================

#[event]
pub struct WinningsClaimed {
    pub ticket_id: u64,
    pub claimant: Pubkey,
    pub game_id: u64,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct ConsolationClaimed {
    pub ticket_id: u64,
    pub claimant: Pubkey,
    pub game_id: u64,
    pub amount: u64,
    pub timestamp: i64,
}

// ============================================================================
// ADMIN EVENTS
// ============================================================================

#[event]
pub struct LooteryInitialized {
    pub authority: Pubkey,
    pub num_picks: u8,
    pub max_ball_value: u8,
    pub ticket_price: u64,
    pub game_period: i64,
    pub timestamp: i64,
}

#[event]
pub struct JackpotSeeded {
    pub by: Pubkey,
    pub amount: u64,
    pub new_jackpot: u64,
    pub timestamp: i64,
}

#[event]
pub struct LooteryKilled {
    pub authority: Pubkey,
    pub apocalypse_game_id: u64,
    pub timestamp: i64,
}

#[event]
pub struct AccruedFeesWithdrawn {
    pub authority: Pubkey,
    pub amount: u64,
    pub destination: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct FundsRescued {
    pub authority: Pubkey,
    pub amount: u64,
    pub destination: Pubkey,
    pub timestamp: i64,
}
