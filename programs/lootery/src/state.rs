//! Lootery accounts
//!
//! `LotteryState` is the singleton configuration + accounting account: it
//! carries the immutable configuration, the current-game state machine,
//! the randomness request slot, and the three accounting scalars. `Round`,
//! `Ticket`, and `WinnerIndex` are the per-round / per-ticket / per-pick
//! tables the round ledger and winner index are built from — parallel
//! tables keyed by id, not an object graph.

use crate::constants::*;
use crate::errors::LooteryError;
use crate::pick_set::PickId;
use anchor_lang::prelude::*;

/// The round state machine's two states (§4.3). The apocalypse terminal
/// modifier is a separate field on `LotteryState`, not a third state.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
    Purchase,
    DrawPending,
}

#[account]
pub struct LotteryState {
    /// Owner / admin authority.
    pub authority: Pubkey,
    /// Prize-token mint (the value ledger's asset).
    pub token_mint: Pubkey,
    /// Prize vault token account, owned by this PDA.
    pub vault: Pubkey,
    /// Randomness oracle queue/program this lottery is configured against.
    pub oracle: Pubkey,

    // -- Immutable configuration --
    pub num_picks: u8,
    pub max_ball_value: u8,
    pub game_period: i64,
    pub ticket_price: u64,
    pub community_fee_bps: u16,
    pub seed_jackpot_delay: i64,
    pub seed_jackpot_min_value: u64,

    // -- Round state machine --
    pub current_game_id: u64,
    pub round_state: RoundState,

    // -- Randomness request tracker (single slot) --
    pub request_account: Pubkey,
    pub request_issued_at: i64,

    // -- Accounting scalars --
    pub jackpot: u64,
    pub unclaimed_payouts: u64,
    pub accrued_community_fees: u64,

    // -- Apocalypse marker; 0 = active --
    pub apocalypse_game_id: u64,

    // -- Rate limit --
    pub last_seeded_at: i64,

    /// Next ticket id to allocate; consecutive across all rounds.
    pub next_ticket_id: u64,

    pub bump: u8,
}

impl LotteryState {
    pub const LEN: usize = 8 // discriminator
        + 32 * 4 // authority, token_mint, vault, oracle
        + 1 + 1 + 8 + 8 + 2 + 8 + 8 // config
        + 8 + 1 // current_game_id, round_state
        + 32 + 8 // request_account, request_issued_at
        + 8 + 8 + 8 // accounting
        + 8 // apocalypse_game_id
        + 8 // last_seeded_at
        + 8 // next_ticket_id
        + 1; // bump

    /// I6 / spec §4.10: the lottery accepts writes only while no apocalypse
    /// has been declared, or the current round precedes the declared
    /// terminal round.
    pub fn is_active(&self) -> bool {
        self.apocalypse_game_id == 0 || self.current_game_id < self.apocalypse_game_id
    }

    /// Whether a randomness request is currently outstanding (I2).
    pub fn has_pending_request(&self) -> bool {
        self.request_issued_at != 0
    }

    /// Whether an outstanding request is old enough that `draw` may
    /// re-issue a fresh one (§4.6, §5 "Cancellation / timeout").
    pub fn request_timed_out(&self, now: i64) -> bool {
        self.has_pending_request() && now.saturating_sub(self.request_issued_at) >= RANDOMNESS_REQUEST_TIMEOUT
    }

    pub fn community_fee(&self, total: u64) -> Result<u64> {
        let fee = (total as u128)
            .checked_mul(self.community_fee_bps as u128)
            .ok_or(LooteryError::Overflow)?
            / BPS_DENOMINATOR as u128;
        u64::try_from(fee).map_err(|_| LooteryError::Overflow.into())
    }

    /// Finalisation routine, spec §4.8: rolls `jackpot`/`unclaimedPayouts`
    /// into each other depending on whether the closing round had winners.
    /// Conserves `jackpot + unclaimedPayouts` (P5) — no transfer happens
    /// here, only relabelling which pool the funds sit in.
    pub fn finalise_round_accounting(&mut self, had_winners: bool) -> Result<()> {
        if had_winners {
            self.unclaimed_payouts = self.jackpot;
            self.jackpot = 0;
        } else {
            self.jackpot = self
                .jackpot
                .checked_add(self.unclaimed_payouts)
                .ok_or(LooteryError::Overflow)?;
            self.unclaimed_payouts = 0;
        }
        Ok(())
    }
}

#[account]
pub struct Round {
    pub game_id: u64,
    pub tickets_sold: u64,
    pub started_at: i64,
    /// Zero until the round is drawn.
    pub winning_pick_id: PickId,
    pub bump: u8,
}

impl Round {
    pub const LEN: usize = 8 + 8 + 8 + 8 + (8 * 4) + 1;

    pub fn is_drawn(&self) -> bool {
        self.winning_pick_id != [0u64; 4]
    }
}

#[account]
pub struct Ticket {
    pub owner: Pubkey,
    pub ticket_id: u64,
    pub game_id: u64,
    pub pick_id: PickId,
    pub bump: u8,
}

impl Ticket {
    pub const LEN: usize = 8 + 32 + 8 + 8 + (8 * 4) + 1;

    /// I3 / P4: tickets are claimable only during the round right after
    /// the one they were sold in.
    pub fn is_in_claim_window(&self, current_game_id: u64, round_state: RoundState) -> bool {
        round_state == RoundState::Purchase && self.game_id + 1 == current_game_id
    }
}

#[account]
pub struct WinnerIndex {
    pub game_id: u64,
    pub pick_id: PickId,
    pub ticket_ids: Vec<u64>,
    pub bump: u8,
}

impl WinnerIndex {
    /// Fixed size: discriminator + fixed fields + vec length prefix +
    /// `WINNER_INDEX_CAPACITY` u64 slots.
    pub const LEN: usize = 8 + 8 + (8 * 4) + 1 + 4 + (8 * WINNER_INDEX_CAPACITY) + 1;

    pub fn push_ticket(&mut self, ticket_id: u64) -> Result<()> {
        require!(
            self.ticket_ids.len() < WINNER_INDEX_CAPACITY,
            LooteryError::WinnerIndexFull
        );
        self.ticket_ids.push(ticket_id);
        Ok(())
    }

    pub fn winner_count(&self) -> u64 {
        self.ticket_ids.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_state() -> LotteryState {
        LotteryState {
            authority: Pubkey::default(),
            token_mint: Pubkey::default(),
            vault: Pubkey::default(),
            oracle: Pubkey::default(),
            num_picks: 5,
            max_ball_value: 69,
            game_period: 3600,
            ticket_price: 100,
            community_fee_bps: 500,
            seed_jackpot_delay: 3600,
            seed_jackpot_min_value: 10,
            current_game_id: 0,
            round_state: RoundState::Purchase,
            request_account: Pubkey::default(),
            request_issued_at: 0,
            jackpot: 0,
            unclaimed_payouts: 0,
            accrued_community_fees: 0,
            apocalypse_game_id: 0,
            last_seeded_at: 0,
            next_ticket_id: 0,
            bump: 0,
        }
    }

    #[test]
    fn active_until_apocalypse_round_closes() {
        let mut s = base_state();
        assert!(s.is_active());
        s.apocalypse_game_id = 5;
        s.current_game_id = 4;
        assert!(s.is_active());
        s.current_game_id = 5;
        assert!(!s.is_active());
    }

    #[test]
    fn request_timeout_respects_one_hour() {
        let mut s = base_state();
        assert!(!s.request_timed_out(1000));
        s.request_issued_at = 1000;
        assert!(!s.request_timed_out(1000 + RANDOMNESS_REQUEST_TIMEOUT - 1));
        assert!(s.request_timed_out(1000 + RANDOMNESS_REQUEST_TIMEOUT));
    }

    #[test]
    fn community_fee_rounds_down() {
        let mut s = base_state();
        s.community_fee_bps = 5000;
        assert_eq!(s.community_fee(1).unwrap(), 0);
        assert_eq!(s.community_fee(3).unwrap(), 1);
        s.community_fee_bps = 0;
        assert_eq!(s.community_fee(1000).unwrap(), 0);
        s.community_fee_bps = BPS_DENOMINATOR;
        assert_eq!(s.community_fee(1000).unwrap(), 1000);
    }

    #[test]
    fn ticket_claim_window_is_exactly_one_round() {
        let t = Ticket {
            owner: Pubkey::default(),
            ticket_id: 1,
            game_id: 3,
            pick_id: [0u64; 4],
            bump: 0,
        };
        assert!(t.is_in_claim_window(4, RoundState::Purchase));
        assert!(!t.is_in_claim_window(5, RoundState::Purchase));
        assert!(!t.is_in_claim_window(4, RoundState::DrawPending));
    }

    #[test]
    fn finalisation_with_winners_moves_jackpot_to_unclaimed() {
        let mut s = base_state();
        s.jackpot = 1005;
        s.unclaimed_payouts = 0;
        s.finalise_round_accounting(true).unwrap();
        assert_eq!(s.jackpot, 0);
        assert_eq!(s.unclaimed_payouts, 1005);
    }

    #[test]
    fn finalisation_without_winners_rolls_everything_into_jackpot() {
        let mut s = base_state();
        s.jackpot = 1005;
        s.unclaimed_payouts = 250;
        s.finalise_round_accounting(false).unwrap();
        assert_eq!(s.jackpot, 1255);
        assert_eq!(s.unclaimed_payouts, 0);
    }

    #[test]
    fn finalisation_conserves_the_pot_when_no_winners() {
        // P5 holds unconditionally on the no-winner branch: the combined
        // pot just relabels from (jackpot, unclaimedPayouts) to
        // (jackpot+unclaimedPayouts, 0).
        let mut s = base_state();
        s.jackpot = 777;
        s.unclaimed_payouts = 333;
        let before = s.jackpot + s.unclaimed_payouts;
        s.finalise_round_accounting(false).unwrap();
        assert_eq!(s.jackpot + s.unclaimed_payouts, before);
    }

    #[test]
    fn finalisation_with_winners_discards_any_prior_unclaimed_dust() {
        // Spec §4.8's winner branch sets unclaimedPayouts <- J unconditionally;
        // it does not fold in whatever was left in unclaimedPayouts from a
        // round whose claim window has now closed (documented, not a bug).
        let mut s = base_state();
        s.jackpot = 777;
        s.unclaimed_payouts = 50; // dust nobody claimed in time
        s.finalise_round_accounting(true).unwrap();
        assert_eq!(s.unclaimed_payouts, 777);
        assert_eq!(s.jackpot, 0);
    }
}
