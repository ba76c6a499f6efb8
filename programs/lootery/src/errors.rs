//! Lootery error codes
//!
//! Grouped by concern, following the closed error set the round state
//! machine, accounting model, and PickSet codec are specified against.

use anchor_lang::prelude::*;

#[error_code]
pub enum LooteryError {
    // -- Validation (6000s) --
    #[msg("numPicks must be at least 1 and at most maxBallValue")]
    InvalidNumPicks = 6000,
    #[msg("ball value out of range [1, maxBallValue]")]
    InvalidBallValue,
    #[msg("picks must be strictly ascending")]
    UnsortedPicks,
    #[msg("ticket price must be positive")]
    InvalidTicketPrice,
    #[msg("game period must be at least 10 minutes")]
    InvalidGamePeriod,
    #[msg("seed jackpot value below configured minimum")]
    InsufficientJackpotSeed,

    // -- State (6010s) --
    #[msg("operation not valid for the current round state")]
    UnexpectedState = 6010,
    #[msg("lottery is inactive (apocalypse round has closed)")]
    GameInactive,
    #[msg("current round period has not yet elapsed")]
    WaitLonger,
    #[msg("tickets may only be claimed during the round after they were sold")]
    ClaimWindowMissed,

    // -- Randomness (6020s) --
    #[msg("a randomness request is already in flight and not yet timed out")]
    RequestAlreadyInFlight = 6020,
    #[msg("caller is not the configured randomness oracle")]
    CallerNotRandomiser,
    #[msg("callback request id does not match the in-flight request")]
    RequestIdMismatch,
    #[msg("randomness payload contained no words")]
    InsufficientRandomWords,

    // -- Accounting (6030s) --
    #[msg("insufficient operational funds to pay the oracle request price")]
    InsufficientOperationalFunds = 6030,
    #[msg("ticket does not hold the winning pick")]
    NoWin,

    // -- Limits (6040s) --
    #[msg("seed jackpot called before the rate-limit delay elapsed")]
    RateLimited = 6040,
    #[msg("ticketsSold would overflow u64")]
    TicketsSoldOverflow,

    // -- Authorisation (6050s) --
    #[msg("caller is not the lottery owner")]
    Unauthorized = 6050,

    // -- Ambient arithmetic/system (6060s) --
    #[msg("arithmetic overflow")]
    Overflow = 6060,
    #[msg("randomness account is not fresh enough to trust")]
    RandomnessNotFresh,
    #[msg("randomness account has not been revealed yet")]
    RandomnessNotResolved,
    #[msg("winner index for this pick has reached capacity for the round")]
    WinnerIndexFull,
    #[msg("could not parse the randomness account")]
    RandomnessParseError,
    #[msg("client-supplied winner index account does not match the drawn pick")]
    WinningPickIndexMismatch,
}
