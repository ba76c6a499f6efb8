pub mod admin;
pub mod claim;
pub mod draw;
pub mod initialize;
pub mod on_randomness;
pub mod purchase;
pub mod seed_jackpot;

#[allow(ambiguous_glob_reexports)]
pub use admin::*;
#[allow(ambiguous_glob_reexports)]
pub use claim::*;
#[allow(ambiguous_glob_reexports)]
pub use draw::*;
#[allow(ambiguous_glob_reexports)]
pub use initialize::*;
#[allow(ambiguous_glob_reexports)]
pub use on_randomness::*;
#[allow(ambiguous_glob_reexports)]
pub use purchase::*;
#[allow(ambiguous_glob_reexports)]
pub use seed_jackpot::*;
