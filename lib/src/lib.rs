#![no_std]
pub mod admin;
pub mod errors;
pub mod types;
pub mod validation;

pub use errors::ContractError;
pub use types::*;

// Config
pub const OWNER_KEY: &str = "owner";
pub const MAX_STRING_LENGTH: u32 = 256;
pub const SECONDS_PER_DAY: u64 = 86_400;
pub const MAX_RENTAL_DAYS: u32 = 36500; // ~100 years
pub const MAX_QUERY_LIMIT: u32 = 500;
pub const PRICE_UPPER_BOUND: i128 = i128::MAX / 2; // Prevent overflow in fee calculations

// Deposit policy: a deposit must cover at least this many days at the vehicle's rate.
pub const DEFAULT_MIN_DEPOSIT_DAYS: u32 = 1;
