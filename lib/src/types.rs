use soroban_sdk::{contracttype, Address, String};

/// A rentable vehicle in the fleet catalogue.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Vehicle {
    pub id: u64,
    /// Opaque make/model/plate text.
    pub metadata: String,
    /// Price per started day, in the payment token's smallest unit.
    pub daily_rate: i128,
    pub available: bool,
    pub registered_at: u64,
    pub rental_count: u64,
}

/// State of a rental in its lifecycle.
///
/// `None` is never stored; it is what a vehicle without an open record
/// reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[contracttype]
#[repr(u32)]
pub enum RentalState {
    None = 0,
    Active = 1,
    ReturnedPendingSettlement = 2,
    Closed = 3,
}

impl RentalState {
    /// Open rentals block the vehicle and hold escrow.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            RentalState::Active | RentalState::ReturnedPendingSettlement
        )
    }
}

/// Full rental record: custody window, copied rate, deposit and settlement.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Rental {
    pub rental_id: u64,
    pub vehicle_id: u64,
    pub renter: Address,
    pub start_time: u64,
    /// Rate copied from the vehicle when the rental started.
    pub daily_rate: i128,
    pub deposit: i128,
    /// Fixed at return time, zero before.
    pub fee_owed: i128,
    pub returned_at: Option<u64>,
    pub settled_at: Option<u64>,
    pub state: RentalState,
}

impl Rental {
    /// Part of the deposit that goes back to the renter on settlement.
    pub fn refund_due(&self) -> i128 {
        self.deposit - self.fee_owed
    }
}

/// Owner-tunable rental policy.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct RentalConfig {
    /// Minimum deposit, expressed in days of the vehicle's rate.
    pub min_deposit_days: u32,
}

/// Single entry in a rental's audit history.
#[derive(Clone, Debug)]
#[contracttype]
pub struct RentalHistoryEntry {
    pub rental_id: u64,
    pub action: String,
    pub actor: Address,
    pub timestamp: u64,
    pub amount: i128,
}
