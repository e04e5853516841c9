use soroban_sdk::{Address, Env, String, Vec};

use rental_lib::{
    ContractError, Rental, RentalHistoryEntry, RentalState, Vehicle, SECONDS_PER_DAY,
};

use crate::storage;

/// Whole days charged for a custody window: the ceiling of the elapsed
/// time in days, never less than one.
pub fn billable_days(start_time: u64, now: u64) -> u64 {
    let elapsed = now.saturating_sub(start_time);
    elapsed.div_ceil(SECONDS_PER_DAY).max(1)
}

/// Fee for a custody window, capped at the deposit so a renter never owes
/// more than they posted.
pub fn compute_fee(daily_rate: i128, deposit: i128, start_time: u64, now: u64) -> i128 {
    let days = billable_days(start_time, now) as i128;
    daily_rate
        .checked_mul(days)
        .map_or(deposit, |fee| fee.min(deposit))
}

/// Rental lifecycle per vehicle:
///
/// ```text
/// None --start--> Active --mark_returned--> ReturnedPendingSettlement --mark_closed--> Closed
/// ```
///
/// At most one open (Active or ReturnedPendingSettlement) record exists per
/// vehicle; it is tracked through `DataKey::OpenRental`. Closed records are
/// kept for audit and a new rental always gets a fresh id.
pub struct RentalLedger {
    env: Env,
}

impl RentalLedger {
    pub fn new(env: Env) -> Self {
        Self { env }
    }

    pub fn load(&self, rental_id: u64) -> Result<Rental, ContractError> {
        storage::get_rental(&self.env, rental_id).ok_or(ContractError::UnknownRental)
    }

    pub fn open_rental(&self, vehicle_id: u64) -> Option<Rental> {
        storage::get_open_rental(&self.env, vehicle_id)
            .and_then(|rental_id| storage::get_rental(&self.env, rental_id))
    }

    pub fn state_of(&self, vehicle_id: u64) -> RentalState {
        self.open_rental(vehicle_id)
            .map_or(RentalState::None, |rental| rental.state)
    }

    /// Open an Active rental for `renter`, copying the vehicle's current rate.
    pub fn start(
        &self,
        vehicle: &Vehicle,
        renter: &Address,
        deposit: i128,
    ) -> Result<Rental, ContractError> {
        if self.open_rental(vehicle.id).is_some() {
            return Err(ContractError::VehicleUnavailable);
        }

        let rental_id = storage::increment_rental_counter(&self.env)?;
        let now = self.env.ledger().timestamp();

        let rental = Rental {
            rental_id,
            vehicle_id: vehicle.id,
            renter: renter.clone(),
            start_time: now,
            daily_rate: vehicle.daily_rate,
            deposit,
            fee_owed: 0,
            returned_at: None,
            settled_at: None,
            state: RentalState::Active,
        };

        storage::set_rental(&self.env, &rental);
        storage::set_open_rental(&self.env, vehicle.id, rental_id);
        storage::vehicle_rentals_append(&self.env, vehicle.id, rental_id)?;
        storage::renter_rentals_append(&self.env, renter, rental_id)?;
        self.record(rental_id, "rented", renter.clone(), deposit);

        Ok(rental)
    }

    /// Fix the fee owed and move the rental to ReturnedPendingSettlement.
    pub fn mark_returned(&self, vehicle_id: u64, caller: &Address) -> Result<Rental, ContractError> {
        let mut rental = self
            .open_rental(vehicle_id)
            .ok_or(ContractError::InvalidState)?;

        if rental.state != RentalState::Active {
            return Err(ContractError::InvalidState);
        }
        if &rental.renter != caller {
            return Err(ContractError::NotRenter);
        }

        let now = self.env.ledger().timestamp();
        rental.fee_owed = compute_fee(rental.daily_rate, rental.deposit, rental.start_time, now);
        rental.returned_at = Some(now);
        rental.state = RentalState::ReturnedPendingSettlement;

        storage::set_rental(&self.env, &rental);
        self.record(rental.rental_id, "returned", caller.clone(), rental.fee_owed);

        Ok(rental)
    }

    /// Close a returned rental and release the vehicle's open slot.
    ///
    /// Value movement is left to the caller and must happen after this
    /// returns.
    pub fn mark_closed(&self, vehicle_id: u64) -> Result<Rental, ContractError> {
        let mut rental = self
            .open_rental(vehicle_id)
            .ok_or(ContractError::InvalidState)?;

        if rental.state != RentalState::ReturnedPendingSettlement {
            return Err(ContractError::InvalidState);
        }

        rental.settled_at = Some(self.env.ledger().timestamp());
        rental.state = RentalState::Closed;

        storage::set_rental(&self.env, &rental);
        storage::remove_open_rental(&self.env, vehicle_id);
        self.record(
            rental.rental_id,
            "settled",
            self.env.current_contract_address(),
            rental.refund_due(),
        );

        Ok(rental)
    }

    /// Fee the active renter would owe if the vehicle came back now.
    pub fn quote(&self, vehicle_id: u64) -> Result<i128, ContractError> {
        let rental = self
            .open_rental(vehicle_id)
            .ok_or(ContractError::InvalidState)?;
        if rental.state != RentalState::Active {
            return Err(ContractError::InvalidState);
        }
        Ok(compute_fee(
            rental.daily_rate,
            rental.deposit,
            rental.start_time,
            self.env.ledger().timestamp(),
        ))
    }

    pub fn history(&self, rental_id: u64) -> Vec<RentalHistoryEntry> {
        let count = storage::get_rental_history_count(&self.env, rental_id);
        let mut history = Vec::new(&self.env);
        for i in 0..count {
            if let Some(entry) = storage::get_rental_history(&self.env, rental_id, i) {
                history.push_back(entry);
            }
        }
        history
    }

    fn record(&self, rental_id: u64, action: &str, actor: Address, amount: i128) {
        let entry = RentalHistoryEntry {
            rental_id,
            action: String::from_str(&self.env, action),
            actor,
            timestamp: self.env.ledger().timestamp(),
            amount,
        };
        storage::add_rental_history(&self.env, rental_id, &entry);
    }
}
