#![no_std]

#[cfg(test)]
extern crate std;

mod escrow;
mod ledger;
mod registry;
mod storage;

#[cfg(test)]
mod test_escrow;
#[cfg(test)]
mod test_props;

use soroban_sdk::{contract, contractimpl, Address, Env, String, Symbol, Vec};
use rental_lib::{
    admin,
    validation::{validate_min_deposit_days, validate_query_limit},
    ContractError, Rental, RentalConfig, RentalHistoryEntry, RentalState, Vehicle,
};

use escrow::EscrowAccounting;
use ledger::RentalLedger;
use registry::VehicleRegistry;

#[contract]
pub struct VehicleRental;

#[contractimpl]
impl VehicleRental {
    /// Record the fleet owner and the token deposits are paid in. Both are
    /// fixed for the lifetime of the contract.
    pub fn __constructor(env: Env, owner: Address, payment_token: Address) {
        admin::set_owner(&env, &owner);
        storage::set_payment_token(&env, &payment_token);
        storage::set_config(
            &env,
            &RentalConfig {
                min_deposit_days: rental_lib::DEFAULT_MIN_DEPOSIT_DAYS,
            },
        );
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        admin::get_owner(&env)
    }

    pub fn get_payment_token(env: Env) -> Result<Address, ContractError> {
        storage::get_payment_token(&env)
    }

    pub fn get_config(env: Env) -> RentalConfig {
        storage::get_config(&env)
    }

    /// Change the minimum deposit, in days of a vehicle's rate (owner only).
    pub fn set_rental_config(
        env: Env,
        owner: Address,
        min_deposit_days: u32,
    ) -> Result<(), ContractError> {
        admin::require_owner(&env, &owner)?;
        validate_min_deposit_days(min_deposit_days)?;

        storage::set_config(&env, &RentalConfig { min_deposit_days });

        env.events().publish(
            (Symbol::new(&env, "rental_config_updated"),),
            (min_deposit_days,),
        );
        Ok(())
    }

    // ---------------- VEHICLES ----------------

    /// Add a vehicle to the fleet (owner only). Returns its id.
    pub fn register_vehicle(
        env: Env,
        owner: Address,
        metadata: String,
        daily_rate: i128,
    ) -> Result<u64, ContractError> {
        admin::require_owner(&env, &owner)?;

        let vehicle = VehicleRegistry::new(env.clone()).register(metadata, daily_rate)?;

        env.events().publish(
            (Symbol::new(&env, "vehicle_registered"),),
            (vehicle.id, owner, daily_rate),
        );

        Ok(vehicle.id)
    }

    /// Administrative retirement or reinstatement (owner only).
    ///
    /// Refused with `InvalidState` while the vehicle has an open rental; the
    /// rental lifecycle alone drives availability in that window.
    pub fn set_availability(
        env: Env,
        owner: Address,
        vehicle_id: u64,
        available: bool,
    ) -> Result<(), ContractError> {
        admin::require_owner(&env, &owner)?;

        let registry = VehicleRegistry::new(env.clone());
        registry.load(vehicle_id)?;
        if RentalLedger::new(env.clone()).open_rental(vehicle_id).is_some() {
            return Err(ContractError::InvalidState);
        }

        registry.set_available(vehicle_id, available)?;

        env.events().publish(
            (Symbol::new(&env, "availability_set"),),
            (vehicle_id, available),
        );
        Ok(())
    }

    /// Change a vehicle's rate (owner only). Open rentals keep the rate they
    /// started with.
    pub fn update_daily_rate(
        env: Env,
        owner: Address,
        vehicle_id: u64,
        daily_rate: i128,
    ) -> Result<(), ContractError> {
        admin::require_owner(&env, &owner)?;

        let previous = VehicleRegistry::new(env.clone()).set_daily_rate(vehicle_id, daily_rate)?;

        env.events().publish(
            (Symbol::new(&env, "daily_rate_updated"),),
            (vehicle_id, previous, daily_rate),
        );
        Ok(())
    }

    pub fn get_vehicle(env: Env, vehicle_id: u64) -> Result<Vehicle, ContractError> {
        VehicleRegistry::new(env).load(vehicle_id)
    }

    pub fn total_vehicles(env: Env) -> u64 {
        VehicleRegistry::new(env).count()
    }

    // ---------------- RENTAL LIFECYCLE ----------------

    /// Rent an available vehicle.
    ///
    /// `attached_value` is pulled from `renter` into escrow; anything above
    /// `deposit_amount` is sent straight back. The deposit must cover at
    /// least `min_deposit_days` at the vehicle's current rate.
    pub fn rent(
        env: Env,
        vehicle_id: u64,
        renter: Address,
        deposit_amount: i128,
        attached_value: i128,
    ) -> Result<u64, ContractError> {
        renter.require_auth();

        let registry = VehicleRegistry::new(env.clone());
        let ledger = RentalLedger::new(env.clone());
        let escrow = EscrowAccounting::new(env.clone())?;

        let vehicle = registry.load(vehicle_id)?;
        if !vehicle.available || ledger.open_rental(vehicle_id).is_some() {
            return Err(ContractError::VehicleUnavailable);
        }

        let config = storage::get_config(&env);
        let min_deposit = vehicle
            .daily_rate
            .checked_mul(config.min_deposit_days as i128)
            .ok_or(ContractError::ArithmeticOverflow)?;
        if deposit_amount < min_deposit || attached_value < deposit_amount {
            return Err(ContractError::InsufficientDeposit);
        }

        let rental = ledger.start(&vehicle, &renter, deposit_amount)?;
        registry.check_out(vehicle_id)?;

        let excess = attached_value - deposit_amount;
        escrow.collect(&renter, attached_value)?;
        escrow.hold(rental.rental_id, attached_value)?;
        escrow.disburse(rental.rental_id, &renter, excess)?;

        env.events().publish(
            (Symbol::new(&env, "vehicle_rented"),),
            (vehicle_id, rental.rental_id, renter, deposit_amount, excess),
        );

        Ok(rental.rental_id)
    }

    /// Hand the vehicle back. Fixes the fee owed (whole days, rounded up,
    /// at least one, capped at the deposit) and returns it. No value moves
    /// until `settle`.
    pub fn return_vehicle(env: Env, vehicle_id: u64, renter: Address) -> Result<i128, ContractError> {
        renter.require_auth();

        VehicleRegistry::new(env.clone()).load(vehicle_id)?;
        let rental = RentalLedger::new(env.clone()).mark_returned(vehicle_id, &renter)?;

        env.events().publish(
            (Symbol::new(&env, "vehicle_returned"),),
            (vehicle_id, rental.rental_id, renter, rental.fee_owed),
        );

        Ok(rental.fee_owed)
    }

    /// Pay out a returned rental: the fee to the fleet owner, the rest of
    /// the deposit to the renter. Anyone may call it.
    ///
    /// The rental is closed and the vehicle released before any transfer is
    /// issued. A rejected transfer fails the whole call and leaves the
    /// rental pending for a retry.
    pub fn settle(env: Env, vehicle_id: u64) -> Result<(), ContractError> {
        let registry = VehicleRegistry::new(env.clone());
        let escrow = EscrowAccounting::new(env.clone())?;

        registry.load(vehicle_id)?;
        let owner = admin::get_owner(&env)?;

        let rental = RentalLedger::new(env.clone()).mark_closed(vehicle_id)?;
        registry.set_available(vehicle_id, true)?;

        let refund = rental.refund_due();
        escrow.disburse(rental.rental_id, &owner, rental.fee_owed)?;
        escrow.disburse(rental.rental_id, &rental.renter, refund)?;

        env.events().publish(
            (Symbol::new(&env, "rental_settled"),),
            (vehicle_id, rental.rental_id, rental.renter, rental.fee_owed, refund),
        );
        Ok(())
    }

    /// Fee the current renter would owe if they returned the vehicle now.
    pub fn quote_fee(env: Env, vehicle_id: u64) -> Result<i128, ContractError> {
        VehicleRegistry::new(env.clone()).load(vehicle_id)?;
        RentalLedger::new(env).quote(vehicle_id)
    }

    // ---------------- QUERIES ----------------

    pub fn get_rental(env: Env, rental_id: u64) -> Result<Rental, ContractError> {
        RentalLedger::new(env).load(rental_id)
    }

    pub fn get_active_rental(env: Env, vehicle_id: u64) -> Option<Rental> {
        RentalLedger::new(env).open_rental(vehicle_id)
    }

    pub fn get_rental_state(env: Env, vehicle_id: u64) -> RentalState {
        RentalLedger::new(env).state_of(vehicle_id)
    }

    /// Rental ids for a vehicle, oldest first. At most `MAX_QUERY_LIMIT`
    /// per page.
    pub fn get_vehicle_rentals(
        env: Env,
        vehicle_id: u64,
        start: u32,
        limit: u32,
    ) -> Result<Vec<u64>, ContractError> {
        validate_query_limit(limit)?;
        Ok(storage::get_vehicle_rentals(&env, vehicle_id, start, limit))
    }

    pub fn get_vehicle_rental_count(env: Env, vehicle_id: u64) -> u32 {
        storage::get_vehicle_rental_count(&env, vehicle_id)
    }

    pub fn get_renter_rentals(
        env: Env,
        renter: Address,
        start: u32,
        limit: u32,
    ) -> Result<Vec<u64>, ContractError> {
        validate_query_limit(limit)?;
        Ok(storage::get_renter_rentals(&env, &renter, start, limit))
    }

    pub fn get_renter_rental_count(env: Env, renter: Address) -> u32 {
        storage::get_renter_rental_count(&env, &renter)
    }

    pub fn get_rental_history(env: Env, rental_id: u64) -> Vec<RentalHistoryEntry> {
        RentalLedger::new(env).history(rental_id)
    }

    pub fn get_escrow_balance(env: Env, rental_id: u64) -> i128 {
        storage::get_escrow(&env, rental_id)
    }

    pub fn get_total_escrowed(env: Env) -> i128 {
        storage::get_total_escrowed(&env)
    }
}
