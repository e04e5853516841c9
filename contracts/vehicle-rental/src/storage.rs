use soroban_sdk::{contracttype, Address, Env, IntoVal, Val, Vec};

use rental_lib::{
    ContractError, Rental, RentalConfig, RentalHistoryEntry, Vehicle, DEFAULT_MIN_DEPOSIT_DAYS,
};

/// TTL constants (in ledgers).
///
/// Ledgers close roughly every 5 seconds, so:
/// * `RECORD_TTL_THRESHOLD` ≈ 30 days of ledger time before auto-bump.
/// * `RECORD_TTL_EXTEND`    ≈ 60 days; closed rentals stay readable for audit.
const RECORD_TTL_THRESHOLD: u32 = 518_400;
const RECORD_TTL_EXTEND: u32 = 1_036_800;

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    PaymentToken,
    Config,
    VehicleCounter,
    RentalCounter,
    TotalEscrowed,
    Vehicle(u64),
    Rental(u64),
    /// Open (Active or ReturnedPendingSettlement) rental id for a vehicle.
    OpenRental(u64),
    /// Per-vehicle rental index: a count plus one key per position.
    VehicleRentalCount(u64),
    VehicleRental(u64, u32),
    RenterRentalCount(Address),
    RenterRental(Address, u32),
    Escrow(u64),
    RentalHistoryCount(u64),
    RentalHistory(u64, u32),
}

fn save_persistent<V: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &V) {
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, RECORD_TTL_THRESHOLD, RECORD_TTL_EXTEND);
}

/* ---------------- PAYMENT TOKEN ---------------- */

pub fn set_payment_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::PaymentToken, token);
}

pub fn get_payment_token(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::PaymentToken)
        .ok_or(ContractError::InvalidConfig)
}

/* ---------------- CONFIG ---------------- */

pub fn set_config(env: &Env, config: &RentalConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_config(env: &Env) -> RentalConfig {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .unwrap_or(RentalConfig {
            min_deposit_days: DEFAULT_MIN_DEPOSIT_DAYS,
        })
}

/* ---------------- VEHICLES ---------------- */

pub fn get_vehicle_counter(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::VehicleCounter)
        .unwrap_or(0)
}

pub fn increment_vehicle_counter(env: &Env) -> Result<u64, ContractError> {
    let next = get_vehicle_counter(env)
        .checked_add(1)
        .ok_or(ContractError::ArithmeticOverflow)?;
    env.storage().instance().set(&DataKey::VehicleCounter, &next);
    Ok(next)
}

pub fn set_vehicle(env: &Env, vehicle: &Vehicle) {
    save_persistent(env, &DataKey::Vehicle(vehicle.id), vehicle);
}

pub fn get_vehicle(env: &Env, vehicle_id: u64) -> Option<Vehicle> {
    env.storage().persistent().get(&DataKey::Vehicle(vehicle_id))
}

/* ---------------- RENTALS ---------------- */

pub fn increment_rental_counter(env: &Env) -> Result<u64, ContractError> {
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::RentalCounter)
        .unwrap_or(0);
    let next = current
        .checked_add(1)
        .ok_or(ContractError::ArithmeticOverflow)?;
    env.storage().instance().set(&DataKey::RentalCounter, &next);
    Ok(next)
}

pub fn set_rental(env: &Env, rental: &Rental) {
    save_persistent(env, &DataKey::Rental(rental.rental_id), rental);
}

pub fn get_rental(env: &Env, rental_id: u64) -> Option<Rental> {
    env.storage().persistent().get(&DataKey::Rental(rental_id))
}

pub fn set_open_rental(env: &Env, vehicle_id: u64, rental_id: u64) {
    save_persistent(env, &DataKey::OpenRental(vehicle_id), &rental_id);
}

pub fn get_open_rental(env: &Env, vehicle_id: u64) -> Option<u64> {
    env.storage().persistent().get(&DataKey::OpenRental(vehicle_id))
}

pub fn remove_open_rental(env: &Env, vehicle_id: u64) {
    env.storage()
        .persistent()
        .remove(&DataKey::OpenRental(vehicle_id));
}

pub fn get_vehicle_rental_count(env: &Env, vehicle_id: u64) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::VehicleRentalCount(vehicle_id))
        .unwrap_or(0)
}

pub fn vehicle_rentals_append(
    env: &Env,
    vehicle_id: u64,
    rental_id: u64,
) -> Result<(), ContractError> {
    let count = get_vehicle_rental_count(env, vehicle_id);
    let next = count.checked_add(1).ok_or(ContractError::ArithmeticOverflow)?;
    save_persistent(env, &DataKey::VehicleRental(vehicle_id, count), &rental_id);
    save_persistent(env, &DataKey::VehicleRentalCount(vehicle_id), &next);
    Ok(())
}

/// Up to `limit` rental ids for a vehicle, oldest first, from position `start`.
pub fn get_vehicle_rentals(env: &Env, vehicle_id: u64, start: u32, limit: u32) -> Vec<u64> {
    let end = page_end(get_vehicle_rental_count(env, vehicle_id), start, limit);
    let mut ids = Vec::new(env);
    for i in start..end {
        if let Some(id) = env
            .storage()
            .persistent()
            .get(&DataKey::VehicleRental(vehicle_id, i))
        {
            ids.push_back(id);
        }
    }
    ids
}

pub fn get_renter_rental_count(env: &Env, renter: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::RenterRentalCount(renter.clone()))
        .unwrap_or(0)
}

pub fn renter_rentals_append(
    env: &Env,
    renter: &Address,
    rental_id: u64,
) -> Result<(), ContractError> {
    let count = get_renter_rental_count(env, renter);
    let next = count.checked_add(1).ok_or(ContractError::ArithmeticOverflow)?;
    save_persistent(env, &DataKey::RenterRental(renter.clone(), count), &rental_id);
    save_persistent(env, &DataKey::RenterRentalCount(renter.clone()), &next);
    Ok(())
}

pub fn get_renter_rentals(env: &Env, renter: &Address, start: u32, limit: u32) -> Vec<u64> {
    let end = page_end(get_renter_rental_count(env, renter), start, limit);
    let mut ids = Vec::new(env);
    for i in start..end {
        if let Some(id) = env
            .storage()
            .persistent()
            .get(&DataKey::RenterRental(renter.clone(), i))
        {
            ids.push_back(id);
        }
    }
    ids
}

fn page_end(count: u32, start: u32, limit: u32) -> u32 {
    start.saturating_add(limit).min(count)
}

/* ---------------- ESCROW ---------------- */

pub fn get_escrow(env: &Env, rental_id: u64) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Escrow(rental_id))
        .unwrap_or(0)
}

/// Zero balances are removed rather than stored.
pub fn set_escrow(env: &Env, rental_id: u64, amount: i128) {
    let key = DataKey::Escrow(rental_id);
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        save_persistent(env, &key, &amount);
    }
}

pub fn get_total_escrowed(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalEscrowed)
        .unwrap_or(0)
}

pub fn set_total_escrowed(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TotalEscrowed, &amount);
}

/* ---------------- HISTORY ---------------- */

pub fn get_rental_history_count(env: &Env, rental_id: u64) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::RentalHistoryCount(rental_id))
        .unwrap_or(0)
}

pub fn add_rental_history(env: &Env, rental_id: u64, entry: &RentalHistoryEntry) {
    let count = get_rental_history_count(env, rental_id);
    save_persistent(env, &DataKey::RentalHistory(rental_id, count), entry);
    save_persistent(env, &DataKey::RentalHistoryCount(rental_id), &(count + 1));
}

pub fn get_rental_history(env: &Env, rental_id: u64, index: u32) -> Option<RentalHistoryEntry> {
    env.storage()
        .persistent()
        .get(&DataKey::RentalHistory(rental_id, index))
}
