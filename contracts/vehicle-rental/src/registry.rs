use soroban_sdk::{Env, String};

use rental_lib::{
    validation::{validate_daily_rate, validate_metadata},
    ContractError, Vehicle,
};

use crate::storage;

/// Catalogue of rentable vehicles.
///
/// Authorization is the caller's job; the registry only enforces input
/// rules and the id sequence.
pub struct VehicleRegistry {
    env: Env,
}

impl VehicleRegistry {
    pub fn new(env: Env) -> Self {
        Self { env }
    }

    /// Store a new available vehicle under the next sequential id.
    pub fn register(&self, metadata: String, daily_rate: i128) -> Result<Vehicle, ContractError> {
        validate_daily_rate(daily_rate)?;
        validate_metadata(&metadata)?;

        let id = storage::increment_vehicle_counter(&self.env)?;
        let vehicle = Vehicle {
            id,
            metadata,
            daily_rate,
            available: true,
            registered_at: self.env.ledger().timestamp(),
            rental_count: 0,
        };
        storage::set_vehicle(&self.env, &vehicle);

        Ok(vehicle)
    }

    pub fn load(&self, vehicle_id: u64) -> Result<Vehicle, ContractError> {
        storage::get_vehicle(&self.env, vehicle_id).ok_or(ContractError::UnknownVehicle)
    }

    pub fn set_available(&self, vehicle_id: u64, available: bool) -> Result<Vehicle, ContractError> {
        let mut vehicle = self.load(vehicle_id)?;
        vehicle.available = available;
        storage::set_vehicle(&self.env, &vehicle);
        Ok(vehicle)
    }

    /// Take the vehicle out of the pool for a new rental.
    pub fn check_out(&self, vehicle_id: u64) -> Result<Vehicle, ContractError> {
        let mut vehicle = self.load(vehicle_id)?;
        vehicle.available = false;
        vehicle.rental_count = vehicle
            .rental_count
            .checked_add(1)
            .ok_or(ContractError::ArithmeticOverflow)?;
        storage::set_vehicle(&self.env, &vehicle);
        Ok(vehicle)
    }

    /// Returns the previous rate.
    pub fn set_daily_rate(&self, vehicle_id: u64, daily_rate: i128) -> Result<i128, ContractError> {
        validate_daily_rate(daily_rate)?;
        let mut vehicle = self.load(vehicle_id)?;
        let previous = vehicle.daily_rate;
        vehicle.daily_rate = daily_rate;
        storage::set_vehicle(&self.env, &vehicle);
        Ok(previous)
    }

    pub fn count(&self) -> u64 {
        storage::get_vehicle_counter(&self.env)
    }
}
