use soroban_sdk::{Address, Env, Symbol};

use crate::{errors::ContractError, OWNER_KEY};

/// Record the fleet owner. Only called from the contract constructor.
pub fn set_owner(env: &Env, owner: &Address) {
    env.storage()
        .instance()
        .set(&Symbol::new(env, OWNER_KEY), owner);
}

pub fn get_owner(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&Symbol::new(env, OWNER_KEY))
        .ok_or(ContractError::Unauthorized)
}

pub fn is_owner(env: &Env, caller: &Address) -> bool {
    match get_owner(env) {
        Ok(owner) => &owner == caller,
        Err(_) => false,
    }
}

/// Fails with `Unauthorized` unless `caller` signed and is the fleet owner.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
    caller.require_auth();
    if !is_owner(env, caller) {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}
