use soroban_sdk::String;

use crate::{errors::ContractError, MAX_QUERY_LIMIT, MAX_RENTAL_DAYS, MAX_STRING_LENGTH, PRICE_UPPER_BOUND};

pub fn validate_metadata(metadata: &String) -> Result<(), ContractError> {
    if metadata.len() == 0 || metadata.len() > MAX_STRING_LENGTH {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

pub fn validate_daily_rate(daily_rate: i128) -> Result<(), ContractError> {
    if daily_rate <= 0 || daily_rate > PRICE_UPPER_BOUND {
        return Err(ContractError::InvalidRate);
    }
    Ok(())
}

pub fn validate_min_deposit_days(days: u32) -> Result<(), ContractError> {
    if days == 0 || days > MAX_RENTAL_DAYS {
        return Err(ContractError::InvalidConfig);
    }
    Ok(())
}

pub fn validate_query_limit(limit: u32) -> Result<(), ContractError> {
    if limit > MAX_QUERY_LIMIT {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}
