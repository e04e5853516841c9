use soroban_sdk::{token, Address, Env};

use rental_lib::ContractError;

use crate::storage;

/// Per-rental escrow of the payment token.
///
/// Every token the contract holds for rentals is accounted to exactly one
/// rental id, and `storage::get_total_escrowed` is the sum of all of them.
/// A rejected transfer surfaces as `TransferFailed`; the contract function
/// returning it is rolled back by the host together with the balance
/// change made here.
pub struct EscrowAccounting {
    env: Env,
    token: Address,
}

impl EscrowAccounting {
    pub fn new(env: Env) -> Result<Self, ContractError> {
        let token = storage::get_payment_token(&env)?;
        Ok(Self { env, token })
    }

    /// Pull `amount` from `from` into the contract.
    pub fn collect(&self, from: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::InsufficientDeposit);
        }
        self.transfer(from, &self.env.current_contract_address(), amount)
    }

    /// Credit `amount` of already-received value to `rental_id`.
    pub fn hold(&self, rental_id: u64, amount: i128) -> Result<(), ContractError> {
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }
        let balance = storage::get_escrow(&self.env, rental_id)
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let total = storage::get_total_escrowed(&self.env)
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        storage::set_escrow(&self.env, rental_id, balance);
        storage::set_total_escrowed(&self.env, total);
        Ok(())
    }

    /// Pay `amount` out of `rental_id`'s balance to `recipient`.
    pub fn disburse(
        &self,
        rental_id: u64,
        recipient: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }
        let balance = storage::get_escrow(&self.env, rental_id);
        if amount > balance {
            return Err(ContractError::InsufficientEscrow);
        }
        if amount == 0 {
            return Ok(());
        }

        storage::set_escrow(&self.env, rental_id, balance - amount);
        storage::set_total_escrowed(&self.env, storage::get_total_escrowed(&self.env) - amount);

        self.transfer(&self.env.current_contract_address(), recipient, amount)
    }

    fn transfer(&self, from: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
        let client = token::Client::new(&self.env, &self.token);
        match client.try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }
}
