//! Escrow behaviour against a token that can be told to reject transfers.

#![cfg(test)]

use soroban_sdk::{
    contract, contractimpl, contracttype, testutils::{Address as _, Ledger}, Address, Env,
    String,
};
use rental_lib::{ContractError, RentalState, SECONDS_PER_DAY};

use crate::{escrow::EscrowAccounting, storage, VehicleRental, VehicleRentalClient};

#[derive(Clone)]
#[contracttype]
enum MockKey {
    Balance(Address),
    Blocked(Address),
}

/// Minimal token: balances plus a per-recipient switch that makes
/// incoming transfers fail.
#[contract]
pub struct RejectingToken;

#[contractimpl]
impl RejectingToken {
    pub fn mint(env: Env, to: Address, amount: i128) {
        let balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .instance()
            .set(&MockKey::Balance(to), &(balance + amount));
    }

    pub fn set_blocked(env: Env, who: Address, blocked: bool) {
        env.storage().instance().set(&MockKey::Blocked(who), &blocked);
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        env.storage()
            .instance()
            .get(&MockKey::Balance(id))
            .unwrap_or(0)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        let blocked: bool = env
            .storage()
            .instance()
            .get(&MockKey::Blocked(to.clone()))
            .unwrap_or(false);
        if blocked {
            panic!("recipient rejects transfers");
        }

        let from_balance = Self::balance(env.clone(), from.clone());
        if from_balance < amount {
            panic!("insufficient balance");
        }
        env.storage()
            .instance()
            .set(&MockKey::Balance(from), &(from_balance - amount));
        let to_balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .instance()
            .set(&MockKey::Balance(to), &(to_balance + amount));
    }
}

fn setup(env: &Env) -> (VehicleRentalClient<'_>, RejectingTokenClient<'_>, Address) {
    env.mock_all_auths();

    let owner = Address::generate(env);
    let token_id = env.register(RejectingToken, ());
    let contract_id = env.register(VehicleRental, (owner.clone(), token_id));

    let client = VehicleRentalClient::new(env, &contract_id);
    let token = RejectingTokenClient::new(env, &client.get_payment_token());
    (client, token, owner)
}

#[test]
fn test_rejected_refund_leaves_rental_pending() {
    let env = Env::default();
    let (client, token, owner) = setup(&env);

    let vehicle_id =
        client.register_vehicle(&owner, &String::from_str(&env, "Ford Transit"), &10);
    let renter = Address::generate(&env);
    token.mint(&renter, &100);

    let rental_id = client.rent(&vehicle_id, &renter, &50, &50);
    env.ledger().set_timestamp(env.ledger().timestamp() + SECONDS_PER_DAY);
    assert_eq!(client.return_vehicle(&vehicle_id, &renter), 10);

    // The fee transfer to the owner succeeds, the refund to the renter is
    // rejected: nothing from the call may stick.
    token.set_blocked(&renter, &true);
    assert_eq!(
        client.try_settle(&vehicle_id),
        Err(Ok(ContractError::TransferFailed))
    );
    assert_eq!(
        client.get_rental_state(&vehicle_id),
        RentalState::ReturnedPendingSettlement
    );
    assert!(!client.get_vehicle(&vehicle_id).available);
    assert_eq!(client.get_escrow_balance(&rental_id), 50);
    assert_eq!(client.get_total_escrowed(), 50);
    assert_eq!(token.balance(&owner), 0);
    assert_eq!(token.balance(&client.address), 50);

    // Retry once the renter can receive again.
    token.set_blocked(&renter, &false);
    client.settle(&vehicle_id);
    assert_eq!(client.get_rental(&rental_id).state, RentalState::Closed);
    assert_eq!(token.balance(&owner), 10);
    assert_eq!(token.balance(&renter), 90);
    assert_eq!(token.balance(&client.address), 0);
    assert_eq!(client.get_total_escrowed(), 0);
}

#[test]
fn test_rejected_excess_refund_aborts_rent() {
    let env = Env::default();
    let (client, token, owner) = setup(&env);

    let vehicle_id =
        client.register_vehicle(&owner, &String::from_str(&env, "Ford Transit"), &10);
    let renter = Address::generate(&env);
    token.mint(&renter, &100);
    token.set_blocked(&renter, &true);

    assert_eq!(
        client.try_rent(&vehicle_id, &renter, &10, &30),
        Err(Ok(ContractError::TransferFailed))
    );
    assert!(client.get_vehicle(&vehicle_id).available);
    assert_eq!(client.get_rental_state(&vehicle_id), RentalState::None);
    assert_eq!(token.balance(&renter), 100);
    assert_eq!(client.get_total_escrowed(), 0);

    // Exact deposits need no refund and go through.
    client.rent(&vehicle_id, &renter, &10, &10);
    assert_eq!(token.balance(&client.address), 10);
}

#[test]
fn test_disburse_more_than_held_fails() {
    let env = Env::default();
    let (client, _token, _owner) = setup(&env);
    let recipient = Address::generate(&env);

    env.as_contract(&client.address, || {
        let escrow = EscrowAccounting::new(env.clone()).unwrap();
        escrow.hold(7, 25).unwrap();

        assert_eq!(
            escrow.disburse(7, &recipient, 26),
            Err(ContractError::InsufficientEscrow)
        );
        assert_eq!(storage::get_escrow(&env, 7), 25);
        assert_eq!(storage::get_total_escrowed(&env), 25);

        // Zero moves nothing and needs no tokens.
        assert_eq!(escrow.disburse(7, &recipient, 0), Ok(()));
        assert_eq!(escrow.disburse(7, &recipient, -1), Err(ContractError::InvalidInput));
    });
}

#[test]
fn test_hold_accumulates_per_rental_and_total() {
    let env = Env::default();
    let (client, _token, _owner) = setup(&env);

    env.as_contract(&client.address, || {
        let escrow = EscrowAccounting::new(env.clone()).unwrap();
        escrow.hold(1, 10).unwrap();
        escrow.hold(2, 15).unwrap();
        escrow.hold(1, 5).unwrap();

        assert_eq!(storage::get_escrow(&env, 1), 15);
        assert_eq!(storage::get_escrow(&env, 2), 15);
        assert_eq!(storage::get_total_escrowed(&env), 30);
        assert_eq!(escrow.hold(1, -3), Err(ContractError::InvalidInput));
    });
}
