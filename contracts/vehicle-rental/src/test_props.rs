#![cfg(test)]

use proptest::prelude::*;
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env, String,
};
use rental_lib::{ContractError, RentalState, SECONDS_PER_DAY};

use crate::{VehicleRental, VehicleRentalClient};

const VEHICLES: u64 = 2;
const STARTING_BALANCE: i128 = 10_000;

#[derive(Clone, Debug)]
enum Op {
    Rent {
        vehicle: u64,
        renter: usize,
        deposit: i128,
        extra: i128,
    },
    Return {
        vehicle: u64,
        renter: usize,
    },
    Settle {
        vehicle: u64,
    },
    Wait {
        seconds: u64,
    },
}

fn any_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1..=VEHICLES, 0..2usize, 0..80i128, 0..20i128).prop_map(
            |(vehicle, renter, deposit, extra)| Op::Rent {
                vehicle,
                renter,
                deposit,
                extra,
            }
        ),
        (1..=VEHICLES, 0..2usize).prop_map(|(vehicle, renter)| Op::Return { vehicle, renter }),
        (1..=VEHICLES).prop_map(|vehicle| Op::Settle { vehicle }),
        (0..3 * SECONDS_PER_DAY).prop_map(|seconds| Op::Wait { seconds }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_value_is_conserved_and_availability_tracks_lifecycle(
        ops in prop::collection::vec(any_op(), 1..24)
    ) {
        let env = Env::default();
        env.mock_all_auths();

        let owner = Address::generate(&env);
        let asset = env.register_stellar_asset_contract_v2(Address::generate(&env));
        let contract_id = env.register(VehicleRental, (owner.clone(), asset.address()));
        let client = VehicleRentalClient::new(&env, &contract_id);
        let token = token::Client::new(&env, &asset.address());
        let token_admin = token::StellarAssetClient::new(&env, &asset.address());

        client.register_vehicle(&owner, &String::from_str(&env, "Compact"), &10);
        client.register_vehicle(&owner, &String::from_str(&env, "Van"), &25);

        let renters = [Address::generate(&env), Address::generate(&env)];
        for renter in renters.iter() {
            token_admin.mint(renter, &STARTING_BALANCE);
        }
        let supply = STARTING_BALANCE * 2;

        for op in ops {
            match op {
                Op::Rent { vehicle, renter, deposit, extra } => {
                    let renter = &renters[renter];
                    let before = token.balance(renter);
                    if let Ok(Ok(rental_id)) =
                        client.try_rent(&vehicle, renter, &deposit, &(deposit + extra))
                    {
                        // Excess is back with the renter inside the same call.
                        prop_assert_eq!(token.balance(renter), before - deposit);
                        prop_assert_eq!(client.get_escrow_balance(&rental_id), deposit);
                    } else {
                        prop_assert_eq!(token.balance(renter), before);
                    }
                }
                Op::Return { vehicle, renter } => {
                    if let Ok(Ok(fee)) = client.try_return_vehicle(&vehicle, &renters[renter]) {
                        let rental = client.get_active_rental(&vehicle).unwrap();
                        prop_assert!(fee > 0);
                        prop_assert!(fee <= rental.deposit);
                    }
                }
                Op::Settle { vehicle } => {
                    if let Ok(Ok(())) = client.try_settle(&vehicle) {
                        let owner_balance = token.balance(&owner);
                        prop_assert_eq!(
                            client.try_settle(&vehicle),
                            Err(Ok(ContractError::InvalidState))
                        );
                        prop_assert_eq!(token.balance(&owner), owner_balance);
                    }
                }
                Op::Wait { seconds } => {
                    env.ledger().set_timestamp(env.ledger().timestamp() + seconds);
                }
            }

            let held = token.balance(&contract_id);
            prop_assert_eq!(client.get_total_escrowed(), held);
            prop_assert_eq!(
                token.balance(&owner) + token.balance(&renters[0]) + token.balance(&renters[1]) + held,
                supply
            );

            let mut open_escrow = 0i128;
            for vehicle_id in 1..=VEHICLES {
                let state = client.get_rental_state(&vehicle_id);
                let available = client.get_vehicle(&vehicle_id).available;
                prop_assert_eq!(available, !state.is_open());
                prop_assert!(state != RentalState::Closed);

                if let Some(rental) = client.get_active_rental(&vehicle_id) {
                    prop_assert!(rental.fee_owed <= rental.deposit);
                    prop_assert_eq!(client.get_escrow_balance(&rental.rental_id), rental.deposit);
                    open_escrow += rental.deposit;
                }
            }
            prop_assert_eq!(open_escrow, held);
        }
    }
}
