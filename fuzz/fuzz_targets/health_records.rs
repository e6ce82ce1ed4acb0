#![no_main]

use libfuzzer_sys::fuzz_target;
use soroban_sdk::{Env, String};

use health_records::{HealthRecordsContract, HealthRecordsContractClient, Role};

// Registration and login must reject malformed input as error values and
// never trap, whatever the identity, credential and name look like.
fuzz_target!(|input: (&str, &str, &str)| {
    let (identity, credential, name) = input;

    let env = Env::default();
    let contract_id = env.register(HealthRecordsContract, ());
    let client = HealthRecordsContractClient::new(&env, &contract_id);

    let identity = String::from_str(&env, identity);
    let credential = String::from_str(&env, credential);
    let name = String::from_str(&env, name);

    if client.try_register(&identity, &credential, &name).is_ok() {
        // Anything that registered must be able to log straight back in.
        client.login(&identity, &credential, &Role::Patient);

        // The break-glass path must serve the fresh record.
        client.emergency_view(&identity);
    } else {
        // A rejected registration must leave no trace behind.
        assert!(client
            .try_login(&identity, &credential, &Role::Patient)
            .is_err());
    }
});
