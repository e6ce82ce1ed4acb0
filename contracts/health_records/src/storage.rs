use soroban_sdk::{symbol_short, Env, String, Symbol, Vec};

use crate::{FamilyGrant, PatientRecord};

// ── Storage keys ──────────────────────────────────────────────

const PATIENT: Symbol = symbol_short!("PATIENT");
const GRANT: Symbol = symbol_short!("GRANT");
const GRNT_IDX: Symbol = symbol_short!("GRNT_IDX");
const EMRG_LOG: Symbol = symbol_short!("EMRG_LOG");
const PATIENTS: Symbol = symbol_short!("PATIENTS");
const HIST_CTR: Symbol = symbol_short!("HIST_CTR");
const SALT_CTR: Symbol = symbol_short!("SALT_CTR");

const TTL_THRESHOLD: u32 = 5_184_000; // ~60 days
const TTL_EXTEND_TO: u32 = 10_368_000; // ~120 days

/// Most recent emergency disclosures kept per patient
const MAX_DISCLOSURES: u32 = 100;

fn extend_ttl(env: &Env, key: &(Symbol, String)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Patient records ───────────────────────────────────────────

pub fn has_patient(env: &Env, identity: &String) -> bool {
    env.storage()
        .persistent()
        .has(&(PATIENT, identity.clone()))
}

pub fn get_patient(env: &Env, identity: &String) -> Option<PatientRecord> {
    let key = (PATIENT, identity.clone());
    let record: Option<PatientRecord> = env.storage().persistent().get(&key);
    if record.is_some() {
        extend_ttl(env, &key);
    }
    record
}

pub fn set_patient(env: &Env, identity: &String, record: &PatientRecord) {
    let key = (PATIENT, identity.clone());
    env.storage().persistent().set(&key, record);
    extend_ttl(env, &key);
}

pub fn remove_patient(env: &Env, identity: &String) {
    env.storage()
        .persistent()
        .remove(&(PATIENT, identity.clone()));
}

// ── Patient registry ──────────────────────────────────────────

/// All registered identities, in registration order. Ledger storage has
/// no key iteration, so the registry is what makes export possible.
pub fn patient_registry(env: &Env) -> Vec<String> {
    env.storage()
        .instance()
        .get(&PATIENTS)
        .unwrap_or(Vec::new(env))
}

pub fn register_identity(env: &Env, identity: &String) {
    let mut registry = patient_registry(env);
    registry.push_back(identity.clone());
    env.storage().instance().set(&PATIENTS, &registry);
}

pub fn unregister_identity(env: &Env, identity: &String) {
    let mut rebuilt = Vec::new(env);
    for existing in patient_registry(env).iter() {
        if existing != *identity {
            rebuilt.push_back(existing);
        }
    }
    env.storage().instance().set(&PATIENTS, &rebuilt);
}

// ── Family grants ─────────────────────────────────────────────

pub fn has_grant(env: &Env, grantee: &String) -> bool {
    env.storage().persistent().has(&(GRANT, grantee.clone()))
}

pub fn get_grant(env: &Env, grantee: &String) -> Option<FamilyGrant> {
    let key = (GRANT, grantee.clone());
    let grant: Option<FamilyGrant> = env.storage().persistent().get(&key);
    if grant.is_some() {
        extend_ttl(env, &key);
    }
    grant
}

pub fn set_grant(env: &Env, grantee: &String, grant: &FamilyGrant) {
    let key = (GRANT, grantee.clone());
    env.storage().persistent().set(&key, grant);
    extend_ttl(env, &key);
}

pub fn remove_grant(env: &Env, grantee: &String) {
    env.storage().persistent().remove(&(GRANT, grantee.clone()));
}

/// Grantees holding access to a patient's record. Maintained alongside
/// the grants themselves; consumed by cascade deletion and export.
pub fn grantees_of(env: &Env, patient: &String) -> Vec<String> {
    env.storage()
        .persistent()
        .get(&(GRNT_IDX, patient.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn set_grantees(env: &Env, patient: &String, grantees: &Vec<String>) {
    let key = (GRNT_IDX, patient.clone());
    if grantees.is_empty() {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, grantees);
        extend_ttl(env, &key);
    }
}

pub fn clear_grantees(env: &Env, patient: &String) {
    env.storage()
        .persistent()
        .remove(&(GRNT_IDX, patient.clone()));
}

// ── Emergency disclosure trail ────────────────────────────────

pub fn disclosure_log(env: &Env, patient: &String) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&(EMRG_LOG, patient.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn push_disclosure(env: &Env, patient: &String, viewed_at: u64) {
    let key = (EMRG_LOG, patient.clone());
    let mut log = disclosure_log(env, patient);
    log.push_back(viewed_at);

    // Keep only the most recent entries.
    if log.len() > MAX_DISCLOSURES {
        let mut trimmed = Vec::new(env);
        for i in (log.len() - MAX_DISCLOSURES)..log.len() {
            if let Some(entry) = log.get(i) {
                trimmed.push_back(entry);
            }
        }
        log = trimmed;
    }

    env.storage().persistent().set(&key, &log);
    extend_ttl(env, &key);
}

pub fn clear_disclosures(env: &Env, patient: &String) {
    env.storage()
        .persistent()
        .remove(&(EMRG_LOG, patient.clone()));
}

// ── Counters ──────────────────────────────────────────────────

/// Allocate the next history entry id (1-based, monotonically increasing)
pub fn next_history_id(env: &Env) -> u64 {
    let current: u64 = env.storage().instance().get(&HIST_CTR).unwrap_or(0u64);
    let next = current.saturating_add(1);
    env.storage().instance().set(&HIST_CTR, &next);
    next
}

/// Allocate the next salt nonce
pub fn next_salt_nonce(env: &Env) -> u64 {
    let current: u64 = env.storage().instance().get(&SALT_CTR).unwrap_or(0u64);
    let next = current.saturating_add(1);
    env.storage().instance().set(&SALT_CTR, &next);
    next
}
