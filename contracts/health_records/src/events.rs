use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

use crate::HistoryKind;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientRegisteredEvent {
    pub identity: String,
    pub registered_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProfileUpdatedEvent {
    pub patient: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CredentialChangedEvent {
    pub patient: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HistoryEntryEvent {
    pub patient: String,
    pub kind: HistoryKind,
    pub entry_id: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FamilyAccessEvent {
    pub patient: String,
    pub grantee: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountDeletedEvent {
    pub patient: String,
    pub grants_removed: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyViewedEvent {
    pub patient: String,
    pub viewed_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SnapshotImportedEvent {
    pub patients: u32,
    pub grants: u32,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    let payload = InitializedEvent { admin };
    env.events().publish((symbol_short!("INIT"),), payload);
}

pub fn publish_patient_registered(env: &Env, identity: String, registered_at: u64) {
    let payload = PatientRegisteredEvent {
        identity: identity.clone(),
        registered_at,
    };
    env.events()
        .publish((symbol_short!("PAT_REG"), identity), payload);
}

pub fn publish_profile_updated(env: &Env, patient: String) {
    let payload = ProfileUpdatedEvent {
        patient: patient.clone(),
    };
    env.events()
        .publish((symbol_short!("PROF_UPD"), patient), payload);
}

pub fn publish_credential_changed(env: &Env, patient: String) {
    let payload = CredentialChangedEvent {
        patient: patient.clone(),
    };
    env.events()
        .publish((symbol_short!("CRED_CHG"), patient), payload);
}

pub fn publish_history_added(env: &Env, patient: String, kind: HistoryKind, entry_id: u64) {
    let payload = HistoryEntryEvent {
        patient: patient.clone(),
        kind,
        entry_id,
    };
    env.events()
        .publish((symbol_short!("HIST_ADD"), patient), payload);
}

pub fn publish_history_updated(env: &Env, patient: String, kind: HistoryKind, entry_id: u64) {
    let payload = HistoryEntryEvent {
        patient: patient.clone(),
        kind,
        entry_id,
    };
    env.events()
        .publish((symbol_short!("HIST_UPD"), patient), payload);
}

pub fn publish_history_removed(env: &Env, patient: String, kind: HistoryKind, entry_id: u64) {
    let payload = HistoryEntryEvent {
        patient: patient.clone(),
        kind,
        entry_id,
    };
    env.events()
        .publish((symbol_short!("HIST_DEL"), patient), payload);
}

pub fn publish_family_access_granted(env: &Env, patient: String, grantee: String) {
    let payload = FamilyAccessEvent {
        patient: patient.clone(),
        grantee: grantee.clone(),
    };
    env.events()
        .publish((symbol_short!("FAM_GRT"), patient, grantee), payload);
}

pub fn publish_family_access_revoked(env: &Env, patient: String, grantee: String) {
    let payload = FamilyAccessEvent {
        patient: patient.clone(),
        grantee: grantee.clone(),
    };
    env.events()
        .publish((symbol_short!("FAM_REV"), patient, grantee), payload);
}

pub fn publish_account_deleted(env: &Env, patient: String, grants_removed: u32) {
    let payload = AccountDeletedEvent {
        patient: patient.clone(),
        grants_removed,
    };
    env.events()
        .publish((symbol_short!("ACCT_DEL"), patient), payload);
}

pub fn publish_emergency_viewed(env: &Env, patient: String, viewed_at: u64) {
    let payload = EmergencyViewedEvent {
        patient: patient.clone(),
        viewed_at,
    };
    env.events()
        .publish((symbol_short!("EMRG_VIEW"), patient), payload);
}

pub fn publish_snapshot_imported(env: &Env, patients: u32, grants: u32) {
    let payload = SnapshotImportedEvent { patients, grants };
    env.events().publish((symbol_short!("SNAP_IMP"),), payload);
}
