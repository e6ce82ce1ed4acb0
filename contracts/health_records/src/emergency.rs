use soroban_sdk::{contracttype, Env, String};

use crate::{events, storage, BloodGroup, ContractError, EmergencyContact, HealthProfile};

// ── Types ─────────────────────────────────────────────────────

/// The fixed subset of a record disclosed without authentication.
///
/// This type is the data-minimization contract: history, credential
/// material and the rest of the profile have no field here to leak
/// through.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RedactedProfile {
    pub blood_group: BloodGroup,
    pub allergies: String,
    pub conditions: String,
    pub emergency_contact: EmergencyContact,
}

/// Project a profile down to the redacted subset
pub fn redact(profile: &HealthProfile) -> RedactedProfile {
    RedactedProfile {
        blood_group: profile.blood_group.clone(),
        allergies: profile.allergies.clone(),
        conditions: profile.conditions.clone(),
        emergency_contact: profile.emergency_contact.clone(),
    }
}

/// Serve the unauthenticated break-glass read path.
///
/// Takes no credential and no session; the only input is the patient
/// identity, as printed on a health card or QR code. Each disclosure is
/// appended to the patient's audit trail before the data leaves.
pub fn disclose(env: &Env, patient_key: &String) -> Result<RedactedProfile, ContractError> {
    let record = storage::get_patient(env, patient_key).ok_or(ContractError::NotFound)?;

    let viewed_at = env.ledger().timestamp();
    storage::push_disclosure(env, patient_key, viewed_at);

    events::publish_emergency_viewed(env, patient_key.clone(), viewed_at);

    Ok(redact(&record.profile))
}
