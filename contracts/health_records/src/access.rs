use soroban_sdk::{Env, String};

use crate::{storage, AccessLevel, ContractError, PatientRecord, Role, Session};

/// Compute the record a session can see and the permission set it holds.
/// Pure read of the current store state; no side effects.
///
/// A `Patient` session resolves to its own record with read-write
/// permission. A `Family` session resolves through its grant to the
/// referenced patient's record, read-only. The `Emergency` role never
/// reaches this resolver; its path is the unauthenticated
/// `emergency_view`.
pub fn resolve(
    env: &Env,
    session: &Session,
) -> Result<(String, PatientRecord, AccessLevel), ContractError> {
    match session.role {
        Role::Patient => {
            // Defensive: the record can vanish between login and use
            // (self-service deletion from another session).
            let record = storage::get_patient(env, &session.identity)
                .ok_or(ContractError::NotFound)?;
            Ok((session.identity.clone(), record, AccessLevel::ReadWrite))
        }
        Role::Family => {
            let grant =
                storage::get_grant(env, &session.identity).ok_or(ContractError::Unauthorized)?;
            let record =
                storage::get_patient(env, &grant.patient_key).ok_or(ContractError::NotFound)?;
            Ok((grant.patient_key, record, AccessLevel::Read))
        }
        Role::Emergency => Err(ContractError::Unauthorized),
    }
}

/// Resolve and additionally require write permission. Rejects every
/// family-role session with `Forbidden`.
pub fn resolve_writable(
    env: &Env,
    session: &Session,
) -> Result<(String, PatientRecord), ContractError> {
    let (patient_key, record, level) = resolve(env, session)?;
    if !level.allows_write() {
        return Err(ContractError::Forbidden);
    }
    Ok((patient_key, record))
}
