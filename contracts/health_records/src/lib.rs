#![no_std]

#[cfg(test)]
extern crate std;

pub mod emergency;
pub mod events;
mod access;
mod session;
mod storage;
mod validation;


use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Bytes, BytesN,
    Env, Map, String, Symbol, Vec,
};

use emergency::RedactedProfile;

/// Storage keys for the contract lifecycle
const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");

/// Roles a caller can authenticate as
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Role {
    Patient,
    Family,
    Emergency,
}

/// Permission set computed for a session by the access resolver
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AccessLevel {
    Read,
    ReadWrite,
}

impl AccessLevel {
    pub fn allows_write(&self) -> bool {
        matches!(self, AccessLevel::ReadWrite)
    }
}

/// Access levels a family grant can carry; read-only is the only one today
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FamilyAccessLevel {
    Family,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BloodGroup {
    APositive,
    ANegative,
    BPositive,
    BNegative,
    AbPositive,
    AbNegative,
    OPositive,
    ONegative,
    Unknown,
}

/// Who to reach when the patient cannot speak for themselves
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relation: String,
}

/// The health-card portion of a patient record.
///
/// `date_of_birth` is either empty or `YYYY-MM-DD`; `allergies` and
/// `conditions` are free text exactly as the patient entered them.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HealthProfile {
    pub name: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub allergies: String,
    pub conditions: String,
    pub emergency_contact: EmergencyContact,
}

/// A doctor visit entry
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Visit {
    pub id: u64,
    pub date: String,
    pub doctor: String,
    pub specialty: String,
    pub notes: String,
}

/// A medication entry; `end_date` of `None` means the course is ongoing
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Medication {
    pub id: u64,
    pub name: String,
    pub dosage: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub purpose: String,
}

/// A test result entry with its attached-file reference
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestResult {
    pub id: u64,
    pub name: String,
    pub date: String,
    pub file_name: String,
    pub notes: String,
}

/// The three ordered history collections; ids are unique within each
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MedicalHistory {
    pub visits: Vec<Visit>,
    pub medications: Vec<Medication>,
    pub tests: Vec<TestResult>,
}

/// A full patient record, keyed by the patient's email-shaped identity.
///
/// The credential is stored as sha256(salt || credential); the plaintext
/// never reaches storage.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientRecord {
    pub credential_salt: BytesN<32>,
    pub credential_hash: BytesN<32>,
    pub profile: HealthProfile,
    pub history: MedicalHistory,
    pub registered_at: u64,
}

/// Read-only delegation of a patient's record to a family member,
/// keyed by the grantee's email-shaped identity
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FamilyGrant {
    pub patient_key: String,
    pub level: FamilyAccessLevel,
    pub granted_at: u64,
}

/// An authenticated session minted by `login` or `register`.
///
/// Sessions live in temporary storage keyed by token; every authenticated
/// entry point checks the presented value against the stored one.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Session {
    pub token: u64,
    pub identity: String,
    pub role: Role,
}

/// The record projection handed to authenticated sessions; carries no
/// credential material
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientView {
    pub patient_key: String,
    pub profile: HealthProfile,
    pub history: MedicalHistory,
    pub access: AccessLevel,
}

/// History collection discriminator, used in events
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HistoryKind {
    Visit,
    Medication,
    Test,
}

/// The logical persisted layout: patients and family grants, each keyed
/// by identity. `import_snapshot(export_snapshot())` is the identity.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoreSnapshot {
    pub patients: Map<String, PatientRecord>,
    pub family_grants: Map<String, FamilyGrant>,
}

/// Contract errors
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidInput = 3,
    Unauthorized = 4,
    Forbidden = 5,
    NotFound = 6,
    Conflict = 7,
}

#[contract]
pub struct HealthRecordsContract;

#[allow(clippy::too_many_arguments)]
#[contractimpl]
impl HealthRecordsContract {
    /// Initialize the contract with an admin address.
    ///
    /// The admin's only privilege is the snapshot import/export used to
    /// seed and inspect the store; patient-facing operations never
    /// involve it.
    pub fn initialize(env: Env, admin: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);

        events::publish_initialized(&env, admin);

        Ok(())
    }

    /// Get the admin address
    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    /// Check if the contract is initialized
    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Authentication ───────────────────────────────────────────

    /// Register a new patient and log them straight in.
    ///
    /// The profile starts empty apart from the name; the patient fills
    /// in the health card afterwards via `update_profile`.
    pub fn register(
        env: Env,
        identity: String,
        credential: String,
        name: String,
    ) -> Result<Session, ContractError> {
        validation::validate_email(&identity)?;
        validation::validate_credential(&credential)?;
        validation::validate_name(&name)?;

        if storage::has_patient(&env, &identity) {
            return Err(ContractError::Conflict);
        }

        let salt = mint_salt(&env, &identity);
        let hash = hash_credential(&env, &salt, &credential);
        let registered_at = env.ledger().timestamp();

        let empty = String::from_str(&env, "");
        let record = PatientRecord {
            credential_salt: salt,
            credential_hash: hash,
            profile: HealthProfile {
                name,
                date_of_birth: empty.clone(),
                gender: Gender::Unknown,
                blood_group: BloodGroup::Unknown,
                allergies: empty.clone(),
                conditions: empty.clone(),
                emergency_contact: EmergencyContact {
                    name: empty.clone(),
                    phone: empty.clone(),
                    relation: empty,
                },
            },
            history: MedicalHistory {
                visits: Vec::new(&env),
                medications: Vec::new(&env),
                tests: Vec::new(&env),
            },
            registered_at,
        };

        storage::set_patient(&env, &identity, &record);
        storage::register_identity(&env, &identity);

        events::publish_patient_registered(&env, identity.clone(), registered_at);

        Ok(session::create(&env, identity, Role::Patient))
    }

    /// Authenticate an identity for a role and mint a session.
    ///
    /// Family members authenticate with the credential of the patient
    /// whose record was shared with them. The `Emergency` role never
    /// gets a session; callers use `emergency_view` directly.
    pub fn login(
        env: Env,
        identity: String,
        credential: String,
        role: Role,
    ) -> Result<Session, ContractError> {
        // Oversized inputs cannot match anything stored; reject them with
        // the same error as a bad credential so nothing is leaked.
        if identity.len() > validation::MAX_EMAIL_LEN
            || credential.len() > validation::MAX_CREDENTIAL_LEN
        {
            return Err(ContractError::Unauthorized);
        }

        match role {
            Role::Patient => {
                let record = storage::get_patient(&env, &identity)
                    .ok_or(ContractError::Unauthorized)?;
                if !verify_credential(&env, &record, &credential) {
                    return Err(ContractError::Unauthorized);
                }
                Ok(session::create(&env, identity, Role::Patient))
            }
            Role::Family => {
                let grant =
                    storage::get_grant(&env, &identity).ok_or(ContractError::Unauthorized)?;
                // A grant whose patient vanished is a dangling reference.
                let record = storage::get_patient(&env, &grant.patient_key)
                    .ok_or(ContractError::NotFound)?;
                if !verify_credential(&env, &record, &credential) {
                    return Err(ContractError::Unauthorized);
                }
                Ok(session::create(&env, identity, Role::Family))
            }
            Role::Emergency => Err(ContractError::InvalidInput),
        }
    }

    /// Invalidate a session. Unknown or already-expired tokens are a no-op.
    pub fn logout(env: Env, session: Session) {
        session::destroy(&env, session.token);
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Resolve the record visible to a session together with the
    /// permission level the session holds over it.
    pub fn view_record(env: Env, session: Session) -> Result<PatientView, ContractError> {
        session::require(&env, &session)?;
        let (patient_key, record, level) = access::resolve(&env, &session)?;
        Ok(PatientView {
            patient_key,
            profile: record.profile,
            history: record.history,
            access: level,
        })
    }

    /// List the grantees with family access to the caller's record
    pub fn list_family_access(env: Env, session: Session) -> Result<Vec<String>, ContractError> {
        session::require(&env, &session)?;
        let (patient_key, _) = access::resolve_writable(&env, &session)?;
        Ok(storage::grantees_of(&env, &patient_key))
    }

    /// Ledger timestamps of emergency disclosures of the caller's record
    pub fn get_emergency_disclosures(
        env: Env,
        session: Session,
    ) -> Result<Vec<u64>, ContractError> {
        session::require(&env, &session)?;
        let (patient_key, _) = access::resolve_writable(&env, &session)?;
        Ok(storage::disclosure_log(&env, &patient_key))
    }

    // ── Profile and credential ───────────────────────────────────

    /// Replace the health-card profile wholesale; there is no
    /// partial-field merge, callers resupply every field they keep.
    pub fn update_profile(
        env: Env,
        session: Session,
        profile: HealthProfile,
    ) -> Result<(), ContractError> {
        session::require(&env, &session)?;
        let (patient_key, mut record) = access::resolve_writable(&env, &session)?;

        validation::validate_name(&profile.name)?;
        validation::validate_optional_date(&profile.date_of_birth)?;

        record.profile = profile;
        storage::set_patient(&env, &patient_key, &record);

        events::publish_profile_updated(&env, patient_key);

        Ok(())
    }

    /// Change the login credential after re-verifying the current one
    pub fn change_credential(
        env: Env,
        session: Session,
        current: String,
        new: String,
    ) -> Result<(), ContractError> {
        session::require(&env, &session)?;
        let (patient_key, mut record) = access::resolve_writable(&env, &session)?;

        if current.len() > validation::MAX_CREDENTIAL_LEN
            || !verify_credential(&env, &record, &current)
        {
            return Err(ContractError::Unauthorized);
        }
        validation::validate_credential(&new)?;

        let salt = mint_salt(&env, &patient_key);
        record.credential_hash = hash_credential(&env, &salt, &new);
        record.credential_salt = salt;
        storage::set_patient(&env, &patient_key, &record);

        events::publish_credential_changed(&env, patient_key);

        Ok(())
    }

    // ── Medical history: visits ──────────────────────────────────

    /// Record a doctor visit; returns the fresh entry id
    pub fn add_visit(
        env: Env,
        session: Session,
        date: String,
        doctor: String,
        specialty: String,
        notes: String,
    ) -> Result<u64, ContractError> {
        session::require(&env, &session)?;
        let (patient_key, mut record) = access::resolve_writable(&env, &session)?;

        validation::validate_date(&date)?;
        validation::validate_label(&doctor)?;
        validation::validate_optional_label(&specialty)?;

        let id = storage::next_history_id(&env);
        record.history.visits.push_back(Visit {
            id,
            date,
            doctor,
            specialty,
            notes,
        });
        storage::set_patient(&env, &patient_key, &record);

        events::publish_history_added(&env, patient_key, HistoryKind::Visit, id);

        Ok(id)
    }

    /// Replace a visit entry wholesale, keeping its id
    pub fn update_visit(
        env: Env,
        session: Session,
        visit_id: u64,
        date: String,
        doctor: String,
        specialty: String,
        notes: String,
    ) -> Result<(), ContractError> {
        session::require(&env, &session)?;
        let (patient_key, mut record) = access::resolve_writable(&env, &session)?;

        validation::validate_date(&date)?;
        validation::validate_label(&doctor)?;
        validation::validate_optional_label(&specialty)?;

        let mut rebuilt = Vec::new(&env);
        let mut found = false;
        for visit in record.history.visits.iter() {
            if visit.id == visit_id {
                found = true;
                rebuilt.push_back(Visit {
                    id: visit_id,
                    date: date.clone(),
                    doctor: doctor.clone(),
                    specialty: specialty.clone(),
                    notes: notes.clone(),
                });
            } else {
                rebuilt.push_back(visit);
            }
        }
        if !found {
            return Err(ContractError::NotFound);
        }

        record.history.visits = rebuilt;
        storage::set_patient(&env, &patient_key, &record);

        events::publish_history_updated(&env, patient_key, HistoryKind::Visit, visit_id);

        Ok(())
    }

    /// Delete a visit entry; a second delete of the same id fails NotFound
    pub fn delete_visit(env: Env, session: Session, visit_id: u64) -> Result<(), ContractError> {
        session::require(&env, &session)?;
        let (patient_key, mut record) = access::resolve_writable(&env, &session)?;

        let mut rebuilt = Vec::new(&env);
        let mut found = false;
        for visit in record.history.visits.iter() {
            if visit.id == visit_id {
                found = true;
            } else {
                rebuilt.push_back(visit);
            }
        }
        if !found {
            return Err(ContractError::NotFound);
        }

        record.history.visits = rebuilt;
        storage::set_patient(&env, &patient_key, &record);

        events::publish_history_removed(&env, patient_key, HistoryKind::Visit, visit_id);

        Ok(())
    }

    // ── Medical history: medications ─────────────────────────────

    /// Record a medication; `end_date` of `None` means ongoing
    pub fn add_medication(
        env: Env,
        session: Session,
        name: String,
        dosage: String,
        start_date: String,
        end_date: Option<String>,
        purpose: String,
    ) -> Result<u64, ContractError> {
        session::require(&env, &session)?;
        let (patient_key, mut record) = access::resolve_writable(&env, &session)?;

        validation::validate_label(&name)?;
        validation::validate_label(&dosage)?;
        validation::validate_date(&start_date)?;
        if let Some(ref end) = end_date {
            validation::validate_date(end)?;
        }
        validation::validate_optional_label(&purpose)?;

        let id = storage::next_history_id(&env);
        record.history.medications.push_back(Medication {
            id,
            name,
            dosage,
            start_date,
            end_date,
            purpose,
        });
        storage::set_patient(&env, &patient_key, &record);

        events::publish_history_added(&env, patient_key, HistoryKind::Medication, id);

        Ok(id)
    }

    /// Replace a medication entry wholesale, keeping its id
    pub fn update_medication(
        env: Env,
        session: Session,
        medication_id: u64,
        name: String,
        dosage: String,
        start_date: String,
        end_date: Option<String>,
        purpose: String,
    ) -> Result<(), ContractError> {
        session::require(&env, &session)?;
        let (patient_key, mut record) = access::resolve_writable(&env, &session)?;

        validation::validate_label(&name)?;
        validation::validate_label(&dosage)?;
        validation::validate_date(&start_date)?;
        if let Some(ref end) = end_date {
            validation::validate_date(end)?;
        }
        validation::validate_optional_label(&purpose)?;

        let mut rebuilt = Vec::new(&env);
        let mut found = false;
        for medication in record.history.medications.iter() {
            if medication.id == medication_id {
                found = true;
                rebuilt.push_back(Medication {
                    id: medication_id,
                    name: name.clone(),
                    dosage: dosage.clone(),
                    start_date: start_date.clone(),
                    end_date: end_date.clone(),
                    purpose: purpose.clone(),
                });
            } else {
                rebuilt.push_back(medication);
            }
        }
        if !found {
            return Err(ContractError::NotFound);
        }

        record.history.medications = rebuilt;
        storage::set_patient(&env, &patient_key, &record);

        events::publish_history_updated(&env, patient_key, HistoryKind::Medication, medication_id);

        Ok(())
    }

    /// Delete a medication entry
    pub fn delete_medication(
        env: Env,
        session: Session,
        medication_id: u64,
    ) -> Result<(), ContractError> {
        session::require(&env, &session)?;
        let (patient_key, mut record) = access::resolve_writable(&env, &session)?;

        let mut rebuilt = Vec::new(&env);
        let mut found = false;
        for medication in record.history.medications.iter() {
            if medication.id == medication_id {
                found = true;
            } else {
                rebuilt.push_back(medication);
            }
        }
        if !found {
            return Err(ContractError::NotFound);
        }

        record.history.medications = rebuilt;
        storage::set_patient(&env, &patient_key, &record);

        events::publish_history_removed(&env, patient_key, HistoryKind::Medication, medication_id);

        Ok(())
    }

    // ── Medical history: test results ────────────────────────────

    /// Record a test result with its attached-file reference
    pub fn add_test(
        env: Env,
        session: Session,
        name: String,
        date: String,
        file_name: String,
        notes: String,
    ) -> Result<u64, ContractError> {
        session::require(&env, &session)?;
        let (patient_key, mut record) = access::resolve_writable(&env, &session)?;

        validation::validate_label(&name)?;
        validation::validate_date(&date)?;
        validation::validate_label(&file_name)?;

        let id = storage::next_history_id(&env);
        record.history.tests.push_back(TestResult {
            id,
            name,
            date,
            file_name,
            notes,
        });
        storage::set_patient(&env, &patient_key, &record);

        events::publish_history_added(&env, patient_key, HistoryKind::Test, id);

        Ok(id)
    }

    /// Replace a test-result entry wholesale, keeping its id
    pub fn update_test(
        env: Env,
        session: Session,
        test_id: u64,
        name: String,
        date: String,
        file_name: String,
        notes: String,
    ) -> Result<(), ContractError> {
        session::require(&env, &session)?;
        let (patient_key, mut record) = access::resolve_writable(&env, &session)?;

        validation::validate_label(&name)?;
        validation::validate_date(&date)?;
        validation::validate_label(&file_name)?;

        let mut rebuilt = Vec::new(&env);
        let mut found = false;
        for test in record.history.tests.iter() {
            if test.id == test_id {
                found = true;
                rebuilt.push_back(TestResult {
                    id: test_id,
                    name: name.clone(),
                    date: date.clone(),
                    file_name: file_name.clone(),
                    notes: notes.clone(),
                });
            } else {
                rebuilt.push_back(test);
            }
        }
        if !found {
            return Err(ContractError::NotFound);
        }

        record.history.tests = rebuilt;
        storage::set_patient(&env, &patient_key, &record);

        events::publish_history_updated(&env, patient_key, HistoryKind::Test, test_id);

        Ok(())
    }

    /// Delete a test-result entry
    pub fn delete_test(env: Env, session: Session, test_id: u64) -> Result<(), ContractError> {
        session::require(&env, &session)?;
        let (patient_key, mut record) = access::resolve_writable(&env, &session)?;

        let mut rebuilt = Vec::new(&env);
        let mut found = false;
        for test in record.history.tests.iter() {
            if test.id == test_id {
                found = true;
            } else {
                rebuilt.push_back(test);
            }
        }
        if !found {
            return Err(ContractError::NotFound);
        }

        record.history.tests = rebuilt;
        storage::set_patient(&env, &patient_key, &record);

        events::publish_history_removed(&env, patient_key, HistoryKind::Test, test_id);

        Ok(())
    }

    // ── Family access ────────────────────────────────────────────

    /// Grant read-only access to a family member's identity.
    ///
    /// The grantee must not already be a registered patient or hold a
    /// grant (either for this patient or any other).
    pub fn grant_family_access(
        env: Env,
        session: Session,
        grantee: String,
    ) -> Result<(), ContractError> {
        session::require(&env, &session)?;
        let (patient_key, _) = access::resolve_writable(&env, &session)?;

        validation::validate_email(&grantee)?;
        if storage::has_patient(&env, &grantee) || storage::has_grant(&env, &grantee) {
            return Err(ContractError::Conflict);
        }

        let grant = FamilyGrant {
            patient_key: patient_key.clone(),
            level: FamilyAccessLevel::Family,
            granted_at: env.ledger().timestamp(),
        };
        storage::set_grant(&env, &grantee, &grant);

        let mut grantees = storage::grantees_of(&env, &patient_key);
        grantees.push_back(grantee.clone());
        storage::set_grantees(&env, &patient_key, &grantees);

        events::publish_family_access_granted(&env, patient_key, grantee);

        Ok(())
    }

    /// Revoke a family member's access.
    ///
    /// Authorization is per resource: only the patient the grant points
    /// at may revoke it, even though any patient session holds write
    /// permission over its own record.
    pub fn revoke_family_access(
        env: Env,
        session: Session,
        grantee: String,
    ) -> Result<(), ContractError> {
        session::require(&env, &session)?;
        let (patient_key, _) = access::resolve_writable(&env, &session)?;

        let grant = storage::get_grant(&env, &grantee).ok_or(ContractError::NotFound)?;
        if grant.patient_key != patient_key {
            return Err(ContractError::Forbidden);
        }

        storage::remove_grant(&env, &grantee);

        let mut rebuilt = Vec::new(&env);
        for existing in storage::grantees_of(&env, &patient_key).iter() {
            if existing != grantee {
                rebuilt.push_back(existing);
            }
        }
        storage::set_grantees(&env, &patient_key, &rebuilt);

        events::publish_family_access_revoked(&env, patient_key, grantee);

        Ok(())
    }

    // ── Account deletion ─────────────────────────────────────────

    /// Delete the caller's record after credential re-verification,
    /// cascading to every family grant pointing at it, then invalidate
    /// the session.
    pub fn delete_account(
        env: Env,
        session: Session,
        credential: String,
    ) -> Result<(), ContractError> {
        session::require(&env, &session)?;
        let (patient_key, record) = access::resolve_writable(&env, &session)?;

        if credential.len() > validation::MAX_CREDENTIAL_LEN
            || !verify_credential(&env, &record, &credential)
        {
            return Err(ContractError::Unauthorized);
        }

        let grantees = storage::grantees_of(&env, &patient_key);
        for grantee in grantees.iter() {
            storage::remove_grant(&env, &grantee);
        }
        storage::clear_grantees(&env, &patient_key);
        storage::clear_disclosures(&env, &patient_key);
        storage::remove_patient(&env, &patient_key);
        storage::unregister_identity(&env, &patient_key);

        session::destroy(&env, session.token);

        events::publish_account_deleted(&env, patient_key, grantees.len());

        Ok(())
    }

    // ── Emergency disclosure ─────────────────────────────────────

    /// Unauthenticated break-glass read: the fixed redacted subset of a
    /// patient's record, keyed only by their identity. Every disclosure
    /// is logged to the patient's audit trail.
    pub fn emergency_view(
        env: Env,
        patient_key: String,
    ) -> Result<RedactedProfile, ContractError> {
        emergency::disclose(&env, &patient_key)
    }

    // ── Snapshot bootstrap ───────────────────────────────────────

    /// Seed the store from a snapshot. Admin-only, and only while the
    /// store is still empty; grants must reference snapshot patients.
    pub fn import_snapshot(
        env: Env,
        admin: Address,
        snapshot: StoreSnapshot,
    ) -> Result<(), ContractError> {
        admin.require_auth();
        let stored: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;
        if admin != stored {
            return Err(ContractError::Unauthorized);
        }
        if !storage::patient_registry(&env).is_empty() {
            return Err(ContractError::Conflict);
        }

        // No grant may dangle, even in seed data.
        for (_, grant) in snapshot.family_grants.iter() {
            if !snapshot.patients.contains_key(grant.patient_key.clone()) {
                return Err(ContractError::InvalidInput);
            }
        }

        for (identity, record) in snapshot.patients.iter() {
            storage::set_patient(&env, &identity, &record);
            storage::register_identity(&env, &identity);
        }
        for (grantee, grant) in snapshot.family_grants.iter() {
            storage::set_grant(&env, &grantee, &grant);
            let mut grantees = storage::grantees_of(&env, &grant.patient_key);
            grantees.push_back(grantee.clone());
            storage::set_grantees(&env, &grant.patient_key, &grantees);
        }

        events::publish_snapshot_imported(
            &env,
            snapshot.patients.len(),
            snapshot.family_grants.len(),
        );

        Ok(())
    }

    /// Export the full store as a snapshot. Admin-only.
    pub fn export_snapshot(env: Env, admin: Address) -> Result<StoreSnapshot, ContractError> {
        admin.require_auth();
        let stored: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;
        if admin != stored {
            return Err(ContractError::Unauthorized);
        }

        let mut patients = Map::new(&env);
        let mut family_grants = Map::new(&env);
        for identity in storage::patient_registry(&env).iter() {
            if let Some(record) = storage::get_patient(&env, &identity) {
                patients.set(identity.clone(), record);
            }
            for grantee in storage::grantees_of(&env, &identity).iter() {
                if let Some(grant) = storage::get_grant(&env, &grantee) {
                    family_grants.set(grantee.clone(), grant);
                }
            }
        }

        Ok(StoreSnapshot {
            patients,
            family_grants,
        })
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }
}

// ── Credential hashing ───────────────────────────────────────────

/// Derive a fresh salt from the identity, the ledger timestamp and a
/// monotonic nonce, behind a domain separator.
fn mint_salt(env: &Env, identity: &String) -> BytesN<32> {
    let mut payload = Bytes::from_slice(env, b"MV_SALT");
    payload.append(&validation::string_bytes(
        env,
        identity,
        validation::MAX_EMAIL_LEN,
    ));
    payload.append(&Bytes::from_slice(
        env,
        &env.ledger().timestamp().to_be_bytes(),
    ));
    payload.append(&Bytes::from_slice(
        env,
        &storage::next_salt_nonce(env).to_be_bytes(),
    ));
    env.crypto().sha256(&payload).into()
}

/// sha256(salt || credential)
fn hash_credential(env: &Env, salt: &BytesN<32>, credential: &String) -> BytesN<32> {
    let mut payload = Bytes::from(salt.clone());
    payload.append(&validation::string_bytes(
        env,
        credential,
        validation::MAX_CREDENTIAL_LEN,
    ));
    env.crypto().sha256(&payload).into()
}

/// Callers must have bounded `credential` length before calling.
fn verify_credential(env: &Env, record: &PatientRecord, credential: &String) -> bool {
    hash_credential(env, &record.credential_salt, credential) == record.credential_hash
}
