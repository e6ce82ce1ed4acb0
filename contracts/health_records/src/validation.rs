use soroban_sdk::{Bytes, Env, String};

use crate::ContractError;

pub const MAX_EMAIL_LEN: u32 = 64;
const MIN_EMAIL_LEN: u32 = 5; // a@b.c

pub const MAX_CREDENTIAL_LEN: u32 = 64;
const MIN_CREDENTIAL_LEN: u32 = 6;

const MIN_NAME_LEN: u32 = 2;
const MAX_NAME_LEN: u32 = 64;

const MAX_LABEL_LEN: u32 = 64;

const BUF_LEN: usize = 64;

/// Copy a bounded soroban string into a byte window.
/// Callers bound the length before calling.
fn bytes_of(value: &String) -> ([u8; BUF_LEN], usize) {
    let len = value.len() as usize;
    let mut buf = [0u8; BUF_LEN];
    value.copy_into_slice(&mut buf[..len]);
    (buf, len)
}

/// Bounded string contents as `Bytes`, for hashing.
pub(crate) fn string_bytes(env: &Env, value: &String, max: u32) -> Bytes {
    debug_assert!(value.len() <= max);
    let (buf, len) = bytes_of(value);
    Bytes::from_slice(env, &buf[..len])
}

/// Validate an email-shaped identity: printable ASCII without spaces,
/// exactly one `@` with a non-empty local part, and a domain containing
/// a dot with characters on both sides.
pub fn validate_email(email: &String) -> Result<(), ContractError> {
    let len = email.len();
    if !(MIN_EMAIL_LEN..=MAX_EMAIL_LEN).contains(&len) {
        return Err(ContractError::InvalidInput);
    }

    let (buf, len) = bytes_of(email);
    let bytes = &buf[..len];

    let mut at_pos: Option<usize> = None;
    for (i, &b) in bytes.iter().enumerate() {
        // Printable ASCII, no spaces.
        if !(33..=126).contains(&b) {
            return Err(ContractError::InvalidInput);
        }
        if b == b'@' {
            if at_pos.is_some() {
                return Err(ContractError::InvalidInput);
            }
            at_pos = Some(i);
        }
    }

    let at = at_pos.ok_or(ContractError::InvalidInput)?;
    if at == 0 {
        return Err(ContractError::InvalidInput);
    }

    let domain = &bytes[at + 1..];
    let dot = domain
        .iter()
        .rposition(|&b| b == b'.')
        .ok_or(ContractError::InvalidInput)?;
    if dot == 0 || dot == domain.len() - 1 {
        return Err(ContractError::InvalidInput);
    }

    Ok(())
}

/// Validate a login credential: minimum strength is length >= 6;
/// printable ASCII only, bounded at 64 bytes.
pub fn validate_credential(credential: &String) -> Result<(), ContractError> {
    let len = credential.len();
    if !(MIN_CREDENTIAL_LEN..=MAX_CREDENTIAL_LEN).contains(&len) {
        return Err(ContractError::InvalidInput);
    }

    let (buf, len) = bytes_of(credential);
    for &b in &buf[..len] {
        if !(32..=126).contains(&b) {
            return Err(ContractError::InvalidInput);
        }
    }

    Ok(())
}

/// Validate a person's name.
/// Names must be between MIN_NAME_LEN and MAX_NAME_LEN bytes of
/// printable ASCII (space ' ' to tilde '~').
pub fn validate_name(name: &String) -> Result<(), ContractError> {
    let len = name.len();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(ContractError::InvalidInput);
    }

    let (buf, len) = bytes_of(name);
    for &b in &buf[..len] {
        if !(32..=126).contains(&b) {
            return Err(ContractError::InvalidInput);
        }
    }

    Ok(())
}

/// Validate a required short text field (doctor, medication name,
/// dosage, file reference): 1..=64 bytes of printable ASCII.
pub fn validate_label(label: &String) -> Result<(), ContractError> {
    let len = label.len();
    if len == 0 || len > MAX_LABEL_LEN {
        return Err(ContractError::InvalidInput);
    }

    let (buf, len) = bytes_of(label);
    for &b in &buf[..len] {
        if !(32..=126).contains(&b) {
            return Err(ContractError::InvalidInput);
        }
    }

    Ok(())
}

/// Like `validate_label`, but empty is allowed.
pub fn validate_optional_label(label: &String) -> Result<(), ContractError> {
    if label.is_empty() {
        return Ok(());
    }
    validate_label(label)
}

/// Validate a `YYYY-MM-DD` date string (structural check).
pub fn validate_date(date: &String) -> Result<(), ContractError> {
    if date.len() != 10 {
        return Err(ContractError::InvalidInput);
    }

    let (buf, len) = bytes_of(date);
    let bytes = &buf[..len];
    for (i, &b) in bytes.iter().enumerate() {
        let ok = if i == 4 || i == 7 {
            b == b'-'
        } else {
            b.is_ascii_digit()
        };
        if !ok {
            return Err(ContractError::InvalidInput);
        }
    }

    Ok(())
}

/// Like `validate_date`, but empty is allowed (date of birth may be
/// left blank at registration).
pub fn validate_optional_date(date: &String) -> Result<(), ContractError> {
    if date.is_empty() {
        return Ok(());
    }
    validate_date(date)
}
