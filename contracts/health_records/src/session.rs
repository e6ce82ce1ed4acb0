use soroban_sdk::{symbol_short, Env, String, Symbol};

use crate::{ContractError, Role, Session};

// ── Storage key constants ───────────────────────────────────────────────────

/// Counter for generating monotonic session tokens.
const SESS_CTR: Symbol = symbol_short!("SESS_CTR");

/// Ledgers a session stays live without activity (~1 day at 5s ledgers).
const SESSION_TTL: u32 = 17_280;

fn session_key(token: u64) -> (Symbol, u64) {
    (symbol_short!("SESS"), token)
}

/// Allocate and return the next session token (1-based, monotonically
/// increasing).
fn next_token(env: &Env) -> u64 {
    let current: u64 = env.storage().instance().get(&SESS_CTR).unwrap_or(0u64);
    let next = current.saturating_add(1);
    env.storage().instance().set(&SESS_CTR, &next);
    next
}

/// Mint a session for an authenticated identity and stash it in
/// temporary storage. Sessions are pure derived state: losing one to
/// TTL expiry only forces a fresh login.
pub fn create(env: &Env, identity: String, role: Role) -> Session {
    let token = next_token(env);
    let session = Session {
        token,
        identity,
        role,
    };
    let key = session_key(token);
    env.storage().temporary().set(&key, &session);
    env.storage()
        .temporary()
        .extend_ttl(&key, SESSION_TTL, SESSION_TTL);
    session
}

/// Check that a presented session matches the stored one for its token.
///
/// The whole value must match; a forged identity or role under a live
/// token is rejected the same as an unknown token.
pub fn require(env: &Env, session: &Session) -> Result<(), ContractError> {
    let stored: Session = env
        .storage()
        .temporary()
        .get(&session_key(session.token))
        .ok_or(ContractError::Unauthorized)?;
    if stored != *session {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// Drop a session. Unknown tokens are a no-op.
pub fn destroy(env: &Env, token: u64) {
    env.storage().temporary().remove(&session_key(token));
}
