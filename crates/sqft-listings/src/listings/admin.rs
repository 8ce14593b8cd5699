use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::{AdminConfig, DEFAULT_SESSION_TTL_MINUTES, MAX_SESSION_TTL_MINUTES};

const TOKEN_BYTES: usize = 32;

type Digest32 = [u8; 32];

/// Bearer session issued after a successful admin login.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Password gate for the admin surface.
///
/// Only digests are held: the configured secret is hashed once at startup and
/// issued tokens are stored by hash. Without a configured secret the gate is
/// closed and every login fails with [`AuthError::Disabled`].
pub struct AdminGate {
    secret_hash: Option<Digest32>,
    ttl: Duration,
    sessions: Mutex<HashMap<Digest32, DateTime<Utc>>>,
}

impl AdminGate {
    pub fn new(password: Option<&str>, ttl: Duration) -> Self {
        Self {
            secret_hash: password.filter(|p| !p.is_empty()).map(hash_secret),
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Out-of-range lifetimes fall back to the default instead of overflowing.
    pub fn from_config(config: &AdminConfig) -> Self {
        let ttl = Duration::try_minutes(config.session_ttl_minutes)
            .filter(|_| (1..=MAX_SESSION_TTL_MINUTES).contains(&config.session_ttl_minutes))
            .unwrap_or_else(|| {
                warn!(
                    minutes = config.session_ttl_minutes,
                    "admin session lifetime out of range, using default"
                );
                Duration::minutes(DEFAULT_SESSION_TTL_MINUTES)
            });
        Self::new(config.password.as_deref(), ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        self.secret_hash.is_some()
    }

    pub fn login(&self, password: &str, now: DateTime<Utc>) -> Result<AdminSession, AuthError> {
        let expected = self.secret_hash.ok_or(AuthError::Disabled)?;
        if !hashes_equal(&hash_secret(password), &expected) {
            warn!("admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = generate_token(&mut OsRng);
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::ExpiryOutOfRange)?;
        let mut sessions = self.sessions()?;
        prune_expired(&mut sessions, now);
        sessions.insert(hash_secret(&token), expires_at);
        info!(%expires_at, active_sessions = sessions.len(), "admin session issued");

        Ok(AdminSession { token, expires_at })
    }

    /// Accept a bearer token that was issued and has not expired or been revoked.
    pub fn authorize(&self, token: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        if !self.is_enabled() {
            return Err(AuthError::Disabled);
        }

        let mut sessions = self.sessions()?;
        prune_expired(&mut sessions, now);
        if sessions.contains_key(&hash_secret(token)) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }

    /// Revoke a session. Returns whether the token was active.
    pub fn logout(&self, token: &str) -> Result<bool, AuthError> {
        let removed = self.sessions()?.remove(&hash_secret(token)).is_some();
        if removed {
            info!("admin session revoked");
        }
        Ok(removed)
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<Digest32, DateTime<Utc>>>, AuthError> {
        self.sessions.lock().map_err(|_| AuthError::Unavailable)
    }
}

fn prune_expired(sessions: &mut HashMap<Digest32, DateTime<Utc>>, now: DateTime<Utc>) {
    sessions.retain(|_, expires_at| *expires_at > now);
}

fn generate_token<R: RngCore>(rng: &mut R) -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

fn hash_secret(value: &str) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

/// Compare digests without short-circuiting on the first mismatch.
fn hashes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("admin access is not configured")]
    Disabled,
    #[error("incorrect password")]
    InvalidCredentials,
    #[error("missing or expired session")]
    Unauthorized,
    #[error("session table unavailable")]
    Unavailable,
    #[error("session lifetime exceeds the supported date range")]
    ExpiryOutOfRange,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 26, 10, 0, 0).unwrap()
    }

    fn gate() -> AdminGate {
        AdminGate::new(Some("open-sesame"), Duration::minutes(30))
    }

    #[test]
    fn gate_without_password_rejects_everything() {
        let gate = AdminGate::new(None, Duration::minutes(30));
        assert!(!gate.is_enabled());
        assert_eq!(gate.login("", now()).unwrap_err(), AuthError::Disabled);
        assert_eq!(gate.authorize("token", now()).unwrap_err(), AuthError::Disabled);

        let blank = AdminGate::new(Some(""), Duration::minutes(30));
        assert!(!blank.is_enabled());
    }

    #[test]
    fn wrong_password_is_rejected() {
        assert_eq!(
            gate().login("open-sesame!", now()).unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn issued_token_authorizes_until_expiry() {
        let gate = gate();
        let session = gate.login("open-sesame", now()).expect("login");
        assert_eq!(session.expires_at, now() + Duration::minutes(30));

        assert!(gate.authorize(&session.token, now()).is_ok());
        assert!(gate
            .authorize(&session.token, now() + Duration::minutes(29))
            .is_ok());
        assert_eq!(
            gate.authorize(&session.token, now() + Duration::minutes(30))
                .unwrap_err(),
            AuthError::Unauthorized
        );
    }

    #[test]
    fn logout_revokes_the_session() {
        let gate = gate();
        let session = gate.login("open-sesame", now()).expect("login");
        assert!(gate.logout(&session.token).expect("logout"));
        assert!(!gate.logout(&session.token).expect("second logout"));
        assert_eq!(
            gate.authorize(&session.token, now()).unwrap_err(),
            AuthError::Unauthorized
        );
    }

    #[test]
    fn unknown_tokens_are_unauthorized() {
        let gate = gate();
        gate.login("open-sesame", now()).expect("login");
        assert_eq!(
            gate.authorize("forged", now()).unwrap_err(),
            AuthError::Unauthorized
        );
    }

    #[test]
    fn oversized_lifetime_fails_login_without_issuing_a_session() {
        let gate = AdminGate::new(Some("open-sesame"), Duration::minutes(1_000_000_000_000));
        assert_eq!(
            gate.login("open-sesame", now()).unwrap_err(),
            AuthError::ExpiryOutOfRange
        );
        assert!(gate.sessions().expect("sessions").is_empty());
    }

    #[test]
    fn config_lifetime_outside_bounds_uses_default() {
        let config = |minutes| AdminConfig {
            password: Some("open-sesame".to_string()),
            session_ttl_minutes: minutes,
        };

        assert_eq!(
            AdminGate::from_config(&config(45)).ttl(),
            Duration::minutes(45)
        );
        for minutes in [0, MAX_SESSION_TTL_MINUTES + 1, i64::MAX] {
            assert_eq!(
                AdminGate::from_config(&config(minutes)).ttl(),
                Duration::minutes(DEFAULT_SESSION_TTL_MINUTES)
            );
        }
    }

    #[test]
    fn tokens_are_url_safe_without_padding() {
        let mut rng = StdRng::seed_from_u64(123);
        let token = generate_token(&mut rng);
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn digest_comparison_checks_length_and_content() {
        let a = hash_secret("one");
        assert!(hashes_equal(&a, &hash_secret("one")));
        assert!(!hashes_equal(&a, &hash_secret("two")));
        assert!(!hashes_equal(&a, &a[..16]));
    }
}
