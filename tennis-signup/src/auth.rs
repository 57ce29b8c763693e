use sha2::{Digest, Sha256};

/// Session key set once the admin password was accepted
pub const ADMIN_SESSION_KEY: &str = "admin";
/// Session key counting failed logins
pub const ATTEMPTS_SESSION_KEY: &str = "login_attempts";

/// Lowercase hex SHA-256 of the password
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_password(password: &str, expected_hash: &str) -> bool {
    hash_password(password).eq_ignore_ascii_case(expected_hash.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted,
    Rejected { remaining: u32 },
    LockedOut,
}

/// Decides a login given how many attempts already failed in this session
pub fn check_login(
    password: &str,
    expected_hash: &str,
    failed_attempts: u32,
    max_attempts: u32,
) -> LoginOutcome {
    if failed_attempts >= max_attempts {
        return LoginOutcome::LockedOut;
    }
    if verify_password(password, expected_hash) {
        LoginOutcome::Accepted
    } else {
        LoginOutcome::Rejected {
            remaining: max_attempts - failed_attempts - 1,
        }
    }
}
