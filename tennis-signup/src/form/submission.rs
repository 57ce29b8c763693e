use serde::Deserialize;

/// Longest display name accepted on the sign-up form
pub const MAX_NAME_LENGTH: usize = 40;

/// Sign-up request from frontend
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
}

/// Admin login request from frontend
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Validates a sign-up request and returns the trimmed name
pub fn validate_signup(req: &SignupRequest) -> Result<String, String> {
    let name = req.name.trim();

    if name.is_empty() {
        return Err("Please enter a valid, unique name.".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!("Names are limited to {} characters", MAX_NAME_LENGTH));
    }
    if name.chars().any(char::is_control) {
        return Err("Name contains invalid characters".to_string());
    }

    Ok(name.to_string())
}
