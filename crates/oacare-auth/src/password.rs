use crate::error::AuthError;

/// bcrypt work factor for stored passwords.
pub const PASSWORD_COST: u32 = 10;

pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    hash_password_with_cost(plain, PASSWORD_COST)
}

pub fn hash_password_with_cost(plain: &str, cost: u32) -> Result<String, AuthError> {
    Ok(bcrypt::hash(plain, cost)?)
}

/// `Ok(false)` for a wrong password; `Err` only for a malformed hash.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(plain, hash)?)
}
