//! Password hashing
//!
//! Salted one-way hashing with bcrypt. Hashing and verification are CPU-bound, so both run
//! on tokio's blocking pool instead of the request executor.

/// Default cost factor for bcrypt hashing
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Lowest cost bcrypt accepts
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest cost bcrypt accepts
pub const MAX_BCRYPT_COST: u32 = 31;

/// Password hashing errors
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Invalid hash format: {0}")]
    InvalidHash(String),

    #[error("Blocking task failed: {0}")]
    TaskFailed(String),
}

/// bcrypt hasher with a fixed cost
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher {
    /// Create a hasher, clamping `cost` into the range bcrypt accepts
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt
    pub fn hash_blocking(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashingError(e.to_string()))
    }

    /// Verify a password against a stored bcrypt hash
    pub fn verify_blocking(password: &str, hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(password, hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))
    }

    /// Hash on the blocking pool
    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let hasher = *self;
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash_blocking(&password))
            .await
            .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
    }

    /// Verify on the blocking pool
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || Self::verify_blocking(&password, &hash))
            .await
            .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
    }
}
