//! Username and password generation, password hashing
//!
//! Usernames are derived from the person's name as `First.Last`. When that is
//! taken the smallest free numeric serial is appended (`First.Last1`,
//! `First.Last2`, ...). Passwords are random strings drawn from a configured
//! alphabet and only ever stored as bcrypt hashes.

use rand::Rng;
use std::collections::HashSet;

use crate::error::AccountError;

pub const DEFAULT_PASSWORD_LENGTH: usize = 10;
pub const DEFAULT_PASSWORD_CHARACTERS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Builds the candidate username for a person
pub fn base_username(first_name: &str, last_name: &str) -> String {
    format!("{}.{}", first_name.trim(), last_name.trim())
}

/// Picks `base` or the first `base{n}` (n >= 1) not present in `taken`
pub fn next_available_username(base: &str, taken: &[String]) -> String {
    let taken: HashSet<&str> = taken.iter().map(String::as_str).collect();
    if !taken.contains(base) {
        return base.to_string();
    }

    let mut serial: u64 = 1;
    loop {
        let candidate = format!("{}{}", base, serial);
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        serial += 1;
    }
}

/// Rules for generated passwords
#[derive(Debug, Clone)]
pub struct CredentialsPolicy {
    password_length: usize,
    alphabet: Vec<char>,
}

impl CredentialsPolicy {
    pub fn new(password_length: usize, characters: &str) -> Result<Self, AccountError> {
        if password_length == 0 {
            return Err(AccountError::validation("Password length must be positive"));
        }
        let alphabet: Vec<char> = characters.chars().collect();
        if alphabet.is_empty() {
            return Err(AccountError::validation("Password alphabet must not be empty"));
        }
        Ok(Self {
            password_length,
            alphabet,
        })
    }

    pub fn password_length(&self) -> usize {
        self.password_length
    }

    pub fn generate_password<R: Rng>(&self, rng: &mut R) -> String {
        (0..self.password_length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }

    /// Generates a password from the thread-local generator
    pub fn random_password(&self) -> String {
        self.generate_password(&mut rand::rng())
    }
}

impl Default for CredentialsPolicy {
    fn default() -> Self {
        Self {
            password_length: DEFAULT_PASSWORD_LENGTH,
            alphabet: DEFAULT_PASSWORD_CHARACTERS.chars().collect(),
        }
    }
}

/// bcrypt hashing, run on the blocking pool
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub async fn hash(&self, password: &str) -> Result<String, AccountError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AccountError::Hashing(e.to_string()))?
            .map_err(|e| AccountError::Hashing(e.to_string()))
    }

    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AccountError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AccountError::Hashing(e.to_string()))?
            .map_err(|e| AccountError::Hashing(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
