use lazy_static::lazy_static;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use regex::Regex;
use tracing::warn;

use crate::error::PlanError;

/// Attempts made before giving up on an alphanumeric password.
pub const PASSWORD_ATTEMPTS: usize = 6;
pub const MINIMUM_PASSWORD_LENGTH: usize = 16;

lazy_static! {
    static ref ALPHANUMERIC: Regex = Regex::new("^[a-zA-Z0-9]+$").unwrap();
}

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const PUNCTUATION: &[u8] = b"!#$%&*+-.:;=?@^_~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordRequirements {
    pub minimum_total_length: usize,
    pub uppercase: usize,
    pub digits: usize,
    pub punctuation: bool,
}

pub trait PasswordGenerator {
    /// Produces one candidate. Callers re-check the result, implementations
    /// are not trusted to honor `punctuation: false`.
    fn candidate(self: &mut Self, reqs: &PasswordRequirements) -> Result<String, PlanError>;
}

pub struct RandomPasswordGenerator<R = StdRng> {
    rng: R,
}

impl RandomPasswordGenerator<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for RandomPasswordGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomPasswordGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    fn pick(&mut self, set: &[u8]) -> char {
        set[self.rng.gen_range(0..set.len())] as char
    }
}

impl<R: Rng> PasswordGenerator for RandomPasswordGenerator<R> {
    fn candidate(&mut self, reqs: &PasswordRequirements) -> Result<String, PlanError> {
        let mut chars = Vec::with_capacity(reqs.minimum_total_length);
        for _ in 0..reqs.uppercase {
            chars.push(self.pick(UPPERCASE));
        }
        for _ in 0..reqs.digits {
            chars.push(self.pick(DIGITS));
        }
        if reqs.punctuation {
            chars.push(self.pick(PUNCTUATION));
        }

        let mut filler = LOWERCASE.to_vec();
        filler.extend_from_slice(UPPERCASE);
        filler.extend_from_slice(DIGITS);
        while chars.len() < reqs.minimum_total_length {
            chars.push(self.pick(&filler));
        }

        chars.shuffle(&mut self.rng);
        Ok(chars.into_iter().collect())
    }
}

pub fn is_alphanumeric(candidate: &str) -> bool {
    ALPHANUMERIC.is_match(candidate)
}

/// Asks `generator` for an alphanumeric password of at least
/// [`MINIMUM_PASSWORD_LENGTH`] characters, re-rolling the uppercase and digit
/// minimums on every attempt. Fails after [`PASSWORD_ATTEMPTS`] rejected
/// candidates.
pub fn generate_alphanumeric_password<G: PasswordGenerator + ?Sized>(
    generator: &mut G,
) -> Result<String, PlanError> {
    let mut rng = rand::thread_rng();
    for attempt in 1..=PASSWORD_ATTEMPTS {
        let reqs = PasswordRequirements {
            minimum_total_length: MINIMUM_PASSWORD_LENGTH,
            uppercase: rng.gen_range(0..=5),
            digits: rng.gen_range(0..=5),
            punctuation: false,
        };
        let candidate = generator.candidate(&reqs)?;
        if candidate.len() >= MINIMUM_PASSWORD_LENGTH && is_alphanumeric(&candidate) {
            return Ok(candidate);
        }
        warn!("rejected generated password candidate (attempt {attempt}/{PASSWORD_ATTEMPTS})");
    }
    Err(PlanError::PasswordExhausted {
        attempts: PASSWORD_ATTEMPTS,
    })
}
