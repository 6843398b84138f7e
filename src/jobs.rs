// src/jobs.rs
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::errors::LoadError;

pub const PRIME_NUMBER_RANGE: RangeInclusive<u32> = 1000..=50000;
pub const PRIME_COMPLEXITY_RANGE: RangeInclusive<u32> = 1..=10;
pub const BCRYPT_ROUNDS_RANGE: RangeInclusive<u32> = 8..=12;
pub const SORT_SIZE_RANGE: RangeInclusive<u32> = 100..=1000;

/// Prefix of every generated bcrypt password; the iteration index is appended.
pub const BCRYPT_PASSWORD_PREFIX: &str = "testpass";

/// The synthetic workload types the target service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Prime,
    Bcrypt,
    Sort,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Prime => "prime",
            JobKind::Bcrypt => "bcrypt",
            JobKind::Sort => "sort",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobKind {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prime" => Ok(JobKind::Prime),
            "bcrypt" => Ok(JobKind::Bcrypt),
            "sort" => Ok(JobKind::Sort),
            other => Err(LoadError::InvalidJobType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
    Bubble,
    Quick,
    Merge,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 3] = [
        SortAlgorithm::Bubble,
        SortAlgorithm::Quick,
        SortAlgorithm::Merge,
    ];
}

/// One job as it goes over the wire: `{"type": "<kind>", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum JobRequest {
    Prime { number: u32, complexity: u32 },
    Bcrypt { password: String, rounds: u32 },
    Sort {
        /// Sent as `array`; the service reads it as the size of the array to sort.
        #[serde(rename = "array")]
        size: u32,
        algorithm: SortAlgorithm,
    },
}

impl JobRequest {
    pub fn kind(&self) -> JobKind {
        match self {
            JobRequest::Prime { .. } => JobKind::Prime,
            JobRequest::Bcrypt { .. } => JobKind::Bcrypt,
            JobRequest::Sort { .. } => JobKind::Sort,
        }
    }
}

/// Builds the payload for iteration `index` (1-based) of the given kind.
pub fn generate_job<R: Rng>(kind: JobKind, index: usize, rng: &mut R) -> JobRequest {
    match kind {
        JobKind::Prime => JobRequest::Prime {
            number: rng.gen_range(PRIME_NUMBER_RANGE),
            complexity: rng.gen_range(PRIME_COMPLEXITY_RANGE),
        },
        JobKind::Bcrypt => JobRequest::Bcrypt {
            password: format!("{}{}", BCRYPT_PASSWORD_PREFIX, index),
            rounds: rng.gen_range(BCRYPT_ROUNDS_RANGE),
        },
        JobKind::Sort => JobRequest::Sort {
            size: rng.gen_range(SORT_SIZE_RANGE),
            algorithm: *SortAlgorithm::ALL
                .choose(rng)
                .unwrap_or(&SortAlgorithm::Quick),
        },
    }
}
