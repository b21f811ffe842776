//! Availability-zone allocation
//!
//! Control planes run one or three masters. Three masters are spread across
//! as many distinct zones as the region offers; with fewer than three
//! candidates zones repeat, round-robin.

use crate::error::PolicyError;
use rand::Rng;
use rand::seq::SliceRandom;

/// Zone count of a single-master control plane
pub const SINGLE: usize = 1;

/// Zone count of a highly available control plane
pub const HIGHLY_AVAILABLE: usize = 3;

/// Pick `count` zones out of `candidates`
///
/// When `preserve` is set it is kept in position 0 and the remaining slots
/// are filled from the other candidates. Duplicate candidates are collapsed
/// before selection.
///
/// # Errors
///
/// `InvalidArgument` if `count` is not 1 or 3, or `candidates` is empty.
pub fn allocate<R: Rng + ?Sized>(
    count: usize,
    candidates: &[String],
    preserve: Option<&str>,
    rng: &mut R,
) -> Result<Vec<String>, PolicyError> {
    if count != SINGLE && count != HIGHLY_AVAILABLE {
        return Err(PolicyError::InvalidArgument(format!(
            "availability zone count must be {} or {}, got {}",
            SINGLE, HIGHLY_AVAILABLE, count
        )));
    }

    let mut pool: Vec<&str> = Vec::with_capacity(candidates.len());
    for zone in candidates {
        if !pool.contains(&zone.as_str()) {
            pool.push(zone.as_str());
        }
    }

    let Some(first) = pool.first().copied() else {
        return Err(PolicyError::InvalidArgument(
            "no candidate availability zones configured".to_string(),
        ));
    };

    if count == SINGLE {
        return Ok(vec![preserve.unwrap_or(first).to_string()]);
    }

    let zones: Vec<&str> = match preserve {
        Some(kept) => {
            let mut others: Vec<&str> = pool.iter().copied().filter(|z| *z != kept).collect();
            others.shuffle(rng);
            match others.as_slice() {
                [a, b, ..] => vec![kept, *a, *b],
                [only] => vec![kept, *only, kept],
                [] => vec![kept, kept, kept],
            }
        }
        None => {
            pool.shuffle(rng);
            match pool.as_slice() {
                [a, b, c, ..] => vec![*a, *b, *c],
                [a, b] => vec![*a, *b, *a],
                _ => vec![first, first, first],
            }
        }
    };

    Ok(zones.into_iter().map(str::to_string).collect())
}
