// Win-count distribution over independent weekly outcomes (Poisson-binomial).

use crate::error::DomainError;

/// Upper bound on the number of events accepted by [`exhaustive_distribution`].
/// 2^24 scenarios is already several seconds of work.
pub const MAX_EXHAUSTIVE_EVENTS: usize = 24;

/// Probability of finishing with exactly `k` wins, for every `k` in `0..=W`.
///
/// Each entry of `probabilities` is the success probability of one
/// independent Bernoulli trial. Built by convolving the running distribution
/// with `[1 - p, p]` once per event, which yields the same masses as summing
/// every win/loss scenario but in O(W²).
pub fn win_distribution(probabilities: &[f64]) -> Result<Vec<f64>, DomainError> {
    validate(probabilities)?;

    let mut dist = Vec::with_capacity(probabilities.len() + 1);
    dist.push(1.0);
    for &p in probabilities {
        let q = 1.0 - p;
        dist.push(0.0);
        // Walk backwards so each bucket reads the previous round's values.
        for k in (1..dist.len()).rev() {
            dist[k] = dist[k] * q + dist[k - 1] * p;
        }
        dist[0] *= q;
    }
    Ok(dist)
}

/// Reference implementation: enumerate every subset of weeks as the set of
/// wins and add that scenario's probability to the bucket for its size.
pub fn exhaustive_distribution(probabilities: &[f64]) -> Result<Vec<f64>, DomainError> {
    validate(probabilities)?;
    let n = probabilities.len();
    if n > MAX_EXHAUSTIVE_EVENTS {
        return Err(DomainError::TooManyEvents {
            count: n,
            max: MAX_EXHAUSTIVE_EVENTS,
        });
    }

    let mut dist = vec![0.0; n + 1];
    for scenario in 0u32..(1u32 << n) {
        let mut mass = 1.0;
        for (i, &p) in probabilities.iter().enumerate() {
            if scenario & (1 << i) != 0 {
                mass *= p;
            } else {
                mass *= 1.0 - p;
            }
        }
        dist[scenario.count_ones() as usize] += mass;
    }
    Ok(dist)
}

fn validate(probabilities: &[f64]) -> Result<(), DomainError> {
    for (index, &value) in probabilities.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(DomainError::ProbabilityOutOfRange { index, value });
        }
    }
    Ok(())
}
