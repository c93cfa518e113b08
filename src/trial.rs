//! # Trial — Base Prime Generation and the Trial-Division Oracle
//!
//! The two number-theoretic primitives every scan depends on:
//!
//! 1. **Base prime generation** (`generate_base`): the sequential list of all
//!    primes up to a limit, built by trial division over odd candidates. For
//!    a full run up to N the limit is ⌊√N⌋, so every larger candidate has a
//!    witness factor in the base set if it has one at all.
//! 2. **Primality oracle** (`is_prime`): tests one candidate against the base
//!    set, stopping as soon as a base prime's square exceeds the candidate.
//!
//! Base generation runs single-threaded and must complete before any worker
//! scans its span — the oracle's early exit at p² > n is only sound when the
//! base set contains every prime ≤ ⌊√n⌋.

/// Limit of the base set needed to test candidates up to `n`: ⌊√n⌋.
#[inline]
pub fn base_limit(n: u64) -> u64 {
    n.isqrt()
}

/// Generate all primes up to `limit` (inclusive) by trial division.
///
/// Emits 2 when `limit >= 2`, then every odd candidate in [3, limit] with no
/// odd divisor j where j² ≤ candidate. O(limit^1.5) time; limits of 0 and 1
/// yield an empty set. The result is strictly increasing.
pub fn generate_base(limit: u64) -> Vec<u64> {
    let mut primes = Vec::new();
    if limit >= 2 {
        primes.push(2);
    }
    let mut i = 3u64;
    while i <= limit {
        let mut prime = true;
        let mut j = 3u64;
        while j * j <= i {
            if i % j == 0 {
                prime = false;
                break;
            }
            j += 2;
        }
        if prime {
            primes.push(i);
        }
        i += 2;
    }
    primes
}

/// Trial-division primality test against a base prime set.
///
/// `base` must contain every prime ≤ ⌊√n⌋ in increasing order, otherwise the
/// early exit at p² > n can accept a composite whose smallest factor is
/// missing from the set.
pub fn is_prime(n: u64, base: &[u64]) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    for &p in base {
        if p.saturating_mul(p) > n {
            break;
        }
        if n % p == 0 {
            return false;
        }
    }
    true
}
