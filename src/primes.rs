//! Prime helpers used by the bucket sizing policy.

/// Returns true if `n` divides evenly by `d`
fn divides(n: usize, d: usize) -> bool {
    n.checked_rem(d) == Some(0)
}

/// Returns true if `n` is prime.
#[must_use]
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if divides(n, 2) || divides(n, 3) {
        return false;
    }

    // 6k ± 1 trial division
    let mut d: usize = 5;
    while d.checked_mul(d).is_some_and(|square| square <= n) {
        if divides(n, d) || divides(n, d.saturating_add(2)) {
            return false;
        }
        d = d.saturating_add(6);
    }
    true
}

/// Returns the largest prime not exceeding `bound`.
///
/// Bounds below 2 yield 2, the smallest prime.
#[must_use]
pub fn prime_below(bound: usize) -> usize {
    (2..=bound.max(2)).rev().find(|&candidate| is_prime(candidate)).unwrap_or(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_prime() {
        let primes: Vec<usize> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(is_prime(7919));
        assert!(!is_prime(7917));
    }

    #[test]
    fn test_prime_below() {
        assert_eq!(prime_below(0), 2);
        assert_eq!(prime_below(2), 2);
        assert_eq!(prime_below(4), 3);
        assert_eq!(prime_below(5), 5);
        assert_eq!(prime_below(100), 97);
        assert_eq!(prime_below(1000), 997);
    }
}
