/// Sequential prefix generation: all primes up to sqrt(bound).
///
/// Every composite K has a prime factor <= sqrt(K), and every candidate the
/// parallel phase will test is bounded by `bound`, so this prefix is the only
/// divisor list the workers ever need. It must be fully built before any
/// worker starts.
///
/// Each odd candidate is trial-divided against the primes already collected,
/// in increasing order, with two short-circuits:
/// - divisor hit (`i % j == 0`): composite, next candidate
/// - `i / j <= j` (the divisor reached sqrt(i)): prime, next candidate
///
/// The divisibility test runs first; checking the sqrt boundary before
/// divisibility would misclassify exact prime squares (e.g. 25 with j = 5).
pub fn prime_prefix(bound: u64) -> Vec<u64> {
    let mut primes = vec![2];

    let sqrt = bound.isqrt();
    let mut i = 3;
    while i <= sqrt {
        for &j in &primes {
            if i % j == 0 {
                break;
            }
            if i / j <= j {
                primes.push(i);
                break;
            }
        }
        i += 2;
    }

    primes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_for_100() {
        // sqrt(100) = 10, primes <= 10
        assert_eq!(prime_prefix(100), vec![2, 3, 5, 7]);
    }

    #[test]
    fn test_prefix_small_bounds() {
        // sqrt(bound) < 3 means no odd candidates at all
        assert_eq!(prime_prefix(2), vec![2]);
        assert_eq!(prime_prefix(3), vec![2]);
        assert_eq!(prime_prefix(8), vec![2]);
    }

    #[test]
    fn test_prefix_includes_sqrt_when_prime() {
        // sqrt(49) = 7, which is itself prime and must be included
        assert_eq!(prime_prefix(49), vec![2, 3, 5, 7]);
    }

    #[test]
    fn test_prefix_exact_square_boundary() {
        // 9 = 3*3 must not sneak in as prime (divisor check runs first)
        assert_eq!(prime_prefix(100), vec![2, 3, 5, 7]);
        assert_eq!(prime_prefix(10000), vec![
            2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59,
            61, 67, 71, 73, 79, 83, 89, 97
        ]);
    }

    #[test]
    fn test_prefix_strictly_increasing() {
        let prefix = prime_prefix(1_000_000);
        assert!(prefix.windows(2).all(|w| w[0] < w[1]));
    }
}
