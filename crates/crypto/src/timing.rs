//! Constant-time operations for security.

use subtle::ConstantTimeEq;

/// Compare two byte slices in constant time.
///
/// Lengths are compared first and may short-circuit: signature lengths are
/// public. For equal lengths the comparison takes the same time regardless
/// of where the inputs first differ.
///
/// # Returns
/// true if slices are equal, false otherwise
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::hint::black_box;
    use std::time::Instant;

    #[test]
    fn test_equal_slices() {
        assert!(constant_time_compare(b"hello", b"hello"));
    }

    #[test]
    fn test_different_slices() {
        assert!(!constant_time_compare(b"hello", b"world"));
    }

    #[test]
    fn test_different_lengths() {
        assert!(!constant_time_compare(b"hello", b"hi"));
        assert!(!constant_time_compare(b"", b"a"));
    }

    #[test]
    fn test_empty_slices() {
        assert!(constant_time_compare(b"", b""));
    }

    #[test]
    fn test_case_matters() {
        assert!(!constant_time_compare(b"ABCDEF", b"abcdef"));
    }

    proptest! {
        #[test]
        fn prop_matches_slice_equality(a: Vec<u8>, b: Vec<u8>) {
            prop_assert_eq!(constant_time_compare(&a, &b), a == b);
        }

        #[test]
        fn prop_reflexive(a: Vec<u8>) {
            prop_assert!(constant_time_compare(&a, &a));
        }
    }

    fn median_nanos(a: &[u8], b: &[u8], rounds: usize) -> u128 {
        let mut samples: Vec<u128> = (0..rounds)
            .map(|_| {
                let start = Instant::now();
                for _ in 0..64 {
                    black_box(constant_time_compare(black_box(a), black_box(b)));
                }
                start.elapsed().as_nanos()
            })
            .collect();
        samples.sort_unstable();
        samples[samples.len() / 2]
    }

    /// Statistical check that an early mismatch is not measurably faster than
    /// a late one. Noisy on shared machines, so run explicitly with
    /// `cargo test -- --ignored`.
    #[test]
    #[ignore]
    fn test_timing_independent_of_mismatch_position() {
        let reference = vec![b'a'; 4096];
        let mut early = reference.clone();
        early[0] = b'b';
        let mut late = reference.clone();
        late[4095] = b'b';

        // warm up
        median_nanos(&reference, &early, 200);

        let early_ns = median_nanos(&reference, &early, 2000) as f64;
        let late_ns = median_nanos(&reference, &late, 2000) as f64;
        let ratio = early_ns.max(late_ns) / early_ns.min(late_ns).max(1.0);

        assert!(ratio < 1.5, "early={early_ns}ns late={late_ns}ns ratio={ratio:.2}");
    }
}
