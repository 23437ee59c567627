//! Entropy estimator.
//!
//! Rényi entropy (base 2) over the multiset of trace signatures, with
//! the Shannon special case at alpha == 1 and a numerical floor on the
//! inner sum to keep `log2`/`powf` away from zero.

use std::collections::HashMap;

const SHANNON_EPSILON: f64 = 1e-12;
const SUM_FLOOR: f64 = 1e-300;

/// `entropy(signatures) -> H >= 0`. Empty input is 0.
pub fn entropy<'a, I>(signatures: I, alpha: f64) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut total = 0u64;
    for sig in signatures {
        *counts.entry(sig).or_insert(0) += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    let probs: Vec<f64> = counts.values().map(|&c| c as f64 / total as f64).collect();

    if (alpha - 1.0).abs() < SHANNON_EPSILON {
        -probs
            .iter()
            .map(|p| if *p > 0.0 { p * p.log2() } else { 0.0 })
            .sum::<f64>()
    } else {
        let sum_p_alpha: f64 = probs.iter().map(|p| p.powf(alpha)).sum();
        (1.0 / (1.0 - alpha)) * sum_p_alpha.max(SUM_FLOOR).log2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(entropy(Vec::<&str>::new(), 1.0), 0.0);
    }

    #[test]
    fn all_equal_signatures_have_zero_entropy() {
        let sigs = vec!["a", "a", "a", "a"];
        assert!(entropy(sigs, 1.0).abs() < 1e-9);
    }

    #[test]
    fn all_distinct_signatures_hit_log2_n() {
        let sigs = vec!["a", "b", "c", "d"];
        let h = entropy(sigs, 1.0);
        assert!((h - 4f64.log2()).abs() < 1e-9);
    }

    #[test]
    fn shannon_and_renyi_agree_near_alpha_one() {
        let sigs = vec!["a", "a", "b", "c"];
        let shannon = entropy(sigs.clone(), 1.0);
        let renyi_near_one = entropy(sigs, 1.0 + 1e-9);
        assert!((shannon - renyi_near_one).abs() < 1e-4);
    }

    #[test]
    fn entropy_bounded_by_log2_n_for_any_multiset() {
        let sigs = vec!["a", "a", "b", "c", "c", "c", "d"];
        let n = sigs.len() as f64;
        let h = entropy(sigs, 1.0);
        assert!(h >= 0.0);
        assert!(h <= n.log2() + 1e-9);
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_shannon_entropy_bounded_by_log2_n(
                labels in prop::collection::vec(0u8..6, 1..40)
            ) {
                let owned: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
                let sigs: Vec<&str> = owned.iter().map(String::as_str).collect();
                let n = sigs.len() as f64;
                let h = entropy(sigs, 1.0);
                prop_assert!(h >= -1e-9);
                prop_assert!(h <= n.log2() + 1e-9);
            }

            #[test]
            fn prop_renyi_entropy_is_non_negative_across_alpha(
                labels in prop::collection::vec(0u8..6, 1..40),
                alpha in 0.01f64..4.0
            ) {
                let owned: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
                let sigs: Vec<&str> = owned.iter().map(String::as_str).collect();
                let h = entropy(sigs, alpha);
                prop_assert!(h >= -1e-6);
            }
        }
    }
}
