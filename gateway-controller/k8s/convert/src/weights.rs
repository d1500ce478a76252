/// Converts relative route weights into a percentage distribution that
/// sums to exactly 100.
///
/// A single destination never needs a percentage, so it gets the
/// sentinel 0 ("no explicit weight"). An all-zero list means no caller
/// expressed a preference and is treated as a uniform split. Flooring
/// losses are repaid one point at a time to the entries with the
/// largest fractional remainders; ties go to the earliest entry.
pub(crate) fn normalize(weights: &[u32]) -> Vec<u32> {
    if weights.len() == 1 {
        return vec![0];
    }

    let mut weights = weights.to_vec();
    let mut total: u64 = weights.iter().map(|w| u64::from(*w)).sum();
    if total == 0 {
        for weight in weights.iter_mut() {
            *weight = 1;
        }
        total = weights.len() as u64;
    }
    if total == 0 {
        return Vec::new();
    }

    let mut results = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    for weight in &weights {
        let percent = f64::from(*weight) / total as f64 * 100.0;
        let floored = percent.floor() as u32;
        results.push(floored);
        remainders.push(percent - f64::from(floored));
    }

    let mut remaining = 100u32.saturating_sub(results.iter().sum());
    let mut order: Vec<usize> = (0..results.len()).collect();
    order.sort_by(|a, b| remainders[*b].total_cmp(&remainders[*a]).then(a.cmp(b)));
    for idx in order {
        if remaining == 0 {
            break;
        }
        remaining -= 1;
        results[idx] += 1;
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_destination_gets_sentinel_zero() {
        assert_eq!(normalize(&[7]), vec![0]);
        assert_eq!(normalize(&[0]), vec![0]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize(&[]), Vec::<u32>::new());
    }

    #[test]
    fn exact_division() {
        assert_eq!(normalize(&[1, 3]), vec![25, 75]);
        assert_eq!(normalize(&[1, 1]), vec![50, 50]);
        assert_eq!(normalize(&[3, 1, 1]), vec![60, 20, 20]);
    }

    #[test]
    fn all_zero_is_uniform() {
        assert_eq!(normalize(&[0, 0, 0, 0]), vec![25, 25, 25, 25]);
        assert_eq!(normalize(&[0, 0, 0]), vec![34, 33, 33]);
    }

    #[test]
    fn remainder_goes_to_largest_fraction_first() {
        // 33.3 and 66.6 floor to 33 and 66; the spare point goes to the
        // larger remainder.
        assert_eq!(normalize(&[1, 2]), vec![33, 67]);
    }

    #[test]
    fn ties_break_by_original_index() {
        assert_eq!(normalize(&[1, 1, 1]), vec![34, 33, 33]);
        assert_eq!(normalize(&[1, 1, 1, 1, 1, 1]), vec![17, 17, 17, 17, 16, 16]);
    }

    #[test]
    fn output_always_sums_to_100() {
        for weights in [
            vec![1, 2, 3],
            vec![5, 5, 90],
            vec![7, 11, 13, 17],
            vec![0, 9, 0, 1],
            vec![1000, 1, 1],
        ] {
            let normalized = normalize(&weights);
            assert_eq!(normalized.len(), weights.len());
            assert_eq!(normalized.iter().sum::<u32>(), 100, "{:?}", weights);
        }
    }
}
