/// Sorts a pair of values into nondescending order.
pub fn sort_pair<K: Ord>(a: K, b: K) -> (K, K) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Folds an iterator of weights into its `(min, max)`, or `None` if empty.
pub fn weight_range(weights: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    weights.into_iter().fold(None, |range, w| match range {
        None => Some((w, w)),
        Some((lo, hi)) => Some((lo.min(w), hi.max(w))),
    })
}
