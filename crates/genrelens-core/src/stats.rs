//! Numeric helpers shared by the aggregators.

/// Pearson correlation coefficient over `(x, y)` pairs.
///
/// Fewer than two points, or zero variance in either series, yields `0.0`.
/// The result is clamped to `[-1, 1]`.
pub fn pearson(pairs: &[(f64, f64)]) -> f64 {
  if pairs.len() < 2 {
    return 0.0;
  }
  let n = pairs.len() as f64;
  let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
  let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

  let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
  for (x, y) in pairs {
    let dx = x - mean_x;
    let dy = y - mean_y;
    cov += dx * dy;
    var_x += dx * dx;
    var_y += dy * dy;
  }

  if var_x == 0.0 || var_y == 0.0 {
    return 0.0;
  }
  let r = cov / (var_x.sqrt() * var_y.sqrt());
  if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 }
}

/// Assign ranks 1..=n by `value` descending. Ties are ordered by key
/// ascending, so every item gets a distinct rank.
pub fn rank_descending<K, I>(items: I) -> Vec<(K, u32, u64)>
where
  K: Ord,
  I: IntoIterator<Item = (K, u64)>,
{
  let mut items: Vec<(K, u64)> = items.into_iter().collect();
  items.sort_by(|(ka, va), (kb, vb)| vb.cmp(va).then_with(|| ka.cmp(kb)));
  items
    .into_iter()
    .zip(1u32..)
    .map(|((key, value), rank)| (key, rank, value))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pearson_of_identical_series_is_one() {
    let pairs: Vec<(f64, f64)> = (1..=7).map(|i| (i as f64, i as f64)).collect();
    assert!((pearson(&pairs) - 1.0).abs() < 1e-12);
  }

  #[test]
  fn pearson_of_reversed_series_is_minus_one() {
    let pairs = [(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)];
    assert!((pearson(&pairs) + 1.0).abs() < 1e-12);
  }

  #[test]
  fn pearson_known_value() {
    // x = 1,2,3,4 ; y = 2,1,4,3 → r = 0.6
    let pairs = [(1.0, 2.0), (2.0, 1.0), (3.0, 4.0), (4.0, 3.0)];
    assert!((pearson(&pairs) - 0.6).abs() < 1e-12);
  }

  #[test]
  fn pearson_degenerate_inputs_are_zero() {
    assert_eq!(pearson(&[]), 0.0);
    assert_eq!(pearson(&[(1.0, 1.0)]), 0.0);
    assert_eq!(pearson(&[(1.0, 1.0), (1.0, 2.0)]), 0.0);
    assert_eq!(pearson(&[(1.0, 5.0), (2.0, 5.0), (3.0, 5.0)]), 0.0);
  }

  #[test]
  fn rank_descending_breaks_ties_by_key() {
    let ranked = rank_descending(vec![("b", 10), ("a", 10), ("c", 30), ("d", 5)]);
    let keys: Vec<_> = ranked.iter().map(|(k, r, _)| (*k, *r)).collect();
    assert_eq!(keys, vec![("c", 1), ("a", 2), ("b", 3), ("d", 4)]);
  }

  #[test]
  fn rank_descending_empty() {
    let ranked: Vec<(String, u32, u64)> = rank_descending(Vec::new());
    assert!(ranked.is_empty());
  }
}
