//! Rating aggregator.
//!
//! Each product's rating is the count-weighted mean of its rating values over
//! the window (weight = cumulative rating count). The genre rating is the
//! unweighted mean of its products' ratings. Products whose total weight is
//! zero have no defined rating and are left out of the genre mean; a genre
//! with rating records but no weighted product reports `0.0`.

use std::collections::BTreeMap;

use crate::{
  metric::{RATIO_PRECISION, RatingMetric, round_to},
  record::{GenreId, TaggedRecord},
};

#[derive(Default)]
struct Weighted {
  sum:    f64,
  weight: f64,
}

pub fn aggregate(records: &[TaggedRecord]) -> Vec<RatingMetric> {
  let mut by_product: BTreeMap<(GenreId, &str), Weighted> = BTreeMap::new();
  for TaggedRecord { genre_id, record } in records {
    let Some(sample) = record.rating else { continue };
    let w = by_product
      .entry((*genre_id, record.product_id.as_str()))
      .or_default();
    let weight = sample.count_cumulative as f64;
    w.sum += sample.value * weight;
    w.weight += weight;
  }

  let mut by_genre: BTreeMap<GenreId, Vec<f64>> = BTreeMap::new();
  for ((genre_id, _), w) in by_product {
    let ratings = by_genre.entry(genre_id).or_default();
    if w.weight > 0.0 {
      ratings.push(w.sum / w.weight);
    }
  }

  by_genre
    .into_iter()
    .map(|(genre_id, ratings)| {
      let mean = if ratings.is_empty() {
        0.0
      } else {
        ratings.iter().sum::<f64>() / ratings.len() as f64
      };
      RatingMetric { genre_id, rating: round_to(mean, RATIO_PRECISION) }
    })
    .collect()
}
