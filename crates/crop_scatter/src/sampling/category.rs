//! Weighted category sampling.
//!
//! The same list of [`WeightedCategory`] values can be consumed two ways, and the caller
//! picks one explicitly:
//! - [exact_counts]: partition a fixed population into integer counts that sum exactly to
//!   the requested total.
//! - [sample_one]: a single stochastic draw proportional to weight.
//!
//! [`VariantChooser`] wraps the per-object variant choice used by the grid placer.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::RngCore;

use crate::error::{Error, Result};
use crate::sampling::{index, rand01_f64};

pub type CategoryId = String;

/// A category identifier with a non-negative weight.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedCategory {
    pub id: CategoryId,
    pub weight: f64,
}

impl WeightedCategory {
    pub fn new(id: impl Into<CategoryId>, weight: f64) -> Self {
        Self {
            id: id.into(),
            weight,
        }
    }
}

/// Checks that the list is non-empty and every weight is finite and non-negative.
pub fn validate_categories(categories: &[WeightedCategory]) -> Result<()> {
    if categories.is_empty() {
        return Err(Error::EmptyCategorySet);
    }
    for c in categories {
        if !c.weight.is_finite() || c.weight < 0.0 {
            return Err(Error::InvalidWeight {
                id: c.id.clone(),
                weight: c.weight,
            });
        }
    }
    Ok(())
}

/// Integer population per category, in the input order of the categories.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    entries: Vec<(CategoryId, usize)>,
}

impl CategoryCounts {
    pub(crate) fn zeroed(categories: &[WeightedCategory]) -> Self {
        Self {
            entries: categories.iter().map(|c| (c.id.clone(), 0)).collect(),
        }
    }

    pub(crate) fn increment(&mut self, position: usize) {
        if let Some(entry) = self.entries.get_mut(position) {
            entry.1 += 1;
        }
    }

    /// Count of the first category with the given id.
    pub fn get(&self, id: &str) -> Option<usize> {
        self.entries.iter().find(|(c, _)| c == id).map(|(_, n)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, usize)> {
        self.entries.iter().map(|(c, n)| (c, *n))
    }

    /// Counts alone, in category order.
    pub fn counts(&self) -> Vec<usize> {
        self.entries.iter().map(|(_, n)| *n).collect()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_inner(self) -> Vec<(CategoryId, usize)> {
        self.entries
    }

    /// Counts occurrences of each id, in first-seen order.
    pub fn tally<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a CategoryId>,
    {
        let mut entries: Vec<(CategoryId, usize)> = Vec::new();
        for id in ids {
            match entries.iter_mut().find(|(c, _)| c == id) {
                Some(entry) => entry.1 += 1,
                None => entries.push((id.clone(), 1)),
            }
        }
        Self { entries }
    }
}

/// Splits `total` into integer counts proportional to the category weights.
///
/// Each count is `round(weight * total)` (ties to even). The residual
/// `total - sum(rounded)` is added entirely to the last category, so the counts always
/// sum to `total`. If a negative residual would push the last count below zero (only
/// possible when weights sum to more than one) the shortfall is taken from the preceding
/// categories, last first.
pub fn exact_counts(categories: &[WeightedCategory], total: usize) -> Result<CategoryCounts> {
    validate_categories(categories)?;

    let mut counts: Vec<i64> = categories
        .iter()
        .map(|c| (c.weight * total as f64).round_ties_even() as i64)
        .collect();

    let assigned: i64 = counts.iter().sum();
    let residual = total as i64 - assigned;
    if let Some(last) = counts.last_mut() {
        *last += residual;
    }

    let mut deficit = 0i64;
    for count in counts.iter_mut().rev() {
        if *count < 0 {
            deficit += -*count;
            *count = 0;
        } else if deficit > 0 {
            let take = deficit.min(*count);
            *count -= take;
            deficit -= take;
        }
    }
    debug_assert_eq!(deficit, 0);

    Ok(CategoryCounts {
        entries: categories
            .iter()
            .zip(counts)
            .map(|(c, n)| (c.id.clone(), n as usize))
            .collect(),
    })
}

/// Draws one category with probability proportional to its weight.
///
/// Zero-weight categories are valid and never drawn.
pub fn sample_one<'a, R: RngCore>(
    categories: &'a [WeightedCategory],
    rng: &mut R,
) -> Result<&'a CategoryId> {
    sample_position(categories, rng).map(|i| &categories[i].id)
}

/// Like [sample_one] but returns the index of the drawn category.
pub(crate) fn sample_position(
    categories: &[WeightedCategory],
    rng: &mut dyn RngCore,
) -> Result<usize> {
    validate_categories(categories)?;

    let total_weight: f64 = categories.iter().map(|c| c.weight).sum();
    if total_weight <= 0.0 {
        return Err(Error::InvalidConfig(
            "category weights sum to zero; nothing can be drawn".into(),
        ));
    }

    let mut roll = rand01_f64(rng) * total_weight;
    for (i, c) in categories.iter().enumerate() {
        if c.weight <= 0.0 {
            continue;
        }
        if roll < c.weight {
            return Ok(i);
        }
        roll -= c.weight;
    }

    // Floating point leftovers: fall back to the last drawable category.
    categories
        .iter()
        .rposition(|c| c.weight > 0.0)
        .ok_or(Error::EmptyCategorySet)
}

/// Per-object variant choice for grid-placed crops.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum VariantChooser {
    /// Always the same variant; draws nothing from the RNG.
    Fixed(CategoryId),
    /// Uniform choice among the listed variants. A single-entry list draws nothing.
    Uniform(Vec<CategoryId>),
    /// Weighted choice through [sample_one].
    Weighted(Vec<WeightedCategory>),
}

impl VariantChooser {
    pub fn validate(&self) -> Result<()> {
        match self {
            VariantChooser::Fixed(_) => Ok(()),
            VariantChooser::Uniform(ids) if ids.is_empty() => Err(Error::EmptyCategorySet),
            VariantChooser::Uniform(_) => Ok(()),
            VariantChooser::Weighted(categories) => {
                validate_categories(categories)?;
                if categories.iter().all(|c| c.weight == 0.0) {
                    return Err(Error::InvalidConfig(
                        "variant weights sum to zero".into(),
                    ));
                }
                Ok(())
            }
        }
    }

    pub fn choose<R: RngCore>(&self, rng: &mut R) -> Result<CategoryId> {
        match self {
            VariantChooser::Fixed(id) => Ok(id.clone()),
            VariantChooser::Uniform(ids) => match ids.len() {
                0 => Err(Error::EmptyCategorySet),
                1 => Ok(ids[0].clone()),
                n => Ok(ids[index(rng, n)].clone()),
            },
            VariantChooser::Weighted(categories) => sample_one(categories, rng).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::tests::FixedRng;

    fn taraxacum() -> Vec<WeightedCategory> {
        vec![
            WeightedCategory::new("A", 0.4),
            WeightedCategory::new("B", 0.3),
            WeightedCategory::new("C", 0.2),
            WeightedCategory::new("D", 0.1),
        ]
    }

    #[test]
    fn exact_counts_match_weights_without_residual() {
        let counts = exact_counts(&taraxacum(), 3000).unwrap();
        assert_eq!(counts.counts(), vec![1200, 900, 600, 300]);
        assert_eq!(counts.get("C"), Some(600));
        assert_eq!(counts.total(), 3000);
    }

    #[test]
    fn small_totals_still_sum_exactly() {
        let counts = exact_counts(&taraxacum(), 7).unwrap();
        assert_eq!(counts.counts(), vec![3, 2, 1, 1]);

        for total in 0..200 {
            assert_eq!(exact_counts(&taraxacum(), total).unwrap().total(), total);
        }
    }

    #[test]
    fn residual_lands_on_last_category_only() {
        // 1/3 * 10 rounds to 3 three times; the missing one goes to the last entry.
        let thirds = vec![
            WeightedCategory::new("x", 1.0 / 3.0),
            WeightedCategory::new("y", 1.0 / 3.0),
            WeightedCategory::new("z", 1.0 / 3.0),
        ];
        assert_eq!(exact_counts(&thirds, 10).unwrap().counts(), vec![3, 3, 4]);

        // 2 * 0.25 = 0.5 rounds to 0 (ties to even) four times; the last absorbs both.
        let quarters = vec![
            WeightedCategory::new("a", 0.25),
            WeightedCategory::new("b", 0.25),
            WeightedCategory::new("c", 0.25),
            WeightedCategory::new("d", 0.25),
        ];
        assert_eq!(
            exact_counts(&quarters, 2).unwrap().counts(),
            vec![0, 0, 0, 2]
        );
    }

    #[test]
    fn unnormalized_weights_keep_the_total() {
        let heavy = vec![
            WeightedCategory::new("a", 2.0),
            WeightedCategory::new("b", 1.0),
        ];
        let counts = exact_counts(&heavy, 4).unwrap();
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.counts(), vec![4, 0]);
    }

    #[test]
    fn zero_weight_categories_get_nothing() {
        let mut cats = taraxacum();
        cats.push(WeightedCategory::new("E", 0.0));
        let counts = exact_counts(&cats, 3000).unwrap();
        assert_eq!(counts.counts(), vec![1200, 900, 600, 300, 0]);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(matches!(exact_counts(&[], 10), Err(Error::EmptyCategorySet)));

        let negative = vec![WeightedCategory::new("bad", -0.1)];
        assert!(matches!(
            exact_counts(&negative, 10),
            Err(Error::InvalidWeight { .. })
        ));

        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample_one(&negative, &mut rng),
            Err(Error::InvalidWeight { .. })
        ));
        assert!(matches!(
            sample_one(&[], &mut rng),
            Err(Error::EmptyCategorySet)
        ));
    }

    #[test]
    fn sample_one_follows_cumulative_weights() {
        let cats = taraxacum();
        let mut first = FixedRng { value: 0 };
        assert_eq!(sample_one(&cats, &mut first).unwrap(), "A");

        let mut last = FixedRng { value: u32::MAX };
        assert_eq!(sample_one(&cats, &mut last).unwrap(), "D");
    }

    #[test]
    fn sample_one_never_draws_zero_weight() {
        let cats = vec![
            WeightedCategory::new("never", 0.0),
            WeightedCategory::new("always", 1.0),
            WeightedCategory::new("never_either", 0.0),
        ];
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            assert_eq!(sample_one(&cats, &mut rng).unwrap(), "always");
        }
        let mut low = FixedRng { value: 0 };
        assert_eq!(sample_one(&cats, &mut low).unwrap(), "always");
        let mut high = FixedRng { value: u32::MAX };
        assert_eq!(sample_one(&cats, &mut high).unwrap(), "always");
    }

    #[test]
    fn sample_one_frequencies_track_weights() {
        let cats = taraxacum();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut hits = [0usize; 4];
        let n = 20_000;
        for _ in 0..n {
            let i = sample_position(&cats, &mut rng).unwrap();
            hits[i] += 1;
        }
        for (h, c) in hits.iter().zip(&cats) {
            let p = *h as f64 / n as f64;
            assert!((p - c.weight).abs() < 0.02, "{} drawn with p={p}", c.id);
        }
    }

    #[test]
    fn all_zero_weights_cannot_be_sampled() {
        let cats = vec![WeightedCategory::new("a", 0.0)];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample_one(&cats, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn single_variant_chooser_is_deterministic() {
        let mut rng = FixedRng { value: 12345 };
        let chooser = VariantChooser::Uniform(vec!["maize_small".into()]);
        assert_eq!(chooser.choose(&mut rng).unwrap(), "maize_small");

        let fixed = VariantChooser::Fixed("maize_big".into());
        assert_eq!(fixed.choose(&mut rng).unwrap(), "maize_big");
    }

    #[test]
    fn uniform_chooser_reaches_every_variant() {
        let chooser = VariantChooser::Uniform(vec!["a".into(), "b".into(), "c".into()]);
        let mut rng = StdRng::seed_from_u64(77);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(chooser.choose(&mut rng).unwrap());
        }
        assert_eq!(seen.len(), 3);
        assert!(VariantChooser::Uniform(Vec::new()).validate().is_err());
    }

    #[test]
    fn tally_keeps_first_seen_order() {
        let ids: Vec<CategoryId> = ["b", "a", "b", "c", "b"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let counts = CategoryCounts::tally(&ids);
        assert_eq!(
            counts.into_inner(),
            vec![("b".into(), 3), ("a".into(), 1), ("c".into(), 1)]
        );
    }
}
