// Copyright @yucwang 2026

use crate::core::rng::Sampler;
use crate::math::constants::Float;

/// Discrete distribution sampled in O(1) after Vose's O(n) preprocessing.
pub struct AliasMethod {
    probability: Vec<Float>,
    alias: Vec<usize>,
    weights: Vec<Float>,
}

impl AliasMethod {
    /// Builds the table from non-negative weights. Returns `None` when there
    /// is nothing to sample from (empty input or zero total weight).
    pub fn new(raw_weights: &[Float]) -> Option<Self> {
        let total: Float = raw_weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
        if raw_weights.is_empty() || !(total > 0.0) || !total.is_finite() {
            return None;
        }

        let n = raw_weights.len();
        let weights: Vec<Float> = raw_weights.iter()
            .map(|w| if w.is_finite() && *w > 0.0 { *w / total } else { 0.0 })
            .collect();

        let mut scaled: Vec<Float> = weights.iter().map(|w| w * n as Float).collect();
        let mut probability = vec![1.0; n];
        let mut alias: Vec<usize> = (0..n).collect();

        let mut small = Vec::with_capacity(n);
        let mut large = Vec::with_capacity(n);
        for (i, p) in scaled.iter().enumerate() {
            if *p < 1.0 {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        while let (Some(&s), Some(&l)) = (small.last(), large.last()) {
            small.pop();
            large.pop();

            probability[s] = scaled[s];
            alias[s] = l;

            scaled[l] -= 1.0 - scaled[s];
            if scaled[l] < 1.0 {
                small.push(l);
            } else {
                large.push(l);
            }
        }

        // Leftovers are 1 up to rounding.
        for i in large.into_iter().chain(small.into_iter()) {
            probability[i] = 1.0;
        }

        Some(Self { probability, alias, weights })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Normalized weight of index `i`.
    pub fn weight(&self, i: usize) -> Float {
        self.weights[i]
    }

    pub fn sample(&self, sampler: &mut Sampler) -> usize {
        let i = sampler.next_index(self.probability.len());
        if sampler.next_float() < self.probability[i] {
            i
        } else {
            self.alias[i]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frequencies(alias: &AliasMethod, draws: usize, seed: u64) -> Vec<Float> {
        let mut sampler = Sampler::new(seed);
        let mut counts = vec![0usize; alias.len()];
        for _ in 0..draws {
            counts[alias.sample(&mut sampler)] += 1;
        }
        counts.iter().map(|c| *c as Float / draws as Float).collect()
    }

    #[test]
    fn test_empirical_frequencies() {
        let alias = AliasMethod::new(&[0.5, 0.3, 0.2]).unwrap();
        let freq = frequencies(&alias, 1_000_000, 17);
        for (f, expected) in freq.iter().zip([0.5, 0.3, 0.2]) {
            assert!((f - expected).abs() < 0.01, "{} vs {}", f, expected);
        }
    }

    #[test]
    fn test_unnormalized_weights() {
        let alias = AliasMethod::new(&[6.0, 0.0, 2.0]).unwrap();
        assert!((alias.weight(0) - 0.75).abs() < 1e-12);
        assert_eq!(alias.weight(1), 0.0);
        assert!((alias.weight(2) - 0.25).abs() < 1e-12);

        let freq = frequencies(&alias, 200_000, 3);
        assert_eq!(freq[1], 0.0);
        assert!((freq[0] - 0.75).abs() < 0.01);
    }

    #[test]
    fn test_single_and_empty() {
        let alias = AliasMethod::new(&[3.0]).unwrap();
        let mut sampler = Sampler::new(1);
        for _ in 0..10 {
            assert_eq!(alias.sample(&mut sampler), 0);
        }

        assert!(AliasMethod::new(&[]).is_none());
        assert!(AliasMethod::new(&[0.0, 0.0]).is_none());
    }
}
