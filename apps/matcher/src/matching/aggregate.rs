use crate::matching::weights::NormalizedWeights;
use crate::models::candidate::FacetScore;

/// `Σ weight[f] · score[f]`. Weights arrive normalized; no clamping here.
pub fn aggregate(scores: &[FacetScore], weights: &NormalizedWeights) -> f64 {
    debug_assert!((weights.sum() - 1.0).abs() < 1e-9);
    scores
        .iter()
        .map(|score| weights.weight(score.facet) * score.value)
        .sum()
}
