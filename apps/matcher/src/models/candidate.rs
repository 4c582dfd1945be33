use serde::{Deserialize, Serialize};

/// Sentinel stored in `ContactInfo::email` when no address is present.
pub const EMAIL_NOT_FOUND: &str = "Not found";

/// Rationale recorded when a model-derived score could not be obtained.
pub const RATIONALE_UNAVAILABLE: &str = "N/A";

/// One of the three independent scoring dimensions. Order is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Keywords,
    Experience,
    SoftSkills,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Keywords, Facet::Experience, Facet::SoftSkills];

    /// Label used inside model prompts.
    pub fn prompt_label(self) -> &'static str {
        match self {
            Facet::Keywords => "keywords",
            Facet::Experience => "experience",
            Facet::SoftSkills => "soft skills",
        }
    }

    /// Column header used in exports.
    pub fn column_label(self) -> &'static str {
        match self {
            Facet::Keywords => "Level 1: Keywords",
            Facet::Experience => "Level 2: Experience",
            Facet::SoftSkills => "Level 3: Inference",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Facet::Keywords => 0,
            Facet::Experience => 1,
            Facet::SoftSkills => 2,
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prompt_label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetScore {
    pub facet: Facet,
    /// Expected in 0.0 – 1.0; not clamped.
    pub value: f64,
    #[serde(default)]
    pub rationale: String,
}

impl FacetScore {
    pub fn new(facet: Facet, value: f64, rationale: impl Into<String>) -> Self {
        Self {
            facet,
            value,
            rationale: rationale.into(),
        }
    }

    /// Zero score used when a model call or reply failed for this facet.
    pub fn unavailable(facet: Facet) -> Self {
        Self::new(facet, 0.0, RATIONALE_UNAVAILABLE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// First address found, or `EMAIL_NOT_FOUND`.
    pub email: String,
    /// LinkedIn profile, else GitHub, else empty.
    pub profile_url: String,
}

/// Coarse bucket of a final score, mirroring the green / amber / red cards of the
/// screening view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score > 0.85 {
            ScoreBand::Strong
        } else if score > 0.7 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Weak
        }
    }
}

/// Scored candidate. Built once per successfully processed resume, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub name: String,
    pub final_score: f64,
    /// Ordered as `Facet::ALL`.
    pub facet_scores: Vec<FacetScore>,
    pub contact: ContactInfo,
}

impl CandidateResult {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_score(self.final_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_order_is_keywords_experience_soft_skills() {
        let indices: Vec<usize> = Facet::ALL.iter().map(|f| f.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(Facet::ALL[2].prompt_label(), "soft skills");
    }

    #[test]
    fn test_facet_serializes_snake_case() {
        let json = serde_json::to_string(&Facet::SoftSkills).unwrap();
        assert_eq!(json, r#""soft_skills""#);
    }

    #[test]
    fn test_unavailable_score_is_zero_with_na() {
        let score = FacetScore::unavailable(Facet::Experience);
        assert_eq!(score.value, 0.0);
        assert_eq!(score.rationale, "N/A");
    }

    #[test]
    fn test_score_bands_follow_thresholds() {
        assert_eq!(ScoreBand::for_score(0.9), ScoreBand::Strong);
        assert_eq!(ScoreBand::for_score(0.85), ScoreBand::Moderate);
        assert_eq!(ScoreBand::for_score(0.71), ScoreBand::Moderate);
        assert_eq!(ScoreBand::for_score(0.7), ScoreBand::Weak);
    }
}
