use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;
use crate::models::candidate::Facet;

/// Raw, user-supplied facet weights. Need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub keywords: f64,
    pub experience: f64,
    pub soft_skills: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            keywords: 0.5,
            experience: 0.3,
            soft_skills: 0.2,
        }
    }
}

impl WeightConfig {
    pub fn get(&self, facet: Facet) -> f64 {
        match facet {
            Facet::Keywords => self.keywords,
            Facet::Experience => self.experience,
            Facet::SoftSkills => self.soft_skills,
        }
    }

    /// Divides every weight by the total. Negative or non-finite weights and a
    /// zero total are rejected instead of producing NaN scores.
    pub fn normalize(&self) -> Result<NormalizedWeights, ConfigurationError> {
        for facet in Facet::ALL {
            let value = self.get(facet);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidWeight { facet, value });
            }
        }

        let total = self.keywords + self.experience + self.soft_skills;
        if total <= 0.0 || !total.is_finite() {
            return Err(ConfigurationError::ZeroWeightSum(total));
        }

        Ok(NormalizedWeights {
            keywords: self.keywords / total,
            experience: self.experience / total,
            soft_skills: self.soft_skills / total,
        })
    }
}

/// Weights summing to 1.0. Only obtainable through `WeightConfig::normalize`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedWeights {
    keywords: f64,
    experience: f64,
    soft_skills: f64,
}

impl NormalizedWeights {
    pub fn weight(&self, facet: Facet) -> f64 {
        match facet {
            Facet::Keywords => self.keywords,
            Facet::Experience => self.experience,
            Facet::SoftSkills => self.soft_skills,
        }
    }

    pub fn sum(&self) -> f64 {
        self.keywords + self.experience + self.soft_skills
    }
}
