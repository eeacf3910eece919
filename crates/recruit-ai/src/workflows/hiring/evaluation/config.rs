use serde::{Deserialize, Serialize};

use super::super::criteria::{SkillPriority, ValidationError};

/// Relative importance of the two sub-scores in the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub experience: f64,
    pub education: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            experience: 0.5,
            education: 0.5,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let usable = |weight: f64| weight.is_finite() && weight >= 0.0;
        if !usable(self.experience)
            || !usable(self.education)
            || self.experience + self.education <= 0.0
        {
            return Err(ValidationError::InvalidWeights {
                experience: self.experience,
                education: self.education,
            });
        }
        Ok(())
    }
}

/// Points awarded per matched required skill, by priority.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillBonus {
    pub critical: f64,
    pub important: f64,
    pub nice_to_have: f64,
}

impl Default for SkillBonus {
    fn default() -> Self {
        Self {
            critical: 15.0,
            important: 10.0,
            nice_to_have: 5.0,
        }
    }
}

impl SkillBonus {
    pub fn for_priority(&self, priority: SkillPriority) -> f64 {
        match priority {
            SkillPriority::Critical => self.critical,
            SkillPriority::Important => self.important,
            SkillPriority::NiceToHave => self.nice_to_have,
        }
    }
}

/// Education sub-score parameters.
///
/// With a required level, a candidate at that level starts from `required_baseline`, gains
/// `step_above` per level above it, and loses `step_below` per level below it. Without a
/// requirement the score is `open_baseline + open_step * rank`. Unknown levels get
/// `unknown_baseline`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationScale {
    pub required_baseline: f64,
    pub step_above: f64,
    pub step_below: f64,
    pub open_baseline: f64,
    pub open_step: f64,
    pub unknown_baseline: f64,
    pub major_bonus: f64,
    pub university_bonus: f64,
}

impl Default for EducationScale {
    fn default() -> Self {
        Self {
            required_baseline: 70.0,
            step_above: 10.0,
            step_below: 20.0,
            open_baseline: 50.0,
            open_step: 10.0,
            unknown_baseline: 50.0,
            major_bonus: 15.0,
            university_bonus: 15.0,
        }
    }
}

/// Scoring model configuration. Defaults reproduce the reference point values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    /// Experience score of a candidate who meets or exceeds the minimum tenure.
    pub experience_baseline: f64,
    pub skill_bonus: SkillBonus,
    pub target_company_bonus: f64,
    pub education: EducationScale,
    /// Deducted from the overall score per failed age, gender, or military check that did
    /// not reject the candidate.
    pub soft_fail_penalty: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            experience_baseline: 100.0,
            skill_bonus: SkillBonus::default(),
            target_company_bonus: 10.0,
            education: EducationScale::default(),
            soft_fail_penalty: 5.0,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.weights.validate()?;

        let parameters = [
            ("experience_baseline", self.experience_baseline),
            ("skill_bonus.critical", self.skill_bonus.critical),
            ("skill_bonus.important", self.skill_bonus.important),
            ("skill_bonus.nice_to_have", self.skill_bonus.nice_to_have),
            ("target_company_bonus", self.target_company_bonus),
            ("education.required_baseline", self.education.required_baseline),
            ("education.step_above", self.education.step_above),
            ("education.step_below", self.education.step_below),
            ("education.open_baseline", self.education.open_baseline),
            ("education.open_step", self.education.open_step),
            ("education.unknown_baseline", self.education.unknown_baseline),
            ("education.major_bonus", self.education.major_bonus),
            ("education.university_bonus", self.education.university_bonus),
            ("soft_fail_penalty", self.soft_fail_penalty),
        ];

        for (name, value) in parameters {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidScoringParameter(name));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_weights_are_rejected() {
        let weights = ScoringWeights {
            experience: 0.0,
            education: 0.0,
        };
        assert_eq!(
            weights.validate(),
            Err(ValidationError::InvalidWeights {
                experience: 0.0,
                education: 0.0
            })
        );
    }

    #[test]
    fn partial_weights_fill_from_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{ "weights": { "experience": 0.7 } }"#).expect("config parses");
        assert_eq!(config.weights.experience, 0.7);
        assert_eq!(config.weights.education, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn single_sided_weights_are_allowed() {
        let weights = ScoringWeights {
            experience: 1.0,
            education: 0.0,
        };
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn negative_parameters_name_the_offender() {
        let config = ScoringConfig {
            soft_fail_penalty: -1.0,
            ..ScoringConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidScoringParameter("soft_fail_penalty"))
        );
    }
}
