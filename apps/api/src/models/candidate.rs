use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const REDACTED_EMAIL: &str = "redacted@example.com";
pub const REDACTED_PHONE: &str = "REDACTED";

const MAX_YEARS_EXPERIENCE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub years_experience: f64,
    pub desired_positions: Vec<String>,
    pub location: String,
    pub tech_stack: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl CandidateProfile {
    /// A profile with every field empty, used before the form is submitted.
    pub fn blank(created_at: DateTime<Utc>) -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            years_experience: 0.0,
            desired_positions: Vec::new(),
            location: String::new(),
            tech_stack: Vec::new(),
            created_at,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            "N/A"
        } else {
            &self.full_name
        }
    }
}

/// Raw candidate form submission. List fields arrive comma-separated.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_years_experience")]
    pub years_experience: f64,
    #[serde(default)]
    pub desired_positions: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tech_stack: String,
}

fn default_years_experience() -> f64 {
    1.0
}

impl CandidateForm {
    pub fn into_profile(self, created_at: DateTime<Utc>) -> Result<CandidateProfile, AppError> {
        if !self.years_experience.is_finite()
            || !(0.0..=MAX_YEARS_EXPERIENCE).contains(&self.years_experience)
        {
            return Err(AppError::Validation(format!(
                "years_experience must be between 0 and {MAX_YEARS_EXPERIENCE}"
            )));
        }

        Ok(CandidateProfile {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            years_experience: self.years_experience,
            desired_positions: split_list(&self.desired_positions),
            location: self.location.trim().to_string(),
            tech_stack: split_list(&self.tech_stack),
            created_at,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// What gets persisted: the profile with contact fields masked, plus the question set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizedRecord {
    #[serde(flatten)]
    pub candidate: CandidateProfile,
    pub questions: Vec<String>,
}

impl AnonymizedRecord {
    pub fn new(profile: &CandidateProfile, questions: &[String]) -> Self {
        let mut candidate = profile.clone();
        if !candidate.email.is_empty() {
            candidate.email = REDACTED_EMAIL.to_string();
        }
        if !candidate.phone.is_empty() {
            candidate.phone = REDACTED_PHONE.to_string();
        }

        Self {
            candidate,
            questions: questions.to_vec(),
        }
    }
}
