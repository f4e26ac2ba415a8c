use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Environmental,
    Social,
    Governance,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Environmental, Section::Social, Section::Governance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Environmental => "Environmental",
            Section::Social => "Social",
            Section::Governance => "Governance",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single question score on the 1-3 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum QuestionScore {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl QuestionScore {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for QuestionScore {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(QuestionScore::Low),
            2 => Ok(QuestionScore::Medium),
            3 => Ok(QuestionScore::High),
            other => Err(format!("question score must be 1, 2 or 3, got {}", other)),
        }
    }
}

impl From<QuestionScore> for u8 {
    fn from(score: QuestionScore) -> Self {
        score.value()
    }
}

/// Per-question scores, unset where a question has not been scored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EsgScores {
    #[serde(default)]
    pub environmental: [Option<QuestionScore>; 7],
    #[serde(default)]
    pub social: [Option<QuestionScore>; 12],
    #[serde(default)]
    pub governance: [Option<QuestionScore>; 7],
}

impl EsgScores {
    pub fn section(&self, section: Section) -> &[Option<QuestionScore>] {
        match section {
            Section::Environmental => &self.environmental,
            Section::Social => &self.social,
            Section::Governance => &self.governance,
        }
    }

    pub fn section_mut(&mut self, section: Section) -> &mut [Option<QuestionScore>] {
        match section {
            Section::Environmental => &mut self.environmental,
            Section::Social => &mut self.social,
            Section::Governance => &mut self.governance,
        }
    }
}

/// The four headline percentages (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EsgTotals {
    pub environmental_total_score: f64,
    pub social_total_score: f64,
    pub governance_total_score: f64,
    pub overall_score: f64,
}

impl EsgTotals {
    pub fn section(&self, section: Section) -> f64 {
        match section {
            Section::Environmental => self.environmental_total_score,
            Section::Social => self.social_total_score,
            Section::Governance => self.governance_total_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    Draft,
    Submitted,
}

/// A stored score sheet. Drafts carry no `scored_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub assessment_id: String,
    pub scores: EsgScores,
    pub environmental_total_score: Option<f64>,
    pub social_total_score: Option<f64>,
    pub governance_total_score: Option<f64>,
    pub overall_score: Option<f64>,
    pub scored_by: String,
    pub scored_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl ScoreSubmission {
    pub fn status(&self) -> ScoreStatus {
        if self.scored_at.is_some() {
            ScoreStatus::Submitted
        } else {
            ScoreStatus::Draft
        }
    }
}

/// Output of the automated assessment: derived scores, totals and advice text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub scores: EsgScores,
    pub totals: EsgTotals,
    pub recommendations: Recommendations,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recommendations {
    pub environmental_strengths: String,
    pub environmental_improvements: String,
    pub social_strengths: String,
    pub social_improvements: String,
    pub governance_strengths: String,
    pub governance_improvements: String,
    pub overall_recommendations: String,
}
