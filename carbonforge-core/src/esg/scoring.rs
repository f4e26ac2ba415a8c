use super::{overall, question_weights, section_weight};
use crate::error::CarbonforgeError;
use carbonforge_schemas::esg::{
    EsgScores, EsgTotals, QuestionScore, ScoreSubmission, Section,
};
use chrono::{DateTime, Utc};

/// Weighted score of one section as a fraction in [0, 1].
///
/// Unscored questions add nothing, so the result is normalised by the full
/// section weight: a partly scored section can never reach 1.
pub fn section_score(section: Section, scores: &EsgScores) -> f64 {
    let weighted: u32 = scores
        .section(section)
        .iter()
        .zip(question_weights(section))
        .filter_map(|(score, weight)| score.map(|s| u32::from(s.value()) * weight))
        .sum();
    f64::from(weighted) / f64::from(section_weight(section) * 3)
}

/// Section and overall percentages for a reviewer's score sheet.
pub fn score_sheet(scores: &EsgScores) -> EsgTotals {
    let environmental = section_score(Section::Environmental, scores) * 100.0;
    let social = section_score(Section::Social, scores) * 100.0;
    let governance = section_score(Section::Governance, scores) * 100.0;
    EsgTotals {
        environmental_total_score: environmental,
        social_total_score: social,
        governance_total_score: governance,
        overall_score: overall(environmental, social, governance),
    }
}

/// Sets question `question` (1-based) of `section`.
pub fn set_score(
    scores: &mut EsgScores,
    section: Section,
    question: usize,
    score: Option<QuestionScore>,
) -> Result<(), CarbonforgeError> {
    let slots = scores.section_mut(section);
    let slot = question
        .checked_sub(1)
        .and_then(|index| slots.get_mut(index))
        .ok_or_else(|| CarbonforgeError::QuestionOutOfRange {
            section: section.to_string(),
            question,
        })?;
    *slot = score;
    Ok(())
}

fn non_zero(value: f64) -> Option<f64> {
    (value != 0.0).then_some(value)
}

/// A work-in-progress save: zero totals are left empty and `scored_at` is unset.
pub fn draft(
    assessment_id: &str,
    scores: EsgScores,
    scored_by: &str,
    now: DateTime<Utc>,
) -> ScoreSubmission {
    let totals = score_sheet(&scores);
    ScoreSubmission {
        assessment_id: assessment_id.to_string(),
        scores,
        environmental_total_score: non_zero(totals.environmental_total_score),
        social_total_score: non_zero(totals.social_total_score),
        governance_total_score: non_zero(totals.governance_total_score),
        overall_score: non_zero(totals.overall_score),
        scored_by: scored_by.to_string(),
        scored_at: None,
        updated_at: now,
    }
}

/// A final save: every total is recorded and `scored_at` is set.
pub fn submit(
    assessment_id: &str,
    scores: EsgScores,
    scored_by: &str,
    now: DateTime<Utc>,
) -> ScoreSubmission {
    let totals = score_sheet(&scores);
    ScoreSubmission {
        assessment_id: assessment_id.to_string(),
        scores,
        environmental_total_score: Some(totals.environmental_total_score),
        social_total_score: Some(totals.social_total_score),
        governance_total_score: Some(totals.governance_total_score),
        overall_score: Some(totals.overall_score),
        scored_by: scored_by.to_string(),
        scored_at: Some(now),
        updated_at: now,
    }
}
