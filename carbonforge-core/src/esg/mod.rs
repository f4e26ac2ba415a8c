//! ESG scoring: weighted section scores from 1-3 question scores, either
//! entered by a reviewer or derived from questionnaire answers.

mod answers;
pub mod assessment;
pub mod recommendations;
pub mod scoring;

use carbonforge_schemas::esg::Section;

/// Question weights in hundredths. Each section's weights sum to its target
/// weight: 30 for Environmental, 35 for Social and Governance.
pub const ENVIRONMENTAL_WEIGHTS: [u32; 7] = [5, 4, 4, 4, 4, 5, 4];
pub const SOCIAL_WEIGHTS: [u32; 12] = [3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 2];
pub const GOVERNANCE_WEIGHTS: [u32; 7] = [5, 5, 5, 5, 5, 5, 5];

pub fn question_weights(section: Section) -> &'static [u32] {
    match section {
        Section::Environmental => &ENVIRONMENTAL_WEIGHTS,
        Section::Social => &SOCIAL_WEIGHTS,
        Section::Governance => &GOVERNANCE_WEIGHTS,
    }
}

/// Section weight in hundredths of the overall score.
pub fn section_weight(section: Section) -> u32 {
    match section {
        Section::Environmental => 30,
        Section::Social | Section::Governance => 35,
    }
}

/// `E * 0.30 + S * 0.35 + G * 0.35`.
pub fn overall(environmental: f64, social: f64, governance: f64) -> f64 {
    (environmental * f64::from(section_weight(Section::Environmental))
        + social * f64::from(section_weight(Section::Social))
        + governance * f64::from(section_weight(Section::Governance)))
        / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_weights_sum_to_section_weight() {
        for section in Section::ALL {
            let sum: u32 = question_weights(section).iter().sum();
            assert_eq!(sum, section_weight(section), "{section}");
        }
        let total: u32 = Section::ALL.iter().map(|s| section_weight(*s)).sum();
        assert_eq!(total, 100);
    }
}
