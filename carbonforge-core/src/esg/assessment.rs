//! Automated scoring of questionnaire answers.
//!
//! Every question maps to 1 (below average), 2 (meets basic requirements),
//! 3 (best practice) or, for questions that need explicit answers, no score
//! when nothing was answered.

use super::{
    answers::{count_yes, has_data, is_yes, number},
    overall, question_weights, recommendations::recommend,
};
use crate::units::round2;
use carbonforge_schemas::{
    assessment::EsgAssessment,
    esg::{AssessmentResult, EsgScores, EsgTotals, QuestionScore, Section},
};
use tracing::debug;

fn level(score: u8) -> QuestionScore {
    match score {
        0 | 1 => QuestionScore::Low,
        2 => QuestionScore::Medium,
        _ => QuestionScore::High,
    }
}

/// 3 at or above `good`, 2 at or above `average`, otherwise 1.
fn at_least(value: f64, good: f64, average: f64) -> u8 {
    if value >= good {
        3
    } else if value >= average {
        2
    } else {
        1
    }
}

/// 3 at or below `good`, 2 at or below `average`, otherwise 1.
fn at_most(value: f64, good: f64, average: f64) -> u8 {
    if value <= good {
        3
    } else if value <= average {
        2
    } else {
        1
    }
}

fn yes_no(yes: bool) -> u8 {
    if yes {
        3
    } else {
        1
    }
}

fn policy_count_score(count: usize) -> u8 {
    match count {
        0 => 1,
        1..=3 => 2,
        _ => 3,
    }
}

pub(super) fn percent(part: f64, whole: f64) -> f64 {
    part / whole * 100.0
}

// Environmental

fn ghg_emissions(d: &EsgAssessment) -> Option<u8> {
    if !has_data(&[&d.ghg_baseline, &d.ghg_emissions, &d.ghg_reduction_initiatives]) {
        return None;
    }
    let baseline = is_yes(&d.ghg_baseline);
    let reduction = is_yes(&d.ghg_reduction_initiatives);
    let emissions = number(&d.ghg_emissions).is_some();

    Some(if baseline && reduction && emissions {
        3
    } else if baseline || reduction || emissions {
        2
    } else {
        1
    })
}

pub(super) fn fossil_share(d: &EsgAssessment) -> f64 {
    number(&d.energy_diesel).unwrap_or(0.0) + number(&d.energy_gas).unwrap_or(0.0)
}

fn energy_efficiency(d: &EsgAssessment) -> u8 {
    if !is_yes(&d.energy_visibility) {
        return 1;
    }
    let fossil = fossil_share(d);
    match number(&d.energy_renewable) {
        Some(renewable) if renewable >= 50.0 && fossil <= 20.0 => 3,
        _ => 2,
    }
}

fn water_management(d: &EsgAssessment) -> u8 {
    match (number(&d.water_withdrawal), number(&d.water_reclaimed)) {
        (Some(withdrawal), Some(reclaimed)) if withdrawal != 0.0 => {
            at_least(percent(reclaimed, withdrawal), 50.0, 25.0)
        }
        _ => 1,
    }
}

fn waste_management(d: &EsgAssessment) -> u8 {
    number(&d.waste_treated)
        .map(|treated| at_least(treated, 80.0, 50.0))
        .unwrap_or(1)
}

pub(super) fn environmental_policies(d: &EsgAssessment) -> usize {
    count_yes(&[
        &d.environmental_policy,
        &d.waste_management_policy,
        &d.energy_management_policy,
        &d.water_management_policy,
        &d.recycling_policy,
    ])
}

fn environmental_operations(d: &EsgAssessment) -> u8 {
    policy_count_score(environmental_policies(d))
}

fn environmental_oversight(d: &EsgAssessment) -> u8 {
    match (is_yes(&d.board_climate_oversight), is_yes(&d.management_climate_oversight)) {
        (true, true) => 3,
        (false, false) => 1,
        _ => 2,
    }
}

fn sustainable_sourcing(d: &EsgAssessment) -> Option<u8> {
    has_data(&[&d.sustainable_sourcing]).then(|| yes_no(is_yes(&d.sustainable_sourcing)))
}

// Social

fn pay_ratio(d: &EsgAssessment) -> u8 {
    match (number(&d.median_male_compensation), number(&d.median_female_compensation)) {
        (Some(male), Some(female)) if male != 0.0 && female != 0.0 => {
            at_least(percent(female, male), 95.0, 85.0)
        }
        _ => 1,
    }
}

fn ceo_pay_ratio(d: &EsgAssessment) -> u8 {
    let reports = is_yes(&d.ceo_pay_ratio_reporting);
    match number(&d.ceo_pay_ratio) {
        None if reports => 2,
        None => 1,
        Some(ratio) => (at_most(ratio, 20.0, 50.0) + u8::from(reports)).min(3),
    }
}

fn turnover(d: &EsgAssessment) -> u8 {
    let rates: Vec<f64> = [
        &d.full_time_turnover,
        &d.part_time_turnover,
        &d.consultants_turnover,
    ]
    .into_iter()
    .filter_map(number)
    .collect();
    let average = if rates.is_empty() {
        0.0
    } else {
        rates.iter().sum::<f64>() / rates.len() as f64
    };

    if average == 0.0 {
        1
    } else {
        at_most(average, 10.0, 20.0)
    }
}

pub(super) fn senior_women_share(d: &EsgAssessment) -> Option<f64> {
    let men = number(&d.men_senior_executive)?;
    let women = number(&d.women_senior_executive)?;
    (men + women > 0.0).then(|| percent(women, men + women))
}

fn diversity(d: &EsgAssessment) -> u8 {
    if !is_yes(&d.diversity_inclusion_policy) {
        return 1;
    }
    let mut score = senior_women_share(d)
        .map(|pct| at_least(pct, 40.0, 30.0))
        .unwrap_or(1);

    if let (Some(total), Some(women)) = (number(&d.total_headcount), number(&d.women_headcount)) {
        if total > 0.0 {
            let pct = percent(women, total);
            score = score.max(if (40.0..=60.0).contains(&pct) { 3 } else { 2 });
        }
    }

    if number(&d.differently_abled_workforce).is_some_and(|n| n > 0.0) {
        score = (score + 1).min(3);
    }
    score
}

fn temporary_workers(d: &EsgAssessment) -> u8 {
    match number(&d.total_headcount) {
        Some(total) if total != 0.0 => {
            let temporary = number(&d.temporary_workers).unwrap_or(0.0)
                + number(&d.consultants).unwrap_or(0.0);
            at_most(percent(temporary, total), 10.0, 25.0)
        }
        _ => 1,
    }
}

/// Resolved share of reported cases, when any were reported.
pub(super) fn resolution_rate(reported: f64, resolved: Option<f64>) -> Option<f64> {
    (reported > 0.0).then(|| resolved.map(|r| percent(r, reported))).flatten()
}

fn harassment_and_grievance(d: &EsgAssessment) -> u8 {
    let policy = is_yes(&d.anti_harassment_policy);
    let grievance = is_yes(&d.grievance_mechanism);
    if !policy && !grievance {
        return 1;
    }

    let mut score = if policy && grievance { 2 } else { 1 };
    let cases = [
        (&d.harassment_cases_reported, &d.harassment_cases_resolved),
        (&d.grievance_cases_reported, &d.grievance_cases_resolved),
    ];
    for (reported, resolved) in cases {
        let rate = number(reported).and_then(|r| resolution_rate(r, number(resolved)));
        match rate {
            Some(rate) if rate >= 90.0 => score = 3,
            Some(rate) if rate >= 70.0 => score = score.max(2),
            _ => {}
        }
    }
    score
}

fn health_and_safety(d: &EsgAssessment) -> u8 {
    if !is_yes(&d.health_safety_policy) {
        return 1;
    }
    let mut score = if is_yes(&d.hse_management_system) { 3 } else { 2 };

    let fatalities = number(&d.fatalities).unwrap_or(0.0);
    let ltis = number(&d.ltis).unwrap_or(0.0);
    if fatalities > 0.0 {
        score = 1;
    } else if ltis > 0.0 {
        score = score.min(2);
    }

    if let Some(trir) = number(&d.trir) {
        if trir <= 1.0 {
            score = 3;
        } else if trir <= 3.0 {
            score = score.max(2);
        } else {
            score = score.min(2);
        }
    }
    score
}

fn child_forced_labor(d: &EsgAssessment) -> Option<u8> {
    has_data(&[&d.child_forced_labor_policy]).then(|| yes_no(is_yes(&d.child_forced_labor_policy)))
}

fn human_rights(d: &EsgAssessment) -> Option<u8> {
    has_data(&[&d.human_rights_policy]).then(|| yes_no(is_yes(&d.human_rights_policy)))
}

fn training_and_succession(d: &EsgAssessment) -> u8 {
    let mut score = if number(&d.personnel_trained).is_some_and(|n| n > 0.0) {
        2
    } else {
        1
    };

    if let (Some(women), Some(men)) = (number(&d.women_promoted), number(&d.men_promoted)) {
        let promoted = women + men;
        if promoted > 0.0 {
            let pct = percent(women, promoted);
            if (40.0..=60.0).contains(&pct) {
                score = 3;
            } else if pct >= 30.0 {
                score = score.max(2);
            }
        }
    }
    score
}

fn csr(d: &EsgAssessment) -> u8 {
    number(&d.csr_percentage)
        .map(|pct| at_least(pct, 2.0, 1.0))
        .unwrap_or(1)
}

fn responsible_marketing(d: &EsgAssessment) -> Option<u8> {
    has_data(&[&d.responsible_marketing_policy])
        .then(|| yes_no(is_yes(&d.responsible_marketing_policy)))
}

// Governance

fn board(d: &EsgAssessment) -> Option<u8> {
    if !has_data(&[
        &d.total_board_members,
        &d.independent_board_members,
        &d.women_board_members,
        &d.men_board_members,
    ]) {
        return None;
    }
    let total = match number(&d.total_board_members) {
        Some(total) if total != 0.0 => total,
        _ => return Some(1),
    };

    let independent = number(&d.independent_board_members).unwrap_or(0.0);
    let mut score = at_least(percent(independent, total), 50.0, 30.0);

    if let (Some(women), Some(men)) = (number(&d.women_board_members), number(&d.men_board_members)) {
        if men + women > 0.0 {
            let pct = percent(women, men + women);
            if pct >= 30.0 {
                score = 3;
            } else if pct >= 20.0 {
                score = score.max(2);
            }
        }
    }

    if number(&d.esg_certified_board_members).is_some_and(|n| n > 0.0) {
        score = (score + 1).min(3);
    }
    if is_yes(&d.ceo_board_prohibition) {
        score = (score + 1).min(3);
    }
    Some(score)
}

fn esg_incentivization(d: &EsgAssessment) -> Option<u8> {
    has_data(&[&d.esg_incentivization]).then(|| yes_no(is_yes(&d.esg_incentivization)))
}

fn workers_voice(d: &EsgAssessment) -> Option<u8> {
    has_data(&[&d.workers_union]).then(|| yes_no(is_yes(&d.workers_union)))
}

fn supplier_conduct(d: &EsgAssessment) -> Option<u8> {
    if !has_data(&[&d.supplier_code_of_conduct, &d.supplier_compliance_percentage]) {
        return None;
    }
    if !is_yes(&d.supplier_code_of_conduct) {
        return Some(1);
    }
    Some(
        number(&d.supplier_compliance_percentage)
            .map(|pct| at_least(pct, 80.0, 50.0))
            .unwrap_or(2),
    )
}

pub(super) fn disclosure_practices(d: &EsgAssessment) -> usize {
    count_yes(&[
        &d.un_sdgs_focus,
        &d.sustainability_report,
        &d.sustainability_reporting_framework,
        &d.sustainability_regulatory_filing,
        &d.sustainability_third_party_assurance,
    ])
}

fn disclosures(d: &EsgAssessment) -> Option<u8> {
    if !has_data(&[
        &d.un_sdgs_focus,
        &d.sustainability_report,
        &d.sustainability_reporting_framework,
        &d.sustainability_regulatory_filing,
        &d.sustainability_third_party_assurance,
    ]) {
        return None;
    }
    Some(policy_count_score(disclosure_practices(d)))
}

fn ethics(d: &EsgAssessment) -> Option<u8> {
    if !has_data(&[&d.ethics_anti_corruption_policy, &d.policy_regular_review]) {
        return None;
    }
    Some(
        match (is_yes(&d.ethics_anti_corruption_policy), is_yes(&d.policy_regular_review)) {
            (true, true) => 3,
            (true, false) => 2,
            _ => 1,
        },
    )
}

fn data_privacy(d: &EsgAssessment) -> Option<u8> {
    has_data(&[&d.data_privacy_policy]).then(|| yes_no(is_yes(&d.data_privacy_policy)))
}

/// Question scores derived from the answers.
pub fn derive_scores(d: &EsgAssessment) -> EsgScores {
    let environmental = [
        ghg_emissions(d),
        Some(energy_efficiency(d)),
        Some(water_management(d)),
        Some(waste_management(d)),
        Some(environmental_operations(d)),
        Some(environmental_oversight(d)),
        sustainable_sourcing(d),
    ];
    let social = [
        Some(pay_ratio(d)),
        Some(ceo_pay_ratio(d)),
        Some(turnover(d)),
        Some(diversity(d)),
        Some(temporary_workers(d)),
        Some(harassment_and_grievance(d)),
        Some(health_and_safety(d)),
        child_forced_labor(d),
        human_rights(d),
        Some(training_and_succession(d)),
        Some(csr(d)),
        responsible_marketing(d),
    ];
    let governance = [
        board(d),
        esg_incentivization(d),
        workers_voice(d),
        supplier_conduct(d),
        disclosures(d),
        ethics(d),
        data_privacy(d),
    ];

    EsgScores {
        environmental: environmental.map(|s| s.map(level)),
        social: social.map(|s| s.map(level)),
        governance: governance.map(|s| s.map(level)),
    }
}

/// Weighted score of the answered questions of a section, as a fraction.
///
/// Only scored questions count towards the weight, so unanswered questions
/// do not pull the section down. A section with nothing scored is 0.
pub fn answered_section_score(section: Section, scores: &EsgScores) -> f64 {
    let (weighted, weight) = scores
        .section(section)
        .iter()
        .zip(question_weights(section))
        .filter_map(|(score, weight)| score.map(|s| (u32::from(s.value()) * weight, *weight)))
        .fold((0u32, 0u32), |(sum, total), (ws, w)| (sum + ws, total + w));
    if weight == 0 {
        0.0
    } else {
        f64::from(weighted) / f64::from(weight * 3)
    }
}

/// Scores a questionnaire and produces recommendation text.
///
/// Section and overall percentages are rounded to two decimals; the overall
/// score is weighted from the unrounded sections.
pub fn assess(d: &EsgAssessment) -> AssessmentResult {
    let scores = derive_scores(d);
    let environmental = answered_section_score(Section::Environmental, &scores) * 100.0;
    let social = answered_section_score(Section::Social, &scores) * 100.0;
    let governance = answered_section_score(Section::Governance, &scores) * 100.0;

    let totals = EsgTotals {
        environmental_total_score: round2(environmental),
        social_total_score: round2(social),
        governance_total_score: round2(governance),
        overall_score: round2(overall(environmental, social, governance)),
    };
    debug!(?totals, "assessed questionnaire");

    let recommendations = recommend(d, &scores, &totals);
    AssessmentResult {
        scores,
        totals,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbonforge_schemas::assessment::Answer;

    fn a(value: &str) -> Option<Answer> {
        Some(Answer::from(value))
    }

    fn values(scores: &[Option<QuestionScore>]) -> Vec<Option<u8>> {
        scores.iter().map(|s| s.map(QuestionScore::value)).collect()
    }

    #[test]
    fn empty_questionnaire() {
        let result = assess(&EsgAssessment::default());
        assert_eq!(
            values(&result.scores.environmental),
            vec![None, Some(1), Some(1), Some(1), Some(1), Some(1), None]
        );
        assert_eq!(result.scores.governance, [None; 7]);
        assert_eq!(result.totals.governance_total_score, 0.0);
        // Five answered environmental questions all at 1: a third.
        assert_eq!(result.totals.environmental_total_score, 33.33);
    }

    #[test]
    fn strong_environmental_answers() {
        let d = EsgAssessment {
            ghg_baseline: a("Yes"),
            ghg_emissions: a("1200"),
            ghg_reduction_initiatives: a("yes"),
            energy_visibility: a("yes"),
            energy_renewable: a("60"),
            energy_diesel: a("5"),
            energy_gas: a("10"),
            water_withdrawal: a("1000"),
            water_reclaimed: a("600"),
            waste_treated: a("85%"),
            environmental_policy: a("yes"),
            waste_management_policy: a("yes"),
            energy_management_policy: a("yes"),
            water_management_policy: a("yes"),
            board_climate_oversight: a("yes"),
            management_climate_oversight: a("yes"),
            sustainable_sourcing: a("yes"),
            ..Default::default()
        };
        let result = assess(&d);
        assert_eq!(result.scores.environmental, [Some(QuestionScore::High); 7]);
        assert_eq!(result.totals.environmental_total_score, 100.0);
    }

    #[test]
    fn partial_answers_are_not_penalised() {
        let d = EsgAssessment {
            esg_incentivization: a("yes"),
            workers_union: a("yes"),
            ..Default::default()
        };
        let result = assess(&d);
        assert_eq!(
            values(&result.scores.governance),
            vec![None, Some(3), Some(3), None, None, None, None]
        );
        assert_eq!(result.totals.governance_total_score, 100.0);
    }

    #[test]
    fn ceo_ratio_reporting_bonus_caps_at_three() {
        let mut d = EsgAssessment {
            ceo_pay_ratio: a("30"),
            ceo_pay_ratio_reporting: a("yes"),
            ..Default::default()
        };
        assert_eq!(ceo_pay_ratio(&d), 3);
        d.ceo_pay_ratio = a("10");
        assert_eq!(ceo_pay_ratio(&d), 3);
        d.ceo_pay_ratio = a("80");
        d.ceo_pay_ratio_reporting = a("no");
        assert_eq!(ceo_pay_ratio(&d), 1);
        d.ceo_pay_ratio = None;
        d.ceo_pay_ratio_reporting = a("yes");
        assert_eq!(ceo_pay_ratio(&d), 2);
    }

    #[test]
    fn fatalities_override_safety_systems() {
        let mut d = EsgAssessment {
            health_safety_policy: a("yes"),
            hse_management_system: a("yes"),
            fatalities: a("1"),
            ..Default::default()
        };
        assert_eq!(health_and_safety(&d), 1);
        d.trir = a("2.5");
        assert_eq!(health_and_safety(&d), 2);
        d.trir = a("0.4");
        assert_eq!(health_and_safety(&d), 3);
    }

    #[test]
    fn board_composition() {
        let d = EsgAssessment {
            total_board_members: a("10"),
            independent_board_members: a("2"),
            men_board_members: a("8"),
            women_board_members: a("2"),
            ceo_board_prohibition: a("yes"),
            ..Default::default()
        };
        // 20% independent (1), 20% women (2), CEO separation bonus (3).
        assert_eq!(board(&d), Some(3));

        let empty_total = EsgAssessment {
            men_board_members: a("4"),
            ..Default::default()
        };
        assert_eq!(board(&empty_total), Some(1));
    }

    #[test]
    fn turnover_averages_reported_rates() {
        let d = EsgAssessment {
            full_time_turnover: a("8"),
            part_time_turnover: a("30"),
            ..Default::default()
        };
        assert_eq!(turnover(&d), 2);
        assert_eq!(turnover(&EsgAssessment::default()), 1);
    }
}
