use super::{
    answers::{grouped, has_data, is_yes, number},
    assessment::{
        disclosure_practices, environmental_policies, fossil_share, percent, resolution_rate,
        senior_women_share,
    },
};
use carbonforge_schemas::{
    assessment::EsgAssessment,
    esg::{EsgScores, EsgTotals, QuestionScore, Recommendations, Section},
};

fn joined(items: Vec<String>, fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(". ")
    }
}

fn score(scores: &EsgScores, section: Section, question: usize) -> Option<u8> {
    scores
        .section(section)
        .get(question - 1)
        .copied()
        .flatten()
        .map(QuestionScore::value)
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn environmental(d: &EsgAssessment, scores: &EsgScores) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let q = |n| score(scores, Section::Environmental, n);

    if let Some(s) = q(1) {
        let baseline = is_yes(&d.ghg_baseline);
        let reduction = is_yes(&d.ghg_reduction_initiatives);
        if s >= 2 {
            if baseline && reduction {
                let amount = non_zero(number(&d.ghg_emissions))
                    .map(|e| format!(" ({} tCO2e)", grouped(e)))
                    .unwrap_or_default();
                strengths.push(format!(
                    "Strong GHG management: You have established a baseline{} and implemented reduction initiatives",
                    amount
                ));
            } else if baseline {
                strengths.push("GHG emissions baseline established - good foundation for tracking".to_string());
            }
        } else {
            if !baseline {
                improvements.push("Establish a comprehensive GHG emissions baseline to track your carbon footprint".to_string());
            }
            if !reduction {
                improvements.push("Develop and implement GHG reduction initiatives to lower your emissions".to_string());
            }
        }
    }

    if let Some(s) = q(2) {
        let renewable = number(&d.energy_renewable);
        let fossil = fossil_share(d);
        if s >= 2 {
            match renewable {
                Some(pct) if pct >= 50.0 => strengths.push(format!(
                    "Excellent renewable energy adoption: {}% from renewable sources",
                    pct
                )),
                Some(pct) if pct > 0.0 => strengths.push(format!(
                    "Good progress on renewable energy: {}% from renewable sources",
                    pct
                )),
                _ => strengths.push("Energy consumption tracking in place".to_string()),
            }
        } else {
            if renewable.map_or(true, |pct| pct == 0.0) {
                improvements.push("Increase renewable energy usage - aim for at least 25% renewable energy".to_string());
            }
            if fossil > 40.0 {
                improvements.push(format!(
                    "Reduce fossil fuel dependency (currently {:.0}% from diesel/gas)",
                    fossil
                ));
            }
        }
    }

    if let Some(s) = q(3) {
        let withdrawal = non_zero(number(&d.water_withdrawal));
        let reclaimed = non_zero(number(&d.water_reclaimed));
        match (withdrawal, reclaimed) {
            (Some(w), Some(r)) if s >= 2 => strengths.push(format!(
                "Effective water reclamation: {:.0}% of water is reclaimed",
                percent(r, w)
            )),
            _ if s == 1 => improvements.push("Implement water reclamation systems to reduce water consumption".to_string()),
            _ => {}
        }
    }

    if let Some(s) = q(4) {
        match number(&d.waste_treated) {
            Some(treated) if s >= 2 => strengths.push(format!(
                "Strong waste treatment: {}% of waste is properly treated",
                treated
            )),
            _ if s == 1 => improvements.push("Improve waste treatment processes - aim for at least 80% waste treatment rate".to_string()),
            _ => {}
        }
    }

    if let Some(s) = q(5) {
        let count = environmental_policies(d);
        if s >= 2 {
            strengths.push(format!(
                "Comprehensive environmental policy framework: {} policies in place",
                count
            ));
        } else {
            improvements.push(format!(
                "Develop additional environmental policies (currently {} policies - aim for 4+)",
                count
            ));
        }
    }

    if let Some(s) = q(6) {
        if s >= 2 {
            if is_yes(&d.board_climate_oversight) && is_yes(&d.management_climate_oversight) {
                strengths.push("Strong climate risk oversight at both board and management levels".to_string());
            } else {
                strengths.push("Climate oversight established".to_string());
            }
        } else {
            improvements.push("Establish board and management oversight for climate-related risks".to_string());
        }
    }

    (strengths, improvements)
}

fn social(d: &EsgAssessment, scores: &EsgScores) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let q = |n| score(scores, Section::Social, n);

    if let Some(s) = q(1) {
        let male = non_zero(number(&d.median_male_compensation));
        let female = non_zero(number(&d.median_female_compensation));
        match (male, female) {
            (Some(m), Some(f)) if s >= 2 => {
                let ratio = percent(f, m);
                let grade = if ratio >= 95.0 { "Excellent" } else { "Good" };
                strengths.push(format!("{} gender pay equity: {:.0}% pay ratio", grade, ratio));
            }
            _ if s == 1 => improvements.push("Address gender pay gaps - aim for at least 95% pay equity between genders".to_string()),
            _ => {}
        }
    }

    if let Some(s) = q(3) {
        let full_time = number(&d.full_time_turnover);
        if s >= 2 {
            match full_time {
                Some(rate) if rate <= 10.0 => strengths.push(format!(
                    "Excellent employee retention: {}% full-time turnover rate",
                    rate
                )),
                _ => strengths.push("Good employee retention rates".to_string()),
            }
        } else if let Some(rate) = full_time {
            improvements.push(format!(
                "High employee turnover ({}%) - investigate retention strategies",
                rate
            ));
        }
    }

    if let Some(s) = q(4) {
        let senior = senior_women_share(d);
        if s >= 2 {
            let total = non_zero(number(&d.total_headcount));
            let women = non_zero(number(&d.women_headcount));
            if let (Some(total), Some(women)) = (total, women) {
                strengths.push(format!(
                    "Good gender diversity: {:.0}% women in workforce",
                    percent(women, total)
                ));
            }
            if let Some(pct) = senior.filter(|pct| *pct >= 30.0) {
                strengths.push(format!(
                    "Strong senior leadership diversity: {:.0}% women in senior roles",
                    pct
                ));
            }
        } else {
            if !is_yes(&d.diversity_inclusion_policy) {
                improvements.push("Establish a formal diversity and inclusion policy".to_string());
            }
            if let Some(pct) = senior.filter(|pct| *pct < 30.0) {
                improvements.push(format!(
                    "Increase women in senior positions (currently {:.0}% - aim for 30%+)",
                    pct
                ));
            }
        }
    }

    if let Some(s) = q(6) {
        let policy = is_yes(&d.anti_harassment_policy);
        let grievance = is_yes(&d.grievance_mechanism);
        if s >= 2 {
            if policy && grievance {
                strengths.push("Comprehensive anti-harassment policies and grievance mechanisms in place".to_string());
            }
            let rate = non_zero(number(&d.harassment_cases_reported)).and_then(|reported| {
                resolution_rate(reported, non_zero(number(&d.harassment_cases_resolved)))
            });
            if let Some(rate) = rate.filter(|rate| *rate >= 90.0) {
                strengths.push(format!(
                    "Excellent harassment case resolution rate: {:.0}%",
                    rate
                ));
            }
        } else {
            if !policy {
                improvements.push("Implement anti-harassment and anti-discrimination policies".to_string());
            }
            if !grievance {
                improvements.push("Establish confidential grievance mechanisms for employees".to_string());
            }
        }
    }

    if let Some(s) = q(7) {
        let policy = is_yes(&d.health_safety_policy);
        let hse = is_yes(&d.hse_management_system);
        let fatalities = number(&d.fatalities).unwrap_or(0.0);
        let trir = number(&d.trir);
        if s >= 2 {
            if policy && hse {
                strengths.push("Comprehensive health and safety management system in place".to_string());
            }
            if let Some(trir) = trir.filter(|t| *t <= 1.0) {
                strengths.push(format!("Excellent safety record: TRIR of {:.2}", trir));
            }
            if fatalities == 0.0 {
                strengths.push("Zero fatalities - strong safety performance".to_string());
            }
        } else {
            if !policy {
                improvements.push("Develop and implement a formal health and safety policy".to_string());
            }
            if !hse {
                improvements.push("Establish a Health, Safety, and Environment (HSE) management system".to_string());
            }
            if fatalities > 0.0 {
                improvements.push(format!(
                    "Critical: {} fatality(ies) reported - immediate safety review required",
                    fatalities
                ));
            }
            if let Some(trir) = trir.filter(|t| *t > 3.0) {
                improvements.push(format!(
                    "High injury rate (TRIR: {:.2}) - implement safety improvement programs",
                    trir
                ));
            }
        }
    }

    if let Some(s) = q(11) {
        match number(&d.csr_percentage) {
            Some(pct) if s >= 2 => strengths.push(format!(
                "Strong CSR commitment: {}% of bottom line allocated to CSR activities",
                pct
            )),
            _ if s == 1 => improvements.push("Increase corporate social responsibility spending - aim for at least 1-2% of bottom line".to_string()),
            _ => {}
        }
    }

    (strengths, improvements)
}

fn governance(d: &EsgAssessment, scores: &EsgScores) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let q = |n| score(scores, Section::Governance, n);

    if let Some(s) = q(1) {
        let total = non_zero(number(&d.total_board_members));
        let independent = number(&d.independent_board_members).unwrap_or(0.0);
        let women = number(&d.women_board_members).unwrap_or(0.0);
        match total {
            Some(total) if s >= 2 => {
                let independence = percent(independent, total);
                let women_pct = percent(women, total);
                if independence >= 50.0 {
                    strengths.push(format!(
                        "Strong board independence: {:.0}% independent directors",
                        independence
                    ));
                }
                if women_pct >= 30.0 {
                    strengths.push(format!(
                        "Excellent board gender diversity: {:.0}% women on board",
                        women_pct
                    ));
                } else if women_pct >= 20.0 {
                    strengths.push(format!(
                        "Good board gender diversity: {:.0}% women on board",
                        women_pct
                    ));
                }
            }
            Some(total) => {
                if independent / total < 0.3 {
                    improvements.push(format!(
                        "Increase board independence (currently {:.0}% - aim for 50%+)",
                        percent(independent, total)
                    ));
                }
                if women / total < 0.2 {
                    improvements.push(format!(
                        "Increase women on board (currently {:.0}% - aim for 30%+)",
                        percent(women, total)
                    ));
                }
            }
            None => {}
        }
    }

    if let Some(s) = q(2) {
        if s >= 2 && is_yes(&d.esg_incentivization) {
            strengths.push("Executive compensation linked to ESG performance - strong accountability".to_string());
        } else if s == 1 {
            improvements.push("Link executive incentives to ESG performance metrics to drive sustainability outcomes".to_string());
        }
    }

    if let Some(s) = q(4) {
        let code = is_yes(&d.supplier_code_of_conduct);
        let compliance = number(&d.supplier_compliance_percentage);
        if s >= 2 && code {
            match compliance {
                Some(pct) if pct >= 80.0 => strengths.push(format!(
                    "Strong supplier compliance: {}% of suppliers certified compliant",
                    pct
                )),
                _ => strengths.push("Supplier code of conduct in place".to_string()),
            }
        } else if !code {
            improvements.push("Require suppliers to follow a sustainability-aligned code of conduct".to_string());
        } else if let Some(pct) = compliance.filter(|pct| *pct < 80.0) {
            improvements.push(format!(
                "Improve supplier compliance tracking (currently {}% - aim for 80%+)",
                pct
            ));
        }
    }

    if let Some(s) = q(5) {
        let count = disclosure_practices(d);
        if s >= 2 {
            if count >= 4 {
                strengths.push(format!(
                    "Comprehensive sustainability disclosure: {} disclosure practices in place",
                    count
                ));
            } else {
                strengths.push("Sustainability reporting established".to_string());
            }
        } else if count == 0 {
            improvements.push("Begin sustainability reporting - publish annual sustainability reports aligned with recognized frameworks".to_string());
        } else {
            improvements.push(format!(
                "Expand sustainability disclosures (currently {} practices - aim for 4+)",
                count
            ));
        }
    }

    if let Some(s) = q(6) {
        let policy = is_yes(&d.ethics_anti_corruption_policy);
        let review = is_yes(&d.policy_regular_review);
        if s >= 2 {
            if policy && review {
                strengths.push("Strong ethics governance: Anti-corruption policy with regular review process".to_string());
            } else {
                strengths.push("Ethics and anti-corruption policy in place".to_string());
            }
        } else if !policy {
            improvements.push("Establish ethics and anti-corruption policies".to_string());
        } else if !review {
            improvements.push("Implement regular review and updates of ethics policies".to_string());
        }
    }

    (strengths, improvements)
}

fn overall(totals: &EsgTotals) -> Vec<String> {
    let mut recs = Vec::new();
    let sections: Vec<(Section, f64)> = Section::ALL
        .iter()
        .map(|s| (*s, totals.section(*s)))
        .filter(|(_, score)| *score > 0.0)
        .collect();

    if sections.len() < 3 {
        recs.push(format!(
            "Complete all ESG sections for comprehensive assessment (currently {}/3 sections completed)",
            sections.len()
        ));
    }
    if totals.overall_score > 0.0 && totals.overall_score < 60.0 {
        recs.push("Focus on establishing foundational ESG policies and practices across all pillars".to_string());
    }

    if sections.len() > 1 {
        let mut weakest = sections[0];
        let mut strongest = sections[0];
        for entry in &sections[1..] {
            if entry.1 < weakest.1 {
                weakest = *entry;
            }
            if entry.1 > strongest.1 {
                strongest = *entry;
            }
        }
        if weakest.1 < 60.0 {
            recs.push(format!(
                "Prioritize improvements in {} ({:.0}%) - currently the weakest area",
                weakest.0, weakest.1
            ));
        }
        if strongest.1 >= 80.0 {
            recs.push(format!(
                "Leverage your {} strengths ({:.0}%) as a model for other areas",
                strongest.0, strongest.1
            ));
        }
    }

    if totals.overall_score >= 80.0 {
        recs.push("Excellent ESG performance - continue maintaining high standards and consider industry leadership opportunities".to_string());
    } else if totals.overall_score >= 60.0 {
        recs.push("Good ESG foundation - focus on identified improvement areas to reach excellence".to_string());
    }
    recs
}

/// Strengths, improvement areas and overall advice for an assessed questionnaire.
pub fn recommend(d: &EsgAssessment, scores: &EsgScores, totals: &EsgTotals) -> Recommendations {
    let (env_strengths, env_improvements) = environmental(d, scores);
    let (social_strengths, social_improvements) = social(d, scores);

    let environmental_strengths = joined(env_strengths, "Continue building on existing environmental practices");
    let environmental_improvements = joined(env_improvements, "Maintain current environmental performance");
    let social_strengths = joined(social_strengths, "Continue building on existing social practices");
    let social_improvements = joined(social_improvements, "Maintain current social performance");

    let governance_answered = has_data(&[
        &d.total_board_members,
        &d.independent_board_members,
        &d.women_board_members,
        &d.esg_incentivization,
        &d.workers_union,
        &d.supplier_code_of_conduct,
        &d.sustainability_report,
        &d.ethics_anti_corruption_policy,
        &d.data_privacy_policy,
    ]);
    if !governance_answered {
        return Recommendations {
            environmental_strengths,
            environmental_improvements,
            social_strengths,
            social_improvements,
            governance_strengths: "Complete governance assessment to identify strengths".to_string(),
            governance_improvements: "Complete the governance section of the assessment to receive specific recommendations".to_string(),
            overall_recommendations: "Complete all sections of the ESG assessment for comprehensive analysis and recommendations".to_string(),
        };
    }

    let (gov_strengths, gov_improvements) = governance(d, scores);
    Recommendations {
        environmental_strengths,
        environmental_improvements,
        social_strengths,
        social_improvements,
        governance_strengths: joined(gov_strengths, "Continue building on existing governance practices"),
        governance_improvements: joined(gov_improvements, "Maintain current governance performance"),
        overall_recommendations: joined(overall(totals), "Continue improving ESG performance across all pillars"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::esg::assessment::assess;
    use carbonforge_schemas::assessment::Answer;

    fn a(value: &str) -> Option<Answer> {
        Some(Answer::from(value))
    }

    #[test]
    fn missing_governance_asks_for_completion() {
        let result = assess(&EsgAssessment::default());
        let recs = result.recommendations;
        assert_eq!(
            recs.governance_strengths,
            "Complete governance assessment to identify strengths"
        );
        assert_eq!(
            recs.overall_recommendations,
            "Complete all sections of the ESG assessment for comprehensive analysis and recommendations"
        );
        assert!(recs
            .environmental_improvements
            .contains("Implement water reclamation systems"));
    }

    #[test]
    fn strengths_quote_the_answers() {
        let d = EsgAssessment {
            ghg_baseline: a("yes"),
            ghg_reduction_initiatives: a("yes"),
            ghg_emissions: a("12345.5"),
            energy_visibility: a("yes"),
            energy_renewable: a("62.5"),
            data_privacy_policy: a("yes"),
            ..Default::default()
        };
        let recs = assess(&d).recommendations;
        assert!(recs.environmental_strengths.starts_with(
            "Strong GHG management: You have established a baseline (12,345.5 tCO2e) and implemented reduction initiatives. Excellent renewable energy adoption: 62.5% from renewable sources"
        ));
        assert_eq!(recs.governance_strengths, "Continue building on existing governance practices");
    }

    #[test]
    fn weakest_and_strongest_sections_are_named() {
        let totals = EsgTotals {
            environmental_total_score: 90.0,
            social_total_score: 40.0,
            governance_total_score: 70.0,
            overall_score: 65.5,
        };
        let recs = overall(&totals);
        assert_eq!(
            recs,
            vec![
                "Prioritize improvements in Social (40%) - currently the weakest area".to_string(),
                "Leverage your Environmental strengths (90%) as a model for other areas".to_string(),
                "Good ESG foundation - focus on identified improvement areas to reach excellence".to_string(),
            ]
        );
    }
}
