use serde::{Deserialize, Deserializer, Serialize};

/// A raw questionnaire answer. Accepts any scalar and keeps it as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Answer(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswer {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl<'de> Deserialize<'de> for Answer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawAnswer::deserialize(deserializer)? {
            RawAnswer::Text(text) => Answer(text),
            RawAnswer::Number(number) => Answer(number.to_string()),
            RawAnswer::Flag(flag) => Answer(flag.to_string()),
        })
    }
}

impl Answer {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer(value.to_string())
    }
}

/// Questionnaire answers an ESG assessment is scored from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EsgAssessment {
    // Environmental
    pub ghg_baseline: Option<Answer>,
    pub ghg_emissions: Option<Answer>,
    pub air_pollutants: Option<Answer>,
    pub ghg_reduction_initiatives: Option<Answer>,
    pub energy_visibility: Option<Answer>,
    pub total_energy_used: Option<Answer>,
    pub energy_grid: Option<Answer>,
    pub energy_renewable: Option<Answer>,
    pub energy_diesel: Option<Answer>,
    pub energy_gas: Option<Answer>,
    pub water_withdrawal: Option<Answer>,
    pub water_reclaimed: Option<Answer>,
    pub waste_type: Option<Answer>,
    pub waste_quantity: Option<Answer>,
    pub waste_treated: Option<Answer>,
    pub environmental_policy: Option<Answer>,
    pub waste_management_policy: Option<Answer>,
    pub energy_management_policy: Option<Answer>,
    pub water_management_policy: Option<Answer>,
    pub recycling_policy: Option<Answer>,
    pub board_climate_oversight: Option<Answer>,
    pub management_climate_oversight: Option<Answer>,
    pub sustainable_sourcing: Option<Answer>,

    // Social
    pub median_male_compensation: Option<Answer>,
    pub median_female_compensation: Option<Answer>,
    pub ceo_pay_ratio: Option<Answer>,
    pub ceo_pay_ratio_reporting: Option<Answer>,
    pub full_time_turnover: Option<Answer>,
    pub part_time_turnover: Option<Answer>,
    pub consultants_turnover: Option<Answer>,
    pub diversity_inclusion_policy: Option<Answer>,
    pub total_headcount: Option<Answer>,
    pub men_headcount: Option<Answer>,
    pub women_headcount: Option<Answer>,
    pub men_senior_executive: Option<Answer>,
    pub women_senior_executive: Option<Answer>,
    pub differently_abled_workforce: Option<Answer>,
    pub temporary_workers: Option<Answer>,
    pub consultants: Option<Answer>,
    pub anti_harassment_policy: Option<Answer>,
    pub harassment_cases_reported: Option<Answer>,
    pub harassment_cases_resolved: Option<Answer>,
    pub grievance_mechanism: Option<Answer>,
    pub grievance_cases_reported: Option<Answer>,
    pub grievance_cases_resolved: Option<Answer>,
    pub health_safety_policy: Option<Answer>,
    pub hse_management_system: Option<Answer>,
    pub fatalities: Option<Answer>,
    pub ltis: Option<Answer>,
    pub trir: Option<Answer>,
    pub child_forced_labor_policy: Option<Answer>,
    pub human_rights_policy: Option<Answer>,
    pub personnel_trained: Option<Answer>,
    pub women_promoted: Option<Answer>,
    pub men_promoted: Option<Answer>,
    pub csr_percentage: Option<Answer>,
    pub responsible_marketing_policy: Option<Answer>,

    // Governance
    pub total_board_members: Option<Answer>,
    pub independent_board_members: Option<Answer>,
    pub men_board_members: Option<Answer>,
    pub women_board_members: Option<Answer>,
    pub ceo_board_prohibition: Option<Answer>,
    pub esg_certified_board_members: Option<Answer>,
    pub esg_incentivization: Option<Answer>,
    pub workers_union: Option<Answer>,
    pub supplier_code_of_conduct: Option<Answer>,
    pub supplier_compliance_percentage: Option<Answer>,
    pub un_sdgs_focus: Option<Answer>,
    pub sustainability_report: Option<Answer>,
    pub sustainability_reporting_framework: Option<Answer>,
    pub sustainability_regulatory_filing: Option<Answer>,
    pub sustainability_third_party_assurance: Option<Answer>,
    pub ethics_anti_corruption_policy: Option<Answer>,
    pub policy_regular_review: Option<Answer>,
    pub data_privacy_policy: Option<Answer>,
}
