use crate::plotting;
use anyhow::{Context, Result};
use carbonforge_core::{
    aggregate::{format_emissions, EmissionsSummary, Scope},
    calculator::{recompute, EmissionEntry},
    electricity::{compute_electricity, ElectricityBreakdown},
    esg::{
        assessment::assess,
        scoring::{draft, score_sheet, submit},
    },
    factors::FactorLibrary,
    heat_steam::rows_from_table,
    ledger::{EmissionsLedger, LedgerRow},
    units::convert_from_kg,
};
use carbonforge_schemas::{
    entry::EntryKind,
    esg::{AssessmentResult, ScoreSubmission, Section},
    file_formats::{AssessmentFile, InventoryFile, ScoreFile},
    heat_steam::HeatSteamRow,
    units::OutputUnit,
};
use serde::Serialize;
use std::{fs, path::Path};
use tracing::info;

/// Everything computed for one inventory.
#[derive(Debug, Serialize)]
pub struct InventoryReport {
    pub reporting_period: Option<String>,
    pub output_unit: OutputUnit,
    pub summary: EmissionsSummary,
    pub electricity: Option<ElectricityBreakdown>,
}

fn recompute_all<E: EmissionEntry>(rows: &[E], table: &E::Table) -> Vec<E> {
    rows.iter().map(|row| recompute(row.clone(), table)).collect()
}

fn record<E: LedgerRow>(
    ledger: &mut EmissionsLedger,
    summary: &mut EmissionsSummary,
    kind: EntryKind,
    label: &str,
    rows: &[E],
    unit: OutputUnit,
) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    ledger.record_rows(kind, rows, unit)?;
    summary.add_rows(kind, label, rows);
    Ok(())
}

/// Heat and steam rows: one per table activity, plus any free-form rows the
/// inventory adds for activities the table does not list.
fn heat_steam_rows(library: &FactorLibrary, entered: &[HeatSteamRow]) -> Vec<HeatSteamRow> {
    let mut rows = rows_from_table(&library.heat_steam, entered);
    let extra = entered.iter().filter(|row| {
        !rows
            .iter()
            .any(|r| r.entry_type == row.entry_type && r.unit == row.unit)
    });
    let extra: Vec<HeatSteamRow> = extra.cloned().collect();
    rows.extend(recompute_all(&extra, &library.heat_steam));
    rows
}

/// Recomputes every row of an inventory, writes the ledger and charts, and
/// prints the summary report.
pub fn run_inventory(
    inventory: &InventoryFile,
    library: &FactorLibrary,
    unit_override: Option<OutputUnit>,
    output_dir: &Path,
) -> Result<InventoryReport> {
    println!("\n--- [Workflow] Calculating Emissions Inventory ---");
    let unit = unit_override.unwrap_or(inventory.output_unit);
    let ledger_path = output_dir.join("emissions_ledger.csv");
    let mut ledger = EmissionsLedger::new(&ledger_path)?;
    let mut summary = EmissionsSummary::new();

    let fuel = recompute_all(&inventory.fuel, &library.fuels);
    record(&mut ledger, &mut summary, EntryKind::Fuel, "Stationary fuel", &fuel, unit)?;

    let refrigerant = recompute_all(&inventory.refrigerant, &library.refrigerants);
    record(&mut ledger, &mut summary, EntryKind::Refrigerant, "Refrigerants", &refrigerant, unit)?;

    let passenger = recompute_all(&inventory.passenger_vehicle, &library.vehicles);
    record(&mut ledger, &mut summary, EntryKind::PassengerVehicle, "Passenger vehicles", &passenger, unit)?;

    let delivery = recompute_all(&inventory.delivery_vehicle, &library.delivery_vehicles);
    record(&mut ledger, &mut summary, EntryKind::DeliveryVehicle, "Delivery vehicles", &delivery, unit)?;

    let mobile = recompute_all(&inventory.mobile_fuel, &library.mobile);
    record(&mut ledger, &mut summary, EntryKind::MobileFuel, "Mobile combustion", &mobile, unit)?;

    let gasoline = recompute_all(&inventory.on_road_gasoline, &library.on_road_gasoline);
    record(&mut ledger, &mut summary, EntryKind::OnRoadGasoline, "On-road gasoline", &gasoline, unit)?;

    let diesel = recompute_all(&inventory.on_road_diesel, &library.on_road_diesel);
    record(&mut ledger, &mut summary, EntryKind::OnRoadDiesel, "On-road diesel & alt fuel", &diesel, unit)?;

    let non_road = recompute_all(&inventory.non_road, &library.non_road);
    record(&mut ledger, &mut summary, EntryKind::NonRoadVehicle, "Non-road vehicles", &non_road, unit)?;

    let electricity = match &inventory.electricity {
        Some(record_in) => {
            let (computed, breakdown) = compute_electricity(record_in, &library.grid, &library.fuels);
            ledger.record_electricity(&computed, &breakdown, unit)?;
            summary.add(EntryKind::ElectricityOther, "Electricity", breakdown.total);
            Some(breakdown)
        }
        None => None,
    };

    let heat_steam = heat_steam_rows(library, &inventory.heat_steam);
    let heat_steam: Vec<HeatSteamRow> = heat_steam.into_iter().filter(|r| r.quantity.is_some()).collect();
    record(&mut ledger, &mut summary, EntryKind::HeatSteam, "Heat and steam", &heat_steam, unit)?;

    let scope3 = recompute_all(&inventory.scope3, &library.scope3);
    record(&mut ledger, &mut summary, EntryKind::Scope3, "Value chain", &scope3, unit)?;

    info!(ledger = ?ledger_path, total_kg = summary.total(), "inventory calculated");

    let report = InventoryReport {
        reporting_period: inventory.reporting_period.clone(),
        output_unit: unit,
        summary,
        electricity,
    };
    let report_path = output_dir.join("summary.json");
    fs::write(&report_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("Failed to write {:?}", report_path))?;

    plotting::plot_category_emissions(output_dir, &report.summary, unit)?;
    print_inventory_report(&report);
    Ok(report)
}

fn print_inventory_report(report: &InventoryReport) {
    let unit = report.output_unit;
    println!("\n\n--- [Emissions Summary Report] ---");
    println!("========================================");
    if let Some(period) = &report.reporting_period {
        println!("Reporting Period: {}", period);
    }
    println!("Output Unit: {}", unit);
    println!("----------------------------------------");

    for scope in [Scope::Scope1, Scope::Scope2, Scope::Scope3] {
        println!("\n{}:", scope.label());
        for category in report
            .summary
            .categories
            .iter()
            .filter(|c| Scope::of(c.kind) == scope)
        {
            println!(
                "  - {:<26}{} {}",
                format!("{}:", category.label),
                format_emissions(convert_from_kg(category.kg, unit)),
                unit
            );
        }
        println!("  --------------------------------------");
        println!(
            "  - {:<26}{} {}",
            "Subtotal:",
            format_emissions(convert_from_kg(report.summary.scope_total(scope), unit)),
            unit
        );
    }

    if let Some(electricity) = &report.electricity {
        println!("\nElectricity Breakdown (kg):");
        println!("  - Grid:                     {}", format_emissions(electricity.grid));
        println!("  - Renewable:                {}", format_emissions(electricity.renewable));
        println!("  - Other sources:            {}", format_emissions(electricity.other));
    }

    println!("\nTotal Emissions: {} {}", format_emissions(report.summary.total_in(unit)), unit);
    println!("========================================");
}

/// Scores a reviewer's sheet, as a draft unless `final_submit` is set.
pub fn run_score(
    sheet: &ScoreFile,
    final_submit: bool,
    scored_by: &str,
    output_dir: &Path,
) -> Result<ScoreSubmission> {
    println!("\n--- [Workflow] Scoring ESG Sheet ---");
    let now = chrono::Utc::now();
    let submission = if final_submit {
        submit(&sheet.assessment_id, sheet.scores.clone(), scored_by, now)
    } else {
        draft(&sheet.assessment_id, sheet.scores.clone(), scored_by, now)
    };

    let path = output_dir.join("score_submission.json");
    fs::write(&path, serde_json::to_string_pretty(&submission)?)
        .with_context(|| format!("Failed to write {:?}", path))?;

    println!("\n\n--- [ESG Score Sheet] ---");
    println!("========================================");
    println!("Assessment: {}", submission.assessment_id);
    println!("Status: {:?}", submission.status());
    println!("Scored By: {}", submission.scored_by);
    println!("----------------------------------------");
    let show = |value: Option<f64>| value.map_or("-".to_string(), |v| format!("{:.2}%", v));
    println!("  - Environmental (30%):      {}", show(submission.environmental_total_score));
    println!("  - Social (35%):             {}", show(submission.social_total_score));
    println!("  - Governance (35%):         {}", show(submission.governance_total_score));
    println!("  --------------------------------------");
    println!("  - Overall:                  {}", show(submission.overall_score));
    println!("========================================");

    let totals = score_sheet(&submission.scores);
    plotting::plot_esg_scores(output_dir, &totals)?;
    Ok(submission)
}

/// Runs the automated assessment over questionnaire answers.
pub fn run_assessment(file: &AssessmentFile, output_dir: &Path) -> Result<AssessmentResult> {
    println!("\n--- [Workflow] Assessing ESG Questionnaire ---");
    let result = assess(&file.assessment);

    let path = output_dir.join("assessment_result.json");
    fs::write(&path, serde_json::to_string_pretty(&result)?)
        .with_context(|| format!("Failed to write {:?}", path))?;

    println!("\n\n--- [ESG Assessment Report] ---");
    println!("========================================");
    println!("Assessment: {}", file.assessment_id);
    println!("----------------------------------------");
    for section in Section::ALL {
        println!(
            "  - {:<26}{:.2}%",
            format!("{}:", section),
            result.totals.section(section)
        );
    }
    println!("  --------------------------------------");
    println!("  - {:<26}{:.2}%", "Overall:", result.totals.overall_score);

    let recs = &result.recommendations;
    println!("\nEnvironmental");
    println!("  Strengths:    {}", recs.environmental_strengths);
    println!("  Improvements: {}", recs.environmental_improvements);
    println!("\nSocial");
    println!("  Strengths:    {}", recs.social_strengths);
    println!("  Improvements: {}", recs.social_improvements);
    println!("\nGovernance");
    println!("  Strengths:    {}", recs.governance_strengths);
    println!("  Improvements: {}", recs.governance_improvements);
    println!("\nOverall: {}", recs.overall_recommendations);
    println!("========================================");

    plotting::plot_esg_scores(output_dir, &result.totals)?;
    Ok(result)
}
