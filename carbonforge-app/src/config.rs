use anyhow::{Context, Result};
use carbonforge_core::factors::{builder::FactorLibraryBuilder, FactorLibrary};
use carbonforge_schemas::file_formats::{
    EpaVehicleFactorFile, FuelFactorFile, GridFactorFile, HeatSteamFactorFile,
    MobileCombustionFile, RefrigerantFactorFile, VehicleFactorFile,
};
use std::{fs, path::Path};
use tracing::{debug, info};

/// Loads factor overrides from `base_path` on top of the built-in tables.
///
/// Each table has its own subdirectory. A missing directory keeps the
/// built-in table; a present one replaces it wholesale.
pub fn load_factor_library(base_path: &Path) -> Result<FactorLibrary> {
    println!("Loading factor library from '{}'...", base_path.display());

    let mut builder = FactorLibraryBuilder::new();
    if let Some(fuels) = load_yaml_records(base_path.join("fuels"), |f: FuelFactorFile| f.fuels)? {
        builder = builder.with_fuels(fuels);
    }
    if let Some(refrigerants) = load_yaml_records(base_path.join("refrigerants"), |f: RefrigerantFactorFile| {
        f.refrigerants
    })? {
        builder = builder.with_refrigerants(refrigerants);
    }
    if let Some(vehicles) = load_yaml_records(base_path.join("vehicles"), |f: VehicleFactorFile| f.vehicles)? {
        builder = builder.with_vehicles(vehicles);
    }
    if let Some(delivery) = load_yaml_records(base_path.join("delivery"), |f: VehicleFactorFile| f.vehicles)? {
        builder = builder.with_delivery_vehicles(delivery);
    }
    if let Some(grid) = load_yaml_records(base_path.join("grid"), |f: GridFactorFile| f.countries)? {
        builder = builder.with_grid(grid);
    }
    if let Some(mobile) = load_yaml_records(base_path.join("mobile"), |f: MobileCombustionFile| {
        f.mobile_combustion
    })? {
        builder = builder.with_mobile(mobile);
    }
    if let Some(heat_steam) = load_yaml_records(base_path.join("heat_steam"), |f: HeatSteamFactorFile| {
        f.heat_steam
    })? {
        builder = builder.with_heat_steam(heat_steam);
    }
    if let Some(gasoline) = load_yaml_records(base_path.join("on_road_gasoline"), |f: EpaVehicleFactorFile| {
        f.vehicles
    })? {
        builder = builder.with_on_road_gasoline(gasoline);
    }
    if let Some(diesel) = load_yaml_records(base_path.join("on_road_diesel"), |f: EpaVehicleFactorFile| {
        f.vehicles
    })? {
        builder = builder.with_on_road_diesel(diesel);
    }
    if let Some(non_road) = load_yaml_records(base_path.join("non_road"), |f: EpaVehicleFactorFile| f.vehicles)? {
        builder = builder.with_non_road(non_road);
    }

    let library = builder
        .build()
        .with_context(|| format!("Invalid factor tables under {:?}", base_path))?;
    println!("Factor library loaded successfully.");
    Ok(library)
}

/// Reads every YAML file in a directory, in file-name order, and collects the
/// records each file wraps. `None` when the directory does not exist.
fn load_yaml_records<P, F, E, T>(dir_path: P, extract_vec: E) -> Result<Option<Vec<T>>>
where
    P: AsRef<Path>,
    F: for<'de> serde::Deserialize<'de>, // The file wrapper struct (e.g., FuelFactorFile)
    E: Fn(F) -> Vec<T>,                  // A closure to extract the Vec<T> from the wrapper
{
    let dir_path = dir_path.as_ref();
    if !dir_path.is_dir() {
        debug!(dir = ?dir_path, "no override directory; keeping built-in table");
        return Ok(None);
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read directory: {:?}", dir_path))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |s| s == "yaml" || s == "yml") {
            paths.push(path);
        }
    }
    // First-seen-wins tables need a stable file order.
    paths.sort();

    let mut records = Vec::new();
    for path in &paths {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        let file_wrapper: F = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
        records.extend(extract_vec(file_wrapper));
    }
    info!(dir = ?dir_path, files = paths.len(), records = records.len(), "loaded factor overrides");
    Ok(Some(records))
}
