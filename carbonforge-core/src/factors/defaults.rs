//! Built-in factor data used when no factor library directory overrides it.
//!
//! Fuel, refrigerant and vehicle values are kg CO2e per unit. Mobile
//! combustion is kg CO2 per unit and heat and steam carries per-gas factors
//! per mmBtu. EPA vehicle tables are grams of CH4 and N2O per mile (on-road)
//! or per gallon (non-road).

use super::{
    epa_vehicle::{DieselTable, GasolineTable, NonRoadTable},
    table::{FlatTable, ThreeLevelTable, TwoLevelTable},
    FactorLibrary, HeatSteamTable,
};
use carbonforge_schemas::{epa_vehicle::VehicleGasFactors, heat_steam::GasFactors};

type Leaf = (&'static str, f64);
type Branch = (&'static str, &'static [(&'static str, &'static [Leaf])]);

const FUELS: &[Branch] = &[
    (
        "Gaseous fuels",
        &[
            ("Butane", &[("tonnes", 3029.26), ("litres", 1.74296), ("kWh (Net CV)", 0.24074), ("kWh (Gross CV)", 0.2221)]),
            ("CNG", &[("tonnes", 2570.42), ("litres", 0.44982), ("kWh (Net CV)", 0.20229), ("kWh (Gross CV)", 0.18259)]),
            ("LNG", &[("tonnes", 2598.26), ("litres", 1.17568), ("kWh (Net CV)", 0.20448), ("kWh (Gross CV)", 0.18457)]),
            ("LPG", &[("tonnes", 2935.18), ("litres", 1.55491), ("kWh (Net CV)", 0.22999), ("kWh (Gross CV)", 0.21419)]),
            ("Natural gas", &[("tonnes", 2570.42), ("cubic metres", 2.0627), ("kWh (Net CV)", 0.20229), ("kWh (Gross CV)", 0.18259)]),
            ("Natural gas (100% mineral blend)", &[("tonnes", 2598.26), ("cubic metres", 2.08504), ("kWh (Net CV)", 0.20448), ("kWh (Gross CV)", 0.18457)]),
            ("Other petroleum gas", &[("tonnes", 2575.7), ("litres", 0.94348), ("kWh (Net CV)", 0.19897), ("kWh (Gross CV)", 0.18305)]),
            ("Propane", &[("tonnes", 2993.4), ("litres", 1.5414), ("kWh (Net CV)", 0.23225), ("kWh (Gross CV)", 0.21381)]),
        ],
    ),
    (
        "Liquid fuels",
        &[
            ("Aviation spirit", &[("tonnes", 3127.67), ("litres", 2.28297), ("kWh (Net CV)", 0.25135), ("kWh (Gross CV)", 0.23878)]),
            ("Aviation turbine fuel", &[("tonnes", 3149.67), ("litres", 2.51973), ("kWh (Net CV)", 0.25826), ("kWh (Gross CV)", 0.24535)]),
            ("Burning oil", &[("tonnes", 3149.67), ("litres", 2.52782), ("kWh (Net CV)", 0.25849), ("kWh (Gross CV)", 0.24557)]),
            ("Diesel (average biofuel blend)", &[("tonnes", 3048.71), ("litres", 2.53763), ("kWh (Net CV)", 0.2562), ("kWh (Gross CV)", 0.24098)]),
            ("Diesel (100% mineral diesel)", &[("tonnes", 3164.33), ("litres", 2.62818), ("kWh (Net CV)", 0.26475), ("kWh (Gross CV)", 0.24887)]),
            ("Fuel oil", &[("tonnes", 3216.38), ("litres", 3.16262), ("kWh (Net CV)", 0.28413), ("kWh (Gross CV)", 0.26709)]),
            ("Gas oil", &[("tonnes", 3190.0), ("litres", 2.72417), ("kWh (Net CV)", 0.26978), ("kWh (Gross CV)", 0.25359)]),
            ("Lubricants", &[("tonnes", 3171.09), ("litres", 2.74078), ("kWh (Net CV)", 0.28013), ("kWh (Gross CV)", 0.26332)]),
            ("Naphtha", &[("tonnes", 3131.33), ("litres", 2.11149), ("kWh (Net CV)", 0.24804), ("kWh (Gross CV)", 0.23564)]),
            ("Petrol (average biofuel blend)", &[("tonnes", 2754.25), ("litres", 2.05523), ("kWh (Net CV)", 0.23026), ("kWh (Gross CV)", 0.21811)]),
            ("Petrol (100% mineral petrol)", &[("tonnes", 3135.0), ("litres", 2.32567), ("kWh (Net CV)", 0.25276), ("kWh (Gross CV)", 0.24013)]),
            ("Processed fuel oils - residual oil", &[("tonnes", 3216.38), ("litres", 3.16262), ("kWh (Net CV)", 0.28413), ("kWh (Gross CV)", 0.26709)]),
            ("Processed fuel oils - distillate oil", &[("tonnes", 3190.0), ("litres", 2.72417), ("kWh (Net CV)", 0.26978), ("kWh (Gross CV)", 0.25359)]),
            ("Refinery miscellaneous", &[("tonnes", 2933.33), ("kWh (Net CV)", 0.25864), ("kWh (Gross CV)", 0.24571)]),
            ("Waste oils", &[("tonnes", 3171.09), ("litres", 2.70801), ("kWh (Net CV)", 0.27047), ("kWh (Gross CV)", 0.25256)]),
            ("Marine gas oil", &[("tonnes", 3205.99), ("litres", 2.73782), ("kWh (Net CV)", 0.27113), ("kWh (Gross CV)", 0.25486)]),
            ("Marine fuel oil", &[("tonnes", 3113.99), ("litres", 3.06194), ("kWh (Net CV)", 0.27509), ("kWh (Gross CV)", 0.25858)]),
        ],
    ),
    (
        "Solid fuels",
        &[
            ("Coal (industrial)", &[("tonnes", 2370.72), ("kWh (Net CV)", 0.33595), ("kWh (Gross CV)", 0.31915)]),
            ("Coal (electricity generation)", &[("tonnes", 2213.33), ("kWh (Net CV)", 0.33443), ("kWh (Gross CV)", 0.3177)]),
            ("Coal (domestic)", &[("tonnes", 2632.0), ("kWh (Net CV)", 0.33115), ("kWh (Gross CV)", 0.31459)]),
            ("Coking coal", &[("tonnes", 3144.16), ("kWh (Net CV)", 0.37431), ("kWh (Gross CV)", 0.35559)]),
            ("Petroleum coke", &[("tonnes", 3377.05), ("kWh (Net CV)", 0.35786), ("kWh (Gross CV)", 0.33997)]),
            ("Coal (electricity generation - home produced coal only)", &[("tonnes", 2209.87), ("kWh (Net CV)", 0.33443), ("kWh (Gross CV)", 0.3177)]),
        ],
    ),
    (
        "Biofuel",
        &[
            ("Bioethanol", &[("litres", 0.00901), ("GJ", 0.42339), ("kg", 0.01135)]),
            ("Biodiesel ME", &[("litres", 0.16751), ("GJ", 5.05961), ("kg", 0.18822)]),
            ("Biomethane (compressed)", &[("litres", 0.0), ("GJ", 0.10625), ("kg", 0.00521)]),
            ("Biodiesel ME (from used cooking oil)", &[("litres", 0.16751), ("GJ", 5.05961), ("kg", 0.18822)]),
            ("Biodiesel ME (from tallow)", &[("litres", 0.16751), ("GJ", 5.05961), ("kg", 0.18822)]),
            ("Biodiesel HVO", &[("litres", 0.03558), ("GJ", 1.03677), ("kg", 0.04562)]),
            ("Biopropane", &[("litres", 0.00213), ("GJ", 0.08952), ("kg", 0.00415)]),
            ("Development diesel", &[("litres", 0.03705), ("GJ", 1.03677), ("kg", 0.04461)]),
            ("Development petrol", &[("litres", 0.01402), ("GJ", 0.42339), ("kg", 0.01890)]),
            ("Off road biodiesel", &[("litres", 0.16751), ("GJ", 5.05961), ("kg", 0.18822)]),
            ("Biomethane (liquified)", &[("litres", 0.0), ("GJ", 0.10625), ("kg", 0.00521)]),
            ("Methanol (bio)", &[("litres", 0.00669), ("GJ", 0.42339), ("kg", 0.00844)]),
            ("Avtur (renewable)", &[("litres", 0.02531), ("GJ", 0.72340), ("kg", 0.03179)]),
        ],
    ),
    (
        "Biomass",
        &[
            ("Wood logs", &[("tonnes", 46.98508), ("kWh", 0.01150)]),
            ("Wood chips", &[("tonnes", 43.43964), ("kWh", 0.01150)]),
            ("Wood pellets", &[("tonnes", 55.19389), ("kWh", 0.01150)]),
            ("Grass/straw", &[("tonnes", 47.35709), ("kWh", 0.01273)]),
        ],
    ),
    (
        "Biogas",
        &[
            ("Biogas", &[("tonnes", 1.24314), ("kWh", 0.00022)]),
            ("Landfill gas", &[("tonnes", 0.69696), ("kWh", 0.00020)]),
        ],
    ),
    (
        "Other Fuels - Solid",
        &[
            ("Municipal Solid Waste", &[("tonnes", 90.70)]),
            ("Petroleum Coke (Solid)", &[("tonnes", 102.41)]),
            ("Plastics", &[("tonnes", 75.00)]),
            ("Tires", &[("tonnes", 85.97)]),
        ],
    ),
    (
        "Biomass Fuels - Solid",
        &[
            ("Agricultural Byproducts", &[("tonnes", 118.17)]),
            ("Peat", &[("tonnes", 111.84)]),
            ("Solid Byproducts", &[("tonnes", 105.51)]),
            ("Wood and Wood Residuals", &[("tonnes", 93.80)]),
        ],
    ),
];

const VEHICLES: &[Branch] = &[
    (
        "Cars (by market segment)",
        &[
            ("Mini", &[("km", 0.10828), ("miles", 0.17425)]),
            ("Supermini", &[("km", 0.13284), ("miles", 0.21378)]),
            ("Lower medium", &[("km", 0.14349), ("miles", 0.23092)]),
            ("Upper medium", &[("km", 0.16026), ("miles", 0.25792)]),
            ("Executive", &[("km", 0.16920), ("miles", 0.27230)]),
            ("Luxury", &[("km", 0.20464), ("miles", 0.32934)]),
            ("Sports", &[("km", 0.17155), ("miles", 0.27608)]),
            ("Dual purpose 4X4", &[("km", 0.19805), ("miles", 0.31874)]),
            ("MPV", &[("km", 0.17904), ("miles", 0.28814)]),
        ],
    ),
    (
        "Cars (by size)",
        &[
            ("Small car", &[("km", 0.14172), ("miles", 0.22807)]),
            ("Medium car", &[("km", 0.17006), ("miles", 0.27368)]),
            ("Large car", &[("km", 0.20839), ("miles", 0.33537)]),
            ("Average car", &[("km", 0.17136), ("miles", 0.27578)]),
        ],
    ),
    (
        "Motorbike",
        &[
            ("Small", &[("km", 0.08094), ("miles", 0.13027)]),
            ("Medium", &[("km", 0.09826), ("miles", 0.15813)]),
            ("Large", &[("km", 0.13072), ("miles", 0.21037)]),
            ("Average", &[("km", 0.11138), ("miles", 0.17925)]),
        ],
    ),
];

const DELIVERY_VEHICLES: &[Branch] = &[
    (
        "Vans",
        &[
            ("Class I (up to 1.305 tonnes)", &[("km", 0.15572), ("miles", 0.25061)]),
            ("Class II (1.305 to 1.74 tonnes)", &[("km", 0.19094), ("miles", 0.30728)]),
            ("Class III (1.74 to 3.5 tonnes)", &[("km", 0.27712), ("miles", 0.44598)]),
            ("Average (up to 3.5 tonnes)", &[("km", 0.25395), ("miles", 0.40870)]),
        ],
    ),
    (
        "HGV (all diesel)",
        &[
            ("Rigid (>3.5 - 7.5 tonnes)", &[("km", 0.49005), ("miles", 0.78865)]),
            ("Rigid (>7.5 tonnes-17 tonnes)", &[("km", 0.59839), ("miles", 0.96301)]),
            ("Rigid (>17 tonnes)", &[("km", 0.98074), ("miles", 1.57834)]),
            ("All rigids", &[("km", 0.82844), ("miles", 1.33324)]),
            ("Articulated (>3.5 - 33t)", &[("km", 0.77250), ("miles", 1.24322)]),
            ("Articulated (>33t)", &[("km", 0.91969), ("miles", 1.48010)]),
            ("All artics", &[("km", 0.91411), ("miles", 1.47111)]),
            ("All HGVs", &[("km", 0.87910), ("miles", 1.41477)]),
        ],
    ),
    (
        "HGVs refrigerated (all diesel)",
        &[
            ("Rigid (>3.5 - 7.5 tonnes)", &[("km", 0.58462), ("miles", 0.94086)]),
            ("Rigid (>7.5 tonnes-17 tonnes)", &[("km", 0.71387), ("miles", 1.14886)]),
            ("Rigid (>17 tonnes)", &[("km", 1.17001), ("miles", 1.88295)]),
            ("All rigids", &[("km", 0.98832), ("miles", 1.59054)]),
            ("Articulated (>3.5 - 33t)", &[("km", 0.89538), ("miles", 1.44098)]),
            ("Articulated (>33t)", &[("km", 1.06599), ("miles", 1.71554)]),
            ("All artics", &[("km", 1.05952), ("miles", 1.70513)]),
            ("All HGVs", &[("km", 1.03112), ("miles", 1.65943)]),
        ],
    ),
];

const REFRIGERANT_GWP: &[Leaf] = &[
    ("Carbon dioxide", 1.0),
    ("Methane", 28.0),
    ("Nitrous oxide", 265.0),
    ("HFC-23", 12400.0),
    ("HFC-32", 677.0),
    ("HFC-41", 116.0),
    ("HFC-125", 3170.0),
    ("HFC-134", 1120.0),
    ("HFC-134a", 1300.0),
    ("HFC-143", 328.0),
    ("HFC-143a", 4800.0),
    ("HFC-152a", 138.0),
    ("HFC-227ea", 3350.0),
    ("HFC-236fa", 8060.0),
    ("HFC-245fa", 858.0),
    ("HFC-43-I0mee", 1650.0),
    ("Perfluoromethane (PFC-14)", 6630.0),
    ("Perfluoroethane (PFC-116)", 11100.0),
    ("Perfluoropropane (PFC-218)", 8900.0),
    ("Perfluorocyclobutane (PFC-318)", 9540.0),
    ("Perfluorobutane (PFC-3-1-10)", 9200.0),
    ("Perfluoropentane (PFC-4-1-12)", 8550.0),
    ("Perfluorohexane (PFC-5-1-14)", 7910.0),
    ("PFC-9-1-18", 7190.0),
    ("Perfluorocyclopropane", 9200.0),
    ("Sulphur hexafluoride (SF6)", 23500.0),
    ("HFC-152", 16.0),
    ("HFC-161", 4.0),
    ("HFC-236cb", 1210.0),
    ("HFC-236ea", 1330.0),
    ("HFC-245ca", 716.0),
    ("HFC-365mfc", 804.0),
    ("Nitrogen trifluoride", 16100.0),
];

const GRID_COUNTRIES: &[Leaf] = &[("UAE", 0.4041), ("Pakistan", 0.425)];

const MOBILE_COMBUSTION: &[(&str, &[Leaf])] = &[
    ("Aviation Gasoline", &[("gallon", 8.31)]),
    ("Biodiesel (100%)", &[("gallon", 9.45)]),
    ("Compressed Natural Gas (CNG)", &[("scf", 0.05444)]),
    ("Diesel Fuel", &[("gallon", 10.21)]),
    ("Ethanol (100%)", &[("gallon", 5.75)]),
    ("Jet Fuel", &[("gallon", 9.75)]),
    ("Liquefied Natural Gas (LNG)", &[("gallon", 4.50)]),
    ("Liquefied Petroleum Gases (LPG)", &[("gallon", 5.68)]),
    ("Motor Gasoline", &[("gallon", 8.78)]),
    ("Residual Fuel Oil", &[("gallon", 11.27)]),
];

const SCOPE3: &[(&str, &[Leaf])] = &[
    ("Business Travel", &[("km", 0.14), ("miles", 0.23)]),
    ("Waste", &[("tonnes", 0.5), ("kg", 0.0005)]),
];

/// kg CO2, g CH4 and g N2O per mmBtu of purchased or generated steam.
const HEAT_STEAM: &[(&str, &str, [f64; 3])] = &[
    ("Onsite heat and steam", "mmBtu", [66.33, 1.25, 0.125]),
    ("District heat and steam", "mmBtu", [66.33, 1.25, 0.125]),
];

/// Vehicle type, model year, g CH4 and g N2O per mile.
const ON_ROAD_GASOLINE: &[(&str, &str, f64, f64)] = &[
    ("Passenger Cars", "1984-1993", 0.0704, 0.0647),
    ("Passenger Cars", "1994-2004", 0.0531, 0.0282),
    ("Passenger Cars", "2005-2014", 0.0173, 0.0036),
    ("Passenger Cars", "2015-2021", 0.0070, 0.0012),
    ("Light-Duty Trucks", "1987-1993", 0.0813, 0.1035),
    ("Light-Duty Trucks", "1994-2004", 0.0646, 0.0515),
    ("Light-Duty Trucks", "2005-2014", 0.0167, 0.0066),
    ("Light-Duty Trucks", "2015-2021", 0.0087, 0.0017),
    ("Heavy-Duty Vehicles", "1985-2004", 0.1200, 0.1300),
    ("Heavy-Duty Vehicles", "2005-2021", 0.0302, 0.0202),
    ("Motorcycles", "1960-1995", 0.0672, 0.0069),
    ("Motorcycles", "1996-2021", 0.0672, 0.0069),
];

/// Vehicle type, fuel type, model year when the pair is listed by year,
/// g CH4 and g N2O per mile.
const ON_ROAD_DIESEL: &[(&str, &str, Option<&str>, f64, f64)] = &[
    ("Passenger Cars", "Diesel", Some("1960-1982"), 0.0006, 0.0012),
    ("Passenger Cars", "Diesel", Some("1983-2006"), 0.0005, 0.0010),
    ("Passenger Cars", "Diesel", Some("2007-2021"), 0.0302, 0.0192),
    ("Light-Duty Trucks", "Diesel", Some("1960-1982"), 0.0011, 0.0017),
    ("Light-Duty Trucks", "Diesel", Some("1983-2006"), 0.0009, 0.0014),
    ("Light-Duty Trucks", "Diesel", Some("2007-2021"), 0.0290, 0.0214),
    ("Medium- and Heavy-Duty Vehicles", "Diesel", Some("1960-2006"), 0.0051, 0.0048),
    ("Medium- and Heavy-Duty Vehicles", "Diesel", Some("2007-2021"), 0.0095, 0.0431),
    ("Light-Duty Cars", "CNG", None, 0.0850, 0.0032),
    ("Light-Duty Cars", "Ethanol", None, 0.0078, 0.0073),
    ("Light-Duty Cars", "LPG", None, 0.0085, 0.0067),
    ("Medium- and Heavy-Duty Vehicles", "CNG", None, 1.9660, 0.0176),
    ("Medium- and Heavy-Duty Vehicles", "LNG", None, 1.9660, 0.0176),
    ("Buses", "CNG", None, 2.4280, 0.0390),
];

/// Vehicle type, fuel type, g CH4 and g N2O per gallon.
const NON_ROAD: &[(&str, &str, f64, f64)] = &[
    ("Agricultural Equipment", "Diesel", 1.2800, 0.4900),
    ("Agricultural Equipment", "Gasoline (4 stroke)", 7.4100, 0.2100),
    ("Aircraft", "Jet Fuel", 0.0000, 0.3000),
    ("Construction/Mining Equipment", "Diesel", 0.5700, 0.2600),
    ("Construction/Mining Equipment", "Gasoline (4 stroke)", 13.1700, 0.2200),
    ("Lawn and Garden Equipment", "Gasoline (2 stroke)", 13.1300, 0.0600),
    ("Locomotives", "Diesel", 0.8000, 0.2600),
    ("Ships and Boats", "Diesel", 0.7400, 0.4600),
    ("Ships and Boats", "Residual Fuel Oil", 0.6000, 0.4600),
];

fn trace_gases(ch4: f64, n2o: f64) -> VehicleGasFactors {
    VehicleGasFactors {
        ch4: Some(ch4),
        n2o: Some(n2o),
        ..Default::default()
    }
}

fn on_road_gasoline() -> GasolineTable {
    let mut table = GasolineTable::new();
    for (vehicle, year, ch4, n2o) in ON_ROAD_GASOLINE {
        table
            .entry_or_default(vehicle)
            .put(year, trace_gases(*ch4, *n2o));
    }
    table
}

fn on_road_diesel() -> DieselTable {
    let mut table = DieselTable::new();
    for (vehicle, fuel, year, ch4, n2o) in ON_ROAD_DIESEL {
        let pair = table.entry_or_default(vehicle).entry_or_default(fuel);
        match year {
            Some(year) => pair.by_year.put(year, trace_gases(*ch4, *n2o)),
            None => pair.any_year = Some(trace_gases(*ch4, *n2o)),
        }
    }
    table
}

fn non_road() -> NonRoadTable {
    let mut table = NonRoadTable::new();
    for (vehicle, fuel, ch4, n2o) in NON_ROAD {
        table
            .entry_or_default(vehicle)
            .put(fuel, trace_gases(*ch4, *n2o));
    }
    table
}

fn flat(leaves: &[Leaf]) -> FlatTable {
    leaves
        .iter()
        .map(|(key, factor)| (key.to_string(), *factor))
        .collect()
}

fn two_level(branches: &[(&str, &[Leaf])]) -> TwoLevelTable {
    branches
        .iter()
        .map(|(key, leaves)| (key.to_string(), flat(leaves)))
        .collect()
}

fn three_level(branches: &[Branch]) -> ThreeLevelTable {
    branches
        .iter()
        .map(|(key, children)| (key.to_string(), two_level(children)))
        .collect()
}

fn heat_steam() -> HeatSteamTable {
    let mut table = HeatSteamTable::new();
    for (activity, unit, [co2, ch4, n2o]) in HEAT_STEAM {
        let factors = GasFactors {
            co2: Some(*co2),
            ch4: Some(*ch4),
            n2o: Some(*n2o),
        };
        table.entry_or_default(activity).put(unit, factors);
    }
    table
}

pub(crate) fn library() -> FactorLibrary {
    FactorLibrary {
        fuels: three_level(FUELS),
        refrigerants: flat(REFRIGERANT_GWP),
        vehicles: three_level(VEHICLES),
        delivery_vehicles: three_level(DELIVERY_VEHICLES),
        grid: flat(GRID_COUNTRIES),
        mobile: two_level(MOBILE_COMBUSTION),
        on_road_gasoline: on_road_gasoline(),
        on_road_diesel: on_road_diesel(),
        non_road: non_road(),
        heat_steam: heat_steam(),
        scope3: two_level(SCOPE3),
    }
}
