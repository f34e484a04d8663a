//! Regional CO₂ emission factors
//!
//! Static reference data compiled into the binary: average pounds of CO₂
//! emitted per megawatt-hour of electricity generated, keyed by first-level
//! region name, for a single supported country.

use duke_status_types::GeoLocation;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

const DATASET_JSON: &str = include_str!("../data/emission_factors.json");

/// Parsed dataset, shared by every emissions source
static EMISSION_FACTORS: Lazy<Arc<EmissionFactors>> = Lazy::new(|| {
    match serde_json::from_str::<EmissionFactors>(DATASET_JSON) {
        Ok(factors) => {
            log::info!(
                "Loaded {} emission factors for {}",
                factors.regions.len(),
                factors.country
            );
            Arc::new(factors)
        }
        Err(e) => {
            log::error!("Bundled emission factor dataset is invalid: {}", e);
            Arc::new(EmissionFactors::default())
        }
    }
});

/// Pounds of CO₂ per MWh by region
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmissionFactors {
    /// The only country the dataset covers, as named by the geolocation service
    pub country: String,
    #[serde(default)]
    pub unit: String,
    pub regions: HashMap<String, f64>,
}

impl EmissionFactors {
    /// The bundled dataset
    pub fn bundled() -> Arc<Self> {
        Arc::clone(&EMISSION_FACTORS)
    }

    pub fn new(country: &str, regions: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            country: country.to_string(),
            unit: "lb CO2 / MWh".to_string(),
            regions: regions.into_iter().collect(),
        }
    }

    /// Factor for `location`, or `None` when the country is unsupported or the region unknown
    pub fn factor_for(&self, location: &GeoLocation) -> Option<f64> {
        if location.country != self.country {
            return None;
        }
        self.regions.get(&location.region).copied()
    }
}
