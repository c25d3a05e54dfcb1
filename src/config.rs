//! Site, array, household and house constants.
//!
//! Every section and key is optional; missing values fall back to the
//! Marseille reference installation.
//!
//! ```toml
//! [site]
//! name = "Marseille"
//! irradiation_kwh_m2 = 1824.0
//!
//! [array]
//! panel_power_kw = 0.4
//! derate = 0.85
//!
//! [household]
//! annual_consumption_kwh = 8260.0
//!
//! [house]
//! roof_length_m = 12.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShadingError};
use crate::types::{
    check_bounded, check_fraction, ArraySpec, ConsumptionProfile, HouseProfile, Weather,
    MAX_IRRADIATION_KWH_M2, MAX_MODULE_AREA_M2, MAX_PANEL_POWER_KW,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub site: SiteSettings,
    pub array: ArraySettings,
    pub household: ConsumptionProfile,
    pub house: HouseProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub name: String,
    pub irradiation_kwh_m2: f64,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: "Marseille".to_string(),
            irradiation_kwh_m2: ArraySpec::default().irradiation_kwh_m2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArraySettings {
    pub panel_power_kw: f64,
    pub module_area_m2: f64,
    pub derate: f64,
}

impl SiteSettings {
    pub fn validate(&self) -> Result<()> {
        check_bounded("irradiation_kwh_m2", self.irradiation_kwh_m2, MAX_IRRADIATION_KWH_M2)
    }
}

impl ArraySettings {
    pub fn validate(&self) -> Result<()> {
        check_bounded("panel_power_kw", self.panel_power_kw, MAX_PANEL_POWER_KW)?;
        check_bounded("module_area_m2", self.module_area_m2, MAX_MODULE_AREA_M2)?;
        check_fraction("derate", self.derate)
    }
}

impl Default for ArraySettings {
    fn default() -> Self {
        let reference = ArraySpec::default();
        Self {
            panel_power_kw: reference.panel_power_kw,
            module_area_m2: reference.module_area_m2,
            derate: reference.derate,
        }
    }
}

impl EstimatorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ShadingError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EstimatorConfig = toml::from_str(content)
            .map_err(|e| ShadingError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        log::debug!("loaded estimator config for site {}", config.site.name);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.site.validate()?;
        self.array.validate()?;
        self.household.validate()?;
        self.house.validate()
    }

    pub fn array_spec(&self, panel_count: u32, weather: Weather) -> Result<ArraySpec> {
        let spec = ArraySpec {
            panel_count,
            panel_power_kw: self.array.panel_power_kw,
            module_area_m2: self.array.module_area_m2,
            irradiation_kwh_m2: self.site.irradiation_kwh_m2,
            derate: self.array.derate,
            weather,
        };
        spec.validate()?;
        Ok(spec)
    }
}
