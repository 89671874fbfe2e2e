use crate::absence::AbsenceRules;
use crate::model::{PlanningPeriod, ServiceType};
use crate::scheduler::{AllocOptions, PlanError, Shuffled};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const DEFAULT_UNFILLED_MARKER: &str = "BOŞ";

/// Configuration d'une planification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConfig {
    pub period: PlanningPeriod,
    pub services: Vec<ServiceType>,
    #[serde(default)]
    pub options: AllocOptions,
    #[serde(default)]
    pub absence: AbsenceRules,
    /// Graine du mélange quotidien des services ; absente = aléatoire.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_unfilled_marker")]
    pub unfilled_marker: String,
}

fn default_unfilled_marker() -> String {
    DEFAULT_UNFILLED_MARKER.to_string()
}

impl Default for PlanConfig {
    /// Décembre 2024, salle de naissance et urgences.
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap_or(NaiveDate::MIN);
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or(NaiveDate::MIN);
        Self {
            period: PlanningPeriod { start, end },
            services: vec![
                ServiceType::new("DOĞUMHANE", "maternity").with_keywords(["DOGUM"]),
                ServiceType::new("ACİL", "emergency").with_keywords(["ACIL"]),
            ],
            options: AllocOptions::default(),
            absence: AbsenceRules::default(),
            seed: None,
            unfilled_marker: default_unfilled_marker(),
        }
    }
}

impl PlanConfig {
    pub fn validate(&self) -> Result<(), PlanError> {
        self.period.validate()?;
        if self.services.is_empty() {
            return Err(PlanError::NoServices);
        }
        let mut seen = HashSet::new();
        for service in &self.services {
            if service.id.trim().is_empty() {
                return Err(PlanError::InvalidConfig("service id cannot be empty".into()));
            }
            if service.rotation.trim().is_empty() {
                return Err(PlanError::InvalidConfig(format!(
                    "service {} has an empty rotation",
                    service.id
                )));
            }
            if !seen.insert(service.id.as_str()) {
                return Err(PlanError::InvalidConfig(format!(
                    "duplicate service id {}",
                    service.id
                )));
            }
        }
        Ok(())
    }

    /// Ordre des services par jour, selon `seed`.
    pub fn ordering(&self) -> Shuffled<StdRng> {
        match self.seed {
            Some(seed) => Shuffled::seeded(seed),
            None => Shuffled::from_entropy(),
        }
    }
}

pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<PlanConfig> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let config: PlanConfig = serde_json::from_slice(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

pub fn export_config_json<P: AsRef<Path>>(path: P, config: &PlanConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}
