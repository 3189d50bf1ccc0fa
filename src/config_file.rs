//! Settings and answers files
//!
//! `FlowSettings` tunes a session (variant, analysis timing, auto-advance
//! delay, filing fee). `ReplayScript` holds the answers used to drive the
//! wizard headlessly. Both are JSON.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::analysis::{AnalysisTiming, ANALYSIS_DURATION, TICK_INTERVAL};
use crate::catalog::STATE_FILING_FEE;
use crate::form::FormUpdate;
use crate::types::FlowVariant;
use crate::wizard::{WizardSettings, AUTO_ADVANCE_DELAY};

/// Session tunables loaded from `--settings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowSettings {
    /// Business-age step flavour ("date" or "status")
    pub variant: FlowVariant,
    /// Length of the simulated analysis
    pub analysis_duration_ms: u64,
    /// Progress sampling interval
    pub tick_interval_ms: u64,
    /// Delay before a single-choice answer moves forward
    pub auto_advance_delay_ms: u64,
    /// Filing fee shown in the order summary
    pub state_filing_fee: Decimal,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            variant: FlowVariant::default(),
            analysis_duration_ms: ANALYSIS_DURATION.as_millis() as u64,
            tick_interval_ms: TICK_INTERVAL.as_millis() as u64,
            auto_advance_delay_ms: AUTO_ADVANCE_DELAY.as_millis() as u64,
            state_filing_fee: STATE_FILING_FEE,
        }
    }
}

impl FlowSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save settings to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize settings to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write settings to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {:?}", path.as_ref()))?;

        let settings: Self =
            serde_json::from_str(&content).context("Failed to parse settings JSON")?;

        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            anyhow::bail!("Tick interval must be positive");
        }
        if self.analysis_duration_ms < self.tick_interval_ms {
            anyhow::bail!(
                "Analysis duration ({}ms) must be at least one tick ({}ms)",
                self.analysis_duration_ms,
                self.tick_interval_ms
            );
        }
        if self.state_filing_fee.is_sign_negative() {
            anyhow::bail!("State filing fee cannot be negative");
        }
        Ok(())
    }

    pub fn analysis_timing(&self) -> AnalysisTiming {
        AnalysisTiming {
            duration: Duration::from_millis(self.analysis_duration_ms),
            tick_interval: Duration::from_millis(self.tick_interval_ms),
        }
    }

    pub fn wizard_settings(&self) -> WizardSettings {
        WizardSettings {
            variant: self.variant,
            timing: self.analysis_timing(),
            auto_advance_delay: Duration::from_millis(self.auto_advance_delay_ms),
            state_filing_fee: self.state_filing_fee,
        }
    }
}

/// Answers for a headless run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    /// Overrides the settings variant when present
    pub variant: Option<FlowVariant>,
    /// Calendar date the run pretends is today
    pub today: Option<NaiveDate>,
    pub answers: FormUpdate,
}

impl ReplayScript {
    /// Load a script from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read answers from {:?}", path.as_ref()))?;

        let script: Self =
            serde_json::from_str(&content).context("Failed to parse answers JSON")?;

        Ok(script)
    }

    /// Save a script to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize answers to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write answers to {:?}", path.as_ref()))?;

        Ok(())
    }
}
