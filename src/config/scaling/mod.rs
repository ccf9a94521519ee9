// ABOUTME: Meal scaling configuration container with validation and environment overrides
// ABOUTME: Orchestrates classification, strategy, and solver layer configs behind a global instance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Meal Scaling Configuration Module
//!
//! Every threshold the engine uses lives here, with defaults matching the
//! documented behaviour of each layer.
//!
//! # Module Structure
//!
//! - `classification` - Structural anchor and fine-tuning rules
//! - `strategy` - Compatibility factors, approach thresholds, preservation levels
//! - `layers` - Global, hierarchical, and LP layer parameters plus escalation
//!
//! # Configuration Methods
//!
//! 1. Environment variables (highest priority):
//!    ```bash
//!    export MEAL_SCALING_MAX_ITERATIONS=15
//!    export MEAL_SCALING_ESCALATE=false
//!    ```
//!
//! 2. Default values (if env vars not set)

pub mod classification;
pub mod error;
pub mod layers;
pub mod strategy;

pub use classification::ClassificationConfig;
pub use error::ConfigError;
pub use layers::{AdjustmentBounds, EngineConfig, GlobalScalingConfig, HierarchicalConfig, LpConfig};
pub use strategy::{
    ApproachSelectionConfig, CompatibilityConfig, PreservationConfig, StrategyConfig,
};

use std::env;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::OnceLock;

use pierre_meal_core::constants::scaling::MAX_STRUCTURAL_INGREDIENTS;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Global configuration singleton
static MEAL_SCALING_CONFIG: OnceLock<MealScalingConfig<true>> = OnceLock::new();

/// Main meal scaling configuration container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealScalingConfig<const VALIDATED: bool = false> {
    /// Ingredient role assignment
    pub classification: ClassificationConfig,
    /// Approach selection and preservation targets
    pub strategy: StrategyConfig,
    /// Layer 1 parameters
    pub global_scaling: GlobalScalingConfig,
    /// Layer 2 parameters
    pub hierarchical: HierarchicalConfig,
    /// Layer 3 parameters
    pub lp: LpConfig,
    /// Orchestrator behaviour
    pub engine: EngineConfig,
    #[serde(skip)]
    _phantom: PhantomData<()>,
}

impl MealScalingConfig<true> {
    /// Get the global configuration instance
    pub fn global() -> &'static Self {
        MEAL_SCALING_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                warn!("Failed to load meal scaling config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Load configuration from defaults and environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_classification()?;
        self.validate_strategy()?;
        self.validate_layers()?;
        Ok(())
    }

    fn validate_classification(&self) -> Result<(), ConfigError> {
        let classification = &self.classification;

        if classification.structural_calorie_share <= 0.0
            || classification.structural_calorie_share > 1.0
        {
            return Err(ConfigError::ValueOutOfRange(
                "structural_calorie_share must be in (0, 1]",
            ));
        }
        if !(1..=MAX_STRUCTURAL_INGREDIENTS).contains(&classification.max_structural) {
            return Err(ConfigError::ValueOutOfRange(
                "max_structural must be between 1 and 3",
            ));
        }
        if classification.secondary_min_kcal_per_gram <= 0.0
            || classification.secondary_max_grams <= 0.0
        {
            return Err(ConfigError::ValueOutOfRange(
                "secondary density and mass thresholds must be positive",
            ));
        }

        Ok(())
    }

    fn validate_strategy(&self) -> Result<(), ConfigError> {
        let selection = &self.strategy.selection;
        if selection.hierarchical_threshold >= selection.global_scaling_threshold {
            return Err(ConfigError::InvalidRange(
                "hierarchical_threshold must be < global_scaling_threshold",
            ));
        }
        if !(0.0..=1.0).contains(&selection.global_scaling_threshold)
            || !(0.0..=1.0).contains(&selection.hierarchical_threshold)
        {
            return Err(ConfigError::ValueOutOfRange(
                "approach thresholds must be within [0, 1]",
            ));
        }

        let compatibility = &self.strategy.compatibility;
        if compatibility.low_flexible_ratio >= compatibility.high_flexible_ratio {
            return Err(ConfigError::InvalidRange(
                "low_flexible_ratio must be < high_flexible_ratio",
            ));
        }
        let factors = [
            compatibility.high_structural_factor,
            compatibility.low_flexible_factor,
            compatibility.high_flexible_bonus,
            compatibility.many_large_gaps_factor,
            compatibility.single_large_gap_bonus,
            compatibility.conflicting_directions_factor,
            compatibility.dominant_mismatch_factor,
            compatibility.simple_complexity_factor,
            compatibility.complex_complexity_factor,
        ];
        if factors.iter().any(|factor| *factor <= 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "compatibility factors must be positive",
            ));
        }

        if compatibility.conflicting_directions_ceiling < 0.0
            || compatibility.conflicting_directions_ceiling >= selection.global_scaling_threshold
        {
            return Err(ConfigError::InvalidRange(
                "conflicting_directions_ceiling must be in [0, global_scaling_threshold)",
            ));
        }

        let preservation = &self.strategy.preservation;
        if preservation.min_level > preservation.max_level
            || preservation.min_level < 0.0
            || preservation.max_level > 1.0
        {
            return Err(ConfigError::InvalidRange(
                "preservation levels must satisfy 0 <= min_level <= max_level <= 1",
            ));
        }

        Ok(())
    }

    fn validate_layers(&self) -> Result<(), ConfigError> {
        let global = &self.global_scaling;
        if global.min_factor <= 0.0 || global.min_factor >= global.max_factor {
            return Err(ConfigError::InvalidRange(
                "global scaling factors must satisfy 0 < min_factor < max_factor",
            ));
        }

        let hierarchical = &self.hierarchical;
        if hierarchical.max_iterations == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "hierarchical max_iterations must be at least 1",
            ));
        }
        for bounds in [hierarchical.primary_bounds, hierarchical.secondary_bounds] {
            if bounds.max_increase < 0.0 || !(0.0..1.0).contains(&bounds.max_decrease) {
                return Err(ConfigError::ValueOutOfRange(
                    "adjustment bounds need max_increase >= 0 and max_decrease in [0, 1)",
                ));
            }
        }
        if hierarchical.step_fractions.is_empty()
            || hierarchical
                .step_fractions
                .iter()
                .any(|fraction| *fraction <= 0.0 || *fraction > 1.0)
        {
            return Err(ConfigError::ValueOutOfRange(
                "step_fractions must be non-empty and within (0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&hierarchical.preservation_floor) {
            return Err(ConfigError::ValueOutOfRange(
                "preservation_floor must be within [0, 1]",
            ));
        }

        let lp = &self.lp;
        if !(0.0..1.0).contains(&lp.structural_max_deviation) {
            return Err(ConfigError::ValueOutOfRange(
                "structural_max_deviation must be within [0, 1)",
            ));
        }
        let weights = [
            lp.calorie_weight,
            lp.protein_weight,
            lp.carbs_weight,
            lp.fat_weight,
        ];
        if weights.iter().any(|weight| *weight < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
            return Err(ConfigError::InvalidWeights(
                "LP macro weights must be non-negative with a positive sum",
            ));
        }
        if lp.priority_weight_multiplier < 1.0 {
            return Err(ConfigError::ValueOutOfRange(
                "priority_weight_multiplier must be >= 1.0",
            ));
        }

        Ok(())
    }

    /// Apply a single environment variable override if present
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        match env::var(env_var_name) {
            Ok(val) => {
                *target = val
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
                Ok(())
            }
            Err(env::VarError::NotPresent) => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Classification overrides
        Self::apply_env_var(
            "MEAL_SCALING_STRUCTURAL_CALORIE_SHARE",
            &mut self.classification.structural_calorie_share,
        )?;
        Self::apply_env_var(
            "MEAL_SCALING_MAX_STRUCTURAL",
            &mut self.classification.max_structural,
        )?;

        // Strategy overrides
        Self::apply_env_var(
            "MEAL_SCALING_GLOBAL_THRESHOLD",
            &mut self.strategy.selection.global_scaling_threshold,
        )?;
        Self::apply_env_var(
            "MEAL_SCALING_HIERARCHICAL_THRESHOLD",
            &mut self.strategy.selection.hierarchical_threshold,
        )?;
        Self::apply_env_var(
            "MEAL_SCALING_LAST_MEAL_GAP",
            &mut self.strategy.selection.last_meal_gap_threshold,
        )?;

        // Layer overrides
        Self::apply_env_var(
            "MEAL_SCALING_MIN_FACTOR",
            &mut self.global_scaling.min_factor,
        )?;
        Self::apply_env_var(
            "MEAL_SCALING_MAX_FACTOR",
            &mut self.global_scaling.max_factor,
        )?;
        Self::apply_env_var(
            "MEAL_SCALING_MAX_ITERATIONS",
            &mut self.hierarchical.max_iterations,
        )?;
        Self::apply_env_var(
            "MEAL_SCALING_CONVERGENCE_THRESHOLD",
            &mut self.hierarchical.convergence_threshold,
        )?;
        Self::apply_env_var(
            "MEAL_SCALING_LP_STRUCTURAL_DEVIATION",
            &mut self.lp.structural_max_deviation,
        )?;

        // Engine overrides
        Self::apply_env_var(
            "MEAL_SCALING_ESCALATE",
            &mut self.engine.escalate_on_shortfall,
        )?;

        Ok(self)
    }
}

impl MealScalingConfig<false> {
    /// Check a deserialized configuration and mark it usable by the engine
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint
    pub fn into_validated(self) -> Result<MealScalingConfig<true>, ConfigError> {
        let config = MealScalingConfig::<true> {
            classification: self.classification,
            strategy: self.strategy,
            global_scaling: self.global_scaling,
            hierarchical: self.hierarchical,
            lp: self.lp,
            engine: self.engine,
            _phantom: PhantomData,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for MealScalingConfig<true> {
    fn default() -> Self {
        Self {
            classification: ClassificationConfig::default(),
            strategy: StrategyConfig::default(),
            global_scaling: GlobalScalingConfig::default(),
            hierarchical: HierarchicalConfig::default(),
            lp: LpConfig::default(),
            engine: EngineConfig::default(),
            _phantom: PhantomData,
        }
    }
}
