// ABOUTME: Tests for meal scaling configuration defaults, validation, and env overrides
// ABOUTME: Validates range checks, parse failures, and conversion into application errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

mod common;

use pierre_meal_scaler::config::scaling::{ConfigError, MealScalingConfig};
use pierre_meal_scaler::errors::{AppError, ErrorCode};
use pierre_meal_scaler::intelligence::meal_scaling::{MealScalingEngine, ScalingMethod};
use pierre_meal_scaler::models::DailyContext;
use serial_test::serial;

const OVERRIDES: [&str; 5] = [
    "MEAL_SCALING_MAX_ITERATIONS",
    "MEAL_SCALING_MAX_STRUCTURAL",
    "MEAL_SCALING_GLOBAL_THRESHOLD",
    "MEAL_SCALING_ESCALATE",
    "MEAL_SCALING_LP_STRUCTURAL_DEVIATION",
];

fn clear_overrides() {
    for name in OVERRIDES {
        env::remove_var(name);
    }
}

fn defaults() -> MealScalingConfig<true> {
    MealScalingConfig::default()
}

#[test]
fn test_default_config_validation() {
    let config = defaults();
    assert!(config.validate().is_ok());

    assert_eq!(config.classification.max_structural, 3);
    assert!((config.global_scaling.min_factor - 0.5).abs() < f64::EPSILON);
    assert!((config.global_scaling.max_factor - 3.0).abs() < f64::EPSILON);
    assert_eq!(config.hierarchical.max_iterations, 10);
    assert!((config.lp.structural_max_deviation - 0.05).abs() < f64::EPSILON);
    assert!(config.engine.escalate_on_shortfall);
}

#[test]
fn test_inverted_factor_range_is_rejected() {
    let mut config = defaults();
    config.global_scaling.min_factor = 2.0;
    config.global_scaling.max_factor = 1.5;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidRange(_))
    ));
}

#[test]
fn test_zero_lp_weights_are_rejected() {
    let mut config = defaults();
    config.lp.calorie_weight = 0.0;
    config.lp.protein_weight = 0.0;
    config.lp.carbs_weight = 0.0;
    config.lp.fat_weight = 0.0;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWeights(_))
    ));
}

#[test]
fn test_invalid_step_fractions_are_rejected() {
    let mut config = defaults();
    config.hierarchical.step_fractions = vec![0.5, 1.5];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValueOutOfRange(_))
    ));

    config.hierarchical.step_fractions.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_preservation_bounds_must_be_ordered() {
    let mut config = defaults();
    config.strategy.preservation.min_level = 0.9;
    config.strategy.preservation.max_level = 0.8;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidRange(_))
    ));
}

#[test]
#[serial]
fn test_environment_variable_override() {
    clear_overrides();
    env::set_var("MEAL_SCALING_MAX_ITERATIONS", "15");
    env::set_var("MEAL_SCALING_ESCALATE", "false");
    env::set_var("MEAL_SCALING_LP_STRUCTURAL_DEVIATION", " 0.08 ");

    let config = MealScalingConfig::load().unwrap();

    assert_eq!(config.hierarchical.max_iterations, 15);
    assert!(!config.engine.escalate_on_shortfall);
    assert!((config.lp.structural_max_deviation - 0.08).abs() < 1e-12);

    clear_overrides();
}

#[test]
#[serial]
fn test_unparseable_override_is_a_parse_error() {
    clear_overrides();
    env::set_var("MEAL_SCALING_MAX_ITERATIONS", "lots");

    let error = MealScalingConfig::load().unwrap_err();

    assert!(matches!(error, ConfigError::Parse(_)));
    assert!(error.to_string().contains("MEAL_SCALING_MAX_ITERATIONS"));

    clear_overrides();
}

#[test]
#[serial]
fn test_override_outside_range_fails_validation() {
    clear_overrides();
    env::set_var("MEAL_SCALING_MAX_STRUCTURAL", "5");

    let error = MealScalingConfig::load().unwrap_err();
    assert!(matches!(error, ConfigError::ValueOutOfRange(_)));

    clear_overrides();
}

#[test]
#[serial]
fn test_threshold_override_must_keep_ordering() {
    clear_overrides();
    // below the default hierarchical threshold of 0.50
    env::set_var("MEAL_SCALING_GLOBAL_THRESHOLD", "0.4");

    let error = MealScalingConfig::load().unwrap_err();
    assert!(matches!(error, ConfigError::InvalidRange(_)));

    clear_overrides();
}

#[test]
#[serial]
fn test_engine_from_env_surfaces_config_errors() {
    clear_overrides();
    env::set_var("MEAL_SCALING_MAX_ITERATIONS", "-3");

    let error = MealScalingEngine::from_env().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigInvalid);
    assert!(error.source.is_some());

    clear_overrides();
    assert!(MealScalingEngine::from_env().is_ok());
}

#[test]
fn test_config_error_maps_to_config_invalid() {
    let error = AppError::from(ConfigError::ValueOutOfRange("max_structural"));

    assert_eq!(error.code, ErrorCode::ConfigInvalid);
    assert!(error.message.contains("max_structural"));
}

#[test]
fn test_config_serializes_to_json() {
    let json = serde_json::to_value(defaults()).unwrap();

    assert_eq!(json["hierarchical"]["max_iterations"], 10);
    assert_eq!(json["engine"]["escalate_on_shortfall"], true);
    assert!(json.get("_phantom").is_none());
}

#[test]
fn test_deserialized_config_can_drive_the_engine() {
    let mut json = serde_json::to_value(defaults()).unwrap();
    json["hierarchical"]["max_iterations"] = 4.into();
    let raw: MealScalingConfig = serde_json::from_value(json).unwrap();

    let config = raw.into_validated().unwrap();
    assert_eq!(config.hierarchical.max_iterations, 4);

    let recipe = common::power_bowl();
    let result = MealScalingEngine::new(config).scale(
        &recipe,
        &common::ingredient_db(),
        &common::recipe_macros(&recipe),
        &DailyContext::default(),
    );
    assert_eq!(result.method, ScalingMethod::GlobalScaling);
    common::assert_close(result.accuracy, 1.0, 1e-9);
}

#[test]
fn test_deserialized_config_is_validated() {
    let mut json = serde_json::to_value(defaults()).unwrap();
    json["global_scaling"]["min_factor"] = 4.0.into();
    let raw: MealScalingConfig = serde_json::from_value(json).unwrap();

    assert!(matches!(
        raw.into_validated(),
        Err(ConfigError::InvalidRange(_))
    ));
}

#[test]
fn test_conflict_ceiling_must_stay_below_global_threshold() {
    let mut config = defaults();
    config.strategy.compatibility.conflicting_directions_ceiling = 0.9;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidRange(_))
    ));
}
