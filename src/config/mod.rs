// ABOUTME: Configuration management module for the meal scaling engine
// ABOUTME: Exposes scaling thresholds, solver parameters, and their environment overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for the Pierre meal scaler
//!
//! - **Scaling**: Classification rules, strategy thresholds, and solver layer parameters

/// Meal scaling configuration and validation
pub mod scaling;

pub use scaling::{ConfigError, MealScalingConfig};
