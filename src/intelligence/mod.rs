// ABOUTME: Intelligence module hosting the meal macro scaling engine
// ABOUTME: Re-exports the scaling pipeline for path-based access from the crate root
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Intelligence Module
//!
//! Nutrition intelligence built on the shared models of `pierre-meal-core`.

/// Recipe scaling toward per-meal macro targets
pub mod meal_scaling;

pub use meal_scaling::{scale, MealScalingEngine, ScalingRequest, ScalingResult};
