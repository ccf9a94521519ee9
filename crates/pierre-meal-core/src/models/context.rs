// ABOUTME: Daily context supplied by the meal distribution layer
// ABOUTME: DailyContext and FlexibilityLevel bias strategy selection, never gram amounts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Deserializer, Serialize};

/// How tightly the user wants recipes to keep their original proportions
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlexibilityLevel {
    /// Keep recipes as close to the original as possible
    Strict,
    /// Balanced trade-off
    #[default]
    Normal,
    /// Accept larger recipe changes for better macro accuracy
    Flexible,
}

impl FlexibilityLevel {
    /// Parse from string, falling back to `Normal`
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "strict" => Self::Strict,
            "flexible" => Self::Flexible,
            _ => Self::Normal,
        }
    }
}

impl<'de> Deserialize<'de> for FlexibilityLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_str_lossy(&label))
    }
}

/// Where this meal sits in the user's day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyContext {
    /// Whether this is the last meal of the day (no later meal can compensate)
    pub is_last_meal: bool,
    /// Preference for accuracy versus recipe fidelity
    #[serde(default)]
    pub flexibility: FlexibilityLevel,
    /// 1-based position of this meal within the day
    pub meal_position: u8,
    /// Number of meals planned for the day
    pub meals_per_day: u8,
}

impl Default for DailyContext {
    fn default() -> Self {
        Self {
            is_last_meal: false,
            flexibility: FlexibilityLevel::Normal,
            meal_position: 1,
            meals_per_day: 3,
        }
    }
}

impl DailyContext {
    /// Context for the given meal slot; the last slot is flagged automatically
    #[must_use]
    pub fn for_meal(meal_position: u8, meals_per_day: u8) -> Self {
        Self {
            is_last_meal: meals_per_day > 0 && meal_position >= meals_per_day,
            flexibility: FlexibilityLevel::Normal,
            meal_position,
            meals_per_day,
        }
    }

    /// Override the flexibility level
    #[must_use]
    pub const fn with_flexibility(mut self, flexibility: FlexibilityLevel) -> Self {
        self.flexibility = flexibility;
        self
    }
}
