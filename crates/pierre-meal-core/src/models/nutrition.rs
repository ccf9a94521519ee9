// ABOUTME: Nutrition models shared by every stage of the meal scaling engine
// ABOUTME: MacroKind, MacroValues, MacroGaps, Ingredient, IngredientCategory, RecipeIngredient
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::energy::{
    KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN, REFERENCE_PORTION_GRAMS,
};
use crate::constants::scaling::EPSILON;

/// One of the four tracked macro dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MacroKind {
    /// Energy in kcal
    Calories,
    /// Protein in grams
    Protein,
    /// Carbohydrates in grams
    Carbs,
    /// Fat in grams
    Fat,
}

impl MacroKind {
    /// All macro dimensions, in tie-breaking order
    pub const ALL: [Self; 4] = [Self::Calories, Self::Protein, Self::Carbs, Self::Fat];

    /// The three energy-bearing macronutrients
    pub const MACRONUTRIENTS: [Self; 3] = [Self::Protein, Self::Carbs, Self::Fat];

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Calories => "calories",
            Self::Protein => "protein",
            Self::Carbs => "carbs",
            Self::Fat => "fat",
        }
    }

    /// Kilocalories per gram, `None` for the calorie dimension itself
    #[must_use]
    pub const fn kcal_per_gram(&self) -> Option<f64> {
        match self {
            Self::Calories => None,
            Self::Protein => Some(KCAL_PER_GRAM_PROTEIN),
            Self::Carbs => Some(KCAL_PER_GRAM_CARBS),
            Self::Fat => Some(KCAL_PER_GRAM_FAT),
        }
    }
}

impl fmt::Display for MacroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calories and macronutrient grams
///
/// Values are never negative: the constructor clamps negatives (and NaN) to zero,
/// and every arithmetic helper preserves that property.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct MacroValues {
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
}

/// Desired macro outcome for one meal
pub type MacroTargets = MacroValues;

fn non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

impl MacroValues {
    /// Create macro values, clamping each component to be non-negative
    #[must_use]
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories: non_negative(calories),
            protein: non_negative(protein),
            carbs: non_negative(carbs),
            fat: non_negative(fat),
        }
    }

    /// All-zero macro values
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
        }
    }

    /// Read one dimension
    #[must_use]
    pub const fn get(&self, kind: MacroKind) -> f64 {
        match kind {
            MacroKind::Calories => self.calories,
            MacroKind::Protein => self.protein,
            MacroKind::Carbs => self.carbs,
            MacroKind::Fat => self.fat,
        }
    }

    /// Multiply every dimension by a non-negative factor
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.calories * factor,
            self.protein * factor,
            self.carbs * factor,
            self.fat * factor,
        )
    }

    /// Component-wise difference, floored at zero
    #[must_use]
    pub fn saturating_sub(&self, other: &Self) -> Self {
        Self::new(
            self.calories - other.calories,
            self.protein - other.protein,
            self.carbs - other.carbs,
            self.fat - other.fat,
        )
    }

    /// Energy contributed by one macronutrient (protein/carbs/fat at 4/4/9 kcal/g)
    #[must_use]
    pub fn energy_from(&self, kind: MacroKind) -> f64 {
        kind.kcal_per_gram()
            .map_or(0.0, |kcal_per_gram| self.get(kind) * kcal_per_gram)
    }

    /// Macronutrient contributing the largest share of energy
    ///
    /// Returns `None` when no macronutrient carries any energy.
    #[must_use]
    pub fn dominant_macronutrient(&self) -> Option<MacroKind> {
        let mut best: Option<(MacroKind, f64)> = None;
        for kind in MacroKind::MACRONUTRIENTS {
            let energy = self.energy_from(kind);
            if energy <= EPSILON {
                continue;
            }
            if best.is_none_or(|(_, best_energy)| energy > best_energy) {
                best = Some((kind, energy));
            }
        }
        best.map(|(kind, _)| kind)
    }
}

impl Add for MacroValues {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl AddAssign for MacroValues {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for MacroValues {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Self> for MacroValues {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, value| acc + *value)
    }
}

/// Signed per-macro values (gaps can point in either direction)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct MacroGaps {
    /// Calorie component
    pub calories: f64,
    /// Protein component
    pub protein: f64,
    /// Carbohydrate component
    pub carbs: f64,
    /// Fat component
    pub fat: f64,
}

impl MacroGaps {
    /// Build gaps by evaluating `f` for every macro dimension
    pub fn from_fn(mut f: impl FnMut(MacroKind) -> f64) -> Self {
        Self {
            calories: f(MacroKind::Calories),
            protein: f(MacroKind::Protein),
            carbs: f(MacroKind::Carbs),
            fat: f(MacroKind::Fat),
        }
    }

    /// Read one dimension
    #[must_use]
    pub const fn get(&self, kind: MacroKind) -> f64 {
        match kind {
            MacroKind::Calories => self.calories,
            MacroKind::Protein => self.protein,
            MacroKind::Carbs => self.carbs,
            MacroKind::Fat => self.fat,
        }
    }

    /// Largest component together with its dimension (first wins on ties)
    #[must_use]
    pub fn max_entry(&self) -> (MacroKind, f64) {
        let mut best = (MacroKind::Calories, self.calories);
        for kind in MacroKind::ALL.into_iter().skip(1) {
            let value = self.get(kind);
            if value > best.1 {
                best = (kind, value);
            }
        }
        best
    }
}

/// Food category used to infer an ingredient's structural role
///
/// Deserialization is lenient: synonyms such as `"oil"` or `"grains"` map to
/// their category and unrecognized labels become `Other`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    /// Meat, fish, eggs, tofu and other protein sources
    Protein,
    /// Rice, pasta, bread, potatoes and other primary starches
    Starch,
    /// Vegetables and leafy greens
    Vegetable,
    /// Fresh or dried fruit
    Fruit,
    /// Beans, lentils, chickpeas
    Legume,
    /// Milk, yogurt, cheese
    Dairy,
    /// Oils, butter and other fats
    Fat,
    /// Sauces, spices, dressings
    Condiment,
    /// Nuts and seeds
    NutSeed,
    /// Sugar, honey, syrups
    Sweetener,
    /// Anything else
    #[default]
    Other,
}

impl IngredientCategory {
    /// Parse a category from free text, falling back to `Other`
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "protein" | "meat" | "fish" | "seafood" | "egg" | "eggs" | "poultry" => Self::Protein,
            "starch" | "grain" | "grains" | "cereal" | "pasta" | "rice" | "bread" | "tuber" => {
                Self::Starch
            }
            "vegetable" | "vegetables" | "verdura" | "greens" => Self::Vegetable,
            "fruit" | "fruits" | "fruta" => Self::Fruit,
            "legume" | "legumes" | "beans" | "pulses" => Self::Legume,
            "dairy" | "lacteo" => Self::Dairy,
            "fat" | "fats" | "oil" | "oils" | "aceite" => Self::Fat,
            "condiment" | "condiments" | "sauce" | "spice" | "spices" | "dressing" => {
                Self::Condiment
            }
            "nut" | "nuts" | "seed" | "seeds" | "nut_seed" => Self::NutSeed,
            "sweetener" | "sugar" | "sweeteners" => Self::Sweetener,
            _ => Self::Other,
        }
    }

    /// Categories that anchor a recipe regardless of their calorie share
    #[must_use]
    pub const fn is_core(&self) -> bool {
        matches!(self, Self::Protein | Self::Starch)
    }

    /// Low-mass, high-impact categories used for fine tuning
    #[must_use]
    pub const fn is_fine_tuning(&self) -> bool {
        matches!(
            self,
            Self::Fat | Self::Condiment | Self::NutSeed | Self::Sweetener
        )
    }
}

impl<'de> Deserialize<'de> for IngredientCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_str_lossy(&label))
    }
}

/// Immutable nutrition reference for one ingredient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    /// Stable identifier used by recipes
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Food category
    #[serde(default)]
    pub category: IngredientCategory,
    /// Macro content per 100 g
    pub per_100g: MacroValues,
}

impl Ingredient {
    /// Create an ingredient from per-100 g nutrition facts
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: IngredientCategory,
        per_100g: MacroValues,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            per_100g,
        }
    }

    /// Macro content of a single gram
    #[must_use]
    pub fn per_gram(&self) -> MacroValues {
        self.per_100g.scaled(1.0 / REFERENCE_PORTION_GRAMS)
    }

    /// Macro content of the given amount
    #[must_use]
    pub fn macros_for(&self, grams: f64) -> MacroValues {
        self.per_100g.scaled(grams / REFERENCE_PORTION_GRAMS)
    }

    /// Energy density in kcal per gram
    #[must_use]
    pub fn kcal_per_gram(&self) -> f64 {
        self.per_100g.calories / REFERENCE_PORTION_GRAMS
    }
}

/// One line of a recipe: which ingredient and how much of it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredient {
    /// Identifier resolved through the ingredient lookup
    pub ingredient_id: String,
    /// Base amount in grams
    pub amount_grams: f64,
}

impl RecipeIngredient {
    /// Create a recipe line
    #[must_use]
    pub fn new(ingredient_id: impl Into<String>, amount_grams: f64) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
            amount_grams,
        }
    }

    /// Produce a copy of this line with a different amount
    #[must_use]
    pub fn with_amount(&self, amount_grams: f64) -> Self {
        Self {
            ingredient_id: self.ingredient_id.clone(),
            amount_grams,
        }
    }
}
