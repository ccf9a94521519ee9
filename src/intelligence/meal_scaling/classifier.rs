// ABOUTME: Ingredient classifier assigning a structural role to every recipe ingredient
// ABOUTME: Partitions recipes into Structural, FlexiblePrimary, FlexibleSecondary with metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Ingredient Classification
//!
//! Every resolved ingredient receives exactly one [`Role`]:
//!
//! - **Structural**: the recipe's anchor. Any ingredient above the calorie share
//!   threshold, or from a core category (protein source, primary starch), ranked
//!   by calorie contribution and capped at three. A recipe with no qualifying
//!   ingredient promotes its highest-calorie ingredient, so every non-empty
//!   recipe has at least one anchor.
//! - **Flexible secondary**: oils, condiments, sweeteners, nuts and anything
//!   energy-dense at low mass. These are fine-tuning targets.
//! - **Flexible primary**: everything else (vegetables, fruit, legumes, dairy,
//!   moderate carbohydrate sources). These close gaps first.
//!
//! Classified ingredients live in one arena; role partitions are index lists
//! into it, so downstream layers iterate indices instead of keyed lookups.

use std::fmt;

use pierre_meal_core::constants::energy::REFERENCE_PORTION_GRAMS;
use pierre_meal_core::constants::scaling::{
    EPSILON, MEDIUM_RECIPE_MAX_INGREDIENTS, SIMPLE_RECIPE_MAX_INGREDIENTS,
};
use pierre_meal_core::models::{
    Ingredient, IngredientCategory, MacroKind, MacroValues, RecipeIngredient,
};
use serde::Serialize;
use tracing::{debug, warn};

use super::ingredients::IngredientLookup;
use crate::config::scaling::ClassificationConfig;

/// Structural role of an ingredient within its recipe
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Nutritional anchor; its proportions should not change
    Structural,
    /// First target for closing macro gaps
    FlexiblePrimary,
    /// Fine-tuning target (high impact per gram)
    FlexibleSecondary,
}

impl Role {
    /// All roles in adjustment order
    pub const ALL: [Self; 3] = [
        Self::Structural,
        Self::FlexiblePrimary,
        Self::FlexibleSecondary,
    ];

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::FlexiblePrimary => "flexible_primary",
            Self::FlexibleSecondary => "flexible_secondary",
        }
    }

    /// Whether layer 2 may adjust ingredients with this role
    #[must_use]
    pub const fn is_flexible(&self) -> bool {
        match self {
            Self::Structural => false,
            Self::FlexiblePrimary | Self::FlexibleSecondary => true,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recipe size bucket
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecipeComplexity {
    /// Three ingredients or fewer
    #[default]
    Simple,
    /// Four to six ingredients
    Medium,
    /// More than six ingredients
    Complex,
}

impl RecipeComplexity {
    /// Bucket for the given ingredient count
    #[must_use]
    pub const fn from_ingredient_count(count: usize) -> Self {
        if count <= SIMPLE_RECIPE_MAX_INGREDIENTS {
            Self::Simple
        } else if count <= MEDIUM_RECIPE_MAX_INGREDIENTS {
            Self::Medium
        } else {
            Self::Complex
        }
    }
}

/// A recipe line resolved against the ingredient database and assigned a role
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedIngredient {
    /// Ingredient identifier
    pub ingredient_id: String,
    /// Ingredient name
    pub name: String,
    /// Food category
    pub category: IngredientCategory,
    /// Amount in the original recipe (grams)
    pub original_amount: f64,
    /// Nutrition reference per 100 g
    pub per_100g: MacroValues,
    /// Macro contribution at the original amount
    pub macros: MacroValues,
    /// Fraction of the recipe's calories (0-1)
    pub calorie_share: f64,
    /// Assigned role
    pub role: Role,
    /// Why the role was assigned (audit only)
    pub rationale: String,
}

impl ClassifiedIngredient {
    /// Macro contribution at an arbitrary amount
    #[must_use]
    pub fn macros_at(&self, grams: f64) -> MacroValues {
        self.per_100g.scaled(grams / REFERENCE_PORTION_GRAMS)
    }
}

/// Recipe-level facts derived during classification
#[derive(Debug, Clone, Serialize, Default)]
pub struct ClassificationMetadata {
    /// Number of classified ingredients
    pub total_ingredients: usize,
    /// Total recipe calories
    pub total_calories: f64,
    /// Total recipe macros
    pub total_macros: MacroValues,
    /// Percentage of calories contributed by structural ingredients (0-100)
    pub core_ratio: f64,
    /// Macronutrient providing the most energy, if any
    pub dominant_macro: Option<MacroKind>,
    /// Size bucket
    pub complexity: RecipeComplexity,
}

impl ClassificationMetadata {
    /// Fraction (0-1) of calories contributed by structural ingredients
    #[must_use]
    pub fn structural_ratio(&self) -> f64 {
        (self.core_ratio / 100.0).clamp(0.0, 1.0)
    }

    /// Fraction (0-1) of calories contributed by flexible ingredients
    #[must_use]
    pub fn flexible_ratio(&self) -> f64 {
        if self.total_calories <= EPSILON {
            0.0
        } else {
            1.0 - self.structural_ratio()
        }
    }
}

/// Role-partitioned view of a recipe
#[derive(Debug, Clone, Serialize, Default)]
pub struct IngredientClassification {
    ingredients: Vec<ClassifiedIngredient>,
    structural: Vec<usize>,
    flexible_primary: Vec<usize>,
    flexible_secondary: Vec<usize>,
    metadata: ClassificationMetadata,
    dropped_ingredients: Vec<String>,
}

impl IngredientClassification {
    /// Classification of a recipe with no usable ingredients
    #[must_use]
    pub fn empty(dropped_ingredients: Vec<String>) -> Self {
        Self {
            dropped_ingredients,
            ..Self::default()
        }
    }

    /// All classified ingredients in recipe order
    #[must_use]
    pub fn ingredients(&self) -> &[ClassifiedIngredient] {
        &self.ingredients
    }

    /// Arena indices of the ingredients holding a role
    #[must_use]
    pub fn indices(&self, role: Role) -> &[usize] {
        match role {
            Role::Structural => &self.structural,
            Role::FlexiblePrimary => &self.flexible_primary,
            Role::FlexibleSecondary => &self.flexible_secondary,
        }
    }

    /// Ingredients holding a role
    pub fn by_role(&self, role: Role) -> impl Iterator<Item = &ClassifiedIngredient> + '_ {
        self.indices(role).iter().map(|&idx| &self.ingredients[idx])
    }

    /// Recipe-level metadata
    #[must_use]
    pub const fn metadata(&self) -> &ClassificationMetadata {
        &self.metadata
    }

    /// Ids that could not be resolved or had unusable amounts
    #[must_use]
    pub fn dropped_ingredients(&self) -> &[String] {
        &self.dropped_ingredients
    }

    /// Number of classified ingredients
    #[must_use]
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    /// Whether nothing could be classified
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Original amounts, indexed like the arena
    #[must_use]
    pub fn original_amounts(&self) -> Vec<f64> {
        self.ingredients
            .iter()
            .map(|ingredient| ingredient.original_amount)
            .collect()
    }

    /// Total macros for a vector of amounts indexed like the arena
    #[must_use]
    pub fn macros_for_amounts(&self, amounts: &[f64]) -> MacroValues {
        self.ingredients
            .iter()
            .zip(amounts)
            .map(|(ingredient, &grams)| ingredient.macros_at(grams))
            .sum()
    }
}

/// Assigns roles to recipe ingredients
pub struct IngredientClassifier<'a> {
    config: &'a ClassificationConfig,
}

/// Ingredient resolved against the database, before role assignment
struct Resolved {
    ingredient: Ingredient,
    amount: f64,
    macros: MacroValues,
}

impl<'a> IngredientClassifier<'a> {
    /// Create a classifier using the given rules
    #[must_use]
    pub const fn new(config: &'a ClassificationConfig) -> Self {
        Self { config }
    }

    /// Classify a recipe
    ///
    /// Unknown ingredient ids and non-positive amounts are dropped with a warning.
    /// The result is deterministic for identical inputs.
    pub fn classify<L>(&self, recipe: &[RecipeIngredient], lookup: &L) -> IngredientClassification
    where
        L: IngredientLookup + ?Sized,
    {
        let (resolved, dropped) = Self::resolve(recipe, lookup);
        if resolved.is_empty() {
            return IngredientClassification::empty(dropped);
        }

        let total_macros: MacroValues = resolved.iter().map(|r| r.macros).sum();
        let total_calories = total_macros.calories;
        let shares: Vec<f64> = resolved
            .iter()
            .map(|r| {
                if total_calories > EPSILON {
                    r.macros.calories / total_calories
                } else {
                    0.0
                }
            })
            .collect();

        let (structural, structural_reasons) = self.select_structural(&resolved, &shares);

        let mut ingredients = Vec::with_capacity(resolved.len());
        let mut partitions = (Vec::new(), Vec::new(), Vec::new());
        for (idx, r) in resolved.into_iter().enumerate() {
            let (role, rationale) = match structural_reasons.iter().find(|(i, _)| *i == idx) {
                Some((_, reason)) => (Role::Structural, reason.clone()),
                None => self.flexible_role(&r, shares[idx]),
            };
            match role {
                Role::Structural => partitions.0.push(idx),
                Role::FlexiblePrimary => partitions.1.push(idx),
                Role::FlexibleSecondary => partitions.2.push(idx),
            }
            ingredients.push(ClassifiedIngredient {
                ingredient_id: r.ingredient.id,
                name: r.ingredient.name,
                category: r.ingredient.category,
                original_amount: r.amount,
                per_100g: r.ingredient.per_100g,
                macros: r.macros,
                calorie_share: shares[idx],
                role,
                rationale,
            });
        }

        let structural_calories: f64 = structural
            .iter()
            .map(|&idx| ingredients[idx].macros.calories)
            .sum();
        let core_ratio = if total_calories > EPSILON {
            structural_calories / total_calories * 100.0
        } else {
            0.0
        };

        let metadata = ClassificationMetadata {
            total_ingredients: ingredients.len(),
            total_calories,
            total_macros,
            core_ratio,
            dominant_macro: total_macros.dominant_macronutrient(),
            complexity: RecipeComplexity::from_ingredient_count(ingredients.len()),
        };

        debug!(
            total_ingredients = metadata.total_ingredients,
            structural = partitions.0.len(),
            flexible_primary = partitions.1.len(),
            flexible_secondary = partitions.2.len(),
            core_ratio = metadata.core_ratio,
            dropped = dropped.len(),
            "Classified recipe ingredients"
        );

        IngredientClassification {
            ingredients,
            structural: partitions.0,
            flexible_primary: partitions.1,
            flexible_secondary: partitions.2,
            metadata,
            dropped_ingredients: dropped,
        }
    }

    fn resolve<L>(recipe: &[RecipeIngredient], lookup: &L) -> (Vec<Resolved>, Vec<String>)
    where
        L: IngredientLookup + ?Sized,
    {
        let mut resolved = Vec::with_capacity(recipe.len());
        let mut dropped = Vec::new();

        for line in recipe {
            if !line.amount_grams.is_finite() || line.amount_grams <= 0.0 {
                warn!(
                    ingredient_id = %line.ingredient_id,
                    amount_grams = line.amount_grams,
                    "Dropping recipe ingredient with non-positive amount"
                );
                dropped.push(line.ingredient_id.clone());
                continue;
            }
            match lookup.get_ingredient_by_id(&line.ingredient_id) {
                Some(ingredient) => {
                    let macros = ingredient.macros_for(line.amount_grams);
                    resolved.push(Resolved {
                        ingredient,
                        amount: line.amount_grams,
                        macros,
                    });
                }
                None => {
                    warn!(
                        ingredient_id = %line.ingredient_id,
                        "Ingredient not found in nutrition database, dropping from recipe"
                    );
                    dropped.push(line.ingredient_id.clone());
                }
            }
        }

        (resolved, dropped)
    }

    /// Pick anchors: candidates ranked by calories, capped; fallback to the top contributor
    fn select_structural(
        &self,
        resolved: &[Resolved],
        shares: &[f64],
    ) -> (Vec<usize>, Vec<(usize, String)>) {
        let threshold = self.config.structural_calorie_share;
        let mut candidates: Vec<(usize, String)> = resolved
            .iter()
            .enumerate()
            .filter_map(|(idx, r)| {
                if shares[idx] > threshold {
                    Some((
                        idx,
                        format!(
                            "provides {:.1}% of recipe calories (anchor threshold {:.0}%)",
                            shares[idx] * 100.0,
                            threshold * 100.0
                        ),
                    ))
                } else if r.ingredient.category.is_core() {
                    Some((
                        idx,
                        format!(
                            "core {:?} ingredient providing {:.1}% of calories",
                            r.ingredient.category,
                            shares[idx] * 100.0
                        ),
                    ))
                } else {
                    None
                }
            })
            .collect();

        // Stable sort keeps recipe order among equal contributions
        candidates.sort_by(|(a, _), (b, _)| {
            resolved[*b]
                .macros
                .calories
                .total_cmp(&resolved[*a].macros.calories)
        });
        candidates.truncate(self.config.max_structural);

        if candidates.is_empty() {
            let top = resolved
                .iter()
                .enumerate()
                .fold(None::<(usize, f64)>, |best, (idx, r)| match best {
                    Some((_, best_calories)) if r.macros.calories <= best_calories => best,
                    _ => Some((idx, r.macros.calories)),
                });
            if let Some((idx, _)) = top {
                candidates.push((
                    idx,
                    format!(
                        "promoted as highest calorie contributor ({:.1}%) because no ingredient qualified as anchor",
                        shares[idx] * 100.0
                    ),
                ));
            }
        }

        let mut indices: Vec<usize> = candidates.iter().map(|(idx, _)| *idx).collect();
        indices.sort_unstable();
        (indices, candidates)
    }

    fn flexible_role(&self, resolved: &Resolved, share: f64) -> (Role, String) {
        let category = resolved.ingredient.category;
        let density = resolved.ingredient.kcal_per_gram();

        if category.is_fine_tuning() {
            return (
                Role::FlexibleSecondary,
                format!("fine-tuning {category:?} ingredient ({density:.1} kcal/g)"),
            );
        }
        if density >= self.config.secondary_min_kcal_per_gram
            && resolved.amount <= self.config.secondary_max_grams
        {
            return (
                Role::FlexibleSecondary,
                format!(
                    "energy-dense ({density:.1} kcal/g) at low mass ({:.1} g)",
                    resolved.amount
                ),
            );
        }
        if category.is_core() {
            return (
                Role::FlexiblePrimary,
                format!(
                    "core {category:?} ingredient beyond the anchor limit of {}",
                    self.config.max_structural
                ),
            );
        }
        (
            Role::FlexiblePrimary,
            format!(
                "{category:?} ingredient with moderate contribution ({:.1}% of calories)",
                share * 100.0
            ),
        )
    }
}
