// ABOUTME: End-to-end tests for the meal scaling engine orchestrator
// ABOUTME: Covers degenerate recipes, escalation, LP fallback, batch scaling, and audit output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use pierre_meal_scaler::config::scaling::MealScalingConfig;
use pierre_meal_scaler::intelligence::meal_scaling::{
    scale, AttemptOutcome, LpProblem, LpSolution, LpSolver, MealScalingEngine, Role,
    ScalingMethod, ScalingRequest, ScalingResult, SolverError,
};
use pierre_meal_scaler::models::{
    DailyContext, FlexibilityLevel, MacroTargets, MacroValues, RecipeIngredient,
};

struct FailingSolver;

impl LpSolver for FailingSolver {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn solve(&self, _problem: &LpProblem) -> Result<LpSolution, SolverError> {
        Err(SolverError::Infeasible)
    }
}

fn run(recipe: &[RecipeIngredient], target: &MacroTargets) -> ScalingResult {
    common::init_test_logging();
    MealScalingEngine::default().scale(
        recipe,
        &common::ingredient_db(),
        target,
        &DailyContext::default(),
    )
}

fn assert_result_invariants(result: &ScalingResult) {
    assert!((0.0..=1.0).contains(&result.accuracy));
    assert!((0.0..=1.0).contains(&result.preservation));
    for scaled in &result.scaled_ingredients {
        assert!(scaled.new_amount >= 0.1, "{} fell below 0.1 g", scaled.ingredient_id);
    }
    let accepted = result
        .audit
        .attempts
        .iter()
        .filter(|attempt| attempt.outcome == AttemptOutcome::Accepted)
        .count();
    if result.method == ScalingMethod::NoOp {
        assert_eq!(accepted, 0);
    } else {
        assert_eq!(accepted, 1);
        assert_eq!(result.audit.accepted_attempt().unwrap().method, result.method);
    }
}

// ============================================================================
// Degenerate input
// ============================================================================

#[test]
fn test_empty_recipe_returns_no_op() {
    let result = run(&[], &MacroValues::new(500.0, 30.0, 50.0, 15.0));

    assert_eq!(result.method, ScalingMethod::NoOp);
    assert!(result.scaled_ingredients.is_empty());
    assert!(result.accuracy.abs() < f64::EPSILON);
    common::assert_close(result.preservation, 1.0, f64::EPSILON);
    assert!(result.audit.attempts.is_empty());
    assert!(result
        .audit
        .notes
        .iter()
        .any(|note| note.contains("no usable ingredients")));
}

#[test]
fn test_all_ingredients_missing_returns_no_op() {
    let recipe = vec![
        RecipeIngredient::new("unicornio", 100.0),
        RecipeIngredient::new("dragon", 50.0),
    ];

    let result = run(&recipe, &MacroValues::new(500.0, 30.0, 50.0, 15.0));

    assert_eq!(result.method, ScalingMethod::NoOp);
    assert!(result
        .audit
        .notes
        .iter()
        .any(|note| note.starts_with("ingredient unicornio skipped")));
    assert!(result
        .audit
        .notes
        .iter()
        .any(|note| note.starts_with("ingredient dragon skipped")));
}

#[test]
fn test_zero_calorie_recipe_returns_unchanged_amounts() {
    let recipe = vec![RecipeIngredient::new("agua", 250.0)];

    let result = run(&recipe, &MacroValues::new(500.0, 30.0, 50.0, 15.0));

    assert_eq!(result.method, ScalingMethod::NoOp);
    assert_eq!(result.scaled_ingredients.len(), 1);
    common::assert_close(result.scaled_ingredients[0].new_amount, 250.0, f64::EPSILON);
    assert!(!result.scaled_ingredients[0].adjusted);
    assert!(result
        .audit
        .notes
        .iter()
        .any(|note| note.contains("zero base calories")));
    assert_result_invariants(&result);
}

#[test]
fn test_missing_ingredient_is_skipped_and_noted() {
    let mut recipe = common::power_bowl();
    recipe.insert(2, RecipeIngredient::new("unicornio", 40.0));
    let target = common::recipe_macros(&common::power_bowl());

    let result = run(&recipe, &target);

    assert_eq!(result.scaled_ingredients.len(), 6);
    assert!(result.ingredient("unicornio").is_none());
    assert!(result.audit.notes.iter().any(|note| note
        == "ingredient unicornio skipped: not found in nutrition database or invalid amount"));
    assert_ne!(result.method, ScalingMethod::NoOp);
}

// ============================================================================
// Layer selection and escalation
// ============================================================================

#[test]
fn test_matching_target_keeps_recipe_unchanged() {
    let recipe = common::power_bowl();
    let target = common::recipe_macros(&recipe);

    let result = run(&recipe, &target);

    assert_eq!(result.method, ScalingMethod::GlobalScaling);
    common::assert_close(result.accuracy, 1.0, 1e-9);
    common::assert_close(result.preservation, 1.0, 1e-12);
    assert!(result.scaled_ingredients.iter().all(|scaled| !scaled.adjusted));
    assert_eq!(result.audit.attempts.len(), 1);
    assert_result_invariants(&result);
}

#[test]
fn test_uniform_target_is_met_by_global_scaling() {
    let recipe = common::power_bowl();
    let target = common::scaled_target(&recipe, 1.1, 1.1, 1.1, 1.1);

    let result = run(&recipe, &target);

    assert_eq!(result.method, ScalingMethod::GlobalScaling);
    common::assert_close(result.accuracy, 1.0, 1e-9);
    common::assert_close(result.ingredient("pollo").unwrap().new_amount, 132.0, 1e-9);
    common::assert_close(
        result.ingredient("pollo").unwrap().change_percent,
        10.0,
        1e-9,
    );
}

#[test]
fn test_shortfall_escalates_to_more_aggressive_layers() {
    // protein +30% only; global scaling overshoots calories, carbs and fat by 30%
    let recipe = common::power_bowl();
    let target = common::scaled_target(&recipe, 1.0, 1.3, 1.0, 1.0);

    let result = run(&recipe, &target);

    let attempts = &result.audit.attempts;
    assert!(attempts.len() >= 2, "expected escalation, got {attempts:?}");
    assert_eq!(attempts[0].method, ScalingMethod::GlobalScaling);
    common::assert_close(attempts[0].accuracy, 0.7, 1e-9);
    assert_eq!(attempts[1].method, ScalingMethod::HierarchicalAdjustment);
    assert!(result.audit.notes.iter().any(|note| note.contains("escalating to")));

    let best = attempts
        .iter()
        .map(|attempt| attempt.accuracy)
        .fold(0.0_f64, f64::max);
    common::assert_close(result.accuracy, best, 1e-12);
    assert_result_invariants(&result);
}

#[test]
fn test_escalation_can_be_disabled() {
    let recipe = common::power_bowl();
    let target = common::scaled_target(&recipe, 1.0, 1.3, 1.0, 1.0);
    let mut config: MealScalingConfig<true> = MealScalingConfig::default();
    config.engine.escalate_on_shortfall = false;

    let result = MealScalingEngine::new(config).scale(
        &recipe,
        &common::ingredient_db(),
        &target,
        &DailyContext::default(),
    );

    assert_eq!(result.method, ScalingMethod::GlobalScaling);
    assert_eq!(result.audit.attempts.len(), 1);
    common::assert_close(result.accuracy, 0.7, 1e-9);
}

#[test]
fn test_conflicting_target_keeps_structural_near_original() {
    let recipe = common::pollo_arroz_aceite();
    let target = common::scaled_target(&recipe, 1.0, 1.4, 1.2, 0.7);

    let result = run(&recipe, &target);

    assert_eq!(result.method, ScalingMethod::LpOptimization);
    for scaled in &result.scaled_ingredients {
        if scaled.role == Role::Structural {
            let ratio = scaled.new_amount / scaled.original_amount;
            assert!((0.95 - 1e-9..=1.05 + 1e-9).contains(&ratio));
        }
    }
    assert!(result.preservation >= 0.9 - 1e-9);
    assert_result_invariants(&result);
}

#[test]
fn test_opposing_macro_targets_never_start_with_global_scaling() {
    let recipe = common::pollo_yogur_brocoli();
    let target = common::scaled_target(&recipe, 1.0, 1.4, 1.0, 0.7);

    let result = run(&recipe, &target);

    assert_eq!(
        result.audit.attempts[0].method,
        ScalingMethod::HierarchicalAdjustment
    );
    assert!(result
        .audit
        .attempts
        .iter()
        .all(|attempt| attempt.method != ScalingMethod::GlobalScaling));
    assert_result_invariants(&result);
}

#[test]
fn test_last_meal_goes_straight_to_lp() {
    let recipe = common::power_bowl();
    let target = common::scaled_target(&recipe, 1.1, 1.0, 1.0, 1.0);

    let result = MealScalingEngine::default().scale(
        &recipe,
        &common::ingredient_db(),
        &target,
        &DailyContext::for_meal(3, 3).with_flexibility(FlexibilityLevel::Flexible),
    );

    assert_eq!(
        result.audit.attempts[0].method,
        ScalingMethod::LpOptimization
    );
    assert_result_invariants(&result);
}

#[test]
fn test_lp_failure_falls_back_to_hierarchical() {
    common::init_test_logging();
    let recipe = common::pollo_arroz_aceite();
    let target = common::scaled_target(&recipe, 1.0, 1.4, 1.2, 0.7);
    let engine = MealScalingEngine::with_solver(MealScalingConfig::default(), FailingSolver);

    let result = engine.scale(
        &recipe,
        &common::ingredient_db(),
        &target,
        &DailyContext::default(),
    );

    let attempts = &result.audit.attempts;
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].method, ScalingMethod::LpOptimization);
    assert_eq!(attempts[0].outcome, AttemptOutcome::Failed);
    assert_eq!(attempts[1].method, ScalingMethod::HierarchicalAdjustment);
    assert_eq!(attempts[1].outcome, AttemptOutcome::Accepted);
    assert!(attempts[1]
        .detail
        .as_deref()
        .unwrap()
        .contains("fallback after"));
    assert_eq!(result.method, ScalingMethod::HierarchicalAdjustment);
    assert!(result
        .audit
        .notes
        .iter()
        .any(|note| note.contains("falling back to hierarchical adjustment")));
    assert_result_invariants(&result);
}

// ============================================================================
// Output and audit
// ============================================================================

#[test]
fn test_scaled_recipe_reproduces_achieved_macros() {
    let recipe = common::power_bowl();
    let target = common::scaled_target(&recipe, 1.1, 1.0, 1.15, 1.0);

    let result = run(&recipe, &target);
    let recomputed = common::recipe_macros(&result.to_recipe());

    common::assert_close(recomputed.calories, result.achieved.calories, 1e-6);
    common::assert_close(recomputed.protein, result.achieved.protein, 1e-6);
    common::assert_close(recomputed.carbs, result.achieved.carbs, 1e-6);
    common::assert_close(recomputed.fat, result.achieved.fat, 1e-6);
}

#[test]
fn test_audit_trail_records_classification_and_strategy() {
    let recipe = common::power_bowl();
    let target = common::scaled_target(&recipe, 1.2, 1.2, 1.2, 1.2);

    let first = run(&recipe, &target);
    let second = run(&recipe, &target);

    assert!(first.audit.classification.is_some());
    assert!(first.audit.strategy.is_some());
    assert_ne!(first.audit.run_id, second.audit.run_id);
    assert!(first.audit.started_at <= second.audit.started_at);
}

#[test]
fn test_result_serializes_with_stable_method_names() {
    let recipe = common::power_bowl();
    let identity = run(&recipe, &common::recipe_macros(&recipe));
    let empty = run(&[], &MacroValues::new(400.0, 30.0, 40.0, 10.0));

    let identity_json = serde_json::to_value(&identity).unwrap();
    let empty_json = serde_json::to_value(&empty).unwrap();

    assert_eq!(identity_json["method"], "global_scaling");
    assert_eq!(identity_json["scaled_ingredients"][0]["role"], "structural");
    assert_eq!(identity_json["audit"]["attempts"][0]["outcome"], "accepted");
    assert!(identity_json["audit"]["run_id"].is_string());
    assert_eq!(empty_json["method"], "no-op");
}

#[test]
fn test_batch_matches_sequential_scaling_in_order() {
    let engine = MealScalingEngine::default();
    let db = common::ingredient_db();
    let requests = vec![
        ScalingRequest {
            recipe: common::power_bowl(),
            target: common::recipe_macros(&common::power_bowl()),
            context: DailyContext::default(),
        },
        ScalingRequest {
            recipe: common::pollo_arroz_aceite(),
            target: common::scaled_target(&common::pollo_arroz_aceite(), 1.0, 1.4, 1.2, 0.7),
            context: DailyContext::default(),
        },
        ScalingRequest {
            recipe: Vec::new(),
            target: MacroValues::new(400.0, 30.0, 40.0, 10.0),
            context: DailyContext::for_meal(2, 3),
        },
        ScalingRequest {
            recipe: common::yogur_platano_miel(),
            target: common::scaled_target(&common::yogur_platano_miel(), 0.8, 1.0, 0.8, 1.0),
            context: DailyContext::for_meal(3, 3),
        },
    ];

    let batch = engine.scale_batch(&requests, &db);

    assert_eq!(batch.len(), requests.len());
    for (request, result) in requests.iter().zip(&batch) {
        let sequential = engine.scale(&request.recipe, &db, &request.target, &request.context);
        assert_eq!(result.method, sequential.method);
        common::assert_close(result.accuracy, sequential.accuracy, 1e-12);
        for (batched, single) in result
            .scaled_ingredients
            .iter()
            .zip(&sequential.scaled_ingredients)
        {
            assert_eq!(batched.ingredient_id, single.ingredient_id);
            common::assert_close(batched.new_amount, single.new_amount, 1e-12);
        }
        assert_result_invariants(result);
    }
    assert_eq!(batch[2].method, ScalingMethod::NoOp);
}

#[test]
fn test_scaling_request_deserializes_with_default_context() {
    let json = r#"{
        "recipe": [{"ingredient_id": "pollo", "amount_grams": 100.0}],
        "target": {"calories": 200.0, "protein": 37.0, "carbs": 0.0, "fat": 4.4}
    }"#;

    let request: ScalingRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.context, DailyContext::default());
    assert_eq!(request.recipe.len(), 1);
}

#[test]
fn test_free_function_uses_global_configuration() {
    let recipe = common::power_bowl();
    let target = common::scaled_target(&recipe, 1.1, 1.1, 1.1, 1.1);

    let result = scale(
        &recipe,
        &common::ingredient_db(),
        &target,
        &DailyContext::default(),
    );

    assert_eq!(result.method, ScalingMethod::GlobalScaling);
    common::assert_close(result.accuracy, 1.0, 1e-9);
    assert_result_invariants(&result);
}
