// ABOUTME: Linear program model and solver seam used by the LP optimization layer
// ABOUTME: LpProblem value type, LpSolver trait, SolverError, and the microlp backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Linear Programming Seam
//!
//! The LP layer builds an explicit [`LpProblem`] (always a minimization) and
//! hands it to an [`LpSolver`]. Keeping the problem a plain value lets tests
//! inspect the formulation and swap the backend without touching the layer.

use microlp::{ComparisonOp, Error as MicroLpError, LinearExpr, OptimizationDirection, Problem};
use pierre_meal_core::errors::AppError;
use thiserror::Error;

/// Constraint relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpComparison {
    /// `lhs == rhs`
    Eq,
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
}

/// Decision variable with bounds and objective coefficient
#[derive(Debug, Clone)]
pub struct LpVariable {
    /// Name for diagnostics
    pub name: String,
    /// Coefficient in the minimized objective
    pub objective: f64,
    /// Lower bound
    pub lower: f64,
    /// Upper bound (may be infinite)
    pub upper: f64,
}

/// Linear constraint `sum(coef * var) <cmp> rhs`
#[derive(Debug, Clone)]
pub struct LpConstraint {
    /// Name for diagnostics
    pub name: String,
    /// `(variable index, coefficient)` pairs
    pub terms: Vec<(usize, f64)>,
    /// Relation
    pub comparison: LpComparison,
    /// Right-hand side
    pub rhs: f64,
}

/// Minimization problem
#[derive(Debug, Clone, Default)]
pub struct LpProblem {
    variables: Vec<LpVariable>,
    constraints: Vec<LpConstraint>,
}

impl LpProblem {
    /// Empty problem
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable and return its index
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        objective: f64,
        lower: f64,
        upper: f64,
    ) -> usize {
        self.variables.push(LpVariable {
            name: name.into(),
            objective,
            lower,
            upper,
        });
        self.variables.len() - 1
    }

    /// Add a constraint
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: Vec<(usize, f64)>,
        comparison: LpComparison,
        rhs: f64,
    ) {
        self.constraints.push(LpConstraint {
            name: name.into(),
            terms,
            comparison,
            rhs,
        });
    }

    /// All variables in insertion order
    #[must_use]
    pub fn variables(&self) -> &[LpVariable] {
        &self.variables
    }

    /// All constraints in insertion order
    #[must_use]
    pub fn constraints(&self) -> &[LpConstraint] {
        &self.constraints
    }

    /// Objective value of an assignment
    #[must_use]
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .map(|(variable, value)| variable.objective * value)
            .sum()
    }
}

/// Values of an optimal assignment, indexed like the problem's variables
#[derive(Debug, Clone)]
pub struct LpSolution {
    /// Variable values
    pub values: Vec<f64>,
    /// Objective value
    pub objective: f64,
}

impl LpSolution {
    /// Value of one variable (0 when out of range)
    #[must_use]
    pub fn value(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }
}

/// LP backend failures
#[derive(Debug, Error)]
pub enum SolverError {
    /// No assignment satisfies every constraint
    #[error("linear program is infeasible")]
    Infeasible,

    /// Objective can decrease without limit
    #[error("linear program is unbounded")]
    Unbounded,

    /// Backend-specific failure
    #[error("LP backend error: {0}")]
    Backend(String),

    /// Backend returned values that violate the problem
    #[error("invalid LP solution: {0}")]
    InvalidSolution(String),
}

impl From<SolverError> for AppError {
    fn from(error: SolverError) -> Self {
        Self::solver(error.to_string()).with_source(error)
    }
}

/// Solves [`LpProblem`] values
pub trait LpSolver: Send + Sync {
    /// Backend name for audit trails
    fn name(&self) -> &'static str;

    /// Find a minimizing assignment
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] when the problem is infeasible or unbounded, or
    /// when the backend fails
    fn solve(&self, problem: &LpProblem) -> Result<LpSolution, SolverError>;
}

/// Pure Rust simplex backend built on `microlp`
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl LpSolver for MicroLpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, problem: &LpProblem) -> Result<LpSolution, SolverError> {
        let mut backend = Problem::new(OptimizationDirection::Minimize);
        let vars: Vec<_> = problem
            .variables()
            .iter()
            .map(|variable| backend.add_var(variable.objective, (variable.lower, variable.upper)))
            .collect();

        for constraint in problem.constraints() {
            let mut expr = LinearExpr::empty();
            for &(index, coefficient) in &constraint.terms {
                let var = vars.get(index).copied().ok_or_else(|| {
                    SolverError::Backend(format!(
                        "constraint {} references unknown variable {index}",
                        constraint.name
                    ))
                })?;
                expr.add(var, coefficient);
            }
            let op = match constraint.comparison {
                LpComparison::Eq => ComparisonOp::Eq,
                LpComparison::Le => ComparisonOp::Le,
                LpComparison::Ge => ComparisonOp::Ge,
            };
            backend.add_constraint(expr, op, constraint.rhs);
        }

        let solution = backend.solve().map_err(|error| match error {
            MicroLpError::Infeasible => SolverError::Infeasible,
            MicroLpError::Unbounded => SolverError::Unbounded,
            #[allow(unreachable_patterns)]
            other => SolverError::Backend(other.to_string()),
        })?;

        let values: Vec<f64> = vars.iter().map(|&var| solution[var]).collect();
        if let Some(position) = values.iter().position(|value| !value.is_finite()) {
            return Err(SolverError::InvalidSolution(format!(
                "variable {} is not finite",
                problem.variables()[position].name
            )));
        }

        Ok(LpSolution {
            objective: solution.objective(),
            values,
        })
    }
}
