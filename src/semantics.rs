//! Truth-table semantics of formulas.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use num_bigint::BigUint;

use crate::formula::Formula;

/// An assignment of truth values to variable names.
pub type Model = BTreeMap<String, bool>;

/// Error type for evaluation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SemanticsError {
    /// The formula mentions a variable the model does not assign.
    UnboundVariable(String),
}

impl fmt::Display for SemanticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticsError::UnboundVariable(name) => write!(f, "Variable '{}' is not assigned by the model", name),
        }
    }
}

impl std::error::Error for SemanticsError {}

/// Computes the truth value of `formula` under `model`.
pub fn evaluate(formula: &Formula, model: &Model) -> Result<bool, SemanticsError> {
    match formula {
        Formula::Var(name) => model
            .get(name)
            .copied()
            .ok_or_else(|| SemanticsError::UnboundVariable(name.clone())),
        Formula::Const(value) => Ok(*value),
        Formula::Not(a) => Ok(!evaluate(a, model)?),
        Formula::Binary(op, a, b) => Ok(op.apply(evaluate(a, model)?, evaluate(b, model)?)),
    }
}

/// Iterator over all `2^n` models of a set of variables.
///
/// Models come in truth-table order: the first variable is the most
/// significant bit, and `false` precedes `true`.
#[derive(Debug, Clone)]
pub struct AllModels {
    variables: Vec<String>,
    // Assignment of the next model, or `None` once the table is exhausted.
    bits: Option<Vec<bool>>,
}

impl Iterator for AllModels {
    type Item = Model;

    fn next(&mut self) -> Option<Self::Item> {
        let bits = self.bits.as_mut()?;
        let model = self.variables.iter().cloned().zip(bits.iter().copied()).collect();
        match bits.iter().rposition(|b| !b) {
            Some(i) => {
                bits[i] = true;
                bits[i + 1..].iter_mut().for_each(|b| *b = false);
            }
            None => self.bits = None,
        }
        Some(model)
    }
}

/// Enumerates all models over the given variables.
///
/// There is no limit on the number of variables; the iterator is lazy, so
/// callers that stop early (like [`is_satisfiable`]) never walk the whole
/// table.
pub fn all_models<I, S>(variables: I) -> AllModels
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let variables: Vec<String> = variables.into_iter().map(Into::into).collect();
    AllModels {
        bits: Some(vec![false; variables.len()]),
        variables,
    }
}

fn models_of(formula: &Formula) -> AllModels {
    all_models(formula.variables())
}

/// Truth values of `formula` under each of `models`.
pub fn truth_values<I>(formula: &Formula, models: I) -> Result<Vec<bool>, SemanticsError>
where
    I: IntoIterator<Item = Model>,
{
    models.into_iter().map(|model| evaluate(formula, &model)).collect()
}

// Models are generated from the formula's own variables, so evaluation cannot fail.
fn eval_total(formula: &Formula, model: &Model) -> bool {
    match formula {
        Formula::Var(name) => model.get(name).copied().unwrap_or(false),
        Formula::Const(value) => *value,
        Formula::Not(a) => !eval_total(a, model),
        Formula::Binary(op, a, b) => op.apply(eval_total(a, model), eval_total(b, model)),
    }
}

pub fn is_tautology(formula: &Formula) -> bool {
    models_of(formula).all(|m| eval_total(formula, &m))
}

pub fn is_contradiction(formula: &Formula) -> bool {
    !is_satisfiable(formula)
}

pub fn is_satisfiable(formula: &Formula) -> bool {
    models_of(formula).any(|m| eval_total(formula, &m))
}

/// Checks whether two formulas have the same truth table over the union of
/// their variables.
pub fn is_equivalent(a: &Formula, b: &Formula) -> bool {
    let variables: BTreeSet<&str> = a.variables().union(&b.variables()).copied().collect();
    all_models(variables).all(|m| eval_total(a, &m) == eval_total(b, &m))
}

/// Number of satisfying assignments over the formula's own variables.
pub fn count_models(formula: &Formula) -> BigUint {
    models_of(formula).fold(BigUint::from(0u32), |acc, m| {
        if eval_total(formula, &m) {
            acc + 1u32
        } else {
            acc
        }
    })
}
