//! Variable and operator substitution.
//!
//! Operator substitution treats each mapped connective as a macro: its
//! template is a formula over the placeholders [`PLACEHOLDER_FIRST`] (`p`)
//! and [`PLACEHOLDER_SECOND`] (`q`), and every occurrence of the connective
//! is replaced by the template with the placeholders bound to the
//! occurrence's (already substituted) operands.
//!
//! Placeholders are replaced simultaneously at the tree level, so operands
//! that themselves mention `p` or `q` are never captured.

use std::collections::btree_map;
use std::collections::BTreeMap;

use log::trace;

use crate::formula::{Connective, Formula};

/// Placeholder bound to the first operand of a substituted connective.
pub const PLACEHOLDER_FIRST: &str = "p";
/// Placeholder bound to the second operand of a substituted connective.
pub const PLACEHOLDER_SECOND: &str = "q";

/// The first-operand placeholder, as a formula.
pub fn p() -> Formula {
    Formula::var(PLACEHOLDER_FIRST)
}

/// The second-operand placeholder, as a formula.
pub fn q() -> Formula {
    Formula::var(PLACEHOLDER_SECOND)
}

/// A formula over the placeholders `p` and `q`.
pub type Template = Formula;

/// A mapping from connectives to templates.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct OperatorMap {
    templates: BTreeMap<Connective, Template>,
}

impl OperatorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the template for `connective`.
    pub fn with(mut self, connective: Connective, template: Template) -> Self {
        self.templates.insert(connective, template);
        self
    }

    pub fn get(&self, connective: Connective) -> Option<&Template> {
        self.templates.get(&connective)
    }

    pub fn contains(&self, connective: Connective) -> bool {
        self.templates.contains_key(&connective)
    }

    /// Connectives that have a template.
    pub fn connectives(&self) -> impl Iterator<Item = Connective> + '_ {
        self.templates.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Connective, Formula> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl FromIterator<(Connective, Formula)> for OperatorMap {
    fn from_iter<I: IntoIterator<Item = (Connective, Formula)>>(iter: I) -> Self {
        Self {
            templates: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a OperatorMap {
    type Item = (&'a Connective, &'a Formula);
    type IntoIter = btree_map::Iter<'a, Connective, Formula>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Formula {
    /// Replaces variables simultaneously according to `substitution`.
    ///
    /// Variables without an entry are kept. Replacement formulas are inserted
    /// as they are, without being substituted again.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use prop_basis::formula::Formula;
    ///
    /// let f = Formula::parse("(p&q)").unwrap();
    /// let substitution = BTreeMap::from([
    ///     ("p".to_string(), Formula::parse("q").unwrap()),
    ///     ("q".to_string(), Formula::parse("~p").unwrap()),
    /// ]);
    /// assert_eq!(f.substitute_variables(&substitution).to_string(), "(q&~p)");
    /// ```
    pub fn substitute_variables(&self, substitution: &BTreeMap<String, Formula>) -> Formula {
        match self {
            Formula::Var(name) => substitution.get(name).cloned().unwrap_or_else(|| self.clone()),
            Formula::Const(value) => Formula::constant(*value),
            Formula::Not(a) => Formula::not(a.substitute_variables(substitution)),
            Formula::Binary(op, a, b) => Formula::binary(
                *op,
                a.substitute_variables(substitution),
                b.substitute_variables(substitution),
            ),
        }
    }

    /// Replaces every occurrence of a mapped connective by its template.
    ///
    /// Substitution is bottom-up: operands are rewritten first, then bound to
    /// `p` (first operand) and `q` (second operand) in the template.
    /// Connectives without a template are kept, with their operands
    /// rewritten.
    ///
    /// # Example
    ///
    /// ```
    /// use prop_basis::formula::{Connective, Formula};
    /// use prop_basis::substitute::{p, q, OperatorMap};
    ///
    /// let map = OperatorMap::new().with(Connective::OR, Formula::not(Formula::and(Formula::not(p()), Formula::not(q()))));
    /// let f = Formula::parse("((p|q)&~r)").unwrap();
    /// assert_eq!(f.substitute_operators(&map).to_string(), "(~(~p&~q)&~r)");
    /// ```
    pub fn substitute_operators(&self, map: &OperatorMap) -> Formula {
        match self {
            Formula::Var(_) => self.clone(),
            Formula::Const(value) => {
                let connective = if *value { Connective::True } else { Connective::False };
                match map.get(connective) {
                    Some(template) => template.clone(),
                    None => Formula::constant(*value),
                }
            }
            Formula::Not(a) => {
                let first = a.substitute_operators(map);
                match map.get(Connective::Not) {
                    Some(template) => instantiate(template, &first, None),
                    None => Formula::not(first),
                }
            }
            Formula::Binary(op, a, b) => {
                let first = a.substitute_operators(map);
                let second = b.substitute_operators(map);
                match map.get(Connective::Binary(*op)) {
                    Some(template) => instantiate(template, &first, Some(&second)),
                    None => Formula::binary(*op, first, second),
                }
            }
        }
    }
}

fn instantiate(template: &Formula, first: &Formula, second: Option<&Formula>) -> Formula {
    trace!(
        "instantiate(template = {}, p = {}, q = {:?})",
        template,
        first,
        second.map(ToString::to_string)
    );
    bind(template, first, second)
}

/// Binds the placeholders of `template` to the given operands.
///
/// Walks the template only, so an operand is never searched for placeholders.
fn bind(template: &Formula, first: &Formula, second: Option<&Formula>) -> Formula {
    match template {
        Formula::Var(name) if name == PLACEHOLDER_FIRST => first.clone(),
        Formula::Var(name) if name == PLACEHOLDER_SECOND => match second {
            Some(second) => second.clone(),
            None => template.clone(),
        },
        Formula::Var(_) | Formula::Const(_) => template.clone(),
        Formula::Not(a) => Formula::not(bind(a, first, second)),
        Formula::Binary(op, a, b) => Formula::binary(*op, bind(a, first, second), bind(b, first, second)),
    }
}
