//! Conversion of formulas into restricted operator bases.
//!
//! Every conversion is a two-stage pipeline:
//!
//! 1. [`to_not_and_or`] rewrites the formula into the canonical basis
//!    `{~, &, |}` and removes all constants.
//! 2. The canonical formula is translated into the target basis by
//!    [`Formula::substitute_operators`] with a fixed [`OperatorMap`].
//!
//! | Target basis | Templates |
//! |---|---|
//! | `{~, &}` | `\|` → `~(~p&~q)` |
//! | `{-&}` | `~` → `(p-&p)`, `&` → `((p-&q)-&(p-&q))`, `\|` → `((p-&p)-&(q-&q))` |
//! | `{->, ~}` | `\|` → `(~p->q)`, `&` → `~(p->~q)` |
//! | `{->, F}` | `~` → `(p->F)`, `\|` → `((p->F)->q)`, `&` → `((p->(q->F))->F)` |
//!
//! All functions are pure. Recursion depth equals the depth of the input.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use log::{debug, trace};
use num_bigint::BigUint;

use crate::formula::{BinaryOp, Connective, Formula};
use crate::substitute::{p, q, OperatorMap};

/// Variable used to express the constants: `T` is `(p|~p)`, `F` is `(p&~p)`.
///
/// The witness does not need to be fresh, since both formulas have a fixed
/// truth value whatever `p` is assigned.
pub const CONSTANT_WITNESS: &str = "p";

/// Converts `formula` into an equivalent formula over `{~, &, |}` without
/// constants.
///
/// # Example
///
/// ```
/// use prop_basis::formula::Formula;
/// use prop_basis::operators::to_not_and_or;
///
/// let f = Formula::parse("(p->q)").unwrap();
/// assert_eq!(to_not_and_or(&f).to_string(), "(~p|q)");
/// ```
pub fn to_not_and_or(formula: &Formula) -> Formula {
    debug!("to_not_and_or(formula = {})", formula);
    canonicalize(formula)
}

fn canonicalize(formula: &Formula) -> Formula {
    match formula {
        Formula::Var(_) => formula.clone(),
        Formula::Const(true) => {
            trace!("T => (p|~p)");
            Formula::or(witness(), Formula::not(witness()))
        }
        Formula::Const(false) => {
            trace!("F => (p&~p)");
            Formula::and(witness(), Formula::not(witness()))
        }
        Formula::Not(a) => Formula::not(canonicalize(a)),
        Formula::Binary(op, a, b) => {
            let a = canonicalize(a);
            let b = canonicalize(b);
            match op {
                BinaryOp::And | BinaryOp::Or => Formula::binary(*op, a, b),
                BinaryOp::Implies => {
                    trace!("(a->b) => (~a|b)");
                    Formula::or(Formula::not(a), b)
                }
                BinaryOp::Xor => {
                    trace!("(a+b) => ((a&~b)|(~a&b))");
                    Formula::or(
                        Formula::and(a.clone(), Formula::not(b.clone())),
                        Formula::and(Formula::not(a), b),
                    )
                }
                BinaryOp::Iff => {
                    trace!("(a<->b) => ((a&b)|(~a&~b))");
                    Formula::or(
                        Formula::and(a.clone(), b.clone()),
                        Formula::and(Formula::not(a), Formula::not(b)),
                    )
                }
                BinaryOp::Nand => {
                    trace!("(a-&b) => ~(a&b)");
                    Formula::not(Formula::and(a, b))
                }
                BinaryOp::Nor => {
                    trace!("(a-|b) => ~(a|b)");
                    Formula::not(Formula::or(a, b))
                }
            }
        }
    }
}

fn witness() -> Formula {
    Formula::var(CONSTANT_WITNESS)
}

fn not_and_map() -> &'static OperatorMap {
    static MAP: OnceLock<OperatorMap> = OnceLock::new();
    MAP.get_or_init(|| {
        // (p|q) == ~(~p&~q)
        OperatorMap::new().with(Connective::OR, Formula::not(Formula::and(Formula::not(p()), Formula::not(q()))))
    })
}

fn nand_map() -> &'static OperatorMap {
    static MAP: OnceLock<OperatorMap> = OnceLock::new();
    MAP.get_or_init(|| {
        OperatorMap::new()
            .with(Connective::Not, Formula::nand(p(), p()))
            .with(
                Connective::AND,
                Formula::nand(Formula::nand(p(), q()), Formula::nand(p(), q())),
            )
            .with(
                Connective::OR,
                Formula::nand(Formula::nand(p(), p()), Formula::nand(q(), q())),
            )
    })
}

fn implies_not_map() -> &'static OperatorMap {
    static MAP: OnceLock<OperatorMap> = OnceLock::new();
    MAP.get_or_init(|| {
        OperatorMap::new()
            .with(Connective::OR, Formula::implies(Formula::not(p()), q()))
            .with(Connective::AND, Formula::not(Formula::implies(p(), Formula::not(q()))))
    })
}

fn implies_false_map() -> &'static OperatorMap {
    static MAP: OnceLock<OperatorMap> = OnceLock::new();
    MAP.get_or_init(|| {
        let neg = |f: Formula| Formula::implies(f, Formula::ff());
        OperatorMap::new()
            .with(Connective::Not, neg(p()))
            .with(Connective::OR, Formula::implies(neg(p()), q()))
            .with(Connective::AND, neg(Formula::implies(p(), neg(q()))))
    })
}

/// Converts `formula` into an equivalent formula over `{~, &}`.
pub fn to_not_and(formula: &Formula) -> Formula {
    debug!("to_not_and(formula = {})", formula);
    canonicalize(formula).substitute_operators(not_and_map())
}

/// Converts `formula` into an equivalent formula over `{-&}`.
///
/// # Example
///
/// ```
/// use prop_basis::formula::Formula;
/// use prop_basis::operators::to_nand;
///
/// let f = Formula::parse("~x").unwrap();
/// assert_eq!(to_nand(&f).to_string(), "(x-&x)");
/// ```
pub fn to_nand(formula: &Formula) -> Formula {
    debug!("to_nand(formula = {})", formula);
    canonicalize(formula).substitute_operators(nand_map())
}

/// Converts `formula` into an equivalent formula over `{->, ~}`.
pub fn to_implies_not(formula: &Formula) -> Formula {
    debug!("to_implies_not(formula = {})", formula);
    canonicalize(formula).substitute_operators(implies_not_map())
}

/// Converts `formula` into an equivalent formula over `{->, F}`.
pub fn to_implies_false(formula: &Formula) -> Formula {
    debug!("to_implies_false(formula = {})", formula);
    canonicalize(formula).substitute_operators(implies_false_map())
}

/// A functionally complete target basis.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Basis {
    /// `{~, &, |}`, the canonical basis.
    NotAndOr,
    /// `{~, &}`
    NotAnd,
    /// `{-&}`
    Nand,
    /// `{->, ~}`
    ImpliesNot,
    /// `{->, F}`
    ImpliesFalse,
}

impl Basis {
    pub const ALL: [Basis; 5] = [
        Basis::NotAndOr,
        Basis::NotAnd,
        Basis::Nand,
        Basis::ImpliesNot,
        Basis::ImpliesFalse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Basis::NotAndOr => "not-and-or",
            Basis::NotAnd => "not-and",
            Basis::Nand => "nand",
            Basis::ImpliesNot => "implies-not",
            Basis::ImpliesFalse => "implies-false",
        }
    }

    /// The connectives allowed in converted formulas.
    pub fn connectives(self) -> BTreeSet<Connective> {
        match self {
            Basis::NotAndOr => BTreeSet::from([Connective::Not, Connective::AND, Connective::OR]),
            Basis::NotAnd => BTreeSet::from([Connective::Not, Connective::AND]),
            Basis::Nand => BTreeSet::from([Connective::NAND]),
            Basis::ImpliesNot => BTreeSet::from([Connective::IMPLIES, Connective::Not]),
            Basis::ImpliesFalse => BTreeSet::from([Connective::IMPLIES, Connective::False]),
        }
    }

    /// Templates applied to the canonical form, or `None` for the canonical
    /// basis itself.
    pub fn operator_map(self) -> Option<&'static OperatorMap> {
        match self {
            Basis::NotAndOr => None,
            Basis::NotAnd => Some(not_and_map()),
            Basis::Nand => Some(nand_map()),
            Basis::ImpliesNot => Some(implies_not_map()),
            Basis::ImpliesFalse => Some(implies_false_map()),
        }
    }

    pub fn convert(self, formula: &Formula) -> Formula {
        match self {
            Basis::NotAndOr => to_not_and_or(formula),
            Basis::NotAnd => to_not_and(formula),
            Basis::Nand => to_nand(formula),
            Basis::ImpliesNot => to_implies_not(formula),
            Basis::ImpliesFalse => to_implies_false(formula),
        }
    }

    /// Checks whether `formula` only uses connectives of this basis.
    pub fn contains(self, formula: &Formula) -> bool {
        formula.operators().is_subset(&self.connectives())
    }

    /// Exact node count of `self.convert(formula)`, computed without
    /// building the converted formula.
    ///
    /// XOR and biconditional duplicate their operands, so nested chains of
    /// them grow exponentially.
    ///
    /// # Example
    ///
    /// ```
    /// use prop_basis::formula::Formula;
    /// use prop_basis::operators::Basis;
    ///
    /// let f = Formula::parse("(p+q)").unwrap();
    /// assert_eq!(Basis::NotAndOr.predicted_size(&f), 9u32.into());
    /// ```
    pub fn predicted_size(self, formula: &Formula) -> BigUint {
        SizeModel::new(self.operator_map()).size(formula)
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unknown basis name.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnknownBasis(pub String);

impl fmt::Display for UnknownBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown basis '{}', expected one of: ", self.0)?;
        let names: Vec<&str> = Basis::ALL.iter().map(|b| b.name()).collect();
        write!(f, "{}", names.join(", "))
    }
}

impl std::error::Error for UnknownBasis {}

impl FromStr for Basis {
    type Err = UnknownBasis;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Basis::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or_else(|| UnknownBasis(s.to_string()))
    }
}

/// Size contribution of a template: `fixed + firsts * |a| + seconds * |b|`.
#[derive(Debug, Copy, Clone)]
struct Shape {
    fixed: u32,
    firsts: u32,
    seconds: u32,
}

impl Shape {
    fn of(template: &Formula, binary: bool) -> Self {
        let mut shape = Shape {
            fixed: 0,
            firsts: 0,
            seconds: 0,
        };
        shape.visit(template, binary);
        shape
    }

    fn visit(&mut self, template: &Formula, binary: bool) {
        match template {
            Formula::Var(name) if name == crate::substitute::PLACEHOLDER_FIRST => self.firsts += 1,
            Formula::Var(name) if binary && name == crate::substitute::PLACEHOLDER_SECOND => self.seconds += 1,
            Formula::Var(_) | Formula::Const(_) => self.fixed += 1,
            Formula::Not(a) => {
                self.fixed += 1;
                self.visit(a, binary);
            }
            Formula::Binary(_, a, b) => {
                self.fixed += 1;
                self.visit(a, binary);
                self.visit(b, binary);
            }
        }
    }
}

/// Predicts the size of a converted formula from the canonical rewrite
/// rules and the template shapes of the target map.
struct SizeModel {
    not: Option<Shape>,
    and: Option<Shape>,
    or: Option<Shape>,
}

impl SizeModel {
    fn new(map: Option<&OperatorMap>) -> Self {
        let shape = |c: Connective| map.and_then(|m| m.get(c)).map(|t| Shape::of(t, c.arity() == 2));
        Self {
            not: shape(Connective::Not),
            and: shape(Connective::AND),
            or: shape(Connective::OR),
        }
    }

    fn not(&self, a: &BigUint) -> BigUint {
        match self.not {
            Some(s) => BigUint::from(s.fixed) + a * s.firsts,
            None => a + 1u32,
        }
    }

    fn binary(shape: Option<Shape>, a: &BigUint, b: &BigUint) -> BigUint {
        match shape {
            Some(s) => BigUint::from(s.fixed) + a * s.firsts + b * s.seconds,
            None => a + b + 1u32,
        }
    }

    fn and(&self, a: &BigUint, b: &BigUint) -> BigUint {
        Self::binary(self.and, a, b)
    }

    fn or(&self, a: &BigUint, b: &BigUint) -> BigUint {
        Self::binary(self.or, a, b)
    }

    // Mirrors the case analysis of `canonicalize`.
    fn size(&self, formula: &Formula) -> BigUint {
        let leaf = BigUint::from(1u32);
        match formula {
            Formula::Var(_) => leaf,
            Formula::Const(true) => self.or(&leaf, &self.not(&leaf)),
            Formula::Const(false) => self.and(&leaf, &self.not(&leaf)),
            Formula::Not(a) => self.not(&self.size(a)),
            Formula::Binary(op, a, b) => {
                let a = self.size(a);
                let b = self.size(b);
                match op {
                    BinaryOp::And => self.and(&a, &b),
                    BinaryOp::Or => self.or(&a, &b),
                    BinaryOp::Implies => self.or(&self.not(&a), &b),
                    BinaryOp::Xor => self.or(&self.and(&a, &self.not(&b)), &self.and(&self.not(&a), &b)),
                    BinaryOp::Iff => self.or(&self.and(&a, &b), &self.and(&self.not(&a), &self.not(&b))),
                    BinaryOp::Nand => self.not(&self.and(&a, &b)),
                    BinaryOp::Nor => self.not(&self.or(&a, &b)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::semantics::{all_models, evaluate, is_equivalent};

    use test_log::test;

    fn parse(s: &str) -> Formula {
        Formula::parse(s).unwrap()
    }

    #[test]
    fn test_canonical_rewrite_rules() {
        assert_eq!(to_not_and_or(&parse("x")), parse("x"));
        assert_eq!(to_not_and_or(&parse("T")), parse("(p|~p)"));
        assert_eq!(to_not_and_or(&parse("F")), parse("(p&~p)"));
        assert_eq!(to_not_and_or(&parse("~x")), parse("~x"));
        assert_eq!(to_not_and_or(&parse("(x&y)")), parse("(x&y)"));
        assert_eq!(to_not_and_or(&parse("(x|y)")), parse("(x|y)"));
        assert_eq!(to_not_and_or(&parse("(x->y)")), parse("(~x|y)"));
        assert_eq!(to_not_and_or(&parse("(x+y)")), parse("((x&~y)|(~x&y))"));
        assert_eq!(to_not_and_or(&parse("(x<->y)")), parse("((x&y)|(~x&~y))"));
        assert_eq!(to_not_and_or(&parse("(x-&y)")), parse("~(x&y)"));
        assert_eq!(to_not_and_or(&parse("(x-|y)")), parse("~(x|y)"));
    }

    #[test]
    fn test_canonical_converts_children_first() {
        let f = parse("((T->x)-|~(y<->F))");
        let g = to_not_and_or(&f);
        assert_eq!(g, parse("~((~(p|~p)|x)|~((y&(p&~p))|(~y&~(p&~p))))"));
        assert!(Basis::NotAndOr.contains(&g));
    }

    /// Each template must agree with the connective it replaces on all rows.
    #[test]
    fn test_templates_truth_tables() {
        for basis in Basis::ALL {
            let Some(map) = basis.operator_map() else {
                continue;
            };
            for (&connective, template) in map {
                for model in all_models(["p", "q"]) {
                    let a = model["p"];
                    let b = model["q"];
                    let expected = match connective {
                        Connective::Not => !a,
                        Connective::Binary(op) => op.apply(a, b),
                        Connective::True => true,
                        Connective::False => false,
                    };
                    assert_eq!(
                        evaluate(template, &model),
                        Ok(expected),
                        "{}: template {} for '{}' at {:?}",
                        basis,
                        template,
                        connective,
                        model
                    );
                }
                assert!(basis.contains(template), "{}: template {} leaves basis", basis, template);
            }
        }
    }

    #[test]
    fn test_presets_small() {
        assert_eq!(to_not_and(&parse("(x|y)")), parse("~(~x&~y)"));
        assert_eq!(to_nand(&parse("(x&y)")), parse("((x-&y)-&(x-&y))"));
        assert_eq!(to_nand(&parse("(x|y)")), parse("((x-&x)-&(y-&y))"));
        assert_eq!(to_implies_not(&parse("(x|y)")), parse("(~x->y)"));
        assert_eq!(to_implies_not(&parse("(x&y)")), parse("~(x->~y)"));
        assert_eq!(to_implies_false(&parse("~x")), parse("(x->F)"));
        assert_eq!(to_implies_false(&parse("(x|y)")), parse("((x->F)->y)"));
        assert_eq!(to_implies_false(&parse("(x&y)")), parse("((x->(y->F))->F)"));
    }

    #[test]
    fn test_presets_with_placeholder_names() {
        // Operands named like the placeholders are substituted as whole subtrees.
        let f = parse("(q|p)");
        let g = to_implies_not(&f);
        assert_eq!(g, parse("(~q->p)"));
        assert!(is_equivalent(&f, &g));
    }

    #[test]
    fn test_basis_convert_matches_functions() {
        let f = parse("((p+q)->~(r<->T))");
        assert_eq!(Basis::NotAndOr.convert(&f), to_not_and_or(&f));
        assert_eq!(Basis::NotAnd.convert(&f), to_not_and(&f));
        assert_eq!(Basis::Nand.convert(&f), to_nand(&f));
        assert_eq!(Basis::ImpliesNot.convert(&f), to_implies_not(&f));
        assert_eq!(Basis::ImpliesFalse.convert(&f), to_implies_false(&f));
        for basis in Basis::ALL {
            let g = basis.convert(&f);
            assert!(basis.contains(&g), "{}: {}", basis, g);
            assert!(is_equivalent(&f, &g), "{}: {}", basis, g);
        }
    }

    #[test]
    fn test_basis_names() {
        for basis in Basis::ALL {
            assert_eq!(basis.name().parse::<Basis>(), Ok(basis));
            assert_eq!(basis.to_string(), basis.name());
        }
        assert_eq!("nor".parse::<Basis>(), Err(UnknownBasis("nor".to_string())));
    }

    #[test]
    fn test_predicted_size() {
        let formulas = ["p", "T", "F", "~~q", "(p+q)", "((p<->q)-|(r->T))", "~(x-&(y+~F))"];
        for text in formulas {
            let f = parse(text);
            for basis in Basis::ALL {
                assert_eq!(
                    basis.predicted_size(&f),
                    BigUint::from(basis.convert(&f).size()),
                    "{} in {}",
                    text,
                    basis
                );
            }
        }
    }

    #[test]
    fn test_predicted_size_exponential() {
        // (x0+(x1+(x2+...))) doubles at every level.
        let mut f = Formula::var("x0");
        for i in 1..=100 {
            f = Formula::xor(Formula::var(format!("x{}", i)), f);
        }
        let size = Basis::Nand.predicted_size(&f);
        assert!(size > BigUint::from(u64::MAX));
    }
}
