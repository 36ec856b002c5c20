//! Propositional formulas as immutable trees.
//!
//! A [`Formula`] is a closed sum type over the fixed connective set:
//! variables, the constants `T` and `F`, negation, and seven binary
//! connectives. Nodes are only ever created through constructors, and every
//! transformation in this crate builds a fresh tree.

use std::collections::BTreeSet;
use std::fmt;

/// Binary connectives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum BinaryOp {
    /// Conjunction `&`.
    And,
    /// Disjunction `|`.
    Or,
    /// Implication `->`.
    Implies,
    /// Biconditional `<->`.
    Iff,
    /// Exclusive or `+`.
    Xor,
    /// Negated conjunction `-&`.
    Nand,
    /// Negated disjunction `-|`.
    Nor,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 7] = [
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Implies,
        BinaryOp::Iff,
        BinaryOp::Xor,
        BinaryOp::Nand,
        BinaryOp::Nor,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Implies => "->",
            BinaryOp::Iff => "<->",
            BinaryOp::Xor => "+",
            BinaryOp::Nand => "-&",
            BinaryOp::Nor => "-|",
        }
    }

    /// Truth function of the connective.
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            BinaryOp::And => a && b,
            BinaryOp::Or => a || b,
            BinaryOp::Implies => !a || b,
            BinaryOp::Iff => a == b,
            BinaryOp::Xor => a != b,
            BinaryOp::Nand => !(a && b),
            BinaryOp::Nor => !(a || b),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Every root label of a formula that is not a variable.
///
/// Constants are nullary connectives, so a basis such as `{->, F}` is a
/// plain set of `Connective`s.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Connective {
    True,
    False,
    Not,
    Binary(BinaryOp),
}

impl Connective {
    pub const AND: Connective = Connective::Binary(BinaryOp::And);
    pub const OR: Connective = Connective::Binary(BinaryOp::Or);
    pub const IMPLIES: Connective = Connective::Binary(BinaryOp::Implies);
    pub const IFF: Connective = Connective::Binary(BinaryOp::Iff);
    pub const XOR: Connective = Connective::Binary(BinaryOp::Xor);
    pub const NAND: Connective = Connective::Binary(BinaryOp::Nand);
    pub const NOR: Connective = Connective::Binary(BinaryOp::Nor);

    pub fn symbol(self) -> &'static str {
        match self {
            Connective::True => "T",
            Connective::False => "F",
            Connective::Not => "~",
            Connective::Binary(op) => op.symbol(),
        }
    }

    /// Number of children a node with this root owns.
    pub fn arity(self) -> usize {
        match self {
            Connective::True | Connective::False => 0,
            Connective::Not => 1,
            Connective::Binary(_) => 2,
        }
    }

    /// Looks up the connective printed as `symbol`.
    pub fn from_symbol(symbol: &str) -> Result<Self, FormulaError> {
        match symbol {
            "T" => Ok(Connective::True),
            "F" => Ok(Connective::False),
            "~" => Ok(Connective::Not),
            _ => BinaryOp::ALL
                .into_iter()
                .find(|op| op.symbol() == symbol)
                .map(Connective::Binary)
                .ok_or_else(|| FormulaError::UnrecognizedOperator(symbol.to_string())),
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Error type for formula construction.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormulaError {
    /// The root label is neither a variable name nor a known connective.
    UnrecognizedOperator(String),
    /// The number of children does not match the arity of the root.
    Arity {
        connective: Connective,
        expected: usize,
        found: usize,
    },
    /// A variable leaf was given children.
    VariableOperands { name: String, found: usize },
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaError::UnrecognizedOperator(root) => write!(f, "Unrecognized operator: '{}'", root),
            FormulaError::Arity {
                connective,
                expected,
                found,
            } => write!(
                f,
                "Operator '{}' takes {} operand(s), but {} were given",
                connective, expected, found
            ),
            FormulaError::VariableOperands { name, found } => {
                write!(f, "Variable '{}' takes no operands, but {} were given", name, found)
            }
        }
    }
}

impl std::error::Error for FormulaError {}

/// Checks whether `s` is a variable name: a letter `p`..`z` followed by digits.
pub fn is_variable(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some('p'..='z') => chars.all(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Checks whether `s` is a constant (`T` or `F`).
pub fn is_constant(s: &str) -> bool {
    s == "T" || s == "F"
}

/// Checks whether `s` is the unary operator (`~`).
pub fn is_unary(s: &str) -> bool {
    s == "~"
}

/// Checks whether `s` is one of the binary operators.
pub fn is_binary(s: &str) -> bool {
    BinaryOp::ALL.iter().any(|op| op.symbol() == s)
}

/// Root label of a formula.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Root<'a> {
    Variable(&'a str),
    Connective(Connective),
}

impl fmt::Display for Root<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Root::Variable(name) => f.write_str(name),
            Root::Connective(c) => write!(f, "{}", c),
        }
    }
}

/// An immutable propositional formula.
///
/// Equality is structural. Each subtree is exclusively owned by its parent.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Formula {
    Var(String),
    Const(bool),
    Not(Box<Formula>),
    Binary(BinaryOp, Box<Formula>, Box<Formula>),
}

impl Formula {
    /// Creates a variable leaf.
    ///
    /// The name is not validated here; use [`Formula::from_parts`] or the
    /// parser for untrusted input.
    pub fn var(name: impl Into<String>) -> Self {
        Formula::Var(name.into())
    }

    pub fn constant(value: bool) -> Self {
        Formula::Const(value)
    }

    pub fn tt() -> Self {
        Formula::Const(true)
    }

    pub fn ff() -> Self {
        Formula::Const(false)
    }

    pub fn not(first: Self) -> Self {
        Formula::Not(Box::new(first))
    }

    pub fn binary(op: BinaryOp, first: Self, second: Self) -> Self {
        Formula::Binary(op, Box::new(first), Box::new(second))
    }

    pub fn and(first: Self, second: Self) -> Self {
        Formula::binary(BinaryOp::And, first, second)
    }

    pub fn or(first: Self, second: Self) -> Self {
        Formula::binary(BinaryOp::Or, first, second)
    }

    pub fn implies(first: Self, second: Self) -> Self {
        Formula::binary(BinaryOp::Implies, first, second)
    }

    pub fn iff(first: Self, second: Self) -> Self {
        Formula::binary(BinaryOp::Iff, first, second)
    }

    pub fn xor(first: Self, second: Self) -> Self {
        Formula::binary(BinaryOp::Xor, first, second)
    }

    pub fn nand(first: Self, second: Self) -> Self {
        Formula::binary(BinaryOp::Nand, first, second)
    }

    pub fn nor(first: Self, second: Self) -> Self {
        Formula::binary(BinaryOp::Nor, first, second)
    }

    /// Builds a node from a textual root label and its children.
    ///
    /// # Errors
    ///
    /// - [`FormulaError::UnrecognizedOperator`] if `root` is neither a
    ///   variable name nor a known connective symbol.
    /// - [`FormulaError::Arity`] if the children do not match the arity
    ///   of `root`.
    /// - [`FormulaError::VariableOperands`] if `root` is a variable name
    ///   and children are given.
    ///
    /// # Example
    ///
    /// ```
    /// use prop_basis::formula::Formula;
    ///
    /// let f = Formula::from_parts("->", Some(Formula::var("p")), Some(Formula::var("q"))).unwrap();
    /// assert_eq!(f.to_string(), "(p->q)");
    /// assert!(Formula::from_parts("=>", None, None).is_err());
    /// ```
    pub fn from_parts(root: &str, first: Option<Formula>, second: Option<Formula>) -> Result<Self, FormulaError> {
        if is_variable(root) {
            let found = usize::from(first.is_some()) + usize::from(second.is_some());
            if found != 0 {
                return Err(FormulaError::VariableOperands {
                    name: root.to_string(),
                    found,
                });
            }
            return Ok(Formula::var(root));
        }

        let connective = Connective::from_symbol(root)?;
        let arity_error = |found: usize| FormulaError::Arity {
            connective,
            expected: connective.arity(),
            found,
        };
        match (connective, first, second) {
            (Connective::True, None, None) => Ok(Formula::tt()),
            (Connective::False, None, None) => Ok(Formula::ff()),
            (Connective::Not, Some(a), None) => Ok(Formula::not(a)),
            (Connective::Binary(op), Some(a), Some(b)) => Ok(Formula::binary(op, a, b)),
            (_, a, b) => Err(arity_error(usize::from(a.is_some()) + usize::from(b.is_some()))),
        }
    }

    pub fn root(&self) -> Root<'_> {
        match self {
            Formula::Var(name) => Root::Variable(name),
            Formula::Const(true) => Root::Connective(Connective::True),
            Formula::Const(false) => Root::Connective(Connective::False),
            Formula::Not(_) => Root::Connective(Connective::Not),
            Formula::Binary(op, _, _) => Root::Connective(Connective::Binary(*op)),
        }
    }

    pub fn first(&self) -> Option<&Formula> {
        match self {
            Formula::Not(a) | Formula::Binary(_, a, _) => Some(a),
            _ => None,
        }
    }

    pub fn second(&self) -> Option<&Formula> {
        match self {
            Formula::Binary(_, _, b) => Some(b),
            _ => None,
        }
    }

    /// All variable names occurring in the formula.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut result = BTreeSet::new();
        self.collect_variables(&mut result);
        result
    }

    fn collect_variables<'a>(&'a self, acc: &mut BTreeSet<&'a str>) {
        match self {
            Formula::Var(name) => {
                acc.insert(name.as_str());
            }
            Formula::Const(_) => {}
            Formula::Not(a) => a.collect_variables(acc),
            Formula::Binary(_, a, b) => {
                a.collect_variables(acc);
                b.collect_variables(acc);
            }
        }
    }

    /// All connectives occurring in the formula, constants included.
    pub fn operators(&self) -> BTreeSet<Connective> {
        let mut result = BTreeSet::new();
        self.collect_operators(&mut result);
        result
    }

    fn collect_operators(&self, acc: &mut BTreeSet<Connective>) {
        if let Root::Connective(c) = self.root() {
            acc.insert(c);
        }
        match self {
            Formula::Var(_) | Formula::Const(_) => {}
            Formula::Not(a) => a.collect_operators(acc),
            Formula::Binary(_, a, b) => {
                a.collect_operators(acc);
                b.collect_operators(acc);
            }
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Formula::Var(_) | Formula::Const(_) => 1,
            Formula::Not(a) => 1 + a.size(),
            Formula::Binary(_, a, b) => 1 + a.size() + b.size(),
        }
    }

    /// Depth of the tree (0 for leaves).
    pub fn depth(&self) -> usize {
        match self {
            Formula::Var(_) | Formula::Const(_) => 0,
            Formula::Not(a) => 1 + a.depth(),
            Formula::Binary(_, a, b) => 1 + a.depth().max(b.depth()),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Var(name) => f.write_str(name),
            Formula::Const(true) => f.write_str("T"),
            Formula::Const(false) => f.write_str("F"),
            Formula::Not(a) => write!(f, "~{}", a),
            Formula::Binary(op, a, b) => write!(f, "({}{}{})", a, op, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_root_categories() {
        assert!(is_variable("p"));
        assert!(is_variable("x12"));
        assert!(!is_variable("a"));
        assert!(!is_variable("p1q"));
        assert!(!is_variable(""));

        assert!(is_constant("T"));
        assert!(is_constant("F"));
        assert!(!is_constant("p"));

        assert!(is_unary("~"));
        assert!(!is_unary("-&"));

        for op in BinaryOp::ALL {
            assert!(is_binary(op.symbol()));
        }
        assert!(!is_binary("~"));
        assert!(!is_binary("=>"));
    }

    #[test]
    fn test_connective_from_symbol() {
        assert_eq!(Connective::from_symbol("T"), Ok(Connective::True));
        assert_eq!(Connective::from_symbol("F"), Ok(Connective::False));
        assert_eq!(Connective::from_symbol("~"), Ok(Connective::Not));
        assert_eq!(Connective::from_symbol("<->"), Ok(Connective::IFF));
        assert_eq!(Connective::from_symbol("-|"), Ok(Connective::NOR));
        assert_eq!(
            Connective::from_symbol("?"),
            Err(FormulaError::UnrecognizedOperator("?".to_string()))
        );
    }

    #[test]
    fn test_from_parts() {
        let p = Formula::var("p");
        let q = Formula::var("q");

        assert_eq!(Formula::from_parts("x7", None, None), Ok(Formula::var("x7")));
        assert_eq!(Formula::from_parts("F", None, None), Ok(Formula::constant(false)));
        assert_eq!(Formula::from_parts("T", None, None), Ok(Formula::constant(true)));
        assert_eq!(Formula::from_parts("~", Some(p.clone()), None), Ok(Formula::not(p.clone())));
        assert_eq!(
            Formula::from_parts("+", Some(p.clone()), Some(q.clone())),
            Ok(Formula::xor(p.clone(), q.clone()))
        );
    }

    #[test]
    fn test_from_parts_malformed() {
        let p = Formula::var("p");

        assert_eq!(
            Formula::from_parts("=>", Some(p.clone()), Some(p.clone())),
            Err(FormulaError::UnrecognizedOperator("=>".to_string()))
        );
        assert_eq!(
            Formula::from_parts("&", Some(p.clone()), None),
            Err(FormulaError::Arity {
                connective: Connective::AND,
                expected: 2,
                found: 1,
            })
        );
        assert_eq!(
            Formula::from_parts("T", Some(p.clone()), None),
            Err(FormulaError::Arity {
                connective: Connective::True,
                expected: 0,
                found: 1,
            })
        );
        assert_eq!(
            Formula::from_parts("p", Some(p.clone()), Some(p)),
            Err(FormulaError::VariableOperands {
                name: "p".to_string(),
                found: 2,
            })
        );
        assert_eq!(
            Formula::from_parts("q", None, Some(Formula::var("r")))
                .unwrap_err()
                .to_string(),
            "Variable 'q' takes no operands, but 1 were given"
        );
    }

    #[test]
    fn test_accessors() {
        let f = Formula::implies(Formula::var("p"), Formula::not(Formula::var("q")));
        assert_eq!(f.root(), Root::Connective(Connective::IMPLIES));
        assert_eq!(f.first(), Some(&Formula::var("p")));
        assert_eq!(f.second(), Some(&Formula::not(Formula::var("q"))));
        assert_eq!(Formula::var("r").root(), Root::Variable("r"));
        assert_eq!(Formula::var("r").first(), None);
    }

    #[test]
    fn test_variables_and_operators() {
        let f = Formula::or(
            Formula::and(Formula::var("q"), Formula::tt()),
            Formula::nand(Formula::var("p"), Formula::not(Formula::var("q"))),
        );
        assert_eq!(f.variables().into_iter().collect::<Vec<_>>(), vec!["p", "q"]);
        assert_eq!(
            f.operators(),
            BTreeSet::from([Connective::True, Connective::Not, Connective::AND, Connective::OR, Connective::NAND])
        );
    }

    #[test]
    fn test_size_and_depth() {
        let p = Formula::var("p");
        assert_eq!(p.size(), 1);
        assert_eq!(p.depth(), 0);

        let f = Formula::and(Formula::not(p.clone()), p);
        assert_eq!(f.size(), 4);
        assert_eq!(f.depth(), 2);
    }

    #[test]
    fn test_display() {
        let f = Formula::iff(
            Formula::not(Formula::var("p")),
            Formula::nor(Formula::ff(), Formula::var("q1")),
        );
        assert_eq!(f.to_string(), "(~p<->(F-|q1))");
    }
}
