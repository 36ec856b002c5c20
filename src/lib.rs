//! # prop-basis: operator bases for propositional formulas
//!
//! **`prop-basis`** rewrites propositional formulas into equivalent formulas over a
//! restricted set of connectives: only `{~, &}`, only NAND, only `{->, ~}`, or only `{->, F}`.
//! The output always has the same truth table as the input.
//!
//! ## How it works
//!
//! Conversion is a two-stage pipeline:
//!
//! 1. **Canonicalization** ([`operators::to_not_and_or`]) eliminates the constants and
//!    the derived connectives `->`, `<->`, `+`, `-&`, `-|`, leaving only `{~, &, |}`.
//! 2. **Template substitution** ([`Formula::substitute_operators`]) expands every
//!    remaining connective that the target basis lacks into a fixed template over the
//!    placeholders `p` and `q`, bound to the connective's actual operands.
//!
//! ## Basic Usage
//!
//! ```rust
//! use prop_basis::formula::Formula;
//! use prop_basis::operators::{to_nand, Basis};
//! use prop_basis::semantics::is_equivalent;
//!
//! // 1. Parse a formula (binary connectives are always parenthesized)
//! let f = Formula::parse("(p<->q)").unwrap();
//!
//! // 2. Convert it to the NAND-only basis
//! let g = to_nand(&f);
//!
//! // 3. Check the result
//! assert!(Basis::Nand.contains(&g));
//! assert!(is_equivalent(&f, &g));
//! ```
//!
//! ## Core Components
//!
//! - **[`formula`]**: the immutable [`Formula`] tree and its constructors.
//! - **[`parse`]**: the textual syntax, e.g. `"((p->q)+~T)"`.
//! - **[`semantics`]**: evaluation, truth tables, and equivalence checks.
//! - **[`substitute`]**: variable and operator substitution.
//! - **[`operators`]**: the canonicalizer and the preset basis conversions.

pub mod formula;
pub mod operators;
pub mod parse;
pub mod semantics;
pub mod substitute;

pub use formula::Formula;
pub use operators::{to_implies_false, to_implies_not, to_nand, to_not_and, to_not_and_or, Basis};
