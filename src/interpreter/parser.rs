/// Core expression parsing.
///
/// Contains the entry point for arithmetic expressions and the atom, factor
/// and term productions, including `select` and function calls.
pub mod core;

/// Parse-time constant folding.
///
/// Builds the state of every composite expression node: folds operands that
/// are already resolved, composes deferred closures otherwise, and records
/// fold failures on the producing node.
pub mod fold;

/// Program structure parsing.
///
/// Parses programs, variable/constant/tuple definitions, function
/// definitions, and return expressions.
pub mod statement;

/// Tuple and pipe expression parsing.
///
/// Parses tuple atoms (ranges, repeats, list literals), `++` concatenation,
/// and pipe expressions.
pub mod tuple;

/// Utility functions for the parser.
///
/// Provides helpers shared by the grammar productions, such as
/// comma-separated list parsing and token expectation.
pub mod utils;
