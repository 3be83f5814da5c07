//! # tupla
//!
//! tupla is an interpreter for a small declarative language built around
//! named bindings, tuple values, function definitions, and a single
//! mandatory program-level return expression. Programs are evaluated by
//! resolving value dependencies to a fixed point rather than by strict
//! top-to-bottom execution, so definitions may appear in any order.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use logos::Logos;

use crate::{
    error::ParseError,
    interpreter::{
        checker::check_program,
        evaluator::core::{Context, run_program},
        lexer::{LexerExtras, Token},
        parser::statement::parse_program,
        value::Value,
    },
    render::TreeFormat,
};

/// Defines the structure of parsed code.
///
/// This module declares the node types that represent the syntactic
/// structure of a program as a tree, together with the two-way split every
/// expression carries: a concrete value resolved at parse time, or a
/// deferred computation over a list of free names.
///
/// # Responsibilities
/// - Defines program, definition, function and expression node types.
/// - Pairs every expression with its resolved/evaluable/faulted state.
/// - Attaches source lines and scope names for error reporting.
pub mod ast;
/// Provides unified error types for every stage of the pipeline.
///
/// This module defines all errors that can be raised while lexing, parsing,
/// checking or evaluating code. It standardizes error reporting and carries
/// detailed information about failures, including source locations.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer/parser, checker,
///   evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of program execution.
///
/// This module ties together lexing, parsing, semantic checking, evaluation,
/// value representations and error handling to provide a complete runtime
/// for the language. It exposes the public API for interpreting programs.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, checker, evaluator and
///   value types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// Renders a parsed program for human inspection.
///
/// A read-only consumer of the finished tree; supports unicode and ASCII
/// indented trees and Graphviz dot output.
pub mod render;
/// General utilities for safe numeric conversion.
///
/// Reusable conversion routines shared by the evaluator and value
/// operations.
pub mod util;

/// Parses, checks and runs a program, returning its final value.
///
/// The source is tokenized and parsed into a tree; when a tree format is
/// given the tree is rendered to stdout before anything else happens. The
/// semantic checker then validates the program (printing its confirmation
/// line on success), and the evaluator resolves every definition and the
/// return expression, printing the final value.
///
/// # Errors
/// Returns an error if lexing, parsing, semantic checking or evaluation
/// fails. The first failure aborts the run; there are no partial results.
///
/// # Examples
/// ```
/// use tupla::{get_result, interpreter::value::Value};
///
/// // Definitions resolve by dependency, not source order.
/// let value = get_result("aa <- bb + 1.\nbb <- 5.\n= aa.", None).unwrap();
/// assert_eq!(value, Value::Integer(6));
///
/// // Referencing an undeclared name is a semantic error.
/// assert!(get_result("aa <- cc + 1.\n= aa.", None).is_err());
/// ```
pub fn get_result(source: &str,
                  treetype: Option<TreeFormat>)
                  -> Result<Value, Box<dyn std::error::Error>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source,
                                             LexerExtras { line: 1,
                                                           unterminated_comment: false });

    while let Some(token) = lexer.next() {
        if let Ok(tok) = token {
            tokens.push((tok, lexer.extras.line));
        } else if lexer.extras.unterminated_comment {
            return Err(Box::new(ParseError::UnterminatedComment { line: lexer.extras.line }));
        } else {
            let slice = lexer.slice();
            return Err(Box::new(ParseError::IllegalCharacter { token: slice.to_string(),
                                                               line:  lexer.extras.line, }));
        }
    }

    let mut iter = tokens.iter().peekable();
    let program = parse_program(&mut iter)?;

    if let Some(format) = treetype {
        print!("{}", render::render(&program, format));
    }

    let mut context = Context::new();
    check_program(&program, &mut context)?;
    println!("Semantics ok.");

    let value = run_program(&program, &mut context)?;
    println!("Return value of the program: {value}");

    Ok(value)
}
