/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code. Parse errors include illegal characters, unterminated comments,
/// unexpected tokens, and any other issues detected before semantic checking.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised while resolving values:
/// unresolvable dependency sets, division by zero, type mismatches,
/// out-of-range selections, and integer overflow.
pub mod runtime_error;
/// Semantic errors.
///
/// Contains all error types raised by the semantic checker: illegal
/// redefinition, undeclared references, unknown functions, and call-arity
/// mismatches.
pub mod semantic_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use semantic_error::SemanticError;
