#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while resolving values.
///
/// These errors are raised either at parse time, while eagerly folding
/// constant operands, or during evaluation proper. A fold failure is stored
/// on the producing node and surfaced by the semantic checker; evaluation
/// failures abort the run immediately.
pub enum RuntimeError {
    /// A free name had no value anywhere in the applicable scope chain.
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A call reached evaluation with no registered function definition.
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A scope still had pending definitions after the bounded number of
    /// fixpoint passes.
    UnresolvedVariables {
        /// The scope whose pending set could not be emptied.
        scope: String,
    },
    /// A value had an unexpected or incompatible type.
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Attempted division by zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Arithmetic operation overflowed.
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to select an element outside the allowed bounds.
    IndexOutOfBounds {
        /// The largest valid index.
        max:   usize,
        /// The index that was actually requested.
        found: i64,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A literal value was too large to be represented safely.
    LiteralTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A pipe expression was reached during evaluation.
    UnsupportedPipe {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariable { name, line } => {
                write!(f, "Error on line {line}: Unknown variable '{name}'.")
            },
            Self::UnknownFunction { name, line } => {
                write!(f, "Error on line {line}: Unknown function '{name}'.")
            },
            Self::UnresolvedVariables { scope } => write!(f,
                                                          "Error: could not resolve all variables in scope '{scope}'."),

            Self::TypeError { details, line } => {
                write!(f, "Error on line {line}: Type error: {details}.")
            },
            Self::DivisionByZero { line } => write!(f, "Error on line {line}: Division by zero."),
            Self::Overflow { line } => write!(f,
                                              "Error on line {line}: Integer overflow while trying to compute result."),
            Self::IndexOutOfBounds { max, found, line } => write!(f,
                                                                  "Error on line {line}: Index out of bounds. Maximum is {max}, but found {found} instead."),
            Self::LiteralTooLarge { line } => {
                write!(f, "Error on line {line}: Literal is too large.")
            },
            Self::UnsupportedPipe { line } => write!(f,
                                                     "Error on line {line}: Pipe expressions are not supported in evaluation."),
        }
    }
}

impl std::error::Error for RuntimeError {}
