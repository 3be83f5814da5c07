use crate::error::RuntimeError;

#[derive(Debug)]
/// Represents all errors raised by the semantic checker.
pub enum SemanticError {
    /// An expression referenced a name that was not declared in its own
    /// scope or the global scope.
    UndeclaredReference {
        /// The undeclared name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to define a constant or tuple name a second time in one scope.
    Redefinition {
        /// The redefined name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to define a function whose name is already declared globally.
    FunctionAlreadyDeclared {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A call referenced a function missing from the global function table.
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A call's argument count did not match the function's declared arity.
    ArityMismatch {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A parse-time constant-folding failure carried by the checked node,
    /// surfaced verbatim ahead of all other checks.
    ExpressionFault(RuntimeError),
}

impl std::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndeclaredReference { name, line } => write!(f,
                                                               "Error on line {line}: Referencing '{name}' that was not declared."),

            Self::Redefinition { name, line } => {
                write!(f, "Error on line {line}: '{name}' cannot be defined again.")
            },

            Self::FunctionAlreadyDeclared { name, line } => write!(f,
                                                                   "Error on line {line}: Function '{name}' is already declared."),

            Self::UnknownFunction { name, line } => {
                write!(f, "Error on line {line}: Calling unknown function '{name}'.")
            },

            Self::ArityMismatch { name, line } => write!(f,
                                                         "Error on line {line}: Number of parameters do not match when calling '{name}'."),

            Self::ExpressionFault(error) => write!(f, "{error}"),
        }
    }
}

impl From<RuntimeError> for SemanticError {
    fn from(error: RuntimeError) -> Self {
        Self::ExpressionFault(error)
    }
}

impl std::error::Error for SemanticError {}
