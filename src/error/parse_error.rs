#[derive(Debug)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// A character no token or comment rule matches.
    IllegalCharacter {
        /// The offending slice of source text.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// The input ended while still inside a brace comment.
    UnterminatedComment {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// The token encountered.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Reached the end of input unexpectedly.
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A terminating `.` was expected but not found.
    ExpectedDot {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A closing bracket `]` was expected but not found.
    ExpectedClosingBracket {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A closing parenthesis `)` was expected but not found.
    ExpectedClosingParen {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IllegalCharacter { token, line } => {
                write!(f, "Error on line {line}: Illegal character '{token}'.")
            },

            Self::UnterminatedComment { line } => write!(f,
                                                         "Error on line {line}: Unexpected end of input inside a comment. Check the count of brackets."),

            Self::UnexpectedToken { token, line } => {
                write!(f, "Error on line {line}: Unexpected token: {token}.")
            },

            Self::UnexpectedEndOfInput { line } => {
                write!(f, "Error on line {line}: Unexpected end of input.")
            },

            Self::ExpectedDot { line } => {
                write!(f, "Error on line {line}: Expected '.' but none found.")
            },

            Self::ExpectedClosingBracket { line } => write!(f,
                                                            "Error on line {line}: Expected closing bracket ']' but none found."),

            Self::ExpectedClosingParen { line } => write!(f,
                                                          "Error on line {line}: Expected closing parenthesis ')' but none found."),
        }
    }
}

impl std::error::Error for ParseError {}
