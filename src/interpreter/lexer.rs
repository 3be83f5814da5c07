use logos::{FilterResult, Logos};

/// Represents a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// Identifiers come in four classes distinguished purely by lexical shape:
/// lowercase-leading names are variables, all-uppercase names are constants,
/// capitalized mixed-case names are functions, and angle-bracketed lowercase
/// names are tuples. The reserved words `define`, `begin`, `end`, `each` and
/// `select` are carved out of the variable shape.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// String literal tokens, such as `"hello"`; quotes are stripped.
    #[regex(r#""[^"]*""#, parse_text)]
    Text(String),
    /// `define`
    #[token("define")]
    Define,
    /// `begin`
    #[token("begin")]
    Begin,
    /// `end`
    #[token("end")]
    End,
    /// `each`
    #[token("each")]
    Each,
    /// `select`
    #[token("select")]
    Select,
    /// Variable names such as `total`; lowercase-leading, two characters
    /// minimum.
    #[regex(r"[a-z][a-zA-Z0-9_]+", |lex| lex.slice().to_string())]
    VarIdent(String),
    /// Constant names such as `MAX`; uppercase throughout.
    #[regex(r"[A-Z]+", |lex| lex.slice().to_string())]
    ConstIdent(String),
    /// Function names such as `Double`; one leading capital.
    #[regex(r"[A-Z][a-z0-9_]+", |lex| lex.slice().to_string())]
    FuncIdent(String),
    /// Tuple names such as `<items>`; angle brackets are stripped.
    #[regex(r"<[a-z]+>", parse_tuple_ident)]
    TupleIdent(String),
    /// `<-`
    #[token("<-")]
    LeftArrow,
    /// `->`
    #[token("->")]
    RightArrow,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `|`
    #[token("|")]
    Pipe,
    /// `++`
    #[token("++")]
    DoublePlus,
    /// `**`
    #[token("**")]
    DoubleMult,
    /// `..`
    #[token("..")]
    DoubleDot,
    /// `:`
    #[token(":")]
    Colon,
    /// `=`
    #[token("=")]
    Equals,
    /// `!=`
    #[token("!=")]
    NotEquals,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,

    /// `{ Brace comments, which nest. }`
    #[token("{", lex_comment)]
    Comment,
    /// Line feeds; counted for error reporting.
    #[token("\n", newline_callback)]
    NewLine,
    /// Tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting, and whether a failure
/// was caused by an unterminated brace comment rather than an illegal
/// character.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
    /// Set when the input ended while a brace comment was still open.
    pub unterminated_comment: bool,
}

/// Parses an integer literal from the current token slice.
///
/// # Returns
/// - `Some(i64)`: The parsed integer value if successful.
/// - `None`: If the literal does not fit in an `i64`.
fn parse_integer(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Parses a string literal, stripping the surrounding quotes and counting any
/// line feeds the literal spans.
fn parse_text(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    lex.extras.line += slice.chars().filter(|&c| c == '\n').count();
    slice[1..slice.len() - 1].to_string()
}

/// Parses a tuple identifier, stripping the surrounding angle brackets.
fn parse_tuple_ident(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

/// Skips a brace comment, tracking the nesting depth.
///
/// The sub-mode is entered on the unmatched `{` that produced this callback;
/// every further `{` increments the depth and every `}` decrements it, and
/// normal lexing resumes only at depth zero. Reaching the end of the input
/// while the depth is still positive is a fatal lexing error, marked in the
/// extras so the driver can report it as an unterminated comment.
fn lex_comment(lex: &mut logos::Lexer<Token>) -> FilterResult<(), ()> {
    let mut depth = 1usize;

    for (offset, c) in lex.remainder().char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    lex.bump(offset + 1);
                    return FilterResult::Skip;
                }
            },
            '\n' => lex.extras.line += 1,
            _ => {},
        }
    }

    let consumed = lex.remainder().len();
    lex.bump(consumed);
    lex.extras.unterminated_comment = true;
    FilterResult::Error(())
}

/// Counts a line feed and skips it.
fn newline_callback(lex: &mut logos::Lexer<Token>) -> logos::Skip {
    lex.extras.line += 1;
    logos::Skip
}
