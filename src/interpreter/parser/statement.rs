use std::iter::Peekable;

use crate::{
    ast::{
        Binding, BindingKind, Definition, FunctionDef, Program, ReturnSign, ReturnValue,
    },
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_constant_expression, parse_expression},
            tuple::{parse_pipe_expression, parse_tuple_expression},
            utils::{current_line, expect_dot, parse_comma_separated},
        },
    },
};

/// The scope name shared by all top-level definitions.
pub const GLOBAL_SCOPE: &str = "global";

/// Parses a complete program.
///
/// Grammar: `program := (function_definition | variable_definition)* return_value '.'`
///
/// The return expression is mandatory and must be the last production;
/// trailing tokens after its terminating `.` are an error.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Program>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut definitions = Vec::new();

    loop {
        match tokens.peek() {
            Some((Token::Define, _)) => {
                definitions.push(Definition::Function(parse_function_definition(tokens)?));
            },
            Some((Token::Equals | Token::NotEquals, _)) => break,
            Some(_) => {
                definitions.push(Definition::Binding(parse_binding(tokens, GLOBAL_SCOPE)?));
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
        }
    }

    let ret = parse_return_value(tokens, GLOBAL_SCOPE)?;
    expect_dot(tokens)?;

    if let Some((tok, line)) = tokens.peek() {
        return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                 line:  *line, });
    }

    Ok(Program { definitions, ret })
}

/// Parses one variable, constant or tuple definition into the given scope.
///
/// Grammar:
/// ```text
///     variable_definition := varIDENT   '<-' simple_expression   '.'
///                          | constIDENT '<-' constant_expression '.'
///                          | tupleIDENT '<-' tuple_expression    '.'
///                          | pipe_expression '->' tupleIDENT     '.'
/// ```
///
/// A tuple name followed by anything other than `<-` starts the pipe form,
/// as does a function name or `[`.
fn parse_binding<'a, I>(tokens: &mut Peekable<I>, scope: &str) -> ParseResult<Binding>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.peek() {
        Some((Token::VarIdent(name), line)) => {
            let (name, line) = (name.clone(), *line);
            tokens.next();
            expect_left_arrow(tokens, line)?;

            let value = parse_expression(tokens)?;
            expect_dot(tokens)?;

            Ok(Binding { kind: BindingKind::Variable,
                         name,
                         value,
                         scope: scope.to_string(),
                         line })
        },

        Some((Token::ConstIdent(name), line)) => {
            let (name, line) = (name.clone(), *line);
            tokens.next();
            expect_left_arrow(tokens, line)?;

            let value = parse_constant_expression(tokens)?;
            expect_dot(tokens)?;

            Ok(Binding { kind: BindingKind::Constant,
                         name,
                         value,
                         scope: scope.to_string(),
                         line })
        },

        Some((Token::TupleIdent(_), _)) => {
            let mut lookahead = tokens.clone();
            lookahead.next();

            if let Some((Token::LeftArrow, _)) = lookahead.peek() {
                let (name, line) = if let Some((Token::TupleIdent(name), line)) = tokens.next() {
                    (name.clone(), *line)
                } else {
                    unreachable!()
                };
                tokens.next();

                let value = parse_tuple_expression(tokens)?;
                expect_dot(tokens)?;

                return Ok(Binding { kind: BindingKind::Tuple,
                                    name,
                                    value,
                                    scope: scope.to_string(),
                                    line });
            }

            parse_pipe_binding(tokens, scope)
        },

        Some((Token::FuncIdent(_) | Token::LBracket, _)) => parse_pipe_binding(tokens, scope),

        Some((tok, line)) => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                               line:  *line, }),

        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses the pipe form of a tuple definition: the value expression first,
/// then `->` and the tuple name it is bound to.
fn parse_pipe_binding<'a, I>(tokens: &mut Peekable<I>, scope: &str) -> ParseResult<Binding>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let value = parse_pipe_expression(tokens)?;

    match tokens.next() {
        Some((Token::RightArrow, _)) => {},
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line: value.line }),
    }

    let (name, line) = match tokens.next() {
        Some((Token::TupleIdent(name), line)) => (name.clone(), *line),
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line: value.line }),
    };
    expect_dot(tokens)?;

    Ok(Binding { kind: BindingKind::Tuple,
                 name,
                 value,
                 scope: scope.to_string(),
                 line })
}

/// Parses a function definition.
///
/// Grammar:
/// ```text
///     function_definition := 'define' funcIDENT '[' formals? ']' 'begin'
///                            variable_definition* return_value '.' 'end' '.'
/// ```
///
/// Local definitions and the return expression are scoped to the function's
/// own name.
fn parse_function_definition<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<FunctionDef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = current_line(tokens);
    tokens.next();

    let name = match tokens.next() {
        Some((Token::FuncIdent(name), _)) => name.clone(),
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    };

    match tokens.next() {
        Some((Token::LBracket, _)) => {},
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    }

    let formals = if let Some((Token::RBracket, _)) = tokens.peek() {
        tokens.next();
        Vec::new()
    } else {
        parse_comma_separated(tokens, parse_formal, &Token::RBracket)?
    };

    match tokens.next() {
        Some((Token::Begin, _)) => {},
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    }

    let mut locals = Vec::new();
    loop {
        match tokens.peek() {
            Some((Token::Equals | Token::NotEquals, _)) => break,
            Some(_) => locals.push(parse_binding(tokens, &name)?),
            None => return Err(ParseError::UnexpectedEndOfInput { line }),
        }
    }

    let ret = parse_return_value(tokens, &name)?;
    expect_dot(tokens)?;

    match tokens.next() {
        Some((Token::End, _)) => {},
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    }
    expect_dot(tokens)?;

    Ok(FunctionDef { name,
                     formals,
                     locals,
                     ret,
                     line })
}

/// Parses one formal parameter name.
fn parse_formal<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::VarIdent(name), _)) => Ok(name.clone()),
        Some((tok, line)) => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                               line:  *line, }),
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses a return expression.
///
/// Grammar: `return_value := '=' simple_expression | '!=' pipe_expression`
fn parse_return_value<'a, I>(tokens: &mut Peekable<I>, scope: &str) -> ParseResult<ReturnValue>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::Equals, line)) => {
            let line = *line;
            let expr = parse_expression(tokens)?;

            Ok(ReturnValue { expr,
                             sign: ReturnSign::Strict,
                             scope: scope.to_string(),
                             line })
        },

        Some((Token::NotEquals, line)) => {
            let line = *line;
            let expr = parse_pipe_expression(tokens)?;

            Ok(ReturnValue { expr,
                             sign: ReturnSign::Pipe,
                             scope: scope.to_string(),
                             line })
        },

        Some((tok, line)) => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                               line:  *line, }),
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Consumes a `<-` token.
fn expect_left_arrow<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<()>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::LeftArrow, _)) => Ok(()),
        Some((tok, line)) => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                               line:  *line, }),
        None => Err(ParseError::UnexpectedEndOfInput { line }),
    }
}
