use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, CallExpr, Evaluable, ExprNode, ExprShape, ExprState},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            fold::{apply_select, binary_node, fold1, fold2, reference_node},
            tuple::parse_tuple_expression,
            utils::{current_line, parse_comma_separated},
        },
        value::Value,
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full arithmetic expression.
///
/// This is the entry point for expression parsing. Addition and subtraction
/// are right recursive, mirroring the grammar:
///
/// Grammar: `simple_expression := term (('+' | '-') simple_expression)?`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
///
/// # Returns
/// The parsed expression node, folded to a value wherever its operands were
/// already resolved.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let term = parse_term(tokens)?;

    match tokens.peek() {
        Some((Token::Plus, line)) => {
            let line = *line;
            tokens.next();

            let rest = parse_expression(tokens)?;
            Ok(binary_node(BinaryOperator::Add, term, rest, line))
        },
        Some((Token::Minus, line)) => {
            let line = *line;
            tokens.next();

            let rest = parse_expression(tokens)?;
            Ok(binary_node(BinaryOperator::Sub, term, rest, line))
        },
        _ => Ok(term),
    }
}

/// Parses a multiplicative term.
///
/// Grammar: `term := factor (('*' | '/') factor)*`
fn parse_term<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut node = parse_factor(tokens)?;

    loop {
        let (op, line) = match tokens.peek() {
            Some((Token::Star, line)) => (BinaryOperator::Mul, *line),
            Some((Token::Slash, line)) => (BinaryOperator::Div, *line),
            _ => break,
        };
        tokens.next();

        let right = parse_factor(tokens)?;
        node = binary_node(op, node, right, line);
    }

    Ok(node)
}

/// Parses an optionally negated atom.
///
/// Grammar: `factor := '-'? atom`
fn parse_factor<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::Minus, line)) = tokens.peek() {
        let line = *line;
        tokens.next();

        let atom = parse_atom(tokens)?;
        let state = fold1(&atom, line, Value::negate);

        return Ok(ExprNode { shape: ExprShape::Negate(Box::new(atom)),
                             state,
                             line });
    }

    parse_atom(tokens)
}

/// Parses an atomic expression.
///
/// Grammar:
/// ```text
///     atom := NUMBER | STRING | varIDENT | constIDENT
///           | function_call | '(' simple_expression ')'
///           | 'select' ':' constant_expression '[' tuple_expression ']'
/// ```
///
/// A parenthesized expression collapses to its inner node; the grouping
/// leaves no trace in the tree.
fn parse_atom<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.peek() {
        Some((Token::Integer(n), line)) => {
            let node = ExprNode::resolved(ExprShape::Literal, Value::Integer(*n), *line);
            tokens.next();
            Ok(node)
        },

        Some((Token::Text(s), line)) => {
            let node = ExprNode::resolved(ExprShape::Literal, Value::Text(s.clone()), *line);
            tokens.next();
            Ok(node)
        },

        Some((Token::VarIdent(name) | Token::ConstIdent(name), line)) => {
            let node = reference_node(name.clone(), *line);
            tokens.next();
            Ok(node)
        },

        Some((Token::FuncIdent(_), _)) => parse_function_call(tokens),

        Some((Token::LParen, line)) => {
            let line = *line;
            tokens.next();

            let inner = parse_expression(tokens)?;
            match tokens.next() {
                Some((Token::RParen, _)) => Ok(inner),
                _ => Err(ParseError::ExpectedClosingParen { line }),
            }
        },

        Some((Token::Select, _)) => parse_select(tokens),

        Some((tok, line)) => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                               line:  *line, }),

        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses a constant expression: a number literal or a constant name.
///
/// Grammar: `constant_expression := NUMBER | constIDENT`
pub(in crate::interpreter::parser) fn parse_constant_expression<'a, I>(
    tokens: &mut Peekable<I>)
    -> ParseResult<ExprNode>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Integer(n), line)) => {
            Ok(ExprNode::resolved(ExprShape::Literal, Value::Integer(*n), *line))
        },
        Some((Token::ConstIdent(name), line)) => Ok(reference_node(name.clone(), *line)),
        Some((tok, line)) => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                               line:  *line, }),
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses a 1-indexed selection.
///
/// Grammar: `'select' ':' constant_expression '[' tuple_expression ']'`
fn parse_select<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = current_line(tokens);
    tokens.next();

    match tokens.next() {
        Some((Token::Colon, _)) => {},
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    }

    let index = parse_constant_expression(tokens)?;

    match tokens.next() {
        Some((Token::LBracket, _)) => {},
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    }

    let source = parse_tuple_expression(tokens)?;

    match tokens.next() {
        Some((Token::RBracket, _)) => {},
        _ => return Err(ParseError::ExpectedClosingBracket { line }),
    }

    let state = fold2(&index, &source, line, apply_select);

    Ok(ExprNode { shape: ExprShape::Select { index:  Box::new(index),
                                             source: Box::new(source), },
                  state,
                  line })
}

/// Parses a function call.
///
/// Grammar: `function_call := funcIDENT '[' arguments? ']'`
///
/// The node's free-name list is the callee name itself followed by every
/// free name referenced by any unresolved argument; the evaluator discharges
/// the call by binding its result under the callee name before the enclosing
/// closure runs.
pub fn parse_function_call<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (callee, line) = match tokens.next() {
        Some((Token::FuncIdent(name), line)) => (name.clone(), *line),
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    };

    match tokens.next() {
        Some((Token::LBracket, _)) => {},
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    }

    let arguments = if let Some((Token::RBracket, _)) = tokens.peek() {
        tokens.next();
        Vec::new()
    } else {
        parse_comma_separated(tokens, parse_expression, &Token::RBracket)?
    };

    let fault = arguments.iter().find_map(|argument| match &argument.state {
        ExprState::Faulted(error) => Some(error.clone()),
        _ => None,
    });

    let state = if let Some(error) = fault {
        ExprState::Faulted(error)
    } else {
        let mut params = vec![callee.clone()];
        for argument in &arguments {
            params.extend_from_slice(argument.params());
        }

        let base = Evaluable::reference(callee.clone(), line);
        ExprState::Evaluable(Evaluable { params,
                                         thunk: base.thunk, })
    };

    Ok(ExprNode { shape: ExprShape::Call(CallExpr { callee,
                                                    arguments,
                                                    line }),
                  state,
                  line })
}
