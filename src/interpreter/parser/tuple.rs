use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{
        BinaryOperator, Bindings, Evaluable, ExprNode, ExprShape, ExprState, PipeOperation,
        RangeMode, Thunk,
    },
    error::{ParseError, RuntimeError},
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_constant_expression, parse_expression,
                   parse_function_call},
            fold::{Applier2, binary_node, fold2, fold_list, reference_node},
            utils::parse_comma_separated,
        },
        value::Value,
    },
};

/// Parses a tuple expression.
///
/// Grammar: `tuple_expression := tuple_atom ('++' tuple_atom)*`
///
/// Concatenation folds eagerly when both sides are already resolved.
pub fn parse_tuple_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut node = parse_tuple_atom(tokens)?;

    while let Some((Token::DoublePlus, line)) = tokens.peek() {
        let line = *line;
        tokens.next();

        let right = parse_tuple_atom(tokens)?;
        node = binary_node(BinaryOperator::Concat, node, right, line);
    }

    Ok(node)
}

/// Parses a single tuple atom.
///
/// Grammar:
/// ```text
///     tuple_atom := tupleIDENT
///                 | '[' constant_expression '**' constant_expression ']'
///                 | '[' constant_expression '..' constant_expression ']'
///                 | '[' arguments ']'
///                 | function_call
/// ```
fn parse_tuple_atom<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.peek() {
        Some((Token::TupleIdent(name), line)) => {
            let node = reference_node(name.clone(), *line);
            tokens.next();
            Ok(node)
        },

        Some((Token::FuncIdent(_), _)) => parse_function_call(tokens),

        Some((Token::LBracket, line)) => {
            let line = *line;
            tokens.next();
            parse_bracketed(tokens, line)
        },

        Some((tok, line)) => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                               line:  *line, }),

        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses the bracketed tuple constructors: a range, a repeat, or a plain
/// list literal. The opening `[` has already been consumed.
///
/// A range or repeat is recognized by a constant expression followed by `..`
/// or `**`; anything else is a comma-separated list of expressions.
fn parse_bracketed<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<ExprNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut lookahead = tokens.clone();
    let first_is_constant = matches!(lookahead.next(),
                                     Some((Token::Integer(_) | Token::ConstIdent(_), _)));
    let is_range = first_is_constant
                   && matches!(lookahead.peek(),
                               Some((Token::DoubleDot | Token::DoubleMult, _)));

    if is_range {
        let start = parse_constant_expression(tokens)?;
        let mode = match tokens.next() {
            Some((Token::DoubleDot, _)) => RangeMode::Span,
            Some((Token::DoubleMult, _)) => RangeMode::Repeat,
            Some((tok, line)) => {
                return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                         line:  *line, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line }),
        };
        let end = parse_constant_expression(tokens)?;

        match tokens.next() {
            Some((Token::RBracket, _)) => {},
            _ => return Err(ParseError::ExpectedClosingBracket { line }),
        }

        let apply: Applier2 = match mode {
            RangeMode::Span => Value::span,
            RangeMode::Repeat => Value::repeat,
        };
        let state = fold2(&start, &end, line, apply);

        return Ok(ExprNode { shape: ExprShape::Range { mode,
                                                       start: Box::new(start),
                                                       end: Box::new(end) },
                             state,
                             line });
    }

    let elements = parse_comma_separated(tokens, parse_expression, &Token::RBracket)?;
    let state = fold_list(&elements);

    Ok(ExprNode { shape: ExprShape::List(elements),
                  state,
                  line })
}

/// Parses a pipe expression.
///
/// Grammar: `pipe_expression := tuple_expression ('|' pipe_operation)*`
///
/// Pipe stages are recorded structurally but carry no computation: the
/// resulting node keeps the source's free names, and any attempt to resolve
/// it reports pipe expressions as unsupported.
pub fn parse_pipe_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprNode>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let source = parse_tuple_expression(tokens)?;

    let mut stages = Vec::new();
    let mut line = source.line;
    while let Some((Token::Pipe, pipe_line)) = tokens.peek() {
        line = *pipe_line;
        tokens.next();
        stages.push(parse_pipe_operation(tokens)?);
    }

    if stages.is_empty() {
        return Ok(source);
    }

    let state = match &source.state {
        ExprState::Faulted(error) => ExprState::Faulted(error.clone()),
        _ => {
            let params = source.params().to_vec();
            let thunk: Thunk =
                Rc::new(move |_bindings: &Bindings| Err(RuntimeError::UnsupportedPipe { line }));
            ExprState::Evaluable(Evaluable { params, thunk })
        },
    };

    Ok(ExprNode { shape: ExprShape::Pipe { source: Box::new(source),
                                           stages },
                  state,
                  line })
}

/// Parses one pipe operation.
///
/// Grammar: `pipe_operation := '*' | '+' | funcIDENT | 'each' ':' funcIDENT`
fn parse_pipe_operation<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<PipeOperation>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Plus, _)) => Ok(PipeOperation::Sum),
        Some((Token::Star, _)) => Ok(PipeOperation::Product),
        Some((Token::FuncIdent(name), _)) => Ok(PipeOperation::Apply(name.clone())),

        Some((Token::Each, line)) => {
            let line = *line;
            match tokens.next() {
                Some((Token::Colon, _)) => {},
                Some((tok, line)) => {
                    return Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                             line:  *line, });
                },
                None => return Err(ParseError::UnexpectedEndOfInput { line }),
            }
            match tokens.next() {
                Some((Token::FuncIdent(name), _)) => Ok(PipeOperation::Each(name.clone())),
                Some((tok, line)) => {
                    Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                      line:  *line, })
                },
                None => Err(ParseError::UnexpectedEndOfInput { line }),
            }
        },

        Some((tok, line)) => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                               line:  *line, }),
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}
