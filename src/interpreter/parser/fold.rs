use std::rc::Rc;

use crate::{
    ast::{
        BinaryOperator, Bindings, Evaluable, ExprNode, ExprShape, ExprState, Thunk,
    },
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::Value},
};

/// Signature of a two-operand computation used during folding.
pub type Applier2 = fn(&Value, &Value, usize) -> EvalResult<Value>;
/// Signature of a one-operand computation used during folding.
pub type Applier1 = fn(&Value, usize) -> EvalResult<Value>;

/// A parse-time snapshot of an operand, captured into the closures of
/// composite nodes.
///
/// Resolved operands contribute their concrete value; evaluable operands
/// contribute their own stored computation, re-invoked with the same
/// argument mapping; faulted operands re-surface the recorded error.
#[derive(Clone)]
enum Operand {
    Value(Value),
    Deferred(Evaluable),
    Fault(RuntimeError),
}

impl Operand {
    fn capture(state: &ExprState) -> Self {
        match state {
            ExprState::Resolved(value) => Self::Value(value.clone()),
            ExprState::Evaluable(eval) => Self::Deferred(eval.clone()),
            ExprState::Faulted(error) => Self::Fault(error.clone()),
        }
    }

    fn eval(&self, bindings: &Bindings) -> EvalResult<Value> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Deferred(eval) => (eval.thunk)(bindings),
            Self::Fault(error) => Err(error.clone()),
        }
    }
}

/// Folds a two-operand operation.
///
/// When both operands are already resolved, the operation is computed on the
/// spot; a failure becomes a `Faulted` state carried by the node instead of
/// a value. When at least one operand is still evaluable, the result is a
/// new closure whose free-name list is the concatenation of the operands'
/// free names. A faulted operand poisons the result with the same error.
pub(in crate::interpreter::parser) fn fold2(left: &ExprNode,
                                            right: &ExprNode,
                                            line: usize,
                                            apply: Applier2)
                                            -> ExprState {
    match (&left.state, &right.state) {
        (ExprState::Faulted(error), _) | (_, ExprState::Faulted(error)) => {
            ExprState::Faulted(error.clone())
        },

        (ExprState::Resolved(a), ExprState::Resolved(b)) => match apply(a, b, line) {
            Ok(value) => ExprState::Resolved(value),
            Err(error) => ExprState::Faulted(error),
        },

        _ => {
            let mut params = left.params().to_vec();
            params.extend_from_slice(right.params());

            let first = Operand::capture(&left.state);
            let second = Operand::capture(&right.state);
            let thunk: Thunk = Rc::new(move |bindings: &Bindings| {
                let lhs = first.eval(bindings)?;
                let rhs = second.eval(bindings)?;
                apply(&lhs, &rhs, line)
            });

            ExprState::Evaluable(Evaluable { params, thunk })
        },
    }
}

/// Folds a one-operand operation; same rules as [`fold2`].
pub(in crate::interpreter::parser) fn fold1(inner: &ExprNode,
                                            line: usize,
                                            apply: Applier1)
                                            -> ExprState {
    match &inner.state {
        ExprState::Faulted(error) => ExprState::Faulted(error.clone()),

        ExprState::Resolved(value) => match apply(value, line) {
            Ok(value) => ExprState::Resolved(value),
            Err(error) => ExprState::Faulted(error),
        },

        ExprState::Evaluable(_) => {
            let params = inner.params().to_vec();
            let operand = Operand::capture(&inner.state);
            let thunk: Thunk = Rc::new(move |bindings: &Bindings| {
                apply(&operand.eval(bindings)?, line)
            });

            ExprState::Evaluable(Evaluable { params, thunk })
        },
    }
}

/// Folds a list literal.
///
/// A list of fully resolved elements becomes a resolved tuple immediately;
/// otherwise the closure evaluates each captured element in order, and only
/// the unresolved elements contribute free names.
pub(in crate::interpreter::parser) fn fold_list(elements: &[ExprNode]) -> ExprState {
    for element in elements {
        if let ExprState::Faulted(error) = &element.state {
            return ExprState::Faulted(error.clone());
        }
    }

    if elements.iter()
               .all(|element| matches!(element.state, ExprState::Resolved(_)))
    {
        let values = elements.iter()
                             .filter_map(|element| match &element.state {
                                 ExprState::Resolved(value) => Some(value.clone()),
                                 _ => None,
                             })
                             .collect::<Vec<_>>();
        return ExprState::Resolved(values.into());
    }

    let mut params = Vec::new();
    for element in elements {
        params.extend_from_slice(element.params());
    }

    let operands = elements.iter()
                           .map(|element| Operand::capture(&element.state))
                           .collect::<Vec<_>>();
    let thunk: Thunk = Rc::new(move |bindings: &Bindings| {
        let mut values = Vec::with_capacity(operands.len());
        for operand in &operands {
            values.push(operand.eval(bindings)?);
        }
        Ok(values.into())
    });

    ExprState::Evaluable(Evaluable { params, thunk })
}

/// Builds a binary-operation node, folding its state per [`fold2`].
pub(in crate::interpreter::parser) fn binary_node(op: BinaryOperator,
                                                  left: ExprNode,
                                                  right: ExprNode,
                                                  line: usize)
                                                  -> ExprNode {
    let apply: Applier2 = match op {
        BinaryOperator::Add => Value::add,
        BinaryOperator::Sub => Value::sub,
        BinaryOperator::Mul => Value::mul,
        BinaryOperator::Div => Value::div,
        BinaryOperator::Concat => Value::concat,
    };

    let state = fold2(&left, &right, line, apply);

    ExprNode { shape: ExprShape::Binary { op,
                                          left: Box::new(left),
                                          right: Box::new(right) },
               state,
               line }
}

/// Builds an identifier-reference node: a single free name resolved through
/// the bindings handed to the closure.
pub(in crate::interpreter::parser) fn reference_node(name: String, line: usize) -> ExprNode {
    ExprNode { shape: ExprShape::Name(name.clone()),
               state: ExprState::Evaluable(Evaluable::reference(name, line)),
               line }
}

/// Selection applied in grammar order: the index operand precedes the
/// sequence operand in `select: i [source]`.
pub(in crate::interpreter::parser) fn apply_select(index: &Value,
                                                   source: &Value,
                                                   line: usize)
                                                   -> EvalResult<Value> {
    source.select(index, line)
}
