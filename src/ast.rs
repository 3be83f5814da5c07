use std::{collections::HashMap, fmt, rc::Rc};

use crate::{error::RuntimeError, interpreter::value::Value};

/// A mapping from free-variable names to their resolved values.
///
/// Deferred computations receive one of these when every name they depend on
/// has become available.
pub type Bindings = HashMap<String, Value>;

/// A deferred computation over a set of named dependencies.
///
/// The closure is built once by the parser and invoked with a mapping that
/// covers all of its free names.
pub type Thunk = Rc<dyn Fn(&Bindings) -> Result<Value, RuntimeError>>;

/// An expression whose value is not yet known.
///
/// Carries the ordered list of free names the expression depends on
/// (duplicates and self-references are possible) and the deferred computation
/// that produces the value once those names are bound.
#[derive(Clone)]
pub struct Evaluable {
    /// Names this computation depends on, in the order they were referenced.
    pub params: Vec<String>,
    /// The deferred computation itself.
    pub thunk:  Thunk,
}

impl Evaluable {
    /// Builds the deferred computation for a plain identifier reference:
    /// a single free name whose value is looked up in the bindings.
    #[must_use]
    pub fn reference(name: String, line: usize) -> Self {
        let key = name.clone();
        let thunk: Thunk = Rc::new(move |bindings: &Bindings| {
            bindings.get(&key)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UnknownVariable { name: key.clone(),
                                                                   line })
        });

        Self { params: vec![name],
               thunk }
    }
}

impl fmt::Debug for Evaluable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluable")
         .field("params", &self.params)
         .finish_non_exhaustive()
    }
}

/// The state of an expression node, fixed at the moment the node is built.
///
/// The transition from `Evaluable` to a concrete value is one-way and happens
/// in the evaluator's scope state, never by restructuring the tree. `Faulted`
/// records a partial-evaluation failure detected while folding constant
/// operands at parse time; every node wrapping a faulted child propagates the
/// same error, and the semantic checker surfaces it before anything else.
#[derive(Debug, Clone)]
pub enum ExprState {
    /// The value is known.
    Resolved(Value),
    /// The value is deferred behind a set of free names.
    Evaluable(Evaluable),
    /// Constant folding failed while this node was built.
    Faulted(RuntimeError),
}

/// The structural form of an expression, kept for tree rendering and for
/// locating embedded function calls. Evaluation never re-derives a node's
/// state from its shape.
#[derive(Debug, Clone)]
pub enum ExprShape {
    /// A number or string literal.
    Literal,
    /// A reference to a variable, constant or tuple by name.
    Name(String),
    /// Arithmetic negation.
    Negate(Box<ExprNode>),
    /// A binary operation over two operands.
    Binary {
        /// The operator.
        op:    BinaryOperator,
        /// Left operand.
        left:  Box<ExprNode>,
        /// Right operand.
        right: Box<ExprNode>,
    },
    /// A bracketed list of element expressions.
    List(Vec<ExprNode>),
    /// 1-indexed selection `select: i [source]`.
    Select {
        /// The index expression.
        index:  Box<ExprNode>,
        /// The sequence being indexed.
        source: Box<ExprNode>,
    },
    /// Range `[a..b]` or repeat `[a**b]` construction.
    Range {
        /// Whether this is an inclusive span or a count/value repeat.
        mode:  RangeMode,
        /// Left operand (range start, or repeat count).
        start: Box<ExprNode>,
        /// Right operand (range end, or the repeated value).
        end:   Box<ExprNode>,
    },
    /// A call to a user-defined function.
    Call(CallExpr),
    /// A pipe expression. Built by the grammar but never assigned a
    /// computation; reaching one during evaluation is an unsupported-feature
    /// failure.
    Pipe {
        /// The expression feeding the pipe.
        source: Box<ExprNode>,
        /// The operations applied by each `|` stage.
        stages: Vec<PipeOperation>,
    },
}

impl ExprShape {
    /// Collects the outermost function calls in this shape.
    ///
    /// Does not descend into a call's own arguments (those are resolved while
    /// the call itself is evaluated) nor into pipe expressions (which are
    /// never evaluated).
    pub fn outer_calls<'a>(&'a self, out: &mut Vec<&'a CallExpr>) {
        match self {
            Self::Call(call) => out.push(call),
            Self::Negate(inner) => inner.shape.outer_calls(out),
            Self::Binary { left, right, .. } => {
                left.shape.outer_calls(out);
                right.shape.outer_calls(out);
            },
            Self::List(items) => {
                for item in items {
                    item.shape.outer_calls(out);
                }
            },
            Self::Select { index, source } => {
                index.shape.outer_calls(out);
                source.shape.outer_calls(out);
            },
            Self::Range { start, end, .. } => {
                start.shape.outer_calls(out);
                end.shape.outer_calls(out);
            },
            Self::Literal | Self::Name(_) | Self::Pipe { .. } => {},
        }
    }

    /// Collects every function call in this shape, including calls nested in
    /// other calls' arguments and calls inside pipe sources. Used by the
    /// semantic checker for arity validation.
    pub fn every_call<'a>(&'a self, out: &mut Vec<&'a CallExpr>) {
        match self {
            Self::Call(call) => {
                out.push(call);
                for argument in &call.arguments {
                    argument.shape.every_call(out);
                }
            },
            Self::Negate(inner) => inner.shape.every_call(out),
            Self::Binary { left, right, .. } => {
                left.shape.every_call(out);
                right.shape.every_call(out);
            },
            Self::List(items) => {
                for item in items {
                    item.shape.every_call(out);
                }
            },
            Self::Select { index, source } => {
                index.shape.every_call(out);
                source.shape.every_call(out);
            },
            Self::Range { start, end, .. } => {
                start.shape.every_call(out);
                end.shape.every_call(out);
            },
            Self::Pipe { source, .. } => source.shape.every_call(out),
            Self::Literal | Self::Name(_) => {},
        }
    }
}

/// An expression node: its structural shape, its evaluation state, and the
/// source line it came from. Created once by the parser and never
/// restructured afterwards.
#[derive(Debug, Clone)]
pub struct ExprNode {
    /// The structural form, for rendering and call discovery.
    pub shape: ExprShape,
    /// Resolved, evaluable or faulted; final at construction time.
    pub state: ExprState,
    /// Line number in the source code.
    pub line:  usize,
}

impl ExprNode {
    /// Builds a node that already holds a concrete value.
    #[must_use]
    pub const fn resolved(shape: ExprShape, value: Value, line: usize) -> Self {
        Self { shape,
               state: ExprState::Resolved(value),
               line }
    }

    /// The free names of this node, or an empty slice when it is resolved or
    /// faulted.
    #[must_use]
    pub fn params(&self) -> &[String] {
        match &self.state {
            ExprState::Evaluable(eval) => &eval.params,
            ExprState::Resolved(_) | ExprState::Faulted(_) => &[],
        }
    }
}

/// A call to a user-defined function: the callee name and the actual argument
/// expressions, each independently resolved or evaluable.
#[derive(Debug, Clone)]
pub struct CallExpr {
    /// Name of the function being called.
    pub callee:    String,
    /// The actual argument expressions.
    pub arguments: Vec<ExprNode>,
    /// Line number in the source code.
    pub line:      usize,
}

/// Distinguishes the two bracketed sequence constructors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RangeMode {
    /// `[a..b]`: the inclusive integer sequence from a to b.
    Span,
    /// `[a**b]`: a sequence of length a with every element equal to b.
    Repeat,
}

/// One stage of a pipe expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipeOperation {
    /// `| +`
    Sum,
    /// `| *`
    Product,
    /// `| Func`
    Apply(String),
    /// `| each: Func`
    Each(String),
}

/// A binary operator usable in expressions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition, or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Tuple concatenation (`++`)
    Concat,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Concat => "++",
        };
        write!(f, "{operator}")
    }
}

/// The kind of a named binding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BindingKind {
    /// A lowercase variable; may be rebound within its scope.
    Variable,
    /// An uppercase constant; a single definition per scope.
    Constant,
    /// An angle-bracketed tuple name; a single definition per scope.
    Tuple,
}

/// A named binding of an identifier to a value expression, declared in a
/// particular scope.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Variable, constant or tuple.
    pub kind:  BindingKind,
    /// The bound identifier.
    pub name:  String,
    /// The value expression.
    pub value: ExprNode,
    /// The scope the binding is declared in.
    pub scope: String,
    /// Line number in the source code.
    pub line:  usize,
}

/// The sign a return expression was parsed with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReturnSign {
    /// `=`: a plain expression.
    Strict,
    /// `!=`: a pipe-form expression.
    Pipe,
}

/// The terminal expression of a program or function body.
#[derive(Debug, Clone)]
pub struct ReturnValue {
    /// The expression whose value is returned.
    pub expr:  ExprNode,
    /// The sign the return was parsed with.
    pub sign:  ReturnSign,
    /// The scope the return is evaluated in.
    pub scope: String,
    /// Line number in the source code.
    pub line:  usize,
}

/// A user-defined function: formal parameters, local bindings scoped to the
/// function's own name, and a return expression.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    /// The function's identifier.
    pub name:    String,
    /// The formal parameter names, in declared order.
    pub formals: Vec<String>,
    /// Local bindings, scoped to the function's name.
    pub locals:  Vec<Binding>,
    /// The function's return expression.
    pub ret:     ReturnValue,
    /// Line number in the source code.
    pub line:    usize,
}

/// A top-level definition.
#[derive(Debug, Clone)]
pub enum Definition {
    /// A variable, constant or tuple binding.
    Binding(Binding),
    /// A function definition.
    Function(FunctionDef),
}

/// A complete parsed program: its definitions (declaration order is
/// irrelevant to evaluation) and the mandatory return expression.
#[derive(Debug, Clone)]
pub struct Program {
    /// The top-level definitions, in source order.
    pub definitions: Vec<Definition>,
    /// The program's return expression.
    pub ret:         ReturnValue,
}
