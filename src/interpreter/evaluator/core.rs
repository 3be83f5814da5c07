use std::collections::{HashMap, HashSet};

use crate::{
    ast::{Binding, Bindings, Definition, ExprNode, ExprState, FunctionDef, Program},
    error::RuntimeError,
    interpreter::{parser::statement::GLOBAL_SCOPE, value::Value},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Maximum number of fixpoint passes over a scope's pending set.
///
/// A scope whose pending definitions are still unresolved after this many
/// passes, or after a pass that made no progress, fails evaluation. The
/// bound keeps cyclic or permanently undefined dependency sets from looping
/// indefinitely.
pub const MAX_FIXPOINT_PASSES: usize = 5;

/// The state of one named binding environment.
///
/// Scopes are created on first reference and persist for the remainder of
/// the run; function scopes are shared by every call to that function, with
/// call-specific bindings passed as transient argument maps instead.
#[derive(Debug, Default)]
pub struct Scope {
    /// Names declared in this scope, populated by the semantic checker.
    pub declared: HashSet<String>,
    /// Names resolved to concrete values.
    pub values:   HashMap<String, Value>,
    /// Definitions whose free names are not yet all available.
    pub pending:  Vec<Binding>,
}

/// Stores the shared state of the semantic checker and the evaluator.
///
/// This struct holds all per-scope state (declarations, resolved values,
/// pending definitions), the global function table, and the frame stack that
/// delimits lookup fallback during calls. It is passed by reference through
/// both traversals; there is no process-wide state.
pub struct Context {
    /// All scopes created so far, by name.
    pub scopes:    HashMap<String, Scope>,
    /// The global function table: function name to declared arity.
    /// Populated by the semantic checker.
    pub arities:   HashMap<String, usize>,
    /// Function definitions registered during evaluation.
    pub functions: HashMap<String, FunctionDef>,
    /// The fixpoint pass bound, [`MAX_FIXPOINT_PASSES`] by default.
    pub max_passes: usize,
    /// The active evaluation frames, innermost last. Lookup falls back
    /// through them from the innermost scope outwards.
    pub frames:    Vec<String>,
}

#[allow(clippy::new_without_default)]
impl Context {
    /// Creates a new context holding only an empty global scope.
    #[must_use]
    pub fn new() -> Self {
        let mut scopes = HashMap::new();
        scopes.insert(GLOBAL_SCOPE.to_string(), Scope::default());

        Self { scopes,
               arities: HashMap::new(),
               functions: HashMap::new(),
               max_passes: MAX_FIXPOINT_PASSES,
               frames: Vec::new() }
    }

    /// The scope with the given name, created empty on first reference.
    pub fn scope_mut(&mut self, name: &str) -> &mut Scope {
        self.scopes.entry(name.to_string()).or_default()
    }

    /// Whether `name` is declared in the given scope or in the global scope.
    #[must_use]
    pub fn is_declared(&self, scope: &str, name: &str) -> bool {
        let declared_in = |scope_name: &str| {
            self.scopes
                .get(scope_name)
                .is_some_and(|scope| scope.declared.contains(name))
        };
        declared_in(scope) || declared_in(GLOBAL_SCOPE)
    }

    /// Looks a name up through the transient argument bindings, then through
    /// the active frames from the innermost scope outwards.
    pub(in crate::interpreter) fn lookup(&self,
                                         extra: Option<&Bindings>,
                                         name: &str)
                                         -> Option<Value> {
        if let Some(map) = extra
           && let Some(value) = map.get(name)
        {
            return Some(value.clone());
        }

        for scope_name in self.frames.iter().rev() {
            if let Some(scope) = self.scopes.get(scope_name)
               && let Some(value) = scope.values.get(name)
            {
                return Some(value.clone());
            }
        }

        None
    }

    /// Whether every free name of `node` can currently be satisfied: either
    /// through the applicable lookup chain, or by discharging a call to a
    /// registered function.
    fn node_ready(&self, node: &ExprNode, extra: Option<&Bindings>) -> bool {
        match &node.state {
            ExprState::Resolved(_) | ExprState::Faulted(_) => true,
            ExprState::Evaluable(eval) => eval.params.iter().all(|param| {
                self.functions.contains_key(param) || self.lookup(extra, param).is_some()
            }),
        }
    }

    /// Stores a definition's value, resolving it immediately when its free
    /// names are already available and parking it in the scope's pending set
    /// otherwise.
    pub(in crate::interpreter) fn seed_binding(&mut self, binding: &Binding) -> EvalResult<()> {
        match &binding.value.state {
            ExprState::Resolved(value) => {
                let value = value.clone();
                self.scope_mut(&binding.scope)
                    .values
                    .insert(binding.name.clone(), value);
                Ok(())
            },

            ExprState::Faulted(error) => Err(error.clone()),

            ExprState::Evaluable(_) => {
                if self.node_ready(&binding.value, None) {
                    let value = self.resolve_expr(&binding.value, None)?;
                    self.scope_mut(&binding.scope)
                        .values
                        .insert(binding.name.clone(), value);
                } else {
                    self.scope_mut(&binding.scope).pending.push(binding.clone());
                }
                Ok(())
            },
        }
    }

    /// Runs fixpoint passes over a scope's pending set.
    ///
    /// Each pass resolves every pending definition whose free names are all
    /// available, looking through `extra` first, then the active frames.
    /// Passes repeat until the set is empty, a pass makes no progress, or the
    /// pass bound is exhausted. In strict mode a nonempty leftover set is the
    /// fatal unresolved-variables failure; in lenient mode (used while
    /// discharging a callee's scope, whose remaining definitions may be
    /// covered by a later call) the leftovers simply stay pending.
    pub(in crate::interpreter) fn settle_scope(&mut self,
                                               scope_name: &str,
                                               extra: Option<&Bindings>,
                                               strict: bool)
                                               -> EvalResult<()> {
        let mut passes = 0;

        loop {
            let pending = std::mem::take(&mut self.scope_mut(scope_name).pending);
            if pending.is_empty() {
                return Ok(());
            }
            passes += 1;

            let mut kept = Vec::new();
            let mut progressed = false;
            for binding in pending {
                if self.node_ready(&binding.value, extra) {
                    let value = self.resolve_expr(&binding.value, extra)?;
                    self.scope_mut(scope_name)
                        .values
                        .insert(binding.name.clone(), value);
                    progressed = true;
                } else {
                    kept.push(binding);
                }
            }

            let finished = kept.is_empty();
            self.scope_mut(scope_name).pending = kept;

            if finished {
                return Ok(());
            }
            if !progressed || passes >= self.max_passes {
                if strict {
                    return Err(RuntimeError::UnresolvedVariables { scope:
                                                                       scope_name.to_string(), });
                }
                return Ok(());
            }
        }
    }

    /// Resolves an expression node to a concrete value.
    ///
    /// Embedded function calls are discharged first, each one binding its
    /// result under the callee's name; the remaining free names are then
    /// looked up through the transient bindings and the active frames, and
    /// the node's stored computation runs with the combined mapping.
    pub(in crate::interpreter) fn resolve_expr(&mut self,
                                               node: &ExprNode,
                                               extra: Option<&Bindings>)
                                               -> EvalResult<Value> {
        match &node.state {
            ExprState::Resolved(value) => Ok(value.clone()),
            ExprState::Faulted(error) => Err(error.clone()),
            ExprState::Evaluable(eval) => {
                let mut bindings = Bindings::new();

                let mut calls = Vec::new();
                node.shape.outer_calls(&mut calls);
                for call in calls {
                    let value = self.eval_call(call, extra)?;
                    bindings.insert(call.callee.clone(), value);
                }

                for param in &eval.params {
                    if bindings.contains_key(param) {
                        continue;
                    }
                    let value =
                        self.lookup(extra, param)
                            .ok_or_else(|| RuntimeError::UnknownVariable { name: param.clone(),
                                                                           line: node.line })?;
                    bindings.insert(param.clone(), value);
                }

                (eval.thunk)(&bindings)
            },
        }
    }

    fn eval_program(&mut self, program: &Program) -> EvalResult<Value> {
        for definition in &program.definitions {
            match definition {
                Definition::Binding(binding) => self.seed_binding(binding)?,
                Definition::Function(def) => self.register_function(def)?,
            }
        }

        self.settle_scope(GLOBAL_SCOPE, None, true)?;
        self.resolve_expr(&program.ret.expr, None)
    }
}

/// Computes the program's return value.
///
/// Pushes the program frame, seeds the global scope from every top-level
/// definition in any order, settles it to a fixed point, and resolves the
/// return expression, triggering whatever calls and remaining passes that
/// requires.
pub fn run_program(program: &Program, context: &mut Context) -> EvalResult<Value> {
    context.frames.push(GLOBAL_SCOPE.to_string());
    let result = context.eval_program(program);
    context.frames.pop();
    result
}
