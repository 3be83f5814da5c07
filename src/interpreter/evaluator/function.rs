use crate::{
    ast::{Bindings, CallExpr, FunctionDef},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::Value,
    },
};

impl Context {
    /// Registers a function definition and seeds its scope.
    ///
    /// The definition is stored in the function table, and each local is
    /// evaluated into the function's own scope: locals that depend only on
    /// already-available names resolve immediately, the rest stay pending
    /// until a call provides their arguments.
    pub(in crate::interpreter) fn register_function(&mut self,
                                                    def: &FunctionDef)
                                                    -> EvalResult<()> {
        self.functions.insert(def.name.clone(), def.clone());
        self.scope_mut(&def.name);

        self.frames.push(def.name.clone());
        let result = def.locals
                        .iter()
                        .try_for_each(|local| self.seed_binding(local));
        self.frames.pop();
        result
    }

    /// Evaluates a call to a registered function.
    ///
    /// Every actual argument is resolved in the caller's scope and keyed by
    /// the matching formal parameter name. The resulting argument map is then
    /// used to discharge the callee scope's pending definitions (results are
    /// stored in the callee scope's persistent value map), and finally the
    /// callee's return expression is resolved with lookup priority: argument
    /// map, then callee scope, then caller scope, then global.
    pub(in crate::interpreter) fn eval_call(&mut self,
                                            call: &CallExpr,
                                            extra: Option<&Bindings>)
                                            -> EvalResult<Value> {
        let def = self.functions
                      .get(&call.callee)
                      .cloned()
                      .ok_or_else(|| RuntimeError::UnknownFunction { name: call.callee.clone(),
                                                                     line: call.line })?;

        let mut arguments = Bindings::new();
        for (formal, actual) in def.formals.iter().zip(call.arguments.iter()) {
            let value = self.resolve_expr(actual, extra)?;
            arguments.insert(formal.clone(), value);
        }

        self.frames.push(def.name.clone());
        let result = self.settle_scope(&def.name, Some(&arguments), false)
                         .and_then(|()| self.resolve_expr(&def.ret.expr, Some(&arguments)));
        self.frames.pop();

        result
    }
}
