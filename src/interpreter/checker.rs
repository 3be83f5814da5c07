use crate::{
    ast::{
        Binding, BindingKind, Definition, ExprNode, ExprState, FunctionDef, Program, ReturnValue,
    },
    error::SemanticError,
    interpreter::{evaluator::core::Context, parser::statement::GLOBAL_SCOPE},
};

/// Checks deferred to the end of the traversal.
///
/// Declaration order is irrelevant to evaluation, so a value expression may
/// reference a name defined further down and a call may precede its callee's
/// definition. References and calls are therefore recorded while walking the
/// tree and verified once every declaration is known.
#[derive(Default)]
struct Pending {
    /// `(scope, name, line)` of every free name referenced by an evaluable
    /// expression.
    references: Vec<(String, String, usize)>,
    /// `(callee, argument count, line)` of every call expression.
    calls:      Vec<(String, usize, usize)>,
}

/// Runs all semantic checks over a parsed program.
///
/// A single traversal in source order, mutating only the context (never the
/// tree): it populates each scope's declared-name set and the global
/// function-arity table, rejecting illegal redefinition on the spot. Free
/// names and call arities are verified against the completed tables at the
/// end of the traversal. The first failure aborts the whole run; success is
/// silent.
///
/// A node carrying a parse-time folding error short-circuits and surfaces
/// that error verbatim, taking precedence over all other checks for the
/// node.
pub fn check_program(program: &Program, context: &mut Context) -> Result<(), SemanticError> {
    let mut pending = Pending::default();

    for definition in &program.definitions {
        match definition {
            Definition::Binding(binding) => check_binding(binding, context, &mut pending)?,
            Definition::Function(def) => check_function(def, context, &mut pending)?,
        }
    }
    check_return(&program.ret, &mut pending)?;

    for (callee, argc, line) in &pending.calls {
        match context.arities.get(callee) {
            None => {
                return Err(SemanticError::UnknownFunction { name: callee.clone(),
                                                            line: *line, });
            },
            Some(arity) if arity != argc => {
                return Err(SemanticError::ArityMismatch { name: callee.clone(),
                                                          line: *line, });
            },
            Some(_) => {},
        }
    }

    for (scope, name, line) in &pending.references {
        if !context.is_declared(scope, name) {
            return Err(SemanticError::UndeclaredReference { name: name.clone(),
                                                            line: *line, });
        }
    }

    Ok(())
}

/// Checks one variable, constant or tuple definition.
///
/// The identifier is registered as declared in its scope; constants and
/// tuples must not already be declared there. The free names of an evaluable
/// value expression are recorded for end-of-traversal verification against
/// the binding's own scope and the global scope.
fn check_binding(binding: &Binding,
                 context: &mut Context,
                 pending: &mut Pending)
                 -> Result<(), SemanticError> {
    if let ExprState::Faulted(error) = &binding.value.state {
        return Err(error.clone().into());
    }

    match binding.kind {
        BindingKind::Constant | BindingKind::Tuple => {
            if context.scope_mut(&binding.scope)
                      .declared
                      .contains(&binding.name)
            {
                return Err(SemanticError::Redefinition { name: binding.name.clone(),
                                                         line: binding.line, });
            }
        },
        BindingKind::Variable => {},
    }

    context.scope_mut(&binding.scope)
           .declared
           .insert(binding.name.clone());

    record_expr(&binding.value, &binding.scope, pending);
    Ok(())
}

/// Checks a function definition.
///
/// Registers the function's arity in the global table, declares its name in
/// the global scope (failing if it is already declared there), declares each
/// formal parameter in the function's own scope, and then checks the locals
/// and the return expression.
fn check_function(def: &FunctionDef,
                  context: &mut Context,
                  pending: &mut Pending)
                  -> Result<(), SemanticError> {
    context.arities.insert(def.name.clone(), def.formals.len());

    if context.scope_mut(GLOBAL_SCOPE).declared.contains(&def.name) {
        return Err(SemanticError::FunctionAlreadyDeclared { name: def.name.clone(),
                                                            line: def.line, });
    }
    context.scope_mut(GLOBAL_SCOPE)
           .declared
           .insert(def.name.clone());

    let scope = context.scope_mut(&def.name);
    for formal in &def.formals {
        scope.declared.insert(formal.clone());
    }

    for local in &def.locals {
        check_binding(local, context, pending)?;
    }

    check_return(&def.ret, pending)
}

/// Checks a return expression, recording its free names against the return's
/// own scope.
fn check_return(ret: &ReturnValue, pending: &mut Pending) -> Result<(), SemanticError> {
    if let ExprState::Faulted(error) = &ret.expr.state {
        return Err(error.clone().into());
    }

    record_expr(&ret.expr, &ret.scope, pending);
    Ok(())
}

/// Records an expression's free names and embedded calls for verification
/// once the whole tree has been walked.
fn record_expr(expr: &ExprNode, scope: &str, pending: &mut Pending) {
    if let ExprState::Evaluable(eval) = &expr.state {
        for param in &eval.params {
            pending.references
                   .push((scope.to_string(), param.clone(), expr.line));
        }
    }

    let mut calls = Vec::new();
    expr.shape.every_call(&mut calls);
    for call in calls {
        pending.calls
               .push((call.callee.clone(), call.arguments.len(), call.line));
    }
}
