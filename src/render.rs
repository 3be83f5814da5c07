//! Human-readable rendering of a parsed program.
//!
//! The renderer is a read-only consumer of the finished tree: it never
//! influences checking or evaluation. Three output formats are supported:
//! `unicode` and `ascii` draw an indented tree, `dot` emits a Graphviz
//! digraph.

use std::str::FromStr;

use crate::ast::{
    Binding, BindingKind, Definition, ExprNode, ExprShape, ExprState, FunctionDef, PipeOperation,
    Program, RangeMode, ReturnSign, ReturnValue,
};

/// The available tree output formats.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TreeFormat {
    /// Indented tree drawn with unicode box characters.
    Unicode,
    /// Indented tree drawn with plain ASCII.
    Ascii,
    /// Graphviz `dot` digraph.
    Dot,
}

impl FromStr for TreeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unicode" => Ok(Self::Unicode),
            "ascii" => Ok(Self::Ascii),
            "dot" => Ok(Self::Dot),
            _ => Err(format!("unknown tree format '{s}' (expected unicode, ascii or dot)")),
        }
    }
}

/// Renders a parsed program in the requested format.
#[must_use]
pub fn render(program: &Program, format: TreeFormat) -> String {
    let tree = program_node(program);

    match format {
        TreeFormat::Unicode => draw_text(&tree, &BranchSet { branch: "├── ",
                                                             last:   "└── ",
                                                             pipe:   "│   ",
                                                             blank:  "    ", }),
        TreeFormat::Ascii => draw_text(&tree, &BranchSet { branch: "|-- ",
                                                           last:   "`-- ",
                                                           pipe:   "|   ",
                                                           blank:  "    ", }),
        TreeFormat::Dot => draw_dot(&tree),
    }
}

struct TreeNode {
    label:    String,
    children: Vec<TreeNode>,
}

struct BranchSet {
    branch: &'static str,
    last:   &'static str,
    pipe:   &'static str,
    blank:  &'static str,
}

fn program_node(program: &Program) -> TreeNode {
    let mut children = Vec::new();
    for definition in &program.definitions {
        children.push(match definition {
            Definition::Binding(binding) => binding_node(binding),
            Definition::Function(def) => function_node(def),
        });
    }
    children.push(return_node(&program.ret));

    TreeNode { label: "program".to_string(),
               children }
}

fn binding_node(binding: &Binding) -> TreeNode {
    let label = match binding.kind {
        BindingKind::Variable => format!("variable: {}", binding.name),
        BindingKind::Constant => format!("constant: {}", binding.name),
        BindingKind::Tuple => format!("tuple: <{}>", binding.name),
    };

    TreeNode { label,
               children: vec![expr_node(&binding.value)] }
}

fn function_node(def: &FunctionDef) -> TreeNode {
    let mut children = def.locals.iter().map(binding_node).collect::<Vec<_>>();
    children.push(return_node(&def.ret));

    TreeNode { label: format!("function: {}[{}]", def.name, def.formals.join(", ")),
               children }
}

fn return_node(ret: &ReturnValue) -> TreeNode {
    let sign = match ret.sign {
        ReturnSign::Strict => "=",
        ReturnSign::Pipe => "!=",
    };

    TreeNode { label:    format!("return {sign}"),
               children: vec![expr_node(&ret.expr)], }
}

fn expr_node(expr: &ExprNode) -> TreeNode {
    let (label, children) = match &expr.shape {
        ExprShape::Literal => (literal_label(expr), Vec::new()),
        ExprShape::Name(name) => (name.clone(), Vec::new()),
        ExprShape::Negate(inner) => ("-".to_string(), vec![expr_node(inner)]),
        ExprShape::Binary { op, left, right } => {
            (op.to_string(), vec![expr_node(left), expr_node(right)])
        },
        ExprShape::List(items) => ("list".to_string(), items.iter().map(expr_node).collect()),
        ExprShape::Select { index, source } => {
            ("select".to_string(), vec![expr_node(index), expr_node(source)])
        },
        ExprShape::Range { mode, start, end } => {
            let label = match mode {
                RangeMode::Span => "..",
                RangeMode::Repeat => "**",
            };
            (label.to_string(), vec![expr_node(start), expr_node(end)])
        },
        ExprShape::Call(call) => (format!("call: {}", call.callee),
                                  call.arguments.iter().map(expr_node).collect()),
        ExprShape::Pipe { source, stages } => {
            let mut children = vec![expr_node(source)];
            for stage in stages {
                children.push(TreeNode { label:    stage_label(stage),
                                         children: Vec::new(), });
            }
            ("pipe".to_string(), children)
        },
    };

    // Show the value of sub-expressions that folded at parse time.
    let label = match &expr.state {
        ExprState::Resolved(value) if !matches!(expr.shape, ExprShape::Literal) => {
            format!("{label} = {value}")
        },
        _ => label,
    };

    TreeNode { label, children }
}

fn literal_label(expr: &ExprNode) -> String {
    match &expr.state {
        ExprState::Resolved(crate::interpreter::value::Value::Text(text)) => {
            format!("\"{text}\"")
        },
        ExprState::Resolved(value) => value.to_string(),
        _ => "literal".to_string(),
    }
}

fn stage_label(stage: &PipeOperation) -> String {
    match stage {
        PipeOperation::Sum => "| +".to_string(),
        PipeOperation::Product => "| *".to_string(),
        PipeOperation::Apply(name) => format!("| {name}"),
        PipeOperation::Each(name) => format!("| each: {name}"),
    }
}

fn draw_text(node: &TreeNode, branches: &BranchSet) -> String {
    let mut out = String::new();
    out.push_str(&node.label);
    out.push('\n');
    draw_children(&node.children, "", branches, &mut out);
    out
}

fn draw_children(children: &[TreeNode], prefix: &str, branches: &BranchSet, out: &mut String) {
    for (index, child) in children.iter().enumerate() {
        let is_last = index + 1 == children.len();

        out.push_str(prefix);
        out.push_str(if is_last { branches.last } else { branches.branch });
        out.push_str(&child.label);
        out.push('\n');

        let extension = if is_last { branches.blank } else { branches.pipe };
        let child_prefix = format!("{prefix}{extension}");
        draw_children(&child.children, &child_prefix, branches, out);
    }
}

fn draw_dot(root: &TreeNode) -> String {
    let mut out = String::from("digraph program {\n");
    let mut counter = 0;
    dot_node(root, &mut counter, &mut out);
    out.push_str("}\n");
    out
}

fn dot_node(node: &TreeNode, counter: &mut usize, out: &mut String) -> usize {
    let id = *counter;
    *counter += 1;

    let label = node.label.replace('\\', "\\\\").replace('"', "\\\"");
    out.push_str(&format!("    n{id} [label=\"{label}\"];\n"));

    for child in &node.children {
        let child_id = dot_node(child, counter, out);
        out.push_str(&format!("    n{id} -> n{child_id};\n"));
    }

    id
}
