use std::fs;

use tupla::{get_result, interpreter::value::Value};
use walkdir::WalkDir;

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, code) in extract_dsl_blocks(&content).into_iter().enumerate() {
            count += 1;
            if let Err(e) = get_result(&code, None) {
                panic!("Example {} in {:?} failed:\n{}\nError: {:?}",
                       i + 1,
                       path,
                       code,
                       e);
            }
        }
    }

    assert!(count > 0, "No examples found in book/src");
}

fn extract_dsl_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```tupla") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

fn eval(src: &str) -> Value {
    get_result(src, None).unwrap_or_else(|e| panic!("Script failed: {e}\nSource:\n{src}"))
}

fn assert_failure(src: &str) {
    if get_result(src, None).is_ok() {
        panic!("Script succeeded but was expected to fail:\n{src}")
    }
}

fn tuple(values: &[i64]) -> Value {
    values.iter()
          .copied()
          .map(Value::Integer)
          .collect::<Vec<_>>()
          .into()
}

#[test]
fn literals_and_arithmetic() {
    assert_eq!(eval("= 42."), Value::Integer(42));
    assert_eq!(eval("= 2 + 3 * 4."), Value::Integer(14));
    assert_eq!(eval("= (2 + 3) * 4."), Value::Integer(20));
    assert_eq!(eval("= 7 / 2."), Value::Integer(3));
    assert_eq!(eval("= -5 + 2."), Value::Integer(-3));
}

#[test]
fn subtraction_groups_to_the_right() {
    // simple_expression is right recursive: 10 - (2 - 3)
    assert_eq!(eval("= 10 - 2 - 3."), Value::Integer(11));
}

#[test]
fn string_values() {
    assert_eq!(eval("msg <- \"hello\" + \" world\".\n= msg."),
               Value::from("hello world"));
    assert_eq!(eval("= \"a\" + \"b\" + \"c\"."), Value::from("abc"));
}

#[test]
fn definitions_resolve_out_of_order() {
    assert_eq!(eval("aa <- bb + 1.\nbb <- 5.\n= aa."), Value::Integer(6));
    assert_eq!(eval("dd <- cc + 1.\ncc <- bb + 1.\nbb <- aa + 1.\naa <- 1.\n= dd."),
               Value::Integer(4));
}

#[test]
fn variables_rebind_constants_and_tuples_do_not() {
    assert_eq!(eval("aa <- 1.\naa <- 2.\n= aa."), Value::Integer(2));
    assert_failure("AA <- 1.\nAA <- 2.\n= 0.");
    assert_failure("<t> <- [1, 2].\n<t> <- [3, 4].\n= 0.");
}

#[test]
fn undeclared_references_fail() {
    assert_failure("aa <- zz + 1.\n= aa.");
    assert_failure("= zz.");
}

#[test]
fn circular_dependencies_fail_after_bounded_retries() {
    assert_failure("aa <- bb.\nbb <- aa.\n= aa.");
    assert_failure("aa <- aa + 1.\n= aa.");
}

#[test]
fn ranges_and_repeats() {
    assert_eq!(eval("<xs> <- [3..7].\n!= <xs>."), tuple(&[3, 4, 5, 6, 7]));
    assert_eq!(eval("<xs> <- [4**9].\n!= <xs>."), tuple(&[9, 9, 9, 9]));
    assert_eq!(eval("<xs> <- [5..3].\n!= <xs>."), tuple(&[]));
}

#[test]
fn range_bounds_from_constants() {
    assert_eq!(eval("LO <- 2.\nHI <- 4.\n<xs> <- [LO..HI].\n= select: 2 [<xs>]."),
               Value::Integer(3));
}

#[test]
fn select_is_one_indexed() {
    assert_eq!(eval("= select: 2 [[10, 20, 30]]."), Value::Integer(20));
    assert_eq!(eval("= select: 1 [[10, 20, 30]]."), Value::Integer(10));
    assert_failure("= select: 0 [[10, 20, 30]].");
    assert_failure("= select: 4 [[10, 20, 30]].");
    assert_failure("<t> <- [1, 2].\n= select: 5 [<t>].");
}

#[test]
fn tuple_concatenation() {
    assert_eq!(eval("<xs> <- [1, 2] ++ [3, 4].\n!= <xs>."), tuple(&[1, 2, 3, 4]));
    assert_eq!(eval("<xs> <- [1..2] ++ [2**5].\n!= <xs>."), tuple(&[1, 2, 5, 5]));
    assert_eq!(eval("<base> <- [1, 2].\n<xs> <- <base> ++ [3**1].\n!= <xs>."),
               tuple(&[1, 2, 1, 1, 1]));
}

#[test]
fn folding_errors_surface_at_check_time() {
    assert_failure("= 1 / 0.");
    // an ancestor wrapping the faulted operand surfaces the same error
    assert_failure("= (1 / 0) + 5.");
    assert_failure("aa <- 2 + \"two\".\n= aa.");
}

#[test]
fn user_defined_functions_and_calls() {
    assert_eq!(eval("define Double [xx] begin = xx * 2. end.\n= Double[5]."),
               Value::Integer(10));
    assert_eq!(eval("define Grow [ww, hh] begin pp <- ww + 1. = pp * hh. end.\n= Grow[2, 5]."),
               Value::Integer(15));
    assert_eq!(eval("define Answer [] begin = 42. end.\n= Answer[]."),
               Value::Integer(42));
}

#[test]
fn functions_fall_back_to_global_scope() {
    assert_eq!(eval("BB <- 7.\ndefine Addb [xx] begin = xx + BB. end.\n= Addb[3]."),
               Value::Integer(10));
}

#[test]
fn calls_inside_definitions() {
    assert_eq!(eval("define Twice [xx] begin = xx + xx. end.\naa <- Twice[4].\n= aa + 1."),
               Value::Integer(9));
    assert_eq!(eval("aa <- Late[2].\ndefine Late [xx] begin = xx * 3. end.\n= aa."),
               Value::Integer(6));
}

#[test]
fn nested_calls() {
    assert_eq!(eval("define Inc [xx] begin = xx + 1. end.\n= Inc[Inc[5]]."),
               Value::Integer(7));
    assert_eq!(eval("define Inc [xx] begin = xx + 1. end.\ndefine Twoup [xx] begin = Inc[Inc[xx]]. end.\n= Twoup[3]."),
               Value::Integer(5));
}

#[test]
fn wrong_function_arity_fails_regardless_of_call_order() {
    assert_failure("define Double [xx] begin = xx * 2. end.\n= Double[1, 2].");
    assert_failure("aa <- Double[1, 2].\ndefine Double [xx] begin = xx * 2. end.\n= aa.");
}

#[test]
fn unknown_and_redeclared_functions_fail() {
    assert_failure("= Missing[1].");
    assert_failure("define Same [xx] begin = xx. end.\ndefine Same [yy] begin = yy. end.\n= 1.");
}

#[test]
fn comments_nest() {
    assert_eq!(eval("{ comment } = 1."), Value::Integer(1));
    assert_eq!(eval("{ outer { inner } outer again } = 2."), Value::Integer(2));
    assert_eq!(eval("{ spans\nlines { and } nests }\naa <- 3.\n= aa."),
               Value::Integer(3));
    assert_failure("{ never closed = 1.");
}

#[test]
fn illegal_characters_fail() {
    assert_failure("= 1 ; 2.");
    // single lowercase letters match no identifier class
    assert_failure("a <- 1.\n= 1.");
}

#[test]
fn pipes_parse_but_do_not_evaluate() {
    assert_eq!(eval("<t> <- [1, 2].\n!= <t>."), tuple(&[1, 2]));
    assert_failure("<xs> <- [1, 2].\n<xs> | + -> <ys>.\n!= <ys>.");
    assert_failure("!= [1, 2] | each: Inc.");
}

#[test]
fn program_structure_errors() {
    assert_failure("aa <- 1.");
    assert_failure("= 1. = 2.");
    assert_failure("aa <- 1\n= aa.");
    // constants only take constant expressions
    assert_failure("AA <- 1 + 2.\n= AA.");
}

#[test]
fn tree_rendering_formats() {
    use logos::Logos;
    use tupla::{
        interpreter::{
            lexer::{LexerExtras, Token},
            parser::statement::parse_program,
        },
        render::{TreeFormat, render},
    };

    let source = "aa <- 1.\n= aa + 1.";
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source,
                                             LexerExtras { line: 1,
                                                           unterminated_comment: false });
    while let Some(token) = lexer.next() {
        tokens.push((token.expect("lexing failed"), lexer.extras.line));
    }

    let mut iter = tokens.iter().peekable();
    let program = parse_program(&mut iter).expect("parsing failed");

    let unicode = render(&program, TreeFormat::Unicode);
    assert!(unicode.contains("program"));
    assert!(unicode.contains("variable: aa"));

    let ascii = render(&program, TreeFormat::Ascii);
    assert!(ascii.contains("return ="));

    let dot = render(&program, TreeFormat::Dot);
    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("->"));
}

#[test]
fn example_script_works() {
    let script = fs::read_to_string("tests/example.tupl").expect("missing file");
    assert_eq!(eval(&script), Value::Integer(20));
}
