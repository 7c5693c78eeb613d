//! Error-path and corner-case tests for the full pipeline.

use rillc_drv::{compile, CompileError, Stage};

#[test]
fn test_edge_empty_source() {
    // An empty program is a valid, empty module
    let ir = compile("").unwrap();
    assert!(ir.contains("target triple = \"x86_64-pc-linux-gnu\""));
    assert!(!ir.contains("define"));
}

#[test]
fn test_edge_lex_error_aborts() {
    let err = compile("func f() { let x = 1 $ 2; }").unwrap_err();
    assert_eq!(err.stage(), Stage::Lex);
}

#[test]
fn test_edge_lone_pipe_is_lexical() {
    let err = compile("func f(a, b) { return a | b; }").unwrap_err();
    assert_eq!(err.stage(), Stage::Lex);
}

#[test]
fn test_edge_lone_ampersand_is_lexical() {
    let err = compile("func f(a, b) { return a & b; }").unwrap_err();
    assert_eq!(err.stage(), Stage::Lex);
}

#[test]
fn test_edge_missing_brace_is_syntax() {
    let err = compile("func f() { return 1;").unwrap_err();
    assert_eq!(err.stage(), Stage::Parse);
}

#[test]
fn test_edge_duplicate_function_is_semantic() {
    let err = compile("func f() {} func f() {}").unwrap_err();
    assert_eq!(err.stage(), Stage::Semantic);
}

#[test]
fn test_edge_duplicate_param_is_semantic() {
    let err = compile("func f(a, a) { return a; }").unwrap_err();
    assert_eq!(err.stage(), Stage::Semantic);
}

#[test]
fn test_edge_top_level_let_rejected() {
    let err = compile("let g = 1; func main() { return 0; }").unwrap_err();
    assert_eq!(err.stage(), Stage::Semantic);
    assert!(err.to_string().contains("global"));
}

#[test]
fn test_edge_lambda_stored_in_variable_rejected() {
    // Function values do not exist; the hoisted name cannot be stored
    let err = compile("func main() { let g = (x) => x; return 0; }").unwrap_err();
    assert_eq!(err.stage(), Stage::Semantic);
    assert!(matches!(
        err,
        CompileError::Semantic(rillc_sem::SemanticError::FunctionAsValue { .. })
    ));
}

#[test]
fn test_edge_pipe_into_binary_rejected() {
    let err = compile("func f(x, y) { x |> (y + 1); }").unwrap_err();
    assert_eq!(err.stage(), Stage::Desugar);
}

#[test]
fn test_edge_repeat_zero_still_compiles() {
    let ir = compile("extern func tick(); func main() { repeat (0) { tick(); } }").unwrap();
    assert!(ir.contains("while_cond:"));
}

#[test]
fn test_edge_return_inside_loop_terminates_block_once() {
    let ir = compile("func f(x) { while (1) { return x; } return 0; }").unwrap();
    // The loop body returns; no back-edge branch may follow it
    let body_section = ir
        .split("while_body:")
        .nth(1)
        .unwrap()
        .split("while_after:")
        .next()
        .unwrap();
    assert!(body_section.contains("ret i64"));
    assert!(!body_section.contains("br label %\"while_cond\""));
}

#[test]
fn test_edge_dead_code_after_return_not_emitted() {
    let ir = compile("func f() { return 1; return 2; }").unwrap();
    assert!(ir.contains("ret i64 1"));
    assert!(!ir.contains("ret i64 2"));
}

#[test]
fn test_edge_shadowing_rebinds_slot() {
    // Redeclaration allocates a fresh slot with a suffixed name
    let ir = compile("func f() { let x = 1; let x = 2; return x; }").unwrap();
    assert!(ir.contains("%\"x\" = alloca i64"));
    assert!(ir.contains("%\"x.1\" = alloca i64"));
    // The load reads the newer slot
    assert!(ir.contains("load i64, i64* %\"x.1\""));
}

#[test]
fn test_edge_repeat_count_reevaluated_each_iteration() {
    // The count expression is a call; it lands in the loop condition and
    // is emitted inside while_cond, not hoisted into entry
    let ir = compile(
        "func limit() { return 3; } func main() { repeat (limit()) {} return 0; }",
    )
    .unwrap();
    let cond_section = ir
        .split("while_cond:")
        .nth(1)
        .unwrap()
        .split("while_body:")
        .next()
        .unwrap();
    assert!(cond_section.contains("call i64 @\"limit\"()"));
}

#[test]
fn test_edge_deeply_nested_expression() {
    let mut expr = String::from("1");
    for _ in 0..200 {
        expr = format!("({} + 1)", expr);
    }
    let ir = compile(&format!("func f() {{ return {}; }}", expr)).unwrap();
    assert!(ir.contains("ret i64 201"));
}
