//! End-to-end evaluation tests: the language's observable behavior on
//! complete programs, asserted against captured stdout and final stacks.

use num_bigint::BigInt;
use nustack::{CollectStringPrint, Interpreter, Value};
use pretty_assertions::assert_eq;

fn int(n: i64) -> Value {
    Value::Int(BigInt::from(n))
}

/// Runs a program and returns the interpreter plus everything it printed.
fn run(source: &str) -> (Interpreter, String) {
    let collect = CollectStringPrint::new();
    let mut interp = Interpreter::with_writer(Box::new(collect.clone()));
    interp
        .run(source)
        .unwrap_or_else(|failure| panic!("program failed: {failure}\nsource: {source}"));
    let output = collect.output();
    (interp, output)
}

fn output_of(source: &str) -> String {
    run(source).1
}

fn stack_of(source: &str) -> Vec<Value> {
    run(source).0.stack().values().to_vec()
}

// =============================================================================
// 1. Concrete acceptance scenarios
// =============================================================================

#[test]
fn addition_shows_three() {
    assert_eq!(output_of("1 2 + show"), "3\n");
}

#[test]
fn subtraction_and_equality() {
    assert_eq!(output_of("3 2 - 1 = show"), "#t\n");
}

#[test]
fn if_picks_the_truthy_branch() {
    assert_eq!(output_of(r#"5 0 > { "pos" } { "neg" } if show"#), "pos\n");
    assert_eq!(output_of(r#"0 5 > { "pos" } { "neg" } if show"#), "neg\n");
}

#[test]
fn map_squares_a_list() {
    assert_eq!(output_of("[ 1 2 3 ] { dup * } map show"), "[ 1 4 9 ]\n");
}

#[test]
fn while_counts_up_and_leaves_the_spent_flag() {
    assert_eq!(
        output_of("0 10 { dup 1 + } { dup 5 < } while drop show"),
        "5\n"
    );
}

#[test]
fn try_catches_a_raised_kind() {
    assert_eq!(
        output_of(r#"{ `Bad raise } [ [ `Bad { "caught" show } ] ] try"#),
        "caught\n"
    );
}

// =============================================================================
// 2. Stack word diagrams
// =============================================================================

#[test]
fn swap_diagram() {
    assert_eq!(stack_of("1 2 3 swap"), vec![int(1), int(3), int(2)]);
}

#[test]
fn dup_diagram() {
    assert_eq!(stack_of("1 2 dup"), vec![int(1), int(2), int(2)]);
}

#[test]
fn over_diagram() {
    assert_eq!(stack_of("1 2 over"), vec![int(1), int(2), int(1)]);
}

#[test]
fn rot_diagram() {
    assert_eq!(stack_of("1 2 3 rot"), vec![int(2), int(3), int(1)]);
}

#[test]
fn drop_diagram() {
    assert_eq!(stack_of("1 2 drop"), vec![int(1)]);
}

// =============================================================================
// 3. Binding
// =============================================================================

/// Property 3: def then lookup with the same symbol yields the original
/// value.
#[test]
fn define_then_lookup_round_trips() {
    assert_eq!(stack_of("42 `answer def `answer lookup"), vec![int(42)]);
    assert_eq!(stack_of("'txt' `s def `s lookup"), vec![Value::Str("txt".into())]);
}

#[test]
fn define_shadows_in_the_current_frame() {
    // calling the block shadows x in its own frame only
    assert_eq!(
        stack_of("1 `x def { 2 `x def x } call x"),
        vec![int(2), int(1)]
    );
}

#[test]
fn call_evaluates_code_and_natives() {
    assert_eq!(stack_of("{ 1 2 + } call"), vec![int(3)]);
    // `dup lookup` pushes the native word, call invokes it
    assert_eq!(stack_of("7 `dup lookup call"), vec![int(7), int(7)]);
}

// =============================================================================
// 4. Arithmetic, comparison, logic
// =============================================================================

#[test]
fn division_always_yields_float() {
    assert_eq!(output_of("6 3 / show"), "2.0\n");
    assert_eq!(output_of("7 2 % show"), "1.0\n");
}

#[test]
fn string_concatenation() {
    assert_eq!(output_of("'ab' 'cd' + show"), "abcd\n");
    assert_eq!(output_of("[ 1 ] [ 2 ] + show"), "[ 1 2 ]\n");
}

#[test]
fn comparisons_on_incompatible_tags_are_false() {
    assert_eq!(stack_of("'a' 1 <"), vec![Value::Bool(false)]);
    assert_eq!(stack_of("'a' 1 >"), vec![Value::Bool(false)]);
    assert_eq!(stack_of("'a' 'b' <"), vec![Value::Bool(true)]);
}

#[test]
fn equality_crosses_numeric_tags_only() {
    assert_eq!(stack_of("1 1.0 ="), vec![Value::Bool(true)]);
    assert_eq!(stack_of("#t 1 ="), vec![Value::Bool(false)]);
}

/// `or`/`and` push the selected operand wrapped with the `any` tag.
#[test]
fn or_result_is_any_tagged() {
    assert_eq!(output_of("#t #f or show.repr"), "any: #t\n");
    assert_eq!(output_of("#f #t or show.repr"), "any: #t\n");
    assert_eq!(output_of("1 2 and show.repr"), "any: 2\n");
    // not looks through the wrapper
    assert_eq!(stack_of("#t #f or not"), vec![Value::Bool(false)]);
}

// =============================================================================
// 5. Conversion
// =============================================================================

#[test]
fn conversions() {
    assert_eq!(stack_of("3.9 to.int"), vec![int(3)]);
    assert_eq!(stack_of("'12' to.int"), vec![int(12)]);
    assert_eq!(stack_of("3 to.float"), vec![Value::Float(3.0)]);
    assert_eq!(stack_of("0 to.bool"), vec![Value::Bool(false)]);
    assert_eq!(stack_of("2 to.string"), vec![Value::Str("2".into())]);
    assert_eq!(stack_of("'x' to.symbol"), vec![Value::Symbol("x".into())]);
}

// =============================================================================
// 6. Control flow and iteration
// =============================================================================

#[test]
fn cond_runs_first_matching_branch() {
    let source = "2 `x def \
                  [ [ { x 1 = } { 'one' } ] [ { x 2 = } { 'two' } ] ] cond";
    assert_eq!(stack_of(source), vec![Value::Str("two".into())]);
}

#[test]
fn cond_without_a_match_falls_through_silently() {
    assert_eq!(stack_of("[ [ { #f } { 'never' } ] ] cond"), vec![]);
}

#[test]
fn repeat_n_runs_the_block_n_times() {
    assert_eq!(stack_of("0 { 1 + } 3 repeat.n"), vec![int(3)]);
}

#[test]
fn for_each_pushes_every_item() {
    assert_eq!(stack_of("0 [ 1 2 3 ] { + } for.each"), vec![int(6)]);
}

#[test]
fn filter_keeps_matching_items() {
    assert_eq!(
        output_of("[ 1 2 3 4 ] { 2 % 0 = } filter show"),
        "[ 2 4 ]\n"
    );
}

#[test]
fn reduce_folds_left() {
    assert_eq!(stack_of("[ 1 2 3 4 ] 0 { + } reduce"), vec![int(10)]);
}

#[test]
fn map_over_a_string_wraps_characters_as_any() {
    assert_eq!(output_of("'ab' { } map show"), "[ 'a' 'b' ]\n");
}

#[test]
fn do_while_runs_the_body_at_least_once() {
    assert_eq!(
        stack_of("0 { dup 1 + } { dup 3 < } do.while"),
        vec![int(0), int(1), int(2), int(3), Value::Bool(false)]
    );
}

#[test]
fn forever_stops_on_break() {
    assert_eq!(
        stack_of("0 { 1 + dup 3 = { break } { } if } forever"),
        vec![int(3)]
    );
}

/// The break flag stops the innermost loop only: an inner loop's break is
/// cleared by that loop and never observed by the outer one.
#[test]
fn break_stops_innermost_loop_only() {
    assert_eq!(
        stack_of("0 { { break } forever 1 + } 2 repeat.n"),
        vec![int(2)]
    );
}

// =============================================================================
// 7. Output words
// =============================================================================

#[test]
fn peek_shows_without_popping() {
    let (interp, output) = run("5 peek");
    assert_eq!(output, "5\n");
    assert_eq!(interp.stack().values(), &[int(5)]);
}

#[test]
fn show_repr_includes_the_tag() {
    assert_eq!(output_of("1.5 show.repr"), "float: 1.5\n");
    assert_eq!(output_of("`sym show.repr"), "symbol: `sym\n");
    let (interp, output) = run("'s' peek.repr");
    assert_eq!(output, "string: s\n");
    assert_eq!(interp.stack().values(), &[Value::Str("s".into())]);
}

#[test]
fn show_renders_every_display_form() {
    assert_eq!(output_of("#f show"), "#f\n");
    assert_eq!(output_of("b'xy' show"), "b\"xy\"\n");
    assert_eq!(output_of("{ 1 2 + } show"), "{ 1 2 + }\n");
    assert_eq!(output_of("[ 'a' `b [ 1 ] ] show"), "[ 'a' `b [ 1 ] ]\n");
}

// =============================================================================
// 8. argv
// =============================================================================

#[test]
fn argv_defaults_to_the_interactive_marker() {
    let (interp, _) = run("argv");
    assert_eq!(
        interp.stack().values(),
        &[Value::List(vec![Value::Str("<<INTERACTIVE>>".into())])]
    );
}

#[test]
fn argv_reflects_the_host_provided_arguments() {
    let mut interp = Interpreter::with_writer(Box::new(nustack::NoPrint));
    interp.set_argv(vec!["script.nu".into(), "--flag".into()]);
    interp.run("argv").unwrap();
    assert_eq!(
        interp.stack().values(),
        &[Value::List(vec![
            Value::Str("script.nu".into()),
            Value::Str("--flag".into()),
        ])]
    );
}
