//! End-to-end tests: pattern text in, states out

use knit::knit::ast::{Expr, SizeValue, Stmt, Unit};
use knit::knit::engine::{expand, Repeat, State};
use knit::knit::parser::parse_str;
use knit::knit::processor::{self, InputForm, ProcessingError};
use knit::knit::semantics::{flatten, resolve, FlattenError, Line};
use rstest::rstest;
use std::path::PathBuf;

fn compile(text: &str) -> Vec<State> {
    let block = parse_str(text).unwrap();
    processor::compile_block(&block).unwrap().states().to_vec()
}

fn rows(states: &[State]) -> Vec<String> {
    states.iter().map(|state| state.history_row.clone()).collect()
}

fn group_counters(states: &[State]) -> Vec<usize> {
    states
        .iter()
        .map(|state| state.group_repeat.map_or(0, |r| r.current))
        .collect()
}

fn samples(names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| PathBuf::from("samples").join(name))
        .collect()
}

#[test]
fn macro_used_twice_in_a_row() {
    let block = parse_str("a = k\nrow a a\n").unwrap();
    assert!(matches!(block.statements[0], Stmt::Assign(_)));
    assert!(matches!(block.statements[1], Stmt::Row(_)));

    let tables = resolve(&block);
    let lines = flatten(&block, &tables).unwrap();
    let contents: Vec<_> = lines
        .iter()
        .filter_map(|line| match line {
            Line::Content(content) => Some(content.row.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(contents, vec![vec!["k".to_string(), "k".to_string()]]);

    let states = expand(&lines).unwrap();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].row, vec!["k", "k"]);
    assert_eq!(states[0].group_repeat, None);
    assert_eq!(states[0].row_repeat, None);
}

#[test]
fn repeated_group_of_two_rows() {
    let block = parse_str("{\n  row a\n  row b\n}(3)").unwrap();
    let Stmt::Group(group) = &block.statements[0] else {
        panic!("expected a group, got {:?}", block.statements[0]);
    };
    assert_eq!(group.group.lines.len(), 2);
    assert!(matches!(
        &group.group.args.args[..],
        [Expr::Size(size)] if size.value == SizeValue::Int(3)
    ));

    let states = compile("{\n  row a\n  row b\n}(3)");
    assert_eq!(rows(&states), vec!["a", "b", "a", "b", "a", "b"]);
    assert_eq!(group_counters(&states), vec![1, 1, 2, 2, 3, 3]);
}

#[rstest]
#[case("k(12mm)\n", SizeValue::Int(12), Unit::Millimeters, false, "k 12mm")]
#[case("k(-*)\n", SizeValue::None, Unit::Asterisk, true, "k before end of row")]
#[case("k(*)\n", SizeValue::None, Unit::Asterisk, false, "k to end of row")]
#[case("k(2.5\")\n", SizeValue::Float(2.5), Unit::Inches, false, "k 2.50\"")]
fn sizes_parse_and_render(
    #[case] text: &str,
    #[case] value: SizeValue,
    #[case] unit: Unit,
    #[case] before: bool,
    #[case] rendered: &str,
) {
    let block = parse_str(text).unwrap();
    let Stmt::Row(row) = &block.statements[0] else {
        panic!("expected a row");
    };
    let Expr::Stitch(stitch) = &row.row.stitches[0] else {
        panic!("expected a stitch");
    };
    let Expr::Size(size) = &stitch.args.args[0] else {
        panic!("expected a size");
    };
    assert_eq!(size.value, value);
    assert_eq!(size.unit, unit);
    assert_eq!(size.before, before);

    assert_eq!(rows(&compile(text)), vec![rendered]);
}

#[test]
fn aliases_rename_stitches_one_hop() {
    let states = compile("yo := yarn-over\nyof := yo\nk yo yof\n");
    assert_eq!(rows(&states), vec!["k, yarn-over, yo"]);
}

#[test]
fn nested_inline_rows() {
    let states = compile("k { p { yo k }(2) }(3) k\n");
    assert_eq!(
        states[0].row,
        vec!["k", "{", "p", "{", "yo", "k", "} 2", "} 3", "k"]
    );
    assert_eq!(states[0].history_row, "k, { p, { yo, k } 2 } 3, k");
}

#[test]
fn phrase_cursor_never_starts_on_a_brace() {
    let states = compile("{ p } k\n");
    assert_eq!(states[0].row, vec!["{", "p", "}", "k"]);
    assert_eq!(states[0].counters.phrase, 1);
}

#[test]
fn braced_row_on_its_own_line_repeats() {
    let states = compile("{ k p }(3)\n");
    assert_eq!(states.len(), 3);
    let counters: Vec<_> = states.iter().map(|state| state.row_repeat).collect();
    assert_eq!(
        counters,
        vec![
            Some(Repeat { current: 1, max: 3 }),
            Some(Repeat { current: 2, max: 3 }),
            Some(Repeat { current: 3, max: 3 }),
        ]
    );
}

#[test]
fn braced_row_macro_repeats_like_the_braced_row() {
    let inline = compile("{ k p }(2)\n");
    let named = compile("rib = { k p }(2)\nrib\n");
    assert_eq!(named, inline);
    assert_eq!(named[1].row_repeat, Some(Repeat { current: 2, max: 2 }));

    let states = compile("rib = { k p }(2)\nk rib\n");
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].history_row, "k, { k, p } 2");
    assert!(states[0].args.is_empty());
}

#[test]
fn nested_groups_count_their_own_iterations() {
    let states = compile("{\n  cast\n  {\n    k\n  }(2)\n}(2)\n");
    let summary: Vec<_> = states
        .iter()
        .map(|state| format!("{} {}", state.history_row, state.group_repeat.unwrap()))
        .collect();
    assert_eq!(
        summary,
        vec!["cast 1/2", "k 1/2", "k 2/2", "cast 2/2", "k 1/2", "k 2/2"]
    );
}

#[test]
fn group_macro_splits_the_row() {
    let states = compile("twice = {\n  p\n}(2)\nk twice yo\n");
    assert_eq!(rows(&states), vec!["k", "p", "p", "yo"]);
}

#[test]
fn descriptions_reach_the_states() {
    let states = compile("; Scarf\n\n; Cast on\n{\n  ; Garter\n  k\n}(2)\n");
    assert_eq!(states[0].desc.block.trim(), "Scarf");
    assert_eq!(states[0].desc.group.trim_end(), "Cast on");
    assert_eq!(states[0].desc.row.trim_end(), "Garter");
}

#[test]
fn macros_expand_plain_stitches_and_reject_recursion() {
    let block = parse_str("a = b\nrow a\n").unwrap();
    let tables = resolve(&block);
    // A stitch without an assignment is just a stitch
    assert!(flatten(&block, &tables).is_ok());

    let block = parse_str("a = a\na\n").unwrap();
    let err = flatten(&block, &resolve(&block)).unwrap_err();
    assert!(matches!(err, FlattenError::RecursiveMacro { ref name, .. } if name == "a"));
}

#[test]
fn group_macro_inside_inline_row_fails() {
    let block = parse_str("g = {\n  k\n}\nk { g }(2)\n").unwrap();
    let err = flatten(&block, &resolve(&block)).unwrap_err();
    assert!(matches!(err, FlattenError::GroupInInlineRow { .. }));
}

#[test]
fn hat_sample_compiles() {
    let engine = processor::build_engine(InputForm::Knit, &samples(&["hat.knit"])).unwrap();
    let states = engine.states();
    assert_eq!(states.len(), 24);

    assert!(states[0].desc.block.contains("Ribbed hat"));
    assert_eq!(states[0].desc.group.trim_end(), "Brim");
    assert_eq!(states[0].history_row, "k 2, p 2, k 2, p 2, k 2, p 2");
    assert_eq!(states[0].args, vec!["to end of row"]);
    assert_eq!(states[1].history_row, "p 2, k 2, p before end of row");
    assert_eq!(group_counters(&states[..12]), vec![1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6]);

    assert_eq!(states[12].desc.group.trim_end(), "Body");
    assert_eq!(states[12].history_row, "k to end of row");
    assert_eq!(
        states[13].history_row,
        "k 4, { yarn-over, slip-slip-knit } 3, k until 4cm"
    );

    let crown = &states[16..];
    assert!(crown.iter().all(|state| state.history_row == "k 2, slip-slip-knit"));
    assert_eq!(crown[0].args, vec!["8"]);
    assert_eq!(crown[7].row_repeat, Some(Repeat { current: 8, max: 8 }));
    assert_eq!(crown[0].group_repeat, None);
}

#[test]
fn sources_are_compiled_in_order() {
    let inputs = samples(&["stitches.knit", "scarf.knit"]);
    let engine = processor::build_engine(InputForm::Knit, &inputs).unwrap();
    let rows = rows(engine.states());
    assert_eq!(rows.len(), 13);
    assert_eq!(rows[0], "cast-on 40");
    assert_eq!(&rows[1..5], &["k 1, p 1, k 1, p 1", "p 1, k 1", "k 1, p 1, k 1, p 1", "p 1, k 1"]);
    assert_eq!(rows[5], "k 3, k 1, p 1, k 3");
    assert_eq!(rows[12], "p 1, k 1");
}

#[test]
fn definition_order_does_not_matter() {
    // Macros are collected over the whole tree, so definition order does not matter.
    let inputs = samples(&["scarf.knit", "stitches.knit"]);
    let engine = processor::build_engine(InputForm::Knit, &inputs).unwrap();
    assert_eq!(engine.len(), 13);
}

#[test]
fn missing_source_is_reported() {
    let err = processor::build_engine(InputForm::Knit, &samples(&["missing.knit"])).unwrap_err();
    assert!(matches!(err, ProcessingError::Lex(_)));
}
