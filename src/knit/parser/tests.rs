use super::*;
use crate::knit::ast::{Expr, Row, Size, SizeValue, Stmt, Unit, Verbatim};
use crate::knit::lexer::{Position, Source};
use rstest::rstest;

fn desc(stmt: &Stmt) -> Vec<String> {
    match stmt {
        Stmt::Alias(stmt) => stmt.desc.lines(),
        Stmt::Assign(stmt) => stmt.desc.lines(),
        Stmt::Row(stmt) => stmt.desc.lines(),
        Stmt::Group(stmt) => stmt.desc.lines(),
        Stmt::Block(block) => block.desc.lines(),
    }
}

fn parse(text: &str) -> Block {
    parse_str(text).unwrap_or_else(|err| panic!("failed to parse {:?}: {}", text, err))
}

fn only_row(block: &Block) -> &Row {
    match block.statements.as_slice() {
        [Stmt::Row(stmt)] => &stmt.row,
        other => panic!("expected one row statement, got {:?}", other),
    }
}

fn stitch_names(row: &Row) -> Vec<String> {
    row.stitches
        .iter()
        .map(|expr| match expr {
            Expr::Stitch(stitch) => stitch.stitch.name.clone(),
            Expr::Row(_) => "{..}".to_string(),
            other => panic!("unexpected row element {:?}", other),
        })
        .collect()
}

fn first_size(text: &str) -> Size {
    let block = parse(text);
    match &only_row(&block).stitches[0] {
        Expr::Stitch(stitch) => match &stitch.args.args[0] {
            Expr::Size(size) => size.clone(),
            other => panic!("expected a size, got {:?}", other),
        },
        other => panic!("expected a stitch, got {:?}", other),
    }
}

#[test]
fn test_assignment_and_row_keyword() {
    let block = parse("a = k\nrow a a\n");
    assert_eq!(block.statements.len(), 2);
    let Stmt::Assign(assign) = &block.statements[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(assign.lhs.name, "a");
    let Expr::Row(rhs) = &assign.rhs else {
        panic!("expected a row on the right-hand side");
    };
    assert_eq!(stitch_names(rhs), vec!["k"]);

    let Stmt::Row(row) = &block.statements[1] else {
        panic!("expected a row");
    };
    assert_eq!(stitch_names(&row.row), vec!["a", "a"]);
}

#[test]
fn test_row_is_a_stitch_when_alone() {
    let block = parse("row\n");
    assert_eq!(stitch_names(only_row(&block)), vec!["row"]);
}

#[test]
fn test_alias() {
    let block = parse("yo := yarn-over\n");
    let Stmt::Alias(alias) = &block.statements[0] else {
        panic!("expected an alias");
    };
    assert_eq!(alias.lhs.name, "yo");
    assert_eq!(alias.rhs.name, "yarn-over");
    assert_eq!(alias.rhs.at, Position::new(1, 7));
}

#[test]
fn test_group_with_repeat_count() {
    let block = parse("{\n  row a\n  row b\n}(3)");
    let [Stmt::Group(stmt)] = block.statements.as_slice() else {
        panic!("expected one group");
    };
    assert_eq!(stmt.group.lines.len(), 2);
    assert_eq!(stmt.group.args.size_text(&Verbatim), "3");
    assert_eq!(stmt.group.lbrace, Position::new(1, 1));
    assert_eq!(stmt.group.rbrace, Position::new(4, 1));
}

#[test]
fn test_nested_groups() {
    let block = parse("{\n  {\n    k\n  }(2)\n  p\n}\n");
    let [Stmt::Group(outer)] = block.statements.as_slice() else {
        panic!("expected one group");
    };
    assert!(matches!(outer.group.lines[0], Stmt::Group(_)));
    assert!(matches!(outer.group.lines[1], Stmt::Row(_)));
    assert!(outer.group.args.is_empty());
}

#[test]
fn test_nested_inline_rows() {
    let block = parse("k {p {yo k}(2)}(3) k\n");
    let row = only_row(&block);
    assert_eq!(stitch_names(row), vec!["k", "{..}", "k"]);
    let Expr::Row(nested) = &row.stitches[1] else {
        panic!("expected a nested row");
    };
    assert_eq!(nested.args.size_text(&Verbatim), "3");
    assert_eq!(stitch_names(nested), vec!["p", "{..}"]);
}

#[test]
fn test_single_braced_row_is_hoisted() {
    let block = parse("{k p}(4)\n");
    let row = only_row(&block);
    assert_eq!(stitch_names(row), vec!["k", "p"]);
    assert_eq!(row.args.size_text(&Verbatim), "4");
}

#[test]
fn test_braced_row_followed_by_stitch_stays_nested() {
    let block = parse("{k p}(4) k\n");
    assert_eq!(stitch_names(only_row(&block)), vec!["{..}", "k"]);
}

#[test]
fn test_row_keyword_with_braced_row() {
    let block = parse("row {k p}(2)\n");
    let row = only_row(&block);
    assert_eq!(stitch_names(row), vec!["k", "p"]);
    assert_eq!(row.args.size_text(&Verbatim), "2");
}

#[test]
fn test_group_assignment() {
    let block = parse("rib = {\n  k p\n}(2)\nrib\n");
    let Stmt::Assign(assign) = &block.statements[0] else {
        panic!("expected an assignment");
    };
    let Expr::Group(group) = &assign.rhs else {
        panic!("expected a group");
    };
    assert_eq!(group.lines.len(), 1);
    assert_eq!(group.args.size_text(&Verbatim), "2");
    assert_eq!(block.statements.len(), 2);
}

#[test]
fn test_size_millimeters() {
    let size = first_size("k(12mm)\n");
    assert_eq!(size.value, SizeValue::Int(12));
    assert_eq!(size.unit, Unit::Millimeters);
    assert!(!size.before);
}

#[test]
fn test_size_before_asterisk() {
    let size = first_size("k(-*)\n");
    assert_eq!(size.value, SizeValue::None);
    assert_eq!(size.unit, Unit::Asterisk);
    assert!(size.before);
    assert_eq!(size.text(&Verbatim), "before end of row");
}

#[rstest]
#[case("k(2.5\")", SizeValue::Float(2.5), Unit::Inches, false)]
#[case("k(1')", SizeValue::Int(1), Unit::Feet, false)]
#[case("k(-4CM)", SizeValue::Int(4), Unit::Centimeters, true)]
#[case("k(*)", SizeValue::None, Unit::Asterisk, false)]
fn test_size_forms(
    #[case] text: &str,
    #[case] value: SizeValue,
    #[case] unit: Unit,
    #[case] before: bool,
) {
    let size = first_size(text);
    assert_eq!(size.value, value);
    assert_eq!(size.unit, unit);
    assert_eq!(size.before, before);
}

#[test]
fn test_bracket_list_with_identifiers() {
    let block = parse("cast-on(n, 2, -n)\n");
    let Expr::Stitch(stitch) = &only_row(&block).stitches[0] else {
        panic!("expected a stitch");
    };
    assert_eq!(stitch.args.texts(&Verbatim), vec!["n", "2", "until n"]);
}

#[test]
fn test_identifier_with_unit_is_a_size() {
    let size = first_size("k(n cm)\n");
    assert!(matches!(&size.value, SizeValue::Ident(ident) if ident.name == "n"));
    assert_eq!(size.unit, Unit::Centimeters);
    assert!(!size.before);
}

#[test]
fn test_empty_bracket_list() {
    let block = parse("k()\n");
    let Expr::Stitch(stitch) = &only_row(&block).stitches[0] else {
        panic!("expected a stitch");
    };
    assert!(stitch.args.is_empty());
}

#[rstest]
#[case("k(a 2)\n", TokenKind::Numeric)]
#[case("k(2 3)\n", TokenKind::Numeric)]
#[case("k(2,)\n", TokenKind::RightParen)]
#[case("k(* 2)\n", TokenKind::Numeric)]
fn test_arguments_need_separators(#[case] text: &str, #[case] kind: TokenKind) {
    match parse_str(text) {
        Err(ParseError::Unexpected { found, .. }) => assert_eq!(found, kind),
        other => panic!("expected an unexpected-token error, got {:?}", other),
    }
}

#[test]
fn test_root_description() {
    let block = parse("; Scarf\n; in garter\n\nk\n");
    assert_eq!(block.desc.lines(), vec!["Scarf", "in garter", ""]);
    let Stmt::Row(row) = &block.statements[0] else {
        panic!("expected a row");
    };
    assert!(row.desc.is_empty());
}

#[test]
fn test_description_attaches_to_next_statement() {
    let block = parse("k\n; Decrease\n; evenly\nssk\n");
    assert!(block.desc.is_empty());
    assert_eq!(desc(&block.statements[1]), vec!["Decrease", "evenly", ""]);
}

#[test]
fn test_description_paragraphs_merge() {
    let block = parse("k\n; one\n\n; two\nk\n");
    assert_eq!(desc(&block.statements[1]), vec!["one", "", "two", ""]);
}

#[test]
fn test_trailing_comment_joins_description() {
    let block = parse("; Rib\nk p ; loosely\n");
    assert_eq!(desc(&block.statements[0]), vec!["Rib", "loosely", ""]);
}

#[test]
fn test_description_inside_group() {
    let block = parse("{\n  ; first\n  k\n}\n");
    let Stmt::Group(group) = &block.statements[0] else {
        panic!("expected a group");
    };
    assert_eq!(desc(&group.group.lines[0]), vec!["first", ""]);
}

#[test]
fn test_multiple_sources() {
    let lexer = Lexer::new(vec![Source::new("a", "k\n"), Source::new("b", "p")]);
    let block = Parser::new(lexer).parse().unwrap();
    assert_eq!(block.statements.len(), 2);
}

#[test]
fn test_crlf_line_endings() {
    let block = parse("k\r\np\r\n");
    assert_eq!(block.statements.len(), 2);
}

#[test]
fn test_carriage_return_line_endings() {
    let block = parse("k\rp\r");
    assert_eq!(block.statements.len(), 2);
    let Stmt::Row(row) = &block.statements[1] else {
        panic!("expected a row");
    };
    assert_eq!(row.row.position(), Some(Position::new(2, 1)));
}

#[test]
fn test_newline_inside_inline_row_fails() {
    let err = parse_str("k {p\n}\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnclosedRow {
            at: Position::new(1, 5),
            open: Position::new(1, 3)
        }
    );
}

#[test]
fn test_unclosed_group_fails() {
    let err = parse_str("{\n  k\n").unwrap_err();
    assert!(matches!(err, ParseError::UnclosedGroup { open, .. } if open == Position::new(1, 1)));
}

#[test]
fn test_group_cannot_span_sources() {
    let lexer = Lexer::new(vec![Source::new("a", "{\nk\n"), Source::new("b", "}\n")]);
    let err = Parser::new(lexer).parse().unwrap_err();
    assert!(matches!(err, ParseError::UnclosedGroup { .. }));
}

#[test]
fn test_stray_closing_brace_fails() {
    assert!(matches!(
        parse_str("}\n").unwrap_err(),
        ParseError::Unexpected {
            found: TokenKind::RightBrace,
            ..
        }
    ));
}

#[rstest]
#[case("k(3in)\n")]
#[case("k(3 feet)\n")]
#[case("k(a b)\n")]
fn test_unknown_unit_fails(#[case] text: &str) {
    assert!(matches!(parse_str(text).unwrap_err(), ParseError::UnknownUnit { .. }));
}

#[test]
fn test_bad_number_fails() {
    assert_eq!(
        parse_str("k(1.2.3)\n").unwrap_err(),
        ParseError::InvalidNumber {
            literal: "1.2.3".to_string(),
            at: Position::new(1, 3)
        }
    );
}

#[rstest]
#[case("k # p\n", TokenKind::Illegal)]
#[case("k(=)\n", TokenKind::Equals)]
#[case("k(-,)\n", TokenKind::Comma)]
#[case("a := {\n", TokenKind::LeftBrace)]
#[case("a = )\n", TokenKind::RightParen)]
#[case("k p = q\n", TokenKind::Equals)]
#[case("{\n  k\n} p\n", TokenKind::Identifier)]
fn test_unexpected_tokens(#[case] text: &str, #[case] kind: TokenKind) {
    match parse_str(text) {
        Err(ParseError::Unexpected { found, .. }) => assert_eq!(found, kind),
        other => panic!("expected an unexpected-token error, got {:?}", other),
    }
}

#[test]
fn test_error_message_names_position() {
    let err = parse_str("k\n  # p\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "2:3: expected a statement, found illegal character \"#\""
    );
}
