use oneof_syntax::{TypeExpr, parse_source};
use rstest::rstest;

const SAMPLE: &str = r#"/* package node sample */

// Package node holds expression trees.
package node

import (
	"fmt"
	str "strings"
)

import _ "embed"

const limit = 10

var names = map[string]int{"a": 1}

type oneofNode struct {
	Value       string
	OperatorSum struct {
		Left  *oneofNode
		Right *oneofNode
	}
}

func (v Value) String() string {
	if v == "" {
		return fmt.Sprintf("%d", limit)
	}
	return str.ToUpper(string(v))
}

type (
	Pair[K comparable, V any] struct {
		Key   K
		Value V
	}
	Alias = Pair[string, int]
	Grid  [4][4]byte
)
"#;

#[test]
fn test_parse_full_file() {
    let unit = parse_source("node.go", SAMPLE).unwrap_or_else(|diags| panic!("{diags}"));

    assert_eq!(unit.package.name, "node");
    assert_eq!(
        unit.header.as_deref(),
        Some("/* package node sample */\n\n// Package node holds expression trees.\n")
    );

    let imports: Vec<_> = unit.imports.iter().map(|spec| spec.to_source()).collect();
    assert_eq!(imports, vec!["\"fmt\"", "str \"strings\"", "_ \"embed\""]);

    let names: Vec<_> = unit.types.iter().map(|spec| spec.name.name.as_str()).collect();
    assert_eq!(names, vec!["oneofNode", "Pair", "Alias", "Grid"]);
}

#[test]
fn test_type_spec_details() {
    let unit = parse_source("node.go", SAMPLE).unwrap();

    let marker = &unit.types[0];
    assert!(marker.ty.is_struct());
    assert_eq!((marker.name.pos.line, marker.name.pos.column), (17, 6));
    assert!(marker.text.starts_with("oneofNode struct {\n\tValue       string"));
    assert!(marker.text.ends_with("\t}\n}"));

    let pair = &unit.types[1];
    assert_eq!(pair.type_params.as_deref(), Some("[K comparable, V any]"));

    let alias = &unit.types[2];
    assert!(alias.alias);
    assert!(matches!(alias.ty, TypeExpr::Instance { ref args, .. } if args.len() == 2));

    let grid = &unit.types[3];
    assert_eq!(grid.type_params, None);
    assert_eq!(grid.text, "Grid  [4][4]byte");
}

#[test]
fn test_all_broken_declarations_reported() {
    let src = "package p\n\ntype A struct {\n\tX int int\n}\n\ntype B []int\n\ntype C [ )int\n";
    let diags = parse_source("bad.go", src).unwrap_err();
    let lines: Vec<_> = diags.iter().map(|d| d.location.line).collect();
    assert!(lines.iter().any(|line| (3..=5).contains(line)), "{diags}");
    assert!(lines.contains(&9), "{diags}");
    assert!(!lines.contains(&7), "{diags}");
    assert!(diags.iter().all(|d| d.location.file == "bad.go"));
}

#[rstest]
#[case("type T int\n", "bad.go:1:1: expected 'package', found type")]
#[case("", "bad.go:1:1: expected 'package', found EOF")]
#[case(
    "package p\nfunc f() {}\nimport \"fmt\"\n",
    "bad.go:3:1: imports must appear before other declarations"
)]
fn test_file_level_errors(#[case] src: &str, #[case] expected: &str) {
    let diags = parse_source("bad.go", src).unwrap_err();
    assert_eq!(diags.to_string(), expected);
}

#[test]
fn test_statement_outside_function() {
    let diags = parse_source("bad.go", "package p\n\nx := 1\n").unwrap_err();
    assert!(diags.iter().all(|d| d.location.line == 3));
}

#[test]
fn test_package_without_name() {
    let diags = parse_source("bad.go", "package\n").unwrap_err();
    assert!(!diags.is_empty());
}

#[test]
fn test_function_bodies_are_skipped() {
    let src = "package p\n\nfunc f() {\n\tx := []int{1, 2}\n\tfor range x {\n\t}\n}\n\ntype T struct{}\n";
    let unit = parse_source("f.go", src).unwrap();
    assert_eq!(unit.types.len(), 1);
    assert_eq!(unit.types[0].ty, TypeExpr::Struct(Vec::new()));
}
