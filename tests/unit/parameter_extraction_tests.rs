//! Unit tests for placeholder extraction
//!
//! Tests `compile()` to ensure placeholder names, rules and captured values
//! come out in template order.

use page_navigator::{compile, Delimiters, ParamRule};

fn names(template: &str) -> Vec<String> {
    compile(template, &Delimiters::default())
        .unwrap()
        .placeholders()
        .iter()
        .map(|placeholder| placeholder.name.clone())
        .collect()
}

#[test]
fn test_extract_simple_placeholder() {
    assert_eq!(names("/user/{id}"), vec!["id"]);
    assert_eq!(names("/user/{user_id}"), vec!["user_id"]);
}

#[test]
fn test_extract_in_template_order() {
    assert_eq!(
        names("/blog/{year}/{month}/{slug}.html"),
        vec!["year", "month", "slug"]
    );
}

#[test]
fn test_extract_rules() {
    let pattern = compile("/{a}/{b:string}/{c:number}/{d:any}", &Delimiters::default()).unwrap();
    let rules: Vec<_> = pattern.placeholders().iter().map(|p| p.rule).collect();
    assert_eq!(
        rules,
        vec![
            ParamRule::Slug,
            ParamRule::Slug,
            ParamRule::Number,
            ParamRule::Any
        ]
    );
}

#[test]
fn test_extract_no_placeholders() {
    assert!(names("/about").is_empty());
    assert!(names("").is_empty());
}

#[test]
fn test_captures_map_groups_to_names() {
    let pattern = compile("/blog/{year:number}/{slug}", &Delimiters::default()).unwrap();
    let captures = pattern.captures("/blog/2024/hello-world").unwrap();
    assert_eq!(
        captures,
        vec![("year", "2024".to_string()), ("slug", "hello-world".to_string())]
    );
}

#[test]
fn test_any_rule_spans_segments() {
    let pattern = compile("/files/{path:any}", &Delimiters::default()).unwrap();
    let captures = pattern.captures("/files/a/b/c.txt").unwrap();
    assert_eq!(captures, vec![("path", "a/b/c.txt".to_string())]);
}

#[test]
fn test_literal_metacharacters_are_escaped() {
    let pattern = compile("/a.b", &Delimiters::default()).unwrap();
    assert!(pattern.captures("/a.b").is_some());
    assert!(pattern.captures("/axb").is_none());
}
