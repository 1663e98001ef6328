use super::api::Rule;
use super::api::ScriptParser;
use super::ast::{GroupKind, HasMeta, NodeType, TokenKind};

use pest::{consumes_to, parses_to};
use pest::Parser;

fn first_call(code: &str) -> super::ast::CallExpressionData {
    let program = ScriptParser::parse_to_ast(code).unwrap();
    for node in program.body {
        if let NodeType::CallExpression(data) = node {
            return data;
        }
    }
    panic!("No call expression found in {:?}", code);
}

#[test]
fn test_call_expression_tokens() {
    parses_to! {
        parser: ScriptParser,
        input: "script(\"abc\")",
        rule: Rule::call_expression,
        tokens: [
            call_expression(0, 13, [
                callee(0, 6, [
                    word(0, 6)
                ]),
                arguments(6, 13, [
                    argument(7, 12, [
                        string_literal(7, 12, [
                            double_string_characters(8, 11)
                        ])
                    ])
                ])
            ])
        ]
    };
}

#[test]
fn test_member_callee_tokens() {
    parses_to! {
        parser: ScriptParser,
        input: "a.b()",
        rule: Rule::call_expression,
        tokens: [
            call_expression(0, 5, [
                callee(0, 3, [
                    word(0, 1),
                    member_access(1, 2),
                    word(2, 3)
                ]),
                arguments(3, 5)
            ])
        ]
    };
}

#[test]
fn test_new_expression_tokens() {
    parses_to! {
        parser: ScriptParser,
        input: "new Foo(\"a\")",
        rule: Rule::new_expression,
        tokens: [
            new_expression(0, 12, [
                new_keyword(0, 3),
                callee(4, 7, [
                    word(4, 7)
                ]),
                arguments(7, 12, [
                    argument(8, 11, [
                        string_literal(8, 11, [
                            double_string_characters(9, 10)
                        ])
                    ])
                ])
            ])
        ]
    };
}

#[test]
fn test_single_quoted_string_tokens() {
    parses_to! {
        parser: ScriptParser,
        input: "'x'",
        rule: Rule::string_literal,
        tokens: [
            string_literal(0, 3, [
                single_string_characters(1, 2)
            ])
        ]
    };
}

#[test]
fn test_template_literal_tokens() {
    parses_to! {
        parser: ScriptParser,
        input: "`a${b}c`",
        rule: Rule::template_literal,
        tokens: [
            template_literal(0, 8, [
                template_characters(1, 2),
                template_substitution(2, 6, [
                    word(4, 5)
                ]),
                template_characters(6, 7)
            ])
        ]
    };
}

#[test]
fn test_keywords_are_not_calls() {
    for code in &["if (\"a\")", "while(x)", "return (\"a\")", "typeof(x)", "instanceof(x)"] {
        assert!(
            ScriptParser::parse(Rule::call_expression, code).is_err(),
            "{} should not be a call expression",
            code
        );
    }
}

#[test]
fn test_keyword_prefix_is_still_a_call() {
    let call = first_call("iffy(\"a\")");
    assert_eq!(call.callee.name, "iffy");
    let call = first_call("newScript(\"a\")");
    assert_eq!(call.callee.name, "newScript");
}

#[test]
fn test_call_with_whitespace_and_comments() {
    let code = "script /* lens */ (\n  'abc', // name\n  fn\n)";
    let call = first_call(code);
    assert_eq!(call.callee.name, "script");
    assert_eq!(call.arguments.len(), 2);
    assert_eq!(
        call.first_argument().unwrap().as_string_literal().unwrap().value,
        "abc"
    );
    assert_eq!(call.get_meta().start_index, 0);
    assert_eq!(call.get_meta().end_index, code.len());
}

#[test]
fn test_type_arguments_and_optional_call() {
    let call = first_call("script<Ctx>(\"a\")");
    assert_eq!(call.callee.name, "script");
    assert!(!call.optional);

    let call = first_call("script?.(\"a\")");
    assert_eq!(call.callee.name, "script");
    assert!(call.optional);
}

#[test]
fn test_comparison_is_not_type_arguments() {
    let program = ScriptParser::parse_to_ast("if (a < b) { c(\"x\") }").unwrap();
    let calls: Vec<String> = collect_calls(&program.body)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(calls, vec!["c".to_string()]);
}

#[test]
fn test_chained_call_is_flagged() {
    let program = ScriptParser::parse_to_ast("run().script(\"a\")").unwrap();
    let calls = collect_calls(&program.body);
    assert_eq!(
        calls,
        vec![("run".to_string(), false), ("script".to_string(), true)]
    );
}

#[test]
fn test_spread_call_is_not_chained() {
    let program = ScriptParser::parse_to_ast("f(...script(\"a\"))").unwrap();
    let calls = collect_calls(&program.body);
    assert_eq!(
        calls,
        vec![("f".to_string(), false), ("script".to_string(), false)]
    );
}

#[test]
fn test_regex_argument_does_not_start_comment() {
    let code = "s.replace(/\\/\\//g, \"/\"); script(\"a\")";
    let program = ScriptParser::parse_to_ast(code).unwrap();
    let calls = collect_calls(&program.body);
    assert_eq!(
        calls,
        vec![("s.replace".to_string(), false), ("script".to_string(), false)]
    );
    match &program.body[0] {
        NodeType::CallExpression(data) => match data.arguments[0].children.as_slice() {
            [NodeType::Token(token)] => assert_eq!(token.kind, TokenKind::RegExp),
            other => panic!("Unexpected argument {:?}", other),
        },
        other => panic!("Unexpected node {:?}", other),
    }
}

#[test]
fn test_unterminated_input_still_parses() {
    for code in &[
        "script(\"abc\", () => {",
        "script(\"abc",
        "`${",
        "/* open comment",
        ")]}",
        "",
    ] {
        assert!(
            ScriptParser::parse_to_ast(code).is_ok(),
            "{:?} should parse",
            code
        );
    }
}

#[test]
fn test_unclosed_call_becomes_group() {
    let program = ScriptParser::parse_to_ast("script(\"abc\", () => {").unwrap();
    match &program.body[..] {
        [NodeType::Token(word), NodeType::Group(group)] => {
            assert_eq!(word.kind, TokenKind::Word);
            assert_eq!(group.kind, GroupKind::Paren);
        }
        other => panic!("Unexpected body {:?}", other),
    }
}

#[test]
fn test_calls_in_template_substitution() {
    let program = ScriptParser::parse_to_ast("const s = `x ${script('a')} y`").unwrap();
    let calls = collect_calls(&program.body);
    assert_eq!(calls, vec![("script".to_string(), false)]);
}

#[test]
fn test_token_tree_dump() {
    let tree = ScriptParser::parse_to_token_tree("f(1)").unwrap();
    let lines: Vec<&str> = tree.lines().collect();
    assert_eq!(lines[0], "script => (0,4) #\"f(1)\"");
    assert_eq!(lines[1], "  call_expression => (0,4) #\"f(1)\"");
}

#[test]
fn test_formatted_ast_mentions_literal() {
    let code = "script('abc')";
    let program = ScriptParser::parse_to_ast(code).unwrap();
    let formatted = program.to_formatted_string(code);
    assert!(formatted.starts_with("Program {"));
    assert!(formatted.contains("callee: \"script\""));
    assert!(formatted.contains("literal: \"abc\""));
}

fn collect_calls(nodes: &[NodeType]) -> Vec<(String, bool)> {
    let mut calls = vec![];
    for node in nodes {
        if let NodeType::CallExpression(data) = node {
            calls.push((data.callee.name.clone(), data.chained));
        }
        let children: Vec<&NodeType> = node.children();
        for child in children {
            calls.append(&mut collect_calls(std::slice::from_ref(child)));
        }
    }
    calls
}

#[test]
fn test_callee_name_excludes_trailing_trivia() {
    for code in &["script ('a')", "script\n('a')", "script/*x*/('a')", "a . b /* c */ ('a')"] {
        let call = first_call(code);
        let meta = call.callee.meta;
        assert_eq!(meta.start_index, 0);
        assert_eq!(call.callee.name, &code[..meta.end_index]);
        assert!(!call.callee.name.ends_with(|c: char| c.is_whitespace() || c == '/'));
    }
}

#[test]
fn test_regex_after_prefix_tokens() {
    parses_to! {
        parser: ScriptParser,
        input: "= /'/",
        rule: Rule::script,
        tokens: [
            script(0, 5, [
                regex_prefix(0, 1),
                regex_literal(2, 5),
                EOI(5, 5)
            ])
        ]
    };
}

#[test]
fn test_division_is_not_regex() {
    let program = ScriptParser::parse_to_ast("a / b / script('c')").unwrap();
    let calls = collect_calls(&program.body);
    assert_eq!(calls, vec![("script".to_string(), false)]);
    assert!(!program.body.iter().any(|node| match node {
        NodeType::Token(token) => token.kind == TokenKind::RegExp,
        _ => false,
    }));
}
