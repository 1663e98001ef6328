use std::time::Instant;

use pest::error::{Error, ErrorVariant};
use pest::iterators::{Pair, Pairs};
use pest::{Parser, Position, Span};
use pest_derive::Parser;
use tracing::debug;

use super::ast::*;
use super::util::unescape_string_literal;
use super::TAB_WIDTH;

#[derive(Parser)]
#[grammar = "parser/script_grammar.pest"] // relative to src
pub struct ScriptParser;

impl ScriptParser {
    /// Renders the raw parse tree, one pair per line, indented by depth.
    pub fn parse_to_token_tree(script: &str) -> Result<String, String> {
        let mut tree = vec![];
        let start = Instant::now();
        let result = ScriptParser::parse(Rule::script, script);
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "parsed token tree"
        );

        match result {
            Ok(pairs) => {
                for pair in pairs {
                    tree.push(pair_to_string(pair, 0).join("\n"));
                }
            }
            Err(rule) => {
                return Err(format!("Parse error due to {:?}", rule));
            }
        }
        Ok(tree.join("\n"))
    }

    pub fn parse_to_ast(script: &str) -> Result<ProgramData, Error<Rule>> {
        let start = Instant::now();
        let mut pairs = ScriptParser::parse(Rule::script, script)?;
        let program = match pairs.next() {
            Some(pair) => build_program(pair)?,
            None => {
                return Err(Error::new_from_pos(
                    ErrorVariant::CustomError {
                        message: "Parser produced no pairs".to_string(),
                    },
                    Position::from_start(script),
                ))
            }
        };
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            nodes = program.body.len(),
            "built syntax tree"
        );
        Ok(program)
    }
}

fn pair_to_string(pair: Pair<Rule>, level: usize) -> Vec<String> {
    let mut tree = vec![];
    let span = pair.as_span();
    let rule_name = format!(
        "{:?} => ({},{}) #{:?}",
        pair.as_rule(),
        span.start(),
        span.end(),
        span.as_str()
    );
    let string_pads = " ".repeat(level * TAB_WIDTH);
    tree.push(format!("{}{}", string_pads, rule_name));
    for child_pair in pair.into_inner() {
        tree.append(pair_to_string(child_pair, level + 1).as_mut());
    }
    tree
}

fn get_meta(pair: &Pair<Rule>) -> Meta {
    let span = pair.as_span();
    Meta::new(span.start(), span.end())
}

fn build_program(pair: Pair<Rule>) -> Result<ProgramData, Error<Rule>> {
    if pair.as_rule() != Rule::script {
        return Err(get_unexpected_error(1, &pair));
    }
    let meta = get_meta(&pair);
    let body = build_nodes(pair.into_inner())?;
    Ok(ProgramData { meta, body })
}

fn build_nodes(pairs: Pairs<Rule>) -> Result<Vec<NodeType>, Error<Rule>> {
    let mut nodes = vec![];
    for pair in pairs {
        if pair.as_rule() == Rule::EOI {
            continue;
        }
        nodes.push(build_ast_from_item(pair)?);
    }
    Ok(nodes)
}

fn build_ast_from_item(pair: Pair<Rule>) -> Result<NodeType, Error<Rule>> {
    let meta = get_meta(&pair);
    Ok(match pair.as_rule() {
        Rule::call_expression => NodeType::CallExpression(build_call_expression(pair, false)?),
        Rule::chained_call => NodeType::CallExpression(build_call_expression(pair, true)?),
        Rule::new_expression => NodeType::NewExpression(build_new_expression(pair)?),
        Rule::paren_group => build_group(pair, GroupKind::Paren)?,
        Rule::bracket_group => build_group(pair, GroupKind::Bracket)?,
        Rule::brace_group => build_group(pair, GroupKind::Brace)?,
        Rule::string_literal => NodeType::StringLiteral(build_string_literal(pair)?),
        Rule::template_literal => NodeType::TemplateLiteral(build_template_literal(pair)?),
        Rule::word => NodeType::Token(TokenData {
            meta,
            kind: TokenKind::Word,
        }),
        Rule::number => NodeType::Token(TokenData {
            meta,
            kind: TokenKind::Number,
        }),
        Rule::punctuator | Rule::ellipsis => NodeType::Token(TokenData {
            meta,
            kind: TokenKind::Punctuator,
        }),
        Rule::regex_prefix => NodeType::Token(TokenData {
            meta,
            kind: if pair.as_str().starts_with(|c: char| c.is_ascii_alphabetic()) {
                TokenKind::Word
            } else {
                TokenKind::Punctuator
            },
        }),
        Rule::regex_literal => NodeType::Token(TokenData {
            meta,
            kind: TokenKind::RegExp,
        }),
        _ => return Err(get_unexpected_error(2, &pair)),
    })
}

/// The callee pair can end in skipped trivia, so the name runs from the first
/// word to the last one.
fn build_callee(pair: Pair<Rule>) -> CalleeData {
    let span = pair.as_span();
    let text = pair.as_str();
    let mut start = span.end();
    let mut end = span.start();
    for word in pair.into_inner().filter(|p| p.as_rule() == Rule::word) {
        let word_span = word.as_span();
        start = start.min(word_span.start());
        end = end.max(word_span.end());
    }
    if start > end {
        start = span.start();
        end = span.start();
    }
    CalleeData {
        meta: Meta::new(start, end),
        name: text[start - span.start()..end - span.start()].to_string(),
    }
}

fn build_call_expression(
    pair: Pair<Rule>,
    chained: bool,
) -> Result<CallExpressionData, Error<Rule>> {
    let meta = get_meta(&pair);
    let rule = pair.as_rule();
    let span = pair.as_span();
    let mut callee = None;
    let mut arguments = vec![];
    let mut optional = false;
    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::callee => callee = Some(build_callee(inner_pair)),
            Rule::arguments => arguments = build_arguments(inner_pair)?,
            Rule::optional_call => optional = true,
            Rule::member_access | Rule::type_arguments => { /* Not needed for matching */ }
            _ => return Err(get_unexpected_error(3, &inner_pair)),
        }
    }
    let callee = callee.ok_or_else(|| get_missing_error(4, rule, span))?;
    Ok(CallExpressionData {
        meta,
        callee,
        arguments,
        optional,
        chained,
    })
}

fn build_new_expression(pair: Pair<Rule>) -> Result<NewExpressionData, Error<Rule>> {
    let meta = get_meta(&pair);
    let rule = pair.as_rule();
    let span = pair.as_span();
    let mut callee = None;
    let mut arguments = vec![];
    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::callee => callee = Some(build_callee(inner_pair)),
            Rule::arguments => arguments = build_arguments(inner_pair)?,
            Rule::new_keyword | Rule::type_arguments => { /* Do nothing */ }
            _ => return Err(get_unexpected_error(5, &inner_pair)),
        }
    }
    let callee = callee.ok_or_else(|| get_missing_error(6, rule, span))?;
    Ok(NewExpressionData {
        meta,
        callee,
        arguments,
    })
}

fn build_arguments(pair: Pair<Rule>) -> Result<Vec<ArgumentData>, Error<Rule>> {
    let mut arguments = vec![];
    for argument_pair in pair.into_inner() {
        if argument_pair.as_rule() != Rule::argument {
            return Err(get_unexpected_error(7, &argument_pair));
        }
        arguments.push(ArgumentData {
            meta: get_meta(&argument_pair),
            children: build_nodes(argument_pair.into_inner())?,
        });
    }
    Ok(arguments)
}

fn build_group(pair: Pair<Rule>, kind: GroupKind) -> Result<NodeType, Error<Rule>> {
    Ok(NodeType::Group(GroupData {
        meta: get_meta(&pair),
        kind,
        children: build_nodes(pair.into_inner())?,
    }))
}

fn build_string_literal(pair: Pair<Rule>) -> Result<StringLiteralData, Error<Rule>> {
    let meta = get_meta(&pair);
    let mut value = String::new();
    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::double_string_characters | Rule::single_string_characters => {
                value = unescape_string_literal(inner_pair.as_str());
            }
            _ => return Err(get_unexpected_error(8, &inner_pair)),
        }
    }
    Ok(StringLiteralData { meta, value })
}

fn build_template_literal(pair: Pair<Rule>) -> Result<TemplateLiteralData, Error<Rule>> {
    let meta = get_meta(&pair);
    let mut substitutions = vec![];
    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::template_characters => { /* Do nothing */ }
            Rule::template_substitution => {
                substitutions.push(build_nodes(inner_pair.into_inner())?);
            }
            _ => return Err(get_unexpected_error(9, &inner_pair)),
        }
    }
    Ok(TemplateLiteralData {
        meta,
        substitutions,
    })
}

fn get_unexpected_error(id: i32, pair: &Pair<Rule>) -> Error<Rule> {
    let message = format!("Unexpected state reached [{:?}] - {}", pair.as_rule(), id);
    Error::new_from_span(ErrorVariant::CustomError { message }, pair.as_span())
}

fn get_missing_error(id: i32, rule: Rule, span: Span) -> Error<Rule> {
    let message = format!("Incomplete node [{:?}] - {}", rule, id);
    Error::new_from_span(ErrorVariant::CustomError { message }, span)
}
