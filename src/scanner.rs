//! Finds script calls in a document.
//!
//! A script call is a call expression whose callee text is a configured
//! function key and whose first argument is a plain string literal:
//!
//! ```text
//! script("build", async () => { ... })
//! ```
//!
//! Anything else (computed or empty first argument, no arguments, unknown
//! callee) is silently skipped.

use serde::{Deserialize, Serialize};

use crate::config::FunctionConfig;
use crate::document::{Range, TextDocument};
use crate::error::{Error, Result};
use crate::parser::ast::{HasMeta, NodeType, ProgramData};
use crate::parser::ScriptParser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptCall {
    pub function_name: String,
    pub script_name: String,
    pub range: Range,
}

/// A parsed document, ready to be queried. Re-create it after every edit.
#[derive(Debug)]
pub struct DocumentScan<'d> {
    document: &'d TextDocument,
    program: ProgramData,
}

impl<'d> DocumentScan<'d> {
    pub fn parse(document: &'d TextDocument) -> Result<Self> {
        let program = ScriptParser::parse_to_ast(document.text())
            .map_err(|e| Error::parse(&document.path().to_string_lossy(), e))?;
        Ok(DocumentScan { document, program })
    }

    /// Lazily walks the tree in source order, parents before children.
    pub fn script_calls<'s>(&'s self, functions: &'s FunctionConfig) -> ScriptCalls<'s> {
        let mut stack: Vec<&'s NodeType> = self.program.body.iter().collect();
        stack.reverse();
        ScriptCalls {
            document: self.document,
            functions,
            stack,
        }
    }
}

pub struct ScriptCalls<'s> {
    document: &'s TextDocument,
    functions: &'s FunctionConfig,
    stack: Vec<&'s NodeType>,
}

impl<'s> ScriptCalls<'s> {
    fn match_node(&self, node: &NodeType) -> Option<ScriptCall> {
        let call = match node {
            NodeType::CallExpression(call) => call,
            _ => return None,
        };
        let function_name = call.function_name()?;
        if !self.functions.contains_key(function_name) {
            return None;
        }
        let literal = call.first_argument()?.as_string_literal()?;
        if literal.value.is_empty() {
            return None;
        }
        let meta = call.get_meta();
        Some(ScriptCall {
            function_name: function_name.to_string(),
            script_name: literal.value.clone(),
            range: self.document.range_of(meta.start_index, meta.end_index),
        })
    }
}

impl<'s> Iterator for ScriptCalls<'s> {
    type Item = ScriptCall;

    fn next(&mut self) -> Option<ScriptCall> {
        while let Some(node) = self.stack.pop() {
            let mut children = node.children();
            children.reverse();
            self.stack.extend(children);
            if let Some(call) = self.match_node(node) {
                return Some(call);
            }
        }
        None
    }
}

/// Parses the document and collects every script call.
pub fn find_script_calls(
    document: &TextDocument,
    functions: &FunctionConfig,
) -> Result<Vec<ScriptCall>> {
    let scan = DocumentScan::parse(document)?;
    let calls = scan.script_calls(functions).collect();
    Ok(calls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Position;

    fn scan(code: &str) -> Vec<ScriptCall> {
        let document = TextDocument::new("/work/src/a.script.ts", code);
        find_script_calls(&document, &FunctionConfig::default()).unwrap()
    }

    #[test]
    fn test_single_call_range() {
        let code = "script(\"abc\", async () => {\n  await run()\n})";
        let calls = scan(code);
        assert_eq!(
            calls,
            vec![ScriptCall {
                function_name: "script".to_string(),
                script_name: "abc".to_string(),
                range: Range::new(Position::new(0, 0), Position::new(2, 2)),
            }]
        );
    }

    #[test]
    fn test_nested_calls_in_preorder() {
        let code = "script('outer', () => { script('inner', () => {}) })\nscript('last')";
        let names: Vec<String> = scan(code).into_iter().map(|c| c.script_name).collect();
        assert_eq!(names, vec!["outer", "inner", "last"]);
    }

    #[test]
    fn test_skipped_call_shapes() {
        let code = r#"
            script(name, () => {})
            script("", () => {})
            script()
            script(`tpl`)
            script(("paren"))
            script("a" + b)
            new script("ctor")
            factory().script("chained")
            other("x")
            obj.script("member")
        "#;
        assert!(scan(code).is_empty());
    }

    #[test]
    fn test_lazy_iteration_stops_early() {
        let document = TextDocument::new("a.script.ts", "script('a'); script('b'); script('c')");
        let functions = FunctionConfig::default();
        let scan = DocumentScan::parse(&document).unwrap();
        let mut calls = scan.script_calls(&functions);
        assert_eq!(calls.next().unwrap().script_name, "a");
        assert_eq!(calls.next().unwrap().script_name, "b");
        let again: Vec<ScriptCall> = scan.script_calls(&functions).collect();
        assert_eq!(again.len(), 3);
    }
}
