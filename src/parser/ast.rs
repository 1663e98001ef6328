use crate::parser::{format_option, format_struct, format_vec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    pub start_index: usize,
    pub end_index: usize,
}

impl Meta {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Meta {
            start_index,
            end_index,
        }
    }

    pub fn to_formatted_string(&self, script: &str) -> String {
        format!(
            "Meta {{ {}..{} #{:?} }}",
            self.start_index,
            self.end_index,
            script.get(self.start_index..self.end_index).unwrap_or("")
        )
    }
}

pub trait HasMeta {
    fn get_meta(&self) -> &Meta;

    fn to_formatted_string(&self, script: &str) -> String;

    fn source_text<'a>(&self, script: &'a str) -> &'a str {
        let meta = self.get_meta();
        script.get(meta.start_index..meta.end_index).unwrap_or("")
    }
}

#[derive(Debug)]
pub struct ProgramData {
    pub meta: Meta,
    pub body: Vec<NodeType>,
}

impl HasMeta for ProgramData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }

    fn to_formatted_string(&self, script: &str) -> String {
        let mut b = format_struct("Program");
        b.add_fields("meta", self.meta.to_formatted_string(script))
            .add_fields(
                "body",
                format_vec(&self.body, |n| n.to_formatted_string(script)),
            );
        b.to_string()
    }
}

#[derive(Debug)]
pub enum NodeType {
    CallExpression(CallExpressionData),
    NewExpression(NewExpressionData),
    Group(GroupData),
    StringLiteral(StringLiteralData),
    TemplateLiteral(TemplateLiteralData),
    Token(TokenData),
}

impl NodeType {
    /// Direct children in source order.
    pub fn children(&self) -> Vec<&NodeType> {
        match self {
            NodeType::CallExpression(data) => arguments_children(&data.arguments),
            NodeType::NewExpression(data) => arguments_children(&data.arguments),
            NodeType::Group(data) => data.children.iter().collect(),
            NodeType::TemplateLiteral(data) => data.substitutions.iter().flatten().collect(),
            NodeType::StringLiteral(_) | NodeType::Token(_) => vec![],
        }
    }
}

fn arguments_children(arguments: &[ArgumentData]) -> Vec<&NodeType> {
    arguments.iter().flat_map(|a| a.children.iter()).collect()
}

impl HasMeta for NodeType {
    fn get_meta(&self) -> &Meta {
        match self {
            NodeType::CallExpression(data) => &data.meta,
            NodeType::NewExpression(data) => &data.meta,
            NodeType::Group(data) => &data.meta,
            NodeType::StringLiteral(data) => &data.meta,
            NodeType::TemplateLiteral(data) => &data.meta,
            NodeType::Token(data) => &data.meta,
        }
    }

    fn to_formatted_string(&self, script: &str) -> String {
        match self {
            NodeType::CallExpression(data) => data.to_formatted_string(script),
            NodeType::NewExpression(data) => data.to_formatted_string(script),
            NodeType::Group(data) => data.to_formatted_string(script),
            NodeType::StringLiteral(data) => data.to_formatted_string(script),
            NodeType::TemplateLiteral(data) => data.to_formatted_string(script),
            NodeType::Token(data) => data.to_formatted_string(script),
        }
    }
}

#[derive(Debug)]
pub struct CalleeData {
    pub meta: Meta,
    /// Source text of the callee expression, e.g. `script` or `runner.script`.
    pub name: String,
}

#[derive(Debug)]
pub struct CallExpressionData {
    pub meta: Meta,
    pub callee: CalleeData,
    pub arguments: Vec<ArgumentData>,
    pub optional: bool,
    /// Called on the result of a preceding expression (`a().b(..)`, `a[0].b(..)`).
    /// The callee text then only covers the trailing member chain.
    pub chained: bool,
}

impl CallExpressionData {
    /// The callee name as seen from the whole expression. Chained calls have
    /// no plain name.
    pub fn function_name(&self) -> Option<&str> {
        if self.chained {
            None
        } else {
            Some(&self.callee.name)
        }
    }

    pub fn first_argument(&self) -> Option<&ArgumentData> {
        self.arguments.first()
    }
}

impl HasMeta for CallExpressionData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }

    fn to_formatted_string(&self, script: &str) -> String {
        let mut b = format_struct("CallExpression");
        b.add_fields("meta", self.meta.to_formatted_string(script))
            .add_fields("callee", format!("{:?}", self.callee.name))
            .add_fields("optional", self.optional.to_string())
            .add_fields("chained", self.chained.to_string())
            .add_fields(
                "arguments",
                format_vec(&self.arguments, |a| a.to_formatted_string(script)),
            );
        b.to_string()
    }
}

#[derive(Debug)]
pub struct NewExpressionData {
    pub meta: Meta,
    pub callee: CalleeData,
    pub arguments: Vec<ArgumentData>,
}

impl HasMeta for NewExpressionData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }

    fn to_formatted_string(&self, script: &str) -> String {
        let mut b = format_struct("NewExpression");
        b.add_fields("meta", self.meta.to_formatted_string(script))
            .add_fields("callee", format!("{:?}", self.callee.name))
            .add_fields(
                "arguments",
                format_vec(&self.arguments, |a| a.to_formatted_string(script)),
            );
        b.to_string()
    }
}

#[derive(Debug)]
pub struct ArgumentData {
    pub meta: Meta,
    pub children: Vec<NodeType>,
}

impl ArgumentData {
    /// The argument when it is nothing but a single quoted string literal.
    pub fn as_string_literal(&self) -> Option<&StringLiteralData> {
        match self.children.as_slice() {
            [NodeType::StringLiteral(literal)] => Some(literal),
            _ => None,
        }
    }
}

impl HasMeta for ArgumentData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }

    fn to_formatted_string(&self, script: &str) -> String {
        let mut b = format_struct("Argument");
        b.add_fields("meta", self.meta.to_formatted_string(script))
            .add_fields(
                "literal",
                format_option(&self.as_string_literal(), |l| format!("{:?}", l.value)),
            )
            .add_fields(
                "children",
                format_vec(&self.children, |n| n.to_formatted_string(script)),
            );
        b.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Paren,
    Bracket,
    Brace,
}

#[derive(Debug)]
pub struct GroupData {
    pub meta: Meta,
    pub kind: GroupKind,
    pub children: Vec<NodeType>,
}

impl HasMeta for GroupData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }

    fn to_formatted_string(&self, script: &str) -> String {
        let mut b = format_struct("Group");
        b.add_fields("meta", self.meta.to_formatted_string(script))
            .add_fields("kind", format!("{:?}", self.kind))
            .add_fields(
                "children",
                format_vec(&self.children, |n| n.to_formatted_string(script)),
            );
        b.to_string()
    }
}

#[derive(Debug)]
pub struct StringLiteralData {
    pub meta: Meta,
    /// Cooked value, escapes resolved.
    pub value: String,
}

impl HasMeta for StringLiteralData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }

    fn to_formatted_string(&self, script: &str) -> String {
        let mut b = format_struct("StringLiteral");
        b.add_fields("meta", self.meta.to_formatted_string(script))
            .add_fields("value", format!("{:?}", self.value));
        b.to_string()
    }
}

#[derive(Debug)]
pub struct TemplateLiteralData {
    pub meta: Meta,
    pub substitutions: Vec<Vec<NodeType>>,
}

impl HasMeta for TemplateLiteralData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }

    fn to_formatted_string(&self, script: &str) -> String {
        let mut b = format_struct("TemplateLiteral");
        b.add_fields("meta", self.meta.to_formatted_string(script))
            .add_fields(
                "substitutions",
                format_vec(&self.substitutions, |s| {
                    format_vec(s, |n| n.to_formatted_string(script))
                }),
            );
        b.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Number,
    Punctuator,
    RegExp,
}

#[derive(Debug)]
pub struct TokenData {
    pub meta: Meta,
    pub kind: TokenKind,
}

impl HasMeta for TokenData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }

    fn to_formatted_string(&self, script: &str) -> String {
        format!("{:?} {}", self.kind, self.meta.to_formatted_string(script))
    }
}
