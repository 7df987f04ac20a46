use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tree_sitter::{Language, Node as TSNode, Parser, Tree};

use crate::core::error::{GraphError, Result};

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|err| GraphError::ParserInit(err.to_string()))?;
        Ok(Self { parser })
    }

    pub fn parse_source(&mut self, source: &str) -> Option<Tree> {
        self.parser.parse(source, None)
    }
}

/// Buffered UTF-8 read; fails on non-UTF-8 content.
pub fn read_source(file_path: &Path) -> std::io::Result<String> {
    let file = File::open(file_path)?;
    let file_size = file.metadata()?.len() as usize;

    let mut reader = BufReader::with_capacity(file_size.clamp(1, 8192), file);
    let mut content = String::with_capacity(file_size);
    reader.read_to_string(&mut content)?;
    Ok(content)
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

pub fn find_child_by_kind<'a>(node: &TSNode<'a>, kind: &str) -> Option<TSNode<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

pub fn named_children<'a>(node: &TSNode<'a>) -> Vec<TSNode<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Pre-order visit of every node below `node` (not `node` itself).
pub fn for_each_descendant<'a, F>(node: TSNode<'a>, visit: &mut F)
where
    F: FnMut(TSNode<'a>),
{
    let mut cursor = node.walk();
    let children: Vec<TSNode<'a>> = node.children(&mut cursor).collect();
    for child in children {
        visit(child);
        for_each_descendant(child, visit);
    }
}

/// 1-based line of the first error or missing node, if the tree has any.
pub fn first_error_line(node: &TSNode) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    let children: Vec<TSNode> = node.children(&mut cursor).collect();
    children
        .iter()
        .find_map(first_error_line)
        .or(Some(node.start_position().row + 1))
}

/// Unwrap `@decorator` wrappers down to the decorated definition.
pub fn undecorated<'a>(node: TSNode<'a>) -> TSNode<'a> {
    if node.kind() == "decorated_definition" {
        if let Some(definition) = node.child_by_field_name("definition") {
            return definition;
        }
    }
    node
}
