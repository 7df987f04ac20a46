use tree_sitter::Node as TSNode;

use super::common::{
    extract_text, find_child_by_kind, first_error_line, for_each_descendant, named_children,
    undecorated, TreeSitterParser,
};
use super::{CallableFacts, ClassFacts, LanguageParser, ParseOutcome, SkipReason, UnitFacts};
use crate::core::error::Result;

/// Implicit receiver of instance methods.
const RECEIVER: &str = "self";

pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Result<Self> {
        // Fail early if the grammar and the runtime disagree on ABI version.
        TreeSitterParser::new(tree_sitter_python::language())?;
        Ok(Self)
    }

    fn extract_imports(&self, root: &TSNode, source: &[u8]) -> Vec<String> {
        let mut imports = Vec::new();

        for_each_descendant(*root, &mut |node| match node.kind() {
            "import_statement" => {
                for child in named_children(&node) {
                    let name_node = match child.kind() {
                        "dotted_name" => Some(child),
                        "aliased_import" => child.child_by_field_name("name"),
                        _ => None,
                    };
                    if let Some(name_node) = name_node {
                        imports.push(extract_text(&name_node, source).to_string());
                    }
                }
            }
            "import_from_statement" => {
                if let Some(module) = node.child_by_field_name("module_name") {
                    let module_name = match module.kind() {
                        "dotted_name" => Some(module),
                        // `from .pkg import x` keeps `pkg`; `from . import x` names no module
                        "relative_import" => find_child_by_kind(&module, "dotted_name"),
                        _ => None,
                    };
                    if let Some(module_name) = module_name {
                        imports.push(extract_text(&module_name, source).to_string());
                    }
                }
            }
            _ => {}
        });

        imports
    }

    fn extract_classes(&self, root: &TSNode, source: &[u8]) -> Vec<ClassFacts> {
        let mut classes = Vec::new();

        for_each_descendant(*root, &mut |node| {
            if node.kind() == "class_definition" {
                if let Some(class) = self.process_class(&node, source) {
                    classes.push(class);
                }
            }
        });

        classes
    }

    fn process_class(&self, class_node: &TSNode, source: &[u8]) -> Option<ClassFacts> {
        let name_node = class_node.child_by_field_name("name")?;
        let name = extract_text(&name_node, source).to_string();

        let mut bases = Vec::new();
        if let Some(superclasses) = class_node.child_by_field_name("superclasses") {
            for arg in named_children(&superclasses) {
                let base = match arg.kind() {
                    "identifier" => Some(arg),
                    "attribute" => arg.child_by_field_name("attribute"),
                    _ => None,
                };
                if let Some(base) = base {
                    bases.push(extract_text(&base, source).to_string());
                }
            }
        }

        let methods = self
            .class_methods(class_node)
            .iter()
            .filter_map(|method| self.method_signature(method, source))
            .collect();

        Some(ClassFacts {
            name,
            bases,
            methods,
            line_number: class_node.start_position().row + 1,
        })
    }

    /// Direct `def` children of a class body, decorators unwrapped.
    fn class_methods<'a>(&self, class_node: &TSNode<'a>) -> Vec<TSNode<'a>> {
        let Some(body) = class_node.child_by_field_name("body") else {
            return Vec::new();
        };
        named_children(&body)
            .into_iter()
            .map(undecorated)
            .filter(|child| child.kind() == "function_definition")
            .collect()
    }

    fn method_signature(&self, func_node: &TSNode, source: &[u8]) -> Option<String> {
        let name_node = func_node.child_by_field_name("name")?;
        let name = extract_text(&name_node, source);
        let visibility = if name.starts_with('_') { '-' } else { '+' };
        let params = self.positional_parameters(func_node, source);
        Some(format!("{}{}({})", visibility, name, params.join(", ")))
    }

    /// Positional parameter names, stopping at `*`, `*args` or `**kwargs`, without `self`.
    fn positional_parameters(&self, func_node: &TSNode, source: &[u8]) -> Vec<String> {
        let Some(parameters) = func_node.child_by_field_name("parameters") else {
            return Vec::new();
        };

        let mut names = Vec::new();
        for param in named_children(&parameters) {
            let name_node = match param.kind() {
                "identifier" => Some(param),
                "typed_parameter" => match param.named_child(0) {
                    Some(inner) if inner.kind() == "identifier" => Some(inner),
                    Some(_) => break,
                    None => None,
                },
                "default_parameter" | "typed_default_parameter" => {
                    param.child_by_field_name("name")
                }
                "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
                _ => None,
            };

            if let Some(name_node) = name_node {
                let name = extract_text(&name_node, source);
                if name != RECEIVER {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    fn extract_callables(&self, root: &TSNode, source: &[u8]) -> Vec<CallableFacts> {
        let mut callables = Vec::new();

        for child in named_children(root).into_iter().map(undecorated) {
            match child.kind() {
                "function_definition" => {
                    if let Some(callable) = self.process_callable(&child, source, None) {
                        callables.push(callable);
                    }
                }
                "class_definition" => {
                    let Some(class_name) = child
                        .child_by_field_name("name")
                        .map(|name| extract_text(&name, source).to_string())
                    else {
                        continue;
                    };
                    for method in self.class_methods(&child) {
                        if let Some(callable) =
                            self.process_callable(&method, source, Some(&class_name))
                        {
                            callables.push(callable);
                        }
                    }
                }
                _ => {}
            }
        }

        callables
    }

    fn process_callable(
        &self,
        func_node: &TSNode,
        source: &[u8],
        class_name: Option<&str>,
    ) -> Option<CallableFacts> {
        let name_node = func_node.child_by_field_name("name")?;
        let name = extract_text(&name_node, source);
        let qualified_name = match class_name {
            Some(class_name) => format!("{}.{}", class_name, name),
            None => name.to_string(),
        };

        Some(CallableFacts {
            qualified_name,
            class_name: class_name.map(str::to_string),
            callees: self.extract_calls(func_node, source, class_name),
            line_number: func_node.start_position().row + 1,
        })
    }

    /// Candidate callees of every call expression below `func_node`.
    ///
    /// `f()` yields `f`, `obj.m()` yields `obj.m`, and `self.m()` inside a method
    /// yields `Class.m`. Calls through longer chains or call results are ignored.
    fn extract_calls(
        &self,
        func_node: &TSNode,
        source: &[u8],
        current_class: Option<&str>,
    ) -> Vec<String> {
        let mut callees = Vec::new();

        for_each_descendant(*func_node, &mut |node| {
            if node.kind() != "call" {
                return;
            }
            let Some(function) = node.child_by_field_name("function") else {
                return;
            };

            match function.kind() {
                "identifier" => callees.push(extract_text(&function, source).to_string()),
                "attribute" => {
                    let (Some(object), Some(attribute)) = (
                        function.child_by_field_name("object"),
                        function.child_by_field_name("attribute"),
                    ) else {
                        return;
                    };
                    if object.kind() != "identifier" {
                        return;
                    }

                    let receiver = extract_text(&object, source);
                    let attribute = extract_text(&attribute, source);
                    match current_class {
                        Some(class_name) if receiver == RECEIVER => {
                            callees.push(format!("{}.{}", class_name, attribute))
                        }
                        _ => callees.push(format!("{}.{}", receiver, attribute)),
                    }
                }
                _ => {}
            }
        });

        callees
    }
}

impl LanguageParser for PythonParser {
    fn parse_source(&self, source: &str) -> ParseOutcome {
        let mut parser = TreeSitterParser::new(tree_sitter_python::language()).map_err(|err| {
            SkipReason::Unreadable {
                message: err.to_string(),
            }
        })?;
        let tree = parser.parse_source(source).ok_or(SkipReason::NoTree)?;

        let root_node = tree.root_node();
        if let Some(line) = first_error_line(&root_node) {
            return Err(SkipReason::SyntaxError { line });
        }

        let source_bytes = source.as_bytes();
        Ok(UnitFacts {
            imports: self.extract_imports(&root_node, source_bytes),
            classes: self.extract_classes(&root_node, source_bytes),
            callables: self.extract_callables(&root_node, source_bytes),
        })
    }

    fn language_name(&self) -> &str {
        "python"
    }
}
