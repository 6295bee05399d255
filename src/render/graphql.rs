use crate::operation::{OperationDocument, RootOperation};
use crate::selection::Selection;

use super::operation_type_name;

const INDENT: &str = "  ";

/// Formats `doc` as GraphQL text, without a trailing newline.
pub fn format_operation(doc: &OperationDocument, name: Option<&str>) -> String {
    let mut out = doc.kind.to_string();
    if let Some(name) = name {
        out.push(' ');
        out.push_str(name);
    }
    if !doc.variables.is_empty() {
        if name.is_none() {
            out.push(' ');
        }
        let vars = doc
            .variables
            .iter()
            .map(|v| match &v.default_value {
                Some(default) => format!("${}: {} = {default}", v.name, v.ty),
                None => format!("${}: {}", v.name, v.ty),
            })
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("({vars})"));
    }
    out.push_str(" {\n");
    write_selection(&mut out, &doc.selection, 1);
    out.push('}');
    out
}

/// Every operation as a named document, separated by blank lines.
pub fn format_document(operations: &[RootOperation]) -> String {
    let mut out = String::new();
    for op in operations {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("# {}\n", op.path()));
        out.push_str(&format_operation(&op.document, Some(&operation_type_name(op))));
        out.push('\n');
    }
    out
}

fn write_selection(out: &mut String, sel: &Selection, depth: usize) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(&sel.name);
    if !sel.arguments.is_empty() {
        let args = sel
            .arguments
            .iter()
            .map(|a| format!("{}: ${}", a.name, a.variable))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("({args})"));
    }
    if sel.is_leaf() {
        out.push('\n');
        return;
    }
    out.push_str(" {\n");
    for child in &sel.children {
        write_selection(out, child, depth + 1);
    }
    out.push_str(&INDENT.repeat(depth));
    out.push_str("}\n");
}
