//! ASCII box-drawing tree renderer (spec.md §6), reproduced bit-for-bit
//! against the golden transcripts in spec.md §8 (S1-S4).

use std::fmt;
use std::sync::Arc;

use super::node::Node;

/// Renders `root` using `value_fmt` to print each terminal's payload. The
/// radix tree wraps the result in parentheses (`(1)`); the suffix tree's
/// `value_fmt` already returns a bracketed list (`[BANANA, BANDANA]`), so the
/// combined output reads `([BANANA, BANDANA])`.
pub fn render<V>(root: &Arc<Node<V>>, value_fmt: &dyn Fn(&V) -> String) -> String {
    let mut out = String::from("○\n");
    render_children(root, "", &mut out, value_fmt);
    out
}

pub fn render_radix<V: fmt::Debug>(root: &Arc<Node<V>>) -> String {
    render(root, &|v| format!("{:?}", v))
}

fn render_children<V>(node: &Node<V>, prefix: &str, out: &mut String, value_fmt: &dyn Fn(&V) -> String) {
    let count = node.children().len();
    for (i, child) in node.children().iter().enumerate() {
        let is_last = i + 1 == count;
        let branch = if is_last { "└── " } else { "├── " };

        out.push_str(prefix);
        out.push_str(branch);
        out.push_str("○ ");
        out.push_str(&child.label().to_string());
        if let Some(value) = child.value() {
            out.push_str(" (");
            out.push_str(&value_fmt(value));
            out.push(')');
        }
        out.push('\n');

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        render_children(child, &child_prefix, out, value_fmt);
    }
}
