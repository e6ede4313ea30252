//! Symbol-table dump format
//!
//! Column widths and row characters are carried over byte-for-byte from
//! the reference tool so golden-file comparisons of analyzer output stay
//! stable.

use crate::symbol::{Scope, SymbolKind};

const RULE_WIDTH: usize = 110;
const NAME_WIDTH: usize = 33;
const KIND_WIDTH: usize = 11;
const TYPE_WIDTH: usize = 17;
const ATTR_WIDTH: usize = 11;

fn rule(c: char) -> String {
    std::iter::repeat_n(c, RULE_WIDTH).collect()
}

/// Render one scope's table the way `popScope` would dump it.
pub fn render_scope(scope: &Scope) -> String {
    let mut out = String::new();
    out.push_str(&rule('='));
    out.push('\n');
    out.push_str(&format!(
        "{:<NAME_WIDTH$}{:<KIND_WIDTH$}{:<KIND_WIDTH$}{:<TYPE_WIDTH$}{:<ATTR_WIDTH$}\n",
        "Name", "Kind", "Level", "Type", "Attribute"
    ));
    out.push_str(&rule('-'));
    out.push('\n');
    for entry in scope.entries_in_order() {
        let kind_word = entry.kind.dump_word().unwrap_or("");
        let level_str = if entry.level == 0 {
            format!("{}(global)", entry.level)
        } else {
            format!("{}(local)", entry.level)
        };
        let attr_str = if entry.kind != SymbolKind::Constant && entry.attribute == "error" {
            ""
        } else {
            entry.attribute.as_str()
        };
        out.push_str(&format!(
            "{:<NAME_WIDTH$}{:<KIND_WIDTH$}{:<KIND_WIDTH$}{:<TYPE_WIDTH$}{:<ATTR_WIDTH$}\n",
            entry.name, kind_word, level_str, entry.ty, attr_str
        ));
    }
    out.push_str(&rule('-'));
    out.push('\n');
    out
}
