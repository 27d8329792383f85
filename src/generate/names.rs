//! Maps BST names to Groovy identifiers.

use std::collections::{HashMap, HashSet};

/// Groovy keywords and literals, plus the names the generated class already uses.
const RESERVED: &[&str] = &[
    "abstract", "as", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const", "continue",
    "def", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally", "float", "for", "goto",
    "if", "implements", "import", "in", "instanceof", "int", "interface", "long", "native", "new", "null", "package",
    "private", "protected", "public", "return", "short", "static", "strictfp", "super", "switch", "synchronized",
    "this", "threadsafe", "throw", "throws", "trait", "transient", "true", "try", "var", "void", "volatile", "while",
    // Members of the generated class.
    "bibDB", "bibWriter", "bibProcessor", "entry", "types", "run", "Style", "String", "Integer", "Math",
];

/// Hands out one Groovy identifier per BST name. Asking twice for the same name gives
/// the same identifier; different names never share one.
#[derive(Debug, Default)]
pub struct NameTable {
    assigned: HashMap<String, String>,
    taken: HashSet<String>,
}

impl NameTable {
    pub fn new() -> Self {
        NameTable::default()
    }

    /// Keeps `name` away from every BST name, e.g. because a helper method uses it.
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    pub fn name(&mut self, bst_name: &str) -> String {
        if let Some(name) = self.assigned.get(bst_name) {
            return name.clone();
        }

        let mut base = camel_case(bst_name);
        if RESERVED.contains(&base.as_str()) || looks_like_variable(&base) {
            base.push('_');
        }

        let mut name = base.clone();
        let mut counter = 1;
        while self.taken.contains(&name) {
            counter += 1;
            name = format!("{base}{counter}");
        }

        self.taken.insert(name.clone());
        self.assigned.insert(bst_name.to_string(), name.clone());
        name
    }
}

/// `format.names` becomes `formatNames`. Characters that cannot appear in a Groovy
/// identifier split words, like `.` does.
fn camel_case(bst_name: &str) -> String {
    let mut name = String::with_capacity(bst_name.len());
    let mut upper_next = false;

    for ch in bst_name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if upper_next && !name.is_empty() {
                name.push(ch.to_ascii_uppercase());
            } else {
                name.push(ch);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }

    if name.is_empty() || name.starts_with(|ch: char| ch.is_ascii_digit()) {
        name.insert(0, '_');
    }

    name
}

/// Parameters and locals are named `p1`, `v2` and so on.
fn looks_like_variable(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some('p' | 'v')) && {
        let rest = chars.as_str();
        !rest.is_empty() && rest.chars().all(|ch| ch.is_ascii_digit())
    }
}
