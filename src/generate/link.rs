//! Collects the helper methods and imports that generated code refers to.

use std::collections::BTreeSet;

use indexmap::IndexMap;

/// A method of the style class that implements one BST builtin. The code is written
/// without indentation; the writer indents it.
#[derive(Debug)]
pub struct Helper {
    pub name: &'static str,
    pub code: &'static str,
    pub imports: &'static [&'static str],
}

/// Every helper and import needed so far. Adding the same helper twice changes nothing.
#[derive(Debug, Default)]
pub struct LinkContainer {
    helpers: IndexMap<&'static str, &'static str>,
    imports: BTreeSet<String>,
}

impl LinkContainer {
    pub fn new() -> Self {
        LinkContainer::default()
    }

    pub fn add_helper(&mut self, helper: &Helper) {
        if self.helpers.contains_key(helper.name) {
            return;
        }

        log::trace!("Linking helper {}", helper.name);
        self.helpers.insert(helper.name, helper.code);
        for import in helper.imports {
            self.add_import(import);
        }
    }

    pub fn add_import(&mut self, import: &str) {
        self.imports.insert(import.to_string());
    }

    /// Helper code, in the order the helpers were first needed.
    pub fn helpers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.helpers.values().copied()
    }

    /// Imports, sorted.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }
}

/* Helpers */

pub const ADD_PERIOD: Helper = Helper {
    name: "addPeriod",
    code: r"String addPeriod(String s) {
    def trimmed = s.replaceAll('[}]+$', '')
    if (trimmed.isEmpty() || trimmed[-1] in ['.', '?', '!']) {
        return s
    }
    return s + '.'
}
",
    imports: &[],
};

pub const IS_EMPTY: Helper = Helper {
    name: "isEmpty",
    code: r"int isEmpty(String s) {
    return s == null || s.trim().isEmpty() ? 1 : 0
}
",
    imports: &[],
};

/// Field reads that are missing from the entry come out of `entry.field` as `null`.
pub const IS_MISSING: Helper = Helper {
    name: "isMissing",
    code: r"int isMissing(def value) {
    return value == null ? 1 : 0
}
",
    imports: &[],
};

pub const SUBSTRING: Helper = Helper {
    name: "substring",
    code: r"String substring(String s, int start, int len) {
    int n = s.length()
    if (len <= 0 || start == 0 || start > n || -start > n) {
        return ''
    }
    if (start > 0) {
        return s.substring(start - 1, Math.min(n, start - 1 + len))
    }
    int end = n + start + 1
    return s.substring(Math.max(0, end - len), end)
}
",
    imports: &[],
};

pub const TEXT_LENGTH: Helper = Helper {
    name: "textLength",
    code: r"int textLength(String s) {
    return s.replaceAll(/\\[a-zA-Z]+ ?|[{}\\]/, '').length()
}
",
    imports: &[],
};

pub const TEXT_PREFIX: Helper = Helper {
    name: "textPrefix",
    code: r"String textPrefix(String s, int count) {
    def prefix = new StringBuilder()
    int depth = 0
    int taken = 0
    for (char c : s.toCharArray()) {
        if (taken >= count && depth == 0) {
            break
        }
        if (c == '{') {
            depth++
        } else if (c == '}') {
            depth--
        } else if (taken < count) {
            taken++
        } else {
            continue
        }
        prefix.append(c)
    }
    while (depth-- > 0) {
        prefix.append('}')
    }
    return prefix.toString()
}
",
    imports: &[],
};

pub const CHR_TO_INT: Helper = Helper {
    name: "chrToInt",
    code: r#"int chrToInt(String s) {
    if (s.length() != 1) {
        bibProcessor.warning("chr.to.int\$ needs a single character, got '${s}'")
        return 0
    }
    return (int) s.charAt(0)
}
"#,
    imports: &[],
};

pub const INT_TO_CHR: Helper = Helper {
    name: "intToChr",
    code: r"String intToChr(int i) {
    return String.valueOf((char) i)
}
",
    imports: &[],
};

pub const CALL_TYPE: Helper = Helper {
    name: "callType",
    code: r"void callType(def entry) {
    def handler = types[entry.type] ?: types['default.type']
    if (handler != null) {
        handler(entry)
    }
}
",
    imports: &[],
};

pub const FORMAT_NAME: Helper = Helper {
    name: "formatName",
    code: r#"String formatName(String names, int index, String format) {
    def list = new NameList(names)
    if (index < 1 || index > list.size()) {
        bibProcessor.warning("There is no name ${index} in '${names}'")
        return ''
    }
    return new NameFormatter(format).format(list.get(index - 1))
}
"#,
    imports: &["bibtex.names.NameFormatter", "bibtex.names.NameList"],
};

pub const NUM_NAMES: Helper = Helper {
    name: "numNames",
    code: r"int numNames(String names) {
    return new NameList(names).size()
}
",
    imports: &["bibtex.names.NameList"],
};
