//! Writes the compiled style as a Groovy script.
//!
//! The script defines one class holding the globals, one method per BST function, the
//! helper methods the functions need, and a `run()` method built from the top level
//! commands. The last line instantiates the class with the runtime objects and runs it.

pub mod link;
mod names;


pub use link::{Helper, LinkContainer};
pub use names::NameTable;

use crate::error::GenerateError;
use crate::gcode::{quote_string, ReturnType, VarTable, INDENT};
use crate::CompilationEnvironment;

/// Something generated code can be written to.
///
/// Writing takes a list of pieces, so that callers can build lines without formatting
/// them into a temporary string first.
pub trait CodeWriter {
    fn write(&mut self, parts: &[&str]) -> Result<(), GenerateError>;
}

impl<W: std::io::Write> CodeWriter for W {
    fn write(&mut self, parts: &[&str]) -> Result<(), GenerateError> {
        for part in parts {
            self.write_all(part.as_bytes())?;
        }

        Ok(())
    }
}

/// Writes a whole [`CompilationEnvironment`] as one Groovy script.
pub struct StyleWriter<'a> {
    env: &'a CompilationEnvironment,
}

impl<'a> StyleWriter<'a> {
    pub fn new(env: &'a CompilationEnvironment) -> Self {
        StyleWriter { env }
    }

    pub fn write(&self, out: &mut dyn CodeWriter) -> Result<(), GenerateError> {
        let class_name = self.env.options.class_name.as_str();

        self.write_header(out)?;
        self.write_imports(out)?;

        out.write(&["class ", class_name, " {\n"])?;
        out.write(&[INDENT, "def bibDB\n", INDENT, "def bibWriter\n", INDENT, "def bibProcessor\n"])?;

        self.write_globals(out)?;
        self.write_types(out)?;
        self.write_constructor(out, class_name)?;

        for function in &self.env.functions {
            out.write(&["\n"])?;
            function.print(out, INDENT)?;
        }

        for helper in self.env.links.helpers() {
            out.write(&["\n"])?;
            write_indented(out, helper)?;
        }

        out.write(&["\n", INDENT, "void run() {\n"])?;
        self.env.run.print(out, &format!("{INDENT}{INDENT}"), &VarTable::default())?;
        out.write(&[INDENT, "}\n", "}\n"])?;

        out.write(&["\nnew ", class_name, "(bibDB, bibWriter, bibProcessor).run()\n"])
    }

    fn write_header(&self, out: &mut dyn CodeWriter) -> Result<(), GenerateError> {
        out.write(&["// Generated by bstgroovy from ", &self.env.source_name, "\n"])?;

        if !self.env.comments.is_empty() {
            out.write(&["//\n"])?;
        }
        for comment in &self.env.comments {
            if comment.is_empty() {
                out.write(&["//\n"])?;
            } else {
                out.write(&["// ", comment, "\n"])?;
            }
        }

        out.write(&["\n"])
    }

    fn write_imports(&self, out: &mut dyn CodeWriter) -> Result<(), GenerateError> {
        let mut any = false;
        for import in self.env.links.imports() {
            out.write(&["import ", import, "\n"])?;
            any = true;
        }

        if any {
            out.write(&["\n"])?;
        }

        Ok(())
    }

    fn write_globals(&self, out: &mut dyn CodeWriter) -> Result<(), GenerateError> {
        if !self.env.globals.is_empty() {
            out.write(&["\n"])?;
        }

        for (name, ty) in &self.env.globals {
            let init = if *ty == ReturnType::Int { "0" } else { "''" };
            out.write(&[INDENT, ty.groovy(), " ", name, " = ", init, "\n"])?;
        }

        Ok(())
    }

    /// The map from entry type to the function that formats it, sorted by type.
    fn write_types(&self, out: &mut dyn CodeWriter) -> Result<(), GenerateError> {
        if self.env.types.is_empty() {
            if self.env.links.has_helper(link::CALL_TYPE.name) {
                out.write(&["\n", INDENT, "def types = [:]\n"])?;
            }
            return Ok(());
        }

        out.write(&["\n", INDENT, "def types = [\n"])?;
        for (bst_name, groovy_name) in &self.env.types {
            out.write(&[INDENT, INDENT, &quote_string(bst_name), " : { entry -> ", groovy_name, "(entry) },\n"])?;
        }
        out.write(&[INDENT, "]\n"])
    }

    fn write_constructor(&self, out: &mut dyn CodeWriter, class_name: &str) -> Result<(), GenerateError> {
        let body = format!("{INDENT}{INDENT}");

        out.write(&["\n", INDENT, class_name, "(bibDB, bibWriter, bibProcessor) {\n"])?;
        out.write(&[&body, "this.bibDB = bibDB\n"])?;
        out.write(&[&body, "this.bibWriter = bibWriter\n"])?;
        out.write(&[&body, "this.bibProcessor = bibProcessor\n"])?;

        for (name, value) in &self.env.macros {
            out.write(&[&body, "bibDB.storeString(", &quote_string(name), ", ", &quote_string(value), ")\n"])?;
        }
        for (name, value) in &self.env.options.options {
            out.write(&[&body, "bibProcessor.setOption(", &quote_string(name), ", ", &quote_string(value), ")\n"])?;
        }

        out.write(&[INDENT, "}\n"])
    }
}

/// Writes unindented code one level deep. Blank lines stay blank.
fn write_indented(out: &mut dyn CodeWriter, code: &str) -> Result<(), GenerateError> {
    for line in code.lines() {
        if line.is_empty() {
            out.write(&["\n"])?;
        } else {
            out.write(&[INDENT, line, "\n"])?;
        }
    }

    Ok(())
}
