//! Top level module which organizes compiling a BST style in the correct order.
//!
//! A BST program is a list of commands that must be processed front to back: a name
//! can only be used after it is declared. [`CompilationEnvironment`] receives the
//! commands one at a time and tracks everything learned from them. Once all commands
//! are in, the environment is written out as a Groovy script.

// I use `cargo clippy -- -D clippy::pedantic`
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::upper_case_acronyms,
    clippy::match_wildcard_for_single_variants,
    clippy::new_without_default,
    clippy::len_without_is_empty
)]

mod analysis;
mod ast;
mod gcode;
mod generate;
mod optimize;
mod token;

pub mod error;

use std::collections::BTreeMap;

use analysis::{Compiler, CompilerTable, Evaluator, VarManager};
use ast::{CommandHandler, CommandKind, TokenListAST};
use error::AnalysisError;
pub use error::CompileError;
use gcode::{CodeBlock, GFunction, ReturnType};
use generate::{LinkContainer, NameTable, StyleWriter};
use token::Span;

/// Settings for one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Whether to run the optimizer over every function.
    pub optimize: bool,
    /// The name of the generated class.
    pub class_name: String,
    /// Options handed to `bibProcessor.setOption` before the style runs, in order.
    pub options: Vec<(String, String)>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions { optimize: true, class_name: "Style".to_string(), options: vec![] }
    }
}

/// `CompilationEnvironment` tracks all learned information about the compiling style.
///
/// It should be understood that this represents all of the *currently known*
/// information: each command handled adds to it, and nothing is ever taken away.
struct CompilationEnvironment {
    options: CompileOptions,
    /// The path (or pseudo path) of the input, for the generated header.
    source_name: String,
    /// The `%` comments at the top of the input.
    comments: Vec<String>,
    /// What every known name means.
    compilers: CompilerTable,
    /// The variables of the function being analyzed.
    vars: VarManager,
    /// Helpers and imports needed by the code so far.
    links: LinkContainer,
    /// Groovy names of functions and globals.
    names: NameTable,
    /// Functions, in the order they were defined.
    functions: Vec<GFunction>,
    /// Entry type to the Groovy name of its function. Sorted, so the output is stable.
    types: BTreeMap<String, String>,
    /// Globals by Groovy name, in declaration order.
    globals: Vec<(String, ReturnType)>,
    macros: Vec<(String, String)>,
    /// The body of `run()`.
    run: CodeBlock,
}

impl CompilationEnvironment {
    /// Constructs a new, empty `CompilationEnvironment`.
    fn new(source_name: &str, options: &CompileOptions) -> Self {
        let mut names = NameTable::new();
        names.reserve(&options.class_name);
        for helper in HELPER_NAMES {
            names.reserve(helper);
        }

        CompilationEnvironment {
            options: options.clone(),
            source_name: source_name.to_string(),
            comments: vec![],
            compilers: CompilerTable::new(),
            vars: VarManager::new(),
            links: LinkContainer::new(),
            names,
            functions: vec![],
            types: BTreeMap::new(),
            globals: vec![],
            macros: vec![],
            run: CodeBlock::new(),
        }
    }

    /// Tokenizes, builds, and analyzes the whole input.
    fn import(&mut self, input: &str) -> Result<(), CompileError> {
        self.comments = token::leading_comments(input);

        log::info!("Tokenizing {}", self.source_name);
        let tokens = token::tokenize(input, &self.source_name)?;

        log::info!("Building the syntax tree of {} tokens", tokens.len());
        let ast = ast::build_ast(&tokens)?;

        log::info!("Analyzing {} commands", ast.commands.len());
        ast.parse(self)?;

        Ok(())
    }

    fn generate(&self) -> Result<String, CompileError> {
        log::info!("Writing {} functions", self.functions.len());

        let mut out: Vec<u8> = vec![];
        StyleWriter::new(self).write(&mut out)?;

        String::from_utf8(out).map_err(|_| "Generated code is not valid UTF-8".into())
    }

    /// Declares every name in an `INTEGERS`, `STRINGS`, or `ENTRY` list.
    fn declare_names(&mut self, names: &TokenListAST, make: impl Fn(&mut Self, &str) -> Compiler) -> Result<(), AnalysisError> {
        for token in &names.tokens {
            let Some(name) = token.name() else {
                return Err(AnalysisError::Impossible(format!("{}: '{token}' in a name list", token.span())));
            };

            if self.compilers.contains(name) {
                return Err(AnalysisError::Redefinition(name.to_string()));
            }

            let compiler = make(self, name);
            self.compilers.declare(name, compiler)?;
        }

        Ok(())
    }

    fn declare_global(&mut self, name: &str, ty: ReturnType) -> String {
        let groovy_name = self.names.name(name);
        self.globals.push((groovy_name.clone(), ty));
        groovy_name
    }
}

/// Names of the methods helpers may add to the generated class.
const HELPER_NAMES: &[&str] = &[
    generate::link::ADD_PERIOD.name,
    generate::link::CALL_TYPE.name,
    generate::link::CHR_TO_INT.name,
    generate::link::FORMAT_NAME.name,
    generate::link::INT_TO_CHR.name,
    generate::link::IS_EMPTY.name,
    generate::link::IS_MISSING.name,
    generate::link::NUM_NAMES.name,
    generate::link::SUBSTRING.name,
    generate::link::TEXT_LENGTH.name,
    generate::link::TEXT_PREFIX.name,
];

impl CommandHandler for CompilationEnvironment {
    fn add_entry(&mut self, fields: &TokenListAST, integers: &TokenListAST, strings: &TokenListAST) -> Result<(), AnalysisError> {
        log::debug!("ENTRY with {} fields", fields.tokens.len());

        self.declare_names(fields, |_, _| Compiler::Field)?;
        self.declare_names(integers, |_, _| Compiler::EntryInteger)?;
        self.declare_names(strings, |_, _| Compiler::EntryString)
    }

    fn add_function(&mut self, name: &str, body: &TokenListAST) -> Result<(), AnalysisError> {
        if self.compilers.contains(name) {
            return Err(AnalysisError::Redefinition(name.to_string()));
        }

        let groovy_name = self.names.name(name);
        let evaluator = Evaluator::new(&self.compilers, &mut self.vars, &mut self.links);
        let mut function = evaluator.analyze_function(name, groovy_name, body)?;

        if self.options.optimize {
            optimize::optimize(&mut function);
        }

        let signature = function.signature();
        log::debug!(
            "FUNCTION {name} takes {} values{} and returns {}",
            signature.params.len(),
            if signature.uses_entry { " and the entry" } else { "" },
            signature.result
        );

        if signature.is_type_handler() {
            self.types.insert(name.to_string(), signature.groovy_name.clone());
        }

        self.compilers.declare(name, Compiler::Function(signature))?;
        self.functions.push(function);

        Ok(())
    }

    fn add_integers(&mut self, names: &TokenListAST) -> Result<(), AnalysisError> {
        self.declare_names(names, |env, name| Compiler::GlobalInteger(env.declare_global(name, ReturnType::Int)))
    }

    fn add_strings(&mut self, names: &TokenListAST) -> Result<(), AnalysisError> {
        self.declare_names(names, |env, name| Compiler::GlobalString(env.declare_global(name, ReturnType::String)))
    }

    fn add_macro(&mut self, name: &str, value: &str) -> Result<(), AnalysisError> {
        log::debug!("MACRO {name}");

        match self.macros.iter_mut().find(|(existing, _)| existing == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => self.macros.push((name.to_string(), value.to_string())),
        }

        Ok(())
    }

    fn add_command(&mut self, kind: CommandKind, function: &str, span: &Span) -> Result<(), AnalysisError> {
        log::debug!("{span}: {kind} {function}");

        let evaluator = Evaluator::new(&self.compilers, &mut self.vars, &mut self.links);
        let statements = evaluator.evaluate_command(kind, function)?;
        self.run.statements.extend(statements);

        Ok(())
    }

    fn add_read(&mut self) -> Result<(), AnalysisError> {
        self.run.push(analysis::read_command());
        Ok(())
    }

    fn add_sort(&mut self) -> Result<(), AnalysisError> {
        self.run.push(analysis::sort_command());
        Ok(())
    }
}

/// A simple type wrapping either a file input, or a direct string input.
#[derive(PartialEq, Eq, Hash, Debug)]
enum FileOrString {
    /// Represents input via a file, given by a string.
    File(String),
    /// Represents direct string input. The first string is a "Fake Path" for use
    /// in diagnostics, such as "\<input\>". The second string is the full program.
    String(String, String),
}

fn compile(file: FileOrString, options: &CompileOptions) -> Result<String, CompileError> {
    let (path, input) = match file {
        FileOrString::File(path) => {
            let input = std::fs::read_to_string(&path).map_err(|err| format!("Could not read {path}: {err}"))?;
            (path, input)
        }
        FileOrString::String(path, input) => (path, input),
    };

    let mut env = CompilationEnvironment::new(&path, options);
    env.import(&input)?;
    env.generate()
}

/// Compiles the style at `path` into a Groovy script.
pub fn compile_file(path: &str, options: &CompileOptions) -> Result<String, CompileError> {
    compile(FileOrString::File(path.to_string()), options)
}

/// Compiles a style given as a string into a Groovy script.
pub fn compile_string(input: &str, options: &CompileOptions) -> Result<String, CompileError> {
    compile(FileOrString::String("<input>".to_string(), input.to_string()), options)
}
