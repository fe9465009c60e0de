//! Lint Runner
//!
//! Drives registered checkers over a Python source tree:
//! - File discovery and module naming
//! - Scanning and cross-module class indexing
//! - Class and call traversal
//! - Diagnostic collection with per-message enablement

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::checker::{ArgKind, CallNode, Category, Checker, Linter, MessageDef, MessageSink, Node};
use crate::index::ClassIndex;
use crate::parser::ast::is_constant_string;
use crate::parser::{parse_module, CallSite, Module};

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Convention,
}

impl From<Category> for Severity {
    fn from(category: Category) -> Self {
        match category {
            Category::Error => Severity::Error,
            Category::Warning => Severity::Warning,
            Category::Convention => Severity::Convention,
        }
    }
}

/// A reported message attached to a class definition or a call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub module: String,
    pub obj: String,
    pub line: usize,
    pub column: usize,
    pub path: PathBuf,
    pub symbol: String,
    pub message: String,
    #[serde(rename = "message-id")]
    pub msgid: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {} ({})",
            self.path.display(),
            self.line,
            self.column,
            self.msgid,
            self.message,
            self.symbol
        )
    }
}

/// Outcome of a lint run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LintReport {
    pub diagnostics: Vec<Diagnostic>,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

impl LintReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity != Severity::Error)
    }

    /// Process exit status: bit 2 for errors, bit 4 for anything milder
    pub fn exit_code(&self) -> u8 {
        let mut code = 0;
        if self.has_errors() {
            code |= 2;
        }
        if self.has_warnings() {
            code |= 4;
        }
        code
    }
}

/// A Python source file ready to be scanned
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub module: String,
    pub is_package: bool,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, module: &str, text: impl Into<String>) -> Self {
        let path = path.into();
        let is_package = path.file_stem().and_then(|s| s.to_str()) == Some("__init__");
        Self {
            path,
            module: module.to_string(),
            is_package,
            text: text.into(),
        }
    }

    /// Read a file from disk, deriving its module name from the package layout
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read source file: {}", path.display()))?;
        Ok(Self::new(path, &module_name_for(path), text))
    }
}

/// Dotted module name: the file stem prefixed by every enclosing package
pub fn module_name_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let mut parts = Vec::new();
    if stem != "__init__" {
        parts.push(stem.to_string());
    }

    let mut dir = path.parent();
    while let Some(current) = dir {
        if !current.join("__init__.py").is_file() {
            break;
        }
        match current.file_name().and_then(|s| s.to_str()) {
            Some(name) => parts.push(name.to_string()),
            None => break,
        }
        dir = current.parent();
    }

    if parts.is_empty() {
        return stem.to_string();
    }
    parts.reverse();
    parts.join(".")
}

/// Find every Python file under `paths`, sorted and deduplicated
///
/// Files named explicitly are always included. Hidden directories,
/// `__pycache__` and entries whose name is in `exclude` are skipped.
pub fn discover_files(paths: &[PathBuf], exclude: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            walk_dir(path, exclude, &mut files)?;
        } else {
            bail!("No such file or directory: {}", path.display());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_dir(dir: &Path, exclude: &[String], files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || name == "__pycache__" || exclude.iter().any(|e| *e == name) {
            log::debug!("Skipping excluded path {}", path.display());
            continue;
        }

        if path.is_dir() {
            walk_dir(&path, exclude, files)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some("py") {
            files.push(path);
        }
    }
    Ok(())
}

/// Collects the messages reported for one source file
struct FileSink<'a> {
    source: &'a SourceFile,
    disabled: &'a [String],
    obj: String,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl MessageSink for FileSink<'_> {
    fn add_message(&mut self, message: &MessageDef, node: &dyn Node, args: &[&str]) {
        if !self.is_message_enabled(message) {
            return;
        }
        self.diagnostics.push(Diagnostic {
            severity: message.category.into(),
            module: self.source.module.clone(),
            obj: self.obj.clone(),
            line: node.lineno(),
            column: node.col_offset(),
            path: self.source.path.clone(),
            symbol: message.symbol.to_string(),
            message: message.format(args),
            msgid: message.msgid(),
        });
    }

    fn is_message_enabled(&self, message: &MessageDef) -> bool {
        !self.disabled.iter().any(|name| message.matches(name))
    }
}

impl Node for CallSite {
    fn lineno(&self) -> usize {
        self.line
    }

    fn col_offset(&self) -> usize {
        self.column
    }
}

impl CallNode for CallSite {
    fn func_name(&self) -> Option<&str> {
        Some(&self.func)
    }

    fn first_arg(&self) -> Option<ArgKind> {
        self.first_arg.as_deref().map(|arg| {
            if is_constant_string(arg) {
                ArgKind::ConstString
            } else {
                ArgKind::Other
            }
        })
    }
}

/// A linter over Python sources that runs every registered checker
#[derive(Default)]
pub struct PythonLinter {
    checkers: Vec<Box<dyn Checker>>,
    disabled: Vec<String>,
    exclude: Vec<String>,
}

impl Linter for PythonLinter {
    fn register_checker(&mut self, checker: Box<dyn Checker>) {
        log::debug!("Registered checker {}", checker.name());
        self.checkers.push(checker);
    }
}

impl PythonLinter {
    pub fn new(disabled: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            checkers: Vec::new(),
            disabled,
            exclude,
        }
    }

    /// A linter with this crate's checkers already registered
    pub fn with_default_checkers(disabled: Vec<String>, exclude: Vec<String>) -> Self {
        let mut linter = Self::new(disabled, exclude);
        crate::checker::register_checkers(&mut linter);
        linter
    }

    /// Every message definition of every registered checker
    pub fn messages(&self) -> impl Iterator<Item = (&'static str, &'static MessageDef)> + '_ {
        self.checkers
            .iter()
            .flat_map(|checker| checker.messages().iter().map(move |m| (checker.name(), m)))
    }

    fn warn_unknown_disables(&self) {
        for name in &self.disabled {
            if !self.messages().any(|(_, m)| m.matches(name)) {
                log::warn!("Unknown message '{}' in disable list", name);
            }
        }
    }

    /// Lint every Python file under `paths`
    pub fn lint_paths(&self, paths: &[PathBuf]) -> Result<LintReport> {
        let files = discover_files(paths, &self.exclude)?;

        let mut sources = Vec::with_capacity(files.len());
        let mut skipped = 0;
        for path in &files {
            match SourceFile::read(path) {
                Ok(source) => sources.push(source),
                Err(e) => {
                    log::warn!("{:#}", e);
                    skipped += 1;
                }
            }
        }

        let mut report = self.lint_sources(&sources);
        report.files_skipped = skipped;
        Ok(report)
    }

    /// Lint already-loaded sources as one project
    pub fn lint_sources(&self, sources: &[SourceFile]) -> LintReport {
        self.warn_unknown_disables();

        let modules: Vec<Module> = sources
            .iter()
            .map(|source| {
                log::debug!("Scanning {} as {}", source.path.display(), source.module);
                parse_module(&source.module, source.is_package, &source.text)
            })
            .collect();
        let index = ClassIndex::from_modules(&modules);

        let mut diagnostics = Vec::new();
        for (position, (source, module)) in sources.iter().zip(&modules).enumerate() {
            let mut found = Vec::new();
            for node in index.source_classes(position) {
                let mut sink = FileSink {
                    source,
                    disabled: &self.disabled,
                    obj: node.class().def.qualname.clone(),
                    diagnostics: &mut found,
                };
                for checker in &self.checkers {
                    checker.visit_classdef(&node, &mut sink);
                }
            }
            for call in &module.calls {
                let mut sink = FileSink {
                    source,
                    disabled: &self.disabled,
                    obj: call.scope.clone(),
                    diagnostics: &mut found,
                };
                for checker in &self.checkers {
                    checker.visit_call(call, &mut sink);
                }
            }

            // Stable, so messages on one node keep their reporting order
            found.sort_by_key(|d| (d.line, d.column));
            diagnostics.append(&mut found);
        }

        log::info!(
            "Checked {} file(s), {} class(es), {} diagnostic(s)",
            sources.len(),
            index.len(),
            diagnostics.len()
        );

        LintReport {
            diagnostics,
            files_scanned: sources.len(),
            files_skipped: 0,
        }
    }
}
