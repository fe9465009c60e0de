//! Class Index
//!
//! Cross-module view of every scanned class, used to answer subtype queries.
//! Base expressions are resolved through the defining module's scope:
//! enclosing classes, module-level classes, then import bindings.
//!
//! Two files may claim the same module name (unrelated packages on the lint
//! path). Every class of every file is kept and visited, but name lookups
//! see the first file added.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::checker::{ClassNode, Node};
use crate::parser::{ClassDef, Module};

/// Limit on re-export hops followed while canonicalising a name
const MAX_ALIAS_HOPS: usize = 16;

/// A class together with its module and resolved bases
#[derive(Debug, Clone)]
pub struct IndexedClass {
    /// Position of the defining module in insertion order
    pub source: usize,
    pub module: String,
    pub def: ClassDef,
    /// Fully-qualified name, `module.qualname`
    pub qualname: String,
    /// Fully-qualified base names where resolvable, written text otherwise
    pub bases: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ClassIndex {
    classes: Vec<IndexedClass>,
    by_qualname: HashMap<String, usize>,
    module_imports: HashMap<String, HashMap<String, String>>,
    sources: usize,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over a set of modules
    pub fn from_modules<'a>(modules: impl IntoIterator<Item = &'a Module>) -> Self {
        let mut index = Self::new();
        for module in modules {
            index.add_module(module);
        }
        index
    }

    /// Add every class of a module, returning the module's source position
    pub fn add_module(&mut self, module: &Module) -> usize {
        let source = self.sources;
        self.sources += 1;

        match self.module_imports.entry(module.name.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(module.imports.clone());
            }
            Entry::Occupied(_) => log::warn!(
                "Module {} is defined more than once; names resolve to the first definition",
                module.name
            ),
        }

        for def in &module.classes {
            let bases = def
                .bases
                .iter()
                .map(|base| resolve_base(module, def, base))
                .collect();
            let qualname = qualify(&module.name, &def.qualname);

            self.by_qualname
                .entry(qualname.clone())
                .or_insert(self.classes.len());
            self.classes.push(IndexedClass {
                source,
                module: module.name.clone(),
                def: def.clone(),
                qualname,
                bases,
            });
        }

        source
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, qualname: &str) -> Option<&IndexedClass> {
        self.by_qualname.get(qualname).map(|&idx| &self.classes[idx])
    }

    /// Classes of the module added at position `source`, in source order
    pub fn source_classes(&self, source: usize) -> impl Iterator<Item = ClassRef<'_>> {
        self.classes
            .iter()
            .enumerate()
            .filter(move |(_, class)| class.source == source)
            .map(move |(idx, _)| ClassRef { index: self, idx })
    }

    /// Follow re-exports (`from .tooling import X` in a package) until the
    /// name refers to an indexed class or cannot be followed further
    pub fn canonical_name(&self, name: &str) -> String {
        let mut current = name.to_string();
        for _ in 0..MAX_ALIAS_HOPS {
            if self.by_qualname.contains_key(&current) {
                break;
            }
            let Some((module, attr)) = current.rsplit_once('.') else {
                break;
            };
            match self
                .module_imports
                .get(module)
                .and_then(|imports| imports.get(attr))
            {
                Some(target) if *target != current => current = target.clone(),
                _ => break,
            }
        }
        current
    }

    /// Whether the class named `qualname` is, or derives from, `target`
    pub fn is_subtype_of(&self, qualname: &str, target: &str) -> bool {
        let qualname = self.canonical_name(qualname);
        match self.by_qualname.get(&qualname) {
            Some(&idx) => self.class_is_subtype_of(idx, target),
            None => qualname == self.canonical_name(target),
        }
    }

    /// Subtype query for one indexed class, walking its own resolved bases
    /// even when another class owns its qualified name
    fn class_is_subtype_of(&self, idx: usize, target: &str) -> bool {
        let target = self.canonical_name(target);
        let class = &self.classes[idx];
        if class.qualname == target {
            return true;
        }

        let mut seen = HashSet::from([class.qualname.clone()]);
        let mut stack: Vec<String> = class
            .bases
            .iter()
            .map(|base| self.canonical_name(base))
            .collect();

        while let Some(name) = stack.pop() {
            if name == target {
                return true;
            }
            if !seen.insert(name.clone()) {
                continue;
            }
            if let Some(class) = self.get(&name) {
                stack.extend(class.bases.iter().map(|base| self.canonical_name(base)));
            }
        }

        false
    }
}

/// A borrowed view of one indexed class, usable as a checker node
#[derive(Debug, Clone, Copy)]
pub struct ClassRef<'a> {
    index: &'a ClassIndex,
    idx: usize,
}

impl<'a> ClassRef<'a> {
    pub fn class(&self) -> &'a IndexedClass {
        &self.index.classes[self.idx]
    }
}

impl ClassNode for ClassRef<'_> {
    fn name(&self) -> &str {
        &self.class().def.name
    }

    fn is_subtype_of(&self, qualified_name: &str) -> bool {
        self.index.class_is_subtype_of(self.idx, qualified_name)
    }

    fn docstring(&self) -> Option<&str> {
        self.class().def.docstring.as_deref()
    }
}

impl Node for ClassRef<'_> {
    fn lineno(&self) -> usize {
        self.class().def.line
    }

    fn col_offset(&self) -> usize {
        self.class().def.column
    }
}

fn qualify(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", module, name)
    }
}

/// Resolve a base expression written inside `def` of `module`
fn resolve_base(module: &Module, def: &ClassDef, base: &str) -> String {
    let (head, tail) = match base.split_once('.') {
        Some((head, tail)) => (head, Some(tail)),
        None => (base, None),
    };
    let with_tail = |resolved: String| match tail {
        Some(tail) => format!("{}.{}", resolved, tail),
        None => resolved,
    };

    for scope in &def.enclosing_classes {
        let candidate = format!("{}.{}", scope, head);
        if module.class(&candidate).is_some() {
            return qualify(&module.name, &with_tail(candidate));
        }
    }
    if module.class(head).is_some() {
        return qualify(&module.name, base);
    }
    if let Some(target) = module.imports.get(head) {
        return with_tail(target.clone());
    }
    base.to_string()
}
