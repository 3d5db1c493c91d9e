//! Modules, declarations, imports, and instances — the Core-level unit the
//! elaborator produces and the loader/linker/type-checker consume.

use crate::core::CoreArena;
use crate::name::Name;
use crate::node_id::NodeId;
use crate::span::Span;
use crate::ty::{Scheme, Type};

#[derive(Clone, Debug)]
pub enum ImportNames {
    All,
    Selective(Vec<Name>),
}

#[derive(Clone, Debug)]
pub struct Import {
    pub module_path: Name,
    pub names: ImportNames,
    pub span: Span,
}

/// A type-class instance declaration: `instance Eq for Point { ... }`.
#[derive(Clone, Debug)]
pub struct InstanceDecl {
    pub class: Name,
    /// Ground head type this instance is declared at (invariant 3).
    pub head_type: Type,
    pub methods: Vec<(Name, NodeId)>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum DeclKind {
    Value {
        body: NodeId,
        /// Filled in by the type checker after generalisation.
        scheme: Option<Scheme>,
    },
    TypeDef {
        /// Constructor name -> field/arg types, for ADT-style type
        /// definitions used by pattern exhaustiveness.
        constructors: Vec<(Name, Vec<Type>)>,
    },
    Instance(InstanceDecl),
}

#[derive(Clone, Debug)]
pub struct Decl {
    pub name: Name,
    pub exported: bool,
    pub kind: DeclKind,
    pub span: Span,
}

/// `{ path, imports: [Import], decls: [Decl], exports: set<Name> }` (§3).
#[derive(Clone, Debug)]
pub struct Module {
    pub path: Name,
    pub imports: Vec<Import>,
    pub decls: Vec<Decl>,
    pub arena: CoreArena,
    /// Script files (no `module` header, §6 "Source file format") have no
    /// path of their own and may not be imported.
    pub is_script: bool,
}

impl Module {
    /// Every name an importer can bring in from this module: each exported
    /// decl's own name, plus — for an exported `TypeDef` — each of its
    /// constructor names, since those are what a `match` pattern actually
    /// references (e.g. `Ok`/`Err`, not the `NetResult` type name itself).
    #[must_use]
    pub fn exported_names(&self) -> Vec<Name> {
        self.decls
            .iter()
            .filter(|d| d.exported)
            .flat_map(|d| {
                let mut names = vec![d.name];
                if let DeclKind::TypeDef { constructors } = &d.kind {
                    names.extend(constructors.iter().map(|(ctor, _)| *ctor));
                }
                names
            })
            .collect()
    }

    #[must_use]
    pub fn find_decl(&self, name: Name) -> Option<&Decl> {
        self.decls.iter().find(|d| d.name == name)
    }

    #[must_use]
    pub fn instances(&self) -> impl Iterator<Item = &InstanceDecl> {
        self.decls.iter().filter_map(|d| match &d.kind {
            DeclKind::Instance(inst) => Some(inst),
            _ => None,
        })
    }
}
