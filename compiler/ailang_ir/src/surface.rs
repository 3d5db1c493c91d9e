//! The surface AST: the parser's output, and the elaborator's input (§4.A).
//!
//! Unlike `Core`, the surface tree is a plain owned tree (`Box` indirection)
//! since it is short-lived — consumed once by the elaborator and then
//! dropped. No ANF discipline applies here yet.

use crate::literal::Literal;
use crate::name::Name;
use crate::pattern::Pattern;
use crate::span::Span;

/// A type as written in source: annotations, instance heads, type defs.
#[derive(Clone, Debug)]
pub enum ParsedType {
    Con(Name),
    App(Name, Vec<ParsedType>),
    Fun {
        params: Vec<ParsedType>,
        ret: Box<ParsedType>,
        /// Effect labels written in `! {IO, FS}`; `None` means unannotated
        /// (inferred), `Some(vec![])` means explicitly pure.
        effect: Option<Vec<Name>>,
    },
    Record {
        fields: Vec<(Name, ParsedType)>,
        open: bool,
    },
    Tuple(Vec<ParsedType>),
}

#[derive(Clone, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: Option<ParsedType>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Clone, Debug)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    Concat,
    And,
    Or,
}

#[derive(Clone, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Var(Name),
    Lit(Literal),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `func(x: T, ...) -> R { body }` (§4.A anonymous-function desugaring).
    FuncLit {
        params: Vec<Param>,
        ret: Option<ParsedType>,
        effect: Option<Vec<Name>>,
        body: Box<Expr>,
    },
    /// `{ e1; e2; ...; en }` (§4.A block desugaring).
    Block(Vec<Expr>),
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Match {
        scrutinee: Box<Expr>,
        arms: Vec<MatchArm>,
    },
    Let {
        name: Name,
        ty: Option<ParsedType>,
        value: Box<Expr>,
        body: Box<Expr>,
    },
    /// `letrec f1 = ...; f2 = ... in body` (§4.A recursive bindings).
    LetRec {
        bindings: Vec<(Name, Expr)>,
        body: Box<Expr>,
    },
    Record {
        fields: Vec<(Name, Expr)>,
    },
    RecordAccess {
        record: Box<Expr>,
        label: Name,
    },
    /// `{ base | l: v }` (§4.A record update).
    RecordUpdate {
        base: Box<Expr>,
        updates: Vec<(Name, Expr)>,
    },
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
}

#[derive(Clone, Debug)]
pub struct FuncDecl {
    pub name: Name,
    pub params: Vec<Param>,
    pub ret: Option<ParsedType>,
    pub effect: Option<Vec<Name>>,
    pub body: Expr,
    pub exported: bool,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct LetDecl {
    pub name: Name,
    pub ty: Option<ParsedType>,
    pub value: Expr,
    pub exported: bool,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct TypeDecl {
    pub name: Name,
    pub constructors: Vec<(Name, Vec<ParsedType>)>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct InstanceDecl {
    pub class: Name,
    pub head: ParsedType,
    pub methods: Vec<FuncDecl>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum Decl {
    Func(FuncDecl),
    Let(LetDecl),
    Type(TypeDecl),
    Instance(InstanceDecl),
}

#[derive(Clone, Debug)]
pub struct Import {
    pub module_path: Name,
    pub names: crate::module::ImportNames,
    pub span: Span,
}

/// Parser output for one source file: either a `module` file or a script
/// (§6 "Source file format").
#[derive(Clone, Debug)]
pub struct Module {
    /// `None` for a script (no `module <path>` header).
    pub path: Option<Name>,
    pub imports: Vec<Import>,
    pub decls: Vec<Decl>,
    /// Present only for scripts: the single top-level expression.
    pub script_expr: Option<Expr>,
}

impl Module {
    #[must_use]
    pub fn is_script(&self) -> bool {
        self.path.is_none()
    }
}
