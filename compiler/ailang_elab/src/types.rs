//! Resolves surface `ParsedType` annotations to checker-ready `Type`s.
//!
//! A lowercase identifier in type position (`a`, `elem`) names a type
//! variable, scoped to one declaration; an uppercase one (`Int`, `List`)
//! names a constructor. Each call to [`TypeResolver::resolve`] shares one
//! variable scope, so `func id(x: a) -> a` binds the same variable to both
//! occurrences of `a`.

use ailang_ir::surface::ParsedType;
use ailang_ir::{Interner, Name, Row, RowKind, RowVar, Type, TypeVar};
use rustc_hash::FxHashMap;

pub struct TypeResolver<'a, 'b> {
    interner: &'a Interner,
    vars: FxHashMap<Name, TypeVar>,
    next_var: &'b mut u32,
}

impl<'a, 'b> TypeResolver<'a, 'b> {
    pub fn new(interner: &'a Interner, next_var: &'b mut u32) -> Self {
        TypeResolver {
            interner,
            vars: FxHashMap::default(),
            next_var,
        }
    }

    fn fresh_var(&mut self) -> TypeVar {
        let v = TypeVar(*self.next_var);
        *self.next_var += 1;
        v
    }

    fn fresh_row_var(&mut self) -> RowVar {
        RowVar(self.fresh_var().0)
    }

    fn is_lowercase_name(&self, name: Name) -> bool {
        self.interner
            .resolve(name)
            .chars()
            .next()
            .is_some_and(char::is_lowercase)
    }

    pub fn resolve(&mut self, parsed: &ParsedType) -> Type {
        match parsed {
            ParsedType::Con(name) => {
                if self.is_lowercase_name(*name) {
                    Type::Var(self.var_for(*name))
                } else {
                    Type::Con(*name)
                }
            }
            ParsedType::App(name, args) => Type::App(
                Box::new(Type::Con(*name)),
                args.iter().map(|a| self.resolve(a)).collect(),
            ),
            ParsedType::Fun {
                params,
                ret,
                effect,
            } => Type::Fun {
                params: params.iter().map(|p| self.resolve(p)).collect(),
                ret: Box::new(self.resolve(ret)),
                effect: self.resolve_effect_row(effect.as_deref()),
            },
            ParsedType::Record { fields, open } => {
                let labels: Vec<_> = fields
                    .iter()
                    .map(|(label, ty)| (*label, self.resolve(ty)))
                    .collect();
                let row = if *open {
                    Row::open(RowKind::Record, labels, self.fresh_row_var())
                } else {
                    Row::closed(RowKind::Record, labels)
                };
                Type::Record(row)
            }
            ParsedType::Tuple(elems) => {
                Type::Tuple(elems.iter().map(|e| self.resolve(e)).collect())
            }
        }
    }

    fn var_for(&mut self, name: Name) -> TypeVar {
        if let Some(v) = self.vars.get(&name) {
            return *v;
        }
        let fresh = self.fresh_var();
        self.vars.insert(name, fresh);
        fresh
    }

    /// `None` means an uninferred (to-be-solved) effect row; `Some([])`
    /// means explicitly pure; `Some(names)` is a closed effect row.
    fn resolve_effect_row(&mut self, effect: Option<&[Name]>) -> Row {
        match effect {
            None => Row::open(RowKind::Effect, Vec::new(), self.fresh_row_var()),
            Some(names) => {
                let labels = names.iter().map(|n| (*n, Type::unit())).collect();
                Row::closed(RowKind::Effect, labels)
            }
        }
    }
}
