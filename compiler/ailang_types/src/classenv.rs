//! The class environment: built-in instances for the five core classes
//! (`Num`, `Fractional`, `Integral`, `Eq`, `Ord`, `Show`) at the four
//! primitive types, plus whatever `instance` declarations the module being
//! checked registers.

use ailang_ir::{InstanceDecl, Name, Type};

#[derive(Default)]
pub struct ClassEnv {
    user: Vec<InstanceDecl>,
}

impl ClassEnv {
    #[must_use]
    pub fn new() -> Self {
        ClassEnv::default()
    }

    pub fn register_module_instances<'a>(
        &mut self,
        instances: impl Iterator<Item = &'a InstanceDecl>,
    ) {
        self.user.extend(instances.cloned());
    }

    #[must_use]
    pub fn has_instance(&self, class: Name, ty: &Type) -> bool {
        if let Type::Con(con) = ty {
            if builtin_instance(class, *con) {
                return true;
            }
        }
        self.user
            .iter()
            .any(|inst| inst.class == class && &inst.head_type == ty)
    }
}

fn builtin_instance(class: Name, con: Name) -> bool {
    let is_int = con == Name::INT;
    let is_float = con == Name::FLOAT;
    let is_bool = con == Name::BOOL;
    let is_string = con == Name::STRING;
    if class == Name::NUM {
        is_int || is_float
    } else if class == Name::FRACTIONAL {
        is_float
    } else if class == Name::INTEGRAL {
        is_int
    } else if class == Name::EQ || class == Name::ORD || class == Name::SHOW {
        is_int || is_float || is_bool || is_string
    } else {
        false
    }
}

/// A stable string key identifying one `(class, type)` instance, for the
/// linker's dictionary registry (§4.D) and `ResolvedConstraint::instance_key`.
#[must_use]
pub fn instance_key(class: Name, ty: &Type) -> String {
    format!("{}@{ty:?}", class.raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_has_num_eq_ord_show_but_not_fractional() {
        let env = ClassEnv::new();
        assert!(env.has_instance(Name::NUM, &Type::int()));
        assert!(env.has_instance(Name::EQ, &Type::int()));
        assert!(env.has_instance(Name::ORD, &Type::int()));
        assert!(env.has_instance(Name::SHOW, &Type::int()));
        assert!(!env.has_instance(Name::FRACTIONAL, &Type::int()));
    }

    #[test]
    fn float_has_fractional_but_not_integral() {
        let env = ClassEnv::new();
        assert!(env.has_instance(Name::FRACTIONAL, &Type::float()));
        assert!(!env.has_instance(Name::INTEGRAL, &Type::float()));
    }

    #[test]
    fn string_has_eq_ord_show_but_no_num() {
        let env = ClassEnv::new();
        assert!(env.has_instance(Name::EQ, &Type::string()));
        assert!(!env.has_instance(Name::NUM, &Type::string()));
    }

    #[test]
    fn user_instance_is_registered() {
        let mut env = ClassEnv::new();
        let point = Type::Con(Name::from_raw(500));
        let inst = InstanceDecl {
            class: Name::EQ,
            head_type: point.clone(),
            methods: Vec::new(),
            span: ailang_ir::Span::new(0, 0),
        };
        env.register_module_instances(std::iter::once(&inst));
        assert!(env.has_instance(Name::EQ, &point));
    }
}
