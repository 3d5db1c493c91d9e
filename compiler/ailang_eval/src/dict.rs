//! Built-in class dictionaries (§4.C, §4.D `BUILTIN_INSTANCES`).
//!
//! Each dictionary backs the methods [`ailang_types::lowering`] names when
//! it rewrites an operator into a `DictApp`: `add`/`sub`/`mul`/`neg` for
//! `Num`, `div` for `Fractional`, `mod` for `Integral`, `eq`/`neq` for `Eq`,
//! `lt`/`le`/`gt`/`ge` for `Ord`, `show` for `Show`. The linker registers
//! the same sixteen `(class, type)` pairs as [`ailang_link::DictionarySource::Builtin`];
//! this module is what actually backs them at call time.

use std::rc::Rc;

use ailang_ir::{Interner, Name, Type};
use rustc_hash::FxHashMap;

use crate::errors::RuntimeError;
use crate::value::{Callable, DictValue, NativeFn, Value};

fn as_int(v: &Value) -> Result<i64, RuntimeError> {
    match v {
        Value::Int(n) => Ok(*n),
        other => Err(RuntimeError::type_mismatch("Int", other.type_name(), None)),
    }
}

fn as_float(v: &Value) -> Result<f64, RuntimeError> {
    match v {
        Value::Float(n) => Ok(*n),
        other => Err(RuntimeError::type_mismatch("Float", other.type_name(), None)),
    }
}

fn native(name: &'static str, arity: usize, call: impl Fn(&[Value]) -> Result<Value, RuntimeError> + 'static) -> Callable {
    Callable::Native(Rc::new(NativeFn { name, arity, call: Box::new(call) }))
}

fn arg(args: &[Value], i: usize) -> Result<&Value, RuntimeError> {
    args.get(i).ok_or_else(|| RuntimeError::type_mismatch("argument", "nothing", None))
}

/// Builds the native dictionary for `(class, ty)` if it is one of the
/// fixed built-in instances (§4.D `BUILTIN_INSTANCES`); `None` for anything
/// else (user `instance` declarations are linked by [`ailang_link`], not
/// this module).
#[must_use]
pub fn builtin_dict(class: Name, ty: &Type, interner: &Interner) -> Option<DictValue> {
    let Type::Con(con) = ty else { return None };
    let is_int = *con == Name::INT;
    let is_float = *con == Name::FLOAT;
    let is_bool = *con == Name::BOOL;
    let is_string = *con == Name::STRING;

    let mut methods: FxHashMap<Name, Callable> = FxHashMap::default();

    if class == Name::NUM && (is_int || is_float) {
        if is_int {
            methods.insert(interner.intern("add"), native("add", 2, |a| Ok(Value::Int(as_int(arg(a, 0)?)? + as_int(arg(a, 1)?)?))));
            methods.insert(interner.intern("sub"), native("sub", 2, |a| Ok(Value::Int(as_int(arg(a, 0)?)? - as_int(arg(a, 1)?)?))));
            methods.insert(interner.intern("mul"), native("mul", 2, |a| Ok(Value::Int(as_int(arg(a, 0)?)? * as_int(arg(a, 1)?)?))));
            methods.insert(interner.intern("neg"), native("neg", 1, |a| Ok(Value::Int(-as_int(arg(a, 0)?)?))));
        } else {
            methods.insert(interner.intern("add"), native("add", 2, |a| Ok(Value::Float(as_float(arg(a, 0)?)? + as_float(arg(a, 1)?)?))));
            methods.insert(interner.intern("sub"), native("sub", 2, |a| Ok(Value::Float(as_float(arg(a, 0)?)? - as_float(arg(a, 1)?)?))));
            methods.insert(interner.intern("mul"), native("mul", 2, |a| Ok(Value::Float(as_float(arg(a, 0)?)? * as_float(arg(a, 1)?)?))));
            methods.insert(interner.intern("neg"), native("neg", 1, |a| Ok(Value::Float(-as_float(arg(a, 0)?)?))));
        }
    } else if class == Name::FRACTIONAL && is_float {
        methods.insert(interner.intern("div"), native("div", 2, |a| Ok(Value::Float(as_float(arg(a, 0)?)? / as_float(arg(a, 1)?)?))));
    } else if class == Name::INTEGRAL && is_int {
        methods.insert(
            interner.intern("mod"),
            native("mod", 2, |a| {
                let b = as_int(arg(a, 1)?)?;
                if b == 0 {
                    return Err(RuntimeError::type_mismatch("nonzero Int", "zero", None));
                }
                Ok(Value::Int(as_int(arg(a, 0)?)? % b))
            }),
        );
    } else if class == Name::EQ && (is_int || is_float || is_bool || is_string) {
        let eq_fn = eq_impl(*con);
        methods.insert(interner.intern("eq"), native("eq", 2, move |a| Ok(Value::Bool(eq_fn(arg(a, 0)?, arg(a, 1)?)?))));
        methods.insert(interner.intern("neq"), native("neq", 2, move |a| Ok(Value::Bool(!eq_fn(arg(a, 0)?, arg(a, 1)?)?))));
    } else if class == Name::ORD && (is_int || is_float) {
        let cmp = ord_impl(*con);
        methods.insert(interner.intern("lt"), native("lt", 2, move |a| Ok(Value::Bool(cmp(arg(a, 0)?, arg(a, 1)?)? == Some(std::cmp::Ordering::Less)))));
        methods.insert(interner.intern("le"), native("le", 2, move |a| Ok(Value::Bool(matches!(cmp(arg(a, 0)?, arg(a, 1)?)?, Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal))))));
        methods.insert(interner.intern("gt"), native("gt", 2, move |a| Ok(Value::Bool(cmp(arg(a, 0)?, arg(a, 1)?)? == Some(std::cmp::Ordering::Greater)))));
        methods.insert(interner.intern("ge"), native("ge", 2, move |a| Ok(Value::Bool(matches!(cmp(arg(a, 0)?, arg(a, 1)?)?, Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal))))));
    } else if class == Name::SHOW && (is_int || is_float || is_bool || is_string) {
        let show_fn = show_impl(*con);
        methods.insert(interner.intern("show"), native("show", 1, move |a| Ok(Value::str(show_fn(arg(a, 0)?)?))));
    } else {
        return None;
    }

    Some(DictValue { class, ty_name: interner.resolve(*con), methods, derived_eq_from: None })
}

type EqFn = fn(&Value, &Value) -> Result<bool, RuntimeError>;
type OrdFn = fn(&Value, &Value) -> Result<Option<std::cmp::Ordering>, RuntimeError>;
type ShowFn = fn(&Value) -> Result<String, RuntimeError>;

fn eq_impl(con: Name) -> EqFn {
    if con == Name::INT {
        |a, b| Ok(as_int(a)? == as_int(b)?)
    } else if con == Name::FLOAT {
        // IEEE semantics: NaN != NaN falls straight out of `f64`'s `PartialEq`.
        |a, b| Ok(as_float(a)? == as_float(b)?)
    } else if con == Name::BOOL {
        |a, b| match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => Ok(x == y),
            (other, _) => Err(RuntimeError::type_mismatch("Bool", other.type_name(), None)),
        }
    } else {
        |a, b| match (a, b) {
            (Value::Str(x), Value::Str(y)) => Ok(x == y),
            (other, _) => Err(RuntimeError::type_mismatch("String", other.type_name(), None)),
        }
    }
}

fn ord_impl(con: Name) -> OrdFn {
    if con == Name::INT {
        |a, b| Ok(Some(as_int(a)?.cmp(&as_int(b)?)))
    } else {
        |a, b| Ok(as_float(a)?.partial_cmp(&as_float(b)?))
    }
}

fn show_impl(con: Name) -> ShowFn {
    if con == Name::INT {
        |v| Ok(as_int(v)?.to_string())
    } else if con == Name::FLOAT {
        |v| Ok(as_float(v)?.to_string())
    } else if con == Name::BOOL {
        |v| match v {
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(RuntimeError::type_mismatch("Bool", other.type_name(), None)),
        }
    } else {
        |v| match v {
            Value::Str(s) => Ok(format!("{s:?}")),
            other => Err(RuntimeError::type_mismatch("String", other.type_name(), None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(dict: &DictValue, interner: &Interner, method: &str, args: &[Value]) -> Value {
        let name = interner.intern(method);
        match dict.methods.get(&name).expect("method present") {
            Callable::Native(f) => (f.call)(args).expect("native call succeeds"),
            Callable::Closure(_) => panic!("expected a native method"),
        }
    }

    #[test]
    fn int_add_dict_adds() {
        let interner = Interner::new();
        let dict = builtin_dict(Name::NUM, &Type::int(), &interner).expect("Num@Int dict exists");
        assert!(matches!(call(&dict, &interner, "add", &[Value::Int(2), Value::Int(3)]), Value::Int(5)));
    }

    #[test]
    fn float_eq_treats_nan_as_unequal_to_itself() {
        let interner = Interner::new();
        let dict = builtin_dict(Name::EQ, &Type::float(), &interner).expect("Eq@Float dict exists");
        let nan = Value::Float(f64::NAN);
        assert!(matches!(call(&dict, &interner, "eq", &[nan.clone(), nan]), Value::Bool(false)));
    }

    #[test]
    fn string_show_quotes_the_value() {
        let interner = Interner::new();
        let dict = builtin_dict(Name::SHOW, &Type::string(), &interner).expect("Show@String dict exists");
        let shown = call(&dict, &interner, "show", &[Value::str("hi")]);
        assert!(matches!(shown, Value::Str(s) if s.as_ref() == "\"hi\""));
    }

    #[test]
    fn no_builtin_dict_for_ord_at_bool() {
        let interner = Interner::new();
        assert!(builtin_dict(Name::ORD, &Type::bool(), &interner).is_none());
    }
}
