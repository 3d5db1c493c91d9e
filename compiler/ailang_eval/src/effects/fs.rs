//! `FS.readFile` / `FS.writeFile` / `FS.exists` (§4.E built-in effects table).
//!
//! Every path is resolved under `AILANG_FS_SANDBOX` first, when set (§6
//! "Environment variables").

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::errors::RuntimeError;
use crate::value::Value;

use super::EffContext;

fn as_str(v: &Value) -> Result<&str, RuntimeError> {
    match v {
        Value::Str(s) => Ok(s.as_ref()),
        other => Err(RuntimeError::type_mismatch("String", other.type_name(), None)),
    }
}

fn resolve(ctx: &EffContext, path: &str) -> PathBuf {
    match &ctx.fs_sandbox {
        Some(root) => root.join(Path::new(path).strip_prefix("/").unwrap_or(Path::new(path))),
        None => PathBuf::from(path),
    }
}

pub fn read_file(args: &[Value], ctx: &Rc<RefCell<EffContext>>) -> Result<Value, RuntimeError> {
    let path = as_str(args.first().ok_or_else(|| RuntimeError::type_mismatch("String", "nothing", None))?)?;
    let resolved = resolve(&ctx.borrow(), path);
    std::fs::read_to_string(&resolved)
        .map(Value::str)
        .map_err(|e| RuntimeError::Io { message: format!("{}: {e}", resolved.display()) })
}

pub fn write_file(args: &[Value], ctx: &Rc<RefCell<EffContext>>) -> Result<Value, RuntimeError> {
    let path = as_str(args.first().ok_or_else(|| RuntimeError::type_mismatch("String", "nothing", None))?)?;
    let contents = as_str(args.get(1).ok_or_else(|| RuntimeError::type_mismatch("String", "nothing", None))?)?;
    let resolved = resolve(&ctx.borrow(), path);
    std::fs::write(&resolved, contents)
        .map(|()| Value::Unit)
        .map_err(|e| RuntimeError::Io { message: format!("{}: {e}", resolved.display()) })
}

pub fn exists(args: &[Value], ctx: &Rc<RefCell<EffContext>>) -> Result<Value, RuntimeError> {
    let path = as_str(args.first().ok_or_else(|| RuntimeError::type_mismatch("String", "nothing", None))?)?;
    let resolved = resolve(&ctx.borrow(), path);
    Ok(Value::Bool(resolved.exists()))
}
