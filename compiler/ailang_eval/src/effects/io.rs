//! `IO.print` / `IO.println` / `IO.readLine` (§4.E built-in effects table).

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use crate::errors::RuntimeError;
use crate::value::Value;

use super::EffContext;

fn as_str(v: &Value) -> Result<&std::rc::Rc<str>, RuntimeError> {
    match v {
        Value::Str(s) => Ok(s),
        other => Err(RuntimeError::type_mismatch("String", other.type_name(), None)),
    }
}

pub fn print(args: &[Value], _ctx: &Rc<RefCell<EffContext>>) -> Result<Value, RuntimeError> {
    let s = as_str(args.first().ok_or_else(|| RuntimeError::type_mismatch("String", "nothing", None))?)?;
    print!("{s}");
    std::io::stdout().flush().map_err(|e| RuntimeError::Io { message: e.to_string() })?;
    Ok(Value::Unit)
}

pub fn println(args: &[Value], _ctx: &Rc<RefCell<EffContext>>) -> Result<Value, RuntimeError> {
    let s = as_str(args.first().ok_or_else(|| RuntimeError::type_mismatch("String", "nothing", None))?)?;
    println!("{s}");
    Ok(Value::Unit)
}

pub fn read_line(_args: &[Value], _ctx: &Rc<RefCell<EffContext>>) -> Result<Value, RuntimeError> {
    let mut line = String::new();
    match std::io::stdin().read_line(&mut line) {
        // Empty on EOF (§4.E `readLine` notes).
        Ok(0) => Ok(Value::str("")),
        Ok(_) => {
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            Ok(Value::str(line))
        }
        Err(e) => Err(RuntimeError::Io { message: e.to_string() }),
    }
}
