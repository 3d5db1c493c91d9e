//! `Clock.now` / `Clock.sleep` (§4.E built-in effects table, "Determinism").

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::RuntimeError;
use crate::value::Value;

use super::EffContext;

fn as_int(v: &Value) -> Result<i64, RuntimeError> {
    match v {
        Value::Int(n) => Ok(*n),
        other => Err(RuntimeError::type_mismatch("Int", other.type_name(), None)),
    }
}

pub fn now(_args: &[Value], ctx: &Rc<RefCell<EffContext>>) -> Result<Value, RuntimeError> {
    let ctx = ctx.borrow();
    let millis = match ctx.clock.virtual_millis {
        Some(virtual_now) => virtual_now,
        None => {
            let elapsed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_err(|e| RuntimeError::Io { message: e.to_string() })?;
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        }
    };
    Ok(Value::Int(millis))
}

pub fn sleep(args: &[Value], ctx: &Rc<RefCell<EffContext>>) -> Result<Value, RuntimeError> {
    let millis = as_int(args.first().ok_or_else(|| RuntimeError::type_mismatch("Int", "nothing", None))?)?;
    if millis < 0 {
        return Err(RuntimeError::NegativeSleep);
    }
    let mut ctx = ctx.borrow_mut();
    match &mut ctx.clock.virtual_millis {
        // Seed mode: advance virtual time without blocking.
        Some(virtual_now) => *virtual_now += millis,
        None => std::thread::sleep(std::time::Duration::from_millis(u64::try_from(millis).unwrap_or(0))),
    }
    Ok(Value::Unit)
}
