//! AILANG command-line interface (§6 "Command-line surface").
//!
//! A hand-rolled `match command.as_str()` dispatcher, no argument-parsing
//! crate: the surface is small (two subcommands, a dozen flags) and every
//! flag is either a bare switch or takes exactly one value.

mod tracing_setup;

use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use ailang_diagnostic::{Diagnostic, LineIndex};
use ailang_eval::{ClockCtx, EffContext, Interpreter, NetConfig, RuntimeError, Value};
use ailang_ir::{Interner, Name};

fn main() {
    tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    let ok = match command {
        "run" => run_command(rest),
        "check" => check_command(rest),
        "help" | "--help" | "-h" => {
            print_usage();
            true
        }
        "version" | "--version" => {
            println!("ailang {}", env!("CARGO_PKG_VERSION"));
            true
        }
        other => {
            eprintln!("unknown command: {other}");
            print_usage();
            false
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  ailang run <FILE> [--entry NAME] [--args-json JSON] [--caps LIST]");
    eprintln!("            [--net-allow LIST] [--net-allow-http] [--net-allow-localhost]");
    eprintln!("            [--net-timeout SECS] [--net-max-bytes N] [--net-max-redirects N]");
    eprintln!("            [--json] [--compact]");
    eprintln!("  ailang check <FILE> [--json] [--compact]");
    eprintln!("  ailang help | version");
}

/// Flags shared by `run` and `check` plus the ones only `run` uses.
struct Flags {
    path: Option<String>,
    entry: String,
    args_json: Option<String>,
    caps: Vec<String>,
    net_allow: Vec<String>,
    net_allow_http: bool,
    net_allow_localhost: bool,
    net_timeout: Option<u64>,
    net_max_bytes: Option<u64>,
    net_max_redirects: Option<u32>,
    json: bool,
    compact: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Flags {
            path: None,
            entry: "main".to_string(),
            args_json: None,
            caps: Vec::new(),
            net_allow: Vec::new(),
            net_allow_http: false,
            net_allow_localhost: false,
            net_timeout: None,
            net_max_bytes: None,
            net_max_redirects: None,
            json: false,
            compact: false,
        }
    }
}

fn parse_flags(args: &[String]) -> Result<Flags, String> {
    let mut flags = Flags::default();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        macro_rules! value {
            () => {{
                i += 1;
                args.get(i).ok_or_else(|| format!("{arg} requires a value"))?
            }};
        }
        match arg {
            "--entry" => flags.entry = value!().clone(),
            "--args-json" => flags.args_json = Some(value!().clone()),
            "--caps" => flags.caps = split_list(value!()),
            "--net-allow" => flags.net_allow = split_list(value!()),
            "--net-allow-http" => flags.net_allow_http = true,
            "--net-allow-localhost" => flags.net_allow_localhost = true,
            "--net-timeout" => flags.net_timeout = Some(value!().parse().map_err(|_| "--net-timeout wants an integer number of seconds".to_string())?),
            "--net-max-bytes" => flags.net_max_bytes = Some(value!().parse().map_err(|_| "--net-max-bytes wants an integer".to_string())?),
            "--net-max-redirects" => flags.net_max_redirects = Some(value!().parse().map_err(|_| "--net-max-redirects wants an integer".to_string())?),
            "--json" => flags.json = true,
            "--compact" => flags.compact = true,
            other if !other.starts_with('-') && flags.path.is_none() => flags.path = Some(other.to_string()),
            other => return Err(format!("unrecognized argument: {other}")),
        }
        i += 1;
    }
    Ok(flags)
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

fn check_command(args: &[String]) -> bool {
    let flags = match parse_flags(args) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return false;
        }
    };
    let Some(path) = flags.path else {
        eprintln!("error: `check` requires a file path");
        return false;
    };

    let interner = Interner::new();
    match ailang_link::load_and_link(&PathBuf::from(path), &interner) {
        Ok(_) => true,
        Err(diagnostics) => {
            report_diagnostics(&diagnostics, flags.json, flags.compact);
            false
        }
    }
}

fn run_command(args: &[String]) -> bool {
    let flags = match parse_flags(args) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return false;
        }
    };
    let Some(path) = flags.path.clone() else {
        eprintln!("error: `run` requires a file path");
        return false;
    };

    let interner = Rc::new(Interner::new());
    let program = match ailang_link::load_and_link(&PathBuf::from(&path), &interner) {
        Ok(p) => p,
        Err(diagnostics) => {
            report_diagnostics(&diagnostics, flags.json, flags.compact);
            return false;
        }
    };

    let caps: rustc_hash::FxHashSet<Name> = flags.caps.iter().map(|c| interner.intern(c)).collect();
    let mut ctx = EffContext::new(caps, Rc::clone(&interner));
    configure_effect_context(&mut ctx, &flags);

    let interp = match Interpreter::with_context(program, Rc::clone(&interner), ctx) {
        Ok(i) => i,
        Err(e) => {
            report_runtime_error(&e, flags.json, flags.compact);
            return false;
        }
    };

    let entry_args = match flags.args_json.as_deref().map(|raw| parse_args_json(raw, &interner)) {
        Some(Ok(v)) => vec![v],
        Some(Err(e)) => {
            eprintln!("error: invalid --args-json: {e}");
            return false;
        }
        None => Vec::new(),
    };

    let entry_name = interner.intern(&flags.entry);
    match interp.run_entry(entry_name, &entry_args) {
        Ok(value) => {
            if !matches!(value, Value::Unit) {
                println!("{}", format_value(&value, &interner));
            }
            true
        }
        Err(e) => {
            report_runtime_error(&e, flags.json, flags.compact);
            false
        }
    }
}

/// `AILANG_SEED` seeds the virtual clock (§6 "Environment variables",
/// §8 "Determinism under seed"); `AILANG_FS_SANDBOX` roots every FS path.
/// `TZ`/`LANG` need no explicit wiring — every effect here goes through
/// `std::time`/`std::io`, which already read them from the process
/// environment this CLI inherited.
fn configure_effect_context(ctx: &mut EffContext, flags: &Flags) {
    if std::env::var("AILANG_SEED").is_ok() {
        ctx.clock = ClockCtx::seeded();
    }
    if let Ok(sandbox) = std::env::var("AILANG_FS_SANDBOX") {
        ctx.fs_sandbox = Some(PathBuf::from(sandbox));
    }

    let mut net = NetConfig { allow_http: flags.net_allow_http, allow_localhost: flags.net_allow_localhost, allowlist: flags.net_allow.clone(), ..NetConfig::default() };
    if let Some(secs) = flags.net_timeout {
        net.timeout = Duration::from_secs(secs);
    }
    if let Some(max) = flags.net_max_bytes {
        net.max_bytes = max;
    }
    if let Some(max) = flags.net_max_redirects {
        net.max_redirects = max;
    }
    ctx.net = net;
}

fn parse_args_json(raw: &str, interner: &Interner) -> Result<Value, String> {
    let json: serde_json::Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    Ok(json_to_value(&json, interner))
}

/// Field names must be interned into the *program's* interner, not a fresh
/// one, or the `Name`s this produces would never compare equal to the ones
/// a record pattern in the running program matches against.
fn json_to_value(json: &serde_json::Value, interner: &Interner) -> Value {
    match json {
        serde_json::Value::Null => Value::Unit,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => n.as_i64().map_or_else(|| Value::Float(n.as_f64().unwrap_or(0.0)), Value::Int),
        serde_json::Value::String(s) => Value::str(s.as_str()),
        serde_json::Value::Array(items) => Value::List(Rc::new(items.iter().map(|v| json_to_value(v, interner)).collect())),
        serde_json::Value::Object(map) => {
            let mut fields: Vec<(Name, Value)> = map.iter().map(|(k, v)| (interner.intern(k), json_to_value(v, interner))).collect();
            fields.sort_by_key(|(n, _)| n.raw());
            Value::Record(Rc::new(fields))
        }
    }
}

fn format_value(value: &Value, interner: &Interner) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Str(s) => s.to_string(),
        Value::Unit => "()".to_string(),
        Value::Fn(_) => "<function>".to_string(),
        Value::Dict(_) => "<dictionary>".to_string(),
        Value::List(items) => format!("[{}]", items.iter().map(|v| format_value(v, interner)).collect::<Vec<_>>().join(", ")),
        Value::Tuple(items) => format!("({})", items.iter().map(|v| format_value(v, interner)).collect::<Vec<_>>().join(", ")),
        Value::Record(fields) => format!(
            "{{{}}}",
            fields.iter().map(|(k, v)| format!("{}: {}", interner.resolve(*k), format_value(v, interner))).collect::<Vec<_>>().join(", ")
        ),
        Value::Data { ctor, args } => {
            if args.is_empty() {
                interner.resolve(*ctor)
            } else {
                format!("{}({})", interner.resolve(*ctor), args.iter().map(|v| format_value(v, interner)).collect::<Vec<_>>().join(", "))
            }
        }
    }
}

fn report_runtime_error(err: &RuntimeError, json: bool, compact: bool) {
    report_diagnostics(&[err.to_diagnostic()], json, compact);
}

/// §7 "User-visible behaviour": human mode renders span + fix hint per
/// diagnostic; `--json` prints the `ailang.error/v1` envelope, one per
/// diagnostic, to stderr. Exit code is the caller's responsibility.
fn report_diagnostics(diagnostics: &[Diagnostic], json: bool, compact: bool) {
    for diag in diagnostics {
        if json {
            let source = diag.span.as_ref().map(|s| std::fs::read_to_string(&s.file).unwrap_or_default()).unwrap_or_default();
            let line_index = LineIndex::new(&source);
            eprintln!("{}", diag.to_json(Some(&line_index), compact));
        } else {
            let source = diag.span.as_ref().map(|s| std::fs::read_to_string(&s.file).unwrap_or_default()).unwrap_or_default();
            eprintln!("{}", ailang_diagnostic::report::render(diag, &source));
        }
    }
}
