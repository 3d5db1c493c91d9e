//! `Net.httpGet` / `Net.httpPost` / `Net.httpRequest` (§4.E "Net security
//! (mandatory)").
//!
//! `httpGet`/`httpPost` return the response body directly and fail the
//! whole evaluation (a [`RuntimeError::Net`]) on any rule violation, since
//! their declared return type is a plain `String` with nowhere to carry a
//! structured failure. `httpRequest` is the safe variant: every rule
//! violation becomes an `Err(NetError)` *value*, never a [`RuntimeError`].

use std::cell::RefCell;
use std::io::Read;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::rc::Rc;
use std::time::Duration;

use ailang_ir::Interner;
use ureq::{Agent, AgentBuilder};
use url::Url;

use crate::errors::{NetError, RuntimeError};
use crate::value::Value;

use super::EffContext;

/// Hop-by-hop / framing headers the caller may never override (§4.E rule 7).
const BLOCKED_HEADERS: &[&str] = &[
    "connection",
    "content-length",
    "transfer-encoding",
    "host",
    "upgrade",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "user-agent",
];

struct PinnedResolver(Vec<SocketAddr>);

impl ureq::Resolver for PinnedResolver {
    fn resolve(&self, _netloc: &str) -> std::io::Result<Vec<SocketAddr>> {
        Ok(self.0.clone())
    }
}

fn as_str(v: &Value) -> Result<&str, RuntimeError> {
    match v {
        Value::Str(s) => Ok(s.as_ref()),
        other => Err(RuntimeError::type_mismatch("String", other.type_name(), None)),
    }
}

fn is_blocked_ip(ip: IpAddr, allow_loopback: bool) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            (v4.is_loopback() && !allow_loopback)
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_multicast()
                || is_cgnat(v4)
        }
        IpAddr::V6(v6) => {
            (v6.is_loopback() && !allow_loopback)
                || v6.is_unspecified()
                || v6.is_multicast()
                || is_unique_local_v6(v6)
                || v6.is_unicast_link_local()
        }
    }
}

/// `100.64.0.0/10`, carrier-grade NAT — treated as a private range.
fn is_cgnat(v4: Ipv4Addr) -> bool {
    let octets = v4.octets();
    octets[0] == 100 && (64..=127).contains(&octets[1])
}

fn is_unique_local_v6(v6: std::net::Ipv6Addr) -> bool {
    (v6.segments()[0] & 0xfe00) == 0xfc00
}

fn host_allowed(host: &str, allowlist: &[String]) -> bool {
    if allowlist.is_empty() {
        return true;
    }
    allowlist.iter().any(|pattern| {
        if let Some(suffix) = pattern.strip_prefix("*.") {
            host == suffix || host.ends_with(&format!(".{suffix}"))
        } else {
            host == pattern
        }
    })
}

/// Parses, validates, and DNS-resolves `raw_url`, returning the validated
/// URL plus the IP set a pinned resolver should connect to (§4.E rules 1-3).
fn validate(raw_url: &str, net: &super::NetConfig) -> Result<(Url, Vec<SocketAddr>), NetError> {
    let url = Url::parse(raw_url).map_err(|e| NetError::Transport { message: e.to_string() })?;

    match url.scheme() {
        "https" => {}
        "http" if net.allow_http => {}
        other => return Err(NetError::SchemeBlocked { scheme: other.to_string() }),
    }

    let host = url.host_str().ok_or_else(|| NetError::Transport { message: "URL has no host".to_string() })?;
    if !host_allowed(host, &net.allowlist) {
        return Err(NetError::DomainBlocked { host: host.to_string() });
    }

    let port = url.port_or_known_default().unwrap_or(443);
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|e| NetError::Transport { message: e.to_string() })?
        .collect();

    for addr in &addrs {
        if is_blocked_ip(addr.ip(), net.allow_localhost) {
            return Err(NetError::IpBlocked { ip: addr.ip().to_string() });
        }
    }

    Ok((url, addrs))
}

fn parse_headers(raw: &str) -> Vec<(String, String)> {
    raw.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !BLOCKED_HEADERS.contains(&k.to_ascii_lowercase().as_str()))
        .collect()
}

fn agent_for(addrs: Vec<SocketAddr>, net: &super::NetConfig) -> Agent {
    AgentBuilder::new()
        .resolver(PinnedResolver(addrs))
        .timeout(net.timeout)
        .redirects(0)
        .user_agent("ailang/0.1")
        .build()
}

struct Fetched {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

/// One HTTP call plus the manual redirect loop (§4.E rule 5): every hop is
/// re-validated from scratch, and `Authorization` is dropped once the host
/// changes.
fn fetch(method: &str, start_url: &str, mut headers: Vec<(String, String)>, body: Option<&str>, net: &super::NetConfig) -> Result<Fetched, NetError> {
    let mut current = start_url.to_string();
    let original_host = Url::parse(start_url).ok().and_then(|u| u.host_str().map(str::to_string));

    for _ in 0..=net.max_redirects {
        let (url, addrs) = validate(&current, net)?;
        if original_host.as_deref() != Some(url.host_str().unwrap_or_default()) {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case("authorization"));
        }

        let agent = agent_for(addrs, net);
        let mut request = agent.request(method, url.as_str());
        for (k, v) in &headers {
            request = request.set(k, v);
        }

        let response = match body {
            Some(b) => request.send_string(b),
            None => request.call(),
        };

        let response = match response {
            Ok(r) => r,
            Err(ureq::Error::Status(_, r)) => r,
            Err(ureq::Error::Transport(t)) => return Err(NetError::Transport { message: t.to_string() }),
        };

        let status = response.status();
        if (300..400).contains(&status) {
            if let Some(location) = response.header("location") {
                current = resolve_redirect(&url, location);
                continue;
            }
        }

        // `header()` borrows `response`, so every name must be read before
        // `into_reader()` consumes it.
        let response_headers: Vec<(String, String)> = response
            .headers_names()
            .into_iter()
            .filter_map(|name| response.header(&name).map(|v| (name.clone(), v.to_string())))
            .collect();

        let mut reader = response.into_reader().take(net.max_bytes + 1);
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).map_err(|e| NetError::Transport { message: e.to_string() })?;
        if buf.len() as u64 > net.max_bytes {
            return Err(NetError::BodyTooLarge { limit: net.max_bytes });
        }
        let body_str = String::from_utf8_lossy(&buf).into_owned();
        return Ok(Fetched { status, headers: response_headers, body: body_str });
    }

    Err(NetError::RedirectLimit { max: net.max_redirects })
}

fn resolve_redirect(base: &Url, location: &str) -> String {
    base.join(location).map(|u| u.to_string()).unwrap_or_else(|_| location.to_string())
}

pub fn http_get(args: &[Value], ctx: &Rc<RefCell<EffContext>>) -> Result<Value, RuntimeError> {
    let url = as_str(args.first().ok_or_else(|| RuntimeError::type_mismatch("String", "nothing", None))?)?;
    let net = &ctx.borrow().net;
    fetch("GET", url, Vec::new(), None, net)
        .map(|f| Value::str(f.body))
        .map_err(RuntimeError::Net)
}

pub fn http_post(args: &[Value], ctx: &Rc<RefCell<EffContext>>) -> Result<Value, RuntimeError> {
    let url = as_str(args.first().ok_or_else(|| RuntimeError::type_mismatch("String", "nothing", None))?)?;
    let body = as_str(args.get(1).ok_or_else(|| RuntimeError::type_mismatch("String", "nothing", None))?)?;
    let net = &ctx.borrow().net;
    fetch("POST", url, Vec::new(), Some(body), net)
        .map(|f| Value::str(f.body))
        .map_err(RuntimeError::Net)
}

pub fn http_request(args: &[Value], ctx: &Rc<RefCell<EffContext>>) -> Result<Value, RuntimeError> {
    let method = as_str(args.first().ok_or_else(|| RuntimeError::type_mismatch("String", "nothing", None))?)?;
    let url = as_str(args.get(1).ok_or_else(|| RuntimeError::type_mismatch("String", "nothing", None))?)?;
    let raw_headers = as_str(args.get(2).ok_or_else(|| RuntimeError::type_mismatch("String", "nothing", None))?)?;
    let body = as_str(args.get(3).ok_or_else(|| RuntimeError::type_mismatch("String", "nothing", None))?)?;

    let headers = parse_headers(raw_headers);
    let body_arg = (!body.is_empty()).then_some(body);
    let interner = Rc::clone(&ctx.borrow().interner);

    let result = fetch(method, url, headers, body_arg, &ctx.borrow().net);
    match result {
        Ok(fetched) => Ok(ok_response(fetched, &interner)),
        Err(net_err) => Ok(err_response(&net_err, &interner)),
    }
}

/// `Ok(Response { status, headers, body })` (§3 "Dictionary value" /
/// `httpRequest`'s `Result<Response, NetError>`).
fn ok_response(fetched: Fetched, interner: &Interner) -> Value {
    let headers: Vec<Value> = fetched
        .headers
        .into_iter()
        .map(|(k, v)| Value::Tuple(Rc::new(vec![Value::str(k), Value::str(v)])))
        .collect();
    let mut fields = vec![
        (interner.intern("body"), Value::str(fetched.body)),
        (interner.intern("headers"), Value::List(Rc::new(headers))),
        (interner.intern("status"), Value::Int(i64::from(fetched.status))),
    ];
    fields.sort_by_key(|(n, _)| n.raw());
    let record = Value::Record(Rc::new(fields));
    Value::Data { ctor: interner.intern("Ok"), args: Rc::new(vec![record]) }
}

/// `Err(NetError { code, message })`.
fn err_response(net_err: &NetError, interner: &Interner) -> Value {
    let mut fields = vec![
        (interner.intern("code"), Value::str(net_err.code().0)),
        (interner.intern("message"), Value::str(net_err.message())),
    ];
    fields.sort_by_key(|(n, _)| n.raw());
    let record = Value::Record(Rc::new(fields));
    Value::Data { ctor: interner.intern("Err"), args: Rc::new(vec![record]) }
}
