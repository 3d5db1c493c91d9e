//! Runtime errors (§4.E): the evaluator's failure modes, each mapped to a
//! stable code so the CLI can wrap it in the same `ailang.error/v1`
//! envelope every other phase uses.

use ailang_diagnostic::{Diagnostic, ErrorCode, Phase};
use ailang_ir::{Name, NodeId};

#[derive(Debug)]
pub enum RuntimeError {
    /// `RT_UNDEF`: a variable had no binding in scope.
    UndefinedVariable { name: String, node: NodeId },
    /// `RT_MATCH`: no arm of a `match` matched the scrutinee.
    NoMatchingArm { node: NodeId },
    /// `RT_TYPE`: a value did not have the shape an operation expected.
    /// Should be unreachable after a successful type check.
    TypeMismatch { expected: &'static str, got: &'static str, node: Option<NodeId> },
    /// `E_<EFFECT>_CAP_MISSING`: the running program's capability set did
    /// not include the effect an operation required.
    CapabilityMissing { effect: String, node: Option<NodeId> },
    /// `E_CLOCK_NEGATIVE_SLEEP`.
    NegativeSleep,
    Io { message: String },
    Net(NetError),
}

#[derive(Debug)]
pub enum NetError {
    SchemeBlocked { scheme: String },
    DomainBlocked { host: String },
    IpBlocked { ip: String },
    DnsRebinding { host: String },
    RedirectLimit { max: u32 },
    BodyTooLarge { limit: u64 },
    Transport { message: String },
}

impl RuntimeError {
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            RuntimeError::UndefinedVariable { .. } => ErrorCode::RT_UNDEF(),
            RuntimeError::NoMatchingArm { .. } => ErrorCode::RT_MATCH(),
            RuntimeError::TypeMismatch { .. } => ErrorCode::RT_TYPE(),
            RuntimeError::CapabilityMissing { effect, .. } => ErrorCode::capability_missing(effect),
            RuntimeError::NegativeSleep => ErrorCode::E_CLOCK_NEGATIVE_SLEEP(),
            RuntimeError::Io { .. } => ErrorCode::RT_TYPE(),
            RuntimeError::Net(net) => net.code(),
        }
    }

    #[must_use]
    pub fn node(&self) -> Option<NodeId> {
        match self {
            RuntimeError::UndefinedVariable { node, .. } | RuntimeError::NoMatchingArm { node } => Some(*node),
            RuntimeError::TypeMismatch { node, .. } | RuntimeError::CapabilityMissing { node, .. } => *node,
            _ => None,
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        match self {
            RuntimeError::UndefinedVariable { name, .. } => format!("undefined variable `{name}`"),
            RuntimeError::NoMatchingArm { .. } => "no arm of this match matched the value".to_string(),
            RuntimeError::TypeMismatch { expected, got, .. } => {
                format!("expected a {expected} value, found a {got} value")
            }
            RuntimeError::CapabilityMissing { effect, .. } => {
                format!("this program was not granted the `{effect}` capability")
            }
            RuntimeError::NegativeSleep => "Clock.sleep was called with a negative duration".to_string(),
            RuntimeError::Io { message } => message.clone(),
            RuntimeError::Net(net) => net.message(),
        }
    }

    #[must_use]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::new(self.code(), Phase::Runtime, self.message());
        if let Some(node) = self.node() {
            diag = diag.with_node(node);
        }
        diag
    }

    #[must_use]
    pub fn capability_missing(effect: impl Into<String>, node: Option<NodeId>) -> Self {
        RuntimeError::CapabilityMissing { effect: effect.into(), node }
    }

    #[must_use]
    pub fn type_mismatch(expected: &'static str, got: &'static str, node: Option<NodeId>) -> Self {
        RuntimeError::TypeMismatch { expected, got, node }
    }

    #[must_use]
    pub fn undefined(interner: &ailang_ir::Interner, name: Name, node: NodeId) -> Self {
        RuntimeError::UndefinedVariable { name: interner.resolve(name), node }
    }
}

impl NetError {
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            NetError::SchemeBlocked { .. } => ErrorCode::E_NET_SCHEME_BLOCKED(),
            NetError::DomainBlocked { .. } => ErrorCode::E_NET_DOMAIN_BLOCKED(),
            NetError::IpBlocked { .. } => ErrorCode::E_NET_IP_BLOCKED(),
            NetError::DnsRebinding { .. } => ErrorCode::E_NET_DNS_REBINDING(),
            NetError::RedirectLimit { .. } => ErrorCode::E_NET_REDIRECT_LIMIT(),
            NetError::BodyTooLarge { .. } => ErrorCode::E_NET_BODY_TOO_LARGE(),
            NetError::Transport { .. } => ErrorCode::RT_TYPE(),
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        match self {
            NetError::SchemeBlocked { scheme } => format!("scheme `{scheme}` is not permitted"),
            NetError::DomainBlocked { host } => format!("host `{host}` is not on the allowlist"),
            NetError::IpBlocked { ip } => format!("resolved IP `{ip}` is in a blocked range"),
            NetError::DnsRebinding { host } => format!("`{host}` resolved to a disallowed IP after redirect"),
            NetError::RedirectLimit { max } => format!("exceeded the maximum of {max} redirects"),
            NetError::BodyTooLarge { limit } => format!("response body exceeded {limit} bytes"),
            NetError::Transport { message } => message.clone(),
        }
    }
}
