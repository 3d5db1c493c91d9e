//! Error codes, one per diagnostic kind the pipeline can emit (§4, §7).
//!
//! Codes are stable strings (not an enum discriminant) because several are
//! prefixed dynamically with an effect name (`E_IO_CAP_MISSING`,
//! `E_FS_CAP_MISSING`, ...) — §4.E "capability-error codes prefixed by
//! effect name". Fixed codes are exposed as `ErrorCode::TC001` etc.; dynamic
//! ones are built with `ErrorCode::capability_missing`.

use std::fmt;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorCode(pub String);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! codes {
    ($($const_name:ident => $code:expr),* $(,)?) => {
        impl ErrorCode {
            $(
                #[allow(non_snake_case)]
                #[must_use]
                pub fn $const_name() -> ErrorCode {
                    ErrorCode($code.to_string())
                }
            )*
        }
    };
}

codes! {
    // Lexer / parser — specified only at the AST-contract interface; see
    // SPEC_FULL.md "Ambient stack".
    LEX001 => "LEX001",
    LEX002 => "LEX002",
    PAR001 => "PAR001",

    // Elaboration (§4.A)
    ELB001 => "ELB001",
    ELB002 => "ELB002",
    ELB003 => "ELB003",
    ELB004 => "ELB004",

    // Type checker (§4.B)
    TC001 => "TC001",
    TC002 => "TC002",
    TC_REC_001 => "TC_REC_001",
    TC_INT_001 => "TC_INT_001",
    TC_CLASS_001 => "TC_CLASS_001",
    TC_AMB_001 => "TC_AMB_001",
    TC_KIND_001 => "TC_KIND_001",

    // Loader / linker (§4.D)
    LDR001 => "LDR001",
    IMP010 => "IMP010",
    IMP011 => "IMP011",
    IMP012 => "IMP012",
    LNK001 => "LNK001",

    // Runtime (§4.E)
    RT_UNDEF => "RT_UNDEF",
    RT_MATCH => "RT_MATCH",
    RT_TYPE => "RT_TYPE",
    E_CLOCK_NEGATIVE_SLEEP => "E_CLOCK_NEGATIVE_SLEEP",
    E_NET_BODY_TOO_LARGE => "E_NET_BODY_TOO_LARGE",
    E_NET_DNS_REBINDING => "E_NET_DNS_REBINDING",
    E_NET_IP_BLOCKED => "E_NET_IP_BLOCKED",
    E_NET_SCHEME_BLOCKED => "E_NET_SCHEME_BLOCKED",
    E_NET_DOMAIN_BLOCKED => "E_NET_DOMAIN_BLOCKED",
    E_NET_REDIRECT_LIMIT => "E_NET_REDIRECT_LIMIT",
}

impl ErrorCode {
    /// `E_<EFFECT>_CAP_MISSING` — the one family of codes whose suffix is
    /// fixed but whose prefix names the missing effect (§4.E).
    #[must_use]
    pub fn capability_missing(effect: &str) -> ErrorCode {
        ErrorCode(format!("E_{}_CAP_MISSING", effect.to_uppercase()))
    }

    /// Long-form explanation used by `ailang check --explain <CODE>`.
    #[must_use]
    pub fn explain(&self) -> &'static str {
        match self.0.as_str() {
            "LEX001" => "The lexer could not recognize a character or could not close a string/comment literal.",
            "LEX002" => "A numeric literal's digits could not be parsed into the target representation (overflow or malformed exponent).",
            "PAR001" => "The parser encountered a token that cannot start or continue the current grammar production.",
            "ELB001" => "Malformed surface syntax reached the elaborator; this is usually a parser bug, since the parser should reject it first.",
            "ELB002" => "A `letrec` block binds the same name twice. Each recursive binding group must have distinct names.",
            "ELB003" => "An underscore-prefixed name was marked `export`. Underscore-prefixed names are private by convention and cannot be exported.",
            "ELB004" => "A `match` has no arm that catches every remaining case (no trailing wildcard or unguarded variable pattern). This is a warning, not an error: the runtime raises RT_MATCH if the gap is ever hit.",
            "TC001" => "Unification failed: two types that were required to be equal are not. Check the data.expected/data.actual types.",
            "TC002" => "Occurs check failed: a type variable would have to be bound to a type that contains itself, which has no finite solution.",
            "TC_REC_001" => "A record access or update named a field the record's row does not contain.",
            "TC_INT_001" => "An operation requiring `Integral` (e.g. `%`) was used at a type with no `Integral` instance.",
            "TC_CLASS_001" => "No instance of the given class exists at the given type, and none could be synthesized.",
            "TC_AMB_001" => "A class constraint's type variable remained unconstrained after solving, and no defaulting rule applied.",
            "TC_KIND_001" => "Two rows of different kinds (record vs. effect vs. instance) were unified; this is always a checker bug if it escapes to a user-visible error.",
            "LDR001" => "The module at the given import path could not be found. See data.search_trace for the paths that were tried.",
            "IMP010" => "The imported name is not exported by the target module. See data.available for what is exported.",
            "IMP011" => "The same name is provided by more than one import; disambiguate with a selective import or an alias.",
            "IMP012" => "The import statement uses a form the loader does not support.",
            "LNK001" => "No dictionary is registered for the given (class, type) pair; an instance is missing or its module was never loaded.",
            "RT_UNDEF" => "A variable reference had no binding in scope at evaluation time.",
            "RT_MATCH" => "No arm of a `match` matched the scrutinee at runtime, despite the elaborator's exhaustiveness check only warning (not erroring).",
            "RT_TYPE" => "A runtime value did not have the shape an operation expected. Should be unreachable after a successful type check; this is a defensive check.",
            "E_CLOCK_NEGATIVE_SLEEP" => "Clock.sleep was called with a negative duration.",
            "E_NET_BODY_TOO_LARGE" => "An HTTP response body exceeded the configured byte cap.",
            "E_NET_DNS_REBINDING" => "A hostname resolved to an IP that would only be reachable after DNS rebinding; the connection was refused before any socket was opened.",
            "E_NET_IP_BLOCKED" => "A resolved IP fell in a blocked range (loopback, private, link-local, unspecified, multicast).",
            "E_NET_SCHEME_BLOCKED" => "The URL scheme is not permitted under the current Net configuration.",
            "E_NET_DOMAIN_BLOCKED" => "The URL's host is not on the configured domain allowlist.",
            "E_NET_REDIRECT_LIMIT" => "An HTTP request followed more redirects than the configured maximum.",
            _ => "No explanation is registered for this error code.",
        }
    }
}
