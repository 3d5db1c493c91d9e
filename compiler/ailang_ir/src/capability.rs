//! The capability set gating effect execution (§4.E, §5).

use bitflags::bitflags;

bitflags! {
    /// Which effects the evaluator is permitted to execute natively.
    /// Granting a superset of capabilities a program already runs under
    /// must not change its observable behaviour (testable property 5,
    /// "capability monotonicity").
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Capabilities: u8 {
        const IO    = 0b0001;
        const FS    = 0b0010;
        const CLOCK = 0b0100;
        const NET   = 0b1000;
    }
}

impl Capabilities {
    #[must_use]
    pub fn parse_list(names: &str) -> Result<Capabilities, String> {
        let mut caps = Capabilities::empty();
        for raw in names.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            caps |= match raw {
                "IO" => Capabilities::IO,
                "FS" => Capabilities::FS,
                "Clock" => Capabilities::CLOCK,
                "Net" => Capabilities::NET,
                other => return Err(format!("unknown capability {other:?}")),
            };
        }
        Ok(caps)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        if self.contains(Capabilities::IO) {
            "IO"
        } else if self.contains(Capabilities::FS) {
            "FS"
        } else if self.contains(Capabilities::CLOCK) {
            "Clock"
        } else if self.contains(Capabilities::NET) {
            "Net"
        } else {
            "?"
        }
    }
}
