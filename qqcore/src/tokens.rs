use std::fmt;
use std::str::FromStr;

/// The four identifiers that authorize calls after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenName {
    Uin,
    Ptwebqq,
    Vfwebqq,
    Psessionid,
}

impl TokenName {
    pub const ALL: [TokenName; 4] = [
        TokenName::Uin,
        TokenName::Ptwebqq,
        TokenName::Vfwebqq,
        TokenName::Psessionid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenName::Uin => "uin",
            TokenName::Ptwebqq => "ptwebqq",
            TokenName::Vfwebqq => "vfwebqq",
            TokenName::Psessionid => "psessionid",
        }
    }
}

impl fmt::Display for TokenName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or(())
    }
}

/// Session tokens. Fields start empty and are filled once, in login order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    pub uin: String,
    pub ptwebqq: String,
    pub vfwebqq: String,
    pub psessionid: String,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, name: TokenName) -> &str {
        match name {
            TokenName::Uin => &self.uin,
            TokenName::Ptwebqq => &self.ptwebqq,
            TokenName::Vfwebqq => &self.vfwebqq,
            TokenName::Psessionid => &self.psessionid,
        }
    }

    /// Looks a token up by its wire name. `None` means the name is not a token,
    /// which is different from a known token that is still empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        name.parse::<TokenName>().ok().map(|n| self.value(n))
    }

    /// Writes `value` into an empty field. Set fields are never overwritten or
    /// cleared; returns whether the field was written.
    pub fn fill(&mut self, name: TokenName, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = match name {
            TokenName::Uin => &mut self.uin,
            TokenName::Ptwebqq => &mut self.ptwebqq,
            TokenName::Vfwebqq => &mut self.vfwebqq,
            TokenName::Psessionid => &mut self.psessionid,
        };
        if value.is_empty() || !slot.is_empty() {
            return false;
        }
        *slot = value;
        true
    }

    pub fn is_complete(&self) -> bool {
        TokenName::ALL.iter().all(|n| !self.value(*n).is_empty())
    }
}
