use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw modifier bitmask as captured at scan time.
///
/// Bits follow the JVM access-flag layout. The model never normalizes or validates the mask;
/// unknown bits are preserved and the helpers below are conveniences for callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(u32);

impl Modifiers {
    pub const PUBLIC: u32 = 0x0001;
    pub const PRIVATE: u32 = 0x0002;
    pub const PROTECTED: u32 = 0x0004;
    pub const STATIC: u32 = 0x0008;
    pub const FINAL: u32 = 0x0010;
    pub const SYNCHRONIZED: u32 = 0x0020;
    pub const VOLATILE: u32 = 0x0040;
    pub const TRANSIENT: u32 = 0x0080;
    pub const NATIVE: u32 = 0x0100;
    pub const INTERFACE: u32 = 0x0200;
    pub const ABSTRACT: u32 = 0x0400;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    pub const fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    pub const fn is_private(self) -> bool {
        self.contains(Self::PRIVATE)
    }

    pub const fn is_protected(self) -> bool {
        self.contains(Self::PROTECTED)
    }

    pub const fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    pub const fn is_final(self) -> bool {
        self.contains(Self::FINAL)
    }

    pub const fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    /// Source-level keywords for the known bits, in declaration order.
    pub fn keywords(self) -> Vec<&'static str> {
        const NAMES: [(u32, &str); 11] = [
            (Modifiers::PUBLIC, "public"),
            (Modifiers::PRIVATE, "private"),
            (Modifiers::PROTECTED, "protected"),
            (Modifiers::STATIC, "static"),
            (Modifiers::FINAL, "final"),
            (Modifiers::SYNCHRONIZED, "synchronized"),
            (Modifiers::VOLATILE, "volatile"),
            (Modifiers::TRANSIENT, "transient"),
            (Modifiers::NATIVE, "native"),
            (Modifiers::INTERFACE, "interface"),
            (Modifiers::ABSTRACT, "abstract"),
        ];
        NAMES
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl From<u32> for Modifiers {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keywords().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_unknown_bits() {
        let m = Modifiers::from_bits(0x1000 | Modifiers::PUBLIC);
        assert_eq!(m.bits(), 0x1001);
        assert!(m.is_public());
        assert!(!m.is_static());
    }

    #[test]
    fn renders_keywords() {
        let m = Modifiers::from_bits(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL);
        assert_eq!(m.keywords(), vec!["public", "static", "final"]);
        assert_eq!(m.to_string(), "public static final");
        assert_eq!(Modifiers::default().to_string(), "");
    }
}
