use serde::{Deserialize, Serialize};

/// The feature-level object a conversation is scoped to: a marketplace
/// listing, a found item, or a group-forming post. Closed set — unknown wire
/// strings are rejected at deserialization, so handlers never see an
/// out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    Market,
    Found,
    GroupUp,
}

impl ContextType {
    /// Wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextType::Market => "market",
            ContextType::Found => "found",
            ContextType::GroupUp => "groupup",
        }
    }

    /// Human-readable label shown in chat headers.
    pub fn label(&self) -> &'static str {
        match self {
            ContextType::Market => "Marketplace",
            ContextType::Found => "Lost & Found",
            ContextType::GroupUp => "GroupUp",
        }
    }

    /// The feature module that owns objects of this context type.
    pub fn feature(&self) -> &'static str {
        match self {
            ContextType::Market => "marketplace",
            ContextType::Found => "lostfound",
            ContextType::GroupUp => "groups",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "market" => Some(ContextType::Market),
            "found" => Some(ContextType::Found),
            "groupup" => Some(ContextType::GroupUp),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings_round_trip() {
        for ct in [ContextType::Market, ContextType::Found, ContextType::GroupUp] {
            assert_eq!(ContextType::parse(ct.as_str()), Some(ct));
        }
        assert_eq!(ContextType::parse("marketplace"), None);
    }

    #[test]
    fn labels() {
        assert_eq!(ContextType::Market.label(), "Marketplace");
        assert_eq!(ContextType::Found.label(), "Lost & Found");
        assert_eq!(ContextType::GroupUp.label(), "GroupUp");
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&ContextType::Found).unwrap();
        assert_eq!(json, "\"found\"");
        let back: ContextType = serde_json::from_str("\"groupup\"").unwrap();
        assert_eq!(back, ContextType::GroupUp);
    }
}
