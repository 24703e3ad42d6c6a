use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::payload::PayloadError;

/// 公示类型
///
/// Adding a kind is an exhaustiveness change: every `match` over this enum
/// (payload builder, SQL mapping) has to be extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationKind {
    /// 捐赠
    Donate,
    /// 发放
    Distribute,
    /// 接收
    Receive,
}

impl PublicationKind {
    pub const ALL: [PublicationKind; 3] = [
        PublicationKind::Donate,
        PublicationKind::Distribute,
        PublicationKind::Receive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationKind::Donate => "donate",
            PublicationKind::Distribute => "distribute",
            PublicationKind::Receive => "receive",
        }
    }

    /// Parse the wire name; anything else is [`PayloadError::UnsupportedKind`]
    pub fn parse(value: &str) -> Result<Self, PayloadError> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == value)
            .ok_or_else(|| PayloadError::UnsupportedKind(value.to_string()))
    }
}

impl FromStr for PublicationKind {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for PublicationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        for kind in PublicationKind::ALL {
            assert_eq!(PublicationKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert_eq!("receive".parse::<PublicationKind>().unwrap(), PublicationKind::Receive);
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = PublicationKind::parse("refund").unwrap_err();
        assert!(matches!(err, PayloadError::UnsupportedKind(ref k) if k == "refund"));
        // case sensitive, like the wire format
        assert!(PublicationKind::parse("Donate").is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PublicationKind::Distribute).unwrap();
        assert_eq!(json, "\"distribute\"");
    }
}
