//! Query intents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::filter::VesselFilter;
use super::slots::SpeedRange;

/// The routable intent kinds. `Unrecognized` is implicit and never routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    SpeedRange,
    Owner,
    VesselName,
    Status,
    Flag,
}

impl IntentKind {
    /// Default routing priority.
    pub const DEFAULT_ORDER: [IntentKind; 5] = [
        IntentKind::SpeedRange,
        IntentKind::Owner,
        IntentKind::VesselName,
        IntentKind::Status,
        IntentKind::Flag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpeedRange => "speed_range",
            Self::Owner => "owner",
            Self::VesselName => "vessel_name",
            Self::Status => "status",
            Self::Flag => "flag",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "speed_range" | "speed" => Ok(Self::SpeedRange),
            "owner" => Ok(Self::Owner),
            "vessel_name" | "vessel" => Ok(Self::VesselName),
            "status" => Ok(Self::Status),
            "flag" => Ok(Self::Flag),
            other => Err(format!("unknown intent '{}'", other)),
        }
    }
}

/// The classified purpose of one query, with whatever slot was extracted.
///
/// A `None` slot means the trigger matched but the extractor found nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryIntent {
    SpeedRange(Option<SpeedRange>),
    Owner(String),
    VesselName(Option<String>),
    Status(&'static str),
    Flag(String),
    Unrecognized,
}

impl QueryIntent {
    pub fn kind(&self) -> Option<IntentKind> {
        match self {
            Self::SpeedRange(_) => Some(IntentKind::SpeedRange),
            Self::Owner(_) => Some(IntentKind::Owner),
            Self::VesselName(_) => Some(IntentKind::VesselName),
            Self::Status(_) => Some(IntentKind::Status),
            Self::Flag(_) => Some(IntentKind::Flag),
            Self::Unrecognized => None,
        }
    }

    /// The store filter this intent resolves to, if its slot was filled.
    pub fn filter(&self) -> Option<VesselFilter> {
        match self {
            Self::SpeedRange(Some(range)) => Some(VesselFilter::SpeedBetween {
                min: range.min,
                max: range.max,
            }),
            Self::Owner(owner) => Some(VesselFilter::OwnerIs {
                owner: owner.clone(),
            }),
            Self::VesselName(Some(name)) => Some(VesselFilter::NameIs { name: name.clone() }),
            Self::Status(status) => Some(VesselFilter::StatusIs {
                status: status.to_string(),
            }),
            Self::Flag(flag) => Some(VesselFilter::FlagContains { flag: flag.clone() }),
            Self::SpeedRange(None) | Self::VesselName(None) | Self::Unrecognized => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_kind_parse() {
        assert_eq!("speed_range".parse::<IntentKind>().unwrap(), IntentKind::SpeedRange);
        assert_eq!(" vessel ".parse::<IntentKind>().unwrap(), IntentKind::VesselName);
        assert!("weather".parse::<IntentKind>().is_err());
    }

    #[test]
    fn test_intent_filter() {
        let intent = QueryIntent::SpeedRange(Some(SpeedRange { min: 10.0, max: 20.0 }));
        assert_eq!(
            intent.filter(),
            Some(VesselFilter::SpeedBetween { min: 10.0, max: 20.0 })
        );
        assert_eq!(QueryIntent::SpeedRange(None).filter(), None);
        assert_eq!(QueryIntent::VesselName(None).filter(), None);
        assert_eq!(QueryIntent::Unrecognized.filter(), None);
        assert_eq!(QueryIntent::Unrecognized.kind(), None);
    }
}
