//! Reply formatting.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::filter::VesselFilter;
use super::intent::QueryIntent;
use crate::vessel::{format_number, VesselRecord};

pub const LIST_FOLLOW_UP: &str = "Would you like to download the data associated with this request?";
pub const VESSEL_FOLLOW_UP: &str =
    "Does this help? Would you like to download the detailed data for this vessel?";
pub const UNRECOGNIZED: &str =
    "I'm sorry, I didn't quite understand your request. Can you try rephrasing it?";
pub const SPEED_CLARIFICATION: &str = "Please give me exactly two speeds, a minimum and a maximum, \
     for example 'vessels with speed between 10 and 20 knots'.";
pub const VESSEL_CLARIFICATION: &str = "Which vessel do you mean? Try something like \
     'tell me about the vessel named Sea Queen'.";

/// The reply to one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryReply {
    pub response: String,
    pub follow_up: Option<String>,
    pub download_link: Option<String>,
}

impl QueryReply {
    /// A reply with no follow-up and no download.
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            follow_up: None,
            download_link: None,
        }
    }

    fn with_download(response: String, follow_up: &str, filter: &VesselFilter) -> Self {
        Self {
            response,
            follow_up: Some(follow_up.to_string()),
            download_link: Some(filter.download_link()),
        }
    }

    pub fn unrecognized() -> Self {
        Self::text(UNRECOGNIZED)
    }

    pub fn error(detail: impl Display) -> Self {
        Self::text(format!("An error occurred: {}", detail))
    }
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn join_names(rows: &[VesselRecord]) -> String {
    rows.iter()
        .map(|row| row.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reply for an intent whose trigger matched but whose slot is missing.
pub fn clarify(intent: &QueryIntent) -> QueryReply {
    match intent {
        QueryIntent::SpeedRange(None) => QueryReply::text(SPEED_CLARIFICATION),
        QueryIntent::VesselName(None) => QueryReply::text(VESSEL_CLARIFICATION),
        _ => QueryReply::unrecognized(),
    }
}

/// Reply for `rows` fetched with `filter` on behalf of `intent`.
pub fn format_results(intent: &QueryIntent, filter: &VesselFilter, rows: &[VesselRecord]) -> QueryReply {
    match intent {
        QueryIntent::SpeedRange(range) => {
            if rows.is_empty() {
                return QueryReply::text(match range {
                    Some(range) => format!(
                        "I couldn't find any vessels with speeds between {} and {} knots.",
                        format_number(range.min),
                        format_number(range.max)
                    ),
                    None => "I couldn't find any vessels within that speed range.".to_string(),
                });
            }
            let lines = rows
                .iter()
                .map(|row| format!("{} ({} knots)", row.name, format_number(row.speed_knots)))
                .collect::<Vec<_>>()
                .join("\n");
            QueryReply::with_download(
                format!("I found these vessels within your speed range:\n{}", lines),
                LIST_FOLLOW_UP,
                filter,
            )
        }
        QueryIntent::Owner(owner) => {
            let owner = capitalize(owner);
            if rows.is_empty() {
                return QueryReply::text(format!("I couldn't find any vessels owned by {}.", owner));
            }
            QueryReply::with_download(
                format!("The following vessels are owned by {}:\n{}", owner, join_names(rows)),
                LIST_FOLLOW_UP,
                filter,
            )
        }
        QueryIntent::VesselName(name) => match rows.first() {
            Some(vessel) => QueryReply::with_download(describe_vessel(vessel), VESSEL_FOLLOW_UP, filter),
            None => QueryReply::text(format!(
                "I'm sorry, but I couldn't find any vessel named '{}'. \
                 Maybe you can check the name and try again?",
                name.as_deref().unwrap_or_default()
            )),
        },
        QueryIntent::Status(status) => {
            let status = capitalize(status);
            if rows.is_empty() {
                return QueryReply::text(format!(
                    "I couldn't find any vessels with the status '{}'.",
                    status
                ));
            }
            QueryReply::with_download(
                format!("The following vessels are currently '{}':\n{}", status, join_names(rows)),
                LIST_FOLLOW_UP,
                filter,
            )
        }
        QueryIntent::Flag(flag) => {
            let flag = capitalize(flag);
            if rows.is_empty() {
                return QueryReply::text(format!(
                    "I couldn't find any vessels registered under the {} flag.",
                    flag
                ));
            }
            QueryReply::with_download(
                format!(
                    "Under the {} flag, I found the following vessels: {}",
                    flag,
                    join_names(rows)
                ),
                LIST_FOLLOW_UP,
                filter,
            )
        }
        QueryIntent::Unrecognized => QueryReply::unrecognized(),
    }
}

/// Natural-language summary of every field of one vessel.
pub fn describe_vessel(vessel: &VesselRecord) -> String {
    format!(
        "Sure, here's what I found about the vessel '{name}':\n\
         '{name}' is a {vessel_type} vessel owned by {owner}. \
         It sails under the flag of {flag} and has a maximum speed of {speed} knots. \
         Its dimensions are {dimensions}, and its most recent known location was at {position}. \
         Currently, the vessel is '{status}'.\n\
         Some of the ports it has visited include: {ports}.\n\
         Additionally, its MMSI (Maritime Mobile Service Identity) is {mmsi}.",
        name = vessel.name,
        vessel_type = vessel.vessel_type,
        owner = vessel.owner,
        flag = vessel.flag,
        speed = format_number(vessel.speed_knots),
        dimensions = vessel.dimensions,
        position = vessel
            .last_known_position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "an unknown position".to_string()),
        status = vessel.status,
        ports = vessel.visited_ports.join(", "),
        mmsi = vessel.mmsi,
    )
}
