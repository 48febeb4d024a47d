//! Free-text query handling.
//!
//! Raw text is normalized, routed to an intent by keyword triggers, turned
//! into a typed [`VesselFilter`], run against the record store and
//! rendered into a [`QueryReply`].

pub mod filter;
pub mod formatter;
pub mod intent;
pub mod normalize;
pub mod router;
pub mod slots;

pub use filter::{FilterError, VesselFilter};
pub use formatter::QueryReply;
pub use intent::{IntentKind, QueryIntent};
pub use normalize::normalize;
pub use router::{IntentRouter, RouteError};
pub use slots::{ExtractionMode, SpeedRange};
