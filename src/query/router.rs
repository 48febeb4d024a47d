//! Intent routing.
//!
//! The router holds an ordered table of `(IntentKind, trigger)` routes.
//! Routes are tried top to bottom against the normalized text and the first
//! trigger that fires decides the intent; there is no fall-through once a
//! route has matched, even when its slot is missing or nothing is found.

use tracing::{debug, warn};

use super::formatter::{self, QueryReply};
use super::intent::{IntentKind, QueryIntent};
use super::normalize::normalize;
use super::slots::{self, ExtractionMode};
use crate::storage::{StoreError, VesselStore};

/// Errors building a router.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RouteError {
    #[error("intent '{0}' appears more than once in the routing order")]
    DuplicateIntent(IntentKind),
}

type Trigger = fn(&str) -> bool;

fn speed_trigger(text: &str) -> bool {
    text.contains("speed") || text.contains("knots")
}

fn owner_trigger(text: &str) -> bool {
    text.contains("owned by")
}

fn vessel_trigger(text: &str) -> bool {
    text.contains("vessel")
}

fn status_trigger(text: &str) -> bool {
    slots::STATUSES.iter().any(|status| text.contains(status))
}

fn flag_trigger(text: &str) -> bool {
    text.contains("flag") || text.contains("registered under") || text.contains("sail under")
}

fn trigger_for(kind: IntentKind) -> Trigger {
    match kind {
        IntentKind::SpeedRange => speed_trigger,
        IntentKind::Owner => owner_trigger,
        IntentKind::VesselName => vessel_trigger,
        IntentKind::Status => status_trigger,
        IntentKind::Flag => flag_trigger,
    }
}

#[derive(Clone)]
struct Route {
    kind: IntentKind,
    trigger: Trigger,
}

/// First-match-wins intent router.
#[derive(Clone)]
pub struct IntentRouter {
    routes: Vec<Route>,
    mode: ExtractionMode,
}

impl std::fmt::Debug for IntentRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRouter")
            .field("order", &self.order())
            .field("mode", &self.mode)
            .finish()
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentRouter {
    /// Router with the default priority and legacy extraction.
    pub fn new() -> Self {
        Self {
            routes: IntentKind::DEFAULT_ORDER
                .iter()
                .map(|&kind| Route {
                    kind,
                    trigger: trigger_for(kind),
                })
                .collect(),
            mode: ExtractionMode::Legacy,
        }
    }

    /// Router with a custom priority. Kinds left out are never routed.
    pub fn with_order(order: &[IntentKind]) -> Result<Self, RouteError> {
        let mut routes: Vec<Route> = Vec::with_capacity(order.len());
        for &kind in order {
            if routes.iter().any(|route| route.kind == kind) {
                return Err(RouteError::DuplicateIntent(kind));
            }
            routes.push(Route {
                kind,
                trigger: trigger_for(kind),
            });
        }
        Ok(Self {
            routes,
            mode: ExtractionMode::Legacy,
        })
    }

    pub fn with_mode(mut self, mode: ExtractionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn order(&self) -> Vec<IntentKind> {
        self.routes.iter().map(|route| route.kind).collect()
    }

    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    /// Classify already-normalized text.
    pub fn classify(&self, text: &str) -> QueryIntent {
        self.routes
            .iter()
            .find(|route| (route.trigger)(text))
            .map(|route| self.extract(route.kind, text))
            .unwrap_or(QueryIntent::Unrecognized)
    }

    fn extract(&self, kind: IntentKind, text: &str) -> QueryIntent {
        let corrected = self.mode == ExtractionMode::Corrected;
        match kind {
            IntentKind::SpeedRange if corrected => {
                QueryIntent::SpeedRange(slots::extract_speed_range_sorted(text))
            }
            IntentKind::SpeedRange => QueryIntent::SpeedRange(slots::extract_speed_range(text)),
            IntentKind::Owner => QueryIntent::Owner(slots::extract_owner(text).unwrap_or_default()),
            IntentKind::VesselName => QueryIntent::VesselName(slots::extract_vessel_name(text)),
            IntentKind::Status => match slots::extract_status(text) {
                Some(status) => QueryIntent::Status(status),
                None => QueryIntent::Unrecognized,
            },
            IntentKind::Flag if corrected => QueryIntent::Flag(slots::extract_flag_bounded(text)),
            IntentKind::Flag => QueryIntent::Flag(slots::extract_flag(text)),
        }
    }

    /// Answer one raw query against `store`.
    ///
    /// Never fails: store errors become an "An error occurred" reply. At most
    /// one session is opened, and it is dropped before this returns.
    pub fn process(&self, store: &dyn VesselStore, raw: &str) -> QueryReply {
        let text = normalize(raw);
        let intent = self.classify(&text);
        debug!(query = %text, intent = ?intent.kind(), "classified query");

        match self.answer(store, &intent) {
            Ok(reply) => reply,
            Err(e) => {
                warn!(query = %text, error = %e, "store error while answering query");
                QueryReply::error(e)
            }
        }
    }

    fn answer(&self, store: &dyn VesselStore, intent: &QueryIntent) -> Result<QueryReply, StoreError> {
        if matches!(intent, QueryIntent::Unrecognized) {
            return Ok(QueryReply::unrecognized());
        }
        let Some(filter) = intent.filter() else {
            return Ok(formatter::clarify(intent));
        };

        let session = store.open()?;
        let rows = session.fetch(&filter)?;
        drop(session);

        debug!(rows = rows.len(), "fetched vessel records");
        Ok(formatter::format_results(intent, &filter, &rows))
    }
}
