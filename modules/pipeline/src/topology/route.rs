//! Routing and division pipeline: `actions` → `action-a` | `action-b`.
//!
//! Case-insensitive match on `action_type` against the two route keys.
//! Records matching neither route are dropped from both outputs; that is
//! intentional filtering, not an error. A record that fails to decode is
//! treated as matching no route (the filter predicate is false on decode
//! error), logged, and dropped.

use crate::codec;
use crate::contracts::GenericAction;

use super::Emission;

const PIPELINE: &str = "routing-division";

/// The two routes an action can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    A,
    B,
}

impl Route {
    fn details_prefix(self) -> &'static str {
        match self {
            Route::A => "ACTION_A_PROCESSED: ",
            Route::B => "ACTION_B_PROCESSED: ",
        }
    }
}

/// Classify an action; `None` means it matches neither route.
pub fn classify(action: &GenericAction) -> Option<Route> {
    if action.action_type.eq_ignore_ascii_case("A") {
        Some(Route::A)
    } else if action.action_type.eq_ignore_ascii_case("B") {
        Some(Route::B)
    } else {
        None
    }
}

/// Pure transform applied to an action on its matched route.
pub fn process(action: &GenericAction, route: Route) -> GenericAction {
    GenericAction {
        action_type: action.action_type.clone(),
        details: format!("{}{}", route.details_prefix(), action.details),
    }
}

/// Map one input payload to its emissions: one record on the matched
/// route's channel, or nothing.
pub fn emissions(channel_a: &str, channel_b: &str, payload: &[u8]) -> Vec<Emission> {
    let action: GenericAction = match codec::decode(payload) {
        Ok(a) => a,
        Err(e) => {
            tracing::warn!(pipeline = PIPELINE, error = %e, "undecodable action matches no route");
            return Vec::new();
        }
    };

    let Some(route) = classify(&action) else {
        return Vec::new();
    };

    let channel = match route {
        Route::A => channel_a,
        Route::B => channel_b,
    };

    match codec::encode(&process(&action, route)) {
        Ok(bytes) => vec![Emission::new(channel, bytes)],
        Err(e) => {
            tracing::warn!(pipeline = PIPELINE, error = %e, "failed to encode routed action");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(action_type: &str) -> GenericAction {
        GenericAction {
            action_type: action_type.to_string(),
            details: "d".to_string(),
        }
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify(&action("A")), Some(Route::A));
        assert_eq!(classify(&action("a")), Some(Route::A));
        assert_eq!(classify(&action("B")), Some(Route::B));
        assert_eq!(classify(&action("b")), Some(Route::B));
    }

    #[test]
    fn test_classify_rejects_other_values() {
        assert_eq!(classify(&action("C")), None);
        assert_eq!(classify(&action("AB")), None);
        assert_eq!(classify(&action("")), None);
    }

    #[test]
    fn test_process_prefixes_details_per_route() {
        assert_eq!(
            process(&action("A"), Route::A).details,
            "ACTION_A_PROCESSED: d"
        );
        assert_eq!(
            process(&action("B"), Route::B).details,
            "ACTION_B_PROCESSED: d"
        );
    }

    #[test]
    fn test_emissions_route_a_only_to_channel_a() {
        let payload = codec::encode(&action("a")).unwrap();

        let out = emissions("action-a", "action-b", &payload);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].channel, "action-a");
    }

    #[test]
    fn test_emissions_drop_unmatched_action() {
        let payload = codec::encode(&action("C")).unwrap();
        assert!(emissions("action-a", "action-b", &payload).is_empty());
    }

    #[test]
    fn test_emissions_drop_undecodable_record() {
        assert!(emissions("action-a", "action-b", b"not json").is_empty());
    }
}
