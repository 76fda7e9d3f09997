//! Display-name enrichment for public-transport legs.

use futures::future::join_all;
use tracing::warn;

use crate::routing::RouteLeg;

use super::ScheduleSource;

/// Attach human-readable line names to public-transport legs.
///
/// Lookups run concurrently and the input order is preserved. The display
/// line is the route's short name when the lookup finds one; otherwise the
/// raw route id stands in rather than the leg being dropped. The long name
/// is carried on the leg but never used for display.
pub(super) async fn enrich_legs<S: ScheduleSource>(
    schedule: &S,
    legs: Vec<RouteLeg>,
) -> Vec<RouteLeg> {
    join_all(legs.into_iter().map(|leg| enrich_leg(schedule, leg))).await
}

async fn enrich_leg<S: ScheduleSource>(schedule: &S, mut leg: RouteLeg) -> RouteLeg {
    if leg.leg_type != "pt" {
        return leg;
    }
    let Some(route_id) = leg.route_id.clone() else {
        return leg;
    };

    match schedule.route_names(&route_id).await {
        Ok(Some(names)) => {
            leg.display_line = names.short_name.clone().or(Some(route_id));
            leg.route_short_name = names.short_name;
            leg.route_long_name = names.long_name;
        }
        Ok(None) => leg.display_line = Some(route_id),
        Err(error) => {
            warn!(%route_id, %error, "route name lookup failed");
            leg.display_line = Some(route_id);
        }
    }

    leg
}
