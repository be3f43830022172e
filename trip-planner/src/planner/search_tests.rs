//! Unit tests for the branch-and-bound trip search.

use super::*;
use crate::domain::{DwellWindow, ExclusionRange, Itinerary, Leg, LocationCode, Price, Stop};
use crate::legs::LegStore;
use chrono::NaiveDate;

fn code(s: &str) -> LocationCode {
    LocationCode::parse(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn window(min: u32, max: u32) -> DwellWindow {
    DwellWindow::new(min, max).unwrap()
}

fn leg(from: &str, to: &str, on: &str, cents: u64) -> Leg {
    Leg::new(
        code(from),
        code(to),
        date(on),
        Price::from_cents(cents),
        "2:30",
        "Alaska",
    )
}

fn stop(location: &str, on: &str, cents: u64) -> Stop {
    Stop::new(code(location), date(on), Price::from_cents(cents))
}

fn exact() -> SearchConfig {
    SearchConfig {
        heuristic: HeuristicMode::Zero,
        ..SearchConfig::default()
    }
}

fn search(legs: &LegStore, config: &SearchConfig, request: &TripRequest) -> SearchResult {
    Planner::new(legs, config).search(request).unwrap()
}

fn round_trip_legs() -> LegStore {
    vec![
        leg("A", "B", "2024-01-01", 10),
        leg("B", "A", "2024-01-05", 10),
    ]
    .into_iter()
    .collect()
}

#[test]
fn single_destination_round_trip() {
    let legs = round_trip_legs();
    let request = TripRequest::new(code("A")).with_destination(code("B"), window(2, 5));

    for config in [SearchConfig::default(), exact()] {
        let result = search(&legs, &config, &request);
        assert!(result.is_complete());
        let itinerary = result.itinerary.expect("trip should be found");

        assert_eq!(
            itinerary.stops(),
            &[stop("B", "2024-01-01", 10), stop("A", "2024-01-05", 10)]
        );
        assert_eq!(itinerary.total_cost(), Price::from_cents(20));
    }
}

#[test]
fn exclusion_on_destination_leaves_no_path() {
    let legs = round_trip_legs();
    let request = TripRequest::new(code("A"))
        .with_destination(code("B"), window(2, 5))
        .with_exclusion(
            code("B"),
            ExclusionRange::new(date("2024-01-01"), date("2024-01-02")).unwrap(),
        );

    let result = search(&legs, &SearchConfig::default(), &request);

    assert!(result.itinerary.is_none());
    assert_eq!(result.termination, Termination::Exhausted);
}

#[test]
fn no_destinations_is_empty_trip() {
    let legs = round_trip_legs();
    let request = TripRequest::new(code("A"));

    let result = search(&legs, &SearchConfig::default(), &request);

    let itinerary = result.itinerary.unwrap();
    assert!(itinerary.is_empty());
    assert_eq!(itinerary.total_cost(), Price::ZERO);
    assert_eq!(result.nodes_expanded, 0);
}

#[test]
fn origin_without_legs_has_no_path() {
    let legs = round_trip_legs();
    let request = TripRequest::new(code("Z")).with_destination(code("B"), window(0, 10));

    let result = search(&legs, &exact(), &request);

    assert!(result.itinerary.is_none());
    assert_eq!(result.nodes_expanded, 1);
}

#[test]
fn origin_as_destination_is_rejected() {
    let legs = round_trip_legs();
    let request = TripRequest::new(code("A")).with_destination(code("A"), window(0, 1));

    let err = Planner::new(&legs, &SearchConfig::default())
        .search(&request)
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidRequest(_)));
}

#[test]
fn cheaper_return_outside_dwell_window_is_skipped() {
    let legs: LegStore = vec![
        leg("A", "B", "2024-01-01", 10),
        leg("B", "A", "2024-01-02", 1),
        leg("B", "A", "2024-01-05", 10),
        leg("B", "A", "2024-01-09", 2),
    ]
    .into_iter()
    .collect();
    let request = TripRequest::new(code("A")).with_destination(code("B"), window(2, 5));

    let itinerary = search(&legs, &exact(), &request).itinerary.unwrap();

    assert_eq!(itinerary.return_date(), Some(date("2024-01-05")));
    assert_eq!(itinerary.total_cost(), Price::from_cents(20));
}

#[test]
fn exclusion_at_origin_blocks_return_leg() {
    let legs: LegStore = vec![
        leg("A", "B", "2024-01-01", 10),
        leg("B", "A", "2024-01-05", 10),
        leg("B", "A", "2024-01-06", 15),
    ]
    .into_iter()
    .collect();
    let request = TripRequest::new(code("A"))
        .with_destination(code("B"), window(2, 5))
        .with_exclusion(
            code("A"),
            ExclusionRange::new(date("2024-01-05"), date("2024-01-05")).unwrap(),
        );

    let itinerary = search(&legs, &exact(), &request).itinerary.unwrap();

    assert_eq!(
        itinerary.stops(),
        &[stop("B", "2024-01-01", 10), stop("A", "2024-01-06", 15)]
    );
}

#[test]
fn legs_are_taken_in_date_order() {
    // The only return leg departs before the outbound arrives.
    let legs: LegStore = vec![
        leg("A", "B", "2024-01-05", 10),
        leg("B", "A", "2024-01-01", 10),
    ]
    .into_iter()
    .collect();
    let request = TripRequest::new(code("A")).with_destination(code("B"), window(0, 100));

    let result = search(&legs, &exact(), &request);

    assert!(result.itinerary.is_none());
}

#[test]
fn pass_through_stops_keep_date_order() {
    // C has no dwell window, but the cheap onward leg still leaves too early.
    let legs: LegStore = vec![
        leg("A", "C", "2024-01-05", 10),
        leg("C", "B", "2024-01-03", 1),
        leg("C", "B", "2024-01-06", 10),
        leg("B", "A", "2024-01-08", 10),
    ]
    .into_iter()
    .collect();
    let request = TripRequest::new(code("A")).with_destination(code("B"), window(0, 10));

    let itinerary = search(&legs, &exact(), &request).itinerary.unwrap();

    assert_eq!(
        itinerary.stops(),
        &[
            stop("C", "2024-01-05", 10),
            stop("B", "2024-01-06", 10),
            stop("A", "2024-01-08", 10),
        ]
    );
    assert_eq!(itinerary.total_cost(), Price::from_cents(30));
}

#[test]
fn two_destinations_each_visited_once() {
    let legs: LegStore = vec![
        leg("A", "B", "2024-01-01", 100),
        leg("B", "C", "2024-01-03", 50),
        leg("C", "B", "2024-01-04", 1),
        leg("C", "A", "2024-01-05", 100),
        leg("B", "A", "2024-01-06", 100),
    ]
    .into_iter()
    .collect();
    let request = TripRequest::new(code("A"))
        .with_destination(code("B"), window(0, 5))
        .with_destination(code("C"), window(0, 5));

    let itinerary = search(&legs, &exact(), &request).itinerary.unwrap();

    assert_eq!(
        itinerary.stops(),
        &[
            stop("B", "2024-01-01", 100),
            stop("C", "2024-01-03", 50),
            stop("A", "2024-01-05", 100),
        ]
    );
    assert_eq!(itinerary.total_cost(), Price::from_cents(250));
}

#[test]
fn equal_cost_trips_resolve_to_smallest_path() {
    let legs: LegStore = vec![
        leg("A", "C", "2024-01-01", 10),
        leg("A", "B", "2024-01-01", 10),
        leg("C", "B", "2024-01-03", 10),
        leg("B", "C", "2024-01-03", 10),
        leg("C", "A", "2024-01-05", 10),
        leg("B", "A", "2024-01-05", 10),
    ]
    .into_iter()
    .collect();
    let request = TripRequest::new(code("A"))
        .with_destination(code("B"), window(0, 5))
        .with_destination(code("C"), window(0, 5));

    for config in [SearchConfig::default(), exact()] {
        let itinerary = search(&legs, &config, &request).itinerary.unwrap();
        assert_eq!(
            itinerary.stops(),
            &[
                stop("B", "2024-01-01", 10),
                stop("C", "2024-01-03", 10),
                stop("A", "2024-01-05", 10),
            ]
        );
    }
}

#[test]
fn cheapest_hop_treats_missing_direct_hop_as_dead_end() {
    // The only trip passes back through the origin between destinations.
    let legs: LegStore = vec![
        leg("A", "B", "2024-01-01", 10),
        leg("B", "A", "2024-01-03", 10),
        leg("A", "C", "2024-01-04", 10),
        leg("C", "A", "2024-01-06", 10),
    ]
    .into_iter()
    .collect();
    let request = TripRequest::new(code("A"))
        .with_destination(code("B"), window(0, 5))
        .with_destination(code("C"), window(0, 5));

    let fast = search(&legs, &SearchConfig::default(), &request);
    assert!(fast.itinerary.is_none());

    let thorough = search(&legs, &exact(), &request);
    let itinerary = thorough.itinerary.unwrap();
    assert_eq!(itinerary.leg_count(), 4);
    assert_eq!(itinerary.total_cost(), Price::from_cents(40));
}

#[test]
fn expansion_limit_returns_best_so_far() {
    let legs: LegStore = vec![
        leg("A", "B", "2024-01-01", 10),
        leg("B", "A", "2024-01-05", 10),
        leg("A", "B", "2024-01-01", 19),
    ]
    .into_iter()
    .collect();
    let request = TripRequest::new(code("A")).with_destination(code("B"), window(0, 10));

    let limited = SearchConfig::new(2, 60_000, HeuristicMode::CheapestHop);
    let result = search(&legs, &limited, &request);
    assert_eq!(result.termination, Termination::ExpansionLimit);
    assert!(!result.is_complete());
    assert_eq!(result.nodes_expanded, 2);
    assert_eq!(
        result.itinerary.map(|i| i.total_cost()),
        Some(Price::from_cents(20))
    );

    let enough = SearchConfig::new(3, 60_000, HeuristicMode::CheapestHop);
    let result = search(&legs, &enough, &request);
    assert_eq!(result.termination, Termination::Exhausted);
    assert_eq!(result.nodes_expanded, 3);
}

#[test]
fn zero_time_limit_stops_immediately() {
    let legs = round_trip_legs();
    let request = TripRequest::new(code("A")).with_destination(code("B"), window(2, 5));
    let config = SearchConfig::new(1_000, 0, HeuristicMode::Zero);

    let result = search(&legs, &config, &request);

    assert_eq!(result.termination, Termination::TimeLimit);
    assert_eq!(result.nodes_expanded, 0);
    assert!(result.itinerary.is_none());
}

mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    const NAMES: [&str; 4] = ["A", "B", "C", "D"];

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn day(offset: u8) -> NaiveDate {
        base() + chrono::Days::new(u64::from(offset))
    }

    /// A small trip problem over at most four locations. Legs only touch the
    /// origin and the required destinations.
    #[derive(Debug, Clone)]
    struct Problem {
        legs: Vec<Leg>,
        request: TripRequest,
    }

    fn problem_strategy() -> impl Strategy<Value = Problem> {
        let windows = prop::collection::vec((0u32..3, 0u32..5), 3);
        let chosen = prop::collection::vec(any::<bool>(), 3);
        let legs = prop::collection::vec((0usize..4, 1usize..4, 0u8..12, 1u64..40), 0..24);
        let exclusions = prop::collection::vec((0usize..4, 0u8..12, 0u8..2), 0..2);

        (windows, chosen, legs, exclusions).prop_map(|(windows, chosen, raw_legs, raw_excl)| {
            let mut request = TripRequest::new(code("A"));
            for (i, (&keep, (min, extra))) in chosen.iter().zip(windows).enumerate() {
                if keep {
                    request = request.with_destination(code(NAMES[i + 1]), window(min, min + extra));
                }
            }

            let in_play = |i: usize| i == 0 || request.destinations.contains_key(&code(NAMES[i]));

            let legs = raw_legs
                .into_iter()
                .map(|(from, shift, offset, cents)| (from, (from + shift) % 4, offset, cents))
                .filter(|&(from, to, _, _)| in_play(from) && in_play(to))
                .map(|(from, to, offset, cents)| {
                    Leg::new(
                        code(NAMES[from]),
                        code(NAMES[to]),
                        day(offset),
                        Price::from_cents(cents),
                        "1:00",
                        "Delta",
                    )
                })
                .collect();

            for (loc, offset, len) in raw_excl {
                let range = ExclusionRange::new(day(offset), day(offset + len)).unwrap();
                request = request.with_exclusion(code(NAMES[loc]), range);
            }

            Problem { legs, request }
        })
    }

    /// Whether taking `leg` after arriving at its origin on `arrived` is allowed.
    fn allowed(
        request: &TripRequest,
        leg: &Leg,
        arrived: Option<NaiveDate>,
        remaining: &BTreeSet<LocationCode>,
    ) -> bool {
        if leg.destination != request.origin && !remaining.contains(&leg.destination) {
            return false;
        }
        if let Some(arrived) = arrived {
            if leg.date < arrived {
                return false;
            }
            if let Some(w) = request.destinations.get(&leg.origin) {
                let stay = (leg.date - arrived).num_days();
                if stay < i64::from(w.min_days()) || stay > i64::from(w.max_days()) {
                    return false;
                }
            }
        }
        !request.exclusions.excludes(&leg.origin, leg.date)
            && !request.exclusions.excludes(&leg.destination, leg.date)
    }

    /// Cheapest feasible trip by exhaustive enumeration.
    fn brute_force(legs: &[Leg], request: &TripRequest) -> Option<u64> {
        fn walk(
            legs: &[Leg],
            request: &TripRequest,
            at: &LocationCode,
            arrived: Option<NaiveDate>,
            remaining: &BTreeSet<LocationCode>,
            cost: u64,
            best: &mut Option<u64>,
        ) {
            if remaining.is_empty() && at == &request.origin {
                *best = Some(best.map_or(cost, |b| b.min(cost)));
                return;
            }
            for leg in legs.iter().filter(|l| &l.origin == at) {
                if !allowed(request, leg, arrived, remaining) {
                    continue;
                }
                let mut next = remaining.clone();
                next.remove(&leg.destination);
                walk(
                    legs,
                    request,
                    &leg.destination,
                    Some(leg.date),
                    &next,
                    cost + leg.price.cents(),
                    best,
                );
            }
        }

        let remaining: BTreeSet<_> = request.destinations.keys().cloned().collect();
        let mut best = None;
        walk(legs, request, &request.origin, None, &remaining, 0, &mut best);
        best
    }

    /// Check a returned trip against the legs and constraints it was built from.
    fn check_feasible(
        legs: &[Leg],
        request: &TripRequest,
        itinerary: &Itinerary,
    ) -> Result<(), String> {
        let mut at = request.origin.clone();
        let mut arrived = None;
        let mut remaining: BTreeSet<_> = request.destinations.keys().cloned().collect();

        for stop in itinerary.stops() {
            let leg = legs
                .iter()
                .find(|l| {
                    l.origin == at
                        && l.destination == stop.location
                        && l.date == stop.date
                        && l.price == stop.price
                })
                .ok_or_else(|| format!("no leg {at} -> {} on {}", stop.location, stop.date))?;
            if !allowed(request, leg, arrived, &remaining) {
                return Err(format!(
                    "leg {at} -> {} on {} breaks a constraint",
                    stop.location, stop.date
                ));
            }
            remaining.remove(&leg.destination);
            at = leg.destination.clone();
            arrived = Some(leg.date);
        }

        if !remaining.is_empty() {
            return Err(format!("unvisited destinations: {remaining:?}"));
        }
        if at != request.origin {
            return Err(format!("trip ends at {at}, not {}", request.origin));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn zero_heuristic_matches_brute_force(problem in problem_strategy()) {
            let store: LegStore = problem.legs.iter().cloned().collect();
            let result = search(&store, &exact(), &problem.request);
            let expected = brute_force(&problem.legs, &problem.request);

            prop_assert!(result.is_complete());
            match (&result.itinerary, expected) {
                (Some(itinerary), Some(cost)) => {
                    prop_assert_eq!(itinerary.total_cost().cents(), cost);
                    if let Err(e) = check_feasible(&problem.legs, &problem.request, itinerary) {
                        prop_assert!(false, "{}", e);
                    }
                }
                (None, None) => {}
                (found, expected) => {
                    prop_assert!(false, "planner found {:?}, brute force found {:?}", found, expected);
                }
            }
        }

        #[test]
        fn cheapest_hop_is_feasible_and_never_below_optimum(problem in problem_strategy()) {
            let store: LegStore = problem.legs.iter().cloned().collect();
            let result = search(&store, &SearchConfig::default(), &problem.request);
            let optimum = brute_force(&problem.legs, &problem.request);

            if let Some(itinerary) = &result.itinerary {
                if let Err(e) = check_feasible(&problem.legs, &problem.request, itinerary) {
                    prop_assert!(false, "{}", e);
                }
                prop_assert!(optimum.is_some());
                prop_assert!(itinerary.total_cost().cents() >= optimum.unwrap_or(0));
            }
        }

        #[test]
        fn result_is_deterministic(problem in problem_strategy()) {
            let store: LegStore = problem.legs.iter().cloned().collect();
            let first = search(&store, &SearchConfig::default(), &problem.request);
            let second = search(&store, &SearchConfig::default(), &problem.request);

            prop_assert_eq!(first.itinerary, second.itinerary);
            prop_assert_eq!(first.nodes_expanded, second.nodes_expanded);
        }
    }
}
