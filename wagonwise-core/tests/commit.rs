//! Timed travel commits on the tokio clock. Built only with `--features async`.
use std::time::Duration;

use wagonwise_core::{ConfirmOutcome, RouteMap, SelectionPhase, TravelError, TravelSelection};

fn route_ready(map: &RouteMap) -> TravelSelection<'_> {
    let mut selection = TravelSelection::new(map);
    selection.pick("valentine").unwrap();
    selection.pick("saintdenis").unwrap();
    selection
}

#[tokio::test(start_paused = true)]
async fn commit_travel_waits_out_the_hold() {
    let map = RouteMap::frontier();
    let mut selection = route_ready(&map);
    let started = tokio::time::Instant::now();
    let mut balance = 25.0_f64;
    let outcome = selection
        .commit_travel(balance, |_, cost| balance -= f64::from(cost))
        .await
        .unwrap();
    assert!(matches!(outcome, ConfirmOutcome::Started(_)));
    assert!(started.elapsed() >= Duration::from_millis(3_000));
    assert!((balance - 15.0).abs() < f64::EPSILON);
    assert_eq!(selection.phase(), SelectionPhase::OriginOnly);
    assert_eq!(selection.origin().unwrap(), "saintdenis");
}

#[tokio::test(start_paused = true)]
async fn dropped_commit_still_lands_once() {
    let map = RouteMap::frontier();
    let mut selection = route_ready(&map);
    let mut fired = 0;
    let timed_out = tokio::time::timeout(
        Duration::from_millis(10),
        selection.commit_travel(25.0, |_, _| fired += 1),
    )
    .await;
    assert!(timed_out.is_err());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(fired, 1);
    assert_eq!(selection.phase(), SelectionPhase::OriginOnly);
    assert_eq!(selection.origin().unwrap(), "saintdenis");
    assert_eq!(selection.pick("rhodes"), Ok(SelectionPhase::RouteReady));
    assert_eq!(selection.reset(), Ok(()));
}

#[tokio::test(start_paused = true)]
async fn unaffordable_commit_never_locks() {
    let map = RouteMap::frontier();
    let mut selection = route_ready(&map);
    let mut fired = false;
    let err = selection
        .commit_travel(9.0, |_, _| fired = true)
        .await
        .unwrap_err();
    assert_eq!(err, TravelError::Unaffordable { cost: 10, funds: 9.0 });
    assert!(!fired);
    assert_eq!(selection.phase(), SelectionPhase::RouteReady);
}
