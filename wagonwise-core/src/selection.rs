//! Origin/destination picking and the timed travel commit.
//!
//! ```text
//! Idle --pick N--> OriginOnly(N) --pick M != N--> RouteReady(N, M)
//!   ^                  |  pick N                     |  pick M' -> RouteReady(N, M')
//!   +------------------+--------- pick N ------------+
//! RouteReady --confirm (funds >= cost)--> Committing --finish--> OriginOnly(M)
//! ```
//!
//! Committing locks the selection: picks are ignored, reset is rejected, and
//! a second confirm is a no-op until [`TravelSelection::finish_commit`] runs.
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::graph::{NodeId, PathEdge, path_to_edges};
use crate::topology::RouteMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    Idle,
    OriginOnly,
    RouteReady,
    Committing,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TravelError {
    #[error("unknown location {0}")]
    UnknownLocation(String),
    #[error("no route selected: pick an origin and a destination first")]
    NoRoute,
    #[error("travel costs ${cost} but only ${funds:.2} is available")]
    Unaffordable { cost: u32, funds: f64 },
    #[error("a trip is already in flight; wait for it to land")]
    CommitInFlight,
}

/// Trip handed to whoever owns the timer once `confirm` succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTravel {
    pub origin: NodeId,
    pub destination: NodeId,
    pub cost: u32,
    pub hold: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Started(PendingTravel),
    /// A commit is already in flight; nothing changed.
    AlreadyCommitting,
}

/// Per-session selection state over a shared [`RouteMap`].
#[derive(Debug, Clone)]
pub struct TravelSelection<'a> {
    map: &'a RouteMap,
    phase: SelectionPhase,
    origin: Option<NodeId>,
    destination: Option<NodeId>,
    cost: u32,
    path: Vec<NodeId>,
}

impl<'a> TravelSelection<'a> {
    #[must_use]
    pub const fn new(map: &'a RouteMap) -> Self {
        Self {
            map,
            phase: SelectionPhase::Idle,
            origin: None,
            destination: None,
            cost: 0,
            path: Vec::new(),
        }
    }

    /// Start a session with the player's current location already chosen.
    ///
    /// # Errors
    ///
    /// Returns [`TravelError::UnknownLocation`] if `origin` is not on the map.
    pub fn starting_at(map: &'a RouteMap, origin: &str) -> Result<Self, TravelError> {
        let mut selection = Self::new(map);
        selection.pick(origin)?;
        Ok(selection)
    }

    #[must_use]
    pub const fn phase(&self) -> SelectionPhase {
        self.phase
    }

    #[must_use]
    pub const fn origin(&self) -> Option<&NodeId> {
        self.origin.as_ref()
    }

    #[must_use]
    pub const fn destination(&self) -> Option<&NodeId> {
        self.destination.as_ref()
    }

    /// Fare for the current route; zero unless a destination is set.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    #[must_use]
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    #[must_use]
    pub fn path_edges(&self) -> Vec<PathEdge> {
        path_to_edges(&self.path)
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        matches!(self.phase, SelectionPhase::Committing)
    }

    #[must_use]
    pub fn can_afford(&self, funds: f64) -> bool {
        matches!(self.phase, SelectionPhase::RouteReady) && funds >= f64::from(self.cost)
    }

    /// Apply a node pick and return the resulting phase.
    ///
    /// # Errors
    ///
    /// Returns [`TravelError::UnknownLocation`] for ids missing from the map;
    /// the selection is left untouched.
    pub fn pick(&mut self, node: &str) -> Result<SelectionPhase, TravelError> {
        if self.is_locked() {
            log::debug!("ignoring pick of {node} while a trip is committing");
            return Ok(self.phase);
        }
        if !self.map.contains(node) {
            return Err(TravelError::UnknownLocation(node.to_string()));
        }

        let has_origin = matches!(
            self.phase,
            SelectionPhase::OriginOnly | SelectionPhase::RouteReady
        ) && self.origin.is_some();
        if !has_origin {
            self.clear();
            self.origin = Some(NodeId::from(node));
            self.phase = SelectionPhase::OriginOnly;
        } else if self.origin.as_ref().is_some_and(|origin| origin == node) {
            self.clear();
        } else if self.destination.as_ref().is_some_and(|dest| dest == node) {
            return Ok(self.phase);
        } else {
            self.set_destination(node);
        }
        log::debug!(
            "selection now {:?} (origin {:?}, destination {:?}, cost {})",
            self.phase,
            self.origin,
            self.destination,
            self.cost
        );
        Ok(self.phase)
    }

    fn set_destination(&mut self, node: &str) {
        let Some(origin) = self.origin.as_ref() else {
            return;
        };
        self.cost = self.map.fare_between(origin.as_str(), node).unwrap_or(0);
        self.path = self.map.shortest_path(origin.as_str(), node);
        self.destination = Some(NodeId::from(node));
        self.phase = SelectionPhase::RouteReady;
    }

    fn clear(&mut self) {
        self.phase = SelectionPhase::Idle;
        self.origin = None;
        self.destination = None;
        self.cost = 0;
        self.path.clear();
    }

    /// Drop the selection back to Idle.
    ///
    /// # Errors
    ///
    /// Returns [`TravelError::CommitInFlight`] while committing.
    pub fn reset(&mut self) -> Result<(), TravelError> {
        if self.is_locked() {
            return Err(TravelError::CommitInFlight);
        }
        self.clear();
        Ok(())
    }

    /// Lock the selection and hand back the trip to schedule.
    ///
    /// # Errors
    ///
    /// Returns [`TravelError::NoRoute`] outside `RouteReady` and
    /// [`TravelError::Unaffordable`] when `funds` cannot cover the fare; in
    /// both cases nothing changes.
    pub fn confirm(&mut self, funds: f64) -> Result<ConfirmOutcome, TravelError> {
        if self.is_locked() {
            return Ok(ConfirmOutcome::AlreadyCommitting);
        }
        let (SelectionPhase::RouteReady, Some(origin), Some(destination)) =
            (self.phase, self.origin.as_ref(), self.destination.as_ref())
        else {
            return Err(TravelError::NoRoute);
        };
        if funds.is_nan() || funds < f64::from(self.cost) {
            return Err(TravelError::Unaffordable {
                cost: self.cost,
                funds,
            });
        }
        let pending = PendingTravel {
            origin: origin.clone(),
            destination: destination.clone(),
            cost: self.cost,
            hold: self.map.travel_config().commit_hold(),
        };
        self.phase = SelectionPhase::Committing;
        Ok(ConfirmOutcome::Started(pending))
    }

    /// Land the in-flight trip: the destination becomes the new origin and
    /// `on_commit(destination, cost)` runs exactly once. Returns `false`
    /// (without calling `on_commit`) when nothing is committing.
    pub fn finish_commit<F>(&mut self, on_commit: F) -> bool
    where
        F: FnOnce(&NodeId, u32),
    {
        if !self.is_locked() {
            return false;
        }
        let Some(destination) = self.destination.take() else {
            self.clear();
            return false;
        };
        let cost = self.cost;
        self.origin = Some(destination.clone());
        self.cost = 0;
        self.path.clear();
        self.phase = SelectionPhase::OriginOnly;
        log::info!("travel landed at {destination} for ${cost}");
        on_commit(&destination, cost);
        true
    }

    /// Confirm, wait out the hold on the tokio clock, then land the trip.
    ///
    /// Committing cannot be cancelled: if this future is dropped during the
    /// hold, the trip lands immediately and `on_commit` still runs once.
    ///
    /// # Errors
    ///
    /// Propagates [`TravelSelection::confirm`] errors.
    #[cfg(feature = "async")]
    pub async fn commit_travel<F>(
        &mut self,
        funds: f64,
        on_commit: F,
    ) -> Result<ConfirmOutcome, TravelError>
    where
        F: FnOnce(&NodeId, u32),
    {
        let outcome = self.confirm(funds)?;
        if let ConfirmOutcome::Started(pending) = &outcome {
            let mut landing = LandOnDrop {
                selection: self,
                on_commit: Some(on_commit),
            };
            tokio::time::sleep(pending.hold).await;
            landing.land();
        }
        Ok(outcome)
    }
}

/// Lands a committing selection exactly once, even when the owning future
/// is dropped mid-hold.
#[cfg(feature = "async")]
struct LandOnDrop<'s, 'a, F>
where
    F: FnOnce(&NodeId, u32),
{
    selection: &'s mut TravelSelection<'a>,
    on_commit: Option<F>,
}

#[cfg(feature = "async")]
impl<F> LandOnDrop<'_, '_, F>
where
    F: FnOnce(&NodeId, u32),
{
    fn land(&mut self) {
        if let Some(on_commit) = self.on_commit.take() {
            self.selection.finish_commit(on_commit);
        }
    }
}

#[cfg(feature = "async")]
impl<F> Drop for LandOnDrop<'_, '_, F>
where
    F: FnOnce(&NodeId, u32),
{
    fn drop(&mut self) {
        if self.on_commit.is_some() {
            log::warn!("travel commit interrupted during the hold; landing now");
            self.land();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_ready(map: &RouteMap) -> TravelSelection<'_> {
        let mut selection = TravelSelection::new(map);
        selection.pick("valentine").unwrap();
        selection.pick("saintdenis").unwrap();
        selection
    }

    #[test]
    fn picks_walk_idle_origin_route() {
        let map = RouteMap::frontier();
        let mut selection = TravelSelection::new(&map);
        assert_eq!(selection.phase(), SelectionPhase::Idle);
        assert_eq!(selection.pick("valentine"), Ok(SelectionPhase::OriginOnly));
        assert_eq!(selection.cost(), 0);
        assert_eq!(selection.pick("saintdenis"), Ok(SelectionPhase::RouteReady));
        assert_eq!(selection.cost(), 10);
        assert_eq!(selection.path().len(), 3);
        assert_eq!(selection.path_edges().len(), 2);
    }

    #[test]
    fn picking_origin_again_resets() {
        let map = RouteMap::frontier();
        let mut selection = TravelSelection::new(&map);
        selection.pick("rhodes").unwrap();
        assert_eq!(selection.pick("rhodes"), Ok(SelectionPhase::Idle));
        assert!(selection.origin().is_none());

        let mut selection = route_ready(&map);
        assert_eq!(selection.pick("valentine"), Ok(SelectionPhase::Idle));
        assert!(selection.destination().is_none());
        assert!(selection.path().is_empty());
    }

    #[test]
    fn new_destination_replaces_old_and_recomputes() {
        let map = RouteMap::frontier();
        let mut selection = route_ready(&map);
        assert_eq!(selection.pick("emerald_ranch"), Ok(SelectionPhase::RouteReady));
        assert_eq!(selection.destination().unwrap(), "emerald_ranch");
        assert_eq!(selection.origin().unwrap(), "valentine");
        // hypot(40, 15) = 42.7
        assert_eq!(selection.cost(), 5);
        assert_eq!(selection.path().len(), 2);
    }

    #[test]
    fn unknown_pick_is_rejected_without_change() {
        let map = RouteMap::frontier();
        let mut selection = route_ready(&map);
        assert_eq!(
            selection.pick("atlantis"),
            Err(TravelError::UnknownLocation("atlantis".into()))
        );
        assert_eq!(selection.phase(), SelectionPhase::RouteReady);
        assert_eq!(selection.destination().unwrap(), "saintdenis");
    }

    #[test]
    fn confirm_requires_route_and_funds() {
        let map = RouteMap::frontier();
        let mut selection = TravelSelection::new(&map);
        assert_eq!(selection.confirm(100.0), Err(TravelError::NoRoute));
        selection.pick("valentine").unwrap();
        assert_eq!(selection.confirm(100.0), Err(TravelError::NoRoute));

        let mut selection = route_ready(&map);
        assert!(!selection.can_afford(9.99));
        assert_eq!(
            selection.confirm(9.99),
            Err(TravelError::Unaffordable {
                cost: 10,
                funds: 9.99
            })
        );
        assert_eq!(selection.phase(), SelectionPhase::RouteReady);
        assert_eq!(selection.confirm(f64::NAN).ok(), None);
        assert_eq!(selection.phase(), SelectionPhase::RouteReady);
    }

    #[test]
    fn committing_locks_until_finished() {
        let map = RouteMap::frontier();
        let mut selection = route_ready(&map);
        let outcome = selection.confirm(25.0).unwrap();
        let ConfirmOutcome::Started(pending) = outcome else {
            panic!("expected a started commit");
        };
        assert_eq!(pending.cost, 10);
        assert_eq!(pending.hold, Duration::from_millis(3_000));
        assert_eq!(selection.phase(), SelectionPhase::Committing);

        assert_eq!(selection.confirm(25.0), Ok(ConfirmOutcome::AlreadyCommitting));
        assert_eq!(selection.reset(), Err(TravelError::CommitInFlight));
        assert_eq!(selection.pick("valentine"), Ok(SelectionPhase::Committing));
        assert_eq!(selection.destination().unwrap(), "saintdenis");

        let mut landed = Vec::new();
        assert!(selection.finish_commit(|dest, cost| landed.push((dest.clone(), cost))));
        assert_eq!(landed, vec![(NodeId::from("saintdenis"), 10)]);
        assert_eq!(selection.phase(), SelectionPhase::OriginOnly);
        assert_eq!(selection.origin().unwrap(), "saintdenis");
        assert!(selection.destination().is_none());

        assert!(!selection.finish_commit(|_, _| panic!("must not fire twice")));
        assert_eq!(selection.reset(), Ok(()));
        assert_eq!(selection.phase(), SelectionPhase::Idle);
    }

    #[test]
    fn starting_at_sets_origin() {
        let map = RouteMap::frontier();
        let selection = TravelSelection::starting_at(&map, "armadillo").unwrap();
        assert_eq!(selection.phase(), SelectionPhase::OriginOnly);
        assert!(TravelSelection::starting_at(&map, "atlantis").is_err());
    }
}
