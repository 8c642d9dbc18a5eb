//! In-memory index of warehouses and lockers, keyed by city.
//!
//! The index is built once per load and never mutated afterwards; a reload
//! replaces it wholesale. Lists that failed to load are kept empty, so every
//! query against them answers "not available".

use std::fmt;

use chrono::{DateTime, Utc};

use crate::matching::{find_first, CityKey, MatchKind};
use crate::tariff::Requirement;
use crate::types::{CitySelection, ServicePoint};

/// The two kinds of service point a tariff can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Warehouse,
    Locker,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Warehouse => write!(f, "warehouses"),
            ServiceKind::Locker => write!(f, "lockers"),
        }
    }
}

#[derive(Debug, Clone)]
struct IndexedPoint {
    point: ServicePoint,
    key: Option<CityKey>,
}

impl IndexedPoint {
    fn new(point: ServicePoint) -> Self {
        let key = CityKey::new(&point.city_name);
        Self { point, key }
    }
}

/// A service point found for a city, with the matching stage that found it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMatch<'a> {
    pub point: &'a ServicePoint,
    pub kind: MatchKind,
}

#[derive(Debug, Clone)]
pub struct AvailabilityIndex {
    warehouses: Vec<IndexedPoint>,
    lockers: Vec<IndexedPoint>,
    failed: Vec<ServiceKind>,
    loaded_at: DateTime<Utc>,
}

impl AvailabilityIndex {
    /// Builds an index from two successfully fetched lists.
    #[must_use]
    pub fn new(warehouses: Vec<ServicePoint>, lockers: Vec<ServicePoint>) -> Self {
        Self {
            warehouses: warehouses.into_iter().map(IndexedPoint::new).collect(),
            lockers: lockers.into_iter().map(IndexedPoint::new).collect(),
            failed: Vec::new(),
            loaded_at: Utc::now(),
        }
    }

    /// Builds an index from independently fetched lists.
    ///
    /// Each list is kept only if its own fetch succeeded; a failure in one
    /// never discards the other. Failures are logged and remembered so
    /// callers can surface a single "something failed" flag.
    #[must_use]
    pub fn from_results<E: fmt::Display>(
        warehouses: Result<Vec<ServicePoint>, E>,
        lockers: Result<Vec<ServicePoint>, E>,
    ) -> Self {
        let mut failed = Vec::new();
        let mut keep = |kind: ServiceKind, result: Result<Vec<ServicePoint>, E>| match result {
            Ok(points) => points,
            Err(e) => {
                tracing::warn!(list = %kind, error = %e, "failed to load service points");
                failed.push(kind);
                Vec::new()
            }
        };
        let warehouses = keep(ServiceKind::Warehouse, warehouses);
        let lockers = keep(ServiceKind::Locker, lockers);

        let mut index = Self::new(warehouses, lockers);
        index.failed = failed;
        index
    }

    /// An index with nothing in it, as left behind by a total load failure.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    #[must_use]
    pub fn has_warehouse(&self, city: &str) -> bool {
        self.find_warehouse(city).is_some()
    }

    #[must_use]
    pub fn has_locker(&self, city: &str) -> bool {
        self.find_locker(city).is_some()
    }

    #[must_use]
    pub fn find_warehouse(&self, city: &str) -> Option<PointMatch<'_>> {
        self.find(ServiceKind::Warehouse, city)
    }

    #[must_use]
    pub fn find_locker(&self, city: &str) -> Option<PointMatch<'_>> {
        self.find(ServiceKind::Locker, city)
    }

    /// Looks up the first point of `kind` in `city`. Blank input or an empty
    /// list yields `None`.
    #[must_use]
    pub fn find(&self, kind: ServiceKind, city: &str) -> Option<PointMatch<'_>> {
        let query = CityKey::new(city)?;
        find_first(&query, self.list(kind), |p| p.key.as_ref())
            .map(|(indexed, stage)| PointMatch {
                point: &indexed.point,
                kind: stage,
            })
    }

    /// Tries every spelling of `city` in order; the first spelling with a hit
    /// wins.
    #[must_use]
    pub fn find_for<C>(&self, kind: ServiceKind, city: &C) -> Option<PointMatch<'_>>
    where
        C: CitySelection + ?Sized,
    {
        city.spellings()
            .into_iter()
            .find_map(|spelling| self.find(kind, spelling))
    }

    #[must_use]
    pub fn has_warehouse_for<C: CitySelection + ?Sized>(&self, city: &C) -> bool {
        self.find_for(ServiceKind::Warehouse, city).is_some()
    }

    #[must_use]
    pub fn has_locker_for<C: CitySelection + ?Sized>(&self, city: &C) -> bool {
        self.find_for(ServiceKind::Locker, city).is_some()
    }

    /// Whether `city` meets `requirement`. [`Requirement::None`] is always met.
    #[must_use]
    pub fn satisfies<C: CitySelection + ?Sized>(&self, requirement: Requirement, city: &C) -> bool {
        match requirement {
            Requirement::None => true,
            Requirement::Warehouse => self.has_warehouse_for(city),
            Requirement::Locker => self.has_locker_for(city),
        }
    }

    /// All points of `kind` in backend order.
    pub fn points(&self, kind: ServiceKind) -> impl Iterator<Item = &ServicePoint> {
        self.list(kind).iter().map(|p| &p.point)
    }

    /// Points of `kind` whose city matches `city` at any stage.
    pub fn points_in<'a>(
        &'a self,
        kind: ServiceKind,
        city: &str,
    ) -> impl Iterator<Item = &'a ServicePoint> + 'a {
        let query = CityKey::new(city);
        self.list(kind).iter().filter_map(move |p| {
            let query = query.as_ref()?;
            let candidate = p.key.as_ref()?;
            crate::matching::match_kind(query, candidate).map(|_| &p.point)
        })
    }

    #[must_use]
    pub fn len(&self, kind: ServiceKind) -> usize {
        self.list(kind).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warehouses.is_empty() && self.lockers.is_empty()
    }

    /// `true` if any list failed to load.
    #[must_use]
    pub fn has_load_error(&self) -> bool {
        !self.failed.is_empty()
    }

    #[must_use]
    pub fn failed_lists(&self) -> &[ServiceKind] {
        &self.failed
    }

    #[must_use]
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    fn list(&self, kind: ServiceKind) -> &[IndexedPoint] {
        match kind {
            ServiceKind::Warehouse => &self.warehouses,
            ServiceKind::Locker => &self.lockers,
        }
    }
}

/// Availability as seen by the evaluator: still loading, or a finished index.
#[derive(Debug, Clone, Default)]
pub enum IndexState {
    #[default]
    Loading,
    Ready(AvailabilityIndex),
}

impl IndexState {
    #[must_use]
    pub fn ready(&self) -> Option<&AvailabilityIndex> {
        match self {
            IndexState::Loading => None,
            IndexState::Ready(index) => Some(index),
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, IndexState::Loading)
    }
}
