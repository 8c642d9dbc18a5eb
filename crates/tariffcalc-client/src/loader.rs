use tariffcalc_core::{AvailabilityIndex, ServiceKind};

use crate::client::TariffClient;

/// Fetches warehouses and lockers concurrently and builds the index.
///
/// Never fails as a whole: a list that could not be fetched is logged, left
/// empty, and recorded via [`AvailabilityIndex::failed_lists`].
pub async fn load_availability(client: &TariffClient) -> AvailabilityIndex {
    let (warehouses, lockers) = tokio::join!(client.fetch_warehouses(), client.fetch_lockers());
    let index = AvailabilityIndex::from_results(warehouses, lockers);
    tracing::info!(
        warehouses = index.len(ServiceKind::Warehouse),
        lockers = index.len(ServiceKind::Locker),
        failed = index.has_load_error(),
        "availability index loaded"
    );
    index
}
