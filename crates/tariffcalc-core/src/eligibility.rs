//! Tariff eligibility: whether to warn about a selection and whether the
//! calculate action must be disabled.
//!
//! Both checks are pure functions of the index state and the current
//! selection. Requirements per tariff come from
//! [`TariffType::origin_requirement`] and
//! [`TariffType::destination_requirement`].
//!
//! A list that failed to load is empty, so its requirement is never met and
//! the calculation stays blocked. Callers should treat a blocked result after
//! a load error as "could not verify", not as a confirmed absence.

use std::fmt;

use crate::availability::IndexState;
use crate::tariff::{Requirement, TariffType};
use crate::types::CitySelection;

/// User-facing warning about an unmet tariff requirement.
///
/// `Display` gives the English text; [`WarningMessage::message_key`] gives a
/// stable key for callers that translate messages themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningMessage {
    NoWarehouseAtOrigin { city: String },
    NoWarehouseAtDestination { city: String },
    NoLockerAtOrigin { city: String },
    NoLockerAtDestination { city: String },
    /// OFFICE_OFFICE with neither city having a warehouse.
    NoWarehousesAtEitherEnd { origin: String, destination: String },
}

impl WarningMessage {
    #[must_use]
    pub fn message_key(&self) -> &'static str {
        match self {
            WarningMessage::NoWarehouseAtOrigin { .. } => "tariff.warning.no_warehouse_origin",
            WarningMessage::NoWarehouseAtDestination { .. } => {
                "tariff.warning.no_warehouse_destination"
            }
            WarningMessage::NoLockerAtOrigin { .. } => "tariff.warning.no_locker_origin",
            WarningMessage::NoLockerAtDestination { .. } => "tariff.warning.no_locker_destination",
            WarningMessage::NoWarehousesAtEitherEnd { .. } => "tariff.warning.no_warehouses",
        }
    }
}

impl fmt::Display for WarningMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningMessage::NoWarehouseAtOrigin { city } => {
                write!(f, "There is no office in {city} to drop the parcel off at.")
            }
            WarningMessage::NoWarehouseAtDestination { city } => {
                write!(f, "There is no office in {city} to pick the parcel up from.")
            }
            WarningMessage::NoLockerAtOrigin { city } => {
                write!(f, "There is no parcel locker in {city} to send from.")
            }
            WarningMessage::NoLockerAtDestination { city } => {
                write!(f, "There is no parcel locker in {city} to deliver to.")
            }
            WarningMessage::NoWarehousesAtEitherEnd {
                origin,
                destination,
            } => write!(
                f,
                "Neither {origin} nor {destination} has an office. Choose a door delivery tariff."
            ),
        }
    }
}

/// Combined outcome of [`evaluate_warning`] and [`evaluate_disable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityResult {
    pub blocked: bool,
    pub warning_visible: bool,
    pub message: Option<WarningMessage>,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Origin,
    Destination,
}

/// Decides which warning, if any, to show for the current selection.
///
/// No warning while the tariff is unset or the index is loading. A side with
/// no city selected is not checked. For OFFICE_OFFICE with both cities
/// lacking an office the combined message is returned; otherwise the origin
/// is reported before the destination.
#[must_use]
pub fn evaluate_warning<C>(
    state: &IndexState,
    origin: Option<&C>,
    destination: Option<&C>,
    tariff: Option<TariffType>,
) -> Option<WarningMessage>
where
    C: CitySelection + ?Sized,
{
    let tariff = tariff?;
    let index = state.ready()?;

    let origin = selected(origin);
    let destination = selected(destination);

    let origin_requirement = tariff.origin_requirement();
    let destination_requirement = tariff.destination_requirement();

    let origin_unmet = origin.filter(|city| !index.satisfies(origin_requirement, *city));
    let destination_unmet =
        destination.filter(|city| !index.satisfies(destination_requirement, *city));

    match (origin_unmet, destination_unmet) {
        (Some(o), Some(d)) if tariff == TariffType::OfficeOffice => {
            Some(WarningMessage::NoWarehousesAtEitherEnd {
                origin: o.label().to_owned(),
                destination: d.label().to_owned(),
            })
        }
        (Some(o), _) => missing_message(Side::Origin, origin_requirement, o.label()),
        (None, Some(d)) => missing_message(Side::Destination, destination_requirement, d.label()),
        (None, None) => None,
    }
}

/// Whether the calculate action must be disabled.
///
/// Blocks when origin, destination or tariff is missing, while the index is
/// loading, or when any requirement is unmet. DOOR_DOOR has no requirements
/// and never blocks once the selection is complete and the index is ready.
#[must_use]
pub fn evaluate_disable<C>(
    state: &IndexState,
    origin: Option<&C>,
    destination: Option<&C>,
    tariff: Option<TariffType>,
) -> bool
where
    C: CitySelection + ?Sized,
{
    let (Some(origin), Some(destination), Some(tariff)) =
        (selected(origin), selected(destination), tariff)
    else {
        return true;
    };
    let Some(index) = state.ready() else {
        return true;
    };

    !(index.satisfies(tariff.origin_requirement(), origin)
        && index.satisfies(tariff.destination_requirement(), destination))
}

/// Runs both checks.
#[must_use]
pub fn evaluate<C>(
    state: &IndexState,
    origin: Option<&C>,
    destination: Option<&C>,
    tariff: Option<TariffType>,
) -> EligibilityResult
where
    C: CitySelection + ?Sized,
{
    let message = evaluate_warning(state, origin, destination, tariff);
    EligibilityResult {
        blocked: evaluate_disable(state, origin, destination, tariff),
        warning_visible: message.is_some(),
        message,
    }
}

/// A selection with a blank label counts as "not selected".
fn selected<C: CitySelection + ?Sized>(city: Option<&C>) -> Option<&C> {
    city.filter(|c| !c.label().trim().is_empty())
}

fn missing_message(side: Side, requirement: Requirement, city: &str) -> Option<WarningMessage> {
    let city = city.to_owned();
    match (side, requirement) {
        (_, Requirement::None) => None,
        (Side::Origin, Requirement::Warehouse) => Some(WarningMessage::NoWarehouseAtOrigin { city }),
        (Side::Destination, Requirement::Warehouse) => {
            Some(WarningMessage::NoWarehouseAtDestination { city })
        }
        (Side::Origin, Requirement::Locker) => Some(WarningMessage::NoLockerAtOrigin { city }),
        (Side::Destination, Requirement::Locker) => {
            Some(WarningMessage::NoLockerAtDestination { city })
        }
    }
}

#[cfg(test)]
#[path = "eligibility_test.rs"]
mod tests;
