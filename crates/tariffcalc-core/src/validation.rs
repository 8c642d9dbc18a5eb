//! Calculation form validation.
//!
//! Turns the user's selection into the body of `POST /api/calculate-tariff`,
//! or a field-level [`ValidationError`] when the form is incomplete.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::tariff::TariffType;
use crate::types::{City, Language};

/// Current contents of the calculation form.
#[derive(Debug, Clone, Default)]
pub struct CalculationForm {
    pub origin: Option<City>,
    pub destination: Option<City>,
    pub tariff: Option<TariffType>,
    /// Parcel weight in kilograms.
    pub weight: Option<f64>,
}

/// Request body for the calculate endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculateTariffRequest {
    pub from_latitude: f64,
    pub from_longitude: f64,
    pub to_latitude: f64,
    pub to_longitude: f64,
    pub weight: f64,
    pub tariff_type: TariffType,
}

impl CalculationForm {
    /// Validates the form and builds the request body.
    ///
    /// Fields are checked in form order: origin, destination, tariff, weight,
    /// then coordinates. The first problem found is returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn validate(&self) -> Result<CalculateTariffRequest, ValidationError> {
        let origin = self.origin.as_ref().ok_or(ValidationError::MissingOrigin)?;
        let destination = self
            .destination
            .as_ref()
            .ok_or(ValidationError::MissingDestination)?;
        let tariff_type = self.tariff.ok_or(ValidationError::MissingTariffType)?;
        let weight = self.weight.ok_or(ValidationError::MissingWeight)?;
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ValidationError::NonPositiveWeight(weight));
        }

        let (from_latitude, from_longitude) = coordinates_of(origin)?;
        let (to_latitude, to_longitude) = coordinates_of(destination)?;

        Ok(CalculateTariffRequest {
            from_latitude,
            from_longitude,
            to_latitude,
            to_longitude,
            weight,
            tariff_type,
        })
    }
}

fn coordinates_of(city: &City) -> Result<(f64, f64), ValidationError> {
    city.coordinates()
        .ok_or_else(|| ValidationError::MissingCoordinates {
            city: city.display_name(Language::default()).to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tashkent() -> City {
        City::plain(1, "Tashkent", Some((41.31, 69.28)))
    }

    fn samarkand() -> City {
        City::plain(2, "Samarkand", Some((39.65, 66.96)))
    }

    fn complete_form() -> CalculationForm {
        CalculationForm {
            origin: Some(tashkent()),
            destination: Some(samarkand()),
            tariff: Some(TariffType::OfficeDoor),
            weight: Some(2.5),
        }
    }

    #[test]
    fn complete_form_builds_request() {
        let request = complete_form().validate().expect("valid form");
        assert_eq!(
            request,
            CalculateTariffRequest {
                from_latitude: 41.31,
                from_longitude: 69.28,
                to_latitude: 39.65,
                to_longitude: 66.96,
                weight: 2.5,
                tariff_type: TariffType::OfficeDoor,
            }
        );
    }

    #[test]
    fn request_serializes_with_wire_field_names() {
        let request = complete_form().validate().unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tariff_type"], "OFFICE_DOOR");
        assert_eq!(json["from_latitude"], 41.31);
        assert_eq!(json["weight"], 2.5);
    }

    #[test]
    fn missing_fields_are_reported_in_form_order() {
        let empty = CalculationForm::default();
        assert_eq!(empty.validate(), Err(ValidationError::MissingOrigin));

        let mut form = complete_form();
        form.destination = None;
        assert_eq!(form.validate(), Err(ValidationError::MissingDestination));

        let mut form = complete_form();
        form.tariff = None;
        assert_eq!(form.validate(), Err(ValidationError::MissingTariffType));

        let mut form = complete_form();
        form.weight = None;
        let err = form.validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingWeight);
        assert_eq!(err.field(), "weight");
    }

    #[test]
    fn non_positive_weight_is_rejected() {
        for weight in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut form = complete_form();
            form.weight = Some(weight);
            assert!(
                matches!(form.validate(), Err(ValidationError::NonPositiveWeight(_))),
                "weight {weight} should be rejected"
            );
        }
    }

    #[test]
    fn city_without_coordinates_is_rejected() {
        let mut form = complete_form();
        form.destination = Some(City::plain(3, "Nukus", None));
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingCoordinates {
                city: "Nukus".to_string()
            })
        );
    }
}
