//! Owned state behind one tariff calculator screen.
//!
//! A [`TariffSession`] holds the availability index and the city list,
//! answers eligibility questions against them, and gates the calculate call.
//! State only changes through [`TariffSession::reload`], which replaces it
//! wholesale once every fetch has finished.

use tariffcalc_core::matching::find_first;
use tariffcalc_core::{
    evaluate, CalculationForm, City, CityKey, EligibilityResult, IndexState, Language,
    LocalizedCity, TariffType,
};

use crate::client::TariffClient;
use crate::error::SessionError;
use crate::loader::load_availability;
use crate::types::TariffQuote;

#[derive(Debug)]
pub struct TariffSession {
    client: TariffClient,
    language: Language,
    index: IndexState,
    cities: Vec<City>,
    /// One entry per spelling, pointing back into `cities`.
    city_keys: Vec<(usize, CityKey)>,
    cities_failed: bool,
}

impl TariffSession {
    /// A session that has not loaded anything yet. Every tariff is blocked
    /// until [`TariffSession::reload`] completes.
    #[must_use]
    pub fn new(client: TariffClient, language: Language) -> Self {
        Self {
            client,
            language,
            index: IndexState::Loading,
            cities: Vec::new(),
            city_keys: Vec::new(),
            cities_failed: false,
        }
    }

    /// Creates a session and performs the first load.
    pub async fn start(client: TariffClient, language: Language) -> Self {
        let mut session = Self::new(client, language);
        session.reload().await;
        session
    }

    /// Fetches warehouses, lockers and cities concurrently and swaps them in.
    ///
    /// Failures are logged and leave the affected list empty; see
    /// [`TariffSession::has_load_error`].
    pub async fn reload(&mut self) {
        let (index, cities) = tokio::join!(
            load_availability(&self.client),
            self.client.fetch_cities()
        );

        let (cities, cities_failed) = match cities {
            Ok(cities) => (cities, false),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load cities");
                (Vec::new(), true)
            }
        };

        self.city_keys = cities
            .iter()
            .enumerate()
            .flat_map(|(pos, city)| {
                city.name_variants()
                    .into_iter()
                    .filter_map(move |name| CityKey::new(name).map(|key| (pos, key)))
            })
            .collect();
        self.cities = cities;
        self.cities_failed = cities_failed;
        self.index = IndexState::Ready(index);
    }

    #[must_use]
    pub fn client(&self) -> &TariffClient {
        &self.client
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Changes the language used for labels in warnings.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    #[must_use]
    pub fn index(&self) -> &IndexState {
        &self.index
    }

    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// `true` when any of the three lists failed on the last load.
    #[must_use]
    pub fn has_load_error(&self) -> bool {
        self.cities_failed
            || self
                .index
                .ready()
                .is_some_and(tariffcalc_core::AvailabilityIndex::has_load_error)
    }

    /// Resolves a typed city name against the loaded city list.
    ///
    /// Every spelling of every city is tried, stage by stage, so an exact
    /// hit on a later city beats a fuzzy hit on an earlier one.
    #[must_use]
    pub fn find_city(&self, name: &str) -> Option<&City> {
        let query = CityKey::new(name)?;
        let (&(pos, _), _) = find_first(&query, &self.city_keys, |(_, key)| Some(key))?;
        self.cities.get(pos)
    }

    /// Warning and disable state for the current selection.
    #[must_use]
    pub fn eligibility(
        &self,
        origin: Option<&City>,
        destination: Option<&City>,
        tariff: Option<TariffType>,
    ) -> EligibilityResult {
        let origin = origin.map(|city| LocalizedCity::new(city, self.language));
        let destination = destination.map(|city| LocalizedCity::new(city, self.language));
        evaluate(&self.index, origin.as_ref(), destination.as_ref(), tariff)
    }

    /// Validates the form, refuses blocked selections, then requests a quote.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Validation`] if the form is incomplete.
    /// - [`SessionError::Ineligible`] if the selection is blocked.
    /// - [`SessionError::Client`] if the calculate request fails.
    pub async fn calculate(&self, form: &CalculationForm) -> Result<TariffQuote, SessionError> {
        let request = form.validate()?;

        let eligibility =
            self.eligibility(form.origin.as_ref(), form.destination.as_ref(), form.tariff);
        if eligibility.blocked {
            return Err(SessionError::Ineligible {
                warning: eligibility.message,
            });
        }

        let quote = self.client.calculate_tariff(&request).await?;
        tracing::info!(
            tariff_type = %request.tariff_type,
            weight = request.weight,
            price = ?quote.price,
            "tariff calculated"
        );
        Ok(quote)
    }
}
