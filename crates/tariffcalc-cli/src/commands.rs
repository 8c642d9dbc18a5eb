//! Command handlers for the CLI.
//!
//! Each handler builds its own client from config, loads what it needs, and
//! prints plain-text results to stdout. Load failures are reported as a note
//! rather than an error whenever partial data is still useful.

use anyhow::Context;
use tariffcalc_client::{load_availability, TariffClient, TariffSession};
use tariffcalc_core::matching::match_kind;
use tariffcalc_core::{
    evaluate, AppConfig, AvailabilityIndex, CalculationForm, City, CityKey, EligibilityResult,
    Language, ServiceKind, TariffType,
};

/// Note printed when some data failed to load, stamped with the index load
/// time when there is one.
pub(crate) fn load_error_note(index: Option<&AvailabilityIndex>) -> String {
    let stamp = index
        .map(|index| {
            format!(
                " (as of {})",
                index.loaded_at().format("%Y-%m-%d %H:%M:%S UTC")
            )
        })
        .unwrap_or_default();
    format!("note: some data failed to load{stamp}; availability could not be fully verified")
}

fn build_client(config: &AppConfig) -> anyhow::Result<TariffClient> {
    TariffClient::from_config(config).context("failed to build tariff client")
}

fn resolve_city<'a>(session: &'a TariffSession, name: &str) -> anyhow::Result<&'a City> {
    session
        .find_city(name)
        .ok_or_else(|| anyhow::anyhow!("unknown city '{name}'; run `cities` to list them"))
}

fn print_eligibility(result: &EligibilityResult) {
    if let Some(message) = &result.message {
        println!("warning: {message} [{}]", message.message_key());
    }
}

/// Prints whether `tariff` is available between two cities.
///
/// Names are resolved against the city list. When the city list itself could
/// not be loaded, the typed names are checked directly against the
/// availability index instead.
///
/// # Errors
///
/// Returns an error if the client cannot be built or a city name does not
/// resolve.
pub(crate) async fn run_check(
    config: &AppConfig,
    language: Language,
    from: &str,
    to: &str,
    tariff: TariffType,
) -> anyhow::Result<()> {
    let session = TariffSession::start(build_client(config)?, language).await;

    let (result, origin, destination) = if session.cities().is_empty() {
        let result = evaluate(session.index(), Some(from), Some(to), Some(tariff));
        (result, from.trim().to_owned(), to.trim().to_owned())
    } else {
        let origin = resolve_city(&session, from)?;
        let destination = resolve_city(&session, to)?;
        (
            session.eligibility(Some(origin), Some(destination), Some(tariff)),
            origin.display_name(language).to_owned(),
            destination.display_name(language).to_owned(),
        )
    };

    let verdict = if result.blocked {
        "unavailable"
    } else {
        "available"
    };
    println!("{tariff} {origin} -> {destination}: {verdict}");
    print_eligibility(&result);
    if session.has_load_error() {
        println!("{}", load_error_note(session.index().ready()));
    }
    Ok(())
}

/// Requests a quote for a parcel of `weight` kilograms.
///
/// # Errors
///
/// Returns an error if a city does not resolve, the form is invalid, the
/// selection is blocked, or the calculate request fails.
pub(crate) async fn run_calculate(
    config: &AppConfig,
    language: Language,
    from: &str,
    to: &str,
    tariff: TariffType,
    weight: f64,
) -> anyhow::Result<()> {
    let session = TariffSession::start(build_client(config)?, language).await;
    if session.cities().is_empty() {
        anyhow::bail!("city list is unavailable; cannot calculate without coordinates");
    }

    let form = CalculationForm {
        origin: Some(resolve_city(&session, from)?.clone()),
        destination: Some(resolve_city(&session, to)?.clone()),
        tariff: Some(tariff),
        weight: Some(weight),
    };

    let quote = session.calculate(&form).await?;

    match (quote.price, quote.currency.as_deref()) {
        (Some(price), Some(currency)) => println!("price: {price} {currency}"),
        (Some(price), None) => println!("price: {price}"),
        (None, _) => println!("price: not quoted"),
    }
    if let Some(days) = &quote.delivery_days {
        println!("delivery: {days} day(s)");
    }
    for (key, value) in &quote.extra {
        println!("{key}: {value}");
    }
    Ok(())
}

/// Lists cities, optionally only those matching `filter`.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the city list cannot be
/// fetched.
pub(crate) async fn run_cities(
    config: &AppConfig,
    language: Language,
    filter: Option<&str>,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let cities = client
        .fetch_cities()
        .await
        .context("failed to fetch cities")?;

    let query = filter.and_then(CityKey::new);
    let matches_filter = |city: &City| {
        query.as_ref().is_none_or(|query| {
            city.name_variants()
                .into_iter()
                .filter_map(CityKey::new)
                .any(|candidate| match_kind(query, &candidate).is_some())
        })
    };

    let shown: Vec<&City> = cities.iter().filter(|c| matches_filter(c)).collect();
    if shown.is_empty() {
        println!("no cities found");
        return Ok(());
    }

    let header = format!("{:<8}{:<24}{:<24}COORDINATES", "ID", "NAME", "REGION");
    println!("{header}");
    println!("{}", "-".repeat(header.len()));
    for city in shown {
        let coordinates = city
            .coordinates()
            .map_or_else(|| "-".to_string(), |(lat, lng)| format!("{lat:.4}, {lng:.4}"));
        println!(
            "{:<8}{:<24}{:<24}{coordinates}",
            city.id.to_string(),
            city.display_name(language),
            city.region.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

/// Lists warehouses or lockers, optionally only those in `city`.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the requested list
/// failed to load.
pub(crate) async fn run_points(
    config: &AppConfig,
    kind: ServiceKind,
    city: Option<&str>,
) -> anyhow::Result<()> {
    let index = load_availability(&build_client(config)?).await;
    if index.failed_lists().contains(&kind) {
        anyhow::bail!("failed to load {kind}; see logs for details");
    }

    let points: Vec<_> = match city {
        Some(city) => index.points_in(kind, city).collect(),
        None => index.points(kind).collect(),
    };
    if points.is_empty() {
        println!("no {kind} found");
        return Ok(());
    }

    let header = format!("{:<10}{:<36}CITY", "ID", "NAME");
    println!("{header}");
    println!("{}", "-".repeat(header.len()));
    for point in points {
        println!(
            "{:<10}{:<36}{}",
            point.id.to_string(),
            point.display_name,
            point.city_name
        );
    }
    Ok(())
}
