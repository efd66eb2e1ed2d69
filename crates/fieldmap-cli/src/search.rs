//! `search` command: one non-interactive search session.
//!
//! Flags are applied in the order a user would set them in the UI. A
//! `--near` position stands in for device geolocation; `--query` goes
//! through the same debounced geocoding as typed input, and the command
//! waits for it to settle before printing.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use fieldmap_core::{AppConfig, Candidate, CandidateSource, Coordinate, FileCandidateSource};
use fieldmap_geocode::{FixedGeolocator, GeocodingClient};
use fieldmap_mapsync::{MapConfig, MapRegistry, MapSyncController, MemoryMap, ViewId};
use fieldmap_search::{SearchConfig, SearchOrchestrator, SearchPhase};

use crate::SearchArgs;

const SETTLE_POLL: Duration = Duration::from_millis(25);

pub(crate) async fn run_search(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let path = args
        .candidates
        .clone()
        .unwrap_or_else(|| config.candidates_path.clone());
    let candidates = FileCandidateSource::new(&path)
        .fetch_all()
        .with_context(|| format!("loading candidates from {}", path.display()))?;
    tracing::info!(count = candidates.len(), path = %path.display(), "candidates loaded");

    let geocoder = GeocodingClient::from_config(config)?;
    let mut search =
        SearchOrchestrator::new(geocoder, candidates, SearchConfig::from_app_config(config));

    if let Some(country) = &args.country {
        search.set_country(country)?;
    }
    search.set_category(&args.category)?;
    search.set_sub_region(&args.sub_region)?;
    search.set_date(args.date.as_deref())?;
    search.set_radius(args.radius_km)?;

    if let Some(position) = args.near {
        search
            .use_current_location(&FixedGeolocator::at(position))
            .await;
    }
    if let Some(query) = &args.query {
        search.set_query(query.as_str());
        wait_until_settled(&search, settle_limit(config)).await;
    }
    if let Some(notice) = search.take_notice() {
        eprintln!("note: {}", notice.message);
    }

    let criteria = search.criteria();
    let filtered = search.filtered_candidates();
    println!(
        "{} of {} candidates around {} (radius {})",
        filtered.len(),
        search.candidates().len(),
        criteria.center,
        radius_label(criteria.radius_km)
    );
    for candidate in &*filtered {
        println!("{}", format_row(candidate, criteria.center));
    }

    if let Some(out) = &args.geojson {
        export_geojson(config, out, criteria.center, criteria.radius_km, &filtered)?;
    }
    Ok(())
}

/// Quiet period plus the worst case of every geocoding attempt.
pub(crate) fn settle_limit(config: &AppConfig) -> Duration {
    let attempts = u64::from(config.geocoder_max_retries) + 1;
    Duration::from_millis(config.debounce_ms)
        .saturating_add(Duration::from_secs(
            config.geocoder_timeout_secs.saturating_mul(attempts),
        ))
        .saturating_add(Duration::from_secs(5))
}

async fn wait_until_settled(search: &SearchOrchestrator<GeocodingClient>, limit: Duration) {
    let settled = tokio::time::timeout(limit, async {
        while search.phase() != SearchPhase::Idle {
            tokio::time::sleep(SETTLE_POLL).await;
        }
    })
    .await;
    if settled.is_err() {
        tracing::warn!(?limit, "geocoding did not settle; using the current center");
    }
}

fn export_geojson(
    config: &AppConfig,
    out: &Path,
    center: Coordinate,
    radius_km: f64,
    candidates: &[Candidate],
) -> anyhow::Result<()> {
    let registry = MapRegistry::new();
    let map = MemoryMap::new();
    let handle = map.clone();
    let mut controller = MapSyncController::mount(
        ViewId::from("search"),
        &registry,
        MapConfig::from_app_config(config),
        || map,
    )?;
    controller.sync(center, radius_km, candidates);

    let body = serde_json::to_string_pretty(&handle.to_geojson())?;
    std::fs::write(out, body).with_context(|| format!("writing {}", out.display()))?;
    controller.close();
    println!("map written to {}", out.display());
    Ok(())
}

pub(crate) fn radius_label(radius_km: f64) -> String {
    if radius_km > 0.0 {
        format!("{radius_km} km")
    } else {
        "unbounded".to_string()
    }
}

pub(crate) fn format_row(candidate: &Candidate, center: Coordinate) -> String {
    let date = candidate.date_label().unwrap_or_else(|| "-".to_string());
    let place = candidate.location_label.as_deref().unwrap_or("-");
    format!(
        "{:>7.1} km  {:<5}  {:<10}  {:<10}  {}  {} ({})  {}",
        center.distance_km(&candidate.coordinate),
        candidate.kind.to_string(),
        candidate.category,
        date,
        candidate.sub_region,
        candidate.title,
        place,
        candidate.detail_path()
    )
}
