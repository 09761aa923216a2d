//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;

use water_report_geocoder::nominatim::NominatimResolver;
use water_report_geocoder::service_config::{default_service, load_service};
use water_report_loader::DataLoader;
use water_report_map::{DEFAULT_CENTER, DEFAULT_ZOOM, DragOutcome, LocationFields, MapContext};
use water_report_overlay::{GeoJsonSurface, MapSurface, RecordingSurface};
use water_report_readings_models::LatLng;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Builds a map context backed by the configured geocoder.
fn context<S: MapSurface>(
    surface: S,
    geocoder_config: Option<&Path>,
) -> Result<MapContext<S>, Box<dyn std::error::Error>> {
    let service = match geocoder_config {
        Some(path) => load_service(path)?,
        None => default_service()?,
    };
    log::debug!("Using geocoder '{}' at {}", service.id, service.base_url);

    let resolver = NominatimResolver::from_service(service)?;
    Ok(MapContext::new(surface, Arc::new(resolver)))
}

fn write_output(out: Option<&Path>, contents: &str) -> std::io::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, contents)?;
            log::info!("Wrote {}", path.display());
            Ok(())
        }
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}

fn print_fields(fields: &LocationFields) {
    let coord = |v: Option<f64>| v.map_or_else(String::new, |v| format!("{v:.6}"));
    println!("lat:     {}", coord(fields.latitude));
    println!("lng:     {}", coord(fields.longitude));
    println!("address: {}", fields.address);
}

/// Draws the readings at `url` onto a fresh map at the initial view. A
/// failed load leaves the map empty, with the problem on stderr.
async fn render_surface(loader: &DataLoader, url: &str) -> GeoJsonSurface {
    let mut surface = GeoJsonSurface::new();
    surface.set_center(DEFAULT_CENTER);
    surface.set_zoom(DEFAULT_ZOOM);

    match loader.load_and_render(url, &mut surface).await {
        Ok(summary) => {
            if !summary.skipped.is_empty() {
                eprintln!(
                    "warning: skipped {} readings with a water value outside 0-8",
                    summary.skipped.len()
                );
            }
            log::info!("Rendered {} overlays", summary.rendered());
        }
        Err(e) => eprintln!("warning: {e}; the map has no overlays"),
    }

    surface
}

/// Loads readings and prints the overlays as `GeoJSON`.
pub async fn render(url: &str, out: Option<&Path>) -> CliResult {
    let surface = render_surface(&DataLoader::default(), url).await;
    let collection = surface.to_feature_collection();
    write_output(out, &serde_json::to_string_pretty(&collection)?)?;
    Ok(())
}

/// Lists suggestions for `text` and selects the `pick`th one.
pub async fn geocode(text: &str, pick: usize, geocoder_config: Option<&Path>) -> CliResult {
    let mut ctx = context(RecordingSurface::new(), geocoder_config)?;
    let suggestions = ctx.search_box().suggest(text).await.unwrap_or_default();

    if suggestions.is_empty() {
        println!("No matches for {text:?}");
        return Ok(());
    }

    for (idx, s) in suggestions.iter().enumerate() {
        println!("{idx}: {} ({:.6}, {:.6})", s.label, s.latitude, s.longitude);
    }

    let choice = suggestions
        .get(pick)
        .ok_or_else(|| format!("no suggestion #{pick} (got {})", suggestions.len()))?;
    ctx.select(choice);

    println!();
    println!("zoom:    {}", ctx.current_zoom());
    print_fields(ctx.fields());
    Ok(())
}

/// Drops the marker at (`lat`, `lng`) and resolves the address there.
pub async fn reverse(lat: f64, lng: f64, geocoder_config: Option<&Path>) -> CliResult {
    let mut ctx = context(RecordingSurface::new(), geocoder_config)?;

    match ctx.marker_drag_end(LatLng::new(lat, lng)).await {
        DragOutcome::Updated { .. } => print_fields(ctx.fields()),
        DragOutcome::Unchanged { status } => {
            eprintln!("warning: address lookup failed ({status}); location fields unchanged");
        }
    }

    Ok(())
}

/// Converts a gauge feed into readings JSON.
pub async fn feed(source: &str, out: Option<&Path>) -> CliResult {
    let readings = water_report_feed::load_feed(&reqwest::Client::new(), source).await?;
    log::info!("Converted {} gauges", readings.len());
    write_output(out, &serde_json::to_string_pretty(&readings)?)?;
    Ok(())
}
