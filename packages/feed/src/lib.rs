#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! River gauge feed conversion.
//!
//! The flood monitoring feed publishes one `<item>` per gauge with `title`,
//! `desc`, `canpass`, `date`, `lat` and `lon` children. The fifth
//! space-separated token of the title is the water level in centimeters,
//! which maps onto the 0-8 category scale in steps of 15 cm.
//!
//! ```text
//! <item>
//!   <title>Gauge 12 Rangsit level 47 cm</title>
//!   <canpass>t</canpass>
//!   <lat>14.03</lat>
//!   <lon>100.61</lon>
//! </item>
//! ```

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use water_report_readings_models::{MAX_CATEGORY, MIN_CATEGORY, ReadingRecord};

/// Centimeters of water per category step.
pub const CM_PER_CATEGORY: f64 = 15.0;

/// Position of the level token in the item title.
const LEVEL_TOKEN_INDEX: usize = 4;

/// Errors from loading a gauge feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading a local feed file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSS selector failed to compile.
    #[error("selector error: {0}")]
    Selector(String),
}

/// One gauge entry as published. Missing children are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GaugeItem {
    pub title: String,
    pub desc: String,
    /// `"t"` when the road is passable.
    pub canpass: String,
    pub date: String,
    pub lat: String,
    pub lon: String,
}

impl GaugeItem {
    /// Whether the road at the gauge is passable.
    #[must_use]
    pub fn road(&self) -> bool {
        self.canpass == "t"
    }

    /// Title and description joined by a newline.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{}\n{}", self.title, self.desc)
    }

    /// Water level in centimeters parsed from the title, if present.
    #[must_use]
    pub fn level_cm(&self) -> Option<f64> {
        self.title
            .split(' ')
            .nth(LEVEL_TOKEN_INDEX)
            .and_then(|token| token.parse::<f64>().ok())
            .filter(|level| level.is_finite())
    }

    /// Water category: `floor(level / 15)` clamped to `0..=8`; 0 when the
    /// level cannot be read.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn water(&self) -> i64 {
        self.level_cm().map_or(MIN_CATEGORY, |level| {
            ((level / CM_PER_CATEGORY).floor() as i64).clamp(MIN_CATEGORY, MAX_CATEGORY)
        })
    }

    /// The reading for this gauge, or `None` if it has no usable
    /// coordinates.
    #[must_use]
    pub fn to_reading(&self) -> Option<ReadingRecord> {
        let latitude = self.lat.trim().parse::<f64>().ok()?;
        let longitude = self.lon.trim().parse::<f64>().ok()?;
        let reading = ReadingRecord::new(latitude, longitude, self.water());
        reading.check_coordinates().ok()?;
        Some(reading)
    }
}

fn selector(css: &str) -> Result<Selector, FeedError> {
    Selector::parse(css).map_err(|e| FeedError::Selector(format!("{css}: {e:?}")))
}

fn child_text(item: &ElementRef<'_>, sel: &Selector) -> String {
    item.select(sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Parses every `<item>` in a feed document.
///
/// # Errors
///
/// Returns [`FeedError::Selector`] if a selector fails to compile.
pub fn parse_feed(document: &str) -> Result<Vec<GaugeItem>, FeedError> {
    let doc = Html::parse_document(document);
    let item_sel = selector("item")?;
    let title_sel = selector("title")?;
    let desc_sel = selector("desc")?;
    let canpass_sel = selector("canpass")?;
    let date_sel = selector("date")?;
    let lat_sel = selector("lat")?;
    let lon_sel = selector("lon")?;

    Ok(doc
        .select(&item_sel)
        .map(|item| GaugeItem {
            title: child_text(&item, &title_sel),
            desc: child_text(&item, &desc_sel),
            canpass: child_text(&item, &canpass_sel),
            date: child_text(&item, &date_sel),
            lat: child_text(&item, &lat_sel),
            lon: child_text(&item, &lon_sel),
        })
        .collect())
}

/// Readings for gauges that report water and have coordinates.
#[must_use]
pub fn readings(items: &[GaugeItem]) -> Vec<ReadingRecord> {
    let readings: Vec<ReadingRecord> = items
        .iter()
        .filter_map(GaugeItem::to_reading)
        .filter(|r| r.category != MIN_CATEGORY)
        .collect();

    log::debug!(
        "Kept {} of {} gauge items as readings",
        readings.len(),
        items.len()
    );

    readings
}

/// Fetches a feed from an `http(s)://` URL or reads it from a local path,
/// and converts it to readings.
///
/// # Errors
///
/// Returns [`FeedError`] if the feed cannot be retrieved or parsed.
pub async fn load_feed(
    client: &reqwest::Client,
    source: &str,
) -> Result<Vec<ReadingRecord>, FeedError> {
    let document = if source.starts_with("http://") || source.starts_with("https://") {
        client.get(source).send().await?.error_for_status()?.text().await?
    } else {
        tokio::fs::read_to_string(source).await?
    };

    let items = parse_feed(&document)?;
    log::info!("Parsed {} gauge items from {source}", items.len());
    Ok(readings(&items))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <item>
      <title>Gauge 12 Rangsit level 47 cm</title>
      <desc>Klong 1 bridge</desc>
      <canpass>t</canpass>
      <date>2011-10-20 08:00</date>
      <lat>14.03</lat>
      <lon>100.61</lon>
    </item>
    <item>
      <title>Gauge 13 Bangkhen level 200 cm</title>
      <desc>Phahonyothin</desc>
      <canpass>f</canpass>
      <date>2011-10-20 08:00</date>
      <lat>13.87</lat>
      <lon>100.6</lon>
    </item>
    <item>
      <title>Gauge 14 Donmuang level 5 cm</title>
      <canpass>t</canpass>
      <lat>13.91</lat>
      <lon>100.6</lon>
    </item>
    <item>
      <title>Gauge 15 Lamlukka level 90 cm</title>
      <lat></lat>
      <lon></lon>
    </item>
  </channel>
</rss>"#;

    fn item(title: &str) -> GaugeItem {
        GaugeItem {
            title: title.to_string(),
            ..GaugeItem::default()
        }
    }

    #[test]
    fn parses_items_and_children() {
        let items = parse_feed(FEED).unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].title, "Gauge 12 Rangsit level 47 cm");
        assert_eq!(items[0].desc, "Klong 1 bridge");
        assert_eq!(items[0].lat, "14.03");
        assert_eq!(items[0].lon, "100.61");
        assert!(items[0].road());
        assert!(!items[1].road());
        assert_eq!(items[2].desc, "");
    }

    #[test]
    fn level_maps_to_category_in_15cm_steps() {
        assert_eq!(item("a b c d 0 cm").water(), 0);
        assert_eq!(item("a b c d 14.9 cm").water(), 0);
        assert_eq!(item("a b c d 15 cm").water(), 1);
        assert_eq!(item("a b c d 47 cm").water(), 3);
        assert_eq!(item("a b c d 119 cm").water(), 7);
        assert_eq!(item("a b c d 120 cm").water(), 8);
        assert_eq!(item("a b c d 500 cm").water(), 8);
    }

    #[test]
    fn unreadable_level_is_zero() {
        assert_eq!(item("no level here").water(), 0);
        assert_eq!(item("a b c d deep cm").water(), 0);
        assert_eq!(item("a b c d -40 cm").water(), 0);
    }

    #[test]
    fn keeps_only_wet_gauges_with_coordinates() {
        let items = parse_feed(FEED).unwrap();
        let readings = readings(&items);
        assert_eq!(
            readings,
            vec![
                ReadingRecord::new(14.03, 100.61, 3),
                ReadingRecord::new(13.87, 100.6, 8),
            ]
        );
    }

    #[test]
    fn text_joins_title_and_desc() {
        let items = parse_feed(FEED).unwrap();
        assert_eq!(items[0].text(), "Gauge 12 Rangsit level 47 cm\nKlong 1 bridge");
    }

    #[tokio::test]
    async fn loads_feed_from_file() {
        let tmp = std::env::temp_dir().join("water_report_feed_test.xml");
        std::fs::write(&tmp, FEED).unwrap();

        let readings = load_feed(&reqwest::Client::new(), &tmp.to_string_lossy())
            .await
            .unwrap();
        assert_eq!(readings.len(), 2);

        let _ = std::fs::remove_file(&tmp);
    }
}
