//! Core data models for the discography.
//!
//! Defines the primary entities: [`Release`], [`Track`], and the
//! [`QueueEntry`] pair that carries a playable item together with its parent
//! release.
//!
//! # Catalog Document
//!
//! Two JSON layouts are accepted and normalized into one [`Discography`]:
//! - `{ artist, bio, socialLinks, albums[], singles[] }`
//! - `{ artist: { name, bio, social }, releases[] }`
//!
//! A release without a `tracks` array is itself playable (a single).

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Kind of release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    #[default]
    Album,
    Single,
    Ep,
}

impl ReleaseKind {
    pub fn label(self) -> &'static str {
        match self {
            ReleaseKind::Album => "Album",
            ReleaseKind::Single => "Single",
            ReleaseKind::Ep => "EP",
        }
    }
}

/// A track inside a collection (album or EP).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Track {
    /// Route slug (preferred identifier in fragments)
    pub slug: Option<String>,
    /// Alternate identifier used by the unified catalog layout
    pub id: Option<String>,
    pub title: String,
    /// 1-based position as published
    #[serde(alias = "index")]
    pub track_number: Option<u32>,
    /// Length, from seconds or an `M:SS` string
    #[serde(deserialize_with = "deserialize_duration")]
    pub duration: Option<Duration>,
    /// Audio file path or URL
    #[serde(alias = "audioUrl")]
    pub audio_file: Option<String>,
    #[serde(alias = "cover")]
    pub cover_art: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub lyrics: Option<String>,
    pub credits: Option<serde_json::Value>,
    pub ai_usage: Option<String>,
    /// Lossless download offered next to the stream
    pub wav_file: Option<String>,
}

impl Track {
    /// Identifier used in `track/<slug>` fragments.
    pub fn route_slug(&self) -> Option<&str> {
        self.slug
            .as_deref()
            .or(self.id.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// A release: album, EP, or single.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Release {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ReleaseKind,
    pub release_date: String,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: String,
    #[serde(alias = "cover")]
    pub cover_art: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub credits: Option<serde_json::Value>,
    pub streaming_links: BTreeMap<String, String>,
    /// Present for collections; absent for directly playable singles
    pub tracks: Option<Vec<Track>>,

    // Single-only playable fields
    pub audio_file: Option<String>,
    #[serde(deserialize_with = "deserialize_duration")]
    pub duration: Option<Duration>,
    pub lyrics: Option<String>,
    pub wav_file: Option<String>,
}

impl Release {
    /// Whether this release carries its own tracklist.
    pub fn is_collection(&self) -> bool {
        self.tracks.is_some()
    }

    /// The tracklist, empty for singles.
    pub fn tracks(&self) -> &[Track] {
        self.tracks.as_deref().unwrap_or_default()
    }

    /// Publication date, if the `releaseDate` field parses.
    pub fn date(&self) -> Option<NaiveDate> {
        let date = self.release_date.get(..10).unwrap_or(&self.release_date);
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }

    /// Release year, derived from the date when not given explicitly.
    pub fn year(&self) -> Option<&str> {
        if !self.year.is_empty() {
            return Some(&self.year);
        }
        self.release_date
            .get(..4)
            .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
    }

    /// Every playable entry of this release, in tracklist order.
    pub fn entries(self: &Arc<Self>) -> Vec<QueueEntry> {
        if self.is_collection() {
            (0..self.tracks().len())
                .map(|i| QueueEntry {
                    release: Arc::clone(self),
                    position: Some(i),
                })
                .collect()
        } else {
            vec![QueueEntry::single(Arc::clone(self))]
        }
    }
}

/// A playable item together with the release it belongs to.
///
/// `position` is the 0-based index into the release's tracklist, or `None`
/// when the release is a single and plays itself.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub release: Arc<Release>,
    pub position: Option<usize>,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.release.id == other.release.id && self.position == other.position
    }
}

impl Eq for QueueEntry {}

impl QueueEntry {
    /// Entry for a single that plays itself.
    pub fn single(release: Arc<Release>) -> Self {
        Self {
            release,
            position: None,
        }
    }

    /// Entry for the track at `position`, if it exists.
    pub fn track(release: Arc<Release>, position: usize) -> Option<Self> {
        (position < release.tracks().len()).then_some(Self {
            release,
            position: Some(position),
        })
    }

    /// The collection track, `None` for singles.
    pub fn track_info(&self) -> Option<&Track> {
        self.position.and_then(|i| self.release.tracks().get(i))
    }

    pub fn title(&self) -> &str {
        self.track_info()
            .map(|t| t.title.as_str())
            .unwrap_or(&self.release.title)
    }

    /// Audio source, falling back to the release's own file.
    pub fn audio_file(&self) -> Option<&str> {
        self.track_info()
            .and_then(|t| t.audio_file.as_deref())
            .or(self.release.audio_file.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn duration(&self) -> Option<Duration> {
        match self.track_info() {
            Some(track) => track.duration,
            None => self.release.duration,
        }
    }

    /// Downloadable WAV, falling back to the release's own.
    pub fn wav_file(&self) -> Option<&str> {
        self.track_info()
            .and_then(|t| t.wav_file.as_deref())
            .filter(|s| !s.is_empty())
            .or(self.release.wav_file.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn cover_art(&self) -> Option<&str> {
        self.track_info()
            .and_then(|t| t.cover_art.as_deref())
            .filter(|s| !s.is_empty())
            .or(self.release.cover_art.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn lyrics(&self) -> Option<&str> {
        let lyrics = match self.track_info() {
            Some(track) => track.lyrics.as_deref(),
            None => self.release.lyrics.as_deref(),
        };
        lyrics.filter(|s| !s.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        let description = match self.track_info() {
            Some(track) => track.description.as_deref(),
            None => Some(self.release.description.as_str()),
        };
        description.filter(|s| !s.is_empty())
    }

    /// Own tags (the release's tags for singles).
    pub fn tags(&self) -> &[String] {
        match self.track_info() {
            Some(track) => &track.tags,
            None => &self.release.tags,
        }
    }

    /// 1-based number within the release.
    pub fn track_number(&self) -> Option<u32> {
        self.position.map(|i| {
            self.track_info()
                .and_then(|t| t.track_number)
                .unwrap_or(i as u32 + 1)
        })
    }

    pub fn is_single(&self) -> bool {
        self.position.is_none()
    }
}

/// Artist profile shown on the about view.
#[derive(Debug, Clone, Default)]
pub struct ArtistInfo {
    pub name: String,
    pub bio: String,
    pub social_links: BTreeMap<String, String>,
}

/// The normalized, loaded catalog document.
#[derive(Debug, Clone, Default)]
pub struct Discography {
    pub artist: ArtistInfo,
    pub releases: Vec<Release>,
}

impl Discography {
    /// Parse either supported catalog layout.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        Ok(doc.into())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArtistField {
    Name(String),
    Profile {
        name: String,
        #[serde(default)]
        bio: String,
        #[serde(default)]
        social: BTreeMap<String, Option<String>>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CatalogDocument {
    artist: Option<ArtistField>,
    bio: String,
    social_links: BTreeMap<String, Option<String>>,
    albums: Vec<Release>,
    singles: Vec<Release>,
    releases: Vec<Release>,
}

impl From<CatalogDocument> for Discography {
    fn from(doc: CatalogDocument) -> Self {
        let (name, bio, social) = match doc.artist {
            Some(ArtistField::Name(name)) => (name, doc.bio, doc.social_links),
            Some(ArtistField::Profile { name, bio, social }) => {
                let bio = if bio.is_empty() { doc.bio } else { bio };
                let mut links = doc.social_links;
                links.extend(social);
                (name, bio, links)
            }
            None => (String::new(), doc.bio, doc.social_links),
        };

        let social_links = social
            .into_iter()
            .filter_map(|(platform, url)| url.filter(|u| !u.is_empty()).map(|u| (platform, u)))
            .collect();

        let mut releases = doc.albums;
        releases.extend(doc.singles);
        releases.extend(doc.releases);

        Self {
            artist: ArtistInfo {
                name,
                bio,
                social_links,
            },
            releases,
        }
    }
}

// ============================================================================
// Field deserializers
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Parse `SS`, `M:SS`, or `H:MM:SS` into a duration.
pub fn parse_duration(text: &str) -> Option<Duration> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let mut secs = 0u64;
    for part in text.split(':') {
        let value: u64 = part.trim().parse().ok()?;
        secs = secs.checked_mul(60)?.checked_add(value)?;
    }
    Some(Duration::from_secs(secs))
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<NumberOrString> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrString::Number(secs)) if secs.is_finite() && secs >= 0.0 => {
            Some(Duration::from_secs_f64(secs))
        }
        Some(NumberOrString::Text(text)) => parse_duration(&text),
        _ => None,
    })
}

fn deserialize_year<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<NumberOrString> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrString::Number(year)) => format!("{}", year as i64),
        Some(NumberOrString::Text(text)) => text,
        None => String::new(),
    })
}
