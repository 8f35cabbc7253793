//! Route table: location fragment <-> [`Route`].

use std::borrow::Cow;

/// A parsed location fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Tracks,
    Collections,
    About,
    /// `collection/<id>` or `release/<id>`
    Release(String),
    /// `track/<slug>`
    Track(String),
    /// `track/<release id>/<1-based number>`
    TrackAt(String, usize),
}

impl Route {
    /// Parse a fragment. Leading `#` and `#/` are stripped and components
    /// percent-decoded. Anything unrecognized is [`Route::Tracks`].
    pub fn parse(fragment: &str) -> Self {
        let path = fragment.strip_prefix('#').unwrap_or(fragment);
        let path = path.strip_prefix('/').unwrap_or(path);
        let decoded: Vec<Cow<'_, str>> = path.split('/').map(decode).collect();
        let parts: Vec<&str> = decoded.iter().map(|p| &**p).collect();

        match parts.as_slice() {
            ["collections", ..] => Route::Collections,
            ["about", ..] => Route::About,
            ["collection" | "release", id] if !id.is_empty() => Route::Release(id.to_string()),
            ["track", slug] if !slug.is_empty() => Route::Track(slug.to_string()),
            ["track", id, number] if !id.is_empty() => match number.parse::<usize>() {
                Ok(n) if n > 0 => Route::TrackAt(id.to_string(), n),
                _ => Route::Track(id.to_string()),
            },
            _ => Route::Tracks,
        }
    }

    /// Canonical fragment for this route.
    pub fn to_fragment(&self) -> String {
        match self {
            Route::Tracks => String::new(),
            Route::Collections => "#/collections".to_string(),
            Route::About => "#/about".to_string(),
            Route::Release(id) => format!("#/collection/{}", urlencoding::encode(id)),
            Route::Track(slug) => format!("#/track/{}", urlencoding::encode(slug)),
            Route::TrackAt(id, n) => format!("#/track/{}/{}", urlencoding::encode(id), n),
        }
    }
}

fn decode(component: &str) -> Cow<'_, str> {
    urlencoding::decode(component).unwrap_or(Cow::Borrowed(component))
}
