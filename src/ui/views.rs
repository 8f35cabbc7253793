//! Plain-text views.
//!
//! Every function here is a pure rendering of [`AppState`]; nothing mutates.

use crate::catalog::resolve_data_url;
use crate::model::{QueueEntry, Release};
use crate::player::{PlaybackStatus, format_duration};
use crate::router::{Detail, TopLevelView};

use super::state::AppState;

/// Full screen: navigation, current view, player bar and status line.
pub fn render(s: &AppState) -> String {
    let mut lines = vec![header(s), String::new()];
    lines.extend(content(s));

    lines.push(String::new());
    lines.push(player_bar(s));
    if !s.status_message.is_empty() {
        lines.push(format!("> {}", s.status_message));
    }
    lines.join("\n")
}

/// Only the current view, without navigation or player chrome.
pub fn render_page(s: &AppState) -> String {
    content(s).join("\n")
}

fn content(s: &AppState) -> Vec<String> {
    match s.router.detail() {
        Some(Detail::Release(release)) => release_detail(release, &s.data_base),
        Some(Detail::Track(entry)) => track_detail(entry, &s.data_base),
        None => match s.router.view() {
            TopLevelView::Tracks => tracks_view(s),
            TopLevelView::Collections => collections_view(s),
            TopLevelView::About => about_view(s),
        },
    }
}

/// Artist name, nav tabs and location.
fn header(s: &AppState) -> String {
    let tab = |view: TopLevelView, label: &str| {
        if s.router.view() == view && s.router.detail().is_none() {
            format!("[{}]", label)
        } else {
            format!(" {} ", label)
        }
    };
    let artist = s.catalog.artist().name.as_str();
    format!(
        "{}  {} {} {}   {}",
        if artist.is_empty() { "Discography" } else { artist },
        tab(TopLevelView::Tracks, "Tracks"),
        tab(TopLevelView::Collections, "Collections"),
        tab(TopLevelView::About, "About"),
        if s.router.location().is_empty() { "#" } else { s.router.location() },
    )
}

fn filter_summary(s: &AppState) -> Option<String> {
    if !s.filter.is_active() {
        return None;
    }
    let mut parts = Vec::new();
    if !s.filter.query.trim().is_empty() {
        parts.push(format!("search \"{}\"", s.filter.query.trim()));
    }
    if let Some(tag) = &s.filter.tag {
        parts.push(format!("tag {}", tag));
    }
    if let Some(year) = &s.filter.year {
        parts.push(format!("year {}", year));
    }
    Some(format!("Filtered by {}", parts.join(", ")))
}

fn tracks_view(s: &AppState) -> Vec<String> {
    let mut lines = Vec::new();
    lines.extend(filter_summary(s));
    if s.visible_tracks.is_empty() {
        lines.push(if s.catalog.is_empty() {
            "No releases loaded.".to_string()
        } else {
            "No tracks match.".to_string()
        });
        return lines;
    }
    for (i, entry) in s.visible_tracks.iter().enumerate() {
        lines.push(format!("{:>3}. {}", i + 1, entry_line(entry, s)));
    }
    lines
}

fn collections_view(s: &AppState) -> Vec<String> {
    let mut lines = Vec::new();
    lines.extend(filter_summary(s));
    if s.visible_collections.is_empty() {
        lines.push("No collections match.".to_string());
        return lines;
    }
    for (i, release) in s.visible_collections.iter().enumerate() {
        lines.push(format!(
            "{:>3}. {} ({}, {}) - {} tracks",
            i + 1,
            release.title,
            release.kind.label(),
            release.year().unwrap_or("n.d."),
            release.tracks().len()
        ));
    }
    lines
}

fn about_view(s: &AppState) -> Vec<String> {
    let artist = s.catalog.artist();
    let mut lines = vec![artist.name.clone()];
    if !artist.bio.is_empty() {
        lines.push(String::new());
        lines.extend(artist.bio.lines().map(str::to_string));
    }
    if !artist.social_links.is_empty() {
        lines.push(String::new());
        for (platform, url) in &artist.social_links {
            lines.push(format!("  {}: {}", platform, url));
        }
    }
    lines
}

fn release_detail(release: &Release, data_base: &str) -> Vec<String> {
    let mut lines = vec![
        format!("{} ({})", release.title, release.kind.label()),
        release_date_line(release),
    ];
    if !release.description.is_empty() {
        lines.push(String::new());
        lines.push(release.description.clone());
    }
    if !release.tags.is_empty() {
        lines.push(format!("Tags: {}", release.tags.join(", ")));
    }

    lines.push(String::new());
    if release.is_collection() {
        for (i, track) in release.tracks().iter().enumerate() {
            lines.push(format!(
                "{:>3}. {}{}",
                track.track_number.map_or(i + 1, |n| n as usize),
                track.title,
                track
                    .duration
                    .map(|d| format!(" ({})", format_duration(d)))
                    .unwrap_or_default()
            ));
        }
    } else {
        lines.push(format!(
            "  1. {}{}",
            release.title,
            release
                .duration
                .map(|d| format!(" ({})", format_duration(d)))
                .unwrap_or_default()
        ));
        if let Some(wav) = release.wav_file.as_deref().filter(|w| !w.is_empty()) {
            lines.push(download_line(data_base, wav));
        }
    }

    if !release.streaming_links.is_empty() {
        lines.push(String::new());
        for (service, url) in &release.streaming_links {
            lines.push(format!("  {}: {}", service, url));
        }
    }
    lines
}

fn track_detail(entry: &QueueEntry, data_base: &str) -> Vec<String> {
    let mut lines = vec![entry.title().to_string()];
    if entry.is_single() {
        lines.push(format!("Single - {}", release_date_line(&entry.release)));
    } else {
        lines.push(format!(
            "Track {} on {}",
            entry.track_number().unwrap_or(1),
            entry.release.title
        ));
    }
    if let Some(duration) = entry.duration() {
        lines.push(format!("Length: {}", format_duration(duration)));
    }
    if let Some(cover) = entry.cover_art() {
        lines.push(format!("Cover: {}", cover));
    }
    if let Some(wav) = entry.wav_file() {
        lines.push(download_line(data_base, wav));
    }
    if !entry.tags().is_empty() {
        lines.push(format!("Tags: {}", entry.tags().join(", ")));
    }
    if let Some(description) = entry.description() {
        lines.push(String::new());
        lines.push(description.to_string());
    }
    if let Some(lyrics) = entry.lyrics() {
        lines.push(String::new());
        lines.extend(lyrics.lines().map(|l| format!("  {}", l)));
    }
    if let Some(credits) = entry.track_info().and_then(|t| t.credits.as_ref()) {
        lines.push(String::new());
        lines.push(format!("Credits: {}", credits_text(credits)));
    }
    if let Some(ai) = entry.track_info().and_then(|t| t.ai_usage.as_deref()) {
        lines.push(format!("AI usage: {}", ai));
    }
    lines
}

fn download_line(data_base: &str, wav: &str) -> String {
    format!("Download WAV: {}", resolve_data_url(data_base, wav))
}

fn release_date_line(release: &Release) -> String {
    match release.date() {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => release.year().unwrap_or("n.d.").to_string(),
    }
}

fn credits_text(credits: &serde_json::Value) -> String {
    match credits {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(role, who)| match who {
                serde_json::Value::String(name) => format!("{}: {}", role, name),
                other => format!("{}: {}", role, other),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

fn entry_line(entry: &QueueEntry, s: &AppState) -> String {
    let playing = s.queue.current() == Some(entry) && s.player.state().is_playing();
    let duration = entry
        .duration()
        .map(|d| format!(" ({})", format_duration(d)))
        .unwrap_or_default();
    let source = if entry.is_single() {
        "Single".to_string()
    } else {
        entry.release.title.clone()
    };
    format!(
        "{}{} - {}{}",
        if playing { "* " } else { "" },
        entry.title(),
        source,
        duration
    )
}

/// Now-playing line.
fn player_bar(s: &AppState) -> String {
    let state = s.player.state();
    let icon = match state.status {
        PlaybackStatus::Playing => "|>",
        PlaybackStatus::Paused => "||",
        PlaybackStatus::Loading => "..",
        PlaybackStatus::Stopped => "[]",
    };
    let title = s
        .queue
        .current()
        .map(|e| e.title().to_string())
        .unwrap_or_else(|| "No track playing".to_string());
    format!(
        "{} {}  {} [{}] {}  vol {:.0}%  {}  queue: {}",
        icon,
        title,
        state.position_str(),
        progress_bar(state.position_fraction()),
        state.duration_str(),
        state.volume * 100.0,
        s.queue.mode().label(),
        s.queue.len()
    )
}

fn progress_bar(fraction: f32) -> String {
    const WIDTH: usize = 20;
    let filled = ((fraction.clamp(0.0, 1.0) * WIDTH as f32).round() as usize).min(WIDTH);
    format!("{}{}", "=".repeat(filled), "-".repeat(WIDTH - filled))
}

/// The pending queue, numbered.
pub fn render_queue(s: &AppState) -> String {
    if s.queue.is_empty() {
        return "Queue is empty".to_string();
    }
    s.queue
        .pending()
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{:>3}. {}", i + 1, entry_line(entry, s)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tag and year menus.
pub fn render_filters(s: &AppState) -> String {
    format!(
        "Tags: {}\nYears: {}",
        s.catalog.all_tags().join(", "),
        s.catalog.all_years().join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture_catalog, mock_player};
    use crate::ui::{App, Message};

    fn app() -> App {
        let (player, _sink) = mock_player();
        App::with_player(fixture_catalog(), String::new(), &Default::default(), player)
    }

    #[test]
    fn test_tracks_view_lists_visible() {
        let app = app();
        let screen = app.view();
        assert!(screen.contains("[Tracks]"));
        assert!(screen.contains("  1. Single S - Single (2:30)"));
        assert!(screen.contains("  3. T2 - Album A (3:30)"));
    }

    #[test]
    fn test_release_detail_view() {
        let mut app = app();
        app.update(Message::OpenRelease("a".to_string()));
        let screen = app.view();
        assert!(screen.contains("Album A (Album)"));
        assert!(screen.contains("June 1, 2023"));
        assert!(screen.contains("  3. T3 (2:45)"));
        assert!(screen.contains("#/collection/a"));
    }

    #[test]
    fn test_track_detail_view() {
        let mut app = app();
        app.update(Message::LocationChanged("#/track/t2".to_string()));
        let screen = app.view();
        assert!(screen.contains("Track 2 on Album A"));
        assert!(screen.contains("  Under the midnight sky"));
    }

    #[test]
    fn test_single_offers_wav_download() {
        let mut app = app();
        app.update(Message::OpenRelease("s".to_string()));
        assert!(app.view().contains("Download WAV: wav/s.wav"));

        app.update(Message::LocationChanged("#/track/s".to_string()));
        assert!(app.view().contains("Download WAV: wav/s.wav"));

        app.update(Message::LocationChanged("#/track/t1".to_string()));
        assert!(!app.view().contains("Download WAV"));
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0), "-".repeat(20));
        assert_eq!(progress_bar(0.5), format!("{}{}", "=".repeat(10), "-".repeat(10)));
        assert_eq!(progress_bar(3.0), "=".repeat(20));
    }

    #[test]
    fn test_about_view() {
        let mut app = app();
        app.update(Message::ShowView(TopLevelView::About));
        let screen = app.view();
        assert!(screen.contains("Plays tests."));
        assert!(screen.contains("bandcamp: https://bandcamp.example"));
    }

    #[test]
    fn test_filters_and_queue_render() {
        let mut app = app();
        assert_eq!(
            render_filters(app.state()),
            "Tags: ambient, live, rock\nYears: 2024, 2023, 2020"
        );
        assert_eq!(render_queue(app.state()), "Queue is empty");

        app.update(Message::QueueAddRelease("b".to_string()));
        assert!(render_queue(app.state()).contains("1. Old Song - Early Days"));
    }
}
