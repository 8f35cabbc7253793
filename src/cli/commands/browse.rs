//! One-shot browse commands.
//!
//! Each command drives the same controller the session uses and prints the
//! resulting page.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::router::TopLevelView;
use crate::ui::{App, Message, render_filters};

/// List every track
pub fn cmd_tracks(catalog: Catalog, data_base: String, config: &Config) -> anyhow::Result<()> {
    let app = App::new(catalog, data_base, &config.playback);
    println!("{}", app.page());
    Ok(())
}

/// List collections, optionally filtered
pub fn cmd_collections(
    catalog: Catalog,
    data_base: String,
    config: &Config,
    query: Option<&str>,
    tag: Option<&str>,
    year: Option<&str>,
) -> anyhow::Result<()> {
    let mut app = App::new(catalog, data_base, &config.playback);
    if let Some(query) = query {
        app.update(Message::SearchChanged(query.to_string()));
    }
    app.update(Message::TagSelected(tag.map(str::to_string)));
    app.update(Message::YearSelected(year.map(str::to_string)));
    app.update(Message::ShowView(TopLevelView::Collections));
    println!("{}", app.page());
    Ok(())
}

/// Print filter menus
pub fn cmd_filters(catalog: Catalog, data_base: String, config: &Config) -> anyhow::Result<()> {
    let app = App::new(catalog, data_base, &config.playback);
    println!("{}", render_filters(app.state()));
    Ok(())
}

/// Print the artist profile
pub fn cmd_about(catalog: Catalog, data_base: String, config: &Config) -> anyhow::Result<()> {
    let mut app = App::new(catalog, data_base, &config.playback);
    app.update(Message::ShowView(TopLevelView::About));
    println!("{}", app.page());
    Ok(())
}

/// Resolve a fragment the way a followed link would
pub fn cmd_route(
    catalog: Catalog,
    data_base: String,
    config: &Config,
    fragment: &str,
) -> anyhow::Result<()> {
    let mut app = App::new(catalog, data_base, &config.playback);
    app.update(Message::LocationChanged(fragment.to_string()));

    let location = app.state().router.location();
    println!("{}", if location.is_empty() { "#" } else { location });
    println!();
    println!("{}", app.page());
    Ok(())
}
