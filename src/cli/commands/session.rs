//! Interactive player session.
//!
//! Stdin is read on a helper thread and forwarded over a channel; the main
//! loop turns each line into controller messages and sends `PlayerTick`
//! whenever no input arrives within the tick interval.

use crossbeam_channel::{RecvTimeoutError, unbounded};
use std::io::{BufRead, Write};
use std::time::Duration;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::model::parse_duration;
use crate::player::PlaybackStatus;
use crate::router::TopLevelView;
use crate::ui::{App, AppState, Message, render_filters, render_queue};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

const HELP: &str = "\
Browse:   tracks | collections | about | open <n> | back | go <#fragment>
Filter:   search <text> | tag <tag|-> | year <year|-> | reset | filters
Play:     play [n] | pause | stop | toggle | next | prev | seek <m:ss> | vol <0-100> | mode | playall
Queue:    queue [n] | rm <n> | up <n> | down <n> | clear
Other:    help | quit";

/// What one input line asks for.
#[derive(Debug)]
enum Input {
    Send(Message),
    ShowQueue,
    ShowFilters,
    Help,
    Quit,
}

/// Run the interactive session until `quit` or end of input
pub fn cmd_session(catalog: Catalog, data_base: String, config: &Config) -> anyhow::Result<()> {
    let mut app = App::new(catalog, data_base, &config.playback);

    let (tx, rx) = unbounded::<String>();
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;

    println!("{}", app.view());
    println!("Type `help` for commands.");
    prompt()?;

    let mut last_bar = now_playing(app.state());
    loop {
        match rx.recv_timeout(TICK_INTERVAL) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    prompt()?;
                    continue;
                }
                match parse_line(line, app.state()) {
                    Ok(Input::Quit) => break,
                    Ok(Input::Help) => println!("{}", HELP),
                    Ok(Input::ShowQueue) => println!("{}", render_queue(app.state())),
                    Ok(Input::ShowFilters) => println!("{}", render_filters(app.state())),
                    Ok(Input::Send(message)) => {
                        app.update(message);
                        println!("{}", app.view());
                    }
                    Err(e) => println!("{}", e),
                }
                last_bar = now_playing(app.state());
                prompt()?;
            }
            Err(RecvTimeoutError::Timeout) => {
                app.update(Message::PlayerTick);
                let bar = now_playing(app.state());
                if bar != last_bar {
                    println!();
                    println!("{}", bar.1);
                    prompt()?;
                    last_bar = bar;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    tracing::debug!("Session ended");
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

/// Track and status, used to announce changes the user did not type.
fn now_playing(s: &AppState) -> (PlaybackStatus, String) {
    let title = s
        .queue
        .current()
        .map(|e| e.title().to_string())
        .unwrap_or_default();
    let status = s.player.state().status;
    let line = match status {
        PlaybackStatus::Playing => format!("Now playing: {}", title),
        PlaybackStatus::Stopped if !s.status_message.is_empty() => s.status_message.clone(),
        _ => format!("{:?}: {}", status, title),
    };
    (status, line)
}

// ============================================================================
// Line parsing
// ============================================================================

fn parse_line(line: &str, s: &AppState) -> Result<Input, String> {
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (line, ""),
    };

    let message = match cmd.to_ascii_lowercase().as_str() {
        "quit" | "exit" => return Ok(Input::Quit),
        "help" | "?" => return Ok(Input::Help),
        "filters" => return Ok(Input::ShowFilters),

        // Navigation
        "tracks" => Message::ShowView(TopLevelView::Tracks),
        "collections" => Message::ShowView(TopLevelView::Collections),
        "about" => Message::ShowView(TopLevelView::About),
        "back" => Message::Back,
        "go" => Message::LocationChanged(arg.to_string()),
        "open" => {
            let n = number(arg)?;
            match listed_release(s, n) {
                Some(id) => Message::OpenRelease(id),
                None => Message::OpenTrack(listed_entry(s, n)?),
            }
        }

        // Filters
        "search" => Message::SearchChanged(arg.to_string()),
        "tag" => Message::TagSelected(optional(arg)),
        "year" => Message::YearSelected(optional(arg)),
        "reset" => Message::ClearFilters,

        // Player
        "play" if arg.is_empty() => Message::PlayerPlay,
        "play" => {
            let n = number(arg)?;
            match listed_release(s, n) {
                Some(id) => Message::PlayerPlayRelease(id),
                None => Message::PlayerPlayEntry(listed_entry(s, n)?),
            }
        }
        "playall" => Message::PlayerPlayAllVisible,
        "pause" => Message::PlayerPause,
        "stop" => Message::PlayerStop,
        "toggle" | "p" => Message::PlayerToggle,
        "next" | "n" => Message::PlayerNext,
        "prev" | "previous" => Message::PlayerPrevious,
        "mode" => Message::PlayerCycleMode,
        "seek" => Message::PlayerSeek(
            parse_duration(arg).ok_or_else(|| format!("Not a position: {}", arg))?,
        ),
        "vol" | "volume" => {
            let percent: f32 = arg
                .trim_end_matches('%')
                .parse()
                .map_err(|_| format!("Not a volume: {}", arg))?;
            Message::PlayerVolumeChanged(percent / 100.0)
        }

        // Queue
        "queue" | "q" if arg.is_empty() => return Ok(Input::ShowQueue),
        "queue" | "q" => {
            let n = number(arg)?;
            match listed_release(s, n) {
                Some(id) => Message::QueueAddRelease(id),
                None => Message::QueueAdd(listed_entry(s, n)?),
            }
        }
        "rm" => Message::QueueRemove(queue_index(s, arg)?),
        "up" => Message::QueueMoveUp(queue_index(s, arg)?),
        "down" => Message::QueueMoveDown(queue_index(s, arg)?),
        "clear" => Message::QueueClear,

        other => return Err(format!("Unknown command: {} (try `help`)", other)),
    };
    Ok(Input::Send(message))
}

/// 1-based list number.
fn number(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Expected a list number, got `{}`", arg)),
    }
}

/// `-` or nothing clears a filter.
fn optional(arg: &str) -> Option<String> {
    (!arg.is_empty() && arg != "-").then(|| arg.to_string())
}

fn listed_release(s: &AppState, n: usize) -> Option<String> {
    s.listed_releases().get(n - 1).map(|r| r.id.clone())
}

fn listed_entry(s: &AppState, n: usize) -> Result<crate::model::QueueEntry, String> {
    s.listed_entries()
        .into_iter()
        .nth(n - 1)
        .ok_or_else(|| format!("No item {} in this view", n))
}

fn queue_index(s: &AppState, arg: &str) -> Result<usize, String> {
    let n = number(arg)?;
    if n > s.queue.len() {
        return Err(format!("Queue has {} entries", s.queue.len()));
    }
    Ok(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture_catalog, mock_player};

    fn app() -> App {
        let (player, _sink) = mock_player();
        App::with_player(fixture_catalog(), String::new(), &Default::default(), player)
    }

    fn send(line: &str, app: &App) -> Message {
        match parse_line(line, app.state()) {
            Ok(Input::Send(message)) => message,
            other => panic!("expected a message for `{}`, got {:?}", line, other),
        }
    }

    #[test]
    fn test_numbers_resolve_against_tracks_view() {
        let app = app();
        match send("play 2", &app) {
            Message::PlayerPlayEntry(entry) => assert_eq!(entry.title(), "T1"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse_line("play 99", app.state()).is_err());
        assert!(parse_line("play 0", app.state()).is_err());
    }

    #[test]
    fn test_numbers_resolve_against_collections_view() {
        let mut app = app();
        app.update(Message::ShowView(TopLevelView::Collections));
        assert!(matches!(send("open 1", &app), Message::OpenRelease(id) if id == "a"));
        assert!(matches!(send("queue 2", &app), Message::QueueAddRelease(id) if id == "b"));

        app.update(Message::OpenRelease("a".to_string()));
        match send("open 3", &app) {
            Message::OpenTrack(entry) => assert_eq!(entry.title(), "T3"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_filter_and_player_arguments() {
        let app = app();
        assert!(matches!(send("tag -", &app), Message::TagSelected(None)));
        assert!(matches!(send("year 2023", &app), Message::YearSelected(Some(y)) if y == "2023"));
        assert!(
            matches!(send("vol 30", &app), Message::PlayerVolumeChanged(v) if (v - 0.3).abs() < 1e-6)
        );
        assert!(
            matches!(send("seek 1:05", &app), Message::PlayerSeek(d) if d == Duration::from_secs(65))
        );
        assert!(parse_line("vol loud", app.state()).is_err());
    }

    #[test]
    fn test_queue_indices_are_checked() {
        let mut app = app();
        assert!(matches!(parse_line("q", app.state()), Ok(Input::ShowQueue)));
        assert!(parse_line("rm 1", app.state()).is_err());

        app.update(Message::QueueAddRelease("a".to_string()));
        assert!(matches!(send("down 3", &app), Message::QueueMoveDown(2)));
    }

    #[test]
    fn test_control_words() {
        let app = app();
        assert!(matches!(parse_line("quit", app.state()), Ok(Input::Quit)));
        assert!(matches!(parse_line("HELP", app.state()), Ok(Input::Help)));
        assert!(parse_line("dance", app.state()).is_err());
    }
}
