//! `View` implementation writing to the terminal.
//!
//! Results go to stdout; errors, prompts and the loading indicator go to
//! stderr so output stays pipeable.

use std::io::{self, BufRead, Write};

use crossterm::{
    cursor::MoveToColumn,
    execute,
    terminal::{Clear, ClearType},
};
use tracing::warn;

use songshelf_core::models::{Playlist, RemotePlaylist, Song};
use songshelf_core::utils::truncate_string;
use songshelf_core::View;

use super::styles;

/// Column widths for the playlist tables
const ID_WIDTH: usize = 8;
const NAME_WIDTH: usize = 32;
const REMOTE_ID_WIDTH: usize = 16;

pub struct TerminalView {
    assume_yes: bool,
}

impl TerminalView {
    /// `assume_yes` answers every confirmation without asking.
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl View for TerminalView {
    fn show_error(&self, message: &str) {
        eprintln!("{} {}", styles::error("Error:"), message);
    }

    fn alert(&self, message: &str) {
        println!("{}", styles::highlight(message));
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match prompt_line(&format!("{} [y/N] ", prompt), None) {
            Ok(answer) => is_yes(&answer),
            Err(e) => {
                warn!(error = %e, "Failed to read confirmation");
                false
            }
        }
    }

    fn show_loading(&self) {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "{}", styles::muted("Loading..."));
        let _ = stderr.flush();
    }

    fn hide_loading(&self) {
        let _ = execute!(io::stderr(), MoveToColumn(0), Clear(ClearType::CurrentLine));
    }

    fn show_username(&self, name: &str) {
        eprintln!("{} {}", styles::muted("Signed in as"), styles::highlight(name));
    }

    fn render_playlists(&self, playlists: &[Playlist]) {
        println!("{}", styles::title("My playlists"));
        if playlists.is_empty() {
            println!(
                "{}",
                styles::muted("No playlists yet. Import one with `songshelf import <id>`.")
            );
            return;
        }

        println!(
            "{}",
            styles::muted(&format!(
                "{:<id$} {:<name$} {:>6} {:<remote$} {}",
                "ID",
                "NAME",
                "SONGS",
                "SOURCE ID",
                "CREATED",
                id = ID_WIDTH,
                name = NAME_WIDTH,
                remote = REMOTE_ID_WIDTH,
            ))
        );
        for playlist in playlists {
            println!(
                "{:<id$} {:<name$} {:>6} {:<remote$} {}",
                playlist.id,
                truncate_string(&playlist.name, NAME_WIDTH),
                playlist.display_song_count(),
                truncate_string(playlist.display_remote_id(), REMOTE_ID_WIDTH),
                playlist.display_created_at(),
                id = ID_WIDTH,
                name = NAME_WIDTH,
                remote = REMOTE_ID_WIDTH,
            );
            println!("  {}", styles::muted(&playlist.description_preview()));
        }
    }

    fn render_search_results(&self, results: &[RemotePlaylist]) {
        if results.is_empty() {
            println!("{}", styles::muted("No playlists found."));
            return;
        }

        for result in results {
            println!(
                "{} {} {}",
                styles::key(result.id.as_deref().unwrap_or("-")),
                styles::title(&result.name),
                styles::muted(&format!("({} tracks)", result.display_track_count())),
            );
            println!("  {}", result.description_preview());
        }
        println!(
            "{}",
            styles::muted("Import one with `songshelf import <id>`.")
        );
    }

    fn render_playlist_info(&self, playlist: &Playlist) {
        println!("{}", styles::title(&playlist.name));
        println!("{}", playlist.display_description());
        println!(
            "{} {}   {} {}   {} {}",
            styles::muted("Source ID:"),
            playlist.display_remote_id(),
            styles::muted("Songs:"),
            playlist.display_song_count(),
            styles::muted("Created:"),
            playlist.display_created_at(),
        );
    }

    fn render_songs(&self, songs: &[Song]) {
        if songs.is_empty() {
            println!("{}", styles::muted("This playlist has no songs."));
            return;
        }

        for (index, song) in songs.iter().enumerate() {
            println!(
                "{:>4}. {} {} {} {}",
                index + 1,
                song.name,
                styles::muted(&format!("- {}", song.display_artist())),
                styles::muted(&format!("({})", song.display_album())),
                styles::success(&song.display_duration()),
            );
        }
    }
}

/// Read one line from stdin after printing `label`. An empty answer falls
/// back to `default` when one is given.
pub fn prompt_line(label: &str, default: Option<&str>) -> io::Result<String> {
    let mut stderr = io::stderr();
    match default {
        Some(default) => write!(stderr, "{}[{}] ", label, default)?,
        None => write!(stderr, "{}", label)?,
    }
    stderr.flush()?;

    read_answer(io::stdin().lock(), default)
}

fn read_answer<R: BufRead>(mut reader: R, default: Option<&str>) -> io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let answer = line.trim();
    Ok(match default {
        Some(default) if answer.is_empty() => default.to_string(),
        _ => answer.to_string(),
    })
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
