use crate::{AppError, AppResult};

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;
use snapbook_core::PhotoId;

/// Which photo a `delete` command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    /// 1-based position in the gallery grid.
    Position(usize),
    /// Record id, as printed after `id=` on each tile line.
    Id(PhotoId),
}

/// Commands sent from the input handler to the main application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Freeze the live preview into a photo.
    Capture,
    /// Discard the frozen view and restart the camera.
    Retake,
    /// Save the frozen photo as a PNG file.
    Download,
    /// Switch to the gallery screen.
    ShowGallery,
    /// Switch to the camera screen.
    ShowCamera,
    /// Remove one photo from the gallery.
    Delete(DeleteTarget),
    /// Remove every photo from the gallery.
    Clear,
    /// Print the command list.
    Help,
    /// Request application shutdown.
    Shutdown,
}

impl AppCommand {
    /// One line per command, printed by `help`.
    pub const USAGE: &'static str = "\
capture         take a photo
retake          discard the photo and restart the camera
download        save the current photo as a PNG file
gallery         show stored photos
camera          back to the camera
delete <n>      delete the photo at position n
delete id=<id>  delete the photo with the given id
clear           delete all photos
help            show this list
quit            exit";

    /// Parse one input line. Surrounding whitespace and case are ignored.
    #[track_caller]
    pub fn parse(line: &str) -> AppResult<Self> {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();
        let argument = words.next();

        if words.next().is_some() {
            return Err(invalid(line, "too many arguments"));
        }

        let command = match (verb.as_str(), argument) {
            ("capture" | "c", None) => AppCommand::Capture,
            ("retake" | "r", None) => AppCommand::Retake,
            ("download" | "d", None) => AppCommand::Download,
            ("gallery" | "g", None) => AppCommand::ShowGallery,
            ("camera", None) => AppCommand::ShowCamera,
            ("clear", None) => AppCommand::Clear,
            ("help" | "?", None) => AppCommand::Help,
            ("quit" | "exit" | "q", None) => AppCommand::Shutdown,
            ("delete" | "rm", Some(target)) => AppCommand::Delete(parse_target(line, target)?),
            ("delete" | "rm", None) => return Err(invalid(line, "missing photo number")),
            ("", _) => return Err(invalid(line, "empty command")),
            (_, Some(_)) if is_known(&verb) => {
                return Err(invalid(line, "command takes no argument"));
            }
            _ => return Err(invalid(line, "unknown command")),
        };

        Ok(command)
    }
}

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(s: &str) -> AppResult<Self> {
        AppCommand::parse(s)
    }
}

#[track_caller]
fn parse_target(line: &str, target: &str) -> AppResult<DeleteTarget> {
    if let Some(id) = target.strip_prefix("id=") {
        return id
            .parse::<PhotoId>()
            .map(DeleteTarget::Id)
            .map_err(|_| invalid(line, "photo id must be a number"));
    }

    match target.parse::<usize>() {
        Ok(0) => Err(invalid(line, "photo numbers start at 1")),
        Ok(position) => Ok(DeleteTarget::Position(position)),
        Err(_) => Err(invalid(line, "photo number must be a positive integer")),
    }
}

fn is_known(verb: &str) -> bool {
    matches!(
        verb,
        "capture"
            | "c"
            | "retake"
            | "r"
            | "download"
            | "d"
            | "gallery"
            | "g"
            | "camera"
            | "clear"
            | "help"
            | "?"
            | "quit"
            | "exit"
            | "q"
    )
}

#[track_caller]
fn invalid(input: &str, reason: &str) -> AppError {
    AppError::InvalidCommand {
        input: input.to_string(),
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
