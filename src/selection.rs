//! File-manager integration support.
//!
//! Context-menu extensions hand over the user's selection as a list of
//! entries whose filesystem path may be absent (virtual locations). This
//! module turns such a selection into a ready-to-launch `thumbs delete`
//! invocation. Entries without a resolvable path are skipped silently, and
//! no command is built for an empty selection, so hosts can simply omit
//! their menu action in that case.

use snafu::ResultExt;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{CommandLaunchSnafu, Result};

/// Fixed argv prefix: recursive, no confirmation.
const DELETE_PREFIX: [&str; 4] = ["thumbs", "delete", "-r", "-f"];

/// Collect the distinct resolvable paths of a selection, preserving the
/// first-seen order.
pub fn collect_paths<I, P>(entries: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = Option<P>>,
    P: Into<PathBuf>,
{
    let mut paths: Vec<PathBuf> = Vec::new();
    for path in entries.into_iter().flatten() {
        let path = path.into();
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}

/// A `thumbs delete` invocation for a non-empty selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCommand {
    argv: Vec<OsString>,
}

impl DeleteCommand {
    /// Build the invocation, or `None` when no path resolved.
    pub fn for_paths<I>(paths: I) -> Option<Self>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut argv: Vec<OsString> = DELETE_PREFIX.into_iter().map(OsString::from).collect();
        argv.extend(paths.into_iter().map(OsString::from));
        (argv.len() > DELETE_PREFIX.len()).then_some(Self { argv })
    }

    pub fn program(&self) -> &OsStr {
        &self.argv[0]
    }

    pub fn argv(&self) -> &[OsString] {
        &self.argv
    }

    /// Launch the command, fire-and-forget: the child is not waited on and
    /// its output is discarded.
    pub fn spawn(&self) -> Result<()> {
        Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .context(CommandLaunchSnafu {
                command: DELETE_PREFIX[0],
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv_strings(command: &DeleteCommand) -> Vec<String> {
        command
            .argv()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn duplicate_and_absent_paths_are_dropped() {
        let entries = vec![
            Some("/a/b.jpg"),
            Some("/a/b.jpg"),
            None,
            Some("/c/d.png"),
        ];
        let paths = collect_paths(entries);
        assert_eq!(
            paths,
            vec![PathBuf::from("/a/b.jpg"), PathBuf::from("/c/d.png")]
        );

        let command = DeleteCommand::for_paths(paths).unwrap();
        assert_eq!(
            argv_strings(&command),
            vec!["thumbs", "delete", "-r", "-f", "/a/b.jpg", "/c/d.png"]
        );
    }

    #[test]
    fn unresolvable_entries_do_not_disturb_ordering() {
        let entries = vec![None, Some("/z/last.png"), None, Some("/a/first.png")];
        assert_eq!(
            collect_paths(entries),
            vec![PathBuf::from("/z/last.png"), PathBuf::from("/a/first.png")]
        );
    }

    #[test]
    fn empty_selection_builds_no_command() {
        let paths = collect_paths(Vec::<Option<PathBuf>>::new());
        assert!(paths.is_empty());
        assert!(DeleteCommand::for_paths(paths).is_none());

        let only_absent = collect_paths(vec![None::<PathBuf>]);
        assert!(DeleteCommand::for_paths(only_absent).is_none());
    }

    #[test]
    fn single_folder_selection() {
        let paths = collect_paths(vec![Some("/home/u/Pictures")]);
        let command = DeleteCommand::for_paths(paths).unwrap();
        assert_eq!(
            argv_strings(&command),
            vec!["thumbs", "delete", "-r", "-f", "/home/u/Pictures"]
        );
        assert_eq!(command.program(), OsStr::new("thumbs"));
    }
}
