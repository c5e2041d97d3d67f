//! The interactive rename session.
//!
//! Holds the user inputs, recomputes the derived [`Preview`] in full after
//! every change, and moves through `Empty -> Renaming -> Renamed` as paths are
//! picked, applied and undone.

use crate::apply::{apply_renames, revert_renames, ApplyError, ApplyOptions};
use crate::config::Config;
use crate::engine::{Preview, RenameEngine, RenameInput};
use crate::fs::{FileSystem, OsFileSystem};
use crate::mistake::Mistake;
use crate::normalize::{normalize, normalize_paths};
use crate::target::RenameTarget;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No paths picked
    Empty,
    /// Paths picked, preview available
    Renaming,
    /// The preview was applied and can be undone
    Renamed,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("the current rename cannot be applied ({} mistakes)", .mistakes.len())]
    CannotApply { mistakes: Vec<Mistake> },

    #[error("there is no applied rename to undo")]
    NothingToUndo,

    #[error(transparent)]
    Apply(#[from] ApplyError),
}

pub struct Session<F = OsFileSystem> {
    engine: RenameEngine<F>,
    input: RenameInput,
    preview: Preview,
    state: SessionState,
    journal: Vec<(PathBuf, PathBuf)>,
    options: ApplyOptions,
}

impl Session<OsFileSystem> {
    /// A session on the real filesystem using the configured defaults
    pub fn new(config: &Config) -> Self {
        Self::with_engine(
            RenameEngine::new(config.platform()),
            config.defaults.target,
        )
    }
}

impl<F: FileSystem> Session<F> {
    pub fn with_engine(engine: RenameEngine<F>, target: RenameTarget) -> Self {
        let input = RenameInput {
            target,
            ..RenameInput::default()
        };
        let preview = engine.compute(&input);
        Self {
            engine,
            input,
            preview,
            state: SessionState::Empty,
            journal: Vec::new(),
            options: ApplyOptions::default(),
        }
    }

    /// Flag checked between renames; raising it rolls the batch back
    pub fn set_interrupt(&mut self, flag: Arc<AtomicBool>) {
        self.options.interrupt = Some(flag);
    }

    pub fn set_picked_paths<S: AsRef<str>>(&mut self, paths: &[S]) -> &Preview {
        self.input.picked_paths = normalize_paths(paths);
        self.recompute()
    }

    /// Replace every input at once
    pub fn set_input(&mut self, input: &RenameInput) -> &Preview {
        self.input = RenameInput::new(
            &input.picked_paths,
            &input.regex,
            &input.replace_pattern,
            input.target,
        );
        self.recompute()
    }

    pub fn clear_paths(&mut self) -> &Preview {
        self.input.picked_paths.clear();
        self.recompute()
    }

    pub fn set_regex(&mut self, regex: &str) -> &Preview {
        self.input.regex = normalize(regex);
        self.recompute()
    }

    pub fn set_replace_pattern(&mut self, replace_pattern: &str) -> &Preview {
        self.input.replace_pattern = normalize(replace_pattern);
        self.recompute()
    }

    pub fn set_target(&mut self, target: RenameTarget) -> &Preview {
        self.input.target = target;
        self.recompute()
    }

    /// Derive the preview from the current inputs. Any input change forgets
    /// an applied batch: undo is only offered for the preview it came from.
    fn recompute(&mut self) -> &Preview {
        self.preview = self.engine.compute(&self.input);
        self.journal.clear();
        self.state = if self.input.picked_paths.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Renaming
        };
        &self.preview
    }

    pub fn input(&self) -> &RenameInput {
        &self.input
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn can_apply(&self) -> bool {
        self.state == SessionState::Renaming && self.preview.can_apply
    }

    pub fn can_undo(&self) -> bool {
        self.state == SessionState::Renamed
    }

    /// Renames performed by the last apply, in order
    pub fn journal(&self) -> &[(PathBuf, PathBuf)] {
        &self.journal
    }

    /// Rename every changed entry. On failure nothing stays renamed (unless
    /// the error says rollback failed) and the session stays in `Renaming`.
    pub fn apply(&mut self) -> Result<&[(PathBuf, PathBuf)], SessionError> {
        if !self.can_apply() {
            return Err(SessionError::CannotApply {
                mistakes: self.preview.mistakes.clone(),
            });
        }

        let pairs: Vec<(PathBuf, PathBuf)> = self
            .preview
            .changes()
            .into_iter()
            .map(|entry| (PathBuf::from(entry.picked), PathBuf::from(entry.renamed)))
            .collect();

        self.journal = apply_renames(self.engine.fs(), &pairs, &self.options)?;
        self.state = SessionState::Renamed;
        Ok(&self.journal)
    }

    /// Move every renamed entry back. On success the preview is recomputed
    /// and apply becomes available again.
    pub fn undo(&mut self) -> Result<(), SessionError> {
        if !self.can_undo() {
            return Err(SessionError::NothingToUndo);
        }

        revert_renames(self.engine.fs(), &self.journal, &self.options)?;
        self.recompute();
        Ok(())
    }
}
