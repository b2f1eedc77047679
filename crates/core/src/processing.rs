//! Processing states shared by track transcoding and metadata extraction.
//!
//! The discriminants are the values stored in the `transcode_state` and
//! `metadatas_state` columns. `2` is unused and must stay that way for
//! compatibility with existing rows.

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StateId = i16;

/// Lifecycle of one processing step.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingState {
    /// Queued for the worker.
    Waiting = 1,
    Failed = 3,
    Finished = 4,
    /// Nothing to do, e.g. an upload already in the distribution format.
    NotNeeded = 5,
}

impl ProcessingState {
    /// Return the database state ID.
    pub fn id(self) -> StateId {
        self as StateId
    }

    /// Parse a stored state ID.
    pub fn try_from_id(id: StateId) -> Result<Self, CoreError> {
        match id {
            1 => Ok(Self::Waiting),
            3 => Ok(Self::Failed),
            4 => Ok(Self::Finished),
            5 => Ok(Self::NotNeeded),
            other => Err(CoreError::Validation(format!(
                "Unknown processing state id {other}"
            ))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Failed => "failed",
            Self::Finished => "finished",
            Self::NotNeeded => "not_needed",
        }
    }

    /// Terminal states in which the track can be served.
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Finished | Self::NotNeeded)
    }

    /// Whether the worker may move a step from `self` to `next`.
    ///
    /// Any settled state can be queued again; only a waiting step can settle.
    pub fn can_transition_to(self, next: Self) -> bool {
        use ProcessingState::*;
        matches!(
            (self, next),
            (Waiting, Waiting | Finished | Failed)
                | (Failed, Waiting)
                | (Finished, Waiting)
                | (NotNeeded, Waiting)
        )
    }

    /// Like [`can_transition_to`](Self::can_transition_to) but returns the
    /// matching error.
    pub fn check_transition(self, next: Self) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.label(),
                to: next.label(),
            })
        }
    }

    /// Initial transcode state of a freshly uploaded track.
    pub fn initial_transcode(transcode_needed: bool) -> Self {
        if transcode_needed {
            Self::Waiting
        } else {
            Self::NotNeeded
        }
    }
}

impl From<ProcessingState> for StateId {
    fn from(value: ProcessingState) -> Self {
        value as StateId
    }
}

impl std::fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which processing step a state update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackStateKind {
    Transcoding,
    Metadatas,
}
