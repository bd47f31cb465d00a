//! Session state and its visible indicator.

/// Text shown before the truncated id in the session pill.
pub const INDICATOR_PREFIX: &str = "session: ";

const VISIBLE_ID_CHARS: usize = 8;

/// The session pill as a view should draw it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIndicator {
    pub text: String,
    pub visible: bool,
}

/// Holds the session token for the current conversation.
///
/// Owned by the controller; everything else reads it through a shared
/// reference.
#[derive(Debug, Default)]
pub struct SessionState {
    id: String,
    indicator: SessionIndicator,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `id` as the current session.
    ///
    /// Absent or empty ids are ignored so a reply without a session never
    /// erases one already established. Returns whether the session changed.
    pub fn set_session(&mut self, id: Option<&str>) -> bool {
        let Some(id) = id.filter(|id| !id.is_empty()) else {
            return false;
        };
        if id != self.id {
            log::debug!("Session established: {}", truncate_id(id));
        }
        self.id = id.to_string();
        self.indicator = SessionIndicator {
            text: format!("{INDICATOR_PREFIX}{}", truncate_id(id)),
            visible: true,
        };
        true
    }

    /// The current session id; empty until the first exchange sets one.
    pub fn current_session(&self) -> &str {
        &self.id
    }

    pub fn has_session(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn indicator(&self) -> &SessionIndicator {
        &self.indicator
    }

    /// Forget the session and hide the pill.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// First eight characters of `id` followed by an ellipsis.
pub fn truncate_id(id: &str) -> String {
    if id.is_empty() {
        return String::new();
    }
    let head: String = id.chars().take(VISIBLE_ID_CHARS).collect();
    format!("{head}…")
}
