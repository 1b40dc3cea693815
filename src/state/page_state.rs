/// Page state definitions for tracking one URL through the pipeline
///
/// ```text
/// Queued -> Fetching -> Fetched -> Rendering -> Written
///              |-> FetchFailed      |-> WriteFailed
///              '-> RobotsDenied
/// ```
use std::fmt;

/// Represents the current state of a page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Page is in the frontier waiting to be dequeued
    Queued,

    /// Page has been dequeued and is being checked or fetched
    Fetching,

    /// Page body was received with a success status
    Fetched,

    /// Assets are being resolved and the document rendered
    Rendering,

    // ===== Terminal States =====
    /// The document was written to disk
    Written,

    /// Transport error, timeout, or non-success status
    FetchFailed,

    /// Skipped because robots.txt disallows it
    RobotsDenied,

    /// The document could not be written
    WriteFailed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Written | Self::FetchFailed | Self::RobotsDenied | Self::WriteFailed
        )
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Written)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Fetching)
                | (Self::Fetching, Self::Fetched)
                | (Self::Fetching, Self::FetchFailed)
                | (Self::Fetching, Self::RobotsDenied)
                | (Self::Fetched, Self::Rendering)
                | (Self::Rendering, Self::Written)
                | (Self::Rendering, Self::WriteFailed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Fetching => "fetching",
            Self::Fetched => "fetched",
            Self::Rendering => "rendering",
            Self::Written => "written",
            Self::FetchFailed => "fetch_failed",
            Self::RobotsDenied => "robots_denied",
            Self::WriteFailed => "write_failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!PageState::Queued.is_terminal());
        assert!(!PageState::Fetching.is_terminal());
        assert!(!PageState::Fetched.is_terminal());
        assert!(!PageState::Rendering.is_terminal());

        assert!(PageState::Written.is_terminal());
        assert!(PageState::FetchFailed.is_terminal());
        assert!(PageState::RobotsDenied.is_terminal());
        assert!(PageState::WriteFailed.is_terminal());
    }

    #[test]
    fn test_is_success() {
        assert!(PageState::Written.is_success());
        assert!(!PageState::FetchFailed.is_success());
        assert!(!PageState::RobotsDenied.is_success());
    }

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            PageState::Queued,
            PageState::Fetching,
            PageState::Fetched,
            PageState::Rendering,
            PageState::Written,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_failure_transitions() {
        assert!(PageState::Fetching.can_transition_to(PageState::FetchFailed));
        assert!(PageState::Fetching.can_transition_to(PageState::RobotsDenied));
        assert!(PageState::Rendering.can_transition_to(PageState::WriteFailed));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!PageState::Queued.can_transition_to(PageState::Written));
        assert!(!PageState::Fetched.can_transition_to(PageState::Written));
        assert!(!PageState::RobotsDenied.can_transition_to(PageState::Fetching));
        assert!(!PageState::Written.can_transition_to(PageState::Queued));
    }

    #[test]
    fn test_display() {
        assert_eq!(PageState::Written.to_string(), "written");
        assert_eq!(PageState::RobotsDenied.to_string(), "robots_denied");
    }
}
