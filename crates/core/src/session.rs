//! Session-scoped response state
//!
//! A [`Session`] carries the last generated response from the generation step
//! to the preview and download steps that follow it. Each new generation
//! replaces the previous response.

use crate::archive::{pack, ArchiveError};
use crate::bundle::{extract_file, split_all, MarkerMode, ResponseBundle};
use serde::Serialize;

/// Error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Please generate the site first")]
    NotGenerated,

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Result of looking up one file for preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Preview {
    Found { path: String, html: String },
    Missing { path: String },
}

impl Preview {
    pub fn path(&self) -> &str {
        match self {
            Preview::Found { path, .. } | Preview::Missing { path } => path,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Preview::Found { .. })
    }

    /// Markup to display: the file itself, or a notice when it is missing.
    pub fn html(&self) -> String {
        match self {
            Preview::Found { html, .. } => html.clone(),
            Preview::Missing { path } => fallback_html(path),
        }
    }
}

/// Notice shown in place of a file the response does not contain.
pub fn fallback_html(path: &str) -> String {
    format!("<p style='padding:1rem;'>Unable to extract {path} from AI response.</p>")
}

/// Look up `path` in a response blob for preview.
pub fn preview(text: &str, path: &str, mode: MarkerMode) -> Preview {
    let path = path.trim().to_string();
    match extract_file(text, &path, mode) {
        Some(html) => Preview::Found { path, html },
        None => Preview::Missing { path },
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    mode: MarkerMode,
    last_response: Option<String>,
}

impl Session {
    pub fn new(mode: MarkerMode) -> Self {
        Self {
            mode,
            last_response: None,
        }
    }

    pub fn mode(&self) -> MarkerMode {
        self.mode
    }

    /// Store a new response, replacing any previous one.
    pub fn record(&mut self, text: impl Into<String>) {
        self.last_response = Some(text.into());
    }

    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    pub fn preview(&self, path: &str) -> Result<Preview, SessionError> {
        let text = self.last_response().ok_or(SessionError::NotGenerated)?;
        Ok(preview(text, path, self.mode))
    }

    pub fn bundle(&self) -> Result<ResponseBundle, SessionError> {
        let text = self.last_response().ok_or(SessionError::NotGenerated)?;
        Ok(split_all(text, self.mode))
    }

    /// Zip archive of every file in the last response.
    pub fn archive(&self) -> Result<Vec<u8>, SessionError> {
        Ok(pack(&self.bundle()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::unpack;

    const RESPONSE: &str = "<!-- File: index.html -->\n<h1>Menu</h1>\n<!-- File: css/styles.css -->\nh1 { color: red; }";

    #[test]
    fn test_empty_session_refuses_preview_and_archive() {
        let session = Session::new(MarkerMode::Strict);
        assert!(matches!(session.preview("index.html"), Err(SessionError::NotGenerated)));
        assert!(matches!(session.archive(), Err(SessionError::NotGenerated)));
    }

    #[test]
    fn test_session_preview_found() {
        let mut session = Session::new(MarkerMode::Strict);
        session.record(RESPONSE);

        let preview = session.preview("index.html").unwrap();
        assert!(preview.is_found());
        assert_eq!(preview.html(), "<h1>Menu</h1>");
    }

    #[test]
    fn test_session_preview_missing_renders_fallback() {
        let mut session = Session::new(MarkerMode::Strict);
        session.record(RESPONSE);

        let preview = session.preview("about.html").unwrap();
        assert_eq!(preview, Preview::Missing { path: "about.html".to_string() });
        assert!(preview.html().contains("Unable to extract about.html"));
    }

    #[test]
    fn test_session_archive_round_trip() {
        let mut session = Session::new(MarkerMode::Strict);
        session.record(RESPONSE);

        let restored = unpack(&session.archive().unwrap()).unwrap();
        assert_eq!(restored.get("index.html"), Some("<h1>Menu</h1>"));
        assert_eq!(restored.get("css/styles.css"), Some("h1 { color: red; }"));
    }

    #[test]
    fn test_session_archive_without_markers() {
        let mut session = Session::new(MarkerMode::Strict);
        session.record("I could not build that site.");

        assert!(matches!(
            session.archive(),
            Err(SessionError::Archive(ArchiveError::EmptyBundle))
        ));
    }

    #[test]
    fn test_record_replaces_previous_response() {
        let mut session = Session::default();
        session.record(RESPONSE);
        session.record("<!-- File: index.html -->\n<h1>New</h1>");

        assert_eq!(session.bundle().unwrap().len(), 1);
        assert_eq!(session.preview("index.html").unwrap().html(), "<h1>New</h1>");
    }

    #[test]
    fn test_preview_serializes_with_status() {
        let found = preview(RESPONSE, "index.html", MarkerMode::Strict);
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["path"], "index.html");
    }
}
