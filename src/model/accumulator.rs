//! Running text shared by every text reading of one feed.
//!
//! The sensor daemon's text readings are shown as one growing transcript:
//! each new text token is appended (space-joined) and every text reading
//! displays the whole transcript. This state lives here, owned by a single
//! [`TelemetryReader`](crate::source::TelemetryReader), so separate feeds
//! (and separate tests) never share it.

/// Space-joined transcript of all text tokens seen by one reader.
///
/// Tokens are appended as lines are read, before the read as a whole has
/// succeeded. A read that fails partway and is retried appends its tokens
/// again; the transcript is never rolled back.
#[derive(Debug, Clone, Default)]
pub struct TextAccumulator {
    text: String,
}

impl TextAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `token` and return the full transcript.
    ///
    /// Empty tokens still add a separator once the transcript is non-empty,
    /// matching what the display has always shown for blank text fields.
    pub fn append(&mut self, token: &str) -> &str {
        if self.text.is_empty() {
            self.text.push_str(token);
        } else {
            self.text.push(' ');
            self.text.push_str(token);
        }
        &self.text
    }

    /// The transcript so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
