//! Inbound session events as delivered by a transport.

use crate::ToolCall;

/// A chunk of binary media (usually PCM audio) from the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFragment {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One event pushed by the transport. Ownership moves from the transport to
/// the queue and then into a [`Turn`](crate::Turn).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TextFragment { text: String },
    MediaFragment(MediaFragment),
    ToolCallRequest { calls: Vec<ToolCall> },
    TurnComplete,
    /// Connection-level fault reported by the transport.
    Error { cause: String },
    /// The remote side closed the connection.
    Closed { reason: String },
}

impl Event {
    pub fn text(text: impl Into<String>) -> Self {
        Event::TextFragment { text: text.into() }
    }

    pub fn media(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Event::MediaFragment(MediaFragment {
            mime_type: mime_type.into(),
            data,
        })
    }

    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Event::ToolCallRequest { calls }
    }

    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TextFragment { .. } => "text",
            Event::MediaFragment(_) => "media",
            Event::ToolCallRequest { .. } => "tool_call",
            Event::TurnComplete => "turn_complete",
            Event::Error { .. } => "error",
            Event::Closed { .. } => "closed",
        }
    }

    /// Content fragments are the only events a [`ContentFilter`](crate::ContentFilter)
    /// may skip.
    pub fn is_fragment(&self) -> bool {
        matches!(self, Event::TextFragment { .. } | Event::MediaFragment(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_build_expected_variants() {
        assert!(matches!(Event::text("hi"), Event::TextFragment { ref text } if text == "hi"));

        let media = Event::media("audio/pcm;rate=24000", vec![1, 2]);
        assert!(matches!(
            media,
            Event::MediaFragment(MediaFragment { ref mime_type, ref data })
                if mime_type == "audio/pcm;rate=24000" && data == &[1, 2]
        ));

        assert!(matches!(
            Event::tool_calls(Vec::new()),
            Event::ToolCallRequest { ref calls } if calls.is_empty()
        ));
    }

    #[test]
    fn only_text_and_media_are_fragments() {
        assert!(Event::text("a").is_fragment());
        assert!(Event::media("audio/pcm", vec![]).is_fragment());
        assert!(!Event::TurnComplete.is_fragment());
        assert!(!Event::tool_calls(vec![]).is_fragment());
        assert!(!Event::Error { cause: "x".into() }.is_fragment());
        assert!(!Event::Closed { reason: "x".into() }.is_fragment());
    }

    #[test]
    fn kind_labels() {
        assert_eq!(Event::TurnComplete.kind(), "turn_complete");
        assert_eq!(Event::tool_calls(vec![]).kind(), "tool_call");
        assert_eq!(Event::Closed { reason: String::new() }.kind(), "closed");
    }
}
