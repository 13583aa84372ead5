//! Sealed turns and their content projections.

use crate::{Event, MediaFragment, ToolCall};

/// Why the aggregator stopped draining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEnd {
    /// The peer sent its turn-complete marker.
    Complete,
    /// The peer is waiting for tool results before it continues.
    ToolCalls,
    /// The transport reported a connection-level fault.
    Failed { cause: String },
    /// The remote side closed the connection.
    Disconnected { reason: String },
    /// The session was closed locally.
    Closed,
}

impl TurnEnd {
    /// Whether the session cannot produce further turns.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TurnEnd::Failed { .. } | TurnEnd::Disconnected { .. } | TurnEnd::Closed
        )
    }
}

/// Which content fragments a caller wants accumulated. Control events
/// (tool calls, completion, errors) are always kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentFilter {
    pub text: bool,
    pub media: bool,
}

impl ContentFilter {
    pub const ALL: Self = Self {
        text: true,
        media: true,
    };
    pub const TEXT: Self = Self {
        text: true,
        media: false,
    };
    pub const MEDIA: Self = Self {
        text: false,
        media: true,
    };

    pub fn accepts(&self, event: &Event) -> bool {
        match event {
            Event::TextFragment { .. } => self.text,
            Event::MediaFragment(_) => self.media,
            _ => true,
        }
    }
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::ALL
    }
}

/// An ordered, sealed aggregation of events for one exchange step.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    events: Vec<Event>,
    end: TurnEnd,
}

impl Turn {
    pub(crate) fn sealed(events: Vec<Event>, end: TurnEnd) -> Self {
        Self { events, end }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn end(&self) -> &TurnEnd {
        &self.end
    }

    /// No events were drained. Means "no content yet", not an error.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.end == TurnEnd::Complete
    }

    pub fn is_terminal(&self) -> bool {
        self.end.is_terminal()
    }

    /// All text fragments concatenated in arrival order.
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::TextFragment { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn media(&self) -> Vec<&MediaFragment> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::MediaFragment(fragment) => Some(fragment),
                _ => None,
            })
            .collect()
    }

    /// Tool calls across every request in the turn, in arrival order.
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::ToolCallRequest { calls } => Some(calls.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, Event::ToolCallRequest { calls } if !calls.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Payload;

    fn call(id: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: "turn_on_the_lights".into(),
            arguments: Payload::new(),
        }
    }

    #[test]
    fn projections_follow_arrival_order() {
        let turn = Turn::sealed(
            vec![
                Event::text("Hel"),
                Event::media("audio/pcm", vec![1]),
                Event::text("lo"),
                Event::media("audio/pcm", vec![2]),
                Event::TurnComplete,
            ],
            TurnEnd::Complete,
        );

        assert_eq!(turn.text(), "Hello");
        let media: Vec<_> = turn.media().iter().map(|m| m.data.clone()).collect();
        assert_eq!(media, vec![vec![1], vec![2]]);
        assert!(turn.tool_calls().is_empty());
        assert!(!turn.has_tool_calls());
        assert!(turn.is_complete());
        assert!(!turn.is_terminal());
    }

    #[test]
    fn tool_calls_are_flattened() {
        let turn = Turn::sealed(
            vec![Event::tool_calls(vec![call("1"), call("2")])],
            TurnEnd::ToolCalls,
        );
        let ids: Vec<_> = turn.tool_calls().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert!(turn.has_tool_calls());
    }

    #[test]
    fn empty_turn_is_not_an_error() {
        let turn = Turn::sealed(Vec::new(), TurnEnd::Closed);
        assert!(turn.is_empty());
        assert_eq!(turn.text(), "");
        assert!(turn.is_terminal());
    }

    #[test]
    fn terminal_ends() {
        assert!(!TurnEnd::Complete.is_terminal());
        assert!(!TurnEnd::ToolCalls.is_terminal());
        assert!(TurnEnd::Failed { cause: "x".into() }.is_terminal());
        assert!(TurnEnd::Disconnected { reason: "x".into() }.is_terminal());
        assert!(TurnEnd::Closed.is_terminal());
    }

    #[test]
    fn filter_never_rejects_control_events() {
        for filter in [ContentFilter::TEXT, ContentFilter::MEDIA] {
            assert!(filter.accepts(&Event::TurnComplete));
            assert!(filter.accepts(&Event::tool_calls(vec![])));
            assert!(filter.accepts(&Event::Error { cause: "x".into() }));
        }
        assert!(!ContentFilter::TEXT.accepts(&Event::media("audio/pcm", vec![])));
        assert!(!ContentFilter::MEDIA.accepts(&Event::text("hi")));
        assert_eq!(ContentFilter::default(), ContentFilter::ALL);
    }
}
