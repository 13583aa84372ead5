//! The handler registry and its dispatch boundary.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use super::HandlerError;
use crate::{LiveError, Payload, ToolCall, ToolDefinition, ToolResult};

/// A tool implementation. Runs synchronously; any internal waiting must
/// finish before it returns.
pub type ToolHandler<C> =
    Box<dyn Fn(&mut C, &Payload) -> Result<Payload, HandlerError> + Send + Sync>;

struct Registration<C> {
    definition: ToolDefinition,
    handler: ToolHandler<C>,
}

/// Maps tool names to handlers operating on application state `C`.
pub struct ToolRegistry<C> {
    entries: Vec<Registration<C>>,
    by_name: HashMap<String, usize>,
}

impl<C> ToolRegistry<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Install a handler under `definition.name`. Registering a name twice
    /// replaces the earlier entry in place. Returns `true` if it replaced one.
    pub fn register<F>(&mut self, definition: ToolDefinition, handler: F) -> bool
    where
        F: Fn(&mut C, &Payload) -> Result<Payload, HandlerError> + Send + Sync + 'static,
    {
        let registration = Registration {
            definition,
            handler: Box::new(handler),
        };
        let name = registration.definition.name.clone();

        match self.by_name.get(&name) {
            Some(&index) => {
                debug!(tool = %name, "Replacing tool handler");
                self.entries[index] = registration;
                true
            }
            None => {
                debug!(tool = %name, "Registering tool handler");
                self.by_name.insert(name, self.entries.len());
                self.entries.push(registration);
                false
            }
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_tool<F>(mut self, definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(&mut C, &Payload) -> Result<Payload, HandlerError> + Send + Sync + 'static,
    {
        self.register(definition, handler);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|r| r.definition.name.as_str())
            .collect()
    }

    /// Declarations of every registered tool, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.entries.iter().map(|r| r.definition.clone()).collect()
    }

    /// Invoke the handler for `call` once and wrap its outcome.
    ///
    /// Never fails: unknown names, handler errors and handler panics all
    /// become a result with an `{"error": ...}` payload for the peer.
    pub fn dispatch(&self, ctx: &mut C, call: &ToolCall) -> ToolResult {
        let Some(registration) = self.by_name.get(&call.name).map(|&i| &self.entries[i]) else {
            let err = LiveError::UnknownTool(call.name.clone());
            warn!(tool = %call.name, id = %call.id, "Peer requested an unregistered tool");
            return ToolResult::error(call, err.to_string());
        };

        debug!(tool = %call.name, id = %call.id, "Executing tool");
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            (registration.handler)(ctx, &call.arguments)
        }));

        let message = match outcome {
            Ok(Ok(payload)) => return ToolResult::new(call, payload),
            Ok(Err(e)) => e.0,
            Err(panic) => panic_message(panic.as_ref()),
        };

        let fault = LiveError::HandlerFault {
            name: call.name.clone(),
            message: message.clone(),
        };
        warn!(id = %call.id, error = %fault, "Tool handler failed");
        ToolResult::error(call, message)
    }
}

impl<C> Default for ToolRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for ToolRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("handler panicked: {s}")
    } else {
        "handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::required_str;
    use crate::result_payload;
    use serde_json::json;

    #[derive(Default)]
    struct Partners {
        names: Vec<String>,
        invocations: usize,
    }

    fn call(id: &str, name: &str, args: serde_json::Value) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: name.into(),
            arguments: args.as_object().cloned().unwrap_or_default(),
        }
    }

    fn add_partner(state: &mut Partners, args: &Payload) -> Result<Payload, HandlerError> {
        state.invocations += 1;
        let partner = required_str(args, "partner")?;
        if state.names.iter().any(|p| p == partner) {
            return Ok(result_payload(format!("\"{partner}\" already in Key Partners")));
        }
        state.names.push(partner.to_string());
        Ok(result_payload(format!("Added \"{partner}\" to Key Partners")))
    }

    fn registry() -> ToolRegistry<Partners> {
        ToolRegistry::new().with_tool(
            ToolDefinition::new("add_key_partner", "Add a key partner"),
            add_partner,
        )
    }

    #[test]
    fn dispatch_invokes_handler_with_context() {
        let registry = registry();
        let mut state = Partners::default();

        let result = registry.dispatch(
            &mut state,
            &call("1", "add_key_partner", json!({"partner": "Acme"})),
        );
        assert_eq!(result.id, "1");
        assert_eq!(result.name, "add_key_partner");
        assert_eq!(result.payload["result"], "Added \"Acme\" to Key Partners");
        assert_eq!(state.names, ["Acme"]);
    }

    #[test]
    fn duplicate_is_reported_by_handler_and_not_retried() {
        let registry = registry();
        let mut state = Partners::default();
        let c = call("1", "add_key_partner", json!({"partner": "Acme"}));

        registry.dispatch(&mut state, &c);
        let second = registry.dispatch(&mut state, &c);
        assert_eq!(second.payload["result"], "\"Acme\" already in Key Partners");
        assert_eq!(state.names.len(), 1);
        assert_eq!(state.invocations, 2, "exactly one invocation per dispatch");
    }

    #[test]
    fn unknown_tool_becomes_error_payload() {
        let registry = registry();
        let mut state = Partners::default();

        let result = registry.dispatch(&mut state, &call("9", "fly", json!({})));
        assert_eq!(result.id, "9");
        assert_eq!(result.error_message(), Some("Unknown function \"fly\""));
        assert_eq!(state.invocations, 0);
    }

    #[test]
    fn handler_error_becomes_error_payload() {
        let registry = registry();
        let mut state = Partners::default();

        let result = registry.dispatch(&mut state, &call("2", "add_key_partner", json!({})));
        assert_eq!(result.error_message(), Some("missing argument 'partner'"));
        assert!(state.names.is_empty());
    }

    #[test]
    fn handler_panic_is_contained() {
        let registry: ToolRegistry<Partners> = ToolRegistry::new().with_tool(
            ToolDefinition::new("explode", ""),
            |_: &mut Partners, _: &Payload| -> Result<Payload, HandlerError> {
                panic!("boom")
            },
        );
        let mut state = Partners::default();

        let result = registry.dispatch(&mut state, &call("3", "explode", json!({})));
        assert_eq!(result.error_message(), Some("handler panicked: boom"));
    }

    #[test]
    fn re_registration_replaces_in_place() {
        let mut registry = registry();
        registry.register(ToolDefinition::new("noop", ""), |_: &mut Partners, _: &Payload| {
            Ok(Payload::new())
        });
        let replaced = registry.register(
            ToolDefinition::new("add_key_partner", "replacement"),
            |_: &mut Partners, _: &Payload| Ok(result_payload("replaced")),
        );

        assert!(replaced);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), ["add_key_partner", "noop"]);
        assert_eq!(registry.definitions()[0].description, "replacement");

        let mut state = Partners::default();
        let result = registry.dispatch(
            &mut state,
            &call("1", "add_key_partner", json!({"partner": "Acme"})),
        );
        assert_eq!(result.payload["result"], "replaced");
        assert!(state.names.is_empty());
    }

    #[test]
    fn empty_registry() {
        let registry: ToolRegistry<()> = ToolRegistry::default();
        assert!(registry.is_empty());
        assert!(!registry.contains("anything"));
        assert!(registry.definitions().is_empty());
    }
}
