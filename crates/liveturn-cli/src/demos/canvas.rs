//! Business Model Canvas assistant.
//!
//! The model fills the canvas through tool calls while the user describes
//! their business in plain conversation.

use liveturn_common::LiveturnError;
use liveturn_config::LiveturnConfig;
use liveturn_core::tools::required_str;
use liveturn_core::{
    result_payload, ContentFilter, HandlerError, Payload, ToolDefinition, ToolRegistry,
};
use serde_json::json;

use super::prompt::{is_command, Prompt};
use crate::bootstrap::{self, SessionOptions};

const SYSTEM_INSTRUCTION: &str = "You are helping fill out a Business Model Canvas through natural conversation.
When users mention:
- Customers/target market -> immediately call add_customer_segment
- Value/benefits/solutions -> immediately call add_value_proposition
- Partners/integrations -> immediately call add_key_partner
- Core activities/tasks -> immediately call add_key_activity

Be conversational and extract information naturally from what they say.";

/// The nine blocks of a Business Model Canvas. Each list keeps insertion
/// order and holds no duplicates.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Canvas {
    pub key_partners: Vec<String>,
    pub key_activities: Vec<String>,
    pub key_resources: Vec<String>,
    pub value_propositions: Vec<String>,
    pub customer_relationships: Vec<String>,
    pub channels: Vec<String>,
    pub customer_segments: Vec<String>,
    pub cost_structure: Vec<String>,
    pub revenue_streams: Vec<String>,
}

impl Canvas {
    /// The sections the assistant can fill, as printed by `show`.
    pub fn render(&self) -> String {
        let rows = [
            ("Customer Segments", &self.customer_segments),
            ("Value Propositions", &self.value_propositions),
            ("Key Partners", &self.key_partners),
            ("Key Activities", &self.key_activities),
        ];

        let mut out = String::from("\n=== BUSINESS MODEL CANVAS ===\n\n");
        for (section, items) in rows {
            let joined = if items.is_empty() {
                "(empty)".to_string()
            } else {
                items.join(", ")
            };
            out.push_str(&format!("{section}: {joined}\n"));
        }
        out
    }
}

fn add_unique(list: &mut Vec<String>, item: &str, section: &str) -> Payload {
    if list.iter().any(|existing| existing == item) {
        result_payload(format!("\"{item}\" already in {section}"))
    } else {
        list.push(item.to_string());
        result_payload(format!("Added \"{item}\" to {section}"))
    }
}

fn definition(name: &str, description: &str, param: &str, param_description: &str) -> ToolDefinition {
    ToolDefinition::new(name, description).with_parameters(json!({
        "type": "object",
        "properties": {
            param: { "type": "string", "description": param_description }
        },
        "required": [param]
    }))
}

fn handler(
    param: &'static str,
    section: &'static str,
    list: fn(&mut Canvas) -> &mut Vec<String>,
) -> impl Fn(&mut Canvas, &Payload) -> Result<Payload, HandlerError> + Send + Sync + 'static {
    move |canvas, args| {
        let item = required_str(args, param)?;
        Ok(add_unique(list(canvas), item, section))
    }
}

pub fn registry() -> ToolRegistry<Canvas> {
    ToolRegistry::new()
        .with_tool(
            definition(
                "add_customer_segment",
                "Add a customer segment to the business model canvas",
                "segment",
                "The customer segment to add",
            ),
            handler("segment", "Customer Segments", |c| &mut c.customer_segments),
        )
        .with_tool(
            definition(
                "add_value_proposition",
                "Add a value proposition to the business model canvas",
                "proposition",
                "The value proposition to add",
            ),
            handler("proposition", "Value Propositions", |c| {
                &mut c.value_propositions
            }),
        )
        .with_tool(
            definition(
                "add_key_partner",
                "Add a key partner to the business model canvas",
                "partner",
                "The key partner to add",
            ),
            handler("partner", "Key Partners", |c| &mut c.key_partners),
        )
        .with_tool(
            definition(
                "add_key_activity",
                "Add a key activity to the business model canvas",
                "activity",
                "The key activity to add",
            ),
            handler("activity", "Key Activities", |c| &mut c.key_activities),
        )
}

pub async fn run(config: &LiveturnConfig) -> Result<(), LiveturnError> {
    println!("Connecting to BMC Assistant...\n");
    let options = SessionOptions {
        modality: None,
        system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
    };
    let mut session = bootstrap::connect(config, options, registry(), Canvas::default())
        .await?
        .with_filter(ContentFilter::TEXT);
    println!("Connected! Tell me about your business idea.\n");

    let mut prompt = Prompt::stdin();
    while let Some(input) = prompt.next().await? {
        if is_command(&input, "quit") {
            println!("{}", session.context().render());
            println!("Goodbye!");
            break;
        }
        if is_command(&input, "show") {
            println!("{}", session.context().render());
            continue;
        }

        let exchange = session
            .run_exchange(input)
            .await
            .map_err(bootstrap::session_error)?;

        for (call, result) in exchange.tool_calls.iter().zip(&exchange.tool_results) {
            let outcome = result
                .payload
                .get("result")
                .and_then(|v| v.as_str())
                .or_else(|| result.error_message())
                .unwrap_or_default();
            println!("[{}] {outcome}", call.name);
        }
        if !exchange.text.is_empty() {
            println!("\nAssistant: {}", exchange.text);
        }
        println!();

        if bootstrap::report_terminal(&exchange.end) {
            break;
        }
    }

    session.close();
    Ok(())
}
