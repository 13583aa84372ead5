//! Single-turn tool calling: the model switches the lights.

use liveturn_common::LiveturnError;
use liveturn_config::LiveturnConfig;
use liveturn_core::{result_payload, ContentFilter, ToolDefinition, ToolRegistry};

use crate::bootstrap::{self, SessionOptions};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Lights {
    pub on: bool,
    /// Number of times a tool touched the switch.
    pub switches: u32,
}

pub fn registry() -> ToolRegistry<Lights> {
    ToolRegistry::new()
        .with_tool(
            ToolDefinition::new("turn_on_the_lights", ""),
            |lights: &mut Lights, _| {
                lights.on = true;
                lights.switches += 1;
                Ok(result_payload("ok"))
            },
        )
        .with_tool(
            ToolDefinition::new("turn_off_the_lights", ""),
            |lights: &mut Lights, _| {
                lights.on = false;
                lights.switches += 1;
                Ok(result_payload("ok"))
            },
        )
}

pub async fn run(config: &LiveturnConfig, prompt: &str) -> Result<(), LiveturnError> {
    let mut session =
        bootstrap::connect(config, SessionOptions::default(), registry(), Lights::default())
            .await?
            .with_filter(ContentFilter::TEXT);

    println!("> {prompt}");
    let exchange = session
        .run_exchange(prompt)
        .await
        .map_err(bootstrap::session_error)?;

    for (call, result) in exchange.tool_calls.iter().zip(&exchange.tool_results) {
        println!(
            "[{}] {}",
            call.name,
            serde_json::Value::Object(result.payload.clone())
        );
    }
    if !exchange.text.is_empty() {
        println!("\n{}", exchange.text);
    }
    bootstrap::report_terminal(&exchange.end);

    let lights = session.context();
    println!(
        "\nLights are {} ({} switch{})",
        if lights.on { "on" } else { "off" },
        lights.switches,
        if lights.switches == 1 { "" } else { "es" }
    );

    session.close();
    Ok(())
}
