//! Interactive text chat.

use liveturn_common::LiveturnError;
use liveturn_config::LiveturnConfig;
use liveturn_core::{ContentFilter, ToolRegistry};

use super::prompt::{is_command, Prompt};
use crate::bootstrap::{self, SessionOptions};

const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant. Keep responses concise.";

pub async fn run(config: &LiveturnConfig) -> Result<(), LiveturnError> {
    println!("Connecting to Gemini Live API...");
    let options = SessionOptions::instruction_or(config, SYSTEM_INSTRUCTION);
    let mut session = bootstrap::connect(config, options, ToolRegistry::new(), ())
        .await?
        .with_filter(ContentFilter::TEXT);
    println!("Connected! Type your message (or 'quit' to exit):\n");

    let mut prompt = Prompt::stdin();
    while let Some(input) = prompt.next().await? {
        if is_command(&input, "quit") {
            println!("Goodbye!");
            break;
        }

        let exchange = session
            .run_exchange(input)
            .await
            .map_err(bootstrap::session_error)?;

        println!("\nGemini:\n{}\n", exchange.text);
        if bootstrap::report_terminal(&exchange.end) {
            break;
        }
    }

    session.close();
    Ok(())
}
