//! The exposed query tool.
//!
//! The host agent-protocol runtime registers one callable tool and routes
//! its invocations here. This module owns the tool's identity (name,
//! description, input schema) and input validation; the transport that
//! carries the call is the host's concern.

use serde_json::{json, Value};

use crate::aggregator::Aggregator;

pub const TOOL_NAME: &str = "get-prediction-markets";
pub const TOOL_DESCRIPTION: &str = "Get prediction market prices";

/// Upper bound on keyword length, matching the registered schema.
pub const MAX_KEYWORD_LEN: usize = 50;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("keyword exceeds {MAX_KEYWORD_LEN} characters")]
    KeywordTooLong,
}

/// JSON schema for the tool's single input parameter, in the shape tool
/// registries expect.
pub fn input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "keyword": {
                "type": "string",
                "maxLength": MAX_KEYWORD_LEN,
                "description": "Keyword for the market you're looking for (e.g. 'trump')"
            }
        },
        "required": ["keyword"]
    })
}

/// Validate a keyword against the registered schema.
pub fn validate_keyword(keyword: &str) -> Result<(), ToolError> {
    if keyword.chars().count() > MAX_KEYWORD_LEN {
        return Err(ToolError::KeywordTooLong);
    }
    Ok(())
}

/// Handle one tool invocation: validate the keyword, aggregate across all
/// sources, return the rendered report as the tool's text content.
pub async fn handle(aggregator: &Aggregator, keyword: &str) -> Result<String, ToolError> {
    validate_keyword(keyword)?;
    Ok(aggregator.aggregate(keyword).await)
}
