//! Web search tool backed by the DuckDuckGo Instant Answer API.

use super::{Tool, ToolOutput};
use crate::config::SearchSettings;
use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Timeout for search requests.
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

#[derive(Debug, Deserialize)]
struct DdgResponse {
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// Related topics mix plain entries with nested category groups; the
/// groups deserialize with an empty text and are filtered out.
#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text", default)]
    text: String,
}

/// Web search via instant answers.
pub struct SearchTool {
    client: reqwest::Client,
    endpoint: String,
    max_results: usize,
}

impl SearchTool {
    pub fn new(settings: &SearchSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            max_results: settings.max_results,
        }
    }

    async fn fetch(&self, query: &str) -> Result<String> {
        let response: DdgResponse = self
            .client
            .get(self.endpoint.as_str())
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(format_results(query, &response, self.max_results))
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &'static str {
        "search_web"
    }

    fn description(&self) -> &'static str {
        "Search the web for information. \
        Use this when the user asks about something you don't know or that may have changed recently."
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, args: serde_json::Value) -> ToolOutput {
        let args: SearchArgs = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return ToolOutput::error(format!("Invalid search arguments: {}", e)),
        };

        match self.fetch(&args.query).await {
            Ok(results) => ToolOutput::success(results),
            Err(e) => ToolOutput::error(format!("Search for '{}' failed: {}", args.query, e)),
        }
    }
}

/// Format an instant answer response for the LLM.
fn format_results(query: &str, response: &DdgResponse, max_results: usize) -> String {
    let mut sections = Vec::new();

    if !response.abstract_text.is_empty() {
        let heading = if response.heading.is_empty() {
            query
        } else {
            &response.heading
        };
        let mut summary = format!("{}: {}", heading, response.abstract_text);
        if !response.abstract_url.is_empty() {
            summary.push_str(&format!(" (source: {})", response.abstract_url));
        }
        sections.push(summary);
    }

    let related: Vec<&str> = response
        .related_topics
        .iter()
        .map(|t| t.text.as_str())
        .filter(|t| !t.is_empty())
        .take(max_results)
        .collect();

    if !related.is_empty() {
        sections.push(format!("Related: {}", related.join("; ")));
    }

    if sections.is_empty() {
        format!("No results found for '{}'.", query)
    } else {
        sections.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(value: serde_json::Value) -> DdgResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_format_abstract_with_source() {
        let r = response(serde_json::json!({
            "Heading": "Rust",
            "AbstractText": "A systems programming language.",
            "AbstractURL": "https://en.wikipedia.org/wiki/Rust",
            "RelatedTopics": []
        }));
        let out = format_results("rust language", &r, 3);
        assert!(out.starts_with("Rust: A systems programming language."));
        assert!(out.contains("source: https://en.wikipedia.org/wiki/Rust"));
    }

    #[test]
    fn test_format_related_topics_capped_and_filtered() {
        let r = response(serde_json::json!({
            "RelatedTopics": [
                { "Text": "one" },
                { "Name": "a nested group with no text" },
                { "Text": "two" },
                { "Text": "three" },
                { "Text": "four" }
            ]
        }));
        let out = format_results("q", &r, 2);
        assert_eq!(out, "Related: one; two");
    }

    #[test]
    fn test_format_empty_response() {
        let r = response(serde_json::json!({}));
        assert_eq!(format_results("obscure", &r, 3), "No results found for 'obscure'.");
    }

    #[tokio::test]
    async fn test_missing_query_argument_is_error_output() {
        let tool = SearchTool::new(&SearchSettings::default());
        let output = tool.call(serde_json::json!({ "q": "wrong key" })).await;
        assert!(output.is_error());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_error_output() {
        let tool = SearchTool::new(&SearchSettings {
            endpoint: "http://127.0.0.1:1".to_string(),
            max_results: 3,
        });
        let output = tool.call(serde_json::json!({ "query": "anything" })).await;
        assert!(output.is_error());
        assert!(output.text().contains("Search for 'anything' failed"));
    }
}
