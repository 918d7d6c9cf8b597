//! Web-search tool output parsing.
//!
//! Tool output is arbitrary JSON produced by the backend. Parsing never fails:
//! anything that does not look like a web-search result degrades to "no
//! sources, no summary" and the renderer shows a neutral state.

use serde::Serialize;
use serde_json::Value;

/// A single search result shown as a source card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSearchSource {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub favicon: String,
    pub relevance_score: f64,
}

/// A citation entry attached to a search summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub text: String,
    pub source_index: usize,
    pub url: String,
}

/// Synthesized summary text with `[N]` citation markers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSummary {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// Normalized view of a web-search tool output
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedToolOutput {
    pub sources: Vec<WebSearchSource>,
    pub summary: Option<SearchSummary>,
}

/// Extract sources and an optional summary from a tool output.
pub fn parse_tool_output(output: Option<&Value>) -> ParsedToolOutput {
    let Some(output) = output else {
        return ParsedToolOutput::default();
    };

    match try_parse(output) {
        Some(parsed) => parsed,
        None => {
            tracing::debug!("Tool output is not a web search result");
            ParsedToolOutput::default()
        }
    }
}

fn try_parse(output: &Value) -> Option<ParsedToolOutput> {
    let results = output.get("results")?.as_array()?;

    let sources = results
        .iter()
        .map(coerce_source)
        .collect::<Option<Vec<_>>>()?;

    let summary = match (non_empty_str(output.get("summary")), output.get("citations")) {
        (Some(text), Some(Value::Array(citations))) => Some(SearchSummary {
            text: text.to_string(),
            citations: citations.iter().filter_map(coerce_citation).collect(),
        }),
        _ => None,
    };

    Some(ParsedToolOutput { sources, summary })
}

fn coerce_source(result: &Value) -> Option<WebSearchSource> {
    // A result that is not an object at all is a shape mismatch for the whole output
    let result = result.as_object()?;
    let text = |key: &str| {
        non_empty_str(result.get(key))
            .unwrap_or_default()
            .to_string()
    };

    Some(WebSearchSource {
        title: text("title"),
        url: text("url"),
        snippet: text("snippet"),
        favicon: text("favicon"),
        relevance_score: result
            .get("relevanceScore")
            .and_then(Value::as_f64)
            .filter(|score| score.is_finite())
            .unwrap_or(0.0),
    })
}

fn coerce_citation(citation: &Value) -> Option<Citation> {
    let citation = citation.as_object()?;
    Some(Citation {
        text: non_empty_str(citation.get("text"))
            .unwrap_or_default()
            .to_string(),
        source_index: citation
            .get("sourceIndex")
            .and_then(Value::as_u64)
            .and_then(|i| usize::try_from(i).ok())
            .unwrap_or(0),
        url: non_empty_str(citation.get("url"))
            .unwrap_or_default()
            .to_string(),
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
