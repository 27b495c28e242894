use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static HEADER_SANITIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z 0-9_-]").expect("valid header sanitize regex"));

/// Output format for a rendered error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewFormat {
    /// Inline styled HTML block.
    #[default]
    Html,
    /// `{"status":"error","message":...}` document.
    Json,
    /// `<response>...</response>` document.
    Xml,
    /// Headers only: status 400 plus a sanitized `X-Error-Message`.
    Http,
}

/// Error returned when parsing an unknown format name.
#[derive(Debug, Error)]
#[error("unknown view format: '{0}'. Valid formats are: html, json, xml, http")]
pub struct ParseViewFormatError(String);

impl FromStr for ViewFormat {
    type Err = ParseViewFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(ViewFormat::Html),
            "json" => Ok(ViewFormat::Json),
            "xml" => Ok(ViewFormat::Xml),
            "http" => Ok(ViewFormat::Http),
            _ => Err(ParseViewFormatError(s.to_string())),
        }
    }
}

/// A rendered error, ready to be sent by whatever HTTP layer the host
/// application uses. The library never prints or exits on its own.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

pub(super) fn render(format: ViewFormat, message: &str, trace: Option<&str>) -> ErrorResponse {
    match format {
        ViewFormat::Html => html_response(message, trace),
        ViewFormat::Json => json_response(message),
        ViewFormat::Xml => xml_response(message),
        ViewFormat::Http => http_response(message),
    }
}

fn html_response(message: &str, trace: Option<&str>) -> ErrorResponse {
    let mut body = String::new();
    body.push_str(
        "<div style=\"position: absolute; top:0; right:0; width:100%; height:100%; background: #ffffff;\">\n",
    );
    body.push_str(
        "<table align=\"center\" style=\"width:65%; margin-top: 30px; background: #FFCC66;\" cellpadding=\"10\" cellspacing=\"1\" border=\"0\">\n",
    );
    body.push_str("<tr>\n<td style=\"background: #FFCC99;\">Unexpected error!</td>\n</tr>\n");
    let _ = write!(
        body,
        "<tr>\n<td style=\"padding-top: 15px; padding-bottom: 35px; background: #FFFF99;\">\n{}.<br><br>\nWe are notified and will solve the problem as soon as possible.<br>\n</td>\n</tr>\n",
        escape_markup(message)
    );
    if let Some(trace) = trace {
        let _ = write!(
            body,
            "<tr>\n<td style=\"padding-top: 15px; padding-bottom: 35px; background: #FFFF99; white-space: pre ;\">\n{}\n</td>\n</tr>\n",
            escape_markup(trace)
        );
    }
    body.push_str("</table>\n</div>");

    ErrorResponse {
        status: 200,
        content_type: Some("text/html; charset=utf-8".to_string()),
        headers: Vec::new(),
        body,
    }
}

fn json_response(message: &str) -> ErrorResponse {
    ErrorResponse {
        status: 200,
        content_type: Some("application/json; charset=utf-8".to_string()),
        headers: Vec::new(),
        body: json!({"status": "error", "message": message}).to_string(),
    }
}

fn xml_response(message: &str) -> ErrorResponse {
    let endline = "\r\n";
    let body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>{endline}<response>{endline}<status>error</status>{endline}<message>{}</message>{endline}</response>",
        escape_markup(message)
    );

    ErrorResponse {
        status: 200,
        content_type: Some("application/xml; charset=utf-8".to_string()),
        headers: Vec::new(),
        body,
    }
}

fn http_response(message: &str) -> ErrorResponse {
    ErrorResponse {
        status: 400,
        content_type: None,
        headers: vec![(
            "X-Error-Message".to_string(),
            sanitize_header_message(message),
        )],
        body: String::new(),
    }
}

/// Headers take no markup or control characters; keep only a conservative
/// character set.
fn sanitize_header_message(message: &str) -> String {
    HEADER_SANITIZE_RE.replace_all(message, "").into_owned()
}

fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
