use reqwest::Client;
use select::document::Document;
use select::predicate::Text;
use std::time::{Duration, Instant};

/// Result of one URL retrieval attempt. Created once by `fetch` and never
/// mutated afterwards; failures are encoded here instead of being raised.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub url: String,
    pub status: Option<u16>,
    pub latency: Duration,
    pub body: String,
    pub snippet: String,
    pub succeeded: bool,
}

impl FetchOutcome {
    fn failed(url: String, latency: Duration) -> Self {
        Self {
            url,
            status: None,
            latency,
            body: String::new(),
            snippet: String::new(),
            succeeded: false,
        }
    }
}

pub fn build_client(timeout: Duration) -> crate::error::Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("scout/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Fetches a single URL and measures elapsed latency.
///
/// Never returns an error: any network or body-read failure becomes a
/// `FetchOutcome` with `succeeded == false`, no status, empty body and
/// snippet, and the latency measured up to the failure point.
pub async fn fetch(client: &Client, url: String, snippet_chars: usize) -> FetchOutcome {
    let start = Instant::now();

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            log::warn!("Request failed for {}: {}", url, e);
            return FetchOutcome::failed(url, start.elapsed());
        }
    };

    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            log::warn!("Body read failed for {}: {}", url, e);
            return FetchOutcome::failed(url, start.elapsed());
        }
    };
    let latency = start.elapsed();

    let snippet = text_snippet(&body, snippet_chars);

    FetchOutcome {
        url,
        status: Some(status),
        latency,
        body,
        snippet,
        succeeded: true,
    }
}

/// Strips markup from an HTML document and returns the leading text,
/// whitespace-collapsed and truncated to `budget` characters.
pub fn text_snippet(html: &str, budget: usize) -> String {
    let document = Document::from(html);
    let mut text = String::new();
    let mut taken = 0;

    for node in document.find(Text) {
        let Some(chunk) = node.as_text() else {
            continue;
        };
        for word in chunk.split_whitespace() {
            if !text.is_empty() {
                text.push(' ');
                taken += 1;
            }
            text.push_str(word);
            taken += word.chars().count();
            if taken >= budget {
                return text.chars().take(budget).collect();
            }
        }
    }

    text
}
