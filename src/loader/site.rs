//! Web page loader.
//!
//! Fetches a page with a fixed number of retries, rotating a random browser
//! user agent per attempt, then reduces the HTML to plain text
//! deterministically (no headless browser, no JS).

use super::Document;
use crate::config::SiteSettings;
use crate::error::{MaxchatError, Result};
use rand::seq::SliceRandom;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, warn};

/// Rotated per attempt; some sites answer differently to unknown agents.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
];

/// Load a web page as a plain-text document.
pub async fn load_site(url: &str, settings: &SiteSettings) -> Result<Document> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(MaxchatError::InvalidInput(format!(
            "not an http(s) URL: {}",
            url
        )));
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;

    let mut last_reason = String::new();
    for attempt in 1..=settings.max_attempts {
        let agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);
        debug!("fetching {} (attempt {}/{})", url, attempt, settings.max_attempts);

        match client
            .get(url)
            .header(reqwest::header::USER_AGENT, agent)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                let html = response.text().await?;
                let text = html_to_text(&html);
                if !text.is_empty() {
                    return Ok(Document::new(text, url.to_string(), "web"));
                }
                last_reason = "page produced no text".to_string();
            }
            Ok(response) => {
                last_reason = format!("HTTP {}", response.status());
            }
            Err(e) => {
                last_reason = e.to_string();
            }
        }

        warn!("attempt {} for {} failed: {}", attempt, url, last_reason);
        if attempt < settings.max_attempts {
            tokio::time::sleep(Duration::from_millis(500 * attempt as u64)).await;
        }
    }

    Err(MaxchatError::SiteLoad {
        url: url.to_string(),
        reason: last_reason,
    })
}

/// Deterministic HTML to text: drop non-content elements, turn block
/// boundaries into newlines, strip the remaining tags, decode the common
/// entities and collapse whitespace.
fn html_to_text(html: &str) -> String {
    let drop_patterns = [
        r"(?is)<script[^>]*>.*?</script>",
        r"(?is)<style[^>]*>.*?</style>",
        r"(?is)<noscript[^>]*>.*?</noscript>",
        r"(?s)<!--.*?-->",
    ];

    let mut text = html.to_string();
    for pattern in drop_patterns {
        text = Regex::new(pattern)
            .expect("Invalid regex")
            .replace_all(&text, " ")
            .into_owned();
    }

    // Keep paragraph structure before tags are removed.
    let block_re = Regex::new(r"(?i)<(?:br\s*/?|/p|/div|/li|/h[1-6]|/tr|/section|/article)>")
        .expect("Invalid regex");
    text = block_re.replace_all(&text, "\n").into_owned();

    let tag_re = Regex::new(r"(?s)<[^>]+>").expect("Invalid regex");
    text = tag_re.replace_all(&text, " ").into_owned();

    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let mut lines = Vec::new();
    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            lines.push(collapsed);
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_collapses_whitespace() {
        let html = "<html><body><p>Hello   <b>world</b></p><p>Second   line</p></body></html>";
        assert_eq!(html_to_text(html), "Hello world\nSecond line");
    }

    #[test]
    fn drops_scripts_styles_and_comments() {
        let html = r#"<head><style>p { color: red }</style>
            <script>var x = "<p>not text</p>";</script></head>
            <!-- hidden --><body><p>visible</p></body>"#;
        assert_eq!(html_to_text(html), "visible");
    }

    #[test]
    fn decodes_common_entities() {
        let html = "<p>Fish &amp; chips &lt;daily&gt;&nbsp;&quot;special&quot;</p>";
        assert_eq!(html_to_text(html), "Fish & chips <daily> \"special\"");
    }

    #[test]
    fn block_tags_become_line_breaks() {
        let html = "<div>one</div><div>two</div><ul><li>three</li></ul>";
        assert_eq!(html_to_text(html), "one\ntwo\nthree");
    }

    #[tokio::test]
    async fn rejects_non_http_input() {
        let settings = SiteSettings::default();
        let err = load_site("ftp://example.com", &settings).await.unwrap_err();
        assert!(matches!(err, MaxchatError::InvalidInput(_)));
    }
}
