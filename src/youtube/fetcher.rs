//! HTTP transcript fetcher.
//!
//! Talks to YouTube the way the web player does: fetch the watch page for
//! the InnerTube API key, ask the player endpoint for the caption track
//! list, then download the selected track as json3. Every failure maps to
//! the closed [`FetchError`] taxonomy.

use super::id::VideoId;
use super::transcript::{CaptionLine, FetchError, TranscriptFetcher};
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const INNERTUBE_API_URL: &str = "https://www.youtube.com/youtubei/v1/player?key=";

/// Pause between consecutive requests. YouTube rate-limits aggressively and
/// a transcript fetch needs three round trips.
const REQUEST_DELAY_MS: u64 = 300;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default [`TranscriptFetcher`] over plain HTTP.
pub struct HttpCaptionFetcher {
    client: reqwest::Client,
    delay: Duration,
}

impl HttpCaptionFetcher {
    pub fn new() -> Self {
        Self::with_delay(Duration::from_millis(REQUEST_DELAY_MS))
    }

    pub fn with_delay(delay: Duration) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US"),
        );

        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .default_headers(headers)
                .build()
                .expect("Failed to create HTTP client"),
            delay,
        }
    }

    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }

    async fn fetch_watch_page(&self, video_id: &VideoId) -> Result<String, FetchError> {
        let url = format!("{}{}", WATCH_URL, video_id);
        let response = self.client.get(&url).send().await.map_err(http_error)?;
        check_status(&response)?;
        response.text().await.map_err(http_error)
    }

    async fn fetch_player_data(
        &self,
        video_id: &VideoId,
        api_key: &str,
    ) -> Result<Value, FetchError> {
        let url = format!("{}{}", INNERTUBE_API_URL, api_key);
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id.as_str()
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(http_error)?;
        check_status(&response)?;
        response
            .json()
            .await
            .map_err(|e| FetchError::Other(format!("JsonParseError: {}", e)))
    }

    async fn fetch_track(&self, base_url: &str) -> Result<Value, FetchError> {
        let url = format!("{}&fmt=json3", base_url);
        let response = self.client.get(&url).send().await.map_err(http_error)?;
        check_status(&response)?;
        response
            .json()
            .await
            .map_err(|e| FetchError::Other(format!("JsonParseError: {}", e)))
    }
}

impl Default for HttpCaptionFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptFetcher for HttpCaptionFetcher {
    async fn fetch(
        &self,
        video_id: &VideoId,
        language: &str,
    ) -> Result<Vec<CaptionLine>, FetchError> {
        let html = self.fetch_watch_page(video_id).await?;
        let api_key = extract_innertube_api_key(&html)?;

        self.pause().await;
        let player = self.fetch_player_data(video_id, &api_key).await?;

        check_playability(&player)?;
        let base_url = select_track(&player, language)?;
        debug!("caption track for {} in '{}': {}", video_id, language, base_url);

        self.pause().await;
        let track = self.fetch_track(&base_url).await?;
        Ok(parse_json3(&track))
    }
}

fn http_error(e: reqwest::Error) -> FetchError {
    FetchError::Other(format!("HttpError: {}", e))
}

fn check_status(response: &reqwest::Response) -> Result<(), FetchError> {
    if response.status().as_u16() == 429 {
        return Err(FetchError::Other("IpBlocked".to_string()));
    }
    if !response.status().is_success() {
        return Err(FetchError::Other(format!("Http {}", response.status())));
    }
    Ok(())
}

fn extract_innertube_api_key(html: &str) -> Result<String, FetchError> {
    // A captcha page means the IP is being challenged, not that the key moved.
    if html.contains("g-recaptcha") {
        return Err(FetchError::Other("IpBlocked".to_string()));
    }

    let re = Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#)
        .expect("Invalid regex");
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| FetchError::Other("MissingInnertubeKey".to_string()))
}

/// Map the player response's `playabilityStatus` to the fetch taxonomy.
fn check_playability(player: &Value) -> Result<(), FetchError> {
    let Some(status_obj) = player.get("playabilityStatus") else {
        return Ok(());
    };
    let status = status_obj.get("status").and_then(|s| s.as_str()).unwrap_or("");
    if status == "OK" || status.is_empty() {
        return Ok(());
    }

    let reason = status_obj.get("reason").and_then(|r| r.as_str()).unwrap_or("");
    match status {
        // Private, removed or region-locked videos report ERROR;
        // login walls (age restriction, bot checks) are unavailable to us too.
        "ERROR" | "LOGIN_REQUIRED" | "UNPLAYABLE" => Err(FetchError::Unavailable),
        _ => Err(FetchError::Other(format!("Unplayable: {}", reason))),
    }
}

/// Pick the caption track for `language`, preferring manually created tracks
/// over auto-generated (ASR) ones. Returns the track's base URL.
fn select_track(player: &Value, language: &str) -> Result<String, FetchError> {
    let tracks = player
        .get("captions")
        .and_then(|c| c.get("playerCaptionsTracklistRenderer"))
        .and_then(|r| r.get("captionTracks"))
        .and_then(|t| t.as_array())
        .ok_or(FetchError::Disabled)?;

    if tracks.is_empty() {
        return Err(FetchError::Disabled);
    }

    let mut generated: Option<String> = None;
    for track in tracks {
        let code = track.get("languageCode").and_then(|c| c.as_str()).unwrap_or("");
        if code != language {
            continue;
        }
        let Some(base_url) = track.get("baseUrl").and_then(|u| u.as_str()) else {
            continue;
        };
        let base_url = base_url.replace("&fmt=srv3", "");

        let is_asr = track
            .get("kind")
            .and_then(|k| k.as_str())
            .map(|k| k == "asr")
            .unwrap_or(false);
        if is_asr {
            generated.get_or_insert(base_url);
        } else {
            return Ok(base_url);
        }
    }

    generated.ok_or(FetchError::NotFound)
}

/// Flatten a json3 caption payload into ordered caption lines.
fn parse_json3(track: &Value) -> Vec<CaptionLine> {
    let Some(events) = track.get("events").and_then(|e| e.as_array()) else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    for event in events {
        let Some(segs) = event.get("segs").and_then(|s| s.as_array()) else {
            continue;
        };
        let text: String = segs
            .iter()
            .filter_map(|seg| seg.get("utf8").and_then(|u| u.as_str()))
            .collect::<Vec<_>>()
            .join("");
        let text = text.replace('\n', " ").trim().to_string();
        if text.is_empty() {
            continue;
        }

        let start = event.get("tStartMs").and_then(|v| v.as_f64()).unwrap_or(0.0) / 1000.0;
        let duration = event.get("dDurationMs").and_then(|v| v.as_f64()).unwrap_or(0.0) / 1000.0;
        lines.push(CaptionLine {
            text,
            start,
            duration,
        });
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json3_events() {
        let track: Value = serde_json::from_str(
            r#"{
                "events": [
                    {"tStartMs": 0, "dDurationMs": 1500, "segs": [{"utf8": "never gonna "}, {"utf8": "give you up"}]},
                    {"tStartMs": 1500, "aAppend": 1},
                    {"tStartMs": 2000, "dDurationMs": 1000, "segs": [{"utf8": "\n"}]},
                    {"tStartMs": 3000, "dDurationMs": 1200, "segs": [{"utf8": "never gonna let you down"}]}
                ]
            }"#,
        )
        .unwrap();

        let lines = parse_json3(&track);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "never gonna give you up");
        assert_eq!(lines[0].start, 0.0);
        assert_eq!(lines[0].duration, 1.5);
        assert_eq!(lines[1].text, "never gonna let you down");
        assert_eq!(lines[1].start, 3.0);
    }

    #[test]
    fn empty_payload_yields_no_lines() {
        assert!(parse_json3(&serde_json::json!({})).is_empty());
        assert!(parse_json3(&serde_json::json!({ "events": [] })).is_empty());
    }

    #[test]
    fn finds_innertube_key() {
        let html = r#"<script>var cfg = {"INNERTUBE_API_KEY": "AIzaSyAO_x-abc_123"};</script>"#;
        assert_eq!(
            extract_innertube_api_key(html).unwrap(),
            "AIzaSyAO_x-abc_123"
        );
    }

    #[test]
    fn missing_key_is_reported() {
        let err = extract_innertube_api_key("<html></html>").unwrap_err();
        assert!(matches!(err, FetchError::Other(ref s) if s == "MissingInnertubeKey"));
    }

    #[test]
    fn captcha_page_reported_as_blocked() {
        let err = extract_innertube_api_key(r#"<div class="g-recaptcha"></div>"#).unwrap_err();
        assert!(matches!(err, FetchError::Other(ref s) if s == "IpBlocked"));
    }

    #[test]
    fn missing_captions_renderer_means_disabled() {
        let player = serde_json::json!({ "playabilityStatus": { "status": "OK" } });
        assert!(matches!(
            select_track(&player, "en").unwrap_err(),
            FetchError::Disabled
        ));
    }

    #[test]
    fn manual_track_preferred_over_generated() {
        let player = serde_json::json!({
            "captions": { "playerCaptionsTracklistRenderer": { "captionTracks": [
                {"languageCode": "en", "baseUrl": "https://yt/asr", "kind": "asr"},
                {"languageCode": "en", "baseUrl": "https://yt/manual"}
            ]}}
        });
        assert_eq!(select_track(&player, "en").unwrap(), "https://yt/manual");
    }

    #[test]
    fn generated_track_used_when_no_manual() {
        let player = serde_json::json!({
            "captions": { "playerCaptionsTracklistRenderer": { "captionTracks": [
                {"languageCode": "en", "baseUrl": "https://yt/asr", "kind": "asr"}
            ]}}
        });
        assert_eq!(select_track(&player, "en").unwrap(), "https://yt/asr");
    }

    #[test]
    fn missing_language_is_not_found() {
        let player = serde_json::json!({
            "captions": { "playerCaptionsTracklistRenderer": { "captionTracks": [
                {"languageCode": "fr", "baseUrl": "https://yt/fr"}
            ]}}
        });
        assert!(matches!(
            select_track(&player, "en").unwrap_err(),
            FetchError::NotFound
        ));
    }

    #[test]
    fn error_playability_maps_to_unavailable() {
        let player = serde_json::json!({
            "playabilityStatus": { "status": "ERROR", "reason": "Video unavailable" }
        });
        assert!(matches!(
            check_playability(&player).unwrap_err(),
            FetchError::Unavailable
        ));
    }

    #[test]
    fn ok_playability_passes() {
        let player = serde_json::json!({ "playabilityStatus": { "status": "OK" } });
        assert!(check_playability(&player).is_ok());
    }
}
