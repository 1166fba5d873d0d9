//! Feed downloads

use gloo_net::http::Request;
use wfb_core::parser::{normalize_json, NormalizeOptions};
use wfb_core::revision::{commits_url, data_url, parse_revisions, Revision};
use wfb_core::BenchmarkData;

const DATA_HOST: &str = "https://raw.githubusercontent.com/the-benchmarker/web-frameworks";
const HISTORY_HOST: &str = "https://api.github.com/repos/the-benchmarker/web-frameworks";

async fn get_text(url: &str) -> Result<String, String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("Failed to fetch data: {}", e))?;

    if !response.ok() {
        return Err(format!(
            "HTTP error: {} {}",
            response.status(),
            response.status_text()
        ));
    }

    response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))
}

pub async fn load_revision(sha: &str) -> Result<BenchmarkData, String> {
    let text = get_text(&data_url(DATA_HOST, sha)).await?;
    normalize_json(&text, &NormalizeOptions::default())
        .map_err(|e| format!("Failed to parse results: {}", e))
}

pub async fn load_revisions() -> Result<Vec<Revision>, String> {
    let text = get_text(&commits_url(HISTORY_HOST)).await?;
    parse_revisions(&text).map_err(|e| format!("Failed to parse revisions: {}", e))
}
