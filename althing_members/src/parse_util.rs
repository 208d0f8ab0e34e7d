//! Utilities for downloading term pages and tidying up what is scraped from them.

use std::io::Write;
use std::path::Path;
use anyhow::Context;
use itertools::Itertools;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use tempfile::NamedTempFile;

/// Download a page (with proper polite headers) to a temporary file in `temp_dir`.
/// `temp_dir` should be on the same filesystem as the final destination so the file can be persisted there.
pub async fn download_to_file(insecure_url:&str,client:&Client,user_agent:&str,temp_dir:&Path) -> anyhow::Result<NamedTempFile> {
    let url = insecure_url.replace("http://", "https://");
    log::info!("Downloading {}",url);
    std::fs::create_dir_all(temp_dir)?;
    let mut file = NamedTempFile::new_in(temp_dir)?;
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent).context("User agent is not a valid header")?);
    headers.insert(ACCEPT, HeaderValue::from_static("text/html"));
    let response = client.get(&url)
        .headers(headers)
        .send()
        .await?
        .error_for_status()?;
    let content = response.bytes().await?;
    file.write_all(&content)?;
    file.flush()?;
    Ok(file)
}

/// Resolve a possibly relative link against the page it came from.
pub fn relative_url(base_url:&str,url:&str) -> anyhow::Result<String> {
    let base = url::Url::parse(base_url)?;
    let res = base.join(url)?;
    Ok(res.to_string())
}

/// Replace each run of whitespace (including non-breaking spaces) by a single space, and trim.
pub fn collapse_whitespace(s:&str) -> String {
    s.split_whitespace().join(" ")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_url() {
        assert_eq!("https://en.wikipedia.org/wiki/J%C3%B3n_J%C3%B3nsson",relative_url("https://en.wikipedia.org/wiki/List_of_members","/wiki/J%C3%B3n_J%C3%B3nsson").unwrap());
        assert_eq!("https://en.wikipedia.org/wiki/Other",relative_url("https://en.wikipedia.org/wiki/List","https://en.wikipedia.org/wiki/Other").unwrap());
        assert!(relative_url("not a url","/wiki/X").is_err());
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!("Reykjavík North",collapse_whitespace("  Reykjavík\n   North "));
        assert_eq!("Reykjavík North",collapse_whitespace("Reykjavík\u{a0}North"));
        assert_eq!("",collapse_whitespace(" \t "));
    }
}
