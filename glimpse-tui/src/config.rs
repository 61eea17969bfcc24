/// Server URL used when neither the CLI flag nor the environment
/// provides one.
pub const DEFAULT_SERVER_URL: &str = "https://glimpse-feed.fly.dev/api";

/// Determine the server URL: CLI flag > GLIMPSE_SERVER_URL > default.
pub fn determine_server_url(cli_override: Option<String>) -> String {
    if let Some(url) = cli_override {
        return normalize_url(url);
    }
    match std::env::var("GLIMPSE_SERVER_URL") {
        Ok(url) if !url.trim().is_empty() => normalize_url(url),
        _ => DEFAULT_SERVER_URL.to_string(),
    }
}

fn normalize_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
