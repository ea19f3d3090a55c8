use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected HTTP status {code} from {url}")]
    Status { code: u16, url: String },
}

#[cfg(test)]
mod tests {
    use super::FeedError;

    #[test]
    fn status_display_names_the_endpoint() {
        let error = FeedError::Status {
            code: 503,
            url: "http://feed.example/rss".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "unexpected HTTP status 503 from http://feed.example/rss"
        );
    }
}
