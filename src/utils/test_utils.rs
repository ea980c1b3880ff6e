use crate::core::app::App;
use crate::core::config::Settings;
use crate::utils::logging::TranscriptLog;
use std::time::Duration;

pub fn test_settings() -> Settings {
    Settings {
        endpoint: "http://127.0.0.1:9/api/chat".to_string(),
        idle_timeout: Some(Duration::from_secs(5)),
        greeting: "Hi! How can I help?".to_string(),
        services: vec![
            "Plumbing".to_string(),
            "Electrical".to_string(),
            "Cleaning".to_string(),
        ],
    }
}

pub fn create_test_app() -> App {
    App::new(&test_settings(), TranscriptLog::disabled())
}
