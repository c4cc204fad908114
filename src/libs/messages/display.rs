//! Display implementation for application messages.
//!
//! All user-facing text is defined here so that commands never embed
//! literal strings and wording stays consistent between console output and
//! log records.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigModuleTracker => "Tracker settings".to_string(),
            Message::ConfigTrackerMissing => "Tracker is not configured. Run 'tracklog init' or set the environment variables".to_string(),
            Message::ConfigValueMissing(key) => format!("{} is required", key),

            // === PROMPTS ===
            Message::PromptTrackerToken => "Enter your IAM token".to_string(),
            Message::PromptTrackerOrgId => "Enter your organization ID".to_string(),
            Message::PromptTrackerHost => "Enter the tracker web host (used for issue links)".to_string(),
            Message::PromptTrackerLogin => "Enter your tracker login".to_string(),

            // === WORKLOG MESSAGES ===
            Message::AuthorMissing => "No author given. Pass --author or configure a login".to_string(),
            Message::InvalidWindow(reason) => format!("Invalid time window: {}", reason),
            Message::WorklogHeader(title, first, last) => format!("Worklog: {} ({} - {})", title, first, last),
            Message::WorklogFetchWindow(from, to) => format!("Fetching worklogs created from {} to {}", from, to),
            Message::WorklogsNotFound => "No worklogs in this window".to_string(),
            Message::DurationSkipped(key, duration, reason) => {
                format!("{}: duration '{}' was not counted ({})", key, duration, reason)
            }
            Message::WorklogFetchFailed(error) => format!("Failed to fetch worklogs: {}", error),
            Message::WorklogBuildFailed(error) => format!("Failed to build the worklog table: {}", error),
        };
        write!(f, "{}", text)
    }
}
