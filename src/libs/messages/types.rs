/// Every user-facing message of the application.
///
/// Text lives in the `Display` implementation in `display.rs`.
#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModuleTracker,
    ConfigTrackerMissing,
    ConfigValueMissing(String), // environment variable name

    // === PROMPTS ===
    PromptTrackerToken,
    PromptTrackerOrgId,
    PromptTrackerHost,
    PromptTrackerLogin,

    // === WORKLOG MESSAGES ===
    AuthorMissing,
    InvalidWindow(String), // reason
    WorklogHeader(String, String, String), // title, first day, last day
    WorklogFetchWindow(String, String),    // from, to
    WorklogsNotFound,
    DurationSkipped(String, String, String), // issue key, duration text, reason
    WorklogFetchFailed(String),
    WorklogBuildFailed(String),
}
