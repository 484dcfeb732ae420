// commit message
pub const MAX_LINE_LENGTH: usize = 72;
pub const RECENT_COMMIT_LIMIT: usize = 5;

// ui
pub const MAX_FILES_TO_SHOW: usize = 10;

// diff
pub const HUNK_LIMIT_CHARS: usize = 4000;
pub const DIFF_SIZE_WARNING_BYTES: usize = 50 * 1024;
pub const DIFF_SIZE_MAXIMUM_BYTES: usize = 100 * 1024;

// remote model
pub const API_TIMEOUT_SECS: u64 = 30;
pub const API_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";
pub const CREDENTIAL_ENV: &str = "GEMINI_API_KEY";

// push
pub const PUSH_REMOTE: &str = "origin";
