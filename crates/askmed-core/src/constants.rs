/// Centralized constants for askmed.
/// Endpoints, limits, and fixed user-facing strings live here.

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8086";
    pub const ASK_PATH: &str = "/api/ask";
    pub const HEALTH_PATH: &str = "/api/health";
    pub const HISTORY_PATH: &str = "/api/history";
}

// ─── Limits ───────────────────────────────────────────────────────────────────

pub mod limits {
    pub const HISTORY_MAX_ENTRIES: usize = 50;
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
}

// ─── Answer Processing ────────────────────────────────────────────────────────

pub mod answer {
    /// Phrases that introduce the trailing follow-up block. Matched ASCII-case-insensitively.
    pub const FOLLOW_UP_MARKERS: &[&str] = &[
        "related:",
        "follow-up questions:",
        "follow up questions:",
    ];

    pub const BULLET_MARKERS: &[char] = &['*', '-', '•'];
}

// ─── Messages ─────────────────────────────────────────────────────────────────

pub mod messages {
    pub const FALLBACK_FAILURE: &str =
        "Sorry, there was an error processing your question. Please try again.";
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "askmed";
    pub const CONFIG_FILE: &str = "config.toml";
}
