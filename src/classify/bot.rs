//! Crawler detection by user-agent signature.

/// Case-insensitive substring matcher over user-agent strings.
#[derive(Debug, Clone)]
pub struct BotClassifier {
    signatures: Vec<String>,
}

impl BotClassifier {
    /// Builds a classifier from user-agent substrings. Empty entries are ignored.
    pub fn new<S: AsRef<str>>(signatures: &[S]) -> Self {
        let signatures = signatures
            .iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        BotClassifier { signatures }
    }

    /// Returns true when the user agent contains any known crawler signature.
    pub fn is_bot(&self, user_agent: &str) -> bool {
        if user_agent.is_empty() {
            return false;
        }
        let ua = user_agent.to_lowercase();
        self.signatures.iter().any(|sig| ua.contains(sig.as_str()))
    }
}

impl Default for BotClassifier {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BOT_AGENTS)
    }
}
