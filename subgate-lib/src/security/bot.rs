use crate::config::BotConfig;

/// Case-insensitive user-agent signature matcher
///
/// Informational only: a match exempts the request from rate limiting and is
/// surfaced in debug headers, it never blocks on its own.
#[derive(Debug, Clone)]
pub struct BotDetector {
    signatures: Vec<String>,
}

impl BotDetector {
    pub fn new(config: &BotConfig) -> Self {
        let signatures = config
            .signatures
            .iter()
            .flat_map(|entry| entry.split('|'))
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { signatures }
    }

    /// Absent or empty user agents are never bots
    pub fn is_bot(&self, user_agent: Option<&str>) -> bool {
        let Some(ua) = user_agent.map(str::trim).filter(|ua| !ua.is_empty()) else {
            return false;
        };
        let ua = ua.to_ascii_lowercase();
        self.signatures.iter().any(|sig| ua.contains(sig.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_signatures() {
        let detector = BotDetector::new(&BotConfig::default());
        assert!(detector.is_bot(Some(
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)"
        )));
        assert!(detector.is_bot(Some("Baiduspider")));
        assert!(detector.is_bot(Some("facebookexternalhit/1.1")));
        assert!(!detector.is_bot(Some(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15 Safari/605.1.15"
        )));
    }

    #[test]
    fn test_missing_user_agent() {
        let detector = BotDetector::new(&BotConfig::default());
        assert!(!detector.is_bot(None));
        assert!(!detector.is_bot(Some("   ")));
    }

    #[test]
    fn test_pipe_separated_pattern() {
        let detector = BotDetector::new(&BotConfig { signatures: vec!["CURL|wget||".to_string()] });
        assert!(detector.is_bot(Some("curl/8.4.0")));
        assert!(detector.is_bot(Some("Wget/1.21")));
        assert!(!detector.is_bot(Some("Mozilla/5.0")));
    }
}
