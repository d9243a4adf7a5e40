// Failure diagnostics - maps yt-dlp error output to failure categories
//
// Instagram and YouTube report the same kinds of problems with different
// wording; this module folds them into the few categories the bot reports.


/// Reasons a fetch can fail, as far as the user is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// URL is malformed or not a post/video page
    InvalidLink,

    /// Private, removed, login-gated, age-gated or geo-blocked content
    PrivateOrRestricted,

    /// Post exists but has no video (image or text only)
    NotVideo,

    /// Exceeds the configured size limit
    TooLarge,

    /// Timeouts, refused connections, rate limits
    Network,

    /// Generic/unknown failure
    Unknown,
}

impl FailureReason {
    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidLink => "Invalid or unsupported link",
            Self::PrivateOrRestricted => "Private or restricted content",
            Self::NotVideo => "Post contains no video",
            Self::TooLarge => "File exceeds size limit",
            Self::Network => "Network problem",
            Self::Unknown => "Unknown failure",
        }
    }
}

/// Analyze error output and return the failure reason
pub fn diagnose_error(error: &str) -> Option<FailureReason> {
    let lower = error.to_lowercase();

    // Check patterns in order of specificity

    if lower.contains("larger than max-filesize") || lower.contains("file is larger than") {
        return Some(FailureReason::TooLarge);
    }

    if lower.contains("no video in this post")
        || lower.contains("no video formats found")
        || lower.contains("this post does not contain a video")
        || lower.contains("only images are available")
    {
        return Some(FailureReason::NotVideo);
    }

    if lower.contains("private video")
        || lower.contains("video is private")
        || lower.contains("this account is private")
        || lower.contains("login required")
        || lower.contains("log in")
        || lower.contains("sign in to confirm your age")
        || lower.contains("age-restricted")
        || lower.contains("members-only")
        || lower.contains("available to members")
        || lower.contains("not available in your country")
        || lower.contains("video unavailable")
        || lower.contains("has been removed")
        || lower.contains("no longer available")
        || lower.contains("empty media response")
        || lower.contains("restricted")
    {
        return Some(FailureReason::PrivateOrRestricted);
    }

    if lower.contains("unsupported url")
        || lower.contains("is not a valid url")
        || lower.contains("invalid url")
        || lower.contains("incomplete youtube id")
        || lower.contains("http error 404")
        || lower.contains("not found")
    {
        return Some(FailureReason::InvalidLink);
    }

    if lower.contains("timed out")
        || lower.contains("timeout")
        || lower.contains("connection refused")
        || lower.contains("network unreachable")
        || lower.contains("429")
        || lower.contains("too many requests")
    {
        return Some(FailureReason::Network);
    }

    if !error.trim().is_empty() {
        return Some(FailureReason::Unknown);
    }

    None
}

/// First line of the output that looks like an actual error, for logs
pub fn error_summary(error: &str) -> Option<String> {
    error
        .lines()
        .map(str::trim)
        .find(|line| line.to_lowercase().starts_with("error:"))
        .or_else(|| error.lines().map(str::trim).find(|line| !line.is_empty()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_detection() {
        let error = "ERROR: [youtube] abc123: Private video. Sign in if you've been granted access";
        assert_eq!(diagnose_error(error), Some(FailureReason::PrivateOrRestricted));
    }

    #[test]
    fn test_instagram_login_detection() {
        let error = "ERROR: [Instagram] XYZ: Requested content is not available, rate-limit reached or login required";
        assert_eq!(diagnose_error(error), Some(FailureReason::PrivateOrRestricted));
    }

    #[test]
    fn test_age_restricted_detection() {
        let error = "Sign in to confirm your age";
        assert_eq!(diagnose_error(error), Some(FailureReason::PrivateOrRestricted));
    }

    #[test]
    fn test_unsupported_url_detection() {
        let error = "ERROR: Unsupported URL: https://www.instagram.com/someone/";
        assert_eq!(diagnose_error(error), Some(FailureReason::InvalidLink));
    }

    #[test]
    fn test_no_video_detection() {
        let error = "ERROR: [Instagram] XYZ: There is no video in this post";
        assert_eq!(diagnose_error(error), Some(FailureReason::NotVideo));
    }

    #[test]
    fn test_max_filesize_detection() {
        let error = "[download] File is larger than max-filesize (60000000 bytes > 52428800 bytes). Aborting.";
        assert_eq!(diagnose_error(error), Some(FailureReason::TooLarge));
    }

    #[test]
    fn test_timeout_detection() {
        let error = "Timed out after 60s";
        assert_eq!(diagnose_error(error), Some(FailureReason::Network));
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(diagnose_error(""), None);
        assert_eq!(diagnose_error("   "), None);
    }

    #[test]
    fn test_error_summary_prefers_error_line() {
        let out = "WARNING: something\nERROR: Private video\n";
        assert_eq!(error_summary(out).as_deref(), Some("ERROR: Private video"));
        assert_eq!(error_summary("just text").as_deref(), Some("just text"));
        assert_eq!(error_summary(""), None);
    }
}
