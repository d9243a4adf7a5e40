// Link classification - decides which platform downloader applies to a message

use std::fmt;

use regex::Regex;

lazy_static::lazy_static! {
    static ref INSTAGRAM_RE: Regex = Regex::new(r"(?i)instagram\.com|instagr\.am").unwrap();
    static ref YOUTUBE_RE: Regex = Regex::new(r"(?i)youtube\.com|youtu\.be").unwrap();
    static ref SCHEME_RE: Regex = Regex::new(r"(?i)^[a-z][a-z0-9+.-]*://").unwrap();
}

/// Supported video platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Instagram posts and reels
    Instagram,
    /// YouTube videos and shorts
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Instagram, Platform::YouTube];

    /// Prefix used for downloaded file names
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::YouTube => "youtube",
        }
    }

    /// Human-readable platform name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Instagram => "Instagram",
            Self::YouTube => "YouTube",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::Instagram => &INSTAGRAM_RE,
            Self::YouTube => &YOUTUBE_RE,
        }
    }

    /// Check whether text mentions one of this platform's domains
    pub fn matches(&self, text: &str) -> bool {
        self.pattern().is_match(text)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_prefix())
    }
}

/// A link found in a message together with the platform it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLink {
    pub url: String,
    pub platform: Platform,
}

/// Find the first supported link in free text.
///
/// Tokens are checked in order; within a token Instagram domains win over
/// YouTube ones. Returns `None` when no token mentions a known domain.
pub fn classify(text: &str) -> Option<ClassifiedLink> {
    for token in text.split_whitespace() {
        for platform in Platform::ALL {
            if platform.matches(token) {
                return Some(ClassifiedLink {
                    url: normalize_url(token),
                    platform,
                });
            }
        }
    }
    None
}

fn normalize_url(token: &str) -> String {
    let trimmed = token
        .trim_start_matches(['<', '(', '[', '"', '\''])
        .trim_end_matches(['>', ')', ']', '"', '\'', ',', '.', '!', '?', ';']);

    if SCHEME_RE.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instagram_domains() {
        for text in [
            "https://www.instagram.com/p/XYZ/",
            "https://instagr.am/p/XYZ/",
            "look INSTAGRAM.COM/reel/abc",
        ] {
            let link = classify(text).expect("instagram link");
            assert_eq!(link.platform, Platform::Instagram, "{}", text);
        }
    }

    #[test]
    fn test_youtube_domains() {
        for text in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://m.youtube.com/shorts/abc123",
            "https://youtu.be/abc123",
        ] {
            let link = classify(text).expect("youtube link");
            assert_eq!(link.platform, Platform::YouTube, "{}", text);
        }
    }

    #[test]
    fn test_url_extracted_from_sentence() {
        let link = classify("check this out https://youtu.be/abc123").unwrap();
        assert_eq!(link.url, "https://youtu.be/abc123");
        assert_eq!(link.platform, Platform::YouTube);
    }

    #[test]
    fn test_scheme_added_and_punctuation_trimmed() {
        let link = classify("see (instagram.com/p/XYZ/).").unwrap();
        assert_eq!(link.url, "https://instagram.com/p/XYZ/");
    }

    #[test]
    fn test_no_match() {
        assert_eq!(classify("hello there"), None);
        assert_eq!(classify("https://vimeo.com/12345"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_first_token_wins() {
        let link = classify("https://youtu.be/a and https://instagram.com/p/b/").unwrap();
        assert_eq!(link.platform, Platform::YouTube);
    }

    #[test]
    fn test_domain_sets_are_disjoint() {
        for domain in ["instagram.com", "instagr.am"] {
            assert!(Platform::Instagram.matches(domain));
            assert!(!Platform::YouTube.matches(domain));
        }
        for domain in ["youtube.com", "youtu.be"] {
            assert!(Platform::YouTube.matches(domain));
            assert!(!Platform::Instagram.matches(domain));
        }
    }
}
