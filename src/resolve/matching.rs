//! Repository URL extraction and fuzzy name matching

use regex::Regex;
use similar::TextDiff;
use std::sync::LazyLock;

/// Minimum similarity for a name to count as a match
pub const MATCH_THRESHOLD: f64 = 0.6;

static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://(?:www\.)?github\.com/(?P<owner>[A-Za-z0-9][A-Za-z0-9-]*)/(?P<repo>[A-Za-z0-9_.-]+)",
    )
    .expect("github url pattern is valid")
});

static PYTHON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)python").expect("python pattern is valid"));

/// Every `(owner, repo)` referenced by a github.com URL in `text`, in order
pub fn repository_urls(text: &str) -> impl Iterator<Item = (String, String)> + '_ {
    GITHUB_URL.captures_iter(text).filter_map(|caps| {
        let owner = caps.name("owner")?.as_str();
        let repo = caps.name("repo")?.as_str();
        let repo = repo.trim_end_matches('.');
        let repo = repo.strip_suffix(".git").unwrap_or(repo);

        (!repo.is_empty()).then(|| (owner.to_string(), repo.to_string()))
    })
}

/// Strip "python" (any case) and lower-case
pub fn normalize(name: &str) -> String {
    PYTHON.replace_all(name, "").to_lowercase()
}

/// LCS-based similarity `2M / (|a| + |b|)` of the normalized names
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a = normalize(a);
    let b = normalize(b);
    f64::from(TextDiff::from_chars(a.as_str(), b.as_str()).ratio())
}

/// Whether any author token is similar enough to `name`
pub fn author_matches(authors: &[&str], name: &str) -> bool {
    authors
        .iter()
        .any(|author| ratio(author, name) >= MATCH_THRESHOLD)
}

/// Email without its last dot-segment, lower-cased
pub fn email_stem(email: &str) -> String {
    let email = email.trim();
    email
        .rsplit_once('.')
        .map_or(email, |(stem, _)| stem)
        .to_lowercase()
}
