const MAX_BASE_LEN: usize = 40;
const SUFFIX_LEN: usize = 8;

/// Derives a URL-safe slug from `title`: the normalized title (at most 40
/// characters) followed by an 8 character random hex suffix.
///
/// Uniqueness is not guaranteed here; the store's unique index on `slug` is
/// the backstop.
pub fn generate(title: &str) -> String {
    let base = normalize(title);
    let suffix = random_suffix();
    if base.is_empty() { suffix } else { format!("{base}-{suffix}") }
}

fn normalize(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| if c == ' ' { '-' } else { c })
        .collect();

    let truncated: String = kept.trim_matches('-').chars().take(MAX_BASE_LEN).collect();
    truncated.trim_end_matches('-').to_string()
}

fn random_suffix() -> String {
    let mut hex = uuid::Uuid::new_v4().simple().to_string();
    hex.truncate(SUFFIX_LEN);
    hex
}
