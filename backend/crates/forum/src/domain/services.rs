//! Domain Services
//!
//! Pure helpers shared by the question and answer entities.

/// URL-friendly form of a title
///
/// Lowercases, drops everything except word characters, whitespace and `-`,
/// then turns each whitespace run into a single `-`.
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_space = false;
    for c in kept.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.push(c);
            in_space = false;
        }
    }
    slug
}

/// Lowercased words of a free-text search, split on anything that is not
/// alphanumeric
pub fn search_terms(search: &str) -> Vec<String> {
    search
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whole-word match on any term; a search with no words matches everything
pub fn matches_search(haystacks: &[&str], search: &str) -> bool {
    let terms = search_terms(search);
    if terms.is_empty() {
        return true;
    }

    haystacks
        .iter()
        .flat_map(|text| search_terms(text))
        .any(|word| terms.contains(&word))
}
