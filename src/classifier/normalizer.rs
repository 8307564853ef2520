use std::collections::HashSet;

/// ASCII and full-width comma / semicolon.
pub const TAG_DELIMITERS: [char; 4] = [',', '，', ';', '；'];

/// Merges user-entered tag strings with machine-inferred tags.
#[derive(Debug, Clone)]
pub struct TagNormalizer {
    delimiters: Vec<char>,
}

impl Default for TagNormalizer {
    fn default() -> Self {
        Self::new(&TAG_DELIMITERS)
    }
}

impl TagNormalizer {
    pub fn new(delimiters: &[char]) -> Self {
        Self {
            delimiters: delimiters.to_vec(),
        }
    }

    /// Split a delimited tag string into trimmed, non-empty pieces.
    pub fn split(&self, tags: &str) -> Vec<String> {
        tags.split(|c: char| self.delimiters.contains(&c))
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// User tags first in entry order, then machine tags; exact duplicates
    /// (after trimming) keep their first occurrence. A missing user string
    /// contributes nothing.
    pub fn normalize<'a, I>(&self, user_tags: Option<&str>, machine_tags: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let user = user_tags.map(|tags| self.split(tags)).unwrap_or_default();
        let machine = machine_tags
            .into_iter()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string);

        let mut seen = HashSet::new();
        user.into_iter()
            .chain(machine)
            .filter(|tag| seen.insert(tag.clone()))
            .collect()
    }
}
