//! Column reference resolution

/// How a column reference in a formula is matched to a field name
///
/// Each mode tries the stricter modes first, so an exact match always wins.
/// Within one pass the first field in row order wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NameMatching {
    /// Byte-for-byte equality
    Exact,
    /// Exact, then ASCII case-insensitive
    CaseInsensitive,
    /// Case-insensitive, then a whole-word suffix: `Density` finds
    /// `Cell Density`, and `Cell Density` finds `Density` (one leading
    /// qualifier word at most)
    #[default]
    WordSuffix,
}

impl NameMatching {
    /// Find the position of the name a reference resolves to
    pub fn resolve<'a, I>(&self, reference: &str, names: I) -> Option<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&str> = names.into_iter().collect();

        if let Some(pos) = names.iter().position(|name| *name == reference) {
            return Some(pos);
        }
        if *self == NameMatching::Exact {
            return None;
        }

        if let Some(pos) = names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(reference))
        {
            return Some(pos);
        }
        if *self == NameMatching::CaseInsensitive {
            return None;
        }

        names.iter().position(|name| {
            leading_words(name, reference).is_some()
                || leading_words(reference, name) == Some(MAX_QUALIFIER_WORDS)
        })
    }

    /// Check whether a field name satisfies a reference
    pub fn matches(&self, reference: &str, name: &str) -> bool {
        self.resolve(reference, [name]).is_some()
    }
}

/// Words a reference may carry in front of a field name it resolves to
const MAX_QUALIFIER_WORDS: usize = 1;

/// Number of whole words in front of `suffix` when it ends `text`
fn leading_words(text: &str, suffix: &str) -> Option<usize> {
    if suffix.is_empty() || text.len() <= suffix.len() {
        return None;
    }
    let head = text.strip_suffix(suffix)?;
    if !head.ends_with(char::is_whitespace) {
        return None;
    }
    Some(head.split_whitespace().count())
}
