//! Prefix tree over characters for exact-prefix lookup

use std::collections::BTreeMap;

/// Trie node
///
/// A node is terminal iff an inserted word's character path ends here, in
/// which case it stores exactly that word.
#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    word: Option<String>,
}

/// Immutable-after-build prefix tree
#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
    len: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a word into the trie
    pub fn insert(&mut self, word: &str) {
        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node.children.entry(ch).or_default();
        }
        if node.word.is_none() {
            node.word = Some(word.to_string());
            self.len += 1;
        }
    }

    /// Whether `word` was inserted
    pub fn contains(&self, word: &str) -> bool {
        self.descend(word)
            .map(|node| node.word.is_some())
            .unwrap_or(false)
    }

    /// Number of distinct words stored
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Up to `limit` words starting with `prefix`, in depth-first order with
    /// children visited by ascending character.
    ///
    /// The prefix itself is included when it is a stored word.
    pub fn find_prefix(&self, prefix: &str, limit: usize) -> Vec<String> {
        self.find_completions(prefix, limit, false)
    }

    /// Like [`Trie::find_prefix`] but never returns the prefix itself, so the
    /// limit only counts proper completions.
    pub fn find_completions(&self, prefix: &str, limit: usize, exclude_exact: bool) -> Vec<String> {
        let mut results = Vec::new();
        if limit == 0 {
            return results;
        }
        if let Some(node) = self.descend(prefix) {
            Self::collect(node, prefix, exclude_exact, limit, &mut results);
        }
        results
    }

    fn descend(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for ch in prefix.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }

    fn collect(
        node: &TrieNode,
        prefix: &str,
        exclude_exact: bool,
        limit: usize,
        out: &mut Vec<String>,
    ) {
        if out.len() >= limit {
            return;
        }

        if let Some(word) = &node.word {
            if !(exclude_exact && word == prefix) {
                out.push(word.clone());
                if out.len() >= limit {
                    return;
                }
            }
        }

        for child in node.children.values() {
            Self::collect(child, prefix, exclude_exact, limit, out);
            if out.len() >= limit {
                return;
            }
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for Trie {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut trie = Trie::new();
        for word in iter {
            trie.insert(word.as_ref());
        }
        trie
    }
}
