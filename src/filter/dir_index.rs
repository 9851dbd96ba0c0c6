//! Compiled directory index
//!
//! Blacklisted directories are kept as a flat set of absolute paths: reaching
//! one prunes its subtree, so no ancestor bookkeeping is needed. Whitelisted
//! directories are expanded into a trie keyed by path component relative to
//! the walk root, which tells apart the listed directories themselves from
//! the directories that merely lead to them.

use crate::core::types::ListRule;
use std::collections::{HashMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Result of looking a relative path up in the whitelist trie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistMatch {
    /// Some prefix of the path is not on any whitelist chain
    Unknown,
    /// A prefix of the path (or the path itself) is a listed directory
    Listed,
    /// Every component is on a chain, but no listed directory was reached
    Ancestor,
}

#[derive(Debug, Default, Clone)]
struct TrieNode {
    terminal: bool,
    children: HashMap<OsString, TrieNode>,
}

/// Prefix tree of whitelisted directories, one level per path component
#[derive(Debug, Default, Clone)]
pub struct DirTrie {
    root: TrieNode,
    len: usize,
}

impl DirTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a listed directory given by its components below the root.
    ///
    /// A node marked terminal stays terminal whatever is inserted later, so
    /// overlapping entries give the same trie in any order.
    pub fn insert<'a, I>(&mut self, components: I)
    where
        I: IntoIterator<Item = &'a OsStr>,
    {
        let mut node = &mut self.root;
        for name in components {
            node = node.children.entry(name.to_os_string()).or_default();
        }
        if !node.terminal {
            node.terminal = true;
            self.len += 1;
        }
    }

    /// Walk `relative` component by component, stopping at the first unknown
    /// prefix or the first listed one.
    pub fn lookup(&self, relative: &Path) -> WhitelistMatch {
        let mut node = &self.root;
        let mut components = relative_components(relative).peekable();

        if components.peek().is_none() {
            return if node.terminal {
                WhitelistMatch::Listed
            } else {
                WhitelistMatch::Ancestor
            };
        }

        for name in components {
            match node.children.get(name) {
                None => return WhitelistMatch::Unknown,
                Some(child) if child.terminal => return WhitelistMatch::Listed,
                Some(child) => node = child,
            }
        }

        WhitelistMatch::Ancestor
    }

    /// Whether exactly this relative path was listed
    pub fn is_listed(&self, relative: &Path) -> bool {
        let mut node = &self.root;
        for name in relative_components(relative) {
            match node.children.get(name) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.terminal
    }

    /// Number of distinct listed directories
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Compiled directory rule
#[derive(Debug, Clone)]
pub enum DirIndex {
    Blacklist(HashSet<PathBuf>),
    Whitelist(DirTrie),
}

impl DirIndex {
    /// Build the index for `entries`, interpreted relative to `root`
    pub fn build<S: AsRef<str>>(root: &Path, rule: ListRule, entries: &[S]) -> Self {
        match rule {
            ListRule::Blacklist => {
                let set = entries
                    .iter()
                    .filter_map(|entry| clean_entry(entry.as_ref()))
                    .map(|rel| root.join(rel))
                    .collect();
                DirIndex::Blacklist(set)
            }
            ListRule::Whitelist => {
                let mut trie = DirTrie::new();
                for rel in entries.iter().filter_map(|e| clean_entry(e.as_ref())) {
                    trie.insert(relative_components(&rel));
                }
                DirIndex::Whitelist(trie)
            }
        }
    }

    pub fn rule(&self) -> ListRule {
        match self {
            DirIndex::Blacklist(_) => ListRule::Blacklist,
            DirIndex::Whitelist(_) => ListRule::Whitelist,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DirIndex::Blacklist(set) => set.len(),
            DirIndex::Whitelist(trie) => trie.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalize a raw directory entry into a path relative to the root.
///
/// Leading separators are dropped so `/src` and `src` name the same
/// directory. Entries climbing out of the root cannot match anything and
/// are discarded.
fn clean_entry(raw: &str) -> Option<PathBuf> {
    let cleaned = path_clean::clean(raw.trim());
    if cleaned
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        warn!(entry = raw, "Ignoring directory entry outside the walk root");
        return None;
    }
    Some(cleaned.components().filter(|c| matches!(c, Component::Normal(_))).collect())
}

fn relative_components(path: &Path) -> impl Iterator<Item = &OsStr> {
    path.components().filter_map(|c| match c {
        Component::Normal(name) => Some(name),
        _ => None,
    })
}
