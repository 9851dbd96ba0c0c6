//! Compilation of raw filter lists into lookup structures
//!
//! Runs once per walk, before traversal starts. The compiled filters are
//! immutable afterwards and shared read-only by the producer.

use crate::config::ListConfig;
use crate::core::error::{Result, WalkError};
use crate::core::types::ListRule;
use crate::filter::dir_index::DirIndex;
use glob::Pattern;
use std::collections::HashSet;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tracing::debug;

/// Extension rule: exact match on the extension including its leading dot
#[derive(Debug, Clone)]
pub struct ExtensionIndex {
    pub rule: ListRule,
    extensions: HashSet<String>,
}

impl ExtensionIndex {
    pub fn new<S: AsRef<str>>(rule: ListRule, entries: &[S]) -> Self {
        Self {
            rule,
            extensions: entries.iter().map(|e| e.as_ref().to_string()).collect(),
        }
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

/// Ordered glob patterns; a path matches the list if any pattern accepts it
#[derive(Debug, Clone)]
pub struct GlobList {
    pub rule: ListRule,
    patterns: Vec<Pattern>,
}

impl GlobList {
    /// Compile every pattern, failing on the first malformed one
    pub fn compile<S: AsRef<str>>(rule: ListRule, raw: &[S]) -> Result<Self> {
        let patterns = raw
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(&platform_glob(p)).map_err(|e| WalkError::invalid_glob(p, e))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rule, patterns })
    }

    pub fn matches(&self, subject: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(subject))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// The three compiled rules plus the absolute root they are anchored to
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    pub(crate) root: PathBuf,
    pub(crate) dirs: DirIndex,
    pub(crate) extensions: ExtensionIndex,
    pub(crate) globs: GlobList,
}

impl CompiledFilters {
    /// Compile the raw lists against an already resolved absolute root
    pub fn compile(
        root: &Path,
        globs: &ListConfig,
        extensions: &ListConfig,
        directories: &ListConfig,
    ) -> Result<Self> {
        let globs = GlobList::compile(globs.rule, &globs.entries)?;
        let extensions = ExtensionIndex::new(extensions.rule, &extensions.entries);
        let dirs = DirIndex::build(root, directories.rule, &directories.entries);

        debug!(
            root = %root.display(),
            dirs = dirs.len(),
            dir_rule = %dirs.rule(),
            extensions = extensions.len(),
            ext_rule = %extensions.rule,
            globs = globs.len(),
            glob_rule = %globs.rule,
            "Compiled walk filters"
        );

        Ok(Self {
            root: root.to_path_buf(),
            dirs,
            extensions,
            globs,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir_rule(&self) -> ListRule {
        self.dirs.rule()
    }
}

/// Adapt a pattern written with `/` to the platform separator.
///
/// `glob` treats `\` as a literal character, so on backslash platforms the
/// rewritten separator matches path separators verbatim.
fn platform_glob(raw: &str) -> String {
    if MAIN_SEPARATOR == '\\' {
        raw.replace('/', "\\")
    } else {
        raw.to_string()
    }
}
