//! Directory and file admission
//!
//! Both checks are pure functions of the path and the compiled filters: they
//! never touch the filesystem, so the producer can call them without locking.

use crate::core::types::{DirVerdict, FileVerdict, ListRule};
use crate::filter::compiler::CompiledFilters;
use crate::filter::dir_index::{DirIndex, WhitelistMatch};
use std::path::{Path, MAIN_SEPARATOR};

impl CompiledFilters {
    /// Decide whether traversal descends into `path` and whether the
    /// directory itself is in scope. The root always admits.
    pub fn check_dir(&self, path: &Path) -> DirVerdict {
        if path == self.root {
            return DirVerdict::AdmitAndContinue;
        }

        match &self.dirs {
            DirIndex::Blacklist(set) => {
                if set.contains(path) {
                    DirVerdict::Prune
                } else {
                    DirVerdict::AdmitAndContinue
                }
            }
            DirIndex::Whitelist(_) => match self.whitelist_match(path) {
                WhitelistMatch::Unknown => DirVerdict::Prune,
                WhitelistMatch::Listed => DirVerdict::AdmitAndStopChecking,
                WhitelistMatch::Ancestor => DirVerdict::PassThrough,
            },
        }
    }

    /// Decide whether a file is dispatched: directory ancestry first, then
    /// the extension rule, then the glob rule.
    pub fn check_file(&self, path: &Path) -> FileVerdict {
        if self.dirs.rule() == ListRule::Whitelist {
            let parent = path.parent().unwrap_or(&self.root);
            if self.whitelist_match(parent) != WhitelistMatch::Listed {
                return FileVerdict::Exclude;
            }
        }
        self.check_file_in_scope(path)
    }

    /// File check for a file already known to sit under a listed directory
    pub fn check_file_in_scope(&self, path: &Path) -> FileVerdict {
        let in_ext_list = self.extensions.contains(&extension_of(path));
        if self.extensions.rule.excludes(in_ext_list) {
            return FileVerdict::Exclude;
        }

        if self.glob_excludes(path) {
            FileVerdict::Exclude
        } else {
            FileVerdict::Include
        }
    }

    /// Glob rule alone, applied to admitted directories before dispatch
    pub fn glob_excludes(&self, path: &Path) -> bool {
        let matched = self.globs.matches(&self.glob_subject(path));
        self.globs.rule.excludes(matched)
    }

    fn whitelist_match(&self, dir: &Path) -> WhitelistMatch {
        let DirIndex::Whitelist(trie) = &self.dirs else {
            return WhitelistMatch::Listed;
        };
        match dir.strip_prefix(&self.root) {
            Ok(relative) => trie.lookup(relative),
            Err(_) => WhitelistMatch::Unknown,
        }
    }

    /// The path with the root prefix removed, keeping the leading separator.
    /// The root itself maps to the empty string.
    fn glob_subject(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(relative) if relative.as_os_str().is_empty() => String::new(),
            Ok(relative) => format!("{}{}", MAIN_SEPARATOR, relative.to_string_lossy()),
            Err(_) => path.to_string_lossy().into_owned(),
        }
    }
}

/// Extension of the final path component: everything from its last `.`,
/// dot included. Names without a dot have an empty extension.
pub fn extension_of(path: &Path) -> String {
    let Some(name) = path.file_name() else {
        return String::new();
    };
    let name = name.to_string_lossy();
    match name.rfind('.') {
        Some(idx) => name[idx..].to_string(),
        None => String::new(),
    }
}
