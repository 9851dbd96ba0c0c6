//! Path filtering for walks
//!
//! Three independent rules decide whether a path is in scope: a directory
//! list, an extension list and a glob list, each used as a blacklist or a
//! whitelist. The raw lists are compiled once per walk by [`compiler`] and
//! consulted for every entry by [`checker`].

pub mod checker;
pub mod compiler;
pub mod dir_index;

// Re-export commonly used items
pub use checker::extension_of;
pub use compiler::{CompiledFilters, ExtensionIndex, GlobList};
pub use dir_index::{DirIndex, DirTrie, WhitelistMatch};
