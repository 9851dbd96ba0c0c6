//! End-to-end walk tests over temporary directory trees

use pretty_assertions::assert_eq;
use rstest::rstest;
use skywalker::{ListRule, Skywalker, WalkError, Worker};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Records every path it is handed, in call order
#[derive(Clone, Default)]
struct Collector {
    paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl Worker for Collector {
    fn work(&self, path: &Path) {
        self.paths.lock().unwrap().push(path.to_path_buf());
    }
}

impl Collector {
    fn sequence(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }

    fn set(&self) -> BTreeSet<PathBuf> {
        self.sequence().into_iter().collect()
    }
}

/// A temporary tree with its canonical root
struct TestTree {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl TestTree {
    fn new(files: &[&str]) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = dunce::canonicalize(temp_dir.path()).unwrap();
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, file.as_bytes()).unwrap();
        }
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// The `/r` tree: a/x.txt, a/y.log, b/z.txt
    fn basic() -> Self {
        Self::new(&["a/x.txt", "a/y.log", "b/z.txt"])
    }

    fn path(&self, rel: &str) -> PathBuf {
        if rel.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rel)
        }
    }

    fn paths(&self, rels: &[&str]) -> BTreeSet<PathBuf> {
        rels.iter().map(|rel| self.path(rel)).collect()
    }

    fn walker(&self, collector: &Collector) -> Skywalker {
        Skywalker::new(&self.root, collector.clone())
    }
}

#[test]
fn test_whitelisted_dir_with_blacklisted_extension() {
    let tree = TestTree::basic();
    let collector = Collector::default();

    tree.walker(&collector)
        .directories(ListRule::Whitelist, ["a"])
        .extensions(ListRule::Blacklist, [".log"])
        .walk()
        .unwrap();

    assert_eq!(collector.set(), tree.paths(&["a/x.txt"]));
}

#[test]
fn test_blacklisted_dir_with_directories_dispatched() {
    let tree = TestTree::basic();
    let collector = Collector::default();

    tree.walker(&collector)
        .directories(ListRule::Blacklist, ["a"])
        .files_only(false)
        .walk()
        .unwrap();

    let dispatched = collector.set();
    assert!(dispatched.contains(&tree.path("b")));
    assert!(dispatched.contains(&tree.path("b/z.txt")));
    assert!(dispatched.iter().all(|p| !p.starts_with(tree.path("a"))));
    // The root is admitted like any other directory
    assert_eq!(dispatched, tree.paths(&["", "b", "b/z.txt"]));
}

#[test]
fn test_glob_whitelist_without_other_rules() {
    let tree = TestTree::basic();
    let collector = Collector::default();

    tree.walker(&collector)
        .globs(ListRule::Whitelist, ["*.txt"])
        .walk()
        .unwrap();

    assert_eq!(collector.set(), tree.paths(&["a/x.txt", "b/z.txt"]));
}

#[test]
fn test_malformed_glob_dispatches_nothing() {
    let tree = TestTree::basic();
    let collector = Collector::default();

    let err = tree
        .walker(&collector)
        .globs(ListRule::Blacklist, ["*.txt", "[unclosed"])
        .walk()
        .unwrap_err();

    assert!(err.is_configuration(), "unexpected error: {:?}", err);
    assert!(matches!(err, WalkError::InvalidGlob { .. }));
    assert!(collector.sequence().is_empty());
}

#[test]
fn test_missing_root_dispatches_nothing() {
    let tree = TestTree::basic();
    let collector = Collector::default();

    let err = Skywalker::new(tree.path("nope"), collector.clone())
        .walk()
        .unwrap_err();

    assert!(err.is_root());
    assert!(collector.sequence().is_empty());
}

#[test]
fn test_nested_whitelist_reaches_listed_dir_only() {
    let tree = TestTree::new(&[
        "top.txt",
        "a/a.txt",
        "a/b/b.txt",
        "a/b/c/c.txt",
        "a/b/c/d/d.txt",
        "a/other/o.txt",
        "z/z.txt",
    ]);
    let collector = Collector::default();

    tree.walker(&collector)
        .directories(ListRule::Whitelist, ["a/b/c"])
        .walk()
        .unwrap();

    assert_eq!(collector.set(), tree.paths(&["a/b/c/c.txt", "a/b/c/d/d.txt"]));
}

#[test]
fn test_whitelist_ancestors_are_not_dispatched_as_dirs() {
    let tree = TestTree::new(&["a/b/c/c.txt", "a/b/b.txt", "z/z.txt"]);
    let collector = Collector::default();

    tree.walker(&collector)
        .directories(ListRule::Whitelist, ["a/b/c"])
        .files_only(false)
        .walk()
        .unwrap();

    let dispatched = collector.set();
    assert!(dispatched.contains(&tree.path("a/b/c")));
    assert!(dispatched.contains(&tree.path("a/b/c/c.txt")));
    assert!(!dispatched.contains(&tree.path("a")));
    assert!(!dispatched.contains(&tree.path("a/b")));
    assert!(!dispatched.contains(&tree.path("a/b/b.txt")));
    assert!(!dispatched.contains(&tree.path("z")));
}

#[test]
fn test_overlapping_whitelist_entries_in_either_order() {
    let tree = TestTree::new(&["a/a.txt", "a/b/b.txt", "c/c.txt"]);

    for entries in [["a", "a/b"], ["a/b", "a"]] {
        let collector = Collector::default();
        tree.walker(&collector)
            .directories(ListRule::Whitelist, entries)
            .walk()
            .unwrap();
        assert_eq!(collector.set(), tree.paths(&["a/a.txt", "a/b/b.txt"]));
    }
}

#[test]
fn test_blacklisted_extension_beats_glob_whitelist() {
    let tree = TestTree::new(&["a/x.log", "a/y.txt", "b/z.log"]);
    let collector = Collector::default();

    tree.walker(&collector)
        .extensions(ListRule::Blacklist, [".log"])
        .globs(ListRule::Whitelist, ["*.log", "*.txt"])
        .walk()
        .unwrap();

    assert_eq!(collector.set(), tree.paths(&["a/y.txt"]));
}

#[test]
fn test_extension_whitelist_under_whitelisted_dirs() {
    let tree = TestTree::new(&[
        "src/lib.rs",
        "src/notes.md",
        "src/bin/main.rs",
        "src/Makefile",
        "docs/guide.rs",
    ]);
    let collector = Collector::default();

    tree.walker(&collector)
        .directories(ListRule::Whitelist, ["src"])
        .extensions(ListRule::Whitelist, [".rs"])
        .walk()
        .unwrap();

    assert_eq!(collector.set(), tree.paths(&["src/bin/main.rs", "src/lib.rs"]));
}

#[test]
fn test_single_worker_preserves_discovery_order() {
    let tree = TestTree::new(&[
        "b/2.txt", "b/1.txt", "a/c/3.txt", "a/0.txt", "c.txt", "a/c/d/4.txt",
    ]);
    let collector = Collector::default();

    tree.walker(&collector).workers(1).queue_size(2).walk().unwrap();

    let expected: Vec<PathBuf> = walkdir::WalkDir::new(&tree.root)
        .sort_by_file_name()
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();

    assert_eq!(collector.sequence(), expected);
    assert_eq!(expected.first(), Some(&tree.path("a/0.txt")));
}

#[rstest]
#[case(1, 100)]
#[case(4, 1)]
#[case(32, 0)]
#[case(0, 16)]
fn test_every_path_dispatched_exactly_once(#[case] workers: usize, #[case] queue_size: usize) {
    let files: Vec<String> = (0..120)
        .map(|i| format!("d{}/sub{}/f{}.dat", i % 7, i % 3, i))
        .collect();
    let tree = TestTree::new(&files.iter().map(String::as_str).collect::<Vec<_>>());
    let collector = Collector::default();

    tree.walker(&collector)
        .workers(workers)
        .queue_size(queue_size)
        .walk()
        .unwrap();

    let sequence = collector.sequence();
    let unique: BTreeSet<_> = sequence.iter().cloned().collect();
    assert_eq!(sequence.len(), 120);
    assert_eq!(unique.len(), 120);
}

#[test]
fn test_repeated_walks_dispatch_the_same_set() {
    let tree = TestTree::new(&["a/1.txt", "a/2.log", "b/c/3.txt", "b/4.txt"]);

    let run = || {
        let collector = Collector::default();
        tree.walker(&collector)
            .directories(ListRule::Blacklist, ["b/c"])
            .workers(8)
            .walk()
            .unwrap();
        collector.set()
    };

    let first = run();
    assert_eq!(first, run());
    assert_eq!(first, tree.paths(&["a/1.txt", "a/2.log", "b/4.txt"]));
}

#[test]
fn test_slow_workers_drain_full_queue() {
    let files: Vec<String> = (0..40).map(|i| format!("f{:02}.txt", i)).collect();
    let tree = TestTree::new(&files.iter().map(String::as_str).collect::<Vec<_>>());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    Skywalker::new(&tree.root, move |path: &Path| {
        std::thread::sleep(Duration::from_millis(2));
        sink.lock().unwrap().push(path.to_path_buf());
    })
    .workers(2)
    .queue_size(1)
    .walk()
    .unwrap();

    assert_eq!(seen.lock().unwrap().len(), 40);
}

#[test]
fn test_max_depth_limits_descent() {
    let tree = TestTree::new(&["one.txt", "a/two.txt", "a/b/three.txt"]);
    let collector = Collector::default();

    tree.walker(&collector).max_depth(2).walk().unwrap();

    assert_eq!(collector.set(), tree.paths(&["a/two.txt", "one.txt"]));
}

#[test]
fn test_glob_blacklist_applies_to_dispatched_dirs() {
    let tree = TestTree::basic();
    let collector = Collector::default();

    tree.walker(&collector)
        .files_only(false)
        .globs(ListRule::Blacklist, ["/a*"])
        .walk()
        .unwrap();

    // Globs filter entries but never prune
    assert_eq!(collector.set(), tree.paths(&["", "b", "b/z.txt"]));
}

#[cfg(unix)]
#[test]
fn test_symlinked_dirs_followed_only_on_request() {
    let tree = TestTree::basic();
    std::os::unix::fs::symlink(tree.path("b"), tree.path("link")).unwrap();

    let collector = Collector::default();
    tree.walker(&collector).walk().unwrap();
    assert!(collector.set().contains(&tree.path("link")));
    assert!(!collector.set().contains(&tree.path("link/z.txt")));

    let collector = Collector::default();
    tree.walker(&collector).follow_links(true).walk().unwrap();
    assert!(collector.set().contains(&tree.path("link/z.txt")));
}

#[cfg(unix)]
#[test]
fn test_traversal_error_stops_walk_after_draining_queue() {
    let tree = TestTree::new(&["a/x.txt", "c/z.txt"]);
    std::os::unix::fs::symlink(tree.path("missing"), tree.path("b_dangling")).unwrap();
    let collector = Collector::default();

    let err = tree
        .walker(&collector)
        .follow_links(true)
        .workers(1)
        .walk()
        .unwrap_err();

    assert!(err.is_traversal(), "unexpected error: {:?}", err);
    // Only what was discovered before the broken link is delivered
    assert_eq!(collector.sequence(), vec![tree.path("a/x.txt")]);
}

#[cfg(unix)]
mod permissions {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::os::unix::fs::PermissionsExt;

    /// Make `dir` unreadable; returns false when the process can read it
    /// anyway (e.g. when running as root)
    fn lock(dir: &Path) -> bool {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
        fs::read_dir(dir).is_err()
    }

    fn unlock(dir: &Path) {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_pruned_unreadable_subtree_is_not_an_error() {
        let tree = TestTree::new(&["a_first/x.txt", "b_locked/secret.txt", "c_last/z.txt"]);
        let locked = tree.path("b_locked");
        if !lock(&locked) {
            unlock(&locked);
            return;
        }

        let collector = Collector::default();
        let result = tree
            .walker(&collector)
            .directories(ListRule::Blacklist, ["b_locked"])
            .walk();
        unlock(&locked);

        result.unwrap();
        assert_eq!(collector.set(), tree.paths(&["a_first/x.txt", "c_last/z.txt"]));
    }

    #[test]
    fn test_traversal_error_still_drains_queued_paths() {
        let tree = TestTree::new(&["a_first/x.txt", "b_locked/secret.txt", "c_last/z.txt"]);
        let locked = tree.path("b_locked");
        if !lock(&locked) {
            unlock(&locked);
            return;
        }

        let collector = Collector::default();
        let result = tree.walker(&collector).workers(1).queue_size(10).walk();
        unlock(&locked);

        let err = result.unwrap_err();
        assert!(err.is_traversal(), "unexpected error: {:?}", err);
        assert_eq!(collector.set(), tree.paths(&["a_first/x.txt"]));
    }
}
