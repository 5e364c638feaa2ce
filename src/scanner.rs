//! 폴더 탐색 모듈
//!
//! 대상 폴더 아래의 모든 파일과 폴더를 한 번씩 나열합니다.
//! 같은 폴더 안에서는 이름 순으로, 폴더는 그 내용물 다음에 나옵니다.
//! 하위 항목을 먼저 바꿔야 상위 폴더 이름이 바뀌어도 경로가 유효하기 때문입니다.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::corrector::is_canonical;
use crate::error::{Result, SanitizeError};
use crate::pattern::ExcludeMatcher;

/// 항목 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// 탐색된 파일 시스템 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// 대상 폴더를 포함한 전체 경로
    pub path: PathBuf,
    /// 마지막 경로 요소
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// 탐색 옵션
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// 이미 NFC인 이름은 건너뜀
    pub ignore_already_canonical: bool,
    /// 최대 탐색 깊이 (대상 폴더 = 0)
    pub max_depth: Option<usize>,
    /// 제외 패턴
    pub exclude: ExcludeMatcher,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ignore_already_canonical(mut self, ignore: bool) -> Self {
        self.ignore_already_canonical = ignore;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_exclude(mut self, exclude: ExcludeMatcher) -> Self {
        self.exclude = exclude;
        self
    }
}

/// 대상 경로가 존재하는 폴더인지 확인
pub fn validate_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(SanitizeError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    if !root.is_dir() {
        return Err(SanitizeError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    Ok(())
}

/// 대상 폴더를 지연 탐색
///
/// 접근할 수 없는 항목은 `Err`로 나오고 탐색은 계속됩니다.
/// 대상 폴더 자체는 포함하지 않습니다. 제외된 폴더 안으로는 들어가지 않습니다.
pub fn walk<'a>(
    root: &'a Path,
    options: &'a ScanOptions,
) -> impl Iterator<Item = Result<Entry>> + 'a {
    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    if let Some(max_depth) = options.max_depth {
        walker = walker.max_depth(max_depth);
    }

    // contents_first를 켜면 filter_entry가 하위 폴더를 잘라내지 못하므로
    // 전위 순회로 잘라낸 뒤 폴더를 내용물 다음으로 미룸
    let pruned = walker.into_iter().filter_entry(move |dent| {
        let excluded = options.exclude.has_patterns()
            && dent
                .file_name()
                .to_str()
                .is_some_and(|name| options.exclude.is_excluded(name));
        if excluded {
            debug!("제외됨: {}", dent.path().display());
        }
        !excluded
    });

    ContentsFirst::new(pruned).filter_map(move |item| match item {
        Ok(dent) => to_entry(dent, options).map(Ok),
        Err(e) => {
            let path = e.path().unwrap_or(root).to_path_buf();
            Some(Err(SanitizeError::Scan {
                path,
                reason: e.to_string(),
            }))
        }
    })
}

/// 전위 순회 결과에서 폴더를 그 내용물 뒤로 미루는 어댑터
struct ContentsFirst<I> {
    inner: I,
    pending: Vec<walkdir::DirEntry>,
    held: Option<walkdir::Result<walkdir::DirEntry>>,
}

impl<I> ContentsFirst<I> {
    fn new(inner: I) -> Self {
        Self {
            inner,
            pending: Vec::new(),
            held: None,
        }
    }
}

impl<I> Iterator for ContentsFirst<I>
where
    I: Iterator<Item = walkdir::Result<walkdir::DirEntry>>,
{
    type Item = walkdir::Result<walkdir::DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(item) = self.held.take().or_else(|| self.inner.next()) else {
                return self.pending.pop().map(Ok);
            };

            // 같은 깊이 이상의 항목이 나오면 대기 중인 폴더의 내용물은 끝난 것
            let depth = item.as_ref().ok().map(|dent| dent.depth());
            if let Some(depth) = depth {
                if self.pending.last().is_some_and(|dir| dir.depth() >= depth) {
                    self.held = Some(item);
                    return self.pending.pop().map(Ok);
                }
            }

            match item {
                Ok(dent) if dent.file_type().is_dir() => self.pending.push(dent),
                other => return Some(other),
            }
        }
    }
}

fn to_entry(dent: walkdir::DirEntry, options: &ScanOptions) -> Option<Entry> {
    let Some(name) = dent.file_name().to_str() else {
        debug!("유니코드가 아닌 이름 건너뜀: {}", dent.path().display());
        return None;
    };

    if options.ignore_already_canonical && is_canonical(name) {
        return None;
    }

    let kind = if dent.file_type().is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    };

    Some(Entry {
        name: name.to_string(),
        path: dent.into_path(),
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(root: &Path, options: &ScanOptions) -> Vec<String> {
        walk(root, options)
            .filter_map(|e| e.ok())
            .map(|e| {
                e.path
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    fn setup_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("b_dir");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("inner.txt"), "x").unwrap();
        fs::write(temp_dir.path().join("a.txt"), "x").unwrap();
        fs::write(temp_dir.path().join("c.txt"), "x").unwrap();
        temp_dir
    }

    #[test]
    fn test_walk_contents_first_sorted() {
        let temp_dir = setup_tree();
        let found = names(temp_dir.path(), &ScanOptions::new());

        assert_eq!(found, vec!["a.txt", "b_dir/inner.txt", "b_dir", "c.txt"]);
    }

    #[test]
    fn test_walk_excludes_root() {
        let temp_dir = TempDir::new().unwrap();
        let found = names(temp_dir.path(), &ScanOptions::new());
        assert!(found.is_empty());
    }

    #[test]
    fn test_walk_entry_kind() {
        let temp_dir = setup_tree();
        let options = ScanOptions::new();
        let entries: Vec<Entry> = walk(temp_dir.path(), &options)
            .filter_map(|e| e.ok())
            .collect();

        let dir = entries.iter().find(|e| e.name == "b_dir").unwrap();
        let file = entries.iter().find(|e| e.name == "a.txt").unwrap();
        assert!(dir.is_dir());
        assert!(!file.is_dir());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_walk_ignore_canonical() {
        use unicode_normalization::UnicodeNormalization;

        let temp_dir = setup_tree();
        let decomposed: String = "한글.txt".nfd().collect();
        fs::write(temp_dir.path().join(&decomposed), "x").unwrap();

        let options = ScanOptions::new().with_ignore_already_canonical(true);
        let entries: Vec<Entry> = walk(temp_dir.path(), &options)
            .filter_map(|e| e.ok())
            .collect();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, decomposed);
    }

    #[test]
    fn test_walk_max_depth() {
        let temp_dir = setup_tree();
        let options = ScanOptions::new().with_max_depth(Some(1));
        let found = names(temp_dir.path(), &options);

        assert_eq!(found, vec!["a.txt", "b_dir", "c.txt"]);
    }

    #[test]
    fn test_walk_exclude_prunes_children() {
        let temp_dir = setup_tree();
        let exclude = ExcludeMatcher::new(&["b_*".to_string()]).unwrap();
        let options = ScanOptions::new().with_exclude(exclude);
        let found = names(temp_dir.path(), &options);

        assert_eq!(found, vec!["a.txt", "c.txt"]);
    }

    #[test]
    fn test_walk_deep_tree_contents_first() {
        let temp_dir = TempDir::new().unwrap();
        let deep = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("c.txt"), "x").unwrap();
        fs::write(temp_dir.path().join("a").join("d.txt"), "x").unwrap();
        fs::write(temp_dir.path().join("e.txt"), "x").unwrap();

        let found = names(temp_dir.path(), &ScanOptions::new());
        assert_eq!(found, vec!["a/b/c.txt", "a/b", "a/d.txt", "a", "e.txt"]);
    }

    #[test]
    fn test_walk_exclude_matches_nested_dir() {
        let temp_dir = setup_tree();
        let git = temp_dir.path().join("b_dir").join(".git");
        fs::create_dir(&git).unwrap();
        fs::write(git.join("HEAD"), "x").unwrap();

        let exclude = ExcludeMatcher::new(&[".git".to_string()]).unwrap();
        let options = ScanOptions::new().with_exclude(exclude);
        let found = names(temp_dir.path(), &options);

        assert_eq!(found, vec!["a.txt", "b_dir/inner.txt", "b_dir", "c.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_does_not_descend_into_excluded_dir() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = setup_tree();
        let locked = temp_dir.path().join(".git").join("objects");
        fs::create_dir_all(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root 권한이면 읽기 오류가 나지 않으므로 확인할 수 없음
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let exclude = ExcludeMatcher::new(&[".git".to_string()]).unwrap();
        let options = ScanOptions::new().with_exclude(exclude);
        let results: Vec<Result<Entry>> = walk(temp_dir.path(), &options).collect();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_validate_root() {
        let temp_dir = setup_tree();
        assert!(validate_root(temp_dir.path()).is_ok());
        assert!(matches!(
            validate_root(&temp_dir.path().join("missing")),
            Err(SanitizeError::RootNotFound { .. })
        ));
        assert!(matches!(
            validate_root(&temp_dir.path().join("a.txt")),
            Err(SanitizeError::NotADirectory { .. })
        ));
    }
}
