//! 이름 변경 실행 모듈
//!
//! 계획된 변경을 순서대로 하나씩 적용하며 이름 충돌을 해결합니다.
//! 충돌 판단은 앞선 변경이 남긴 파일 시스템 상태에 의존하므로
//! 변경은 반드시 계획 순서대로 하나씩 실행합니다.

use clap::ValueEnum;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use unicode_normalization::UnicodeNormalization;

use crate::corrector::is_canonical;
use crate::error::{RenameError, RenameErrorKind};
use crate::planner::Change;

/// 제안 이름을 작업 전부터 있던 NFC 이름의 다른 파일이 차지하고 있을 때의 처리
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// 건드리지 않고 실패로 보고
    #[default]
    Skip,
    /// 기존 파일을 덮어씀 (OS rename 결과를 그대로 따름)
    Overwrite,
    /// 번호를 붙여 새 이름 사용
    Number,
}

impl std::fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictPolicy::Skip => write!(f, "Skip"),
            ConflictPolicy::Overwrite => write!(f, "Overwrite"),
            ConflictPolicy::Number => write!(f, "Number"),
        }
    }
}

/// 실행 옵션
#[derive(Debug, Clone, Default)]
pub struct RenameOptions {
    pub conflict_policy: ConflictPolicy,
}

impl RenameOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }
}

/// 변경 하나의 실행 결과
#[derive(Debug, Clone)]
pub struct RenameOutcome {
    pub change: Change,
    /// 실제로 사용된 경로 또는 실패 사유
    pub result: Result<PathBuf, RenameError>,
}

impl RenameOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// 파일 시스템을 건드리지 않고 성공한 경우
    pub fn is_unchanged(&self) -> bool {
        self.change.original == self.change.proposed && self.is_success()
    }
}

/// 진행 상황 (변경 하나가 끝날 때마다 전달)
#[derive(Debug)]
pub struct Progress<'a> {
    /// 1부터 시작하는 처리 순번
    pub index: usize,
    pub total: usize,
    pub outcome: &'a RenameOutcome,
}

impl Progress<'_> {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.index as f64 / self.total as f64) * 100.0
    }
}

/// 변경 하나를 충돌 해결 후 적용
///
/// # Returns
/// 실제로 사용된 최종 경로, 또는 실패 사유
pub fn rename_entry(change: &Change, options: &RenameOptions) -> Result<PathBuf, RenameError> {
    rename_claimed(change, options, &ClaimedPaths::default())
}

/// 한 작업 안에서 앞선 변경이 만들어 낸 경로
///
/// 여기 있는 경로는 작업 시작 전부터 있던 항목이 아니므로
/// 충돌 정책 대신 번호를 붙입니다.
#[derive(Debug, Default)]
struct ClaimedPaths(HashSet<String>);

impl ClaimedPaths {
    fn insert(&mut self, path: &Path) {
        self.0.insert(claim_key(path));
    }

    fn contains(&self, path: &Path) -> bool {
        !self.0.is_empty() && self.0.contains(&claim_key(path))
    }
}

// 정규화를 구분하지 않는 파일 시스템에서도 같은 항목으로 보이도록 NFC로 비교
fn claim_key(path: &Path) -> String {
    path.to_string_lossy().nfc().collect()
}

fn rename_claimed(
    change: &Change,
    options: &RenameOptions,
    claimed: &ClaimedPaths,
) -> Result<PathBuf, RenameError> {
    if change.original == change.proposed {
        return Ok(change.proposed.clone());
    }

    let mut target = change.proposed.clone();

    if path_exists(&target) && !is_same_file(&change.original, &target) {
        if claimed.contains(&target) {
            debug!("이번 작업에서 만든 이름과 충돌: {}", target.display());
            target = next_free_path(&target);
        } else if existing_name_is_canonical(&target) {
            match options.conflict_policy {
                ConflictPolicy::Skip => {
                    return Err(RenameError {
                        from: change.original.clone(),
                        to: target,
                        kind: RenameErrorKind::TargetExists,
                        reason: "이미 정규화된 이름의 항목이 있습니다".to_string(),
                    });
                }
                ConflictPolicy::Overwrite => {
                    debug!("기존 항목 덮어쓰기 시도: {}", target.display());
                }
                ConflictPolicy::Number => target = next_free_path(&target),
            }
        } else {
            target = next_free_path(&target);
        }
    }

    fs::rename(&change.original, &target)
        .map_err(|e| RenameError::io(change.original.clone(), target.clone(), &e))?;

    Ok(target)
}

/// 변경 목록을 순서대로 실행
///
/// 실패한 변경은 기록만 하고 다음 변경으로 넘어갑니다. 되돌리기는 없습니다.
/// 앞선 변경이 만든 이름과 겹치면 충돌 정책과 상관없이 번호를 붙입니다.
///
/// # Arguments
/// * `changes` - 계획 순서의 변경 목록
/// * `options` - 실행 옵션
/// * `on_progress` - 변경 하나가 끝날 때마다 호출
pub fn execute<F>(
    changes: &[Change],
    options: &RenameOptions,
    mut on_progress: F,
) -> Vec<RenameOutcome>
where
    F: FnMut(&Progress<'_>),
{
    let total = changes.len();
    let mut outcomes = Vec::with_capacity(total);
    let mut claimed = ClaimedPaths::default();

    for (i, change) in changes.iter().enumerate() {
        let result = rename_claimed(change, options, &claimed);
        match result {
            Ok(ref final_path) if change.original != change.proposed => {
                claimed.insert(final_path)
            }
            Ok(_) => {}
            Err(ref e) => error!(
                "Error renaming {} to {}: {}",
                e.from.display(),
                e.to.display(),
                e.reason
            ),
        }

        let outcome = RenameOutcome {
            change: change.clone(),
            result,
        };
        on_progress(&Progress {
            index: i + 1,
            total,
            outcome: &outcome,
        });
        outcomes.push(outcome);
    }

    outcomes
}

/// `name.ext` → `name(1).ext`, `name(2).ext` ... 중 비어 있는 첫 경로
pub fn next_free_path(target: &Path) -> PathBuf {
    let dir = target.parent().unwrap_or_else(|| Path::new(""));
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = target
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1usize;
    loop {
        let candidate = dir.join(format!("{}({}){}", stem, counter, ext));
        if !path_exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

// 깨진 심볼릭 링크도 존재하는 것으로 취급
fn path_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// 대상 위치에 실제로 저장된 이름이 NFC인지 확인
///
/// 정규화를 구분하지 않는 파일 시스템에서는 디스크의 이름이
/// 요청한 이름과 다를 수 있어 폴더 목록에서 실제 이름을 찾습니다.
fn existing_name_is_canonical(target: &Path) -> bool {
    let Some(wanted) = target.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    match on_disk_name(target, wanted) {
        Some(actual) => is_canonical(&actual),
        None => is_canonical(wanted),
    }
}

fn on_disk_name(target: &Path, wanted: &str) -> Option<String> {
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let wanted_nfc: String = wanted.nfc().collect();
    let mut equivalent = None;

    for dent in fs::read_dir(parent).ok()?.flatten() {
        let name = dent.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name == wanted {
            return Some(name.to_string());
        }
        if equivalent.is_none() && name.nfc().eq(wanted_nfc.chars()) {
            equivalent = Some(name.to_string());
        }
    }

    equivalent
}

#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(_a: &Path, _b: &Path) -> bool {
    false
}
