//! 변경 계획 모듈
//!
//! 탐색된 항목마다 교정 규칙을 적용해 (원래 경로, 제안 경로) 목록을 만듭니다.
//! 충돌 해결은 여기서 하지 않고 실행 시점에 합니다.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::corrector::CorrectionRule;
use crate::error::Result;
use crate::scanner::{self, Entry, ScanOptions};

/// 제안된 이름 변경 하나 (충돌 해결 전)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub original: PathBuf,
    pub proposed: PathBuf,
}

impl Change {
    pub fn new(original: impl Into<PathBuf>, proposed: impl Into<PathBuf>) -> Self {
        Self {
            original: original.into(),
            proposed: proposed.into(),
        }
    }
}

/// 규칙 하나에 대한 변경 계획
#[derive(Debug, Clone)]
pub struct Plan {
    pub rule: CorrectionRule,
    /// 탐색 순서대로의 변경 목록
    pub changes: Vec<Change>,
    /// 탐색 중 건너뛴 항목 수
    pub scan_errors: usize,
    /// 교정 결과가 쓸 수 없는 이름이라 버린 항목 수
    pub rejected: usize,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

/// 탐색 결과로부터 변경 계획 생성
///
/// # Arguments
/// * `entries` - 탐색 결과 (실패 항목은 로그 후 건너뜀)
/// * `rule` - 적용할 교정 규칙
pub fn build_plan<I>(entries: I, rule: CorrectionRule) -> Plan
where
    I: IntoIterator<Item = Result<Entry>>,
{
    let mut plan = Plan {
        rule,
        changes: Vec::new(),
        scan_errors: 0,
        rejected: 0,
    };

    for item in entries {
        let entry = match item {
            Ok(entry) => entry,
            Err(e) => {
                warn!("{}", e);
                plan.scan_errors += 1;
                continue;
            }
        };

        let Some(fixed) = rule.correct(&entry.name) else {
            continue;
        };

        if !is_usable_name(&fixed) {
            warn!(
                "교정된 이름을 쓸 수 없어 건너뜀: {} -> {:?}",
                entry.path.display(),
                fixed
            );
            plan.rejected += 1;
            continue;
        }

        let proposed = sibling_path(&entry.path, &fixed);
        debug!("계획: {} -> {}", entry.path.display(), proposed.display());
        plan.changes.push(Change::new(entry.path, proposed));
    }

    plan
}

/// 대상 폴더를 새로 탐색해 규칙의 변경 계획 생성
///
/// 규칙이 요구하면 이미 NFC인 이름은 교정 전에 걸러집니다.
/// `on_entry`는 탐색 결과 하나마다 호출됩니다 (진행 표시용).
pub fn plan_task<F>(
    root: &Path,
    rule: CorrectionRule,
    options: &ScanOptions,
    mut on_entry: F,
) -> Plan
where
    F: FnMut(&Result<Entry>),
{
    let options = options
        .clone()
        .with_ignore_already_canonical(rule.ignore_already_canonical());
    let entries = scanner::walk(root, &options).inspect(|item| on_entry(item));
    build_plan(entries, rule)
}

fn sibling_path(path: &Path, name: &str) -> PathBuf {
    match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

// 퍼센트 디코딩 결과에 경로 구분자가 생기면 다른 폴더로 이동하게 됨
fn is_usable_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains(std::path::MAIN_SEPARATOR)
        && !name.contains('\0')
}
