//! 작업 실행 모듈
//!
//! 규칙 하나마다 탐색 → 계획 → 확인 → 실행을 순서대로 수행합니다.
//! 앞 작업의 이름 변경이 다음 작업에 보여야 하므로 작업마다 새로 탐색합니다.

use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

use crate::corrector::CorrectionRule;
use crate::error::{RenameError, Result};
use crate::executor::{execute, RenameOptions};
use crate::planner::{plan_task, Plan};
use crate::prompt::{self, PROCEED_QUESTION};
use crate::scanner::{validate_root, ScanOptions};
use crate::stats::Statistics;

/// 실행 전 확인
pub trait Confirm {
    /// `true`면 계획된 변경을 모두 실행, `false`면 하나도 실행하지 않음
    fn confirm(&mut self, plan: &Plan) -> io::Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&Plan) -> bool,
{
    fn confirm(&mut self, plan: &Plan) -> io::Result<bool> {
        Ok(self(plan))
    }
}

/// 표준 입력으로 y/n을 묻는 확인
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, _plan: &Plan) -> io::Result<bool> {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        let mut writer = io::stdout();
        prompt::ask(&mut reader, &mut writer, PROCEED_QUESTION)
    }
}

/// 묻지 않고 항상 승인
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _plan: &Plan) -> io::Result<bool> {
        Ok(true)
    }
}

/// 작업 실행 옵션
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub scan: ScanOptions,
    pub rename: RenameOptions,
    /// 계획만 보여주고 실행하지 않음
    pub dry_run: bool,
    /// 탐색 스피너 표시
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            scan: ScanOptions::default(),
            rename: RenameOptions::default(),
            dry_run: false,
            show_progress: true,
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scan(mut self, scan: ScanOptions) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_rename(mut self, rename: RenameOptions) -> Self {
        self.rename = rename;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

/// 작업 종료 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// 바꿀 이름이 없음
    NothingToDo,
    /// 사용자가 실행을 거절함
    Cancelled,
    /// 계획만 출력함
    DryRun,
    /// 실행함 (개별 실패가 있을 수 있음)
    Executed,
}

/// 작업 하나의 결과
#[derive(Debug)]
pub struct TaskReport {
    pub rule: CorrectionRule,
    pub status: TaskStatus,
    pub plan: Plan,
    /// 실행한 경우의 통계
    pub stats: Option<Statistics>,
    pub failures: Vec<RenameError>,
}

impl TaskReport {
    fn without_execution(plan: Plan, status: TaskStatus) -> Self {
        Self {
            rule: plan.rule,
            status,
            plan,
            stats: None,
            failures: Vec::new(),
        }
    }
}

/// 규칙 하나에 대해 탐색 → 계획 → 확인 → 실행
///
/// 확인을 거절하면 파일 시스템을 전혀 건드리지 않습니다.
/// 개별 이름 변경 실패는 작업을 중단시키지 않고 보고서에 모입니다.
pub fn run_task<C>(
    root: &Path,
    rule: CorrectionRule,
    options: &RunOptions,
    confirm: &mut C,
) -> Result<TaskReport>
where
    C: Confirm + ?Sized,
{
    info!("[{}] 탐색 시작: {}", rule, root.display());

    let spinner = create_spinner(options.show_progress);
    spinner.set_message(format!("{} 탐색 중...", rule.label()));
    let plan = plan_task(root, rule, &options.scan, |_| spinner.inc(1));
    spinner.finish_and_clear();

    if plan.scan_errors > 0 {
        info!("탐색 중 {}개 항목을 건너뛰었습니다.", plan.scan_errors);
    }

    if plan.is_empty() {
        info!("No files to convert.");
        return Ok(TaskReport::without_execution(plan, TaskStatus::NothingToDo));
    }

    info!("The following files will be renamed:");
    for change in &plan.changes {
        info!("{} -> {}", change.original.display(), change.proposed.display());
    }

    if options.dry_run {
        info!("드라이런 모드: 이름을 바꾸지 않습니다.");
        return Ok(TaskReport::without_execution(plan, TaskStatus::DryRun));
    }

    if !confirm.confirm(&plan)? {
        info!("Renaming cancelled.");
        return Ok(TaskReport::without_execution(plan, TaskStatus::Cancelled));
    }

    let mut stats = Statistics::new(plan.len());
    let outcomes = execute(&plan.changes, &options.rename, |progress| {
        stats.record(progress.outcome);
        if !progress.outcome.is_success() {
            error!(
                "Failed to rename: {}",
                progress.outcome.change.original.display()
            );
        }
        info!(
            "Progress: {}/{} ({:.2}%) files renamed.",
            progress.index,
            progress.total,
            progress.percent()
        );
    });
    stats.finish();

    info!("File renaming completed.");

    let failures = outcomes.into_iter().filter_map(|o| o.result.err()).collect();

    Ok(TaskReport {
        rule,
        status: TaskStatus::Executed,
        plan,
        stats: Some(stats),
        failures,
    })
}

/// 여러 규칙을 주어진 순서대로 실행
///
/// 한 작업을 거절해도 다음 작업은 계속 확인을 받습니다.
pub fn run_tasks<C>(
    root: &Path,
    rules: &[CorrectionRule],
    options: &RunOptions,
    confirm: &mut C,
) -> Result<Vec<TaskReport>>
where
    C: Confirm + ?Sized,
{
    validate_root(root)?;

    let mut reports = Vec::with_capacity(rules.len());
    for rule in rules {
        reports.push(run_task(root, *rule, options, &mut *confirm)?);
    }
    Ok(reports)
}

/// 탐색 스피너 생성
fn create_spinner(visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg} {pos}개")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
