//! namefix - FILENAME SANITIZER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use tracing::{debug, error, info};

use namefix::{
    cli::Args,
    corrector::CorrectionRule,
    error::RenameError,
    executor::RenameOptions,
    logging,
    pattern::ExcludeMatcher,
    scanner::ScanOptions,
    stats::write_error_log,
    task::{run_tasks, AssumeYes, RunOptions, StdinConfirm, TaskReport, TaskStatus},
};

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(args.debug.as_deref()).context("로거 초기화 실패")?;
    if args.debug.is_some() {
        debug!("Debugging logs enabled.");
    }

    let rules = args.selected_rules()?;
    if rules.is_empty() {
        info!("선택된 작업이 없습니다. (-a, -k, -u, -f 중 하나를 지정하세요)");
        return Ok(());
    }

    let root = args.target_path();
    print_header(&args, &root, &rules);

    let options = build_run_options(&args)?;
    let result = if args.yes {
        run_tasks(&root, &rules, &options, &mut AssumeYes)
    } else {
        run_tasks(&root, &rules, &options, &mut StdinConfirm)
    };

    let reports = match result {
        Ok(reports) => reports,
        Err(e) => {
            error!("An error occurred: {}", e);
            return Err(e.into());
        }
    };

    print_reports(&reports);

    let failures: Vec<RenameError> = reports
        .iter()
        .flat_map(|r| r.failures.iter().cloned())
        .collect();
    print_errors(&failures);

    if let Some(ref log_path) = args.log {
        write_error_log(log_path, &failures)?;
        println!("\n{} 에러 로그 저장: {:?}", "📝".bright_cyan(), log_path);
    }

    Ok(())
}

/// CLI 인자로부터 실행 옵션 생성
fn build_run_options(args: &Args) -> Result<RunOptions> {
    let exclude = ExcludeMatcher::new(&args.exclude)?;
    let scan = ScanOptions::new()
        .with_max_depth(args.max_depth)
        .with_exclude(exclude);
    let rename = RenameOptions::new().with_conflict_policy(args.on_conflict);

    Ok(RunOptions::new()
        .with_scan(scan)
        .with_rename(rename)
        .with_dry_run(args.dry_run))
}

/// 헤더 출력
fn print_header(args: &Args, root: &Path, rules: &[CorrectionRule]) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🔤 FILENAME SANITIZER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 대상 폴더: {:?}", "📂".bright_cyan(), root);

    let names: Vec<String> = rules.iter().map(|r| r.to_string()).collect();
    println!("  {} 작업: {}", "⚙️".bright_yellow(), names.join(" → "));
    println!("  {} 충돌 처리: {}", "🔢".bright_white(), args.on_conflict);

    if !args.exclude.is_empty() {
        println!(
            "  {} 제외 패턴: {}",
            "🔍".bright_magenta(),
            args.exclude.join(", ")
        );
    }

    if let Some(depth) = args.max_depth {
        println!("  {} 최대 깊이: {}", "📏".bright_white(), depth);
    }

    if args.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 변경 없음)".yellow()
        );
    }

    if args.yes {
        println!("  {} {}", "⚡".bright_yellow(), "확인 없이 실행".yellow());
    }

    println!("{}", "═".repeat(50).bright_blue());
}

/// 작업별 결과 출력
fn print_reports(reports: &[TaskReport]) {
    for report in reports {
        match report.status {
            TaskStatus::Executed => {
                if let Some(ref stats) = report.stats {
                    stats.print_summary(&report.rule.to_string());
                }
            }
            TaskStatus::Cancelled => println!(
                "\n{} [{}] {}개 변경이 취소되었습니다.",
                "⏹️".bright_yellow(),
                report.rule,
                report.plan.len()
            ),
            TaskStatus::DryRun => println!(
                "\n{} [{}] {}개 변경 예정 (드라이런)",
                "ℹ️".bright_blue(),
                report.rule,
                report.plan.len().to_string().bright_green()
            ),
            TaskStatus::NothingToDo => println!(
                "\n{} [{}] 바꿀 이름이 없습니다.",
                "✅".bright_green(),
                report.rule
            ),
        }
    }
}

/// 실패 목록 출력
fn print_errors(failures: &[RenameError]) {
    if failures.is_empty() {
        return;
    }

    println!("\n{}", "❌ 이름 변경 실패:".bright_red());
    for failure in failures {
        println!("  {} {}", "•".red(), failure.from.display());
        println!(
            "    {}",
            format!("[{}] {}", failure.kind, failure.reason).dimmed()
        );
    }
}
