//! 통계 및 유틸리티 모듈
//!
//! 작업별 이름 변경 통계 수집 및 요약 출력을 담당합니다.

use colored::Colorize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime};

use crate::error::{RenameError, RenameErrorKind, Result, SanitizeError};
use crate::executor::RenameOutcome;

/// 작업 하나의 이름 변경 통계
#[derive(Debug, Default)]
pub struct Statistics {
    /// 계획된 변경 수
    pub total: usize,
    /// 실제로 이름이 바뀐 수
    pub renamed: usize,
    /// 이미 원하는 이름이라 건드리지 않은 수
    pub unchanged: usize,
    /// 실패 수
    pub failed: usize,
    /// 번호가 붙은 수
    pub numbered: usize,
    start_time: Option<Instant>,
    finished: Option<Duration>,
}

impl Statistics {
    /// 새 통계 인스턴스 생성
    pub fn new(total: usize) -> Self {
        Self {
            total,
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// 실행 결과 하나를 반영
    pub fn record(&mut self, outcome: &RenameOutcome) {
        match &outcome.result {
            Ok(_) if outcome.is_unchanged() => self.unchanged += 1,
            Ok(final_path) => {
                self.renamed += 1;
                if *final_path != outcome.change.proposed {
                    self.numbered += 1;
                }
            }
            Err(_) => self.failed += 1,
        }
    }

    /// 처리된 수
    pub fn processed(&self) -> usize {
        self.renamed + self.unchanged + self.failed
    }

    /// 측정 종료
    pub fn finish(&mut self) {
        self.finished = Some(self.elapsed());
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        if let Some(done) = self.finished {
            return done;
        }
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// 작업 요약 출력
    pub fn print_summary(&self, title: &str) {
        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", format!(" 📊 {} 결과", title).bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!("  {} 계획된 변경:  {}", "📁".bright_cyan(), self.total);
        println!(
            "  {} 변경 완료:    {}",
            "✅".bright_green(),
            self.renamed.to_string().green()
        );

        if self.numbered > 0 {
            println!(
                "  {} 번호 부여:    {}",
                "🔢".bright_yellow(),
                self.numbered.to_string().yellow()
            );
        }

        if self.unchanged > 0 {
            println!("  {} 변경 없음:    {}", "➖".bright_white(), self.unchanged);
        }

        if self.failed > 0 {
            println!(
                "  {} 실패:         {}",
                "❌".bright_red(),
                self.failed.to_string().red()
            );
        } else {
            println!("  {} 실패:         {}", "✅".bright_green(), "0".green());
        }

        if self.total > 0 {
            let success_rate =
                ((self.renamed + self.unchanged) as f64 / self.total as f64) * 100.0;
            println!(
                "  {} 성공률:       {:.1}%",
                "📈".bright_white(),
                success_rate
            );
        }

        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_elapsed(self.elapsed(), self.processed())
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 처리 시간과 초당 처리 개수
pub fn format_elapsed(elapsed: Duration, processed: usize) -> String {
    let secs = elapsed.as_secs();
    let time = if secs >= 60 {
        format!("{}분 {:02}초", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{:.2}초", elapsed.as_secs_f64())
    } else {
        format!("{}ms", elapsed.as_millis())
    };

    let secs_f = elapsed.as_secs_f64();
    if processed == 0 || secs_f == 0.0 {
        return time;
    }
    format!("{} (초당 {:.1}개)", time, processed as f64 / secs_f)
}

/// 실패한 이름 변경을 로그 파일로 작성
pub fn write_error_log(log_path: &Path, failures: &[RenameError]) -> Result<()> {
    let to_log_error = |e: std::io::Error| SanitizeError::LogWrite {
        path: log_path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut log_file = File::create(log_path).map_err(to_log_error)?;
    let mut body = String::new();
    body.push_str("namefix 에러 로그\n");
    body.push_str(&format!("생성 시각 (UNIX 초): {}\n", epoch_seconds()));
    body.push_str(&format!("총 에러 수: {}\n", failures.len()));
    for (kind, count) in count_by_kind(failures) {
        body.push_str(&format!("  - {}: {}\n", kind, count));
    }
    body.push_str(&"=".repeat(50));
    body.push('\n');

    for failure in failures {
        body.push_str(&format!("\n원래 경로: {}\n", failure.from.display()));
        body.push_str(&format!("대상 경로: {}\n", failure.to.display()));
        body.push_str(&format!("원인: [{}] {}\n", failure.kind, failure.reason));
    }

    log_file.write_all(body.as_bytes()).map_err(to_log_error)?;
    Ok(())
}

/// 실패 원인별 개수 (처음 나온 순서)
fn count_by_kind(failures: &[RenameError]) -> Vec<(RenameErrorKind, usize)> {
    let mut counts: Vec<(RenameErrorKind, usize)> = Vec::new();
    for failure in failures {
        match counts.iter_mut().find(|(kind, _)| *kind == failure.kind) {
            Some((_, count)) => *count += 1,
            None => counts.push((failure.kind, 1)),
        }
    }
    counts
}

fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Change;
    use std::path::PathBuf;

    fn outcome(
        original: &str,
        proposed: &str,
        result: std::result::Result<&str, RenameErrorKind>,
    ) -> RenameOutcome {
        RenameOutcome {
            change: Change::new(original, proposed),
            result: result.map(PathBuf::from).map_err(|kind| RenameError {
                from: PathBuf::from(original),
                to: PathBuf::from(proposed),
                kind,
                reason: "test".to_string(),
            }),
        }
    }

    #[test]
    fn test_format_elapsed_with_rate() {
        assert_eq!(format_elapsed(Duration::from_millis(40), 0), "40ms");
        assert_eq!(format_elapsed(Duration::from_secs(2), 5), "2.00초 (초당 2.5개)");
        assert_eq!(
            format_elapsed(Duration::from_secs(125), 250),
            "2분 05초 (초당 2.0개)"
        );
        assert_eq!(format_elapsed(Duration::ZERO, 3), "0ms");
    }

    #[test]
    fn test_count_by_kind() {
        let failures: Vec<RenameError> = [
            RenameErrorKind::TargetExists,
            RenameErrorKind::PermissionDenied,
            RenameErrorKind::TargetExists,
        ]
        .into_iter()
        .map(|kind| outcome("x", "y", Err(kind)).result.unwrap_err())
        .collect();

        assert_eq!(
            count_by_kind(&failures),
            vec![
                (RenameErrorKind::TargetExists, 2),
                (RenameErrorKind::PermissionDenied, 1),
            ]
        );
    }

    #[test]
    fn test_statistics_record() {
        let mut stats = Statistics::new(4);

        stats.record(&outcome("a%20", "a ", Ok("a ")));
        stats.record(&outcome("b%20", "b ", Ok("b (1)")));
        stats.record(&outcome("c", "c", Ok("c")));
        stats.record(&outcome("d%20", "d ", Err(RenameErrorKind::PermissionDenied)));

        assert_eq!(stats.renamed, 2);
        assert_eq!(stats.numbered, 1);
        assert_eq!(stats.unchanged, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.processed(), 4);
    }

    #[test]
    fn test_write_error_log() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let log_path = temp_dir.path().join("errors.log");
        let failure = outcome("d%20", "d ", Err(RenameErrorKind::PermissionDenied))
            .result
            .unwrap_err();

        write_error_log(&log_path, &[failure]).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("총 에러 수: 1"));
        assert!(content.contains("  - 권한 없음: 1"));
        assert!(content.contains("d%20"));
        assert!(content.contains("권한 없음"));
    }

    #[test]
    fn test_write_error_log_bad_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let log_path = temp_dir.path().join("missing").join("errors.log");

        assert!(matches!(
            write_error_log(&log_path, &[]),
            Err(SanitizeError::LogWrite { .. })
        ));
    }

    #[test]
    fn test_finish_freezes_elapsed() {
        let mut stats = Statistics::new(0);
        stats.finish();
        let first = stats.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(stats.elapsed(), first);
    }
}
