//! 로깅 설정 모듈
//!
//! 프로세스 시작 시 한 번 tracing 구독자를 설정합니다.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::{Result, SanitizeError};

/// `--debug`가 없을 때 필터를 읽는 환경 변수
pub const LOG_ENV: &str = "NAMEFIX_LOG";

/// 로그 레벨 이름 해석
///
/// `trace`/`debug`/`info`/`warn`/`error` 외에 `warning`, `critical`과
/// 숫자 레벨(10, 20, 30, 40, 50)도 받습니다. 대소문자는 구분하지 않습니다.
///
/// # Examples
/// ```
/// use namefix::logging::parse_level;
/// use tracing::level_filters::LevelFilter;
///
/// assert_eq!(parse_level("WARNING").unwrap(), LevelFilter::WARN);
/// assert_eq!(parse_level("10").unwrap(), LevelFilter::DEBUG);
/// ```
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    let filter = match level.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" | "10" => LevelFilter::DEBUG,
        "info" | "20" => LevelFilter::INFO,
        "warn" | "warning" | "30" => LevelFilter::WARN,
        "error" | "critical" | "fatal" | "40" | "50" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => {
            return Err(SanitizeError::InvalidLogLevel {
                level: level.to_string(),
            })
        }
    };
    Ok(filter)
}

/// 로그 필터 결정
///
/// `--debug[=LEVEL]`이 주어지면 그 레벨, 아니면 환경 변수, 둘 다 없으면 `info`.
pub fn build_filter(debug: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = debug {
        let level = parse_level(level)?;
        return Ok(EnvFilter::builder()
            .with_default_directive(level.into())
            .parse_lossy(""));
    }

    Ok(EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy())
}

/// 전역 로거 초기화
pub fn init_logging(debug: Option<&str>) -> Result<()> {
    let filter = build_filter(debug)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Ok(())
}
