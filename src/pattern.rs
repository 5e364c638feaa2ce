//! 제외 패턴 모듈
//!
//! glob 패턴으로 탐색에서 제외할 항목 이름을 걸러냅니다.

use glob::Pattern;

use crate::error::{Result, SanitizeError};

/// 컴파일된 제외 패턴 목록
#[derive(Debug, Clone, Default)]
pub struct ExcludeMatcher {
    patterns: Vec<Pattern>,
}

impl ExcludeMatcher {
    /// 새 제외 매처 생성
    ///
    /// # Arguments
    /// * `patterns` - 글로브 패턴 문자열 목록 (비어 있으면 아무것도 제외하지 않음)
    ///
    /// # Examples
    /// ```
    /// use namefix::pattern::ExcludeMatcher;
    ///
    /// let matcher = ExcludeMatcher::new(&[".git".to_string(), "*.tmp".to_string()]).unwrap();
    /// assert!(matcher.is_excluded(".git"));
    /// assert!(matcher.is_excluded("cache.tmp"));
    /// assert!(!matcher.is_excluded("report.pdf"));
    /// ```
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|_| SanitizeError::InvalidPattern { pattern: p.clone() })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// 항목 이름이 제외 대상인지 확인
    pub fn is_excluded(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    /// 패턴이 하나라도 설정되어 있는지 확인
    pub fn has_patterns(&self) -> bool {
        !self.patterns.is_empty()
    }
}
