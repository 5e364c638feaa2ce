//! 이름 교정 규칙 모듈
//!
//! 파일 이름 하나를 받아 "변경 불필요" 또는 교정된 이름을 돌려주는
//! 순수 함수들을 정의합니다. 모든 규칙은 I/O가 없고 항상 결과를 냅니다.

use encoding_rs::{Encoding, UTF_8};
use percent_encoding::percent_decode_str;
use unicode_normalization::{is_nfc, UnicodeNormalization};

/// 현대 한글 자모 블록 (U+1100 ~ U+11FF)
const HANGUL_JAMO: std::ops::RangeInclusive<char> = '\u{1100}'..='\u{11FF}';

/// 이름 교정 규칙
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionRule {
    /// 유니코드 정규 합성 (NFC)
    CanonicalCompose,
    /// URL 퍼센트 디코딩
    PercentDecode {
        /// `%XX` 바이트를 해석할 문자 인코딩
        encoding: &'static Encoding,
    },
    /// 분해된 한글 자모 합성
    ComposeDecomposedKorean,
}

impl CorrectionRule {
    /// UTF-8 퍼센트 디코딩 규칙
    pub fn percent_decode() -> Self {
        CorrectionRule::PercentDecode { encoding: UTF_8 }
    }

    /// 이름에 규칙을 적용
    ///
    /// # Returns
    /// 교정된 이름 (입력과 다를 때만), 변경이 필요 없으면 `None`
    ///
    /// # Examples
    /// ```
    /// use namefix::CorrectionRule;
    ///
    /// let rule = CorrectionRule::percent_decode();
    /// assert_eq!(rule.correct("a%20b.txt"), Some("a b.txt".to_string()));
    /// assert_eq!(rule.correct("plain.txt"), None);
    /// ```
    pub fn correct(&self, name: &str) -> Option<String> {
        match self {
            CorrectionRule::CanonicalCompose => compose_nfc(name),
            CorrectionRule::PercentDecode { encoding } => decode_percent(name, encoding),
            CorrectionRule::ComposeDecomposedKorean => compose_decomposed_korean(name),
        }
    }

    /// 이미 NFC인 이름을 규칙 적용 전에 건너뛸지 여부
    pub fn ignore_already_canonical(&self) -> bool {
        match self {
            CorrectionRule::CanonicalCompose | CorrectionRule::ComposeDecomposedKorean => true,
            CorrectionRule::PercentDecode { .. } => false,
        }
    }

    /// 로그/요약에 쓰이는 규칙 이름
    pub fn label(&self) -> &'static str {
        match self {
            CorrectionRule::CanonicalCompose => "NFC 정규화",
            CorrectionRule::PercentDecode { .. } => "URL 디코딩",
            CorrectionRule::ComposeDecomposedKorean => "분해된 한글 합성",
        }
    }
}

impl std::fmt::Display for CorrectionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrectionRule::PercentDecode { encoding } if *encoding != UTF_8 => {
                write!(f, "{} ({})", self.label(), encoding.name())
            }
            _ => write!(f, "{}", self.label()),
        }
    }
}

/// 이름이 이미 NFC 형태인지 확인
pub fn is_canonical(name: &str) -> bool {
    is_nfc(name)
}

/// 이름에 분해된 한글 자모가 포함되어 있는지 확인
pub fn has_decomposed_korean(name: &str) -> bool {
    name.chars().any(|c| HANGUL_JAMO.contains(&c))
}

fn compose_nfc(name: &str) -> Option<String> {
    if is_nfc(name) {
        return None;
    }
    let composed: String = name.nfc().collect();
    (composed != name).then_some(composed)
}

fn compose_decomposed_korean(name: &str) -> Option<String> {
    if !has_decomposed_korean(name) {
        return None;
    }
    compose_nfc(name)
}

/// `%XX` 시퀀스를 바이트로 풀고 주어진 인코딩으로 해석
///
/// 해당 인코딩에서 깨진 바이트열이 되면 이름을 건드리지 않습니다.
fn decode_percent(name: &str, encoding: &'static Encoding) -> Option<String> {
    if !name.contains('%') {
        return None;
    }

    let bytes: Vec<u8> = percent_decode_str(name).collect();
    let decoded = encoding.decode_without_bom_handling_and_without_replacement(&bytes)?;

    (decoded != name).then(|| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nfd(s: &str) -> String {
        s.nfd().collect()
    }

    #[test]
    fn test_compose_nfd_latin() {
        let decomposed = nfd("café.txt");
        assert_ne!(decomposed, "café.txt");

        let rule = CorrectionRule::CanonicalCompose;
        assert_eq!(rule.correct(&decomposed), Some("café.txt".to_string()));
        assert_eq!(rule.correct("café.txt"), None);
    }

    #[test]
    fn test_compose_matches_nfc() {
        let rule = CorrectionRule::CanonicalCompose;
        for s in ["", "abc", "한글.txt", "e\u{301}", "\u{212B}", "A\u{30A}\u{301}"] {
            let expected: String = s.nfc().collect();
            match rule.correct(s) {
                Some(fixed) => assert_eq!(fixed, expected),
                None => assert_eq!(expected, s),
            }
        }
    }

    #[test]
    fn test_percent_decode_basic() {
        let rule = CorrectionRule::percent_decode();
        assert_eq!(rule.correct("a%20b.txt"), Some("a b.txt".to_string()));
        assert_eq!(
            rule.correct("%ED%95%9C%EA%B8%80.txt"),
            Some("한글.txt".to_string())
        );
    }

    #[test]
    fn test_percent_decode_no_escape() {
        let rule = CorrectionRule::percent_decode();
        assert_eq!(rule.correct("report.pdf"), None);
        assert_eq!(rule.correct("100%.txt"), None);
        assert_eq!(rule.correct("50%zz.txt"), None);
    }

    #[test]
    fn test_percent_decode_invalid_utf8() {
        let rule = CorrectionRule::percent_decode();
        assert_eq!(rule.correct("%FF%FE.txt"), None);
    }

    #[test]
    fn test_percent_decode_euc_kr() {
        let euc_kr = Encoding::for_label(b"euc-kr").unwrap();
        let rule = CorrectionRule::PercentDecode { encoding: euc_kr };
        // "한" = 0xC7 0xD1 (EUC-KR)
        assert_eq!(rule.correct("%C7%D1.txt"), Some("한.txt".to_string()));
    }

    #[test]
    fn test_korean_jamo_detection() {
        let decomposed = nfd("한글");
        assert!(has_decomposed_korean(&decomposed));
        assert!(!has_decomposed_korean("한글"));
        assert!(!has_decomposed_korean("hello"));
    }

    #[test]
    fn test_compose_decomposed_korean() {
        let rule = CorrectionRule::ComposeDecomposedKorean;
        let decomposed = nfd("보고서.pdf");

        assert_eq!(rule.correct(&decomposed), Some("보고서.pdf".to_string()));
        assert_eq!(rule.correct("보고서.pdf"), None);
        // 자모가 없으면 다른 NFD 문자는 건드리지 않음
        assert_eq!(rule.correct(&nfd("café")), None);
    }

    #[test]
    fn test_standalone_jamo_stays() {
        // 단독 초성은 이미 NFC이므로 변경 없음
        let rule = CorrectionRule::ComposeDecomposedKorean;
        assert_eq!(rule.correct("\u{1100}"), None);
    }

    #[test]
    fn test_ignore_already_canonical_flags() {
        assert!(CorrectionRule::CanonicalCompose.ignore_already_canonical());
        assert!(CorrectionRule::ComposeDecomposedKorean.ignore_already_canonical());
        assert!(!CorrectionRule::percent_decode().ignore_already_canonical());
    }
}
