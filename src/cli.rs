//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::Parser;
use encoding_rs::Encoding;
use std::path::PathBuf;

use crate::corrector::CorrectionRule;
use crate::error::{Result, SanitizeError};
use crate::executor::ConflictPolicy;

/// namefix CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "namefix",
    author = "YourName <your@email.com>",
    version,
    about = "FILENAME SANITIZER - 깨진 파일 이름(NFD 자모, URL 인코딩)을 일괄 복구하는 CLI 도구",
    long_about = r#"
FILENAME SANITIZER
==================

지정된 폴더 아래의 모든 파일과 폴더 이름을 검사하여
문제가 있는 이름을 찾아 확인 후 일괄 변경합니다.

작업 (-a 사용 시 아래 순서대로 실행):
  -k  유니코드 NFC 정규화 (이미 NFC인 이름은 건너뜀)
  -u  URL 퍼센트 인코딩 디코딩 (%20 → 공백)
  -f  분해된 한글 자모 합성 (이미 NFC인 이름은 건너뜀)

이름이 겹치면 "이름(1).확장자" 형식으로 번호를 붙입니다.

예제:
  namefix -a ~/Downloads
  namefix -k --dry-run ./photos
  namefix -u --encoding euc-kr ./legacy
  namefix -f -y --exclude .git ./repo
"#
)]
pub struct Args {
    /// 대상 폴더 경로 (기본값: 현재 폴더, ~ 확장 지원)
    #[arg(default_value = ".")]
    pub path: String,

    /// 모든 작업을 순서대로 실행 (-k → -u → -f)
    #[arg(short = 'a')]
    pub all: bool,

    /// 파일 이름을 NFC로 정규화
    #[arg(short = 'k')]
    pub nfc: bool,

    /// URL 인코딩된 파일 이름 디코딩
    #[arg(short = 'u')]
    pub url_decode: bool,

    /// 분해된 한글 자모 합성
    #[arg(short = 'f')]
    pub fix_decomposed: bool,

    /// 디버그 로그 활성화 (--debug=LEVEL로 레벨 지정)
    #[arg(
        long,
        value_name = "LEVEL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "debug"
    )]
    pub debug: Option<String>,

    /// 확인 없이 바로 실행
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// 변경 계획만 표시하고 실행하지 않음
    #[arg(long)]
    pub dry_run: bool,

    /// 최대 폴더 탐색 깊이
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// 제외할 이름 패턴 (glob 형식, 여러 번 지정 가능)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// URL 디코딩에 사용할 문자 인코딩
    #[arg(long, default_value = "utf-8")]
    pub encoding: String,

    /// 이미 NFC 이름의 다른 파일이 대상 이름을 차지할 때의 처리
    #[arg(long, value_enum, default_value_t = ConflictPolicy::Skip)]
    pub on_conflict: ConflictPolicy,

    /// 실패한 이름 변경을 기록할 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,
}

impl Args {
    /// 선택된 작업 규칙을 고정 순서(NFC → URL → 자모)로 반환
    ///
    /// 아무 작업도 선택되지 않으면 빈 목록입니다.
    pub fn selected_rules(&self) -> Result<Vec<CorrectionRule>> {
        let encoding = self.percent_encoding()?;
        let mut rules = Vec::new();

        if self.all || self.nfc {
            rules.push(CorrectionRule::CanonicalCompose);
        }
        if self.all || self.url_decode {
            rules.push(CorrectionRule::PercentDecode { encoding });
        }
        if self.all || self.fix_decomposed {
            rules.push(CorrectionRule::ComposeDecomposedKorean);
        }

        Ok(rules)
    }

    /// `~`를 확장한 대상 경로
    pub fn target_path(&self) -> PathBuf {
        expand_tilde(&self.path)
    }

    /// URL 디코딩 인코딩 조회
    pub fn percent_encoding(&self) -> Result<&'static Encoding> {
        let label = self.encoding.trim();
        Encoding::for_label(label.as_bytes()).ok_or_else(|| SanitizeError::UnknownEncoding {
            label: label.to_string(),
        })
    }
}

/// 앞의 `~`를 홈 폴더로 확장
///
/// `~user` 형식은 지원하지 않고 그대로 둡니다.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(path),
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(path),
    }
}
