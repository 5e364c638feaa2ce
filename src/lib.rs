//! namefix - FILENAME SANITIZER
//!
//! 폴더 아래의 깨진 파일 이름을 찾아 확인 후 일괄 복구하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🔤 **NFC 정규화**: macOS 등에서 NFD로 저장된 이름을 NFC로 합성
//! - 🌐 **URL 디코딩**: `a%20b.txt` 같은 퍼센트 인코딩 이름 복원 (EUC-KR 등 지원)
//! - 🇰🇷 **한글 자모 합성**: 자모 단위로 분해된 한글 이름을 음절로 합성
//! - 🔢 **충돌 방지**: 같은 이름이 있으면 `이름(1).확장자` 형식으로 번호 부여
//! - ✅ **실행 전 확인**: 작업마다 변경 목록을 보여주고 y/n 확인
//! - 📈 **진행률 및 통계**: 변경마다 진행률, 작업마다 요약 통계
//!
//! # 예제
//!
//! ```bash
//! # 모든 작업을 순서대로
//! namefix -a ~/Downloads
//!
//! # NFC 정규화만, 계획만 확인
//! namefix -k --dry-run ./photos
//! ```

pub mod cli;
pub mod corrector;
pub mod error;
pub mod executor;
pub mod logging;
pub mod pattern;
pub mod planner;
pub mod prompt;
pub mod scanner;
pub mod stats;
pub mod task;

// Re-exports for convenient access
pub use cli::{expand_tilde, Args};
pub use corrector::{has_decomposed_korean, is_canonical, CorrectionRule};
pub use error::{RenameError, RenameErrorKind, Result, SanitizeError};
pub use executor::{execute, rename_entry, ConflictPolicy, Progress, RenameOptions, RenameOutcome};
pub use pattern::ExcludeMatcher;
pub use planner::{build_plan, plan_task, Change, Plan};
pub use scanner::{walk, Entry, EntryKind, ScanOptions};
pub use stats::Statistics;
pub use task::{run_task, run_tasks, AssumeYes, Confirm, RunOptions, StdinConfirm, TaskReport, TaskStatus};
