//! 에러 타입 정의 모듈
//!
//! namefix에서 발생할 수 있는 에러 타입을 정의합니다.
//! 작업 전체를 중단시키는 [`SanitizeError`]와, 개별 이름 변경 하나만
//! 실패로 처리되는 [`RenameError`]를 구분합니다.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// namefix에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum SanitizeError {
    /// 대상 폴더가 존재하지 않음
    #[error("대상 폴더를 찾을 수 없습니다: {path}")]
    RootNotFound { path: PathBuf },

    /// 대상이 폴더가 아님
    #[error("대상 경로가 폴더가 아닙니다: {path}")]
    NotADirectory { path: PathBuf },

    /// 탐색 중 개별 항목 접근 실패
    #[error("항목을 탐색할 수 없습니다 ({path}): {reason}")]
    Scan { path: PathBuf, reason: String },

    /// 유효하지 않은 제외 패턴
    #[error("유효하지 않은 패턴: {pattern}")]
    InvalidPattern { pattern: String },

    /// 알 수 없는 문자 인코딩 이름
    #[error("알 수 없는 인코딩: {label}")]
    UnknownEncoding { label: String },

    /// 알 수 없는 로그 레벨
    #[error("알 수 없는 로그 레벨: {level}")]
    InvalidLogLevel { level: String },

    /// 확인 프롬프트 입출력 실패
    #[error("확인 입력을 읽을 수 없습니다: {0}")]
    Prompt(#[from] io::Error),

    /// 에러 로그 파일 쓰기 실패
    #[error("에러 로그 쓰기 실패 ({path}): {reason}")]
    LogWrite { path: PathBuf, reason: String },
}

/// 이름 변경 실패 원인 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameErrorKind {
    /// 권한 없음
    PermissionDenied,
    /// 다른 장치로의 이동
    CrossDevice,
    /// 이름이 너무 김
    NameTooLong,
    /// 이미 정규화된 다른 파일이 대상 이름을 차지함
    TargetExists,
    /// 원본이 사라짐
    SourceMissing,
    /// 파일 시스템이 허용하지 않는 이름
    InvalidName,
    /// 기타 I/O 실패
    Other,
}

impl RenameErrorKind {
    /// `io::Error`를 실패 원인으로 분류
    pub fn from_io(err: &io::Error) -> Self {
        if let Some(kind) = err.raw_os_error().and_then(Self::from_errno) {
            return kind;
        }

        match err.kind() {
            io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
                Self::PermissionDenied
            }
            io::ErrorKind::AlreadyExists
            | io::ErrorKind::DirectoryNotEmpty
            | io::ErrorKind::IsADirectory
            | io::ErrorKind::NotADirectory => Self::TargetExists,
            io::ErrorKind::NotFound => Self::SourceMissing,
            io::ErrorKind::InvalidInput => Self::InvalidName,
            _ => Self::Other,
        }
    }

    // EXDEV는 Linux/macOS 공통, ENAMETOOLONG은 플랫폼별
    #[cfg(unix)]
    fn from_errno(code: i32) -> Option<Self> {
        const EXDEV: i32 = 18;
        #[cfg(target_os = "macos")]
        const ENAMETOOLONG: i32 = 63;
        #[cfg(not(target_os = "macos"))]
        const ENAMETOOLONG: i32 = 36;

        match code {
            EXDEV => Some(Self::CrossDevice),
            ENAMETOOLONG => Some(Self::NameTooLong),
            _ => None,
        }
    }

    #[cfg(not(unix))]
    fn from_errno(_code: i32) -> Option<Self> {
        None
    }
}

impl std::fmt::Display for RenameErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenameErrorKind::PermissionDenied => write!(f, "권한 없음"),
            RenameErrorKind::CrossDevice => write!(f, "다른 장치"),
            RenameErrorKind::NameTooLong => write!(f, "이름이 너무 김"),
            RenameErrorKind::TargetExists => write!(f, "대상이 이미 존재"),
            RenameErrorKind::SourceMissing => write!(f, "원본 없음"),
            RenameErrorKind::InvalidName => write!(f, "잘못된 이름"),
            RenameErrorKind::Other => write!(f, "기타"),
        }
    }
}

/// 개별 이름 변경 실패
///
/// 실패는 해당 변경 하나에만 적용되며 작업은 다음 변경으로 계속 진행합니다.
#[derive(Error, Debug, Clone)]
#[error("이름 변경 실패 [{kind}] {from} -> {to}: {reason}")]
pub struct RenameError {
    pub from: PathBuf,
    pub to: PathBuf,
    pub kind: RenameErrorKind,
    pub reason: String,
}

impl RenameError {
    /// I/O 에러로부터 생성
    pub fn io(from: PathBuf, to: PathBuf, err: &io::Error) -> Self {
        Self {
            from,
            to,
            kind: RenameErrorKind::from_io(err),
            reason: err.to_string(),
        }
    }
}

/// namefix 결과 타입 별칭
pub type Result<T> = std::result::Result<T, SanitizeError>;
