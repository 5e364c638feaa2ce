//! 확인 프롬프트 모듈
//!
//! 작업 실행 전 사용자에게 y/n 확인을 받습니다.

use std::io::{self, BufRead, Write};

/// 진행 여부 질문 문구
pub const PROCEED_QUESTION: &str = "Proceed with renaming? (y/n): ";

/// 입력이 진행 승인(`y`/`Y`)인지 확인
///
/// 줄바꿈만 제거하고 나머지는 정확히 비교합니다.
///
/// # Examples
/// ```
/// use namefix::prompt::is_affirmative;
///
/// assert!(is_affirmative("y\n"));
/// assert!(is_affirmative("Y"));
/// assert!(!is_affirmative("yes"));
/// ```
pub fn is_affirmative(answer: &str) -> bool {
    answer
        .trim_end_matches(['\r', '\n'])
        .eq_ignore_ascii_case("y")
}

/// 질문을 출력하고 한 줄을 읽어 승인 여부를 반환
///
/// 입력이 끝나면(EOF) 거절로 취급합니다.
pub fn ask<R, W>(reader: &mut R, writer: &mut W, question: &str) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    write!(writer, "{}", question)?;
    writer.flush()?;

    let mut answer = String::new();
    if reader.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    Ok(is_affirmative(&answer))
}
