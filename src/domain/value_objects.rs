use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// コードの最大長（文字数）
pub const MAX_CODE_LENGTH: usize = 64;

/// 会員・書籍コードの共通バリデーション
///
/// 前後の空白は取り除く。空文字列、長すぎるコード、制御文字を含むコードは不正。
fn normalize_code(raw: &str) -> Result<String, ValidationError> {
    let code = raw.trim();
    if code.is_empty()
        || code.chars().count() > MAX_CODE_LENGTH
        || code.chars().any(char::is_control)
    {
        return Err(ValidationError::InvalidCode(raw.to_string()));
    }
    Ok(code.to_string())
}

/// 会員コード - 会員の一意な識別子（バーコード）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberCode(String);

impl MemberCode {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        normalize_code(raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MemberCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MemberCode> for String {
    fn from(code: MemberCode) -> Self {
        code.0
    }
}

impl fmt::Display for MemberCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 書籍コード - 蔵書1冊ごとの一意な識別子（バーコード）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookCode(String);

impl BookCode {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        normalize_code(raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BookCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BookCode> for String {
    fn from(code: BookCode) -> Self {
        code.0
    }
}

impl fmt::Display for BookCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 貸出ID
///
/// ストレージが採番する。単調増加するため、貸出の登録順序を表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(i64);

impl LoanId {
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// 次のID
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_code_trims_whitespace() {
        let code = MemberCode::parse("  U1 ").unwrap();
        assert_eq!(code.as_str(), "U1");
    }

    #[test]
    fn test_member_code_rejects_empty() {
        assert_eq!(
            MemberCode::parse("   "),
            Err(ValidationError::InvalidCode("   ".to_string()))
        );
    }

    #[test]
    fn test_book_code_rejects_control_characters() {
        assert!(BookCode::parse("B1\n").is_ok()); // 末尾の改行はtrimされる
        assert!(BookCode::parse("B\t1").is_err());
    }

    #[test]
    fn test_book_code_rejects_too_long() {
        let long = "x".repeat(MAX_CODE_LENGTH + 1);
        assert!(BookCode::parse(&long).is_err());

        let max = "x".repeat(MAX_CODE_LENGTH);
        assert!(BookCode::parse(&max).is_ok());
    }

    #[test]
    fn test_codes_deserialize_through_validation() {
        let code: BookCode = serde_json::from_str("\" B1 \"").unwrap();
        assert_eq!(code.as_str(), "B1");

        let invalid: Result<MemberCode, _> = serde_json::from_str("\"\"");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_loan_id_ordering_and_next() {
        let first = LoanId::from_i64(1);
        let second = first.next();
        assert_eq!(second.value(), 2);
        assert!(first < second);
    }
}
