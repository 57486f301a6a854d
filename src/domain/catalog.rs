use serde::{Deserialize, Serialize};

use super::{BookCode, MemberCode, ValidationError};

/// 空白のみの文字列を`None`として扱う
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 会員（利用者）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub code: MemberCode,
    pub name: String,
}

impl Member {
    /// 会員を作成する
    ///
    /// 名前は前後の空白を取り除き、空であればエラー。
    pub fn new(code: MemberCode, name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            code,
            name: name.to_string(),
        })
    }

    /// 名前を変更した新しい会員を返す
    pub fn renamed(&self, name: &str) -> Result<Self, ValidationError> {
        Self::new(self.code.clone(), name)
    }
}

/// 書籍（蔵書1冊）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub code: BookCode,
    pub title: String,
    pub author: Option<String>,
    /// 配架場所
    pub shelf: Option<String>,
}

impl Book {
    /// 書籍を作成する
    ///
    /// タイトルは必須。著者と配架場所は空白のみなら`None`になる。
    pub fn new(
        code: BookCode,
        title: &str,
        author: Option<String>,
        shelf: Option<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Self {
            code,
            title: title.to_string(),
            author: non_blank(author),
            shelf: non_blank(shelf),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_new_trims_name() {
        let member = Member::new(MemberCode::parse("U1").unwrap(), "  Alice ").unwrap();
        assert_eq!(member.name, "Alice");
    }

    #[test]
    fn test_member_new_rejects_blank_name() {
        let result = Member::new(MemberCode::parse("U1").unwrap(), " ");
        assert_eq!(result, Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_member_renamed_keeps_code() {
        let member = Member::new(MemberCode::parse("U1").unwrap(), "Alice").unwrap();
        let renamed = member.renamed("Alicia").unwrap();
        assert_eq!(renamed.code, member.code);
        assert_eq!(renamed.name, "Alicia");
    }

    #[test]
    fn test_book_new_drops_blank_optional_fields() {
        let book = Book::new(
            BookCode::parse("B1").unwrap(),
            "Dune",
            Some("  ".to_string()),
            Some(" A-3 ".to_string()),
        )
        .unwrap();
        assert_eq!(book.author, None);
        assert_eq!(book.shelf.as_deref(), Some("A-3"));
    }

    #[test]
    fn test_book_new_rejects_blank_title() {
        let result = Book::new(BookCode::parse("B1").unwrap(), "", None, None);
        assert_eq!(result, Err(ValidationError::EmptyTitle));
    }
}
