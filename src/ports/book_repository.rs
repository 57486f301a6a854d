use crate::domain::{Book, BookCode};
use async_trait::async_trait;

use super::Result;

/// 書籍リポジトリポート
///
/// 蔵書レコードの永続化を抽象化する。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// コードで書籍を検索する
    async fn find(&self, code: &BookCode) -> Result<Option<Book>>;

    /// 全書籍をコード順で取得する
    async fn list(&self) -> Result<Vec<Book>>;

    /// 書籍を追加する
    ///
    /// 同じコードの書籍が既に存在する場合は何もせず`false`を返す。
    async fn insert(&self, book: Book) -> Result<bool>;

    /// 書籍を置き換える
    ///
    /// 該当コードの書籍が存在しない場合は`false`を返す。
    async fn update(&self, book: Book) -> Result<bool>;

    /// 書籍を削除する
    ///
    /// 該当コードの書籍が存在しない場合は`false`を返す。
    async fn delete(&self, code: &BookCode) -> Result<bool>;
}
