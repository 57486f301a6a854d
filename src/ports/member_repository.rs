use crate::domain::{Member, MemberCode};
use async_trait::async_trait;

use super::Result;

/// 会員リポジトリポート
///
/// 会員レコードの永続化を抽象化する。
/// フラットファイルと組み込みDBのどちらの実装でも同じ振る舞いをする。
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// コードで会員を検索する
    async fn find(&self, code: &MemberCode) -> Result<Option<Member>>;

    /// 全会員をコード順で取得する
    async fn list(&self) -> Result<Vec<Member>>;

    /// 会員を追加する
    ///
    /// 同じコードの会員が既に存在する場合は何もせず`false`を返す。
    async fn insert(&self, member: Member) -> Result<bool>;

    /// 会員を置き換える
    ///
    /// 該当コードの会員が存在しない場合は`false`を返す。
    async fn update(&self, member: Member) -> Result<bool>;

    /// 会員を削除する
    ///
    /// 該当コードの会員が存在しない場合は`false`を返す。
    async fn delete(&self, code: &MemberCode) -> Result<bool>;
}
