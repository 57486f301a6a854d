use crate::ports::{BookRepository, LoanRepository, MemberRepository};
use std::sync::Arc;
use tokio::sync::Mutex;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞いは持たず、アプリケーション層の関数に引数として渡す。
///
/// `write_lock`は「確認してから更新する」操作（貸出登録、返却、削除など）を
/// 直列化するためのロック。確認と更新の間に別のリクエストが割り込むと、
/// 同じ書籍が二重に貸し出されるなど不変条件が壊れる。
/// 参照系のクエリはロックを取らない。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub members: Arc<dyn MemberRepository>,
    pub books: Arc<dyn BookRepository>,
    pub loans: Arc<dyn LoanRepository>,
    pub write_lock: Arc<Mutex<()>>,
}

impl ServiceDependencies {
    /// 3つのリポジトリをすべて実装するストレージから依存関係を組み立てる
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: MemberRepository + BookRepository + LoanRepository + 'static,
    {
        Self {
            members: store.clone(),
            books: store.clone(),
            loans: store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}
