/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - 起動時に組み立てた TokenAuthorizer (鍵 + 設定, 読み取り専用)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::authorizer::TokenAuthorizer;

#[derive(Clone, Debug)]
pub struct AppState {
    pub authorizer: Arc<TokenAuthorizer>,
}

impl AppState {
    pub fn new(authorizer: Arc<TokenAuthorizer>) -> Self {
        Self { authorizer }
    }
}
