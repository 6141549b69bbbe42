//! 会话持久化
//!
//! 令牌与用户信息保存在键值存储中（浏览器里即 LocalStorage），
//! 令牌键随店面变体不同（`token` / `admin_token`）。

use codemart_shared::{AuthResponse, User};

use crate::config::Variant;
use crate::web::KeyValueStore;
use crate::web::route::Access;

const USER_KEY: &str = "user";

/// 当前登录会话
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// 路由守卫使用的访问级别
    pub fn access(&self) -> Access {
        match (self.is_authenticated(), self.is_admin()) {
            (false, _) => Access::Anonymous,
            (true, true) => Access::Admin,
            (true, false) => Access::Customer,
        }
    }
}

pub struct SessionStore<S: KeyValueStore> {
    store: S,
    token_key: &'static str,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S, variant: Variant) -> Self {
        Self {
            store,
            token_key: variant.token_key(),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(self.token_key).filter(|t| !t.is_empty())
    }

    /// 读取已保存的会话；用户信息损坏时视为未保存
    pub fn load(&self) -> Session {
        let token = self.token();
        let user = self
            .store
            .get(USER_KEY)
            .and_then(|raw| match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    log_warn!("[Session] Discarding malformed stored user: {}", e);
                    None
                }
            });
        Session { token, user }
    }

    pub fn save(&self, auth: &AuthResponse) -> Session {
        self.store.set(self.token_key, &auth.access_token);
        match serde_json::to_string(&auth.user) {
            Ok(raw) => {
                self.store.set(USER_KEY, &raw);
            }
            Err(e) => log_error!("[Session] Failed to serialize user: {}", e),
        }
        Session {
            token: Some(auth.access_token.clone()),
            user: Some(auth.user.clone()),
        }
    }

    pub fn clear(&self) {
        self.store.delete(self.token_key);
        self.store.delete(USER_KEY);
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MemoryStore;
    use codemart_shared::Role;

    fn auth(role: Role) -> AuthResponse {
        AuthResponse {
            access_token: "tok-42".into(),
            refresh_token: None,
            token_type: Some("bearer".into()),
            user: User {
                id: "u1".into(),
                name: "Asha".into(),
                email: "asha@example.com".into(),
                role,
            },
        }
    }

    #[test]
    fn test_save_then_load() {
        let sessions = SessionStore::new(MemoryStore::new(), Variant::CodeMart);
        let saved = sessions.save(&auth(Role::User));

        assert_eq!(sessions.store().get("token").as_deref(), Some("tok-42"));
        assert_eq!(sessions.load(), saved);
        assert_eq!(saved.access(), Access::Customer);
    }

    #[test]
    fn test_variant_token_key() {
        let sessions = SessionStore::new(MemoryStore::new(), Variant::CodeStore);
        sessions.save(&auth(Role::Admin));

        assert!(sessions.store().get("token").is_none());
        assert_eq!(sessions.token().as_deref(), Some("tok-42"));
        assert_eq!(sessions.load().access(), Access::Admin);
    }

    #[test]
    fn test_clear_removes_everything() {
        let sessions = SessionStore::new(MemoryStore::new(), Variant::CodeMart);
        sessions.save(&auth(Role::User));
        sessions.clear();

        assert!(sessions.store().is_empty());
        assert_eq!(sessions.load(), Session::default());
        assert_eq!(Session::default().access(), Access::Anonymous);
    }

    #[test]
    fn test_malformed_user_is_ignored() {
        let store = MemoryStore::new();
        store.set("token", "tok");
        store.set("user", "{not json");
        let session = SessionStore::new(store, Variant::CodeMart).load();

        assert!(session.is_authenticated());
        assert!(session.user.is_none());
        assert_eq!(session.access(), Access::Customer);
    }
}
