//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的访问级别信号来检查权限。

use codemart_shared::protocol::{LoginRequest, RegisterRequest};
use leptos::prelude::*;

use crate::api::CodeMartApi;
use crate::config::{AppConfig, Variant};
use crate::error::ApiResult;
use crate::session::{Session, SessionStore};
use crate::web::route::Access;
use crate::web::{FetchTransport, HttpTransport, KeyValueStore, LocalStorage};

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 当前会话（只读）
    pub state: ReadSignal<Session>,
    /// 设置会话（写入）
    pub set_state: WriteSignal<Session>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(Session::default());
        Self { state, set_state }
    }

    /// 获取访问级别信号（用于路由服务注入）
    pub fn access_signal(&self) -> Signal<Access> {
        let state = self.state;
        Signal::derive(move || state.with(Session::access))
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(Session::is_authenticated)
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 刷新页面后从 LocalStorage 恢复会话。
pub fn init_auth(ctx: &AuthContext, variant: Variant) {
    let session = SessionStore::new(LocalStorage, variant).load();
    if session.is_authenticated() {
        log_info!("[Auth] Restored session ({:?})", session.access());
    }
    ctx.set_state.set(session);
}

/// 登录 / 注册成功后的落地页
pub const LANDING_PATH: &str = "/";

/// 登录或注册的表单数据
#[derive(Debug, Clone)]
pub enum Credentials {
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
}

/// 调用后端认证并持久化会话
///
/// 失败时不写入任何存储。
pub async fn authenticate<T: HttpTransport, S: KeyValueStore>(
    api: &CodeMartApi<T>,
    sessions: &SessionStore<S>,
    variant: Variant,
    credentials: Credentials,
) -> ApiResult<Session> {
    let response = match credentials {
        Credentials::Login { email, password } => {
            let request = LoginRequest { email, password };
            if variant.uses_admin_login() {
                api.admin_login(request).await?
            } else {
                api.login(request).await?
            }
        }
        Credentials::Register {
            name,
            email,
            password,
        } => {
            api.register(RegisterRequest {
                name,
                email,
                password,
            })
            .await?
        }
    };

    Ok(sessions.save(&response))
}

/// 登录 / 注册并更新认证上下文
pub async fn sign_in(
    ctx: AuthContext,
    config: AppConfig,
    credentials: Credentials,
) -> ApiResult<Session> {
    let api = CodeMartApi::new(&config, None, FetchTransport);
    let sessions = SessionStore::new(LocalStorage, config.variant);

    let session = authenticate(&api, &sessions, config.variant, credentials).await?;
    log_info!("[Auth] Signed in as {:?}", session.access());
    ctx.set_state.set(session.clone());
    Ok(session)
}

/// 登出：清除存储并重置状态
pub fn logout(ctx: AuthContext, variant: Variant) {
    SessionStore::new(LocalStorage, variant).clear();
    ctx.set_state.set(Session::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{api_with, url};
    use crate::web::{HttpMethod, MemoryStore};
    use serde_json::json;

    fn auth_body(role: &str) -> serde_json::Value {
        json!({
            "access_token": "tok-1",
            "token_type": "bearer",
            "user": { "id": "u1", "name": "Ravi", "email": "ravi@example.com", "role": role }
        })
    }

    fn login(email: &str, password: &str) -> Credentials {
        Credentials::Login {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_valid_login_stores_token_and_user() {
        let api = api_with(None);
        api.transport()
            .mock_response(HttpMethod::Post, &url("/auth/login"), 200, auth_body("user"));
        let sessions = SessionStore::new(MemoryStore::new(), Variant::CodeMart);

        let session = authenticate(&api, &sessions, Variant::CodeMart, login("ravi@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(session.access(), Access::Customer);
        assert_eq!(sessions.store().get("token").as_deref(), Some("tok-1"));
        assert!(sessions.store().get("user").unwrap().contains("Ravi"));

        let body = api.transport().recorded()[0].json();
        assert_eq!(body, json!({ "email": "ravi@example.com", "password": "pw" }));
    }

    #[tokio::test]
    async fn test_signed_in_customer_lands_on_home_and_reaches_dashboard() {
        use crate::web::route::AppRoute;
        use crate::web::router::route_for;

        let api = api_with(None);
        api.transport()
            .mock_response(HttpMethod::Post, &url("/auth/login"), 200, auth_body("user"));
        let sessions = SessionStore::new(MemoryStore::new(), Variant::CodeMart);

        let session = authenticate(&api, &sessions, Variant::CodeMart, login("ravi@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(route_for(LANDING_PATH, session.access()), (AppRoute::Home, false));
        assert_eq!(
            route_for("/dashboard", session.access()),
            (AppRoute::Dashboard, false)
        );
        assert_eq!(route_for("/admin", session.access()), (AppRoute::Home, true));
    }

    #[test]
    fn test_context_access_follows_session() {
        let owner = Owner::new();
        owner.set();

        let ctx = AuthContext::new();
        let access = ctx.access_signal();
        assert_eq!(access.get_untracked(), Access::Anonymous);
        assert!(!ctx.state.with_untracked(Session::is_authenticated));

        let sessions = SessionStore::new(MemoryStore::new(), Variant::CodeStore);
        let response: codemart_shared::AuthResponse =
            serde_json::from_value(auth_body("admin")).unwrap();
        ctx.set_state.set(sessions.save(&response));
        assert_eq!(access.get_untracked(), Access::Admin);

        ctx.set_state.set(Session::default());
        assert_eq!(access.get_untracked(), Access::Anonymous);
    }

    #[tokio::test]
    async fn test_invalid_login_stores_nothing() {
        let api = api_with(None);
        api.transport().mock_response(
            HttpMethod::Post,
            &url("/auth/login"),
            401,
            json!({ "detail": "Invalid credentials" }),
        );
        let sessions = SessionStore::new(MemoryStore::new(), Variant::CodeMart);

        let err = authenticate(&api, &sessions, Variant::CodeMart, login("x@example.com", "bad"))
            .await
            .unwrap_err();

        assert_eq!(err.message_or("Authentication failed"), "Invalid credentials");
        assert!(sessions.store().is_empty());
    }

    #[tokio::test]
    async fn test_codestore_login_uses_admin_endpoint() {
        let api = api_with(None);
        api.transport()
            .mock_response(HttpMethod::Post, &url("/admin/login"), 200, auth_body("admin"));
        let sessions = SessionStore::new(MemoryStore::new(), Variant::CodeStore);

        let session = authenticate(&api, &sessions, Variant::CodeStore, login("a@b.c", "pw"))
            .await
            .unwrap();

        assert_eq!(session.access(), Access::Admin);
        assert_eq!(sessions.store().get("admin_token").as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn test_register_posts_name() {
        let api = api_with(None);
        api.transport()
            .mock_response(HttpMethod::Post, &url("/auth/register"), 200, auth_body("user"));
        let sessions = SessionStore::new(MemoryStore::new(), Variant::CodeMart);

        let credentials = Credentials::Register {
            name: "Ravi".into(),
            email: "ravi@example.com".into(),
            password: "pw".into(),
        };
        authenticate(&api, &sessions, Variant::CodeMart, credentials)
            .await
            .unwrap();

        assert_eq!(api.transport().recorded()[0].json()["name"], "Ravi");
        assert!(!sessions.store().is_empty());
    }
}
