//! CodeMart / CodeStore 前端应用
//!
//! 采用 Context-Driven 架构：
//! - `web::route`: 路由定义与访问守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `api`: 类型化的后端客户端
//! - `auth` / `session`: 会话状态与持久化
//! - `components`: UI 组件层

#[macro_use]
mod logging;

mod admin;
mod api;
mod auth;
mod checkout;
mod config;
mod display;
mod error;
mod loadable;
mod notify;
mod serde_helper;
mod session;

mod components {
    pub mod admin_dashboard;
    pub mod auth_page;
    pub mod home;
    mod icons;
    mod navbar;
    pub mod product_detail;
    mod project_card;
    mod review_dialog;
    pub mod toaster;
    pub mod user_dashboard;
}

// 原生 Web API 封装模块
pub(crate) mod web;

use crate::auth::{AuthContext, init_auth};
use crate::components::admin_dashboard::AdminDashboardPage;
use crate::components::auth_page::AuthPage;
use crate::components::home::HomePage;
use crate::components::product_detail::ProductDetailPage;
use crate::components::toaster::Toaster;
use crate::components::user_dashboard::{DownloadPage, UserDashboardPage};
use crate::config::AppConfig;
use crate::notify::Notifier;

use leptos::prelude::*;

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::ProductDetail(id) => view! { <ProductDetailPage id=id /> }.into_any(),
        AppRoute::Auth => view! { <AuthPage /> }.into_any(),
        AppRoute::Dashboard => view! { <UserDashboardPage /> }.into_any(),
        AppRoute::Download(order_id) => view! { <DownloadPage order_id=order_id /> }.into_any(),
        AppRoute::Admin => view! { <AdminDashboardPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"Page not found"</p>
                    <Link to="/" class="btn btn-primary">"Back to Home"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 构建期配置
    let config = AppConfig::from_build_env();
    let variant = config.variant;
    log_info!("[App] {} -> {}", variant.brand(), config.api_base());
    provide_context(config);

    // 2. 全局提示
    provide_context(Notifier::new());

    // 3. 认证上下文，从 LocalStorage 恢复会话
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    init_auth(&auth_ctx, variant);

    // 4. 访问级别信号注入路由服务，路由本身不依赖认证模块
    let access = auth_ctx.access_signal();

    view! {
        <Router access=access>
            <RouterOutlet matcher=route_matcher />
        </Router>
        <Toaster />
    }
}
