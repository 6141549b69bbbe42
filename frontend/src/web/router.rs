//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 导航流程："请求 -> 守卫 -> 写入 History -> 更新信号"。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{Access, AppRoute};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于守卫重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 守卫后的最终路由
fn resolve(target: AppRoute, access: Access) -> AppRoute {
    match target.guard(access) {
        Some(redirect) => {
            log_info!("[Router] {} denied for {:?}, redirecting to {}", target, access, redirect);
            redirect
        }
        None => target,
    }
}

/// 解析路径并执行守卫；第二项为 true 时地址栏需要改写为最终路由
pub(crate) fn route_for(path: &str, access: Access) -> (AppRoute, bool) {
    let requested = AppRoute::from_path(path);
    let route = resolve(requested.clone(), access);
    let redirected = route != requested;
    (route, redirected)
}

/// 访问级别变化后，当前页面是否还能停留
fn access_redirect(route: &AppRoute, access: Access) -> Option<AppRoute> {
    let redirect = route.guard(access)?;
    log_info!("[Router] Access changed to {:?}, leaving {}", access, route);
    Some(redirect)
}

/// 路由器服务
///
/// 通过注入访问级别信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    access: Signal<Access>,
}

impl RouterService {
    fn new(access: Signal<Access>) -> Self {
        let (initial, redirected) = route_for(&current_path(), access.get_untracked());
        if redirected {
            replace_history_state(&initial.to_path());
        }
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            access,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        let (route, _) = route_for(path, self.access.get_untracked());
        push_history_state(&route.to_path());
        self.set_route.set(route);
    }

    /// 浏览器后退/前进按钮
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let access = self.access;

        let closure = Closure::<dyn Fn()>::new(move || {
            let (route, redirected) = route_for(&current_path(), access.get_untracked());
            if redirected {
                replace_history_state(&route.to_path());
            }
            set_route.set(route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 访问级别变化（登出、切换账号）时重新执行守卫
    fn setup_access_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let access = self.access;

        Effect::new(move |_| {
            let level = access.get();
            if let Some(redirect) = current_route.with_untracked(|route| access_redirect(route, level)) {
                push_history_state(&redirect.to_path());
                set_route.set(redirect);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(access: Signal<Access>) -> RouterService {
    let router = RouterService::new(access);

    router.init_popstate_listener();
    router.setup_access_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 访问级别信号
    access: Signal<Access>,
    children: Children,
) -> impl IntoView {
    provide_router(access);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：拦截点击，走路由服务而不是整页刷新
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_admin_visit_lands_on_auth() {
        assert_eq!(route_for("/admin", Access::Anonymous), (AppRoute::Auth, true));
        assert_eq!(route_for("/dashboard", Access::Anonymous), (AppRoute::Auth, true));
    }

    #[test]
    fn test_customer_admin_visit_lands_on_home() {
        assert_eq!(route_for("/admin", Access::Customer), (AppRoute::Home, true));
        assert_eq!(route_for("/dashboard", Access::Customer), (AppRoute::Dashboard, false));
    }

    #[test]
    fn test_admin_reaches_every_page() {
        for path in ["/", "/admin", "/dashboard", "/product/p1", "/download/o1"] {
            let (route, redirected) = route_for(path, Access::Admin);
            assert!(!redirected, "{path} redirected to {route}");
            assert_eq!(route, AppRoute::from_path(path));
        }
    }

    #[test]
    fn test_unknown_path_renders_not_found() {
        assert_eq!(route_for("/nope", Access::Anonymous), (AppRoute::NotFound, false));
    }

    #[test]
    fn test_logout_leaves_protected_pages() {
        assert_eq!(
            access_redirect(&AppRoute::Admin, Access::Anonymous),
            Some(AppRoute::Auth)
        );
        assert_eq!(
            access_redirect(&AppRoute::Dashboard, Access::Anonymous),
            Some(AppRoute::Auth)
        );
        assert_eq!(access_redirect(&AppRoute::Home, Access::Anonymous), None);
        assert_eq!(
            access_redirect(&AppRoute::ProductDetail("p1".into()), Access::Anonymous),
            None
        );
    }

    #[test]
    fn test_account_switch_demotes_admin_page() {
        assert_eq!(
            access_redirect(&AppRoute::Admin, Access::Customer),
            Some(AppRoute::Home)
        );
        assert_eq!(access_redirect(&AppRoute::Admin, Access::Admin), None);
    }
}
