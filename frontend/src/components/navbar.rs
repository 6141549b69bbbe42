use crate::auth::{logout, use_auth};
use crate::components::icons::{Code, LogOut};
use crate::config::use_config;
use crate::notify::use_notifier;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let config = use_config();
    let router = use_router();
    let notifier = use_notifier();
    let variant = config.variant;

    let is_authenticated = move || auth.state.with(|s| s.is_authenticated());
    let is_admin = move || auth.state.with(|s| s.is_admin());

    let on_logout = move |_| {
        logout(auth, variant);
        notifier.success("Logged out");
        router.navigate("/");
    };

    view! {
        <div class="navbar bg-base-100 shadow-md sticky top-0 z-40 px-4 md:px-8">
            <div class="flex-1">
                <Link to="/" class="btn btn-ghost gap-2 text-xl">
                    <Code attr:class="h-7 w-7 text-primary" />
                    <span class="font-bold">{variant.brand()}</span>
                </Link>
            </div>
            <div class="flex-none gap-2">
                <Show when=is_admin>
                    <Link to="/admin" class="btn btn-outline btn-sm">"Admin Dashboard"</Link>
                </Show>
                <Show
                    when=is_authenticated
                    fallback=|| view! {
                        <Link to="/auth" class="btn btn-primary btn-sm">"Login / Sign Up"</Link>
                    }
                >
                    <Link to="/dashboard" class="btn btn-outline btn-sm">"My Purchases"</Link>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" /> "Logout"
                    </button>
                </Show>
            </div>
        </div>
    }
}
