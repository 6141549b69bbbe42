use crate::auth::{Credentials, LANDING_PATH, sign_in, use_auth};
use crate::components::icons::Code;
use crate::config::use_config;
use crate::notify::use_notifier;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthTab {
    Login,
    Register,
}

#[component]
pub fn AuthPage() -> impl IntoView {
    let auth = use_auth();
    let config = use_config();
    let router = use_router();
    let notifier = use_notifier();
    let variant = config.variant;
    // 管理端只提供登录
    let allow_register = !variant.uses_admin_login();
    let config = StoredValue::new(config);

    let (tab, set_tab) = signal(AuthTab::Login);
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let current = tab.get_untracked();
        let credentials = match current {
            AuthTab::Login => Credentials::Login {
                email: email.get_untracked(),
                password: password.get_untracked(),
            },
            AuthTab::Register => Credentials::Register {
                name: name.get_untracked(),
                email: email.get_untracked(),
                password: password.get_untracked(),
            },
        };
        let (success, failure) = match current {
            AuthTab::Login => ("Login successful!", "Login failed"),
            AuthTab::Register => ("Registration successful!", "Registration failed"),
        };

        set_is_submitting.set(true);
        let config = config.get_value();
        spawn_local(async move {
            match sign_in(auth, config, credentials).await {
                Ok(_) => {
                    notifier.success(success);
                    router.navigate(LANDING_PATH);
                }
                Err(e) => {
                    log_warn!("[Auth] {}: {}", failure, e);
                    notifier.error(e.message_or(failure));
                }
            }
            set_is_submitting.try_set(false);
        });
    };

    let tab_class = move |target: AuthTab| {
        move || {
            if tab.get() == target {
                "tab tab-active"
            } else {
                "tab"
            }
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Code attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">{variant.brand()}</h1>
                        <p class="text-base-content/70">"Login or create an account to continue"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <div class="card-body">
                        <div role="tablist" class="tabs tabs-boxed">
                            <a role="tab" class=tab_class(AuthTab::Login) on:click=move |_| set_tab.set(AuthTab::Login)>
                                "Login"
                            </a>
                            <Show when=move || allow_register>
                                <a role="tab" class=tab_class(AuthTab::Register) on:click=move |_| set_tab.set(AuthTab::Register)>
                                    "Register"
                                </a>
                            </Show>
                        </div>

                        <form class="space-y-2" on:submit=on_submit>
                            <Show when=move || tab.get() == AuthTab::Register>
                                <div class="form-control">
                                    <label class="label" for="name">
                                        <span class="label-text">"Full Name"</span>
                                    </label>
                                    <input
                                        id="name"
                                        type="text"
                                        placeholder="John Doe"
                                        on:input=move |ev| name.set(event_target_value(&ev))
                                        prop:value=move || name.get()
                                        class="input input-bordered"
                                        required
                                    />
                                </div>
                            </Show>
                            <div class="form-control">
                                <label class="label" for="email">
                                    <span class="label-text">"Email"</span>
                                </label>
                                <input
                                    id="email"
                                    type="email"
                                    placeholder="you@example.com"
                                    on:input=move |ev| email.set(event_target_value(&ev))
                                    prop:value=move || email.get()
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="password">
                                    <span class="label-text">"Password"</span>
                                </label>
                                <input
                                    id="password"
                                    type="password"
                                    placeholder="••••••••"
                                    on:input=move |ev| password.set(event_target_value(&ev))
                                    prop:value=move || password.get()
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control mt-6">
                                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                    {move || match (is_submitting.get(), tab.get()) {
                                        (true, _) => view! { <span class="loading loading-spinner"></span> "Please wait..." }.into_any(),
                                        (false, AuthTab::Login) => "Login".into_any(),
                                        (false, AuthTab::Register) => "Create Account".into_any(),
                                    }}
                                </button>
                            </div>
                        </form>
                    </div>
                </div>
            </div>
        </div>
    }
}
