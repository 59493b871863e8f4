//! 顶部导航栏
//!
//! 链接按会话状态与角色裁剪；导航控件统一走 data-nav 委托，
//! 注销是本地同步操作，后续跳转由会话订阅触发。

use agrolink_shared::Role;
use leptos::prelude::*;

use crate::SessionHandle;
use crate::components::shell::SignalShell;

#[component]
pub fn NavBar() -> impl IntoView {
    let shell = use_context::<SignalShell>().expect("SignalShell not provided");
    let session_store = use_context::<SessionHandle>().expect("session store not provided");
    let session = shell.session_signal();

    view! {
        <div class="navbar bg-base-100 shadow-md px-4">
            <div class="flex-1 gap-1">
                <a class="btn btn-ghost text-xl" data-nav="welcome" href="/">
                    "AgroLink"
                </a>
                <a class="btn btn-ghost btn-sm" data-nav="marketplace" href="#marketplace">
                    "Marketplace"
                </a>
                <a class="btn btn-ghost btn-sm" data-nav="chat" href="#chat">
                    "Assistant"
                </a>
                {move || {
                    session
                        .get()
                        .authenticated
                        .then(|| {
                            view! {
                                <a class="btn btn-ghost btn-sm" data-nav="dashboard" href="#dashboard">
                                    "Dashboard"
                                </a>
                                <a class="btn btn-ghost btn-sm" data-nav="profile" href="#profile">
                                    "Profile"
                                </a>
                            }
                        })
                }}
                {move || {
                    let role_link = match session.get().user.map(|u| u.role) {
                        Some(Role::Farmer) => Some(("sacco", "#sacco", "SACCO")),
                        Some(Role::Wholesaler) => Some(("wholesaler", "#wholesaler", "Wholesale")),
                        Some(Role::Admin) => Some(("admin", "#admin", "Admin")),
                        None => None,
                    };
                    role_link
                        .map(|(nav, href, label)| {
                            view! {
                                <a class="btn btn-ghost btn-sm" data-nav=nav href=href>
                                    {label}
                                </a>
                            }
                        })
                }}
            </div>
            <div class="flex-none gap-2">
                {move || {
                    let current = session.get();
                    if current.authenticated {
                        let name = current.user.map(|u| u.name).unwrap_or_default();
                        view! {
                            <span class="text-sm font-medium">{name}</span>
                            <button
                                class="btn btn-outline btn-sm"
                                on:click=move |_| session_store.with_value(|store| store.logout())
                            >
                                "Logout"
                            </button>
                        }
                            .into_any()
                    } else {
                        view! {
                            <a class="btn btn-ghost btn-sm" data-nav="register" href="#register">
                                "Register"
                            </a>
                            <a class="btn btn-primary btn-sm" data-nav="login" href="#login">
                                "Sign In"
                            </a>
                        }
                            .into_any()
                    }
                }}
            </div>
        </div>
    }
}
