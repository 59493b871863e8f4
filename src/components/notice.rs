//! 瞬态通知宿主

use leptos::prelude::*;

use crate::components::shell::SignalShell;

#[component]
pub fn NoticeHost() -> impl IntoView {
    let shell = use_context::<SignalShell>().expect("SignalShell not provided");
    let notice = shell.notice_signal();

    view! {
        <Show when=move || notice.get().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div role="alert" class="alert alert-warning shadow-lg">
                    <span>{move || notice.get().unwrap_or_default()}</span>
                    <button class="btn btn-ghost btn-xs" on:click=move |_| shell.dismiss_notice()>
                        "✕"
                    </button>
                </div>
            </div>
        </Show>
    }
}
