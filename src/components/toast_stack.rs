//! Toast Stack Component
//!
//! Transient messages in the corner; each expires on its own timer.

use leptos::prelude::*;

use crate::context::AppContext;

#[component]
pub fn ToastStack() -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    view! {
        <div class="toast-stack">
            <For
                each=move || ctx.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.class() on:click=move |_| ctx.dismiss(id)>
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
