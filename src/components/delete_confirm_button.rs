//! Delete Confirm Button Component
//!
//! Inline two-step delete: a × button that turns into "Delete?" with ✓/✗.

use leptos::prelude::*;

/// Inline delete confirmation button
///
/// # Arguments
/// * `button_class` - CSS class for the initial × button
/// * `on_confirm` - Runs when the user confirms
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (confirm_delete, set_confirm_delete) = signal(false);

    view! {
        <Show when=move || !confirm_delete.get()>
            <button
                class=button_class.clone()
                title="Delete"
                on:click=move |ev| {
                    ev.stop_propagation();
                    set_confirm_delete.set(true);
                }
            >
                "×"
            </button>
        </Show>
        <Show when=move || confirm_delete.get()>
            <span class="delete-confirm">
                <span class="delete-confirm-text">"Delete?"</span>
                <button
                    class="confirm-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirm_delete.set(false);
                        on_confirm.run(());
                    }
                >
                    "✓"
                </button>
                <button
                    class="cancel-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirm_delete.set(false);
                    }
                >
                    "✗"
                </button>
            </span>
        </Show>
    }
}
