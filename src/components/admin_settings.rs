//! Admin System Settings Table
//!
//! Values are typed by the setting's declared type; input that does not
//! parse as that type is rejected before it reaches the backend.

use leptos::prelude::*;
use leptos::task::spawn_local;

use taskflow_core::domain::{SettingValue, SystemSetting};

use crate::api::{self, ApiClient, NewSetting, PageQuery};
use crate::components::{run_admin_call, DeleteConfirmButton};
use crate::context::AppContext;

const VALUE_TYPES: [&str; 3] = ["string", "number", "boolean"];

#[component]
pub fn SettingsTable() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let (settings, set_settings) = signal(Vec::<SystemSetting>::new());
    let (load_error, set_load_error) = signal(None::<String>);
    let (category, set_category) = signal(String::new());

    let (name, set_name) = signal(String::new());
    let (value_type, set_value_type) = signal("string".to_string());
    let (raw_value, set_raw_value) = signal(String::new());
    let (new_category, set_new_category) = signal(String::new());
    let (description, set_description) = signal(String::new());

    Effect::new(move |_| {
        let _ = ctx.reload_trigger.get();
        let category = category.get();
        spawn_local(async move {
            let query = PageQuery {
                category: Some(category.as_str()).filter(|c| !c.is_empty()),
                ..Default::default()
            };
            let result = match ApiClient::new(&ctx.config()) {
                Ok(client) => api::list_settings(&client, query).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(listing) => {
                    set_settings.set(listing.items);
                    set_load_error.set(None);
                }
                Err(e) => set_load_error.set(Some(e.to_string())),
            }
        });
    });

    let add_setting = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = name.get_untracked();
        let value_type = value_type.get_untracked();
        if name.trim().is_empty() {
            return;
        }
        let Some(value) = SettingValue::parse_as(&value_type, &raw_value.get_untracked()) else {
            ctx.error(format!("Value is not a valid {}", value_type));
            return;
        };
        let category = new_category.get_untracked();
        let description = description.get_untracked();
        run_admin_call(ctx, "Setting created", move |client| async move {
            let setting = NewSetting {
                name: name.trim(),
                value: &value,
                value_type: &value_type,
                description: &description,
                category: &category,
            };
            api::create_setting(&client, &setting).await
        });
        set_name.set(String::new());
        set_raw_value.set(String::new());
    };

    let categories = move || {
        let mut all: Vec<String> = settings.get().into_iter().map(|s| s.category).filter(|c| !c.is_empty()).collect();
        all.sort();
        all.dedup();
        all
    };

    view! {
        <div class="admin-settings">
            <div class="admin-toolbar">
                <select on:change=move |ev| set_category.set(event_target_value(&ev))>
                    <option value="">"All categories"</option>
                    {move || categories().into_iter().map(|c| {
                        let selected = category.get_untracked() == c;
                        view! { <option value=c.clone() selected=selected>{c.clone()}</option> }
                    }).collect_view()}
                </select>
            </div>
            {move || load_error.get().map(|e| view! { <p class="error-message">{e}</p> })}
            <table class="admin-table">
                <thead>
                    <tr><th>"Name"</th><th>"Value"</th><th>"Type"</th><th>"Category"</th><th>"Description"</th><th></th></tr>
                </thead>
                <tbody>
                    <For
                        each=move || settings.get()
                        key=|s| (s.id.clone(), s.value.to_string())
                        children=move |setting| {
                            let delete_id = setting.id.clone();
                            let stored = StoredValue::new(setting.clone());
                            view! {
                                <tr>
                                    <td>{setting.name.clone()}</td>
                                    <td>
                                        <input
                                            type="text"
                                            value=setting.value.to_string()
                                            on:change=move |ev| {
                                                let raw = event_target_value(&ev);
                                                let mut updated = stored.get_value();
                                                let Some(value) = SettingValue::parse_as(&updated.value_type, &raw) else {
                                                    ctx.error(format!("{} expects a {}", updated.name, updated.value_type));
                                                    return;
                                                };
                                                updated.value = value;
                                                run_admin_call(ctx, "Setting saved", move |client| async move {
                                                    api::update_setting(&client, &updated).await
                                                });
                                            }
                                        />
                                    </td>
                                    <td>{setting.value_type.clone()}</td>
                                    <td>{setting.category.clone()}</td>
                                    <td>{setting.description.clone()}</td>
                                    <td>
                                        <DeleteConfirmButton
                                            button_class="delete-btn"
                                            on_confirm=move |_: ()| {
                                                let id = delete_id.clone();
                                                run_admin_call(ctx, "Setting deleted", move |client| async move {
                                                    api::delete_setting(&client, &id).await
                                                });
                                            }
                                        />
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <form class="admin-form" on:submit=add_setting>
                <h4>"Add setting"</h4>
                <input type="text" placeholder="Name" prop:value=move || name.get() on:input=move |ev| set_name.set(event_target_value(&ev)) />
                <select on:change=move |ev| set_value_type.set(event_target_value(&ev))>
                    {VALUE_TYPES.into_iter().map(|t| view! { <option value=t>{t}</option> }).collect_view()}
                </select>
                <input type="text" placeholder="Value" prop:value=move || raw_value.get() on:input=move |ev| set_raw_value.set(event_target_value(&ev)) />
                <input type="text" placeholder="Category" prop:value=move || new_category.get() on:input=move |ev| set_new_category.set(event_target_value(&ev)) />
                <input type="text" placeholder="Description" prop:value=move || description.get() on:input=move |ev| set_description.set(event_target_value(&ev)) />
                <button type="submit">"Create"</button>
            </form>
        </div>
    }
}
