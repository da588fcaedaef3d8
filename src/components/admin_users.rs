//! Admin User and Role Tables

use leptos::prelude::*;
use leptos::task::spawn_local;

use taskflow_core::domain::{AdminUser, Role, UserRole, UserStatus};

use crate::api::{self, ApiClient, NewRole, NewUser, PageQuery};
use crate::components::{run_admin_call, DeleteConfirmButton};
use crate::context::AppContext;

const PER_PAGE: u32 = 20;
const ROLES: [UserRole; 3] = [UserRole::User, UserRole::Manager, UserRole::Admin];
const STATUSES: [(UserStatus, &str); 3] = [
    (UserStatus::Active, "active"),
    (UserStatus::Inactive, "inactive"),
    (UserStatus::Pending, "pending"),
];

fn role_from_str(s: &str) -> Option<UserRole> {
    ROLES.into_iter().find(|r| r.as_str() == s)
}

fn status_from_str(s: &str) -> Option<UserStatus> {
    STATUSES.into_iter().find(|(_, name)| *name == s).map(|(status, _)| status)
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[component]
pub fn UserTable() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let (users, set_users) = signal(Vec::<AdminUser>::new());
    let (load_error, set_load_error) = signal(None::<String>);
    let (page, set_page) = signal(1u32);
    let (pages, set_pages) = signal(1u32);
    let (status_filter, set_status_filter) = signal(String::new());

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (role, set_role) = signal(UserRole::User);
    let (invite, set_invite) = signal(true);

    Effect::new(move |_| {
        let _ = ctx.reload_trigger.get();
        let page = page.get();
        let status = status_filter.get();
        spawn_local(async move {
            let query = PageQuery {
                page: Some(page),
                per_page: Some(PER_PAGE),
                status: Some(status.as_str()).filter(|s| !s.is_empty()),
                ..Default::default()
            };
            let result = match ApiClient::new(&ctx.config()) {
                Ok(client) => api::list_users(&client, query).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(listing) => {
                    set_pages.set(listing.page_count().max(1));
                    set_users.set(listing.items);
                    set_load_error.set(None);
                }
                Err(e) => set_load_error.set(Some(e.to_string())),
            }
        });
    });

    let add_user = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (name, email, password) = (name.get_untracked(), email.get_untracked(), password.get_untracked());
        if name.trim().is_empty() || email.trim().is_empty() {
            ctx.error("Name and email are required");
            return;
        }
        let role = role.get_untracked();
        if invite.get_untracked() {
            run_admin_call(ctx, "Invitation sent", move |client| async move {
                let user = NewUser { name: &name, email: &email, role, password: None };
                api::invite_user(&client, &user).await
            });
        } else {
            run_admin_call(ctx, "User created", move |client| async move {
                let user = NewUser { name: &name, email: &email, role, password: Some(&password) };
                api::create_user(&client, &user).await
            });
        }
        set_name.set(String::new());
        set_email.set(String::new());
        set_password.set(String::new());
    };

    view! {
        <div class="admin-users">
            <div class="admin-toolbar">
                <select on:change=move |ev| { set_page.set(1); set_status_filter.set(event_target_value(&ev)); }>
                    <option value="">"All statuses"</option>
                    {STATUSES.into_iter().map(|(_, s)| view! { <option value=s>{s}</option> }).collect_view()}
                </select>
            </div>
            {move || load_error.get().map(|e| view! { <p class="error-message">{e}</p> })}
            <table class="admin-table">
                <thead>
                    <tr><th>"Name"</th><th>"Email"</th><th>"Role"</th><th>"Status"</th><th>"Last login"</th><th></th></tr>
                </thead>
                <tbody>
                    <For
                        each=move || users.get()
                        key=|u| (u.id.clone(), u.role, u.status)
                        children=move |user| {
                            let role_id = user.id.clone();
                            let status_id = user.id.clone();
                            let delete_id = user.id.clone();
                            let current_role = user.role;
                            let current_status = user.status;
                            view! {
                                <tr>
                                    <td>{user.name.clone()}</td>
                                    <td>{user.email.clone()}</td>
                                    <td>
                                        <select on:change=move |ev| {
                                            let Some(role) = role_from_str(&event_target_value(&ev)) else { return };
                                            let id = role_id.clone();
                                            run_admin_call(ctx, "Role updated", move |client| async move {
                                                api::update_user_role(&client, &id, role).await
                                            });
                                        }>
                                            {ROLES.into_iter().map(|r| view! {
                                                <option value=r.as_str() selected={r == current_role}>{r.as_str()}</option>
                                            }).collect_view()}
                                        </select>
                                    </td>
                                    <td>
                                        <select on:change=move |ev| {
                                            let Some(status) = status_from_str(&event_target_value(&ev)) else { return };
                                            let id = status_id.clone();
                                            run_admin_call(ctx, "Status updated", move |client| async move {
                                                api::update_user_status(&client, &id, status).await
                                            });
                                        }>
                                            {STATUSES.into_iter().map(|(s, label)| view! {
                                                <option value=label selected={s == current_status}>{label}</option>
                                            }).collect_view()}
                                        </select>
                                    </td>
                                    <td>{user.last_login.map(|t| t.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "never".into())}</td>
                                    <td>
                                        <DeleteConfirmButton
                                            button_class="delete-btn"
                                            on_confirm=move |_: ()| {
                                                let id = delete_id.clone();
                                                run_admin_call(ctx, "User deleted", move |client| async move {
                                                    api::delete_user(&client, &id).await
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
            <div class="pager">
                <button disabled={move || page.get() <= 1} on:click=move |_| set_page.update(|p| *p -= 1)>"‹"</button>
                <span>{move || format!("{} / {}", page.get(), pages.get())}</span>
                <button disabled={move || page.get() >= pages.get()} on:click=move |_| set_page.update(|p| *p += 1)>"›"</button>
            </div>

            <form class="admin-form" on:submit=add_user>
                <h4>"Add user"</h4>
                <input type="text" placeholder="Name" prop:value=move || name.get() on:input=move |ev| set_name.set(event_target_value(&ev)) />
                <input type="email" placeholder="Email" prop:value=move || email.get() on:input=move |ev| set_email.set(event_target_value(&ev)) />
                <select on:change=move |ev| {
                    if let Some(r) = role_from_str(&event_target_value(&ev)) { set_role.set(r); }
                }>
                    {ROLES.into_iter().map(|r| view! { <option value=r.as_str()>{r.as_str()}</option> }).collect_view()}
                </select>
                <label>
                    <input type="checkbox" prop:checked=move || invite.get() on:change=move |ev| set_invite.set(event_target_checked(&ev)) />
                    "Send invitation"
                </label>
                <Show when=move || !invite.get()>
                    <input type="password" placeholder="Password" prop:value=move || password.get() on:input=move |ev| set_password.set(event_target_value(&ev)) />
                </Show>
                <button type="submit">{move || if invite.get() { "Invite" } else { "Create" }}</button>
            </form>
        </div>
    }
}

#[component]
pub fn RoleTable() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let (roles, set_roles) = signal(Vec::<Role>::new());
    let (load_error, set_load_error) = signal(None::<String>);
    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (permissions, set_permissions) = signal(String::new());

    Effect::new(move |_| {
        let _ = ctx.reload_trigger.get();
        spawn_local(async move {
            let result = match ApiClient::new(&ctx.config()) {
                Ok(client) => api::list_roles(&client, PageQuery::default()).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(listing) => {
                    set_roles.set(listing.items);
                    set_load_error.set(None);
                }
                Err(e) => set_load_error.set(Some(e.to_string())),
            }
        });
    });

    let add_role = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = name.get_untracked();
        if name.trim().is_empty() {
            return;
        }
        let description = description.get_untracked();
        let permissions = split_csv(&permissions.get_untracked());
        run_admin_call(ctx, "Role created", move |client| async move {
            let role = NewRole { name: &name, description: &description, permissions: &permissions };
            api::create_role(&client, &role).await
        });
        set_name.set(String::new());
        set_description.set(String::new());
        set_permissions.set(String::new());
    };

    view! {
        <div class="admin-roles">
            {move || load_error.get().map(|e| view! { <p class="error-message">{e}</p> })}
            <table class="admin-table">
                <thead>
                    <tr><th>"Role"</th><th>"Description"</th><th>"Permissions"</th><th>"Users"</th><th></th></tr>
                </thead>
                <tbody>
                    <For
                        each=move || roles.get()
                        key=|r| (r.id.clone(), r.permissions.clone(), r.description.clone())
                        children=move |role| {
                            let delete_id = role.id.clone();
                            let edited = StoredValue::new(role.clone());
                            view! {
                                <tr>
                                    <td>{role.name.clone()}</td>
                                    <td>
                                        <input
                                            type="text"
                                            value=role.description.clone()
                                            on:change=move |ev| {
                                                edited.update_value(|r| r.description = event_target_value(&ev));
                                                let role = edited.get_value();
                                                run_admin_call(ctx, "Role updated", move |client| async move {
                                                    api::update_role(&client, &role).await
                                                });
                                            }
                                        />
                                    </td>
                                    <td>
                                        <input
                                            type="text"
                                            value=role.permissions.join(", ")
                                            on:change=move |ev| {
                                                edited.update_value(|r| r.permissions = split_csv(&event_target_value(&ev)));
                                                let role = edited.get_value();
                                                run_admin_call(ctx, "Role updated", move |client| async move {
                                                    api::update_role(&client, &role).await
                                                });
                                            }
                                        />
                                    </td>
                                    <td>{role.user_count}</td>
                                    <td>
                                        <DeleteConfirmButton
                                            button_class="delete-btn"
                                            on_confirm=move |_: ()| {
                                                let id = delete_id.clone();
                                                run_admin_call(ctx, "Role deleted", move |client| async move {
                                                    api::delete_role(&client, &id).await
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

            <form class="admin-form" on:submit=add_role>
                <h4>"Add role"</h4>
                <input type="text" placeholder="Name" prop:value=move || name.get() on:input=move |ev| set_name.set(event_target_value(&ev)) />
                <input type="text" placeholder="Description" prop:value=move || description.get() on:input=move |ev| set_description.set(event_target_value(&ev)) />
                <input type="text" placeholder="Permissions (comma separated)" prop:value=move || permissions.get() on:input=move |ev| set_permissions.set(event_target_value(&ev)) />
                <button type="submit">"Create"</button>
            </form>
        </div>
    }
}

