//! Admin Console Component
//!
//! Tabs for the team dashboard, users, roles and system settings. Only the
//! dashboard keeps working without a backend: it falls back to figures
//! computed from the local board.

use std::collections::BTreeSet;
use std::future::Future;

use chrono::Local;
use leptos::prelude::*;
use leptos::task::spawn_local;

use taskflow_core::domain::{TeamMetrics, UserPerformanceMetrics};
use taskflow_core::metrics;

use crate::api::{self, ApiClient, ApiError, DEFAULT_METRICS_DAYS};
use crate::components::{RoleTable, SettingsTable, UserTable};
use crate::context::AppContext;
use crate::store::{use_app_store, AppStateStoreFields, AppStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AdminTab {
    Dashboard,
    Users,
    Roles,
    Settings,
}

impl AdminTab {
    const ALL: [AdminTab; 4] = [AdminTab::Dashboard, AdminTab::Users, AdminTab::Roles, AdminTab::Settings];

    fn label(&self) -> &'static str {
        match self {
            AdminTab::Dashboard => "Dashboard",
            AdminTab::Users => "Users",
            AdminTab::Roles => "Roles",
            AdminTab::Settings => "Settings",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Dashboard {
    team: TeamMetrics,
    users: Vec<UserPerformanceMetrics>,
    local: bool,
}

/// Run an admin API call, toast the outcome and refresh listings on success
pub fn run_admin_call<F, Fut, T>(ctx: AppContext, done: &'static str, call: F)
where
    F: FnOnce(ApiClient) -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    spawn_local(async move {
        let result = match ApiClient::new(&ctx.config()) {
            Ok(client) => call(client).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(_) => {
                ctx.success(done);
                ctx.reload();
            }
            Err(e) => {
                log::error!("[ADMIN] {}: {}", done, e);
                ctx.error(e.to_string());
            }
        }
    });
}

async fn fetch_dashboard(client: ApiClient, days: u32) -> Result<Dashboard, ApiError> {
    let team = api::team_metrics(&client, days).await?;
    let users = api::all_user_performance(&client, days).await?;
    Ok(Dashboard { team, users, local: false })
}

fn local_dashboard(store: &AppStore, days: u32) -> Dashboard {
    let today = Local::now().date_naive();
    let board = store.board().read_untracked();
    let tasks = board.all_tasks();
    let assignees: BTreeSet<&str> = tasks.iter().flat_map(|t| t.assignees.iter().map(String::as_str)).collect();
    let users = assignees
        .into_iter()
        .map(|name| UserPerformanceMetrics {
            user_id: name.to_string(),
            user_name: name.to_string(),
            metrics: metrics::task_metrics(tasks, Some(name), today, days),
        })
        .collect();
    Dashboard {
        team: metrics::team_metrics(tasks, today, days),
        users,
        local: true,
    }
}

#[component]
fn DashboardTab() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let (days, set_days) = signal(DEFAULT_METRICS_DAYS);
    let (dashboard, set_dashboard) = signal(None::<Dashboard>);

    Effect::new(move |_| {
        let _ = ctx.reload_trigger.get();
        let days = days.get();
        spawn_local(async move {
            let fetched = match ApiClient::new(&ctx.config()) {
                Ok(client) => fetch_dashboard(client, days).await,
                Err(e) => Err(e),
            };
            let dash = fetched.unwrap_or_else(|e| {
                log::warn!("[ADMIN] metrics unavailable, computing locally: {}", e);
                local_dashboard(&store, days)
            });
            set_dashboard.set(Some(dash));
        });
    });

    view! {
        <div class="admin-dashboard">
            <div class="dashboard-controls">
                <select on:change=move |ev| {
                    if let Ok(d) = event_target_value(&ev).parse() { set_days.set(d); }
                }>
                    {[7u32, 30, 90].into_iter().map(|d| view! {
                        <option value=d.to_string() selected={d == DEFAULT_METRICS_DAYS}>{format!("Last {} days", d)}</option>
                    }).collect_view()}
                </select>
                {move || dashboard.get().filter(|d| d.local).map(|_| view! {
                    <span class="hint">"Computed from local tasks"</span>
                })}
            </div>
            {move || match dashboard.get() {
                None => view! { <p class="loading">"Loading..."</p> }.into_any(),
                Some(d) => {
                    let max = d.team.task_distribution.iter().map(|c| c.value).max().unwrap_or(0).max(1);
                    view! {
                        <div class="metric-cards">
                            <div class="metric-card">
                                <span class="metric-value">{format!("{:.1}", d.team.average_tasks_per_user)}</span>
                                <span class="metric-label">"Tasks per user"</span>
                            </div>
                            <div class="metric-card">
                                <span class="metric-value">{format!("{:.1}", d.team.average_completion_time)}</span>
                                <span class="metric-label">"Avg. days to complete"</span>
                            </div>
                        </div>
                        <h4>"Distribution"</h4>
                        <ul class="bar-chart">
                            {d.team.task_distribution.into_iter().map(|c| view! {
                                <li>
                                    <span class="bar-label">{c.name}</span>
                                    <span class="bar" style=format!("width: {}%", c.value * 100 / max)></span>
                                    <span class="bar-value">{c.value}</span>
                                </li>
                            }).collect_view()}
                        </ul>
                        <h4>"Completed per day"</h4>
                        <div class="trend">
                            {d.team.task_completion_trend.into_iter().map(|p| view! {
                                <span class="trend-point" title=p.date.to_string() style=format!("height: {}px", 4 + p.count * 8)></span>
                            }).collect_view()}
                        </div>
                        <h4>"People"</h4>
                        <table class="admin-table">
                            <thead>
                                <tr><th>"Name"</th><th>"Total"</th><th>"Done"</th><th>"In progress"</th><th>"Overdue"</th><th>"Per week"</th></tr>
                            </thead>
                            <tbody>
                                {d.users.into_iter().map(|u| view! {
                                    <tr>
                                        <td>{u.user_name}</td>
                                        <td>{u.metrics.total_tasks}</td>
                                        <td>{u.metrics.completed_tasks}</td>
                                        <td>{u.metrics.in_progress_tasks}</td>
                                        <td class:overdue={u.metrics.overdue_tasks > 0}>{u.metrics.overdue_tasks}</td>
                                        <td>{format!("{:.1}", u.metrics.task_velocity)}</td>
                                    </tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}

#[component]
pub fn AdminConsole() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let (tab, set_tab) = signal(AdminTab::Dashboard);

    view! {
        <div class="admin-console">
            <nav class="admin-tabs">
                {AdminTab::ALL.into_iter().map(|t| view! {
                    <button class:active=move || tab.get() == t on:click=move |_| set_tab.set(t)>
                        {t.label()}
                    </button>
                }).collect_view()}
            </nav>
            <Show when=move || tab.get() != AdminTab::Dashboard && ctx.config().is_offline()>
                <p class="hint">"Offline mode: user, role and setting management needs a backend."</p>
            </Show>
            {move || match tab.get() {
                AdminTab::Dashboard => view! { <DashboardTab/> }.into_any(),
                AdminTab::Users => view! { <UserTable/> }.into_any(),
                AdminTab::Roles => view! { <RoleTable/> }.into_any(),
                AdminTab::Settings => view! { <SettingsTable/> }.into_any(),
            }}
        </div>
    }
}
