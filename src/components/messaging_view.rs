//! Messaging View Component
//!
//! Channel sidebar with search and type filter, the open channel's messages
//! grouped by day, and a composer that can reply to a message.

use leptos::prelude::*;

use taskflow_core::domain::{ChannelDraft, ChannelKind, Message};

use crate::components::DeleteConfirmButton;
use crate::context::AppContext;
use crate::store::{current_user_name, store_post_message, use_app_store, AppStateStoreFields};

const REACTIONS: [&str; 7] = ["👍", "👎", "❤️", "🎉", "👀", "🚀", "👏"];

fn kind_icon(kind: ChannelKind) -> &'static str {
    match kind {
        ChannelKind::Project => "📁",
        ChannelKind::Task => "#",
        ChannelKind::General => "#",
        ChannelKind::Direct => "👥",
    }
}

#[component]
pub fn MessagingView() -> impl IntoView {
    let store = use_app_store();
    let me = current_user_name(&store);

    let (query, set_query) = signal(String::new());
    let (kind_filter, set_kind_filter) = signal(None::<ChannelKind>);
    let (active, set_active) = signal(store.messages().read_untracked().channels().first().map(|c| c.id.clone()));
    let (creating, set_creating) = signal(false);

    let channels = move || {
        store
            .messages()
            .read()
            .search(&me, &query.get(), kind_filter.get())
            .into_iter()
            .map(|c| (c.id.clone(), c.name.clone(), c.kind, c.is_private, c.messages.len()))
            .collect::<Vec<_>>()
    };

    let on_created = Callback::new(move |id: String| {
        set_creating.set(false);
        set_active.set(Some(id));
    });

    view! {
        <div class="messaging">
            <aside class="channel-sidebar">
                <input
                    type="search"
                    placeholder="Search channels"
                    prop:value=move || query.get()
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                />
                <select on:change=move |ev| set_kind_filter.set(event_target_value(&ev).parse().ok())>
                    <option value="">"All"</option>
                    {ChannelKind::ALL.into_iter().map(|k| view! {
                        <option value=k.as_str()>{k.label()}</option>
                    }).collect_view()}
                </select>
                <ul class="channel-list">
                    <For
                        each=channels
                        key=|c| c.clone()
                        children=move |(id, name, kind, private, count)| {
                            let open_id = id.clone();
                            view! {
                                <li
                                    class:active=move || active.get().as_deref() == Some(id.as_str())
                                    on:click=move |_| set_active.set(Some(open_id.clone()))
                                >
                                    <span class="icon">{kind_icon(kind)}</span>
                                    <span class="name">{name}</span>
                                    {private.then(|| view! { <span class="lock">"🔒"</span> })}
                                    <span class="count">{count}</span>
                                </li>
                            }
                        }
                    />
                </ul>
                <button on:click=move |_| set_creating.update(|c| *c = !*c)>"New channel"</button>
                <Show when=move || creating.get()>
                    <NewChannelForm on_created=on_created />
                </Show>
            </aside>
            <section class="channel-pane">
                {move || match active.get().filter(|id| store.messages().read_untracked().channel(id).is_some()) {
                    Some(id) => view! { <ChannelPane channel_id=id on_closed=move |_: ()| set_active.set(None) /> }.into_any(),
                    None => view! { <p class="empty-state">"Pick a channel to start talking"</p> }.into_any(),
                }}
            </section>
        </div>
    }
}

#[component]
fn NewChannelForm(#[prop(into)] on_created: Callback<String>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (kind, set_kind) = signal(ChannelKind::General);
    let (private, set_private) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let channel_name = name.get_untracked();
        if channel_name.trim().is_empty() {
            ctx.error("A channel needs a name");
            return;
        }
        let mut draft = ChannelDraft::new(channel_name, kind.get_untracked(), current_user_name(&store));
        draft.description = Some(description.get_untracked());
        draft.is_private = private.get_untracked();
        let channel = store.messages().write().add_channel(draft);
        ctx.success(format!("Channel {} created", channel.name));
        set_name.set(String::new());
        set_description.set(String::new());
        on_created.run(channel.id);
    };

    view! {
        <form class="new-channel" on:submit=submit>
            <input type="text" placeholder="Name" prop:value=move || name.get() on:input=move |ev| set_name.set(event_target_value(&ev)) />
            <input type="text" placeholder="Description" prop:value=move || description.get() on:input=move |ev| set_description.set(event_target_value(&ev)) />
            <select on:change=move |ev| {
                if let Ok(k) = event_target_value(&ev).parse() { set_kind.set(k); }
            }>
                {ChannelKind::ALL.into_iter().map(|k| view! {
                    <option value=k.as_str()>{k.as_str()}</option>
                }).collect_view()}
            </select>
            <label>
                <input type="checkbox" prop:checked=move || private.get() on:change=move |ev| set_private.set(event_target_checked(&ev)) />
                "Private"
            </label>
            <button type="submit">"Create"</button>
        </form>
    }
}

#[component]
fn ChannelPane(channel_id: String, #[prop(into)] on_closed: Callback<()>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let me = StoredValue::new(current_user_name(&store));
    let channel_id = StoredValue::new(channel_id);

    let (draft, set_draft) = signal(String::new());
    let (replying_to, set_replying_to) = signal(None::<Message>);

    let header = move || {
        store.messages().read().channel(&channel_id.get_value()).map(|c| {
            (c.name.clone(), c.description.clone().unwrap_or_default(), c.members.len(), c.is_member(&me.get_value()), c.created_by == me.get_value())
        })
    };
    let groups = move || {
        store
            .messages()
            .read()
            .messages_by_date(&channel_id.get_value())
            .into_iter()
            .map(|(day, messages)| (day, messages.into_iter().cloned().collect::<Vec<_>>()))
            .collect::<Vec<_>>()
    };

    let send = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let reply = replying_to.get_untracked().map(|m| m.id);
        match store_post_message(&store, &channel_id.get_value(), &draft.get_untracked(), reply.as_deref()) {
            Ok(_) => {
                set_draft.set(String::new());
                set_replying_to.set(None);
            }
            Err(e) => ctx.error(e.to_string()),
        }
    };

    let toggle_membership = move |_| {
        let (id, who) = (channel_id.get_value(), me.get_value());
        let member = store.messages().read_untracked().channel(&id).is_some_and(|c| c.is_member(&who));
        let result = if member {
            store.messages().write().leave(&id, &who)
        } else {
            store.messages().write().join(&id, &who)
        };
        if let Err(e) = result {
            ctx.error(e.to_string());
        }
    };

    let on_reply = Callback::new(move |m: Message| set_replying_to.set(Some(m)));

    view! {
        {move || header().map(|(name, description, members, is_member, is_owner)| view! {
            <header class="view-header">
                <h2>{name}</h2>
                <span class="hint">{description}</span>
                <span class="members">{format!("{} members", members)}</span>
                <button on:click=toggle_membership>{if is_member { "Leave" } else { "Join" }}</button>
                <Show when=move || is_owner>
                    <DeleteConfirmButton
                        button_class="delete-btn"
                        on_confirm=move |_: ()| {
                            if store.messages().write().delete_channel(&channel_id.get_value()).is_some() {
                                ctx.success("Channel deleted");
                                on_closed.run(());
                            }
                        }
                    />
                </Show>
            </header>
        })}
        <div class="message-list">
            {move || groups().into_iter().map(|(day, messages)| view! {
                <div class="day-group">
                    <div class="day-divider">{day.format("%A, %B %-d").to_string()}</div>
                    {messages.into_iter().map(|m| view! {
                        <MessageRow channel_id=channel_id.get_value() message=m on_reply=on_reply />
                    }).collect_view()}
                </div>
            }).collect_view()}
        </div>
        <form class="composer" on:submit=send>
            {move || replying_to.get().map(|m| view! {
                <div class="replying">
                    {format!("Replying to {}", m.author)}
                    <button type="button" on:click=move |_| set_replying_to.set(None)>"×"</button>
                </div>
            })}
            <textarea
                placeholder="Write a message, @mention teammates"
                prop:value=move || draft.get()
                on:input=move |ev| set_draft.set(event_target_value(&ev))
            ></textarea>
            <button type="submit">"Send"</button>
        </form>
    }
}

#[component]
fn MessageRow(channel_id: String, message: Message, #[prop(into)] on_reply: Callback<Message>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let me = current_user_name(&store);
    let ids = StoredValue::new((channel_id, message.id.clone()));
    let (editing, set_editing) = signal(None::<String>);
    let (picker, set_picker) = signal(false);

    let own = message.author == me;
    let replies: Vec<Message> = {
        let (c, m) = ids.get_value();
        store.messages().read_untracked().replies(&c, &m).into_iter().cloned().collect()
    };

    let react = move |emoji: String| {
        let (c, m) = ids.get_value();
        let user = current_user_name(&store);
        if let Err(e) = store.messages().write().toggle_reaction(&c, &m, &emoji, &user) {
            ctx.error(e.to_string());
        }
        set_picker.set(false);
    };
    let save_edit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (c, m) = ids.get_value();
        let text = editing.get_untracked().unwrap_or_default();
        match store.messages().write().update_message(&c, &m, &text) {
            Ok(_) => {
                set_editing.set(None);
                ctx.success("Message updated");
            }
            Err(e) => ctx.error(e.to_string()),
        }
    };
    let original = message.clone();
    let reply_to = message.clone();
    let edit_text = StoredValue::new(message.text.clone());

    view! {
        <div class="message" class:pinned=message.is_pinned>
            <div class="meta">
                <strong>{message.author.clone()}</strong>
                <span class="time">{message.created_at.format("%H:%M").to_string()}</span>
                {message.updated_at.map(|_| view! { <span class="hint">"(edited)"</span> })}
                {message.is_pinned.then(|| view! { <span class="pin">"📌"</span> })}
            </div>
            {move || match editing.get() {
                Some(text) => view! {
                    <form class="edit-message" on:submit=save_edit>
                        <textarea prop:value=text on:input=move |ev| set_editing.set(Some(event_target_value(&ev)))></textarea>
                        <button type="submit">"Save"</button>
                        <button type="button" on:click=move |_| set_editing.set(None)>"Cancel"</button>
                    </form>
                }.into_any(),
                None => view! { <p class="text">{original.text.clone()}</p> }.into_any(),
            }}
            <div class="reactions">
                {message.reactions.iter().map(|r| {
                    let emoji = r.emoji.clone();
                    view! {
                        <button class="reaction" class:mine=r.users.contains(&me) on:click=move |_| react(emoji.clone())>
                            {r.emoji.clone()}" "{r.count}
                        </button>
                    }
                }).collect_view()}
            </div>
            <div class="message-actions">
                <button on:click=move |_| set_picker.update(|p| *p = !*p)>"☺"</button>
                <button on:click=move |_| on_reply.run(reply_to.clone())>"Reply"</button>
                <button on:click=move |_| {
                    let (c, m) = ids.get_value();
                    if let Err(e) = store.messages().write().toggle_pin(&c, &m) {
                        ctx.error(e.to_string());
                    }
                }>"Pin"</button>
                <Show when=move || own>
                    <button on:click=move |_| set_editing.set(Some(edit_text.get_value()))>"Edit"</button>
                    <DeleteConfirmButton
                        button_class="delete-btn"
                        on_confirm=move |_: ()| {
                            let (c, m) = ids.get_value();
                            if let Err(e) = store.messages().write().delete_message(&c, &m) {
                                ctx.error(e.to_string());
                            }
                        }
                    />
                </Show>
            </div>
            <Show when=move || picker.get()>
                <div class="reaction-picker">
                    {REACTIONS.into_iter().map(|emoji| view! {
                        <button on:click=move |_| react(emoji.to_string())>{emoji}</button>
                    }).collect_view()}
                </div>
            </Show>
            {(!replies.is_empty()).then(|| view! {
                <div class="replies">
                    {replies.into_iter().map(|r| view! {
                        <div class="message reply">
                            <strong>{r.author}</strong>
                            <span class="time">{r.created_at.format("%H:%M").to_string()}</span>
                            <p class="text">{r.text}</p>
                        </div>
                    }).collect_view()}
                </div>
            })}
        </div>
    }
}
