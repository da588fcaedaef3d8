//! Leptos DragDrop Utilities
//!
//! Mouse-event drag-and-drop for kanban-style lists: cards are dragged by
//! string id and dropped into a slot of a column.
//! A movement threshold distinguishes a click from a drag.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Where a dragged card will land
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// Insert at `index` in the column's card list
    Slot { column_id: String, index: usize },
    /// Append to the end of the column
    Column(String),
}

impl DropTarget {
    pub fn column_id(&self) -> &str {
        match self {
            DropTarget::Slot { column_id, .. } => column_id,
            DropTarget::Column(column_id) => column_id,
        }
    }
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub dragging_id_read: ReadSignal<Option<String>>,
    pub dragging_id_write: WriteSignal<Option<String>>,
    pub drop_target_read: ReadSignal<Option<DropTarget>>,
    pub drop_target_write: WriteSignal<Option<DropTarget>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending card id (mousedown but not yet dragging)
    pub pending_id_read: ReadSignal<Option<String>>,
    pub pending_id_write: WriteSignal<Option<String>>,
    /// Start position for movement detection
    pub start_x_read: ReadSignal<i32>,
    pub start_x_write: WriteSignal<i32>,
    pub start_y_read: ReadSignal<i32>,
    pub start_y_write: WriteSignal<i32>,
}

impl DndSignals {
    pub fn is_dragging(&self) -> bool {
        self.dragging_id_read.get().is_some()
    }

    pub fn is_dragging_card(&self, card_id: &str) -> bool {
        self.dragging_id_read.get().as_deref() == Some(card_id)
    }

    pub fn is_target(&self, target: &DropTarget) -> bool {
        self.drop_target_read.get().as_ref() == Some(target)
    }
}

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: i32 = 5;

pub fn create_dnd_signals() -> DndSignals {
    let (dragging_id_read, dragging_id_write) = signal(None::<String>);
    let (drop_target_read, drop_target_write) = signal(None::<DropTarget>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_id_read, pending_id_write) = signal(None::<String>);
    let (start_x_read, start_x_write) = signal(0i32);
    let (start_y_read, start_y_write) = signal(0i32);
    DndSignals {
        dragging_id_read,
        dragging_id_write,
        drop_target_read,
        drop_target_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_id_read,
        pending_id_write,
        start_x_read,
        start_x_write,
        start_y_read,
        start_y_write,
    }
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging_id_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.pending_id_write.set(None);
    dnd.drag_just_ended_write.set(true);

    // Swallow the click that follows the mouseup
    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Mousedown on a draggable card: record a pending drag and its start position
pub fn make_on_mousedown(dnd: DndSignals, card_id: String) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlSelectElement>().is_some() { return; }
        }
        dnd.pending_id_write.set(Some(card_id.clone()));
        dnd.start_x_write.set(ev.client_x());
        dnd.start_y_write.set(ev.client_y());
    }
}

/// Document mousemove: promotes a pending drag once the pointer moved enough
pub fn bind_global_mousemove(dnd: DndSignals) {
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pending = dnd.pending_id_read.get_untracked();
        if pending.is_some() && dnd.dragging_id_read.get_untracked().is_none() {
            let dx = (ev.client_x() - dnd.start_x_read.get_untracked()).abs();
            let dy = (ev.client_y() - dnd.start_y_read.get_untracked()).abs();
            if dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX {
                dnd.dragging_id_write.set(pending);
            }
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    }
    on_mousemove.forget();
}

/// Mouseenter on a card: dropping there inserts before it
pub fn make_on_card_mouseenter(dnd: DndSignals, card_id: String, column_id: String, index: usize) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |_ev: web_sys::MouseEvent| {
        match dnd.dragging_id_read.get_untracked() {
            Some(dragging) if dragging != card_id => {
                dnd.drop_target_write.set(Some(DropTarget::Slot {
                    column_id: column_id.clone(),
                    index,
                }));
            }
            _ => {}
        }
    }
}

/// Mouseenter on the column body below its cards
pub fn make_on_column_mouseenter(dnd: DndSignals, column_id: String) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.get_untracked().is_some() {
            dnd.drop_target_write.set(Some(DropTarget::Column(column_id.clone())));
        }
    }
}

pub fn make_on_mouseleave(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.get_untracked().is_some() {
            dnd.drop_target_write.set(None);
        }
    }
}

/// Document mouseup: fires `on_drop(card_id, target)` when a drag ends over a target
pub fn bind_global_mouseup<F>(dnd: DndSignals, on_drop: F)
where
    F: Fn(String, DropTarget) + Clone + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging_id = dnd.dragging_id_read.get_untracked();
        let drop_target = dnd.drop_target_read.get_untracked();
        dnd.pending_id_write.set(None);
        // A plain click never became a drag
        let Some(dragged) = dragging_id else { return };

        end_drag(&dnd);
        if let Some(target) = drop_target {
            on_drop(dragged, target);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }
    on_mouseup.forget();

    bind_global_mousemove(dnd);
}
