//! Widget node data: kind, identity, names, geometry, and the kv list.

use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::new_key_type;

use crate::geometry::{Region, Size};
use crate::widget::WidgetKind;
use crate::widgets::table::TableLayout;

new_key_type! {
    /// Arena handle for a widget node.
    pub struct NodeId;
}

// Serial ids are handed out process-wide and never reused. 0 is reserved as
// the "no focus" sentinel, so the counter starts at 1.
static SERIAL_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Draw the next serial id from the process-wide counter.
pub fn next_serial() -> u64 {
    SERIAL_COUNTER.fetch_add(1, Ordering::Relaxed)
}

// ---------------------------------------------------------------------------
// Kv
// ---------------------------------------------------------------------------

/// One key/value attribute entry on a node.
///
/// The optional `name` is an external handle used by the public get/set API;
/// widget code reads entries by `key`.
#[derive(Debug, Clone)]
pub struct Kv {
    pub key: String,
    pub value: String,
    pub name: Option<String>,
    pub serial: u64,
}

impl Kv {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            name: None,
            serial: next_serial(),
        }
    }
}

// ---------------------------------------------------------------------------
// WidgetState
// ---------------------------------------------------------------------------

/// Kind-specific extra state owned by a widget's own lifecycle hooks.
///
/// Only the table keeps derived layout data between its prepare and draw
/// passes; every other kind stores its state in kv entries.
#[derive(Debug, Default)]
pub enum WidgetState {
    #[default]
    None,
    Table(Box<TableLayout>),
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A widget node: fixed kind, stable serial id, optional name/class for
/// scoped lookup, layout geometry, and the ordered kv list.
#[derive(Debug)]
pub struct Node {
    pub kind: WidgetKind,
    pub serial: u64,
    pub name: Option<String>,
    pub class: Option<String>,
    /// Eligible to receive keyboard focus. Set by widget behaviors.
    pub focusable: bool,
    /// Pending focus request from the `!` parser marker.
    pub setfocus: bool,
    pub kvs: Vec<Kv>,
    /// Area assigned by the last draw pass.
    pub rect: Region,
    /// Minimum size computed by the last prepare pass.
    pub min: Size,
    pub state: WidgetState,
}

impl Node {
    /// Create a node of the given kind with a fresh serial id.
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            serial: next_serial(),
            name: None,
            class: None,
            focusable: false,
            setfocus: false,
            kvs: Vec::new(),
            rect: Region::EMPTY,
            min: Size::ZERO,
            state: WidgetState::None,
        }
    }

    /// Builder: set the widget name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set the class used for scoped attribute lookup.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Exact kv lookup on this node only.
    pub fn kv(&self, key: &str) -> Option<&Kv> {
        self.kvs.iter().find(|kv| kv.key == key)
    }

    /// Upsert a kv entry. An existing entry keeps its position, serial and
    /// external name; only the value is replaced.
    pub fn set_kv(&mut self, key: &str, value: impl Into<String>) {
        match self.kvs.iter_mut().find(|kv| kv.key == key) {
            Some(kv) => kv.value = value.into(),
            None => self.kvs.push(Kv::new(key, value)),
        }
    }

    /// Upsert a kv entry and set its external name.
    pub fn set_kv_named(&mut self, key: &str, value: impl Into<String>, name: impl Into<String>) {
        match self.kvs.iter_mut().find(|kv| kv.key == key) {
            Some(kv) => {
                kv.value = value.into();
                kv.name = Some(name.into());
            }
            None => {
                let mut kv = Kv::new(key, value);
                kv.name = Some(name.into());
                self.kvs.push(kv);
            }
        }
    }

    /// Upsert a numeric kv entry.
    pub fn set_kv_int(&mut self, key: &str, value: i32) {
        self.set_kv(key, value.to_string());
    }
}

// ===========================================================================
// Tests
// ===========================================================================
