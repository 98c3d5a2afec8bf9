//! Widget kind catalog and behavior dispatch.
//!
//! The catalog is fixed: every node is one of the kinds below, and a node's
//! behavior is entirely determined by dispatching through its kind's
//! [`Behavior`] implementation. Behaviors are stateless unit structs; any
//! state they need lives on the node (kv entries or the per-kind state slot).

use crate::event::KeyInput;
use crate::form::FormState;
use crate::render::Surface;
use crate::tree::{NodeId, Tree};

// ---------------------------------------------------------------------------
// WidgetKind
// ---------------------------------------------------------------------------

/// The fixed widget catalog.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Label,
    Input,
    Checkbox,
    Vbox,
    Hbox,
    Table,
    TableBr,
    List,
    ListItem,
    TextView,
    TextEdit,
}

impl WidgetKind {
    /// All kinds, in catalog order.
    pub const ALL: [WidgetKind; 11] = [
        WidgetKind::Label,
        WidgetKind::Input,
        WidgetKind::Checkbox,
        WidgetKind::Vbox,
        WidgetKind::Hbox,
        WidgetKind::Table,
        WidgetKind::TableBr,
        WidgetKind::List,
        WidgetKind::ListItem,
        WidgetKind::TextView,
        WidgetKind::TextEdit,
    ];

    /// The kind's name as used in description text and scoped lookup keys.
    pub const fn name(self) -> &'static str {
        match self {
            WidgetKind::Label => "label",
            WidgetKind::Input => "input",
            WidgetKind::Checkbox => "checkbox",
            WidgetKind::Vbox => "vbox",
            WidgetKind::Hbox => "hbox",
            WidgetKind::Table => "table",
            WidgetKind::TableBr => "tablebr",
            WidgetKind::List => "list",
            WidgetKind::ListItem => "listitem",
            WidgetKind::TextView => "textview",
            WidgetKind::TextEdit => "textedit",
        }
    }

    /// Look up a kind by its description-language name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

// ---------------------------------------------------------------------------
// Behavior
// ---------------------------------------------------------------------------

/// The capability set of a widget kind. Every method is optional; the
/// defaults do nothing (and `process` consumes nothing).
///
/// `w` is always the node being operated on; `fw` in [`Behavior::process`]
/// is the currently focused node the key was originally offered to.
pub trait Behavior {
    /// Called once after the node is created, before it joins a form.
    fn init(&self, _tree: &mut Tree, _w: NodeId) {}

    /// Called before the node is destroyed.
    fn done(&self, _tree: &mut Tree, _w: NodeId) {}

    /// Focus arrived at this node.
    fn enter(&self, _f: &mut FormState, _w: NodeId) {}

    /// Focus left this node.
    fn leave(&self, _f: &mut FormState, _w: NodeId) {}

    /// Bottom-up pass: compute `min` from the children's minimums and refresh
    /// focusability.
    fn prepare(&self, _f: &mut FormState, _w: NodeId) {}

    /// Top-down pass: paint into `w`'s assigned rect, distributing space to
    /// children first where applicable.
    fn draw(&self, _f: &mut FormState, _w: NodeId, _surface: &mut Surface) {}

    /// Offer a key. Return `true` to consume it and stop the bubble walk.
    fn process(&self, _f: &mut FormState, _w: NodeId, _fw: NodeId, _key: &KeyInput) -> bool {
        false
    }
}

/// Kinds with no behavior of their own. `tablebr` is a pure placement marker
/// and `listitem` is only data for its parent.
struct Inert;

impl Behavior for Inert {}

/// Dispatch table: the one behavior instance for a kind.
pub fn behavior(kind: WidgetKind) -> &'static dyn Behavior {
    match kind {
        WidgetKind::Label => &crate::widgets::label::LabelBehavior,
        WidgetKind::Input => &crate::widgets::input::InputBehavior,
        WidgetKind::Checkbox => &crate::widgets::checkbox::CheckboxBehavior,
        WidgetKind::Vbox => &crate::widgets::boxes::VBOX,
        WidgetKind::Hbox => &crate::widgets::boxes::HBOX,
        WidgetKind::Table => &crate::widgets::table::TableBehavior,
        WidgetKind::TableBr => &Inert,
        WidgetKind::List => &crate::widgets::list::ListBehavior,
        WidgetKind::ListItem => &Inert,
        WidgetKind::TextView => &crate::widgets::text::TextViewBehavior,
        WidgetKind::TextEdit => &crate::widgets::text::TextEditBehavior,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
