//! The form: a widget tree plus focus, cursor and event state, behind a
//! thread-safe handle.
//!
//! [`Form`] is the public entry point. All state lives in a [`FormState`]
//! under a mutex; the lock is held for API calls and the render pass but
//! released while [`Form::run`] waits for input, so other threads can read
//! and update the form while one thread drives the event loop.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::event::{Event, KeyEventKind};

use crate::dump::dump_widget;
use crate::error::Error;
use crate::event::{Key, KeyInput};
use crate::focus::{check_setfocus, find_first_focusable, focus_next, switch_focus};
use crate::geometry::Region;
use crate::parser::parse_into;
use crate::render::{Driver, Surface};
use crate::tree::{NodeId, Tree};
use crate::widget::behavior;

// ---------------------------------------------------------------------------
// FormState
// ---------------------------------------------------------------------------

/// The mutable core of a form. Widget behaviors receive this during the
/// prepare, draw and key-processing passes.
pub struct FormState {
    pub tree: Tree,
    /// Serial id of the focused widget, 0 for none. Serials are never
    /// reused, so a stale value after a modification reads as "no focus".
    pub focus: u64,
    /// Terminal cursor position requested by the focused widget's draw.
    pub cursor: Option<(i32, i32)>,
    events: VecDeque<String>,
    last_event: Option<String>,
}

impl FormState {
    pub fn new(tree: Tree) -> Self {
        FormState { tree, focus: 0, cursor: None, events: VecDeque::new(), last_event: None }
    }

    /// The event most recently handed back to the program by `run`.
    pub fn last_event(&self) -> Option<&str> {
        self.last_event.as_deref()
    }

    /// Resolve the focus serial to a live node.
    pub fn focused_node(&self) -> Option<NodeId> {
        let root = self.tree.root()?;
        self.tree.find_by_serial(root, self.focus)
    }

    /// Run the prepare and draw passes into a fresh surface of the given
    /// size. Also assigns initial focus when nothing holds it yet.
    pub fn render(&mut self, width: i32, height: i32) -> Surface {
        let mut surface = Surface::new(width, height);
        let Some(root) = self.tree.root() else { return surface };
        let kind = self.tree.node(root).kind;
        behavior(kind).prepare(self, root);
        if self.focused_node().is_none() {
            let first = find_first_focusable(&self.tree, root);
            switch_focus(self, first);
        }
        self.cursor = None;
        self.tree.node_mut(root).rect = Region::new(0, 0, width, height);
        behavior(kind).draw(self, root, &mut surface);
        surface
    }

    /// Offer a key to the focused widget, then its ancestors, then the
    /// built-in handlers. Returns the event to hand to the program, if the
    /// key produced one. Layout must be current (a render pass has run
    /// since the last tree change) for widgets to react sensibly.
    pub fn handle_key(&mut self, key: &KeyInput) -> Option<String> {
        let fw = self.focused_node();
        if let Some(fw) = fw {
            let mut target = Some(fw);
            while let Some(w) = target {
                let kind = self.tree.node(w).kind;
                if behavior(kind).process(self, w, fw, key) {
                    return None;
                }
                target = self.tree.parent(w);
            }
        }

        match key.key {
            Key::Enter if !key.ctrl => return Some("ENTER".into()),
            Key::Esc => return Some("ESC".into()),
            Key::Function(_) => return Some(key.name()),
            Key::Tab => {
                if let Some(root) = self.tree.root() {
                    match fw {
                        Some(fw) => {
                            focus_next(self, root, fw);
                        }
                        None => {
                            let first = find_first_focusable(&self.tree, root);
                            switch_focus(self, first);
                        }
                    }
                }
                return None;
            }
            _ => {}
        }
        key.printable_char().map(|c| format!("CHAR({})", c as u32))
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// A live form. Cheap operations (get/set/dump) lock briefly; `run` owns
/// the terminal but releases the state lock while blocked on input.
pub struct Form {
    state: Mutex<FormState>,
    driver: Mutex<Option<Driver>>,
}

impl Form {
    /// An empty form with no widgets. All lookups come back empty until a
    /// tree is grown through [`Form::with_state`].
    pub fn new() -> Self {
        Form {
            state: Mutex::new(FormState::new(Tree::default())),
            driver: Mutex::new(None),
        }
    }

    /// Parse a description and build the form. A `!` focus request in the
    /// text is honored immediately.
    pub fn create(text: &str) -> Result<Self, Error> {
        let mut tree = Tree::default();
        let root = parse_into(&mut tree, text)?;
        tree.set_root(root);
        let mut state = FormState::new(tree);
        check_setfocus(&mut state, root);
        Ok(Form { state: Mutex::new(state), driver: Mutex::new(None) })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FormState> {
        self.state.lock().expect("form state lock poisoned")
    }

    /// Read a value by external name.
    ///
    /// `"widget:field"` reads layout pseudo-variables of a named widget:
    /// `x`, `y`, `w`, `h`, `minw`, `minh`. A plain name reads the named
    /// attribute.
    pub fn get(&self, name: &str) -> Option<String> {
        let st = self.lock();
        let root = st.tree.root()?;
        if let Some((wname, field)) = name.split_once(':') {
            let w = st.tree.find_by_name(root, wname)?;
            let node = st.tree.node(w);
            let value = match field {
                "x" => node.rect.x,
                "y" => node.rect.y,
                "w" => node.rect.width,
                "h" => node.rect.height,
                "minw" => node.min.width,
                "minh" => node.min.height,
                _ => return None,
            };
            return Some(value.to_string());
        }
        st.tree
            .find_kv_by_name(root, name)
            .map(|(w, idx)| st.tree.node(w).kvs[idx].value.clone())
    }

    /// Write the attribute with the given external name.
    pub fn set(&self, name: &str, value: &str) -> Result<(), Error> {
        let mut st = self.lock();
        let root = st.tree.root().ok_or_else(|| Error::UnknownName(name.to_string()))?;
        let (w, idx) = st
            .tree
            .find_kv_by_name(root, name)
            .ok_or_else(|| Error::UnknownName(name.to_string()))?;
        st.tree.node_mut(w).kvs[idx].value = value.to_string();
        Ok(())
    }

    /// The name of the focused widget, if the focused widget has one.
    pub fn get_focus(&self) -> Option<String> {
        let st = self.lock();
        let w = st.focused_node()?;
        st.tree.node(w).name.clone()
    }

    /// Hand focus to the named widget.
    pub fn set_focus(&self, name: &str) -> Result<(), Error> {
        let mut st = self.lock();
        let root = st.tree.root().ok_or_else(|| Error::UnknownName(name.to_string()))?;
        let w = st
            .tree
            .find_by_name(root, name)
            .ok_or_else(|| Error::UnknownName(name.to_string()))?;
        switch_focus(&mut st, Some(w));
        Ok(())
    }

    /// Queue a synthetic event. The next `run` call returns it before
    /// waiting for input.
    pub fn queue_event(&self, event: impl Into<String>) {
        self.lock().events.push_back(event.into());
    }

    /// The event most recently returned by [`Form::run`], or `None` before
    /// the first one.
    pub fn last_event(&self) -> Option<String> {
        self.lock().last_event.clone()
    }

    /// Serialize the named widget's subtree (the whole form for an empty
    /// name) to description text, prefixing all names with `prefix`.
    /// With `focus` set, the focused widget carries a `!` marker, so the
    /// dump restores focus when fed back through [`Form::create`].
    pub fn dump(&self, name: &str, prefix: &str, focus: bool) -> Option<String> {
        let st = self.lock();
        let root = st.tree.root()?;
        let w = if name.is_empty() {
            root
        } else {
            st.tree.find_by_name(root, name)?
        };
        let marker = if focus { st.focus } else { 0 };
        Some(dump_widget(&st.tree, w, marker, prefix))
    }

    /// Graft newly parsed widgets relative to the named widget.
    ///
    /// Modes: `replace`, `insert` (first child), `append` (last child),
    /// `before`, `after`; each has an `_inner` variant that splices the
    /// parsed root's children instead of the parsed root itself.
    pub fn modify(&self, name: &str, mode: &str, text: &str) -> Result<(), Error> {
        let mut st = self.lock();
        let root = st.tree.root().ok_or_else(|| Error::UnknownName(name.to_string()))?;
        let w = st
            .tree
            .find_by_name(root, name)
            .ok_or_else(|| Error::UnknownName(name.to_string()))?;
        let n = parse_into(&mut st.tree, text)?;

        match mode {
            "replace" => {
                if st.tree.root() == Some(w) {
                    st.tree.remove(w);
                    st.tree.set_root(n);
                } else {
                    st.tree.insert_after(w, n);
                    st.tree.remove(w);
                }
            }
            "replace_inner" => {
                for child in st.tree.children(w).to_vec() {
                    st.tree.remove(child);
                }
                for child in st.tree.children(n).to_vec() {
                    st.tree.append_child(w, child);
                }
                st.tree.remove(n);
            }
            "insert" => st.tree.prepend_child(w, n),
            "insert_inner" => {
                for child in st.tree.children(n).to_vec().into_iter().rev() {
                    st.tree.prepend_child(w, child);
                }
                st.tree.remove(n);
            }
            "append" => st.tree.append_child(w, n),
            "append_inner" => {
                for child in st.tree.children(n).to_vec() {
                    st.tree.append_child(w, child);
                }
                st.tree.remove(n);
            }
            "before" => st.tree.insert_before(w, n),
            "before_inner" => {
                for child in st.tree.children(n).to_vec() {
                    st.tree.insert_before(w, child);
                }
                st.tree.remove(n);
            }
            "after" => st.tree.insert_after(w, n),
            "after_inner" => {
                for child in st.tree.children(n).to_vec().into_iter().rev() {
                    st.tree.insert_after(w, child);
                }
                st.tree.remove(n);
            }
            other => {
                st.tree.remove(n);
                return Err(Error::UnknownMode(other.to_string()));
            }
        }

        if let Some(root) = st.tree.root() {
            check_setfocus(&mut st, root);
        }
        Ok(())
    }

    /// Draw the form and wait for the next program-level event.
    ///
    /// `timeout < 0` draws and returns immediately, `timeout == 0` blocks
    /// until an event, `timeout > 0` waits at most that many milliseconds
    /// and yields `"TIMEOUT"`. Key presses consumed by widgets redraw and
    /// keep waiting; unconsumed presses surface as `"ENTER"`, `"ESC"`,
    /// `"F<n>"` or `"CHAR(<codepoint>)"` events. Queued synthetic events
    /// are returned first.
    pub fn run(&self, timeout: i64) -> Result<Option<String>, Error> {
        if timeout >= 0 {
            let mut st = self.lock();
            if let Some(queued) = st.events.pop_front() {
                st.last_event = Some(queued.clone());
                return Ok(Some(queued));
            }
        }

        let mut driver_slot = self.driver.lock().expect("driver lock poisoned");
        if driver_slot.is_none() {
            *driver_slot = Some(Driver::new()?);
        }
        let driver = driver_slot.as_mut().expect("driver just initialized");

        let limit = match timeout {
            t if t > 0 => Some(Duration::from_millis(t as u64)),
            _ => None,
        };

        loop {
            {
                let mut st = self.lock();
                let (width, height) = driver.size()?;
                let surface = st.render(width, height);
                driver.present(&surface, st.cursor)?;
            }
            if timeout < 0 {
                return Ok(None);
            }

            match driver.wait_event(limit)? {
                None => {
                    let event = String::from("TIMEOUT");
                    self.lock().last_event = Some(event.clone());
                    return Ok(Some(event));
                }
                Some(Event::Key(ev))
                    if matches!(ev.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
                {
                    if let Some(key) = KeyInput::from_event(&ev) {
                        let mut st = self.lock();
                        if let Some(event) = st.handle_key(&key) {
                            st.last_event = Some(event.clone());
                            return Ok(Some(event));
                        }
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Give the terminal back to the shell. The next `run` call sets it up
    /// again.
    pub fn reset(&self) -> Result<(), Error> {
        if let Some(mut driver) = self.driver.lock().expect("driver lock poisoned").take() {
            driver.shutdown()?;
        }
        Ok(())
    }

    /// Lock the form state for direct inspection or scripted key handling.
    /// Meant for tests and embedding code, not the normal API.
    pub fn with_state<R>(&self, op: impl FnOnce(&mut FormState) -> R) -> R {
        op(&mut self.lock())
    }
}

impl Default for Form {
    fn default() -> Self {
        Form::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn two_inputs() -> Form {
        Form::create("vbox\n  input[a] text[ta]:foo\n  input[b] text[tb]:bar\n").unwrap()
    }

    // -- get/set ------------------------------------------------------------

    #[test]
    fn get_and_set_by_external_name() {
        let form = two_inputs();
        assert_eq!(form.get("ta").as_deref(), Some("foo"));
        form.set("ta", "baz").unwrap();
        assert_eq!(form.get("ta").as_deref(), Some("baz"));
    }

    #[test]
    fn set_unknown_name_is_an_error() {
        let form = two_inputs();
        assert!(matches!(form.set("nope", "x"), Err(Error::UnknownName(_))));
    }

    #[test]
    fn layout_pseudo_variables() {
        let form = two_inputs();
        form.with_state(|st| {
            st.render(20, 4);
        });
        assert_eq!(form.get("a:x").as_deref(), Some("0"));
        assert_eq!(form.get("a:y").as_deref(), Some("0"));
        assert_eq!(form.get("a:w").as_deref(), Some("20"));
        assert_eq!(form.get("b:y").as_deref(), Some("2"));
        assert_eq!(form.get("a:minw").as_deref(), Some("5"));
        assert_eq!(form.get("a:nope"), None);
        assert_eq!(form.get("missing:x"), None);
    }

    // -- focus --------------------------------------------------------------

    #[test]
    fn first_render_focuses_the_first_focusable() {
        let form = two_inputs();
        form.with_state(|st| {
            st.render(20, 4);
        });
        assert_eq!(form.get_focus().as_deref(), Some("a"));
    }

    #[test]
    fn set_focus_by_name() {
        let form = two_inputs();
        form.set_focus("b").unwrap();
        assert_eq!(form.get_focus().as_deref(), Some("b"));
        assert!(form.set_focus("zz").is_err());
    }

    #[test]
    fn parse_time_focus_marker_wins() {
        let form = Form::create("vbox\n  input[a]\n  !input[b]\n").unwrap();
        assert_eq!(form.get_focus().as_deref(), Some("b"));
    }

    #[test]
    fn tab_cycles_focus() {
        let form = two_inputs();
        form.with_state(|st| {
            st.render(20, 4);
            st.handle_key(&KeyInput::plain(Key::Tab));
        });
        assert_eq!(form.get_focus().as_deref(), Some("b"));
        form.with_state(|st| {
            st.handle_key(&KeyInput::plain(Key::Tab));
        });
        assert_eq!(form.get_focus().as_deref(), Some("a"));
    }

    // -- key dispatch -------------------------------------------------------

    #[test]
    fn focused_widget_consumes_text_keys() {
        let form = two_inputs();
        form.with_state(|st| {
            st.render(20, 4);
            assert_eq!(st.handle_key(&KeyInput::ch('!')), None);
        });
        assert_eq!(form.get("ta").as_deref(), Some("!foo"));
    }

    #[test]
    fn unconsumed_keys_become_events() {
        let form = two_inputs();
        form.with_state(|st| {
            st.render(20, 4);
            assert_eq!(st.handle_key(&KeyInput::plain(Key::Enter)).as_deref(), Some("ENTER"));
            assert_eq!(st.handle_key(&KeyInput::plain(Key::Esc)).as_deref(), Some("ESC"));
            assert_eq!(
                st.handle_key(&KeyInput::plain(Key::Function(3))).as_deref(),
                Some("F3")
            );
        });
    }

    #[test]
    fn unfocused_printable_key_reports_its_codepoint() {
        let form = Form::create("label text:x\n").unwrap();
        form.with_state(|st| {
            st.render(10, 1);
            assert_eq!(st.handle_key(&KeyInput::ch('q')).as_deref(), Some("CHAR(113)"));
        });
    }

    #[test]
    fn ancestor_box_handles_navigation_keys() {
        let form = two_inputs();
        form.with_state(|st| {
            st.render(20, 4);
            // The vbox moves focus on DOWN even though the input ignores it.
            assert_eq!(st.handle_key(&KeyInput::plain(Key::Down)), None);
        });
        assert_eq!(form.get_focus().as_deref(), Some("b"));
    }

    // -- modify -------------------------------------------------------------

    #[test]
    fn modify_append_and_replace() {
        let form = Form::create("vbox[v]\n  label[l] text:x\n").unwrap();
        form.modify("v", "append", "label[m] text:y\n").unwrap();
        assert_eq!(
            form.dump("", "", false).unwrap(),
            "{vbox[v]{label[l] text:\"x\"}{label[m] text:\"y\"}}"
        );
        form.modify("l", "replace", "input[i] text:z\n").unwrap();
        assert_eq!(
            form.dump("", "", false).unwrap(),
            "{vbox[v]{input[i] text:\"z\"}{label[m] text:\"y\"}}"
        );
    }

    #[test]
    fn inner_modes_splice_children() {
        let form = Form::create("vbox[v]\n  label[l] text:x\n").unwrap();
        form.modify("v", "replace_inner", "vbox\n  label[p] text:1\n  label[q] text:2\n")
            .unwrap();
        assert_eq!(
            form.dump("", "", false).unwrap(),
            "{vbox[v]{label[p] text:\"1\"}{label[q] text:\"2\"}}"
        );
        form.modify("q", "before_inner", "vbox\n  label[r]\n  label[s]\n").unwrap();
        assert_eq!(
            form.dump("", "", false).unwrap(),
            "{vbox[v]{label[p] text:\"1\"}{label[r]}{label[s]}{label[q] text:\"2\"}}"
        );
    }

    #[test]
    fn modify_unknown_mode_and_name() {
        let form = two_inputs();
        assert!(matches!(form.modify("a", "sideways", "label\n"), Err(Error::UnknownMode(_))));
        assert!(matches!(form.modify("zz", "append", "label\n"), Err(Error::UnknownName(_))));
    }

    #[test]
    fn deleting_the_focused_widget_drops_focus() {
        let form = two_inputs();
        form.set_focus("a").unwrap();
        form.modify("a", "replace", "label[l]\n").unwrap();
        assert_eq!(form.get_focus(), None);
    }

    #[test]
    fn modify_honors_a_focus_marker() {
        let form = two_inputs();
        form.modify("b", "replace", "!input[c]\n").unwrap();
        assert_eq!(form.get_focus().as_deref(), Some("c"));
    }

    #[test]
    fn dump_with_focus_restores_it_on_reparse() {
        let form = two_inputs();
        form.set_focus("b").unwrap();
        let text = form.dump("", "", true).unwrap();
        assert!(text.contains("{!input[b]"));
        let copy = Form::create(&text).unwrap();
        assert_eq!(copy.get_focus().as_deref(), Some("b"));
    }

    #[test]
    fn an_empty_form_answers_nothing() {
        let form = Form::new();
        assert_eq!(form.get("x"), None);
        assert_eq!(form.get_focus(), None);
        assert_eq!(form.dump("", "", false), None);
    }

    // -- events -------------------------------------------------------------

    #[test]
    fn queued_events_come_back_in_order() {
        let form = two_inputs();
        form.queue_event("first");
        form.queue_event("second");
        form.with_state(|st| {
            assert_eq!(st.events.pop_front().as_deref(), Some("first"));
            assert_eq!(st.events.pop_front().as_deref(), Some("second"));
        });
    }

    #[test]
    fn run_remembers_the_event_it_returned() {
        let form = two_inputs();
        assert_eq!(form.last_event(), None);
        form.queue_event("ping");
        form.queue_event("pong");
        assert_eq!(form.run(0).unwrap().as_deref(), Some("ping"));
        assert_eq!(form.last_event().as_deref(), Some("ping"));
        assert_eq!(form.run(0).unwrap().as_deref(), Some("pong"));
        assert_eq!(form.last_event().as_deref(), Some("pong"));
    }
}
