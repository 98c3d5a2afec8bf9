//! # termform
//!
//! Structured terminal forms: describe a widget tree in a compact text
//! language, let a two-pass layout engine place it, and route key input
//! through the focused widget up to your program.
//!
//! A form is created from description text and then driven by a small
//! event loop: [`Form::run`] draws the form, waits for input, lets widgets
//! consume what they understand and hands everything else back as
//! program-level events like `"ENTER"` or `"F5"`. Widget attributes are
//! plain strings, readable and writable by external name at any time, so
//! application logic stays out of the widget code entirely.
//!
//! ## Core Systems
//!
//! - **[`parser`]** — Tokenizer and indentation-sensitive grammar for the
//!   description language, including file includes
//! - **[`tree`]** — Slotmap-backed widget tree with scoped attribute lookup
//! - **[`widget`]** / **[`widgets`]** — Behavior dispatch and the built-in
//!   widget set: labels, boxes, inputs, checkboxes, lists, text views and
//!   editors, tables
//! - **[`render`]** — Cell surface, style parsing, line-drawing junctions
//!   and the crossterm terminal driver
//! - **[`event`]** — Key model and user-rebindable key matching
//! - **[`focus`]** — Focus search, cycling and transfer
//! - **[`form`]** — The [`Form`] API tying everything together
//! - **[`dump`]** — Serializing a live tree back to description text
//! - **[`testing`]** — Headless [`Pilot`](testing::Pilot) and snapshot
//!   helpers
//!
//! ## Example
//!
//! ```no_run
//! use termform::Form;
//!
//! let form = Form::create(concat!(
//!     "vbox\n",
//!     "  label text:'Enter your name:'\n",
//!     "  input[name] text[value]:\n",
//! ))?;
//! loop {
//!     match form.run(0)?.as_deref() {
//!         Some("ENTER") | Some("ESC") => break,
//!         _ => {}
//!     }
//! }
//! form.reset()?;
//! println!("hello, {}", form.get("value").unwrap_or_default());
//! # Ok::<(), termform::Error>(())
//! ```

// Foundation
pub mod error;
pub mod geometry;

// Core systems
pub mod parser;
pub mod tree;

// Widget system
pub mod widget;
pub mod widgets;

// Input and focus
pub mod event;
pub mod focus;

// Rendering
pub mod render;

// The form API
pub mod dump;
pub mod form;

// Test support
pub mod testing;

pub use error::Error;
pub use event::{Key, KeyInput};
pub use form::{Form, FormState};
