//! Integration tests for termform.
//!
//! These tests exercise the public API from outside the crate: parsing a
//! description, laying it out, driving it with keys through the headless
//! pilot, and reading the results back through named attributes.

use pretty_assertions::assert_eq;
use termform::testing::Pilot;
use termform::{Error, Form, Key, KeyInput};

fn layout(form: &Form, width: i32, height: i32) {
    form.with_state(|st| {
        st.render(width, height);
    });
}

fn rect(form: &Form, name: &str) -> (String, String, String, String) {
    (
        form.get(&format!("{name}:x")).unwrap(),
        form.get(&format!("{name}:y")).unwrap(),
        form.get(&format!("{name}:w")).unwrap(),
        form.get(&format!("{name}:h")).unwrap(),
    )
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn nested_boxes_share_the_terminal() {
    let form = Form::create(concat!(
        "vbox[v]\n",
        "  label[a] text:A\n",
        "  hbox[h]\n",
        "    label[b] text:B\n",
        "    input[i]\n",
    ))
    .unwrap();
    layout(&form, 10, 3);

    assert_eq!(rect(&form, "a"), ("0".into(), "0".into(), "10".into(), "1".into()));
    assert_eq!(rect(&form, "h"), ("0".into(), "1".into(), "10".into(), "2".into()));
    assert_eq!(rect(&form, "b"), ("0".into(), "1".into(), "3".into(), "2".into()));
    assert_eq!(rect(&form, "i"), ("3".into(), "1".into(), "7".into(), "2".into()));
}

#[test]
fn layout_is_idempotent() {
    let text = concat!(
        "vbox\n",
        "  label[a] text:alpha\n",
        "  hbox[h]\n",
        "    input[i] size:8\n",
        "    checkbox[c]\n",
        "  label[z] text:omega\n",
    );
    let form = Form::create(text).unwrap();
    layout(&form, 24, 6);
    let first: Vec<_> = ["a", "h", "i", "c", "z"].iter().map(|n| rect(&form, n)).collect();
    layout(&form, 24, 6);
    let second: Vec<_> = ["a", "h", "i", "c", "z"].iter().map(|n| rect(&form, n)).collect();
    assert_eq!(first, second);
}

#[test]
fn box_children_tile_without_gaps_or_overlap() {
    let form = Form::create(concat!(
        "vbox\n",
        "  label[l0] text:a\n",
        "  label[l1] text:b\n",
        "  label[l2] text:c\n",
    ))
    .unwrap();
    layout(&form, 8, 7);

    let mut next_y = 0;
    let mut total = 0;
    for name in ["l0", "l1", "l2"] {
        let y: i32 = form.get(&format!("{name}:y")).unwrap().parse().unwrap();
        let h: i32 = form.get(&format!("{name}:h")).unwrap().parse().unwrap();
        assert_eq!(y, next_y);
        next_y = y + h;
        total += h;
    }
    assert_eq!(total, 7);
}

#[test]
fn expand_opt_out_in_description_text_keeps_minimum_height() {
    let form = Form::create(concat!(
        "vbox\n",
        "  label[fixed] text:a .expand:0\n",
        "  label[grow] text:b\n",
    ))
    .unwrap();
    layout(&form, 5, 6);

    assert_eq!(form.get("fixed:h").as_deref(), Some("1"));
    assert_eq!(form.get("grow:h").as_deref(), Some("5"));
}

#[test]
fn table_span_minimum_grows_covered_columns_evenly() {
    let form = Form::create(concat!(
        "table\n",
        "  label[aa] text:aa\n",
        "  label[bb] text:bb\n",
        "  tablebr\n",
        "  label[cc] text:cccccc .colspan:2\n",
    ))
    .unwrap();
    layout(&form, 6, 2);

    // The 6-wide span forces 2+2 column minima up to 3+3.
    assert_eq!(rect(&form, "aa"), ("0".into(), "0".into(), "3".into(), "1".into()));
    assert_eq!(rect(&form, "bb"), ("3".into(), "0".into(), "3".into(), "1".into()));
    assert_eq!(rect(&form, "cc"), ("0".into(), "1".into(), "6".into(), "1".into()));
}

#[test]
fn bordered_table_cell_draws_a_frame() {
    let mut pilot = Pilot::new("table\n  label text:ab .border:lrtb\n", 8, 3).unwrap();
    insta::assert_snapshot!(pilot.screen(), @" ┌────┐\n │ ab │\n └────┘");
}

#[test]
fn bordered_table_grid_shares_rules_at_junctions() {
    let mut pilot = Pilot::new(
        concat!(
            "table\n",
            "  label text:a .border:lrtb\n",
            "  label text:b .border:lrtb\n",
            "  tablebr\n",
            "  label text:c .border:lrtb\n",
            "  label text:d .border:lrtb\n",
        ),
        11,
        5,
    )
    .unwrap();
    insta::assert_snapshot!(
        pilot.screen(),
        @" ┌───┬───┐\n │ a │ b │\n ├───┼───┤\n │ c │ d │\n └───┴───┘"
    );
}

#[test]
fn class_configuration_beats_kind_configuration() {
    let form = Form::create(concat!(
        "vbox @input#size:9 @fancy#size:7\n",
        "  input#fancy[i]\n",
    ))
    .unwrap();
    layout(&form, 20, 1);
    assert_eq!(form.get("i:minw").as_deref(), Some("7"));
}

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[test]
fn tab_cycles_through_every_focusable_and_wraps() {
    let mut pilot = Pilot::new(
        concat!("vbox\n", "  input[a]\n", "  input[b]\n", "  input[c]\n"),
        20,
        3,
    )
    .unwrap();
    assert_eq!(pilot.form().get_focus().as_deref(), Some("a"));
    pilot.press_plain(Key::Tab);
    assert_eq!(pilot.form().get_focus().as_deref(), Some("b"));
    pilot.press_plain(Key::Tab);
    assert_eq!(pilot.form().get_focus().as_deref(), Some("c"));
    pilot.press_plain(Key::Tab);
    assert_eq!(pilot.form().get_focus().as_deref(), Some("a"));
}

#[test]
fn arrow_keys_move_focus_inside_a_box() {
    let mut pilot = Pilot::new(
        concat!("hbox\n", "  input[a]\n", "  input[b]\n"),
        20,
        1,
    )
    .unwrap();
    pilot.press_plain(Key::Right);
    assert_eq!(pilot.form().get_focus().as_deref(), Some("b"));
    pilot.press_plain(Key::Left);
    assert_eq!(pilot.form().get_focus().as_deref(), Some("a"));
}

// ---------------------------------------------------------------------------
// Interaction
// ---------------------------------------------------------------------------

#[test]
fn typing_edits_the_focused_input() {
    let mut pilot = Pilot::new("input[i] text[t]:\n", 12, 1).unwrap();
    pilot.type_text("hello");
    assert_eq!(pilot.form().get("t").as_deref(), Some("hello"));
    assert_eq!(pilot.cursor(), Some((5, 0)));
}

#[test]
fn space_toggles_a_checkbox() {
    let mut pilot = Pilot::new(
        concat!("vbox\n", "  checkbox[c] value[v]:0\n"),
        10,
        1,
    )
    .unwrap();
    pilot.press(KeyInput::ch(' '));
    assert_eq!(pilot.form().get("v").as_deref(), Some("1"));
    pilot.press(KeyInput::ch(' '));
    assert_eq!(pilot.form().get("v").as_deref(), Some("0"));
}

#[test]
fn list_selection_tracks_arrow_keys() {
    let mut pilot = Pilot::new(
        concat!(
            "list[l] pos_name[pn]:\n",
            "  listitem[one] text:one\n",
            "  listitem[two] text:two\n",
            "  listitem[three] text:three\n",
        ),
        10,
        3,
    )
    .unwrap();
    pilot.press_plain(Key::Down);
    pilot.press_plain(Key::Down);
    pilot.screen();
    assert_eq!(pilot.form().get("pn").as_deref(), Some("three"));
}

#[test]
fn text_editor_splits_lines_on_enter() {
    let mut pilot = Pilot::new(
        concat!("textedit[e]\n", "  listitem text:hi\n"),
        10,
        3,
    )
    .unwrap();
    pilot.press_plain(Key::End);
    pilot.type_text("!");
    pilot.press_plain(Key::Enter);
    pilot.type_text("yo");
    assert_eq!(pilot.screen(), "hi!\nyo\n~");
    assert!(pilot.events().is_empty());
}

#[test]
fn unhandled_keys_become_program_events() {
    let mut pilot = Pilot::new("label text:idle\n", 10, 1).unwrap();
    assert_eq!(pilot.press_plain(Key::Enter).as_deref(), Some("ENTER"));
    assert_eq!(pilot.press_plain(Key::Esc).as_deref(), Some("ESC"));
    assert_eq!(pilot.press_plain(Key::Function(5)).as_deref(), Some("F5"));
    assert_eq!(pilot.press(KeyInput::ch('x')).as_deref(), Some("CHAR(120)"));
}

// ---------------------------------------------------------------------------
// Round trips and modification
// ---------------------------------------------------------------------------

#[test]
fn dump_is_a_fixpoint_through_reparse() {
    let form = Form::create(concat!(
        "vbox#main[outer]\n",
        "  label[l] text:'hello world' style_normal:fg=red\n",
        "  hbox\n",
        "    input[i] text[t]:\"don't\"\n",
        "    checkbox value:1\n",
    ))
    .unwrap();
    let once = form.dump("", "", false).unwrap();
    let reparsed = Form::create(&once).unwrap();
    assert_eq!(reparsed.dump("", "", false).unwrap(), once);
}

#[test]
fn modified_widgets_join_the_next_layout() {
    let form = Form::create(concat!("vbox[v]\n", "  label[a] text:x\n")).unwrap();
    form.modify("v", "append", "input[b]\n").unwrap();
    layout(&form, 10, 2);
    assert_eq!(rect(&form, "a").1, "0");
    assert_eq!(rect(&form, "b").1, "1");
    assert_eq!(form.get_focus().as_deref(), Some("b"));
}

#[test]
fn name_prefix_applies_to_widgets_and_attributes() {
    let form = Form::create("label[l] text[t]:x\n").unwrap();
    assert_eq!(form.dump("", "pre_", false).unwrap(), "{label[pre_l] text[pre_t]:\"x\"}");
}

#[test]
fn queued_events_return_before_any_terminal_work() {
    let form = Form::create("label text:x\n").unwrap();
    form.queue_event("my-event");
    assert_eq!(form.run(0).unwrap().as_deref(), Some("my-event"));
}

#[test]
fn errors_carry_the_offending_name() {
    let form = Form::create("label[l]\n").unwrap();
    match form.set("nope", "1") {
        Err(Error::UnknownName(name)) => assert_eq!(name, "nope"),
        other => panic!("expected UnknownName, got {other:?}"),
    }
    match form.modify("l", "swizzle", "label\n") {
        Err(Error::UnknownMode(mode)) => assert_eq!(mode, "swizzle"),
        other => panic!("expected UnknownMode, got {other:?}"),
    }
}
