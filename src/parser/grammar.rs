//! Parser for the form description language.
//!
//! Two surface forms build the same trees. The line form nests by
//! indentation:
//!
//! ```text
//! vbox
//!   label[title] text:"hello"
//!   input#fancy
//!     text:x
//! ```
//!
//! The brace form ignores indentation entirely and is what [`crate::dump`]
//! emits, so dumps re-parse to equivalent trees. A `!` before a widget kind
//! requests focus, `#class` tags the widget for scoped attribute lookup,
//! `[name]` names widgets and attributes for the external API, `<file>`
//! lines splice another file in place, and `*` starts a comment line.
//! Indentation must use spaces; a tab there is an error.

use std::fs;

use crate::error::Error;
use crate::parser::tokenizer::{tokenize, Lexed, Token};
use crate::tree::{Node, NodeId, Tree};
use crate::widget::{behavior, WidgetKind};

const MAX_INCLUDE_DEPTH: usize = 16;

/// Parse a description into `tree`, returning the detached root of the new
/// subtree. The caller decides whether it becomes the tree root or is
/// grafted somewhere.
pub fn parse_into(tree: &mut Tree, text: &str) -> Result<NodeId, Error> {
    let text = expand_includes(text, 0)?;
    let toks = tokenize(&text)?;
    let mut parser = Parser { tree, toks: &toks, pos: 0 };
    parser.parse_document()
}

/// Replace `<file>` lines by the file's contents, shifted to the include
/// line's indentation so nesting composes.
fn expand_includes(text: &str, depth: usize) -> Result<String, Error> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(Error::parse(0, "includes nested too deeply", ""));
    }
    let mut out = String::new();
    for line in text.lines() {
        let body = line.trim_start_matches(' ');
        let indent = line.len() - body.len();
        if let Some(path) = body.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
            let content = fs::read_to_string(path).map_err(|source| Error::Include {
                path: path.to_string(),
                source,
            })?;
            let expanded = expand_includes(&content, depth + 1)?;
            for inner in expanded.lines() {
                for _ in 0..indent {
                    out.push(' ');
                }
                out.push_str(inner);
                out.push('\n');
            }
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }
    Ok(out)
}

struct Parser<'a, 't> {
    tree: &'t mut Tree,
    toks: &'a [Lexed<'a>],
    pos: usize,
}

impl<'a, 't> Parser<'a, 't> {
    fn peek(&self) -> Option<&Lexed<'a>> {
        self.toks.get(self.pos)
    }

    fn bump(&mut self) -> Option<&Lexed<'a>> {
        let t = self.toks.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn line(&self) -> usize {
        self.toks
            .get(self.pos)
            .or_else(|| self.toks.last())
            .map_or(1, |t| t.line)
    }

    /// True when the token at `pos + ahead` exists and touches the end of
    /// the token before it. Values and compound headers require adjacency.
    fn adjacent(&self, ahead: usize) -> bool {
        let Some(at) = (self.pos + ahead).checked_sub(1) else { return false };
        match (self.toks.get(at), self.toks.get(at + 1)) {
            (Some(prev), Some(next)) => prev.end == next.start,
            _ => false,
        }
    }

    fn skip_to_newline(&mut self) {
        while let Some(t) = self.peek() {
            if t.tok == Token::Newline {
                break;
            }
            self.pos += 1;
        }
    }

    // -- document (line form) ----------------------------------------------

    fn parse_document(&mut self) -> Result<NodeId, Error> {
        let mut stack: Vec<(NodeId, i32)> = Vec::new();
        let mut root: Option<NodeId> = None;

        while self.peek().is_some() {
            let indent = self.measure_indent()?;
            let Some(&first) = self.peek() else { break };
            match first.tok {
                Token::Newline => {
                    self.pos += 1;
                    continue;
                }
                Token::Word if first.text.starts_with('*') => {
                    self.skip_to_newline();
                    continue;
                }
                Token::BraceOpen | Token::Word => {}
                _ => {
                    return Err(Error::parse(first.line, "unexpected token", first.text));
                }
            }

            let current = if first.tok == Token::Word && self.looks_like_kv() {
                // Attribute-only line: belongs to the most recent widget.
                match stack.last() {
                    Some(&(w, _)) => w,
                    None => {
                        return Err(Error::parse(first.line, "attribute before any widget", first.text));
                    }
                }
            } else {
                while stack.last().is_some_and(|&(_, i)| i >= indent) {
                    stack.pop();
                }
                let parent = stack.last().map(|&(w, _)| w);
                if parent.is_none() && root.is_some() {
                    return Err(Error::parse(first.line, "multiple root widgets", first.text));
                }
                let node = if first.tok == Token::BraceOpen {
                    self.parse_braced(parent)?
                } else {
                    self.parse_widget_header(parent)?
                };
                if parent.is_none() {
                    root = Some(node);
                }
                stack.push((node, indent));
                node
            };

            self.parse_line_rest(current)?;
        }

        root.ok_or_else(|| Error::parse(self.line(), "empty form description", ""))
    }

    /// Consume leading whitespace of a line and return its width.
    fn measure_indent(&mut self) -> Result<i32, Error> {
        match self.peek() {
            Some(t) if t.tok == Token::Space => {
                if t.text.contains('\t') {
                    return Err(Error::parse(t.line, "tab character in indentation", t.text));
                }
                let width = t.text.len() as i32;
                self.pos += 1;
                Ok(width)
            }
            _ => Ok(0),
        }
    }

    /// Remaining items on the current line: attributes and brace blocks.
    fn parse_line_rest(&mut self, current: NodeId) -> Result<(), Error> {
        loop {
            match self.peek().map(|t| t.tok) {
                Some(Token::Space) => {
                    self.pos += 1;
                }
                Some(Token::Newline) => {
                    self.pos += 1;
                    return Ok(());
                }
                None => return Ok(()),
                Some(Token::Word) if self.looks_like_kv() => {
                    self.parse_kv(current)?;
                }
                Some(Token::BraceOpen) => {
                    self.parse_braced(Some(current))?;
                }
                Some(_) => {
                    let t = self.toks[self.pos];
                    return Err(Error::parse(t.line, "unexpected token on line", t.text));
                }
            }
        }
    }

    /// Word followed (adjacently) by `:` or `[name]:` is an attribute.
    fn looks_like_kv(&self) -> bool {
        match self.toks.get(self.pos + 1).map(|t| t.tok) {
            Some(Token::Colon) => self.adjacent(1),
            Some(Token::BracketOpen) => {
                self.adjacent(1)
                    && matches!(self.toks.get(self.pos + 2).map(|t| t.tok), Some(Token::Word))
                    && matches!(self.toks.get(self.pos + 3).map(|t| t.tok), Some(Token::BracketClose))
                    && matches!(self.toks.get(self.pos + 4).map(|t| t.tok), Some(Token::Colon))
            }
            _ => false,
        }
    }

    // -- widgets -----------------------------------------------------------

    /// `[!]kind[#class]` with an optional `[name]`, attached under `parent`.
    fn parse_widget_header(&mut self, parent: Option<NodeId>) -> Result<NodeId, Error> {
        let line = self.line();
        let t = *self.bump().ok_or_else(|| Error::parse(line, "expected widget", ""))?;
        let mut word = t.text;
        let setfocus = word.starts_with('!');
        if setfocus {
            word = &word[1..];
        }
        let (kind_name, class) = match word.split_once('#') {
            Some((k, c)) => (k, Some(c.to_string())),
            None => (word, None),
        };
        let kind = WidgetKind::parse(kind_name)
            .ok_or_else(|| Error::parse(t.line, "unknown widget type", kind_name))?;

        let name = self.parse_bracketed_name();

        let mut node = Node::new(kind);
        node.class = class;
        node.name = name;
        node.setfocus = setfocus;
        let id = match parent {
            Some(p) => self.tree.insert_child(p, node),
            None => self.tree.insert_detached(node),
        };
        behavior(kind).init(self.tree, id);
        Ok(id)
    }

    /// An adjacent `[name]` suffix, if present.
    fn parse_bracketed_name(&mut self) -> Option<String> {
        if self.peek().map(|t| t.tok) != Some(Token::BracketOpen) || !self.adjacent(0) {
            return None;
        }
        let name = match self.toks.get(self.pos + 1) {
            Some(t) if t.tok == Token::Word => {
                if self.toks.get(self.pos + 2).map(|t| t.tok) != Some(Token::BracketClose) {
                    return None;
                }
                self.pos += 3;
                t.text.to_string()
            }
            Some(t) if t.tok == Token::BracketClose => {
                self.pos += 2;
                String::new()
            }
            _ => return None,
        };
        Some(name)
    }

    /// `{kind kvs child-blocks...}` with indentation ignored inside.
    fn parse_braced(&mut self, parent: Option<NodeId>) -> Result<NodeId, Error> {
        self.pos += 1; // the opening brace
        self.skip_blank();
        let node = self.parse_widget_header(parent)?;
        loop {
            self.skip_blank();
            match self.peek().map(|t| t.tok) {
                Some(Token::BraceClose) => {
                    self.pos += 1;
                    return Ok(node);
                }
                Some(Token::BraceOpen) => {
                    self.parse_braced(Some(node))?;
                }
                Some(Token::Word) if self.looks_like_kv() => {
                    self.parse_kv(node)?;
                }
                Some(_) => {
                    let t = self.toks[self.pos];
                    return Err(Error::parse(t.line, "unexpected token in block", t.text));
                }
                None => {
                    return Err(Error::parse(self.line(), "unterminated block", ""));
                }
            }
        }
    }

    fn skip_blank(&mut self) {
        while matches!(self.peek().map(|t| t.tok), Some(Token::Space | Token::Newline)) {
            self.pos += 1;
        }
    }

    // -- attributes --------------------------------------------------------

    /// `key:value` or `key[name]:value`.
    fn parse_kv(&mut self, w: NodeId) -> Result<(), Error> {
        let key = self.bump().map(|t| t.text.to_string()).unwrap_or_default();
        let name = self.parse_bracketed_name();
        let line = self.line();
        let colon = *self.bump().ok_or_else(|| Error::parse(line, "expected ':'", ""))?;
        if colon.tok != Token::Colon {
            return Err(Error::parse(colon.line, "expected ':'", colon.text));
        }
        let value = self.parse_value(colon.end);
        let node = self.tree.node_mut(w);
        match name {
            Some(n) => node.set_kv_named(&key, value, n),
            None => node.set_kv(&key, value),
        }
        Ok(())
    }

    /// A value is the concatenation of adjacent bare and quoted runs; it
    /// ends at whitespace, a brace, or the first gap between tokens.
    fn parse_value(&mut self, mut last_end: usize) -> String {
        let mut out = String::new();
        while let Some(&t) = self.peek() {
            if t.start != last_end {
                break;
            }
            match t.tok {
                Token::Space | Token::Newline | Token::BraceOpen | Token::BraceClose => break,
                Token::SingleQuoted | Token::DoubleQuoted => {
                    out.push_str(&t.text[1..t.text.len() - 1]);
                }
                _ => out.push_str(t.text),
            }
            last_end = t.end;
            self.pos += 1;
        }
        out
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (Tree, NodeId) {
        let mut tree = Tree::default();
        let root = parse_into(&mut tree, text).expect("parse failed");
        tree.set_root(root);
        (tree, root)
    }

    fn kv(tree: &Tree, w: NodeId, key: &str) -> String {
        tree.node(w).kv(key).map(|kv| kv.value.clone()).unwrap_or_default()
    }

    // -- line form ----------------------------------------------------------

    #[test]
    fn indentation_nests_widgets() {
        let (tree, root) = parse("vbox\n  label text:\"a\"\n  hbox\n    label text:\"b\"\n");
        assert_eq!(tree.node(root).kind, WidgetKind::Vbox);
        let kids = tree.children(root).to_vec();
        assert_eq!(kids.len(), 2);
        assert_eq!(tree.node(kids[0]).kind, WidgetKind::Label);
        assert_eq!(tree.node(kids[1]).kind, WidgetKind::Hbox);
        let inner = tree.children(kids[1]).to_vec();
        assert_eq!(inner.len(), 1);
        assert_eq!(kv(&tree, inner[0], "text"), "b");
    }

    #[test]
    fn dedent_returns_to_the_right_parent() {
        let (tree, root) = parse("vbox\n  hbox\n    label text:a\n  label text:b\n");
        let kids = tree.children(root).to_vec();
        assert_eq!(kids.len(), 2);
        assert_eq!(kv(&tree, kids[1], "text"), "b");
    }

    #[test]
    fn kv_only_lines_attach_to_the_widget_above() {
        let (tree, root) = parse("vbox\n  input[i]\n    text:hello\n    pos:2\n");
        let input = tree.children(root)[0];
        assert_eq!(kv(&tree, input, "text"), "hello");
        assert_eq!(kv(&tree, input, "pos"), "2");
    }

    #[test]
    fn names_classes_and_focus_marker() {
        let (tree, root) = parse("vbox\n  !input#fancy[query] text:x\n");
        let input = tree.children(root)[0];
        let node = tree.node(input);
        assert_eq!(node.kind, WidgetKind::Input);
        assert_eq!(node.name.as_deref(), Some("query"));
        assert_eq!(node.class.as_deref(), Some("fancy"));
        assert!(node.setfocus);
        // The parser ran the widget's init hook.
        assert!(node.focusable);
    }

    #[test]
    fn named_attributes_keep_their_external_name() {
        let (tree, root) = parse("label text[greeting]:\"hi\"\n");
        let kv = tree.node(root).kv("text").unwrap();
        assert_eq!(kv.value, "hi");
        assert_eq!(kv.name.as_deref(), Some("greeting"));
    }

    #[test]
    fn comment_and_blank_lines_are_skipped() {
        let (tree, root) = parse("* a comment\n\nvbox\n  * another\n  label text:x\n");
        assert_eq!(tree.children(root).len(), 1);
    }

    // -- values -------------------------------------------------------------

    #[test]
    fn adjacent_runs_concatenate() {
        let (tree, root) = parse("label text:ab'c d'\"e'f\"g\n");
        assert_eq!(kv(&tree, root, "text"), "abc de'fg");
    }

    #[test]
    fn empty_and_spaced_values() {
        let (tree, root) = parse("label text: other:'a b'\n");
        assert_eq!(kv(&tree, root, "text"), "");
        assert_eq!(kv(&tree, root, "other"), "a b");
    }

    #[test]
    fn values_may_contain_colons_and_brackets() {
        let (tree, root) = parse("label text:a:b[c]\n");
        assert_eq!(kv(&tree, root, "text"), "a:b[c]");
    }

    // -- brace form ---------------------------------------------------------

    #[test]
    fn brace_blocks_ignore_indentation() {
        let (tree, root) = parse("{vbox{label text:\"a\"}{input[i] text:\"b\"}}");
        assert_eq!(tree.node(root).kind, WidgetKind::Vbox);
        let kids = tree.children(root).to_vec();
        assert_eq!(kids.len(), 2);
        assert_eq!(kv(&tree, kids[1], "text"), "b");
        assert_eq!(tree.node(kids[1]).name.as_deref(), Some("i"));
    }

    #[test]
    fn brace_block_nests_under_an_indented_parent() {
        let (tree, root) = parse("vbox\n  {hbox{label text:x}}\n  label text:y\n");
        let kids = tree.children(root).to_vec();
        assert_eq!(kids.len(), 2);
        assert_eq!(tree.node(kids[0]).kind, WidgetKind::Hbox);
    }

    // -- errors -------------------------------------------------------------

    #[test]
    fn tab_indentation_is_rejected() {
        let mut tree = Tree::default();
        let err = parse_into(&mut tree, "vbox\n\tlabel\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn unknown_widget_is_rejected() {
        let mut tree = Tree::default();
        assert!(parse_into(&mut tree, "button\n").is_err());
    }

    #[test]
    fn unterminated_block_is_rejected() {
        let mut tree = Tree::default();
        assert!(parse_into(&mut tree, "{vbox{label}").is_err());
    }

    #[test]
    fn second_root_is_rejected() {
        let mut tree = Tree::default();
        assert!(parse_into(&mut tree, "vbox\nvbox\n").is_err());
    }

    #[test]
    fn empty_description_is_rejected() {
        let mut tree = Tree::default();
        assert!(parse_into(&mut tree, "* nothing here\n").is_err());
    }

    #[test]
    fn missing_include_reports_the_path() {
        let mut tree = Tree::default();
        let err = parse_into(&mut tree, "<does-not-exist.stfl>\n").unwrap_err();
        assert!(matches!(err, Error::Include { .. }));
    }
}
