//! Style strings and cell styles.
//!
//! Style kvs hold comma-separated `fg=<color>`, `bg=<color>` and `attr=<attr>`
//! terms. They resolve through the scoped kv lookup, so a container can
//! restyle a whole subtree. Unknown color or attribute names are a fatal
//! error: style strings come from the program, not the user.

/// The eight named terminal colors. Absent means the terminal default.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl NamedColor {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "black" => Some(NamedColor::Black),
            "red" => Some(NamedColor::Red),
            "green" => Some(NamedColor::Green),
            "yellow" => Some(NamedColor::Yellow),
            "blue" => Some(NamedColor::Blue),
            "magenta" => Some(NamedColor::Magenta),
            "cyan" => Some(NamedColor::Cyan),
            "white" => Some(NamedColor::White),
            _ => None,
        }
    }
}

/// Resolved display attributes for one cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub fg: Option<NamedColor>,
    pub bg: Option<NamedColor>,
    pub standout: bool,
    pub underline: bool,
    pub reverse: bool,
    pub blink: bool,
    pub dim: bool,
    pub bold: bool,
    pub protect: bool,
    pub invis: bool,
}

/// Parse a style string like `fg=red,bg=black,attr=bold,attr=underline`.
///
/// The empty string yields the default style; empty terms are skipped.
///
/// # Panics
///
/// Panics on unknown terms, colors or attribute names.
pub fn parse_style(spec: &str) -> CellStyle {
    let mut style = CellStyle::default();

    for term in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(color) = term.strip_prefix("fg=") {
            style.fg = Some(
                NamedColor::parse(color)
                    .unwrap_or_else(|| panic!("unknown color in style string: {color:?}")),
            );
        } else if let Some(color) = term.strip_prefix("bg=") {
            style.bg = Some(
                NamedColor::parse(color)
                    .unwrap_or_else(|| panic!("unknown color in style string: {color:?}")),
            );
        } else if let Some(attr) = term.strip_prefix("attr=") {
            match attr {
                "standout" => style.standout = true,
                "underline" => style.underline = true,
                "reverse" => style.reverse = true,
                "blink" => style.blink = true,
                "dim" => style.dim = true,
                "bold" => style.bold = true,
                "protect" => style.protect = true,
                "invis" => style.invis = true,
                _ => panic!("unknown attribute in style string: {attr:?}"),
            }
        } else {
            panic!("unknown term in style string: {term:?}");
        }
    }

    style
}

// ===========================================================================
// Tests
// ===========================================================================
