// src/core/color.rs

/// Escape introducer produced by `{color}`.
pub const ESCAPE_INTRODUCER: &str = "\x1b[";

/// The closed table of color and style tokens, in expansion order.
///
/// Fragments are partial: a template composes them as
/// `{color}{bold}{color}{red}` -> `ESC[1;ESC[31m`.
pub const COLOR_TOKENS: &[(&str, &str)] = &[
    ("{black}", "30m"),
    ("{red}", "31m"),
    ("{green}", "32m"),
    ("{other}", "33m"),
    ("{blue}", "34m"),
    ("{purple}", "35m"),
    ("{cyan}", "36m"),
    ("{white}", "37m"),
    ("{bgblack}", "40m"),
    ("{bgred}", "41m"),
    ("{bggreen}", "42m"),
    ("{bgother}", "43m"),
    ("{bgblue}", "44m"),
    ("{bgpurple}", "45m"),
    ("{bgcyan}", "46m"),
    ("{bgwhite}", "47m"),
    ("{texte}", "0;"),
    ("{bold}", "1;"),
    ("{underline}", "4;"),
    ("{reset}", "0m"),
    ("{color}", ESCAPE_INTRODUCER),
];

/// Returns the escape fragment of a color token such as `{red}`.
pub fn lookup_color_token(token: &str) -> Option<&'static str> {
    COLOR_TOKENS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, code)| *code)
}

/// Returns `true` if `token` belongs to the color table.
pub fn is_color_token(token: &str) -> bool {
    lookup_color_token(token).is_some()
}
