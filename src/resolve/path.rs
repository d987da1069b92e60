//! Path-template interpolation and RFC 6901 pointer construction.

use crate::types::Context;

/// String-level token replacement with no pointer escaping. Used for
/// message strings and other non-pointer templates.
#[must_use]
pub fn interpolate(template: &str, ctx: &Context) -> String {
    render(template, ctx, false)
}

/// Resolve a path template to a concrete RFC 6901 pointer: interpolate each
/// `{...}` token with segment-safe escaping, then guarantee a leading `/`.
#[must_use]
pub fn to_pointer(template: &str, ctx: &Context) -> String {
    let mut out = render(template, ctx, true);
    if !out.starts_with('/') {
        out.insert(0, '/');
    }
    out
}

/// Scan for `{...}` tokens and substitute each with its resolved text.
/// Escaping applies to the substituted token only, never to the surrounding
/// template, so literal `/` typed by the plan author stays a separator.
/// An unterminated `{` is copied through verbatim.
fn render(template: &str, ctx: &Context, escape: bool) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let token = after[..close].trim();
        let resolved = super::lookup_dotted(ctx, token)
            .map(super::stringify)
            .unwrap_or_default();
        if escape {
            out.push_str(&escape_segment(&resolved));
        } else {
            out.push_str(&resolved);
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

/// RFC 6901 segment escaping. `~` must be rewritten before `/` so the two
/// conversions cannot interfere.
#[must_use]
pub(crate) fn escape_segment(seg: &str) -> String {
    seg.replace('~', "~0").replace('/', "~1")
}

/// RFC 6901 segment unescaping; `~1` before `~0`, mirroring the escape order.
#[must_use]
pub(crate) fn unescape_segment(seg: &str) -> String {
    seg.replace("~1", "/").replace("~0", "~")
}

/// Split a pointer into unescaped reference tokens. The empty pointer has no
/// tokens; `/` has a single empty token.
#[must_use]
pub(crate) fn pointer_segments(pointer: &str) -> Vec<String> {
    match pointer.strip_prefix('/') {
        Some(rest) => rest.split('/').map(unescape_segment).collect(),
        None => Vec::new(),
    }
}
