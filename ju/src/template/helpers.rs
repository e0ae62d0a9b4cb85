//! Template function library
//!
//! Each helper is a plain function over JSON values wrapped in a
//! [`FuncHelper`], so helpers work both as `{{abbrev 10 summary}}` and as
//! sub-expressions like `{{join ", " (split ";" labels)}}`.

use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, RenderErrorReason, ScopedJson,
};
use serde::Serialize;
use serde_json::Value as Json;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

use super::{color, time};
use crate::error::{Result, UtilError};

/// Characters treated as line breaks by `indent` and `comment`
pub const LINE_SEPARATORS: [char; 4] = ['\n', '\u{0085}', '\u{2028}', '\u{2029}'];

/// Pretty JSON with 4-space indentation
pub fn to_json(value: &Json) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// `content` followed by `suffix`; content is a string or a byte array
pub fn append(suffix: &str, content: &Json) -> Result<String> {
    match content {
        Json::String(s) => Ok(format!("{}{}", s, suffix)),
        Json::Array(items) => {
            let bytes = items
                .iter()
                .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Vec<u8>>>()
                .ok_or(UtilError::UnsupportedType {
                    helper: "append",
                    actual: "array",
                })?;
            Ok(format!("{}{}", String::from_utf8_lossy(&bytes), suffix))
        }
        other => Err(UtilError::UnsupportedType {
            helper: "append",
            actual: json_type(other),
        }),
    }
}

/// Follow every line break in `content` with `spaces` spaces
pub fn indent(spaces: usize, content: &str) -> Result<String> {
    let breaks = content.chars().filter(|c| LINE_SEPARATORS.contains(c)).count();
    let total = breaks.checked_mul(spaces).and_then(|n| n.checked_add(content.len()));
    let mut out = reserve("indent", spaces, total)?;
    after_line_breaks(&mut out, content, &" ".repeat(if breaks == 0 { 0 } else { spaces }));
    Ok(out)
}

/// Follow every line break in `content` with `"# "`
pub fn comment(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    after_line_breaks(&mut out, content, "# ");
    out
}

fn after_line_breaks(out: &mut String, content: &str, insert: &str) {
    for c in content.chars() {
        out.push(c);
        if LINE_SEPARATORS.contains(&c) {
            out.push_str(insert);
        }
    }
}

/// Empty string with room for `total` bytes, failing instead of aborting
/// when the size overflows or cannot be allocated
fn reserve(helper: &'static str, count: usize, total: Option<usize>) -> Result<String> {
    let too_large = || UtilError::CountTooLarge { helper, count };
    let total = total.ok_or_else(too_large)?;
    let mut out = String::new();
    out.try_reserve_exact(total).map_err(|_| too_large())?;
    Ok(out)
}

pub fn split(sep: &str, content: &str) -> Vec<String> {
    content.split(sep).map(str::to_string).collect()
}

/// Join a list of strings, failing on any other element type
pub fn join(sep: &str, items: &[Json]) -> Result<String> {
    let parts = items
        .iter()
        .map(|item| match item {
            Json::String(s) => Ok(s.as_str()),
            other => Err(UtilError::UnsupportedType {
                helper: "join",
                actual: json_type(other),
            }),
        })
        .collect::<Result<Vec<&str>>>()?;
    Ok(parts.join(sep))
}

/// Truncate to `max` characters, ending in `...` when shortened
pub fn abbrev(max: usize, content: &str) -> String {
    if content.chars().count() <= max {
        return content.to_string();
    }
    if max < 3 {
        return content.chars().take(max).collect();
    }
    let mut out: String = content.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

pub fn rep(count: usize, content: &str) -> Result<String> {
    if content.is_empty() {
        return Ok(String::new());
    }
    let mut out = reserve("rep", count, content.len().checked_mul(count))?;
    for _ in 0..count {
        out.push_str(content);
    }
    Ok(out)
}

/// JSON type name used in error messages
pub fn json_type(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Positional parameters of one helper call
struct Args<'a> {
    helper: &'static str,
    params: Vec<&'a Json>,
}

impl<'a> Args<'a> {
    fn value(&self, idx: usize) -> std::result::Result<&'a Json, RenderError> {
        self.params
            .get(idx)
            .copied()
            .ok_or_else(|| RenderErrorReason::ParamNotFoundForIndex(self.helper, idx).into())
    }

    fn str(&self, idx: usize) -> std::result::Result<&'a str, RenderError> {
        match self.value(idx)? {
            Json::String(s) => Ok(s.as_str()),
            other => Err(to_render_error(UtilError::UnsupportedType {
                helper: self.helper,
                actual: json_type(other),
            })),
        }
    }

    /// Non-negative count; negative numbers clamp to zero
    fn count(&self, idx: usize) -> std::result::Result<usize, RenderError> {
        let value = self.value(idx)?;
        let n = value.as_i64().or_else(|| value.as_f64().map(|f| f as i64));
        match n {
            Some(n) => Ok(usize::try_from(n).unwrap_or(0)),
            None => Err(to_render_error(UtilError::UnsupportedType {
                helper: self.helper,
                actual: json_type(value),
            })),
        }
    }

    fn list(&self, idx: usize) -> std::result::Result<&'a [Json], RenderError> {
        match self.value(idx)? {
            Json::Array(items) => Ok(items.as_slice()),
            other => Err(to_render_error(UtilError::UnsupportedType {
                helper: self.helper,
                actual: json_type(other),
            })),
        }
    }
}

fn to_render_error(err: UtilError) -> RenderError {
    RenderErrorReason::Other(err.to_string()).into()
}

type HelperOutcome = std::result::Result<Json, RenderError>;

type HelperFn = fn(&Args<'_>) -> HelperOutcome;

/// Adapts a [`HelperFn`] to the handlebars helper interface
struct FuncHelper {
    name: &'static str,
    func: HelperFn,
}

impl HelperDef for FuncHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> std::result::Result<ScopedJson<'rc>, RenderError> {
        debug!(helper = self.name, params = h.params().len(), "FuncHelper::call_inner: called");
        let args = Args {
            helper: self.name,
            params: h.params().iter().map(|p| p.value()).collect(),
        };
        (self.func)(&args).map(ScopedJson::Derived)
    }
}

fn lift<T: Into<Json>>(result: Result<T>) -> HelperOutcome {
    result.map(Into::into).map_err(to_render_error)
}

fn to_json_helper(a: &Args<'_>) -> HelperOutcome {
    lift(to_json(a.value(0)?))
}

fn append_helper(a: &Args<'_>) -> HelperOutcome {
    lift(append(a.str(0)?, a.value(1)?))
}

fn indent_helper(a: &Args<'_>) -> HelperOutcome {
    lift(indent(a.count(0)?, a.str(1)?))
}

fn comment_helper(a: &Args<'_>) -> HelperOutcome {
    Ok(comment(a.str(0)?).into())
}

fn color_helper(a: &Args<'_>) -> HelperOutcome {
    Ok(color::color_code(a.str(0)?).into())
}

fn split_helper(a: &Args<'_>) -> HelperOutcome {
    Ok(split(a.str(0)?, a.str(1)?).into())
}

fn join_helper(a: &Args<'_>) -> HelperOutcome {
    lift(join(a.str(0)?, a.list(1)?))
}

fn abbrev_helper(a: &Args<'_>) -> HelperOutcome {
    Ok(abbrev(a.count(0)?, a.str(1)?).into())
}

fn rep_helper(a: &Args<'_>) -> HelperOutcome {
    lift(rep(a.count(0)?, a.str(1)?))
}

fn age_helper(a: &Args<'_>) -> HelperOutcome {
    lift(time::fuzzy_age(a.str(0)?))
}

fn date_format_helper(a: &Args<'_>) -> HelperOutcome {
    lift(time::date_format(a.str(0)?, a.str(1)?))
}

// Names and argument order are relied on by user templates
const HELPERS: &[(&str, HelperFn)] = &[
    ("toJson", to_json_helper),
    ("append", append_helper),
    ("indent", indent_helper),
    ("comment", comment_helper),
    ("color", color_helper),
    ("split", split_helper),
    ("join", join_helper),
    ("abbrev", abbrev_helper),
    ("rep", rep_helper),
    ("age", age_helper),
    ("dateFormat", date_format_helper),
];

/// Names of every registered helper
pub fn helper_names() -> impl Iterator<Item = &'static str> {
    HELPERS.iter().map(|(name, _)| *name)
}

/// Register the whole function library on `hbs`
pub fn register(hbs: &mut Handlebars<'_>) {
    for &(name, func) in HELPERS {
        hbs.register_helper(name, Box::new(FuncHelper { name, func }));
    }
}
