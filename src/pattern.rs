//! Path pattern compilation
//!
//! Turns a route specification into a matcher at registration time. Templates
//! use `:name` for a required parameter, `:name?` for an optional one, a
//! literal extension after the parameter (`:title.mp4`), and `*` for a
//! wildcard captured under the name `wild`. A template without placeholders
//! compiles to a plain string comparison instead of a regular expression.
//!
//! `loose` compilation (used for middleware and mount registrations)
//! additionally matches any pathname that extends the template by whole
//! segments: `/foo` matches `/foo`, `/foo/`, and `/foo/anything`, but never
//! `/foobar`.

use regex::Regex;

use crate::params::Params;

/// Route specification accepted at registration time.
///
/// The empty template (`""`) means "match every pathname", used when a route
/// is registered with no path at all.
#[derive(Debug, Clone)]
pub enum RouteSpec {
    /// Match every pathname.
    Any,
    /// A path template, e.g. `/users/:id` or `/files/*`.
    Template(String),
    /// A caller-supplied regular expression, used as-is.
    Pattern(Regex),
}

impl From<&str> for RouteSpec {
    fn from(template: &str) -> Self {
        if template.is_empty() {
            Self::Any
        } else {
            Self::Template(template.to_owned())
        }
    }
}

impl From<String> for RouteSpec {
    fn from(template: String) -> Self {
        if template.is_empty() {
            Self::Any
        } else {
            Self::Template(template)
        }
    }
}

impl From<Regex> for RouteSpec {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

/// A compiled pattern. Created once per registration, immutable afterwards.
#[derive(Debug, Clone)]
pub(crate) enum Pattern {
    /// Matches every pathname.
    MatchAll,
    /// Placeholder-free template, matched by string comparison.
    /// `path` is normalized: leading `/`, no trailing `/`, `""` for the root.
    Literal { path: String, loose: bool },
    /// Template with placeholders; parameter names are extracted positionally.
    Named { regex: Regex, keys: Vec<String> },
    /// Caller-supplied expression with named capture groups.
    NamedGroups { regex: Regex },
}

impl Pattern {
    /// Compile a route specification.
    ///
    /// A caller-supplied regular expression is never altered: with named
    /// capture groups it extracts those groups, without it is a pure
    /// existence test (`Named` with no keys).
    pub(crate) fn compile(spec: RouteSpec, loose: bool) -> Self {
        match spec {
            RouteSpec::Any => Self::MatchAll,
            RouteSpec::Pattern(regex) => {
                if regex.capture_names().flatten().next().is_some() {
                    Self::NamedGroups { regex }
                } else {
                    Self::Named {
                        regex,
                        keys: Vec::new(),
                    }
                }
            }
            RouteSpec::Template(template) => Self::compile_template(&template, loose),
        }
    }

    fn compile_template(template: &str, loose: bool) -> Self {
        let segments: Vec<&str> = template.split('/').filter(|s| !s.is_empty()).collect();

        if segments.iter().all(|s| !s.starts_with(':') && !s.starts_with('*')) {
            let mut path = String::new();
            for seg in &segments {
                path.push('/');
                path.push_str(seg);
            }
            return Self::Literal { path, loose };
        }

        let mut src = String::from("^");
        let mut keys = Vec::new();
        for seg in segments {
            if let Some(rest) = seg.strip_prefix(':') {
                let opt = rest.find('?');
                let ext = rest.find('.');
                let key_end = match (opt, ext) {
                    (Some(a), Some(b)) => a.min(b),
                    (Some(a), None) => a,
                    (None, Some(b)) => b,
                    (None, None) => rest.len(),
                };
                keys.push(rest[..key_end].to_owned());
                match (opt, ext) {
                    (Some(_), None) => src.push_str("(?:/([^/]+?))?"),
                    (None, None) => src.push_str("/([^/]+?)"),
                    (q, Some(d)) => {
                        src.push_str("/([^/]+?)");
                        if q.is_some() {
                            src.push('?');
                        }
                        src.push_str(&regex::escape(rest[d..].trim_end_matches('?')));
                    }
                }
            } else if seg.starts_with('*') {
                keys.push("wild".to_owned());
                src.push_str("/(.*)");
            } else {
                src.push('/');
                src.push_str(&regex::escape(seg));
            }
        }
        src.push_str(if loose { "(?:/|$)" } else { "/?$" });

        let regex = Regex::new(&src).expect("template fragments compile to a valid expression");
        Self::Named { regex, keys }
    }

    /// Test `pathname` against this pattern, inserting captured parameters
    /// into `params` on a match. `params` is untouched when the test fails.
    pub(crate) fn matches(&self, pathname: &str, params: &mut Params) -> bool {
        match self {
            Self::MatchAll => true,
            Self::Literal { path, loose } => {
                if pathname == path.as_str() {
                    return true;
                }
                match pathname.strip_prefix(path.as_str()) {
                    Some("/") => true,
                    Some(rest) => *loose && rest.starts_with('/'),
                    None => false,
                }
            }
            Self::Named { regex, keys } if keys.is_empty() => regex.is_match(pathname),
            Self::Named { regex, keys } => {
                let Some(caps) = regex.captures(pathname) else {
                    return false;
                };
                for (idx, key) in keys.iter().enumerate() {
                    // Optional groups that did not participate capture nothing.
                    if let Some(m) = caps.get(idx + 1) {
                        params.insert(key.clone(), m.as_str());
                    }
                }
                true
            }
            Self::NamedGroups { regex } => {
                let Some(caps) = regex.captures(pathname) else {
                    return false;
                };
                for name in regex.capture_names().flatten() {
                    if let Some(m) = caps.name(name) {
                        params.insert(name, m.as_str());
                    }
                }
                true
            }
        }
    }
}
