//! Pattern compiler tests - strict and loose template matching
//!
//! The grids here mirror the observable matching contract: literal templates,
//! required and optional parameters, literal extensions, wildcards, and
//! caller-supplied regular expressions with and without named groups.

use regex::Regex;

use crate::params::Params;
use crate::pattern::{Pattern, RouteSpec};

fn matches(pattern: &Pattern, pathname: &str) -> Option<Params> {
    let mut params = Params::new();
    pattern.matches(pathname, &mut params).then_some(params)
}

#[test]
fn empty_spec_matches_every_pathname() {
    let pattern = Pattern::compile(RouteSpec::from(""), false);
    assert!(matches(&pattern, "/").is_some());
    assert!(matches(&pattern, "/some/wacky/route").is_some());
}

#[test]
fn literal_strict_requires_full_path() {
    let pattern = Pattern::compile(RouteSpec::from("api"), false);
    assert!(matches(&pattern, "/api").is_some());
    assert!(matches(&pattern, "/api/").is_some());
    assert!(matches(&pattern, "/api/foo").is_none());
    assert!(matches(&pattern, "/apifoo").is_none());
}

#[test]
fn literal_loose_matches_deeper_paths_but_not_extended_segments() {
    let pattern = Pattern::compile(RouteSpec::from("/foo"), true);
    assert!(matches(&pattern, "/foo").is_some());
    assert!(matches(&pattern, "/foo/").is_some());
    assert!(matches(&pattern, "/foo/anything/else").is_some());
    assert!(matches(&pattern, "/foobar").is_none());
}

#[test]
fn literal_matching_is_case_sensitive() {
    let pattern = Pattern::compile(RouteSpec::from("/Admin"), false);
    assert!(matches(&pattern, "/Admin").is_some());
    assert!(matches(&pattern, "/admin").is_none());
}

#[test]
fn root_template_strict_matches_only_root() {
    let pattern = Pattern::compile(RouteSpec::from("/"), false);
    assert!(matches(&pattern, "/").is_some());
    assert!(matches(&pattern, "/foo").is_none());
}

#[test]
fn root_template_loose_matches_everything() {
    let pattern = Pattern::compile(RouteSpec::from("/"), true);
    assert!(matches(&pattern, "/").is_some());
    assert!(matches(&pattern, "/foo/bar").is_some());
}

#[test]
fn required_param_strict() {
    let pattern = Pattern::compile(RouteSpec::from("api/:version"), false);
    assert!(matches(&pattern, "/api").is_none());

    let params = matches(&pattern, "/api/v1").expect("direct match");
    assert_eq!(params.get("version"), Some("v1"));

    assert!(matches(&pattern, "/api/v1/users").is_none());
}

#[test]
fn required_param_loose_matches_deeper_paths() {
    let pattern = Pattern::compile(RouteSpec::from("api/:version"), true);
    assert!(matches(&pattern, "/api").is_none());

    let params = matches(&pattern, "/api/v1/users").expect("loose match");
    assert_eq!(params.get("version"), Some("v1"));
}

#[test]
fn optional_param_strict() {
    let pattern = Pattern::compile(RouteSpec::from("api/:version?"), false);

    let params = matches(&pattern, "/api").expect("optional segment absent");
    assert!(!params.contains("version"));

    let params = matches(&pattern, "/api/v1").expect("optional segment present");
    assert_eq!(params.get("version"), Some("v1"));

    assert!(matches(&pattern, "/api/v1/users").is_none());
}

#[test]
fn optional_param_loose() {
    let pattern = Pattern::compile(RouteSpec::from("api/:version?"), true);
    assert!(matches(&pattern, "/api").is_some());

    let params = matches(&pattern, "/api/v1/users").expect("loose match");
    assert_eq!(params.get("version"), Some("v1"));
}

#[test]
fn param_with_literal_extension() {
    let pattern = Pattern::compile(RouteSpec::from("movies/:title.mp4"), false);
    assert!(matches(&pattern, "/movies").is_none());
    assert!(matches(&pattern, "/movies/narnia").is_none());

    let params = matches(&pattern, "/movies/narnia.mp4").expect("direct match");
    assert_eq!(params.get("title"), Some("narnia"));

    assert!(matches(&pattern, "/movies/narnia.mp4/cast").is_none());
}

#[test]
fn param_with_literal_extension_loose() {
    let pattern = Pattern::compile(RouteSpec::from("movies/:title.mp4"), true);

    let params = matches(&pattern, "/movies/narnia.mp4/cast").expect("loose match");
    assert_eq!(params.get("title"), Some("narnia"));
}

#[test]
fn wildcard_captures_rest_under_wild() {
    let pattern = Pattern::compile(RouteSpec::from("/files/*"), false);
    let params = matches(&pattern, "/files/docs/report.pdf").expect("wildcard match");
    assert_eq!(params.get("wild"), Some("docs/report.pdf"));
}

#[test]
fn mixed_literal_and_params() {
    let pattern = Pattern::compile(RouteSpec::from("/users/:id/posts/:post"), false);
    let params = matches(&pattern, "/users/7/posts/42").expect("match");
    assert_eq!(params.get("id"), Some("7"));
    assert_eq!(params.get("post"), Some("42"));
}

#[test]
fn caller_regex_with_named_groups_extracts_them() {
    let regex = Regex::new(r"^/foo/(?<title>\w+)/?$").unwrap();
    let pattern = Pattern::compile(RouteSpec::from(regex), false);

    let params = matches(&pattern, "/foo/bar").expect("match");
    assert_eq!(params.get("title"), Some("bar"));
}

#[test]
fn caller_regex_without_groups_is_an_existence_test() {
    let regex = Regex::new(r"^/ping$").unwrap();
    let pattern = Pattern::compile(RouteSpec::from(regex), false);

    let params = matches(&pattern, "/ping").expect("match");
    assert!(params.is_empty());
    assert!(matches(&pattern, "/pong").is_none());
}

#[test]
fn failed_match_leaves_params_untouched() {
    let pattern = Pattern::compile(RouteSpec::from("/a/:x"), false);
    let mut params = Params::new();
    params.insert("x", "kept");
    assert!(!pattern.matches("/b/7", &mut params));
    assert_eq!(params.get("x"), Some("kept"));
}
