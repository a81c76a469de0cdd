//! Request-template generation for custom connector actions.
//!
//! Everything here is pure and synchronous: given an operation's path template
//! and parameter bindings, derive the four-section request template the
//! connector executor resolves against live inputs at call time. Safe to call
//! repeatedly on every edit; output depends only on the input operation.

use crate::models::{OperationDraft, Parameter, ParameterPatch, RequestTemplate};

/// Scan a path template left to right for `{name}` placeholders, where `name`
/// is one or more of `[a-zA-Z0-9_]`.
///
/// Names are returned in order of appearance, duplicates included. There is no
/// escape for literal braces; `{1}` yields a placeholder named "1".
pub fn extract_placeholders(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            let mut j = i + 1;
            while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_') {
                j += 1;
            }
            if j > i + 1 && j < bytes.len() && bytes[j] == b'}' {
                out.push(path[i + 1..j].to_string());
                i = j + 1;
                continue;
            }
        }
        i += 1;
    }
    out
}

/// Guarantee that every placeholder in the operation's path is represented by
/// a `location = path` parameter, synthesizing default bindings for the ones
/// that are missing.
///
/// Existing path parameters are never removed, even when their placeholder no
/// longer appears in a just-edited path; stale bindings persist until the
/// tenant removes them.
pub fn ensure_path_params(op: &OperationDraft) -> OperationDraft {
    let placeholders = extract_placeholders(&op.path);
    if placeholders.is_empty() {
        return op.clone();
    }
    let mut next = op.clone();
    for ph in &placeholders {
        if !next.params.iter().any(|p| p.binds_placeholder(ph)) {
            next.params.push(Parameter::path_default(ph));
        }
    }
    next
}

/// Merge a patch into the path parameter bound to `placeholder`, appending a
/// default-shaped parameter first when none exists. Other parameters keep
/// their order.
pub fn set_path_param(
    op: &OperationDraft,
    placeholder: &str,
    patch: &ParameterPatch,
) -> OperationDraft {
    let mut next = op.clone();
    match next
        .params
        .iter_mut()
        .find(|p| p.binds_placeholder(placeholder))
    {
        Some(param) => patch.apply(param),
        None => {
            let mut param = Parameter::path_default(placeholder);
            patch.apply(&mut param);
            next.params.push(param);
        }
    }
    next
}

/// Derive the request template from an operation's parameter bindings.
///
/// For each parameter in order: the substitution source is `input_key` falling
/// back to `name`, the destination key is `target` falling back to `name`, and
/// parameters missing both are skipped. Values are `{{source}}` expressions
/// routed by location, with `query` as the fallback section. Duplicate
/// `(location, target)` pairs resolve last-write-wins.
///
/// Path placeholders left unbound by any parameter are self-bound afterwards
/// (`path_params[ph] = "{{ph}}"`), so every placeholder always has a
/// substitution source.
pub fn build_request_template(op: &OperationDraft) -> RequestTemplate {
    use crate::models::ParamLocation::*;

    let mut tmpl = RequestTemplate::default();
    for p in &op.params {
        let (Some(src), Some(tgt)) = (p.source_key(), p.target_key()) else {
            continue;
        };
        let value = format!("{{{{{}}}}}", src);
        let section = match p.location {
            Path => &mut tmpl.path_params,
            Header => &mut tmpl.headers,
            Body => &mut tmpl.body,
            Query => &mut tmpl.query,
        };
        section.insert(tgt.to_string(), value);
    }
    for ph in extract_placeholders(&op.path) {
        if !tmpl.path_params.contains_key(&ph) {
            let value = format!("{{{{{}}}}}", ph);
            tmpl.path_params.insert(ph, value);
        }
    }
    tmpl
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParamLocation;

    fn draft(path: &str, params: Vec<Parameter>) -> OperationDraft {
        OperationDraft {
            path: path.to_string(),
            params,
            ..Default::default()
        }
    }

    fn param(name: &str, location: ParamLocation) -> Parameter {
        Parameter {
            name: name.to_string(),
            location,
            ..Default::default()
        }
    }

    #[test]
    fn extract_returns_names_in_order() {
        assert_eq!(
            extract_placeholders("/customer/{customer_id}/orders/{order_id}"),
            vec!["customer_id", "order_id"]
        );
    }

    #[test]
    fn extract_empty_path_yields_nothing() {
        assert!(extract_placeholders("").is_empty());
        assert!(extract_placeholders("/ping").is_empty());
    }

    #[test]
    fn extract_keeps_duplicates_in_scan_order() {
        assert_eq!(extract_placeholders("/{x}/{y}/{x}"), vec!["x", "y", "x"]);
    }

    #[test]
    fn extract_ignores_malformed_placeholders() {
        assert!(extract_placeholders("/items/{a-b}").is_empty());
        assert!(extract_placeholders("/items/{}").is_empty());
        assert!(extract_placeholders("/items/{open").is_empty());
        // inner placeholder still found behind a stray brace
        assert_eq!(extract_placeholders("/{a{b}"), vec!["b"]);
        assert_eq!(extract_placeholders("/{{x}}"), vec!["x"]);
    }

    #[test]
    fn extract_accepts_numeric_names() {
        assert_eq!(extract_placeholders("/v{1}/thing"), vec!["1"]);
    }

    #[test]
    fn ensure_synthesizes_missing_path_params() {
        let op = draft("/customer/{customer_id}/orders/{order_id}", vec![]);
        let next = ensure_path_params(&op);

        assert_eq!(next.params.len(), 2);
        let first = &next.params[0];
        assert_eq!(first.name, "customer_id");
        assert_eq!(first.title.as_deref(), Some("customer_id"));
        assert_eq!(first.input_key.as_deref(), Some("customer_id"));
        assert_eq!(first.target.as_deref(), Some("customer_id"));
        assert_eq!(first.location, ParamLocation::Path);
        assert_eq!(first.param_type.as_deref(), Some("string"));
        assert_eq!(next.params[1].name, "order_id");
    }

    #[test]
    fn ensure_path_coverage_holds_for_existing_and_new() {
        let mut existing = param("order_id", ParamLocation::Path);
        existing.input_key = Some("order".to_string());
        let op = draft("/customer/{customer_id}/orders/{order_id}", vec![existing]);

        let next = ensure_path_params(&op);
        for ph in extract_placeholders(&next.path) {
            assert!(
                next.params.iter().any(|p| p.binds_placeholder(&ph)),
                "placeholder {ph} left unbound"
            );
        }
        // the pre-existing binding was not duplicated or reset
        assert_eq!(next.params.len(), 2);
        assert_eq!(next.params[0].input_key.as_deref(), Some("order"));
    }

    #[test]
    fn ensure_matches_on_target_falling_back_to_name() {
        // target differs from name but matches the placeholder
        let mut p = param("internal", ParamLocation::Path);
        p.target = Some("customer_id".to_string());
        let op = draft("/customer/{customer_id}", vec![p]);

        let next = ensure_path_params(&op);
        assert_eq!(next.params.len(), 1);
    }

    #[test]
    fn ensure_never_removes_stale_path_params() {
        let op = draft("/orders", vec![param("customer_id", ParamLocation::Path)]);
        let next = ensure_path_params(&op);
        assert_eq!(next.params.len(), 1);
        assert_eq!(next.params[0].name, "customer_id");
    }

    #[test]
    fn set_path_param_merges_into_existing() {
        let op = ensure_path_params(&draft("/customer/{customer_id}", vec![]));
        let patch = ParameterPatch {
            input_key: Some("cust".to_string()),
            ..Default::default()
        };

        let next = set_path_param(&op, "customer_id", &patch);
        assert_eq!(next.params.len(), 1);
        assert_eq!(next.params[0].input_key.as_deref(), Some("cust"));
        // untouched fields survive the merge
        assert_eq!(next.params[0].target.as_deref(), Some("customer_id"));
    }

    #[test]
    fn set_path_param_appends_when_missing() {
        let op = draft(
            "/customer/{customer_id}",
            vec![param("other", ParamLocation::Query)],
        );
        let patch = ParameterPatch {
            name: Some("cid".to_string()),
            ..Default::default()
        };

        let next = set_path_param(&op, "customer_id", &patch);
        assert_eq!(next.params.len(), 2);
        assert_eq!(next.params[0].name, "other");
        assert_eq!(next.params[1].name, "cid");
        assert_eq!(next.params[1].target.as_deref(), Some("customer_id"));
    }

    #[test]
    fn build_routes_each_location_to_its_section() {
        let mut header = param("q", ParamLocation::Header);
        header.target = Some("X-Foo".to_string());
        let op = draft("/ping", vec![header]);

        let tmpl = build_request_template(&op);
        assert_eq!(tmpl.headers.get("X-Foo").map(String::as_str), Some("{{q}}"));
        assert!(tmpl.query.is_empty());
        assert!(tmpl.body.is_empty());
        assert!(tmpl.path_params.is_empty());
    }

    #[test]
    fn build_target_overrides_name_for_query() {
        let mut p = param("apiVersion", ParamLocation::Query);
        p.target = Some("v".to_string());
        let op = draft("/ping", vec![p]);

        let tmpl = build_request_template(&op);
        assert_eq!(
            tmpl.query.get("v").map(String::as_str),
            Some("{{apiVersion}}")
        );
        assert!(tmpl.headers.is_empty());
        assert!(tmpl.body.is_empty());
        assert!(tmpl.path_params.is_empty());
    }

    #[test]
    fn build_skips_params_without_source_or_target() {
        let nameless = Parameter::default();
        let op = draft("/ping", vec![nameless]);

        let tmpl = build_request_template(&op);
        assert!(tmpl.is_empty());
    }

    #[test]
    fn build_last_write_wins_on_duplicate_targets() {
        let mut first = param("a", ParamLocation::Body);
        first.target = Some("status".to_string());
        first.input_key = Some("from_a".to_string());
        let mut second = param("b", ParamLocation::Body);
        second.target = Some("status".to_string());
        second.input_key = Some("from_b".to_string());
        let op = draft("/ping", vec![first, second]);

        let tmpl = build_request_template(&op);
        assert_eq!(tmpl.body.len(), 1);
        assert_eq!(
            tmpl.body.get("status").map(String::as_str),
            Some("{{from_b}}")
        );
    }

    #[test]
    fn build_self_binds_unbound_placeholders() {
        let op = draft("/customer/{x}", vec![]);
        let tmpl = build_request_template(&op);
        assert_eq!(tmpl.path_params.get("x").map(String::as_str), Some("{{x}}"));
    }

    #[test]
    fn build_explicit_binding_beats_self_binding() {
        let mut p = param("x", ParamLocation::Path);
        p.input_key = Some("external_x".to_string());
        let op = draft("/customer/{x}", vec![p]);

        let tmpl = build_request_template(&op);
        assert_eq!(
            tmpl.path_params.get("x").map(String::as_str),
            Some("{{external_x}}")
        );
    }

    #[test]
    fn build_is_idempotent() {
        let op = ensure_path_params(&draft(
            "/customer/{customer_id}/orders/{order_id}",
            vec![param("limit", ParamLocation::Query)],
        ));

        let once = build_request_template(&op);
        let twice = build_request_template(&op);
        assert_eq!(once, twice);
        assert_eq!(
            serde_json::to_string(&once).unwrap(),
            serde_json::to_string(&twice).unwrap()
        );
    }

    #[test]
    fn end_to_end_two_placeholders_no_params() {
        let op = ensure_path_params(&draft("/customer/{customer_id}/orders/{order_id}", vec![]));
        assert_eq!(op.params.len(), 2);

        let tmpl = build_request_template(&op);
        assert_eq!(
            tmpl.path_params.get("customer_id").map(String::as_str),
            Some("{{customer_id}}")
        );
        assert_eq!(
            tmpl.path_params.get("order_id").map(String::as_str),
            Some("{{order_id}}")
        );
        assert!(tmpl.headers.is_empty());
        assert!(tmpl.query.is_empty());
        assert!(tmpl.body.is_empty());
    }

    #[test]
    fn unrecognized_location_falls_back_to_query() {
        let p: Parameter =
            serde_json::from_str(r#"{"name":"flag","location":"cookie"}"#).unwrap();
        assert_eq!(p.location, ParamLocation::Query);

        let op = draft("/ping", vec![p]);
        let tmpl = build_request_template(&op);
        assert_eq!(
            tmpl.query.get("flag").map(String::as_str),
            Some("{{flag}}")
        );
    }

    #[test]
    fn missing_location_defaults_to_query() {
        let p: Parameter = serde_json::from_str(r#"{"name":"flag"}"#).unwrap();
        assert_eq!(p.location, ParamLocation::Query);
    }
}
