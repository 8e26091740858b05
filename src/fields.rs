//! Helpers shared by the create/update payloads.

/// Trims `value`, recording `name` as missing when nothing is left.
pub fn required(value: String, name: &'static str, missing: &mut Vec<&'static str>) -> String {
    let value = value.trim().to_string();
    if value.is_empty() {
        missing.push(name);
    }
    value
}

/// Partial-update rule: an absent or blank replacement keeps the stored value.
pub fn keep_or_replace(new: Option<String>, old: String) -> String {
    match new.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => v,
        _ => old,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_records() {
        let mut missing = Vec::new();
        assert_eq!(required(" Acme ".into(), "company", &mut missing), "Acme");
        assert_eq!(required("  ".into(), "position", &mut missing), "");
        assert_eq!(missing, vec!["position"]);
    }

    #[test]
    fn blank_replacement_keeps_old() {
        assert_eq!(keep_or_replace(None, "old".into()), "old");
        assert_eq!(keep_or_replace(Some(" ".into()), "old".into()), "old");
        assert_eq!(keep_or_replace(Some("new".into()), "old".into()), "new");
    }
}
