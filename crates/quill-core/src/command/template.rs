//! `{{token}}` substitution for command templates.

use std::collections::BTreeMap;

/// Token values available to a command template.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    values: BTreeMap<String, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(token.into(), value.into());
        self
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }
}

/// Replaces every `{{token}}` occurrence with its value.
///
/// Plain literal replacement: values are inserted verbatim and never
/// re-scanned for tokens, and unknown tokens are left in place for the host
/// interpreter (which has macros of its own, such as `{{user}}`).
pub fn render(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match after_open.find("}}") {
            Some(end) => {
                let token = &after_open[..end];
                match vars.get(token) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(token);
                        out.push_str("}}");
                    }
                }
                rest = &after_open[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_every_occurrence() {
        let vars = TemplateVars::new().with("input", "a cat");
        assert_eq!(
            render("/echo {{input}} | /echo {{input}}", &vars),
            "/echo a cat | /echo a cat"
        );
    }

    #[test]
    fn test_unknown_tokens_are_left_for_the_host() {
        let vars = TemplateVars::new().with("input", "hi");
        assert_eq!(render("{{user}}: {{input}}", &vars), "{{user}}: hi");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let vars = TemplateVars::new()
            .with("input", "{{guide}}")
            .with("guide", "never");
        assert_eq!(render("[{{input}}]", &vars), "[{{guide}}]");
    }

    #[test]
    fn test_empty_value_and_unterminated_token() {
        let vars = TemplateVars::new().with("input", "");
        assert_eq!(render("/continue {{input}}", &vars), "/continue ");
        assert_eq!(render("/echo {{input", &vars), "/echo {{input");
    }
}
