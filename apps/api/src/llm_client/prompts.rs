// Prompt-building utilities.
// Operation-specific prompts live in evaluation/prompts.rs.

/// Fills `{name}` placeholders in a prompt template in one pass over the
/// template. Substituted values are copied as-is and never scanned again.
/// Braces that do not enclose a known name (JSON examples) are kept.
pub fn fill_template(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let known = after.find('}').and_then(|close| {
            let key = &after[..close];
            substitutions
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });
        match known {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
