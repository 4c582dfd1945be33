// Prompt templates for the matching module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Facet distillation prompt. Replace `{facet}`, `{document_noun}`,
/// `{document_heading}` and `{text}` before sending.
pub const DISTILL_PROMPT_TEMPLATE: &str = "\
Extract the {facet} section from this {document_noun}.
Return a clean summary suitable for semantic comparison.

{document_heading}:
{text}";

/// Combined experience + soft-skills rubric. Replace `{job_description}`,
/// `{resume_text}` and `{json_only}` before sending.
pub const RUBRIC_PROMPT_TEMPLATE: &str = r#"You are screening a candidate for the role below.

Score the candidate on two dimensions, each as a number between 0.0 and 1.0:
- "experience": how relevant the candidate's work history, seniority and domain are to the role.
- "soft_skills": evidence of communication, collaboration, leadership and ownership the role asks for.

Give a one-sentence rationale for each score that cites the resume.

Return a JSON object with this EXACT schema (no extra fields):
{
  "experience": {"score": 0.0, "rationale": "..."},
  "soft_skills": {"score": 0.0, "rationale": "..."}
}

{json_only}

JOB DESCRIPTION:
{job_description}

RESUME:
{resume_text}"#;

/// Substitutes `{name}` placeholders in one pass. Inserted values are never
/// rescanned, so user text containing a placeholder stays literal. Braces that
/// do not name a known placeholder are kept as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_known_placeholders() {
        let filled = fill_template("{a} and {b}", &[("a", "one"), ("b", "two")]);
        assert_eq!(filled, "one and two");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let filled = fill_template(r#"{"score": {x}}"#, &[("x", "0.5")]);
        assert_eq!(filled, r#"{"score": 0.5}"#);
    }

    #[test]
    fn test_fill_template_does_not_rescan_inserted_text() {
        let filled = fill_template("{a}|{b}", &[("a", "see {b}"), ("b", "BODY")]);
        assert_eq!(filled, "see {b}|BODY");
    }
}
