//! Grounding prompt construction.
//!
//! Knowledge base documents can be arbitrarily long, so they are cut to a
//! bounded number of characters before being embedded in the system prompt.
//! The cut prefers a section heading, then a paragraph break, so the model
//! never sees a sentence chopped in half unless the document has no usable
//! structure near the limit.
//!
//! Sizes are counted in characters (not bytes, not tokens).

/// Default grounding budget, in characters (~8000 tokens).
pub const DEFAULT_MAX_KB_CHARS: usize = 32_000;

/// Appended to every truncated document.
pub const TRUNCATION_NOTICE: &str = "\n\n[... KB content truncated for length ...]";

const SECTION_MARKER: &str = "\n## ";
const PARAGRAPH_MARKER: &str = "\n\n";

/// A section cut is accepted only past this fraction of the limit.
const SECTION_FLOOR: f64 = 0.7;
/// A paragraph cut is accepted only past this fraction of the limit.
const PARAGRAPH_FLOOR: f64 = 0.8;

/// Cut `content` to at most `max_chars` characters plus the truncation notice.
///
/// Content within the limit is returned unchanged.
pub fn truncate(content: &str, max_chars: usize) -> String {
    let Some((limit, _)) = content.char_indices().nth(max_chars) else {
        return content.to_string();
    };
    let head = &content[..limit];

    let end = boundary(head, SECTION_MARKER, max_chars, SECTION_FLOOR)
        .or_else(|| boundary(head, PARAGRAPH_MARKER, max_chars, PARAGRAPH_FLOOR))
        .unwrap_or(head.len());

    let mut out = String::with_capacity(end + TRUNCATION_NOTICE.len());
    out.push_str(&head[..end]);
    out.push_str(TRUNCATION_NOTICE);
    out
}

/// Byte offset of the last `marker` in `head`, if it sits past
/// `floor * max_chars` characters.
fn boundary(head: &str, marker: &str, max_chars: usize, floor: f64) -> Option<usize> {
    let at = head.rfind(marker)?;
    let position = head[..at].chars().count();
    (position as f64 > max_chars as f64 * floor).then_some(at)
}

/// Render the system prompt for `source_name` using the default budget.
pub fn build_system_prompt(source_name: &str, kb_content: &str) -> String {
    build_system_prompt_with_limit(source_name, kb_content, DEFAULT_MAX_KB_CHARS)
}

/// Render the system prompt with an explicit grounding budget.
pub fn build_system_prompt_with_limit(
    source_name: &str,
    kb_content: &str,
    max_chars: usize,
) -> String {
    let kb = truncate(kb_content, max_chars);

    format!(
        r#"You are a senior SIEM/Splunk integration specialist assistant. Your role is to help Security Engineers onboard log sources into Splunk.

## Your Expertise
- Deep knowledge of Splunk architecture (Indexers, Heavy Forwarders, Universal Forwarders, Deployment Servers)
- Log source integrations (syslog, API-based, agent-based)
- Security logging best practices
- Network connectivity requirements
- Troubleshooting common integration issues

## Current Context
You are helping with the integration of: **{source_name}**

## Knowledge Base Content
The following is the official KB documentation for this log source. Base your answers primarily on this content:

---
{kb}
---

## Response Guidelines
1. **Stay grounded**: Answer based on the KB content provided. If the KB doesn't contain specific information, clearly state what's missing and suggest what should be added.
2. **Be practical**: Provide step-by-step guidance when applicable. Include specific configuration examples where possible.
3. **State assumptions**: If you need to make assumptions (e.g., about network architecture, Splunk version), state them clearly.
4. **Security first**: Always consider security implications in your recommendations.
5. **Format for clarity**: Use bullet points, numbered steps, and code blocks appropriately for technical content.
6. **Acknowledge limitations**: If asked about something outside the scope of the KB or your expertise, acknowledge it honestly.
7. **Splunk-specific**: When discussing configurations, use Splunk-appropriate terminology and file formats (inputs.conf, outputs.conf, props.conf, etc.)."#
    )
}
