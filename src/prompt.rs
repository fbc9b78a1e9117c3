// src/prompt.rs
// Prompt optimizer: keeps requests short to reduce token usage and cost

/// Fixed instruction preamble prepended to every user message.
pub const PROMPT_PREAMBLE: &str =
    "As a helpful personal assistant, provide a concise, practical response to: ";

/// Maximum number of user-supplied characters forwarded to the provider.
/// Anything beyond this is silently dropped.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Build the provider-agnostic prompt for a raw user message.
///
/// Trims surrounding whitespace, clamps to [`MAX_MESSAGE_CHARS`]
/// characters, and prepends [`PROMPT_PREAMBLE`]. Pure and total: never
/// fails, oversize input is truncated rather than rejected.
pub fn optimize(raw_text: &str) -> String {
    let trimmed = raw_text.trim();
    let mut prompt = String::with_capacity(PROMPT_PREAMBLE.len() + trimmed.len().min(MAX_MESSAGE_CHARS * 4));
    prompt.push_str(PROMPT_PREAMBLE);
    prompt.extend(trimmed.chars().take(MAX_MESSAGE_CHARS));
    prompt
}
