const MAX_VISIBLE_CHARS: usize = 100;

/// Key prefixes issued by the providers this service talks to.
const KEY_PREFIXES: [&str; 4] = ["r8_", "sk-", "xai-", "AIza"];

const ASSIGNMENT_PATTERNS: [&str; 6] = [
    "Bearer ",
    "api_key=",
    "key=",
    "password=",
    "secret=",
    "token=",
];

/// Shortens user-supplied text before it reaches the logs and masks
/// anything that looks like a credential.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total = trimmed.chars().count();
    let visible = if total > MAX_VISIBLE_CHARS {
        let head: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", head, total)
    } else {
        trimmed.to_string()
    };

    redact_key_tokens(&redact_assignments(&visible))
}

fn redact_assignments(text: &str) -> String {
    let mut result = text.to_string();
    for pattern in ASSIGNMENT_PATTERNS {
        let mut search_from = 0;
        while let Some(found) = result[search_from..].find(pattern) {
            let value_start = search_from + found + pattern.len();
            let value_end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| value_start + i)
                .unwrap_or(result.len());
            result.replace_range(value_start..value_end, "[REDACTED]");
            search_from = value_start + "[REDACTED]".len();
        }
    }
    result
}

fn redact_key_tokens(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            if KEY_PREFIXES.iter().any(|prefix| word.starts_with(prefix)) && word.len() > 12 {
                "[REDACTED]"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
