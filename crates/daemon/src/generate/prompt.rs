//! Prompt construction and response cleanup for code-only generation

use std::sync::OnceLock;

use regex::Regex;

const SYSTEM_PROMPT: &str = "You are a code generator.
Output ONLY the final source code for the requested task.
Do NOT include:
- Markdown code fences (no backticks)
- Explanations or prose
- Comments describing the code (unless the user specifically asks for comments)
- Leading or trailing text
- HTML tags like <code> or </code>

Return plain source code text only.";

const PROSE_PREFIXES: [&str; 4] = ["Here is", "Here's", "Explanation:", "This code"];

/// Describe the target from an optional language and filename,
/// e.g. `rust (file: main.rs)`.
pub fn target_context(language: Option<&str>, filename: Option<&str>) -> Option<String> {
    let language = language.map(str::trim).filter(|l| !l.is_empty());
    let filename = filename.map(str::trim).filter(|f| !f.is_empty());

    match (language, filename) {
        (Some(language), Some(filename)) => Some(format!("{} (file: {})", language, filename)),
        (Some(language), None) => Some(language.to_string()),
        (None, Some(filename)) => Some(format!("file: {}", filename)),
        (None, None) => None,
    }
}

pub fn system_prompt(target: Option<&str>) -> String {
    match target {
        Some(target) => format!("{}\nTarget: {}", SYSTEM_PROMPT, target),
        None => SYSTEM_PROMPT.to_string(),
    }
}

pub fn user_prompt(request: &str, target: Option<&str>) -> String {
    let mut prompt = format!(
        "{}\n\nReturn only code. No markdown. No backticks. No explanations.",
        request
    );
    if let Some(target) = target {
        prompt.push_str(&format!("\nTarget language: {}.", target));
    }
    prompt
}

fn fenced_block() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```[\w+-]*\n([\s\S]*?)```").expect("fence pattern is valid"))
}

/// Strip whatever a model wrapped around the code it was asked for.
///
/// Takes the body of the first fenced block when there is one. Otherwise
/// drops leading blank lines, bare fences and lines opening with stock prose
/// ("Here is", "This code", ...) until the first line of code.
pub fn extract_code_only(text: &str) -> String {
    if let Some(body) = fenced_block().captures(text).and_then(|c| c.get(1)) {
        return body.as_str().trim().to_string();
    }

    let code: Vec<&str> = text
        .lines()
        .skip_while(|line| {
            let trimmed = line.trim();
            trimmed.is_empty()
                || trimmed == "```"
                || PROSE_PREFIXES.iter().any(|p| trimmed.starts_with(p))
        })
        .collect();

    code.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_fenced_block_wins() {
        let text = "Here is the code:\n```rust\nfn main() {}\n```\nand another\n```\nx\n```";
        assert_eq!(extract_code_only(text), "fn main() {}");
    }

    #[test]
    fn test_fence_language_with_symbols() {
        let text = "```c++\nint main() { return 0; }\n```";
        assert_eq!(extract_code_only(text), "int main() { return 0; }");
    }

    #[test]
    fn test_leading_prose_is_stripped() {
        let text = "\n\nHere's a function:\nThis code prints hi\ndef hi():\n    print('hi')\n";
        assert_eq!(extract_code_only(text), "def hi():\n    print('hi')");
    }

    #[test]
    fn test_prose_after_code_is_kept() {
        let text = "x = 1\nHere is more";
        assert_eq!(extract_code_only(text), "x = 1\nHere is more");
    }

    #[test]
    fn test_plain_code_passes_through() {
        assert_eq!(extract_code_only("  let x = 1;  "), "let x = 1;");
        assert_eq!(extract_code_only(""), "");
    }

    #[test]
    fn test_target_context() {
        assert_eq!(
            target_context(Some("rust"), Some("main.rs")).as_deref(),
            Some("rust (file: main.rs)")
        );
        assert_eq!(
            target_context(None, Some("a.py")).as_deref(),
            Some("file: a.py")
        );
        assert_eq!(target_context(Some(" "), None), None);
    }

    #[test]
    fn test_prompts_mention_target() {
        assert!(system_prompt(Some("go")).ends_with("\nTarget: go"));
        assert!(!system_prompt(None).contains("Target:"));
        assert!(user_prompt("sort a list", Some("go")).ends_with("Target language: go."));
    }
}
