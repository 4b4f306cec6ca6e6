//! Language tags for logs and their mapping onto the execution service

/// Tag used when a filename carries no recognised extension.
pub const DEFAULT_LANGUAGE: &str = "javascript";

/// Infer a language tag from a filename's (case-insensitive) extension.
pub fn infer_language(filename: &str) -> &'static str {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.contains('/') => ext.to_ascii_lowercase(),
        _ => return DEFAULT_LANGUAGE,
    };

    match ext.as_str() {
        "py" => "python",
        "js" => "javascript",
        "java" => "java",
        "c" => "c",
        "cpp" | "cc" | "cxx" => "cpp",
        "go" => "go",
        "ts" => "typescript",
        "rs" => "rust",
        _ => DEFAULT_LANGUAGE,
    }
}

/// Language name understood by the code-execution service.
pub fn runner_language(tag: &str) -> &'static str {
    match tag {
        "python" => "python",
        "java" => "java",
        "c" => "c",
        "cpp" => "cpp",
        "go" => "go",
        "typescript" => "typescript",
        "rust" => "rust",
        _ => DEFAULT_LANGUAGE,
    }
}

/// Filename a snippet is submitted under for execution.
///
/// Java needs `Main.java` so that `public class Main` compiles.
pub fn source_filename(tag: &str) -> &'static str {
    match tag {
        "python" => "main.py",
        "java" => "Main.java",
        "c" => "main.c",
        "cpp" => "main.cpp",
        "go" => "main.go",
        "typescript" => "main.ts",
        "rust" => "main.rs",
        _ => "main.js",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(infer_language("main.rs"), "rust");
        assert_eq!(infer_language("app.py"), "python");
        assert_eq!(infer_language("Main.java"), "java");
        assert_eq!(infer_language("x.cc"), "cpp");
        assert_eq!(infer_language("x.cxx"), "cpp");
        assert_eq!(infer_language("index.ts"), "typescript");
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(infer_language("SCRIPT.PY"), "python");
        assert_eq!(infer_language("lib.Rs"), "rust");
    }

    #[test]
    fn test_unknown_or_missing_extension_defaults() {
        assert_eq!(infer_language("noext"), "javascript");
        assert_eq!(infer_language("notes.md"), "javascript");
        assert_eq!(infer_language("trailing."), "javascript");
        assert_eq!(infer_language(""), "javascript");
    }

    #[test]
    fn test_runner_mapping() {
        assert_eq!(runner_language("rust"), "rust");
        assert_eq!(runner_language("brainfuck"), "javascript");
        assert_eq!(source_filename("java"), "Main.java");
        assert_eq!(source_filename("unknown"), "main.js");
    }
}
