/*
 * JSON helpers shared across the pipeline. The editor writes its
 * configuration files as JSON-with-comments (line and block comments plus
 * trailing commas), which serde_json rejects, so `parse_tolerant` first runs
 * the text through a small comment/trailing-comma stripper. The stripper is
 * string-aware and preserves newlines inside block comments so parse error
 * line numbers stay meaningful.
 *
 * Stripping runs in two passes, comments first and trailing commas second,
 * so a comma separated from its closing bracket only by a comment is still
 * recognized as trailing.
 *
 * `to_pretty_4` produces the 4-space-indented serialization the
 * `.code-profile` archive format uses for its envelope and for the nested
 * settings/keybindings payloads.
 */
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;

/// Strips `//` and `/* */` comments, trailing commas, and a leading BOM from
/// JSON-with-comments text, yielding strict JSON.
pub fn strip_comments(text: &str) -> String {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    remove_trailing_commas(&remove_comments(text))
}

fn remove_comments(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut result = String::with_capacity(len);
    let mut i = 0;
    let mut in_string = false;
    let mut escaped = false;

    while i < len {
        let c = chars[i];

        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                result.push(c);
                i += 1;
            }
            '/' if i + 1 < len && chars[i + 1] == '/' => {
                while i < len && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if i + 1 < len && chars[i + 1] == '*' => {
                i += 2;
                while i + 1 < len && !(chars[i] == '*' && chars[i + 1] == '/') {
                    if chars[i] == '\n' {
                        result.push('\n');
                    }
                    i += 1;
                }
                i = (i + 2).min(len);
            }
            _ => {
                result.push(c);
                i += 1;
            }
        }
    }

    result
}

/// Drops every comma whose next non-whitespace char closes a container.
/// Expects comment-free input; comments hiding between a comma and its
/// bracket would otherwise mask the trailing position.
fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut result = String::with_capacity(len);
    let mut i = 0;
    let mut in_string = false;
    let mut escaped = false;

    while i < len {
        let c = chars[i];

        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        if c == '"' {
            in_string = true;
            result.push(c);
        } else if c == ',' {
            let mut j = i + 1;
            while j < len && chars[j].is_whitespace() {
                j += 1;
            }
            if !(j < len && (chars[j] == '}' || chars[j] == ']')) {
                result.push(c);
            }
        } else {
            result.push(c);
        }
        i += 1;
    }

    result
}

/// Parses JSON-with-comments text into any deserializable shape.
pub fn parse_tolerant<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    serde_json::from_str(&strip_comments(text))
}

/// Serializes a value as pretty-printed JSON with 4-space indentation.
pub fn to_pretty_4<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8(out).expect("serde_json produced invalid UTF-8"))
}
