use regex::Regex;

/// Isolate the first ```sql fenced block in a model response and flatten it
/// to a single line.
///
/// The enclosed text has literal backslash escapes decoded, then all
/// whitespace runs (including real newlines) collapsed into single spaces.
/// Input without a fence is returned unchanged; absence of a fence is a
/// logged degraded path, not an error. Idempotent on already-flattened SQL.
pub fn extract_sql_oneline(text: &str) -> String {
    let fence = Regex::new(r"(?s)```sql\s*(.*?)\s*```").unwrap();

    match fence.captures(text) {
        Some(caps) => {
            let raw_sql = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let decoded = decode_escapes(raw_sql);
            decoded.split_whitespace().collect::<Vec<_>>().join(" ")
        }
        None => {
            tracing::warn!("No fenced sql block in model response, using it as-is");
            text.to_string()
        }
    }
}

/// Decode literal backslash escape sequences left in fenced text into their
/// actual characters. Unknown escapes pass through untouched.
fn decode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_is_flattened() {
        let input = "Sure! ```sql\nSELECT *\nFROM t\n``` ";
        assert_eq!(extract_sql_oneline(input), "SELECT * FROM t");
    }

    #[test]
    fn test_input_without_fence_is_unchanged() {
        let input = "SELECT * FROM t";
        assert_eq!(extract_sql_oneline(input), input);
    }

    #[test]
    fn test_idempotent_on_flattened_sql() {
        let input = "SELECT id, name FROM auth.users WHERE active = true";
        let once = extract_sql_oneline(input);
        assert_eq!(extract_sql_oneline(&once), once);
    }

    #[test]
    fn test_escaped_newlines_and_tabs_are_decoded() {
        let input = "```sql\nSELECT *\\n\\tFROM t\\nWHERE x = 1\n```";
        assert_eq!(extract_sql_oneline(input), "SELECT * FROM t WHERE x = 1");
    }

    #[test]
    fn test_first_of_multiple_fences_wins() {
        let input = "```sql\nSELECT 1\n```\nor maybe\n```sql\nSELECT 2\n```";
        assert_eq!(extract_sql_oneline(input), "SELECT 1");
    }

    #[test]
    fn test_empty_fence_yields_empty_string() {
        assert_eq!(extract_sql_oneline("```sql\n```"), "");
    }

    #[test]
    fn test_unknown_escape_passes_through() {
        assert_eq!(decode_escapes("a\\qb"), "a\\qb");
        assert_eq!(decode_escapes("quote \\' and \\\" here"), "quote ' and \" here");
    }
}
