//! Best-effort beautifier for the persisted bundle copy.
//!
//! String-literal-aware line splitter: newlines after `;`, `{` and `}`
//! outside string literals, indentation by brace depth. Only the saved
//! copy goes through this; extraction always reads the raw text.

/// Split minified source into indented lines.
///
/// Returns `None` when the literal tracking ends in an inconsistent
/// state (unterminated string), a sign the heuristic misread the input;
/// the caller then falls back to the raw text.
pub fn beautify_source(source: &str) -> Option<String> {
    let mut out = String::with_capacity(source.len() + source.len() / 8);
    let mut depth: usize = 0;
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    let mut at_line_start = false;

    for ch in source.chars() {
        if let Some(quote) = in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' | '`' => {
                if at_line_start {
                    indent(&mut out, depth);
                    at_line_start = false;
                }
                in_string = Some(ch);
                out.push(ch);
            }
            '{' => {
                if at_line_start {
                    indent(&mut out, depth);
                }
                out.push(ch);
                depth += 1;
                out.push('\n');
                at_line_start = true;
            }
            '}' => {
                depth = depth.saturating_sub(1);
                if !at_line_start {
                    out.push('\n');
                }
                indent(&mut out, depth);
                out.push(ch);
                out.push('\n');
                at_line_start = true;
            }
            ';' => {
                if at_line_start {
                    indent(&mut out, depth);
                }
                out.push(ch);
                out.push('\n');
                at_line_start = true;
            }
            '\n' => {
                if !at_line_start {
                    out.push('\n');
                    at_line_start = true;
                }
            }
            _ => {
                if at_line_start {
                    if ch.is_whitespace() {
                        continue;
                    }
                    indent(&mut out, depth);
                    at_line_start = false;
                }
                out.push(ch);
            }
        }
    }

    // An open string literal at EOF means the splitter lost track.
    if in_string.is_some() {
        return None;
    }
    Some(out)
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}
