/// Removes whitespace from GraphQL text, except inside string literals.
///
/// The text is scanned left to right: an unescaped `"` opens or closes a literal,
/// whitespace is kept inside a literal and dropped everywhere else.
/// Applying it twice gives the same result as applying it once.
///
/// ```rust
/// use rip_hunter::remove_spaces;
///
/// let compact = remove_spaces(r#"test{ method: {id: "hello world"}"#);
/// assert_eq!(compact, r#"test{method:{id:"hello world"}"#);
/// ```
pub fn remove_spaces(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_literal = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_literal {
            result.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_literal = false;
            }
        } else if ch == '"' {
            in_literal = true;
            result.push(ch);
        } else if !ch.is_whitespace() {
            result.push(ch);
        }
    }

    result
}
