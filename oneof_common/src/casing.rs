//! Go identifier casing.
//!
//! [`public_name`] turns an identifier into the form Go tooling expects for
//! an exported name: the first letter is upper case, underscores are
//! dropped, and words that are common initialisms (`Id`, `Url`, `Http`, ...)
//! are spelled fully upper case. A name is canonical when converting it
//! changes nothing.

use std::collections::HashSet;

lazy_static::lazy_static! {
    /// Initialisms Go linters insist on keeping upper case.
    static ref INITIALISMS: HashSet<&'static str> = [
        "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID",
        "IP", "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP",
        "TLS", "TTL", "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XMPP",
        "XSRF", "XSS",
    ]
    .into_iter()
    .collect();
}

/// Splits an identifier into words on underscores and case humps.
///
/// Digits stick to the word before them, and a run of capitals followed by
/// a lower case letter gives its last capital to the next word
/// (`HTTPServer` is `HTTP` + `Server`).
pub fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let hump = c.is_uppercase()
                && (prev.is_lowercase()
                    || (prev.is_ascii_digit() && current.chars().any(char::is_lowercase))
                    || (prev.is_uppercase() && next.is_some_and(char::is_lowercase)));
            if hump {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Canonical exported spelling of `name`.
pub fn public_name(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|word| {
            let upper = word.to_uppercase();
            if INITIALISMS.contains(upper.as_str()) {
                upper
            } else {
                capitalize(word)
            }
        })
        .collect()
}

/// Whether `name` already is in canonical exported spelling.
pub fn is_public(name: &str) -> bool {
    !name.is_empty() && public_name(name) == name
}

/// Whether `name` is a syntactically valid Go identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("OperatorSum", &["Operator", "Sum"])]
    #[case("HTTPServer", &["HTTP", "Server"])]
    #[case("operator_sum", &["operator", "sum"])]
    #[case("userId", &["user", "Id"])]
    #[case("Utf8Reader", &["Utf8", "Reader"])]
    #[case("V2", &["V2"])]
    fn test_split_words(#[case] name: &str, #[case] expected: &[&str]) {
        assert_eq!(split_words(name), expected);
    }

    #[rstest]
    #[case("Value", "Value")]
    #[case("value", "Value")]
    #[case("operator_sum", "OperatorSum")]
    #[case("userId", "UserID")]
    #[case("Url", "URL")]
    #[case("HTTPServer", "HTTPServer")]
    #[case("Utf8Reader", "UTF8Reader")]
    #[case("AST", "AST")]
    fn test_public_name(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(public_name(name), expected);
    }

    #[test]
    fn test_is_public() {
        assert!(is_public("Node"));
        assert!(is_public("OperatorSum"));
        assert!(!is_public("node"));
        assert!(!is_public("Id"));
        assert!(!is_public("Operator_Sum"));
        assert!(!is_public(""));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("Node"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a.b"));
        assert!(!is_identifier(""));
    }
}
