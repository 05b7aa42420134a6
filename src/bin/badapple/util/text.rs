/// Greedy word wrap; a word longer than `width` gets a line of its own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_short_text() {
        assert_eq!(wrap("scaffold 7 not found", 40), vec!["scaffold 7 not found"]);
    }

    #[test]
    fn wrap_long_text() {
        let result = wrap("-scafid ID required for -describescaf.", 20);
        assert_eq!(result, vec!["-scafid ID required", "for -describescaf."]);
    }

    #[test]
    fn wrap_counts_characters_not_bytes() {
        assert_eq!(wrap("pScore ≥ 300", 12), vec!["pScore ≥ 300"]);
    }

    #[test]
    fn wrap_empty_text_yields_one_line() {
        assert_eq!(wrap("   ", 10), vec![String::new()]);
    }
}
