/// Removes the leading indentation shared by every non-blank line of `text`.
///
/// Indentation is counted in spaces and tabs, one column each. Blank lines do
/// not take part in finding the common indent; they lose at most that many
/// leading whitespace characters and are otherwise kept as they are.
pub fn dedent(text: &str) -> String {
    let indent = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(leading_indent)
        .min()
        .unwrap_or(0);

    if indent == 0 {
        return text.to_string();
    }

    text.split('\n')
        .map(|line| {
            if leading_indent(line) >= indent {
                &line[indent..]
            } else {
                line
            }
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

fn leading_indent(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ' || *b == b'\t').count()
}
