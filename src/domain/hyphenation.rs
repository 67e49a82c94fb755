/// What is left of a line after the previous line borrowed its first token.
struct Remainder<'a> {
    text: &'a str,
    /// A non-empty token was taken; an empty remainder then means the line was
    /// used up entirely and is not emitted, unless it is the last line.
    consumed: bool,
}

/// Rejoins words the OCR layout split across a line break with a trailing `-`.
///
/// A line ending in `-` (ignoring trailing whitespace) loses the hyphen and takes
/// the first whitespace-delimited token of the following line, which then
/// continues with whatever is left after that token. Lines are otherwise emitted
/// with trailing whitespace removed, except the last one which is emitted
/// verbatim, even when a join left it empty (`"a-\nbc"` becomes `"abc\n"`).
///
/// The last line is dropped when it starts with a space. This mirrors long-standing
/// behaviour of the service and can lose real content (`"a\n indented"` becomes
/// `"a"`); callers relying on leading indentation on the final line must not
/// pass it through here.
pub fn repair_hyphenation(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len() - 1;
    let mut output: Vec<String> = Vec::with_capacity(lines.len());
    let mut pending: Option<Remainder<'_>> = None;

    for (index, original) in lines.iter().copied().enumerate() {
        let current = match pending.take() {
            Some(rest) if rest.consumed && rest.text.is_empty() && index != last => continue,
            Some(rest) => rest.text,
            None => original,
        };

        if index == last {
            if !current.starts_with(' ') {
                output.push(current.to_string());
            }
            break;
        }

        let line = current.trim_end();
        match line.strip_suffix('-') {
            Some(prefix) => {
                let next = lines[index + 1].trim_start();
                let (token, rest) = next.split_once(char::is_whitespace).unwrap_or((next, ""));
                output.push(format!("{prefix}{token}"));
                pending = Some(Remainder {
                    text: rest,
                    consumed: !token.is_empty(),
                });
            }
            None => output.push(line.to_string()),
        }
    }

    output.join("\n")
}
