/// Split raw text into trimmed, non-empty lines.
///
/// Accepts `\n`, `\r\n` and bare `\r` line endings, also mixed within one
/// document. Splitting on either character is enough: the empty piece
/// between `\r` and `\n` is dropped along with every other blank line.
pub fn normalize_lines(raw: &str) -> Vec<String> {
    raw.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
