/// Number of leading ASCII spaces in `line`. Tabs are not indentation.
pub fn indent_of(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ').count()
}
