//! Where the tokens come from.

/// Split a command string on whitespace, dropping empty fragments.
///
/// Quotes are not interpreted: `"a b"` yields `"a` and `b"`.
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

/// Pick the token source: explicit tokens, then a command string, then
/// `ambient`. `ambient` is only called when the other two are absent.
pub(crate) fn resolve_tokens<F>(
    tokens: Option<&[String]>,
    command: Option<&str>,
    ambient: F,
) -> Vec<String>
where
    F: FnOnce() -> Vec<String>,
{
    if let Some(tokens) = tokens {
        return tokens.to_vec();
    }
    if let Some(command) = command {
        return split_command(command);
    }
    tracing::trace!("no tokens or command given, reading ambient arguments");
    ambient()
}

/// The process arguments without the program name.
pub(crate) fn process_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}
