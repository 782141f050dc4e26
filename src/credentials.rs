use std::io;

use crate::{config::Connection, util::read_hidden};

/// Source of a password when the configuration has none.
pub trait PasswordPrompt {
    fn prompt_hidden(&self, message: &str) -> io::Result<String>;
}

/// Reads from the controlling terminal without echo.
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn prompt_hidden(&self, message: &str) -> io::Result<String> {
        read_hidden(message)
    }
}

/// Fills `connection.psw` from the prompt if it is missing, and returns it.
///
/// A password already present in the configuration is used as-is and the
/// prompt is never touched.
pub fn resolve_password<'c>(
    connection: &'c mut Connection,
    prompt: &impl PasswordPrompt,
) -> io::Result<&'c str> {
    let password = match connection.psw.take() {
        Some(password) => password,
        None => prompt.prompt_hidden(&format!(
            "Password for {}@{}: ",
            connection.username, connection.host
        ))?,
    };

    Ok(connection.psw.insert(password).as_str())
}
