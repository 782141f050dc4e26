use std::io;

/// Prompts on the terminal and reads a line without echoing it.
pub fn read_hidden(prompt: &str) -> io::Result<String> {
    rpassword::prompt_password(prompt)
}
