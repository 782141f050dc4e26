//! Doubles for the prompt, connector and transfer channel seams.

use std::{
    cell::RefCell,
    collections::HashSet,
    io,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{
    config::Connection,
    credentials::PasswordPrompt,
    error::{ConnectError, TransferError},
    remote::{Connector, TransferChannel},
};

pub struct ScriptedPrompt {
    answer: Option<String>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            asked: RefCell::default(),
        }
    }

    /// Fails like a prompt with no terminal attached.
    pub fn without_terminal() -> Self {
        Self {
            answer: None,
            asked: RefCell::default(),
        }
    }
}

impl PasswordPrompt for ScriptedPrompt {
    fn prompt_hidden(&self, message: &str) -> io::Result<String> {
        self.asked.borrow_mut().push(message.to_string());
        self.answer
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no terminal"))
    }
}

/// Records every `put`; fails for local paths listed in `missing`.
#[derive(Default)]
pub struct RecordingChannel {
    pub puts: Rc<RefCell<Vec<(PathBuf, PathBuf)>>>,
    pub missing: HashSet<PathBuf>,
}

impl TransferChannel for RecordingChannel {
    fn put(&mut self, local_source: &Path, remote_dest: &Path) -> Result<u64, TransferError> {
        self.puts
            .borrow_mut()
            .push((local_source.to_path_buf(), remote_dest.to_path_buf()));

        if self.missing.contains(local_source) {
            return Err(TransferError::LocalOpen {
                path: local_source.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            });
        }

        Ok(local_source.as_os_str().len() as u64)
    }
}

/// Hands out a `RecordingChannel` unless `refuse` is set, and remembers the
/// credentials it was called with.
#[derive(Default)]
pub struct FakeConnector {
    pub refuse: bool,
    pub missing: HashSet<PathBuf>,
    pub attempts: RefCell<Vec<(String, String, String)>>,
    pub puts: Rc<RefCell<Vec<(PathBuf, PathBuf)>>>,
}

impl Connector for FakeConnector {
    type Channel = RecordingChannel;

    fn connect(
        &self,
        connection: &Connection,
        password: &str,
    ) -> Result<RecordingChannel, ConnectError> {
        self.attempts.borrow_mut().push((
            connection.host.clone(),
            connection.username.clone(),
            password.to_string(),
        ));

        if self.refuse {
            return Err(ConnectError::Unreachable {
                host: connection.host.clone(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "Connection refused"),
            });
        }

        Ok(RecordingChannel {
            puts: self.puts.clone(),
            missing: self.missing.clone(),
        })
    }
}
