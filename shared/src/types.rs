//! Process identity used to tag log output

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Which front end is hosting the queue widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// HTTP + WebSocket server
    WebServer,
    /// Interactive terminal session
    Terminal,
    /// Embedded use (tests, other hosts) with no binary initialising an identity
    Library,
}

impl ProcessId {
    /// Initialize the global process ID for the webserver
    pub fn init_webserver() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::WebServer)
    }

    /// Initialize the global process ID for the terminal front end
    pub fn init_terminal() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Terminal)
    }

    /// Get the global process ID, `Library` when no binary claimed one
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get().unwrap_or(&ProcessId::Library)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::WebServer => write!(f, "webserver"),
            ProcessId::Terminal => write!(f, "terminal"),
            ProcessId::Library => write!(f, "library"),
        }
    }
}
