//! Message log.
//!
//! Ordered display entries for the current view. The log is append-only with
//! eviction: appending an [`Kind::Info`] or [`Kind::In`] entry first drops
//! every transient entry ([`Kind::Command`], [`Kind::Error`],
//! [`Kind::TempInfo`]) so command echoes and errors do not pile up once a
//! real event has happened.
//!
//! # Invariants
//!
//! - Every entry has a local id; local ids strictly increase and are never
//!   reused. Server message ids live in a separate field and are only ever
//!   compared with other server ids.
//! - Deleted entries stay in place as tombstones; positions never shift
//!   because of a deletion.
//! - Control kinds ([`Kind::Clear`], [`Kind::ClearAll`]) are never stored.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::CommandError;

/// Text a tombstoned entry shows in place of its original body.
pub const DELETED_PLACEHOLDER: &str = "[message deleted]";

/// Sender recorded on entries the client produces itself.
pub const SYSTEM_SENDER: &str = "shello";

/// Default upper bound on retained entries.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Classification of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Chat message written by the local user.
    Out,
    /// Chat message from the server.
    In,
    /// Informational notice.
    Info,
    /// Error notice.
    Error,
    /// Echo of a submitted command line.
    Command,
    /// Short-lived notice, evicted by the next real event.
    TempInfo,
    /// Control: drop everything except [`Kind::In`].
    Clear,
    /// Control: drop everything.
    ClearAll,
}

impl Kind {
    /// Entry is an actual chat message.
    pub fn is_chat(self) -> bool {
        matches!(self, Kind::Out | Kind::In)
    }

    /// Entry is evicted when an `Info` or `In` entry arrives.
    pub fn is_transient(self) -> bool {
        matches!(self, Kind::Command | Kind::Error | Kind::TempInfo)
    }

    fn evicts_transient(self) -> bool {
        matches!(self, Kind::Info | Kind::In)
    }
}

/// Which entries [`MessageLog::clear`] removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    /// Keep remote history ([`Kind::In`]), drop local noise.
    Visible,
    /// Drop everything.
    All,
}

/// A stored log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Local id, unique within the log.
    pub id: u64,
    /// Server message id. `None` for entries the client produced itself.
    pub server_id: Option<u64>,
    /// Display text.
    pub text: String,
    /// Classification.
    pub kind: Kind,
    /// Author user name, or [`SYSTEM_SENDER`].
    pub sender: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Read confirmations. Only tracked for the local user's own messages.
    pub read_by: Option<u32>,
}

/// An entry to append. Unset fields are filled in by the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    text: String,
    kind: Kind,
    sender: String,
    timestamp: Option<DateTime<Utc>>,
    server_id: Option<u64>,
    read_by: Option<u32>,
}

impl Draft {
    /// Draft with the given kind and text, attributed to [`SYSTEM_SENDER`].
    pub fn new(kind: Kind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            sender: SYSTEM_SENDER.to_string(),
            timestamp: None,
            server_id: None,
            read_by: None,
        }
    }

    /// Informational notice.
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Kind::Info, text)
    }

    /// Error notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Kind::Error, text)
    }

    /// Transient notice.
    pub fn temp_info(text: impl Into<String>) -> Self {
        Self::new(Kind::TempInfo, text)
    }

    /// Set the author.
    #[must_use]
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Use an explicit timestamp instead of the append time.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Tie the entry to a server message.
    #[must_use]
    pub fn server_id(mut self, server_id: u64) -> Self {
        self.server_id = Some(server_id);
        self
    }

    /// Attach a read count.
    #[must_use]
    pub fn read_by(mut self, read_by: Option<u32>) -> Self {
        self.read_by = read_by;
        self
    }

    /// Kind of the draft.
    pub fn kind(&self) -> Kind {
        self.kind
    }
}

/// Log configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Oldest entries beyond this count are dropped.
    pub capacity: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { capacity: DEFAULT_CAPACITY }
    }
}

/// Consecutive entries sharing a calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup<'a> {
    /// Calendar date in the requested time zone.
    pub date: NaiveDate,
    /// Entries in log order.
    pub entries: Vec<&'a Message>,
}

/// Ordered message log.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: Vec<Message>,
    next_id: u64,
    config: LogConfig,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(LogConfig::default())
    }
}

impl MessageLog {
    /// Create an empty log.
    pub fn new(config: LogConfig) -> Self {
        Self { entries: Vec::new(), next_id: 1, config }
    }

    /// Append an entry, applying retention rules.
    ///
    /// Control kinds clear the log instead of being stored. A draft carrying a
    /// server id that is already present updates that entry in place. Returns
    /// the local id of the stored entry, or `None` for control kinds.
    pub fn append(&mut self, draft: Draft, now: DateTime<Utc>) -> Option<u64> {
        match draft.kind {
            Kind::Clear => {
                self.clear(ClearScope::Visible);
                return None;
            },
            Kind::ClearAll => {
                self.clear(ClearScope::All);
                return None;
            },
            _ => {},
        }

        if draft.kind.evicts_transient() {
            self.entries.retain(|entry| !entry.kind.is_transient());
        }

        let timestamp = draft.timestamp.unwrap_or(now);
        if let Some(server_id) = draft.server_id
            && let Some(existing) = self.by_server_id_mut(server_id)
        {
            existing.text = draft.text;
            existing.kind = draft.kind;
            existing.sender = draft.sender;
            existing.timestamp = timestamp;
            existing.read_by = draft.read_by;
            return Some(existing.id);
        }

        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);

        self.entries.push(Message {
            id,
            server_id: draft.server_id,
            text: draft.text,
            kind: draft.kind,
            sender: draft.sender,
            timestamp,
            read_by: draft.read_by,
        });

        let excess = self.entries.len().saturating_sub(self.config.capacity);
        if excess > 0 {
            self.entries.drain(..excess);
        }

        Some(id)
    }

    /// Remove entries according to `scope`. Idempotent.
    pub fn clear(&mut self, scope: ClearScope) {
        match scope {
            ClearScope::Visible => self.entries.retain(|entry| entry.kind == Kind::In),
            ClearScope::All => self.entries.clear(),
        }
    }

    /// Replace the text of the entry for server message `server_id` with
    /// [`DELETED_PLACEHOLDER`] and demote it to [`Kind::Info`], keeping its
    /// position.
    ///
    /// Returns `false` if no entry carries this server id. Local entries are
    /// never matched.
    pub fn tombstone(&mut self, server_id: u64) -> bool {
        let Some(entry) = self.by_server_id_mut(server_id) else {
            return false;
        };
        entry.text = DELETED_PLACEHOLDER.to_string();
        entry.kind = Kind::Info;
        entry.read_by = None;
        true
    }

    /// Update the read count of one of `identity`'s own sent messages.
    ///
    /// Returns `false` if the server id is unknown or the entry is not an
    /// [`Kind::Out`] entry written by `identity`.
    pub fn set_read_by(&mut self, server_id: u64, read_by: u32, identity: &str) -> bool {
        match self.by_server_id_mut(server_id) {
            Some(entry) if entry.kind == Kind::Out && entry.sender == identity => {
                entry.read_by = Some(read_by);
                true
            },
            _ => false,
        }
    }

    /// Resolve the server id of `identity`'s `n`-th most recent chat message
    /// (`n = 1` is the newest).
    ///
    /// # Errors
    ///
    /// - `CommandError::BadArguments` if `n` is zero
    /// - `CommandError::OutOfRange` if fewer than `n` such messages exist
    pub fn nth_own_message(&self, n: usize, identity: &str) -> Result<u64, CommandError> {
        if n == 0 {
            return Err(CommandError::bad_args("message offset must be a positive integer"));
        }

        let mut remaining = n;
        for server_id in self.own_messages(identity) {
            remaining -= 1;
            if remaining == 0 {
                return Ok(server_id);
            }
        }

        Err(CommandError::OutOfRange { requested: n, available: n - remaining })
    }

    /// Server ids of `identity`'s chat messages, newest first.
    fn own_messages<'a>(&'a self, identity: &'a str) -> impl Iterator<Item = u64> + 'a {
        self.entries
            .iter()
            .rev()
            .filter(move |entry| entry.kind.is_chat() && entry.sender == identity)
            .filter_map(|entry| entry.server_id)
    }

    fn by_server_id_mut(&mut self, server_id: u64) -> Option<&mut Message> {
        self.entries.iter_mut().find(|entry| entry.server_id == Some(server_id))
    }

    /// Group consecutive entries by calendar date in `tz`.
    ///
    /// Pure projection; the log is not modified.
    pub fn group_by_date<Tz: TimeZone>(&self, tz: &Tz) -> Vec<DateGroup<'_>> {
        let mut groups: Vec<DateGroup<'_>> = Vec::new();

        for entry in &self.entries {
            let date = entry.timestamp.with_timezone(tz).date_naive();
            match groups.last_mut() {
                Some(group) if group.date == date => group.entries.push(entry),
                _ => groups.push(DateGroup { date, entries: vec![entry] }),
            }
        }

        groups
    }

    /// Entry with this local id. `None` if absent.
    pub fn get(&self, id: u64) -> Option<&Message> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Entry for server message `server_id`. `None` if absent.
    pub fn by_server_id(&self, server_id: u64) -> Option<&Message> {
        self.entries.iter().find(|entry| entry.server_id == Some(server_id))
    }

    /// All entries in display order.
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
