//! Column family definitions for the Zeebe runtime database.
//!
//! Zeebe stores every logical column family inside RocksDB's default column
//! family. Each key starts with the family ordinal as an 8-byte big-endian
//! prefix, so a family is a contiguous slice of the sorted key space.
//!
//! The ordinals below follow the engine's `ZbColumnFamilies` enum and must
//! not be renumbered.

use std::fmt;

/// A logical column family: stable name plus the ordinal used as key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnFamily {
    /// Engine ordinal (key prefix)
    pub id: u64,
    /// Engine name, e.g. "INCIDENTS"
    pub name: &'static str,
}

impl ColumnFamily {
    pub const fn new(id: u64, name: &'static str) -> Self {
        Self { id, name }
    }

    /// Family holding incident records, aggregated per error message.
    pub const INCIDENTS: ColumnFamily = ColumnFamily::new(33, "INCIDENTS");

    /// Look up a family by its engine name.
    pub fn by_name(name: &str) -> Option<ColumnFamily> {
        ALL_COLUMN_FAMILIES.iter().copied().find(|cf| cf.name == name)
    }

    /// Look up a family by its ordinal.
    pub fn by_id(id: u64) -> Option<ColumnFamily> {
        ALL_COLUMN_FAMILIES.iter().copied().find(|cf| cf.id == id)
    }
}

impl fmt::Display for ColumnFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// All column families known to the monitor, ordered by ordinal.
pub const ALL_COLUMN_FAMILIES: &[ColumnFamily] = &[
    ColumnFamily::new(0, "DEFAULT"),
    ColumnFamily::new(1, "KEY"),
    ColumnFamily::new(2, "PROCESS_VERSION"),
    ColumnFamily::new(3, "PROCESS_CACHE"),
    ColumnFamily::new(4, "PROCESS_CACHE_BY_ID_AND_VERSION"),
    ColumnFamily::new(5, "PROCESS_CACHE_DIGEST_BY_ID"),
    ColumnFamily::new(6, "ELEMENT_INSTANCE_PARENT_CHILD"),
    ColumnFamily::new(7, "ELEMENT_INSTANCE_KEY"),
    ColumnFamily::new(8, "NUMBER_OF_TAKEN_SEQUENCE_FLOWS"),
    ColumnFamily::new(9, "ELEMENT_INSTANCE_CHILD_PARENT"),
    ColumnFamily::new(10, "VARIABLES"),
    ColumnFamily::new(11, "TIMERS"),
    ColumnFamily::new(12, "TIMER_DUE_DATES"),
    ColumnFamily::new(13, "PENDING_DEPLOYMENT"),
    ColumnFamily::new(14, "DEPLOYMENT_RAW"),
    ColumnFamily::new(15, "JOBS"),
    ColumnFamily::new(16, "JOB_STATES"),
    ColumnFamily::new(17, "JOB_DEADLINES"),
    ColumnFamily::new(18, "JOB_ACTIVATABLE"),
    ColumnFamily::new(19, "MESSAGE_KEY"),
    ColumnFamily::new(20, "MESSAGES"),
    ColumnFamily::new(21, "MESSAGE_DEADLINES"),
    ColumnFamily::new(22, "MESSAGE_IDS"),
    ColumnFamily::new(23, "MESSAGE_CORRELATED"),
    ColumnFamily::new(24, "MESSAGE_PROCESSES_ACTIVE_BY_CORRELATION_KEY"),
    ColumnFamily::new(25, "MESSAGE_PROCESS_INSTANCE_CORRELATION_KEYS"),
    ColumnFamily::new(26, "MESSAGE_SUBSCRIPTION_BY_KEY"),
    ColumnFamily::new(27, "MESSAGE_SUBSCRIPTION_BY_SENT_TIME"),
    ColumnFamily::new(28, "MESSAGE_SUBSCRIPTION_BY_NAME_AND_CORRELATION_KEY"),
    ColumnFamily::new(29, "MESSAGE_START_EVENT_SUBSCRIPTION_BY_NAME_AND_KEY"),
    ColumnFamily::new(30, "MESSAGE_START_EVENT_SUBSCRIPTION_BY_KEY_AND_NAME"),
    ColumnFamily::new(31, "PROCESS_SUBSCRIPTION_BY_KEY"),
    ColumnFamily::new(32, "PROCESS_SUBSCRIPTION_BY_SENT_TIME"),
    ColumnFamily::INCIDENTS,
    ColumnFamily::new(34, "INCIDENT_PROCESS_INSTANCES"),
    ColumnFamily::new(35, "INCIDENT_JOBS"),
    ColumnFamily::new(36, "EVENT_SCOPE"),
    ColumnFamily::new(37, "EVENT_TRIGGER"),
    ColumnFamily::new(38, "BANNED_INSTANCE"),
    ColumnFamily::new(39, "EXPORTER"),
    ColumnFamily::new(40, "AWAIT_WORKLOW_RESULT"),
    ColumnFamily::new(41, "JOB_BACKOFF"),
    ColumnFamily::new(42, "DMN_DECISIONS"),
    ColumnFamily::new(43, "DMN_DECISION_REQUIREMENTS"),
    ColumnFamily::new(44, "DMN_LATEST_DECISION_BY_ID"),
    ColumnFamily::new(45, "DMN_LATEST_DECISION_REQUIREMENTS_BY_ID"),
    ColumnFamily::new(46, "DMN_DECISION_KEY_BY_DECISION_REQUIREMENTS_KEY"),
    ColumnFamily::new(47, "DMN_DECISION_KEY_BY_DECISION_ID_AND_VERSION"),
    ColumnFamily::new(48, "DMN_DECISION_REQUIREMENTS_KEY_BY_DECISION_REQUIREMENT_ID_AND_VERSION"),
    ColumnFamily::new(49, "PROCESS_INSTANCE_KEY_BY_DEFINITION_KEY"),
];
