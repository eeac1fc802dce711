//! Moderation status database enum.

use domain::models::ModerationStatus;

/// Database enum for moderation_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "moderation_status", rename_all = "lowercase")]
pub enum ModerationStatusDb {
    Pending,
    Approved,
    Rejected,
}

impl From<ModerationStatusDb> for ModerationStatus {
    fn from(db_status: ModerationStatusDb) -> Self {
        match db_status {
            ModerationStatusDb::Pending => ModerationStatus::Pending,
            ModerationStatusDb::Approved => ModerationStatus::Approved,
            ModerationStatusDb::Rejected => ModerationStatus::Rejected,
        }
    }
}

impl From<ModerationStatus> for ModerationStatusDb {
    fn from(status: ModerationStatus) -> Self {
        match status {
            ModerationStatus::Pending => ModerationStatusDb::Pending,
            ModerationStatus::Approved => ModerationStatusDb::Approved,
            ModerationStatus::Rejected => ModerationStatusDb::Rejected,
        }
    }
}
