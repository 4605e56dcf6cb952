//! Member domain types.
//!
//! These model the two external systems the panel reads but does not own:
//! the host user store (`directory` schema) and the membership add-on
//! (`membership` schema).

use chrono::{DateTime, Utc};

use gogn_core::{MembershipId, MembershipStatus, PlanId, UserId};

/// A site user from the host user store.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name; may be absent for partially-registered accounts.
    pub display_name: Option<String>,
    /// Account email address (stored as plain text in the host schema).
    pub email: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The name shown on the roster.
    ///
    /// A missing display name degrades to a generated placeholder label
    /// rather than an empty cell.
    #[must_use]
    pub fn member_name(&self) -> String {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .map_or_else(
                || format!("Unnamed user (ID: {})", self.id),
                ToString::to_string,
            )
    }
}

/// A membership plan (tier/level) from the add-on.
#[derive(Debug, Clone)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
}

/// A membership record from the add-on, joined with its plan name.
#[derive(Debug, Clone)]
pub struct Membership {
    /// Unique membership record ID.
    pub id: MembershipId,
    /// The user holding this membership.
    pub user_id: UserId,
    /// The plan this membership is for.
    pub plan_id: PlanId,
    /// Resolved plan name.
    pub plan_name: String,
    /// Raw status string as the add-on stores it (e.g. `active`).
    pub status: String,
    /// When the membership started.
    pub start_date: DateTime<Utc>,
    /// When the membership ends; `None` means open-ended.
    pub end_date: Option<DateTime<Utc>>,
}

impl Membership {
    /// Resolve the roster status at `now`.
    ///
    /// Active iff the end date is unset or still in the future; the raw
    /// record status has already been filtered to `active` by the queries
    /// that produce these values.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> MembershipStatus {
        match self.end_date {
            None => MembershipStatus::Active,
            Some(end) if end > now => MembershipStatus::Active,
            Some(_) => MembershipStatus::Inactive,
        }
    }
}
