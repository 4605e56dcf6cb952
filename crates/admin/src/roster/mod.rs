//! Roster assembly.
//!
//! Joins the host user store with the membership add-on into the rows the
//! members screen and the CSV export both render. The add-on being absent
//! is a supported configuration: rows then carry no plan data and the plan
//! filter offers no options.

pub mod assignor;
pub mod csv;

use chrono::Utc;
use sqlx::PgPool;

use gogn_core::{MembershipStatus, PlanId};

use crate::db::{MembershipStore, RepositoryError, UserRepository};
use crate::models::{Membership, User};

/// Rows per roster page.
pub const PAGE_SIZE: i64 = 20;

/// Plan label shown when a user holds no active membership.
pub const NO_PLAN_LABEL: &str = "None";

/// Code cell shown when no member code has been assigned yet.
pub const NO_CODE_LABEL: &str = "N/A";

/// Name shown on the placeholder row of an empty roster.
pub const EMPTY_ROSTER_LABEL: &str = "No members found";

/// Which plan memberships to restrict the roster to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanFilter {
    /// No restriction.
    #[default]
    All,
    /// Users holding any active membership.
    AnyActive,
    /// Users holding an active membership on this plan.
    Plan(PlanId),
}

impl PlanFilter {
    /// Parse the `plan` query parameter. Absent or unrecognized values
    /// fall back to no filtering.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::All,
            Some("any") => Self::AnyActive,
            Some(s) => s.parse::<i64>().map_or(Self::All, |id| Self::Plan(PlanId::new(id))),
        }
    }

    /// Whether a user with the given membership passes this filter.
    ///
    /// Narrowing the filter can only shrink the matching set: everything
    /// `Plan(id)` accepts, `AnyActive` accepts, and `All` accepts anything.
    #[must_use]
    pub fn matches(self, membership: Option<&Membership>) -> bool {
        match (self, membership) {
            (Self::All, _) | (Self::AnyActive, Some(_)) => true,
            (Self::Plan(plan_id), Some(m)) => m.plan_id == plan_id,
            (Self::AnyActive | Self::Plan(_), None) => false,
        }
    }
}

/// Sortable roster columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Plan,
}

impl SortColumn {
    /// Parse the `sort` query parameter. Unknown values mean no sort.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw {
            Some("name") => Some(Self::Name),
            Some("plan") => Some(Self::Plan),
            _ => None,
        }
    }

    /// The query-parameter value for this column.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Plan => "plan",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse the `dir` query parameter. Anything but `desc` is ascending.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    /// SQL keyword for ORDER BY clauses.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// The query-parameter value for this direction.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// The opposite direction, for toggling column header links.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// A fully resolved roster request.
#[derive(Debug, Clone)]
pub struct RosterQuery {
    /// 1-based page number.
    pub page: i64,
    /// Free-text search over name and email.
    pub search: Option<String>,
    /// Plan restriction.
    pub plan: PlanFilter,
    /// Sort column; `None` leaves rows in fetch order.
    pub sort: Option<SortColumn>,
    /// Sort direction.
    pub dir: SortDirection,
}

impl Default for RosterQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: None,
            plan: PlanFilter::All,
            sort: Some(SortColumn::Name),
            dir: SortDirection::Asc,
        }
    }
}

/// One rendered roster row. All fields are display-ready strings; the
/// same rows feed the HTML table and the CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub name: String,
    pub plan: String,
    pub member_code: String,
    pub status: String,
}

impl RosterRow {
    fn from_parts(
        user: &User,
        membership: Option<&Membership>,
        member_code: Option<String>,
    ) -> Self {
        let now = Utc::now();
        let (plan, status) = membership.map_or_else(
            || {
                (
                    NO_PLAN_LABEL.to_string(),
                    MembershipStatus::default().label().to_string(),
                )
            },
            |m| (m.plan_name.clone(), m.status_at(now).label().to_string()),
        );

        Self {
            name: user.member_name(),
            plan,
            member_code: member_code.unwrap_or_else(|| NO_CODE_LABEL.to_string()),
            status,
        }
    }

    /// The placeholder row rendered when no users match.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            name: EMPTY_ROSTER_LABEL.to_string(),
            plan: NO_PLAN_LABEL.to_string(),
            member_code: NO_CODE_LABEL.to_string(),
            status: MembershipStatus::default().label().to_string(),
        }
    }

}

/// One page of the roster plus pagination facts.
#[derive(Debug, Clone)]
pub struct RosterPage {
    pub rows: Vec<RosterRow>,
    /// Total matching rows across all pages. Forced to 1 when the roster
    /// is empty so the placeholder row still paginates as one item.
    pub total: i64,
    /// 1-based page number this page represents.
    pub page: i64,
    /// Whether the rows are the empty-roster placeholder rather than real
    /// members. Display names are untrusted, so this is an explicit flag
    /// and not derived from the rendered rows.
    pub placeholder: bool,
}

impl RosterPage {
    /// The page served when no users match: one placeholder row,
    /// counted as one item.
    #[must_use]
    pub fn empty(page: i64) -> Self {
        Self {
            rows: vec![RosterRow::placeholder()],
            total: 1,
            page,
            placeholder: true,
        }
    }

    /// Number of pages at [`PAGE_SIZE`] rows each.
    #[must_use]
    pub const fn total_pages(&self) -> i64 {
        // `i64::div_ceil` is unstable; this is the same ceiling division.
        self.total.div_euclid(PAGE_SIZE) + if self.total.rem_euclid(PAGE_SIZE) > 0 { 1 } else { 0 }
    }
}

/// Offset of a 1-based page. Saturates so absurd page numbers request
/// rows past the end instead of overflowing into a negative offset.
const fn page_offset(page: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(PAGE_SIZE)
}

/// Assemble one page of the roster.
///
/// Without a plan filter this pages in SQL and enriches only the visible
/// rows. With a plan filter the full matching user set is materialized,
/// filtered by membership, and paged in memory. Sorting is applied to the
/// page that was fetched, not to the whole set.
///
/// # Errors
///
/// Returns `RepositoryError` if any underlying query fails.
pub async fn build(
    pool: &PgPool,
    store: &MembershipStore,
    query: &RosterQuery,
) -> Result<RosterPage, RepositoryError> {
    let users = UserRepository::new(pool);
    let page = query.page.max(1);
    let offset = page_offset(page);
    let search = query.search.as_deref();

    let (page_users, total) = match query.plan {
        PlanFilter::All => {
            let total = users.count(search).await?;
            let page_users = users.list_page(search, query.dir, PAGE_SIZE, offset).await?;
            (page_users, total)
        }
        PlanFilter::AnyActive | PlanFilter::Plan(_) => {
            let all = users.list_all(search, query.dir).await?;
            let mut matching = Vec::new();
            for user in all {
                let membership = store.membership_for_user(user.id).await?;
                if query.plan.matches(membership.as_ref()) {
                    matching.push(user);
                }
            }
            let total = matching.len() as i64;
            let page_users: Vec<User> = matching
                .into_iter()
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(PAGE_SIZE).unwrap_or(usize::MAX))
                .collect();
            (page_users, total)
        }
    };

    let mut rows = Vec::with_capacity(page_users.len());
    for user in &page_users {
        let membership = store.membership_for_user(user.id).await?;
        let member_code = users.member_code(user.id).await?;
        rows.push(RosterRow::from_parts(user, membership.as_ref(), member_code));
    }

    sort_rows(&mut rows, query.sort, query.dir);

    if rows.is_empty() {
        return Ok(RosterPage::empty(page));
    }

    Ok(RosterPage {
        rows,
        total,
        page,
        placeholder: false,
    })
}

/// Sort rows in place by the given column. Comparison is case sensitive.
pub fn sort_rows(rows: &mut [RosterRow], sort: Option<SortColumn>, dir: SortDirection) {
    let Some(column) = sort else {
        return;
    };

    rows.sort_by(|a, b| {
        let ordering = match column {
            SortColumn::Name => a.name.cmp(&b.name),
            SortColumn::Plan => a.plan.cmp(&b.plan),
        };
        match dir {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gogn_core::{MembershipId, UserId};

    fn membership(plan_id: i64) -> Membership {
        Membership {
            id: MembershipId::new(1),
            user_id: UserId::new(1),
            plan_id: PlanId::new(plan_id),
            plan_name: "Gold".to_string(),
            status: "active".to_string(),
            start_date: chrono::Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            end_date: None,
        }
    }

    fn row(name: &str, plan: &str) -> RosterRow {
        RosterRow {
            name: name.to_string(),
            plan: plan.to_string(),
            member_code: String::new(),
            status: "Active".to_string(),
        }
    }

    #[test]
    fn test_plan_filter_parse() {
        assert_eq!(PlanFilter::parse(None), PlanFilter::All);
        assert_eq!(PlanFilter::parse(Some("")), PlanFilter::All);
        assert_eq!(PlanFilter::parse(Some("any")), PlanFilter::AnyActive);
        assert_eq!(
            PlanFilter::parse(Some("7")),
            PlanFilter::Plan(PlanId::new(7))
        );
        assert_eq!(PlanFilter::parse(Some("gold")), PlanFilter::All);
    }

    #[test]
    fn test_plan_filter_matches_narrows_monotonically() {
        let m = membership(7);

        // All accepts everything AnyActive does, which accepts
        // everything Plan(7) does.
        assert!(PlanFilter::Plan(PlanId::new(7)).matches(Some(&m)));
        assert!(PlanFilter::AnyActive.matches(Some(&m)));
        assert!(PlanFilter::All.matches(Some(&m)));

        assert!(!PlanFilter::Plan(PlanId::new(8)).matches(Some(&m)));
        assert!(!PlanFilter::AnyActive.matches(None));
        assert!(!PlanFilter::Plan(PlanId::new(7)).matches(None));
        assert!(PlanFilter::All.matches(None));
    }

    #[test]
    fn test_sort_column_parse_unknown_is_none() {
        assert_eq!(SortColumn::parse(Some("name")), Some(SortColumn::Name));
        assert_eq!(SortColumn::parse(Some("plan")), Some(SortColumn::Plan));
        assert_eq!(SortColumn::parse(Some("email")), None);
        assert_eq!(SortColumn::parse(None), None);
    }

    #[test]
    fn test_sort_direction_parse_defaults_to_asc() {
        assert_eq!(SortDirection::parse(Some("desc")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("sideways")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(None), SortDirection::Asc);
    }

    #[test]
    fn test_sort_rows_by_name_case_sensitive() {
        let mut rows = vec![row("banana", "Gold"), row("Apple", "Silver"), row("cherry", "Gold")];
        sort_rows(&mut rows, Some(SortColumn::Name), SortDirection::Asc);
        // Uppercase sorts before lowercase under byte ordering.
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_sort_rows_by_plan_desc() {
        let mut rows = vec![row("a", "Bronze"), row("b", "Silver"), row("c", "Gold")];
        sort_rows(&mut rows, Some(SortColumn::Plan), SortDirection::Desc);
        let plans: Vec<&str> = rows.iter().map(|r| r.plan.as_str()).collect();
        assert_eq!(plans, vec!["Silver", "Gold", "Bronze"]);
    }

    #[test]
    fn test_sort_rows_none_is_noop() {
        let mut rows = vec![row("b", "x"), row("a", "y")];
        sort_rows(&mut rows, None, SortDirection::Asc);
        assert_eq!(rows[0].name, "b");
        assert_eq!(rows[1].name, "a");
    }

    #[test]
    fn test_placeholder_row_shape() {
        let placeholder = RosterRow::placeholder();
        assert_eq!(placeholder.name, "No members found");
        assert_eq!(placeholder.plan, "None");
        assert_eq!(placeholder.member_code, "N/A");
        assert_eq!(placeholder.status, "Inactive");
    }

    #[test]
    fn test_empty_page_is_one_placeholder_item() {
        let page = RosterPage::empty(1);
        assert!(page.placeholder);
        assert_eq!(page.total, 1);
        assert_eq!(page.total_pages(), 1);
        assert_eq!(page.rows, vec![RosterRow::placeholder()]);
    }

    #[test]
    fn test_member_named_like_placeholder_is_not_one() {
        // The flag, not the display name, marks a placeholder page.
        let page = RosterPage {
            rows: vec![row(EMPTY_ROSTER_LABEL, "Gold")],
            total: 1,
            page: 1,
            placeholder: false,
        };
        assert!(!page.placeholder);
    }

    #[test]
    fn test_page_offset_saturates_on_huge_pages() {
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(3), 2 * PAGE_SIZE);
        assert_eq!(page_offset(i64::MAX), i64::MAX);
        assert!(page_offset(i64::MAX) >= 0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = RosterPage {
            rows: Vec::new(),
            total: 41,
            page: 1,
            placeholder: false,
        };
        assert_eq!(page.total_pages(), 3);
    }
}
