//! Members roster route handlers.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Form,
};
use serde::Deserialize;
use tracing::instrument;

use gogn_core::AdminRole;

use crate::{
    components::{members_table_config, DataTableConfig, FilterOption},
    error::AppError,
    filters,
    middleware::auth::RequireAdmin,
    middleware::csrf::{ensure_csrf_token, verify_csrf_token},
    models::CurrentAdmin,
    roster::{
        self, assignor::assign_member_codes, PlanFilter, RosterQuery, RosterRow, SortColumn,
        SortDirection,
    },
    state::AppState,
};

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
    pub is_super_admin: bool,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.to_string(),
            is_super_admin: admin.role == AdminRole::SuperAdmin,
        }
    }
}

/// Roster query parameters.
#[derive(Debug, Deserialize)]
pub struct MembersQuery {
    pub page: Option<i64>,
    pub q: Option<String>,
    pub plan: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

impl MembersQuery {
    fn to_roster_query(&self) -> RosterQuery {
        RosterQuery {
            page: self.page.unwrap_or(1).max(1),
            search: self
                .q
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
            plan: PlanFilter::parse(self.plan.as_deref()),
            sort: SortColumn::parse(self.sort.as_deref()),
            dir: SortDirection::parse(self.dir.as_deref()),
        }
    }
}

/// Members roster page template.
#[derive(Template)]
#[template(path = "members/index.html")]
pub struct MembersIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub rows: Vec<RosterRow>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub search_query: String,
    pub plan_value: String,
    pub table_config: DataTableConfig,
    pub membership_available: bool,
    pub can_export: bool,
    pub csrf_token: String,
    pub name_sort_url: String,
    pub plan_sort_url: String,
    pub prev_url: String,
    pub next_url: String,
}

/// Members roster page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: tower_sessions::Session,
    Query(query): Query<MembersQuery>,
) -> Result<Html<String>, AppError> {
    // Every roster render re-derives member codes first, so the listing
    // never shows stale or missing codes.
    let stats = assign_member_codes(
        state.pool(),
        state.memberships(),
        &state.config().member_code_prefix,
    )
    .await?;
    if stats.written > 0 {
        tracing::info!(written = stats.written, "member codes updated");
    }

    let roster_query = query.to_roster_query();
    let page = roster::build(state.pool(), state.memberships(), &roster_query).await?;

    let plan_options: Vec<FilterOption> = state
        .memberships()
        .plans()
        .await?
        .iter()
        .map(|p| FilterOption::new(&p.id.to_string(), &p.name))
        .collect();

    let csrf_token = ensure_csrf_token(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    let search_query = roster_query.search.clone().unwrap_or_default();
    let plan_value = query
        .plan
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let template = MembersIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/members".to_string(),
        total: page.total,
        total_pages: page.total_pages(),
        name_sort_url: sort_url(SortColumn::Name, &roster_query, &search_query, &plan_value),
        plan_sort_url: sort_url(SortColumn::Plan, &roster_query, &search_query, &plan_value),
        prev_url: if page.page > 1 {
            page_url(page.page - 1, &roster_query, &search_query, &plan_value)
        } else {
            String::new()
        },
        next_url: if page.page < page.total_pages() {
            page_url(page.page + 1, &roster_query, &search_query, &plan_value)
        } else {
            String::new()
        },
        page: page.page,
        rows: page.rows,
        search_query,
        plan_value,
        table_config: members_table_config(plan_options),
        membership_available: state.memberships().is_available(),
        can_export: admin.can_export(),
        csrf_token,
    };

    Ok(Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    })))
}

/// Export form fields.
#[derive(Debug, Deserialize)]
pub struct ExportForm {
    #[serde(default)]
    pub csrf_token: String,
}

/// CSV export handler.
///
/// Exports the first page of the default roster query regardless of the
/// filters active on screen. Viewer-role operators and requests without a
/// valid CSRF token are rejected.
#[instrument(skip(admin, state, session, form))]
pub async fn export_csv(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: tower_sessions::Session,
    Form(form): Form<ExportForm>,
) -> Result<impl IntoResponse, AppError> {
    if !admin.can_export() {
        return Err(AppError::Forbidden(
            "export requires the admin role".to_string(),
        ));
    }

    let token_valid = verify_csrf_token(&session, &form.csrf_token)
        .await
        .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?;
    if !token_valid {
        return Err(AppError::Forbidden("invalid export token".to_string()));
    }

    assign_member_codes(
        state.pool(),
        state.memberships(),
        &state.config().member_code_prefix,
    )
    .await?;

    let page = roster::build(state.pool(), state.memberships(), &RosterQuery::default()).await?;
    if page.placeholder {
        return Err(AppError::BadRequest(
            "No data available to export".to_string(),
        ));
    }

    let csv = roster::csv::render(&page.rows);
    let filename = format!(
        "membership-users-{}.csv",
        chrono::Utc::now().format("%Y-%m-%d-%H-%M-%S")
    );
    tracing::info!(admin = %admin.email, rows = page.rows.len(), "roster exported");

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", "text/csv".to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}

/// Build a roster URL preserving search, plan, and sort parameters.
fn page_url(page: i64, query: &RosterQuery, search: &str, plan: &str) -> String {
    let mut url = format!("/members?page={page}");
    if !search.is_empty() {
        url.push_str(&format!("&q={}", urlencoding::encode(search)));
    }
    if !plan.is_empty() {
        url.push_str(&format!("&plan={}", urlencoding::encode(plan)));
    }
    if let Some(sort) = query.sort {
        url.push_str(&format!(
            "&sort={}&dir={}",
            sort.as_param(),
            query.dir.as_param()
        ));
    }
    url
}

/// Build the header link for a sortable column. Clicking the active
/// column toggles its direction; other columns start ascending.
fn sort_url(column: SortColumn, query: &RosterQuery, search: &str, plan: &str) -> String {
    let dir = if query.sort == Some(column) {
        query.dir.toggled()
    } else {
        SortDirection::Asc
    };

    let mut url = format!(
        "/members?page=1&sort={}&dir={}",
        column.as_param(),
        dir.as_param()
    );
    if !search.is_empty() {
        url.push_str(&format!("&q={}", urlencoding::encode(search)));
    }
    if !plan.is_empty() {
        url.push_str(&format!("&plan={}", urlencoding::encode(plan)));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(sort: Option<SortColumn>, dir: SortDirection) -> RosterQuery {
        RosterQuery {
            page: 1,
            search: None,
            plan: PlanFilter::All,
            sort,
            dir,
        }
    }

    #[test]
    fn test_page_url_preserves_parameters() {
        let q = query(Some(SortColumn::Name), SortDirection::Desc);
        assert_eq!(
            page_url(3, &q, "ada lovelace", "7"),
            "/members?page=3&q=ada%20lovelace&plan=7&sort=name&dir=desc"
        );
    }

    #[test]
    fn test_sort_url_toggles_active_column() {
        let q = query(Some(SortColumn::Name), SortDirection::Asc);
        assert_eq!(
            sort_url(SortColumn::Name, &q, "", ""),
            "/members?page=1&sort=name&dir=desc"
        );
        assert_eq!(
            sort_url(SortColumn::Plan, &q, "", ""),
            "/members?page=1&sort=plan&dir=asc"
        );
    }

    #[test]
    fn test_members_query_normalizes_input() {
        let query = MembersQuery {
            page: Some(0),
            q: Some("  ".to_string()),
            plan: None,
            sort: Some("bogus".to_string()),
            dir: None,
        };
        let roster_query = query.to_roster_query();
        assert_eq!(roster_query.page, 1);
        assert_eq!(roster_query.search, None);
        assert_eq!(roster_query.sort, None);
        assert_eq!(roster_query.dir, SortDirection::Asc);
    }
}
