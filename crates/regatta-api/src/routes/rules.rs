//! # Rule Catalog API
//!
//! Read-only access to the static rule catalog for the editor's rule
//! selector. Results are always in rulebook order.

use axum::extract::{Path, Query};
use axum::routing::get;
use axum::{Json, Router};
use regatta_core::rule::{DocumentSection, RuleCategory, RuleDefinition};
use regatta_core::{filter_rules, get_rule, list_rules, suggestions_for, Suggestion};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// Optional catalog filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RulesQuery {
    /// `rrs`, `prescription` or `appendix`.
    pub category: Option<String>,
    /// `nor`, `si` or `both`. `nor` and `si` include rules tagged `both`.
    pub section: Option<String>,
}

/// Size of one catalog category.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    #[schema(value_type = String)]
    pub category: RuleCategory,
    #[schema(value_type = String)]
    pub label: &'static str,
    pub total: usize,
    pub modifiable: usize,
}

/// Catalog listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct RulesResponse {
    #[schema(value_type = Vec<Object>)]
    pub rules: Vec<&'static RuleDefinition>,
    /// Per-category totals over the whole catalog, regardless of filters.
    pub categories: Vec<CategorySummary>,
}

/// A single catalog entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct RuleResponse {
    #[schema(value_type = Object)]
    pub rule: &'static RuleDefinition,
}

/// Suggested override texts for one rule.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsResponse {
    #[schema(value_type = String)]
    pub rule_id: &'static str,
    #[schema(value_type = Vec<Object>)]
    pub suggestions: Vec<&'static Suggestion>,
}

/// Build the rules router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/rules", get(list))
        .route("/v1/rules/:id", get(get_one))
        .route("/v1/rules/:id/suggestions", get(suggestions))
}

fn parse_filter<T: std::str::FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("unknown {name} '{s}'"))),
    }
}

fn category_summaries() -> Vec<CategorySummary> {
    RuleCategory::ALL
        .iter()
        .map(|&category| {
            let in_category = list_rules().iter().filter(|r| r.category == category);
            CategorySummary {
                category,
                label: category.label(),
                total: in_category.clone().count(),
                modifiable: in_category.filter(|r| r.can_modify).count(),
            }
        })
        .collect()
}

/// GET /v1/rules: List the catalog.
#[utoipa::path(
    get,
    path = "/v1/rules",
    params(RulesQuery),
    responses(
        (status = 200, description = "Matching rules in rulebook order", body = RulesResponse),
        (status = 422, description = "Unknown filter value", body = crate::error::ErrorBody),
    ),
    tag = "rules"
)]
pub(crate) async fn list(
    _caller: CallerIdentity,
    Query(query): Query<RulesQuery>,
) -> Result<Json<RulesResponse>, AppError> {
    let category: Option<RuleCategory> = parse_filter("category", query.category.as_deref())?;
    let section: Option<DocumentSection> = parse_filter("section", query.section.as_deref())?;
    Ok(Json(RulesResponse {
        rules: filter_rules(category, section).collect(),
        categories: category_summaries(),
    }))
}

/// GET /v1/rules/:id: One catalog entry.
#[utoipa::path(
    get,
    path = "/v1/rules/{id}",
    params(("id" = String, Path, description = "Catalog id, e.g. rule-30.1")),
    responses(
        (status = 200, description = "Rule found", body = RuleResponse),
        (status = 404, description = "Not in the catalog", body = crate::error::ErrorBody),
    ),
    tag = "rules"
)]
pub(crate) async fn get_one(
    _caller: CallerIdentity,
    Path(id): Path<String>,
) -> Result<Json<RuleResponse>, AppError> {
    Ok(Json(RuleResponse {
        rule: get_rule(&id)?,
    }))
}

/// GET /v1/rules/:id/suggestions: Common modifications of a rule.
#[utoipa::path(
    get,
    path = "/v1/rules/{id}/suggestions",
    params(("id" = String, Path, description = "Catalog id")),
    responses(
        (status = 200, description = "Suggestions; empty for rules that cannot be modified", body = SuggestionsResponse),
        (status = 404, description = "Not in the catalog", body = crate::error::ErrorBody),
    ),
    tag = "rules"
)]
pub(crate) async fn suggestions(
    _caller: CallerIdentity,
    Path(id): Path<String>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let rule = get_rule(&id)?;
    Ok(Json(SuggestionsResponse {
        rule_id: rule.id,
        suggestions: suggestions_for(rule),
    }))
}
