//! SurrealDB implementation of [`OverrideRepository`].
//!
//! The candidate query orders `priority DESC, created_at DESC`; that
//! ordering is part of the repository contract (the resolver's
//! recency tie-break), not an implementation accident.

use chrono::{DateTime, Utc};
use mealtrack_core::error::{MealtrackError, MealtrackResult};
use mealtrack_core::models::meal::MealType;
use mealtrack_core::models::override_rule::{
    CreateRuleOverride, MealScope, OverrideAction, OverrideDates, OverrideTarget,
    RecurrencePattern, RuleOverride, UpdateRuleOverride,
};
use mealtrack_core::models::role::Role;
use mealtrack_core::models::status::StatusPriority;
use mealtrack_core::repository::OverrideRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::{parse_date, parse_uuid};

#[derive(Debug, SurrealValue)]
struct OverrideRow {
    target_type: String,
    target_user: Option<String>,
    date_type: String,
    start_date: String,
    end_date: Option<String>,
    recurring_pattern: Option<String>,
    recurring_days: Option<Vec<u32>>,
    meal_scope: String,
    action: String,
    priority: u8,
    is_active: bool,
    expires_at: Option<DateTime<Utc>>,
    created_by: String,
    created_by_role: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct OverrideRowWithId {
    record_id: String,
    target_type: String,
    target_user: Option<String>,
    date_type: String,
    start_date: String,
    end_date: Option<String>,
    recurring_pattern: Option<String>,
    recurring_days: Option<Vec<u32>>,
    meal_scope: String,
    action: String,
    priority: u8,
    is_active: bool,
    expires_at: Option<DateTime<Utc>>,
    created_by: String,
    created_by_role: String,
    created_at: DateTime<Utc>,
}

// -----------------------------------------------------------------------
// Enum round-trips
// -----------------------------------------------------------------------

fn target_to_columns(target: &OverrideTarget) -> (&'static str, Option<String>) {
    match target {
        OverrideTarget::Global => ("global", None),
        OverrideTarget::AllUsers => ("all_users", None),
        OverrideTarget::User(user_id) => ("user", Some(user_id.to_string())),
    }
}

fn parse_target(target_type: &str, target_user: Option<&str>) -> Result<OverrideTarget, DbError> {
    match target_type {
        "global" => Ok(OverrideTarget::Global),
        "all_users" => Ok(OverrideTarget::AllUsers),
        "user" => {
            let raw = target_user.ok_or_else(|| {
                DbError::Decode("user-targeted override without target_user".into())
            })?;
            Ok(OverrideTarget::User(parse_uuid(raw)?))
        }
        other => Err(DbError::Decode(format!("unknown target type: {other}"))),
    }
}

struct DateColumns {
    date_type: &'static str,
    start_date: String,
    end_date: Option<String>,
    recurring_pattern: Option<&'static str>,
    recurring_days: Option<Vec<u32>>,
}

fn dates_to_columns(dates: &OverrideDates) -> DateColumns {
    match dates {
        OverrideDates::Single(date) => DateColumns {
            date_type: "single",
            start_date: date.to_string(),
            end_date: None,
            recurring_pattern: None,
            recurring_days: None,
        },
        OverrideDates::Range { start, end } => DateColumns {
            date_type: "range",
            start_date: start.to_string(),
            end_date: Some(end.to_string()),
            recurring_pattern: None,
            recurring_days: None,
        },
        OverrideDates::Recurring {
            start,
            end,
            pattern,
        } => {
            let (recurring_pattern, recurring_days) = match pattern {
                RecurrencePattern::Daily => ("daily", None),
                RecurrencePattern::Weekly { weekdays } => ("weekly", Some(weekdays.clone())),
                RecurrencePattern::Monthly { month_days } => ("monthly", Some(month_days.clone())),
            };
            DateColumns {
                date_type: "recurring",
                start_date: start.to_string(),
                end_date: end.map(|d| d.to_string()),
                recurring_pattern: Some(recurring_pattern),
                recurring_days,
            }
        }
    }
}

fn parse_dates(
    date_type: &str,
    start_date: &str,
    end_date: Option<&str>,
    recurring_pattern: Option<&str>,
    recurring_days: Option<Vec<u32>>,
) -> Result<OverrideDates, DbError> {
    let start = parse_date(start_date)?;
    let end = end_date.map(parse_date).transpose()?;
    match date_type {
        "single" => Ok(OverrideDates::Single(start)),
        "range" => {
            let end = end
                .ok_or_else(|| DbError::Decode("range override without end_date".into()))?;
            Ok(OverrideDates::Range { start, end })
        }
        "recurring" => {
            let pattern = match recurring_pattern {
                Some("daily") => RecurrencePattern::Daily,
                Some("weekly") => RecurrencePattern::Weekly {
                    weekdays: recurring_days.unwrap_or_default(),
                },
                Some("monthly") => RecurrencePattern::Monthly {
                    month_days: recurring_days.unwrap_or_default(),
                },
                other => {
                    return Err(DbError::Decode(format!(
                        "unknown recurrence pattern: {other:?}"
                    )));
                }
            };
            Ok(OverrideDates::Recurring {
                start,
                end,
                pattern,
            })
        }
        other => Err(DbError::Decode(format!("unknown date type: {other}"))),
    }
}

fn scope_to_string(scope: MealScope) -> &'static str {
    match scope {
        MealScope::Lunch => "lunch",
        MealScope::Dinner => "dinner",
        MealScope::Both => "both",
    }
}

fn parse_scope(s: &str) -> Result<MealScope, DbError> {
    match s {
        "lunch" => Ok(MealScope::Lunch),
        "dinner" => Ok(MealScope::Dinner),
        "both" => Ok(MealScope::Both),
        other => Err(DbError::Decode(format!("unknown meal scope: {other}"))),
    }
}

fn action_to_string(action: OverrideAction) -> &'static str {
    match action {
        OverrideAction::ForceOn => "force_on",
        OverrideAction::ForceOff => "force_off",
    }
}

fn parse_action(s: &str) -> Result<OverrideAction, DbError> {
    match s {
        "force_on" => Ok(OverrideAction::ForceOn),
        "force_off" => Ok(OverrideAction::ForceOff),
        other => Err(DbError::Decode(format!("unknown action: {other}"))),
    }
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    s.parse()
        .map_err(|_| DbError::Decode(format!("unknown role: {s}")))
}

fn parse_priority(value: u8) -> Result<StatusPriority, DbError> {
    StatusPriority::from_u8(value)
        .ok_or_else(|| DbError::Decode(format!("invalid priority: {value}")))
}

impl OverrideRow {
    fn into_rule(self, id: Uuid) -> Result<RuleOverride, DbError> {
        Ok(RuleOverride {
            id,
            target: parse_target(&self.target_type, self.target_user.as_deref())?,
            dates: parse_dates(
                &self.date_type,
                &self.start_date,
                self.end_date.as_deref(),
                self.recurring_pattern.as_deref(),
                self.recurring_days,
            )?,
            meal_scope: parse_scope(&self.meal_scope)?,
            action: parse_action(&self.action)?,
            priority: parse_priority(self.priority)?,
            is_active: self.is_active,
            expires_at: self.expires_at,
            created_by: parse_uuid(&self.created_by)?,
            created_by_role: parse_role(&self.created_by_role)?,
            created_at: self.created_at,
        })
    }
}

impl OverrideRowWithId {
    fn try_into_rule(self) -> Result<RuleOverride, DbError> {
        let id = parse_uuid(&self.record_id)?;
        OverrideRow {
            target_type: self.target_type,
            target_user: self.target_user,
            date_type: self.date_type,
            start_date: self.start_date,
            end_date: self.end_date,
            recurring_pattern: self.recurring_pattern,
            recurring_days: self.recurring_days,
            meal_scope: self.meal_scope,
            action: self.action,
            priority: self.priority,
            is_active: self.is_active,
            expires_at: self.expires_at,
            created_by: self.created_by,
            created_by_role: self.created_by_role,
            created_at: self.created_at,
        }
        .into_rule(id)
    }
}

/// SurrealDB implementation of the override repository.
#[derive(Clone)]
pub struct SurrealOverrideRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOverrideRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OverrideRepository for SurrealOverrideRepository<C> {
    async fn create(&self, input: CreateRuleOverride) -> MealtrackResult<RuleOverride> {
        // Priority is derived from the creator's role, never accepted
        // from the caller; regular users cannot create overrides.
        let priority =
            input
                .created_by_role
                .override_priority()
                .ok_or(MealtrackError::Validation {
                    message: format!(
                        "role '{}' cannot create overrides",
                        input.created_by_role.as_str()
                    ),
                })?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let (target_type, target_user) = target_to_columns(&input.target);
        let dates = dates_to_columns(&input.dates);

        let result = self
            .db
            .query(
                "CREATE type::record('rule_override', $id) SET \
                 target_type = $target_type, \
                 target_user = $target_user, \
                 date_type = $date_type, \
                 start_date = $start_date, \
                 end_date = $end_date, \
                 recurring_pattern = $recurring_pattern, \
                 recurring_days = $recurring_days, \
                 meal_scope = $meal_scope, \
                 action = $action, \
                 priority = $priority, \
                 expires_at = $expires_at, \
                 created_by = $created_by, \
                 created_by_role = $created_by_role",
            )
            .bind(("id", id_str.clone()))
            .bind(("target_type", target_type.to_string()))
            .bind(("target_user", target_user))
            .bind(("date_type", dates.date_type.to_string()))
            .bind(("start_date", dates.start_date))
            .bind(("end_date", dates.end_date))
            .bind(("recurring_pattern", dates.recurring_pattern.map(str::to_string)))
            .bind(("recurring_days", dates.recurring_days))
            .bind(("meal_scope", scope_to_string(input.meal_scope).to_string()))
            .bind(("action", action_to_string(input.action).to_string()))
            .bind(("priority", priority.as_u8()))
            .bind(("expires_at", input.expires_at))
            .bind(("created_by", input.created_by.to_string()))
            .bind(("created_by_role", input.created_by_role.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;
        let rows: Vec<OverrideRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "rule_override".into(),
            id: id_str,
        })?;

        Ok(row.into_rule(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> MealtrackResult<RuleOverride> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('rule_override', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OverrideRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "rule_override".into(),
            id: id_str,
        })?;

        Ok(row.into_rule(id)?)
    }

    async fn find_candidates(
        &self,
        user_id: Uuid,
        meal_type: MealType,
        now: DateTime<Utc>,
    ) -> MealtrackResult<Vec<RuleOverride>> {
        let scopes: Vec<String> = vec![meal_type.as_str().into(), "both".into()];

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM rule_override \
                 WHERE is_active = true \
                 AND meal_scope IN $scopes \
                 AND (expires_at = NONE OR expires_at > $now) \
                 AND (target_type = 'global' \
                      OR target_type = 'all_users' \
                      OR (target_type = 'user' AND target_user = $user_id)) \
                 ORDER BY priority DESC, created_at DESC",
            )
            .bind(("scopes", scopes))
            .bind(("now", now))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OverrideRowWithId> = result.take(0).map_err(DbError::from)?;
        let rules = rows
            .into_iter()
            .map(OverrideRowWithId::try_into_rule)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(rules)
    }

    async fn update(&self, id: Uuid, input: UpdateRuleOverride) -> MealtrackResult<RuleOverride> {
        let id_str = id.to_string();

        // Priority, creator, and creation time are immutable: there is
        // deliberately no way to SET them here.
        let mut sets = Vec::new();
        if input.dates.is_some() {
            sets.push(
                "date_type = $date_type, start_date = $start_date, \
                 end_date = $end_date, \
                 recurring_pattern = $recurring_pattern, \
                 recurring_days = $recurring_days",
            );
        }
        if input.meal_scope.is_some() {
            sets.push("meal_scope = $meal_scope");
        }
        if input.action.is_some() {
            sets.push("action = $action");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        if input.expires_at.is_some() {
            sets.push("expires_at = $expires_at");
        }

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE type::record('rule_override', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(ref dates) = input.dates {
            let columns = dates_to_columns(dates);
            builder = builder
                .bind(("date_type", columns.date_type.to_string()))
                .bind(("start_date", columns.start_date))
                .bind(("end_date", columns.end_date))
                .bind(("recurring_pattern", columns.recurring_pattern.map(str::to_string)))
                .bind(("recurring_days", columns.recurring_days));
        }
        if let Some(meal_scope) = input.meal_scope {
            builder = builder.bind(("meal_scope", scope_to_string(meal_scope).to_string()));
        }
        if let Some(action) = input.action {
            builder = builder.bind(("action", action_to_string(action).to_string()));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }
        if let Some(expires_at) = input.expires_at {
            // Option<Option<..>>: Some(Some(t)) = set, Some(None) = clear.
            builder = builder.bind(("expires_at", expires_at));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<OverrideRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "rule_override".into(),
            id: id_str,
        })?;

        Ok(row.into_rule(id)?)
    }

    async fn deactivate(&self, id: Uuid) -> MealtrackResult<()> {
        self.db
            .query(
                "UPDATE type::record('rule_override', $id) SET \
                 is_active = false",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
