//! Permission/cutoff gate.
//!
//! Decides whether an actor may change a meal status for a target
//! date. Denial is a normal result value, never an error: callers
//! branch on `can_toggle` and surface `reason` themselves.
//!
//! Decision order is binding: superadmin bypass first (before even
//! the finalized-month check), then the finalized-month lock for
//! non-admins, then role-specific date rules. Cutoff hours apply only
//! to regular users editing today's date.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use mealtrack_core::calendar;
use mealtrack_core::error::MealtrackResult;
use mealtrack_core::models::meal::MealType;
use mealtrack_core::models::month::MonthSettings;
use mealtrack_core::models::role::Role;
use mealtrack_core::models::settings::GlobalSettings;
use mealtrack_core::repository::{MonthSettingsRepository, SettingsRepository};

/// A request to toggle one meal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub user_id: Uuid,
    pub role: Role,
    pub date: NaiveDate,
    pub meal_type: MealType,
}

/// Which rule produced the gate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionSource {
    Superadmin,
    MonthFinalized,
    PastDate,
    CutoffPassed,
    BeforeCutoff,
    FutureDate,
    NotCurrentMonth,
    CurrentMonth,
    Admin,
}

/// The gate verdict. `reason` is required for audit/display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TogglePermission {
    pub can_toggle: bool,
    pub reason: String,
    pub source: PermissionSource,
}

impl TogglePermission {
    fn allowed(reason: impl Into<String>, source: PermissionSource) -> Self {
        Self {
            can_toggle: true,
            reason: reason.into(),
            source,
        }
    }

    fn denied(reason: impl Into<String>, source: PermissionSource) -> Self {
        Self {
            can_toggle: false,
            reason: reason.into(),
            source,
        }
    }
}

/// Evaluate the gate from already-loaded inputs.
///
/// `target_month` is the month settings for the request date's month
/// (finalization lock); `current_month` is for today's month (the
/// manager editing window). Either may be absent, in which case
/// calendar-month boundaries apply.
pub fn evaluate_toggle_permission(
    request: &ToggleRequest,
    settings: &GlobalSettings,
    target_month: Option<&MonthSettings>,
    current_month: Option<&MonthSettings>,
    now: DateTime<Utc>,
) -> TogglePermission {
    // 1. Superadmin short-circuits every other check.
    if request.role == Role::SuperAdmin {
        return TogglePermission::allowed("superadmin access", PermissionSource::Superadmin);
    }

    // 2. Finalized month locks out everyone below admin.
    if !request.role.is_admin() && target_month.is_some_and(|m| m.is_finalized) {
        return TogglePermission::denied(
            "month is finalized",
            PermissionSource::MonthFinalized,
        );
    }

    let today = calendar::today_in_bd(now);

    match request.role {
        // 3. Regular users: past locked, today gated by cutoff hour,
        //    future open.
        Role::User => {
            if request.date < today {
                return TogglePermission::denied(
                    "cannot change a past date",
                    PermissionSource::PastDate,
                );
            }
            if request.date == today {
                let cutoff = settings.cutoff_times.for_meal(request.meal_type);
                if calendar::bd_hour(now) >= cutoff {
                    return TogglePermission::denied(
                        format!("{} cutoff time ({cutoff}:00) has passed", request.meal_type),
                        PermissionSource::CutoffPassed,
                    );
                }
                return TogglePermission::allowed(
                    "before cutoff time",
                    PermissionSource::BeforeCutoff,
                );
            }
            TogglePermission::allowed("future date", PermissionSource::FutureDate)
        }

        // 4. Managers: current month window only. Exempt from cutoff
        //    hours, bound by the window.
        Role::Manager => {
            let (start, end) = match current_month {
                Some(m) => (m.start_date, m.end_date),
                None => calendar::month_window(today),
            };
            if start <= request.date && request.date <= end {
                TogglePermission::allowed(
                    "within current month",
                    PermissionSource::CurrentMonth,
                )
            } else {
                TogglePermission::denied(
                    "manager can only edit the current month",
                    PermissionSource::NotCurrentMonth,
                )
            }
        }

        // 5. Admins: unconditional once past the finalized check.
        //    Superadmin already returned above.
        Role::Admin | Role::SuperAdmin => {
            TogglePermission::allowed("admin access", PermissionSource::Admin)
        }
    }
}

/// Permission gate service.
///
/// Consulted before any status-changing mutation is accepted; the
/// write itself remains the caller's responsibility.
pub struct GateService<S, N> {
    settings_repo: S,
    month_repo: N,
}

impl<S, N> GateService<S, N>
where
    S: SettingsRepository,
    N: MonthSettingsRepository,
{
    pub fn new(settings_repo: S, month_repo: N) -> Self {
        Self {
            settings_repo,
            month_repo,
        }
    }

    /// Whether the actor may toggle the meal status for the request's
    /// date and meal type, right now.
    pub async fn meal_toggle_permission(
        &self,
        request: ToggleRequest,
    ) -> MealtrackResult<TogglePermission> {
        let now = Utc::now();

        // 1. Fresh policy inputs.
        let settings = self.settings_repo.get().await?;
        let target_month = self
            .month_repo
            .find(request.date.year(), request.date.month())
            .await?;

        // 2. The manager window is anchored to *today's* month, which
        //    may differ from the request date's month.
        let today = calendar::today_in_bd(now);
        let current_month = if (today.year(), today.month())
            == (request.date.year(), request.date.month())
        {
            target_month.clone()
        } else {
            self.month_repo.find(today.year(), today.month()).await?
        };

        let permission = evaluate_toggle_permission(
            &request,
            &settings,
            target_month.as_ref(),
            current_month.as_ref(),
            now,
        );

        debug!(
            user_id = %request.user_id,
            role = request.role.as_str(),
            date = %request.date,
            can_toggle = permission.can_toggle,
            source = ?permission.source,
            "Evaluated toggle permission"
        );

        Ok(permission)
    }
}
