use chrono::{Datelike, NaiveDate, Weekday};
use sqlx::PgPool;
use tracing::{debug, error, info, instrument};

use sproutplan_cache::RedisCache;
use sproutplan_core::{AppError, PaginationMeta};
use sproutplan_models::{
    ApproveLessonPlanDto, CopyConflict, CopyLessonPlanDto, CopyLessonPlanResponse, LessonPlan,
    LessonPlanFilterParams, LessonPlanId, LessonPlanWithActivities, LocationId,
    PaginatedLessonPlansResponse, PlanStatus, RejectLessonPlanDto, RoomId, ScheduledActivity,
    SubmitLessonPlanDto, TenantId, UserId,
};

use crate::modules::notifications::service::NotificationService;
use crate::modules::permissions::service::PermissionService;

const PLAN_COLUMNS: &str = "id, tenant_id, location_id, room_id, teacher_id, week_start, \
     schedule_type, status, submitted_at, submitted_by, approved_at, approved_by, \
     rejected_at, rejected_by, review_notes, created_at, updated_at";

/// Lesson plan workflow operations.
///
/// Callers resolve tenancy and check permissions before calling in; the
/// service enforces plan state rules and owns the status transitions. A
/// `None` tenant on the review operations means an unfiltered cross-tenant
/// access, which only superadmins reach.
pub struct LessonPlanService;

impl LessonPlanService {
    /// Submit a room's weekly plan for review.
    ///
    /// Creates the plan row on first submission and reuses it afterwards,
    /// which makes resubmitting a rejected plan the same call as submitting
    /// a fresh one. The submitter's role decides whether the plan lands as
    /// `submitted` or skips review and lands as `approved`.
    #[instrument(skip(db, cache, dto), fields(room.id = %dto.room_id, week = %dto.week_start))]
    pub async fn submit_plan(
        db: &PgPool,
        cache: Option<&RedisCache>,
        tenant_id: TenantId,
        actor: UserId,
        role_name: &str,
        dto: SubmitLessonPlanDto,
    ) -> Result<LessonPlan, AppError> {
        Self::ensure_monday(dto.week_start, "week_start")?;

        let location_id = Self::room_location(db, tenant_id, dto.room_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Room not found")))?;

        if location_id != dto.location_id {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Room does not belong to the specified location"
            )));
        }

        let auto_approve =
            PermissionService::should_auto_approve(db, cache, tenant_id, role_name).await?;
        let status = if auto_approve {
            PlanStatus::Approved
        } else {
            PlanStatus::Submitted
        };

        debug!(
            tenant.id = %tenant_id,
            user.id = %actor,
            status = %status,
            "Submitting lesson plan"
        );

        // One statement covers first submission and resubmission: the row is
        // keyed by (room, week, schedule type), and a conflict means we are
        // re-submitting, which resets the previous review outcome. The
        // original owner keeps the plan on resubmission.
        let plan = sqlx::query_as::<_, LessonPlan>(&format!(
            r#"INSERT INTO lesson_plans
               (tenant_id, location_id, room_id, teacher_id, week_start, schedule_type, status,
                submitted_at, submitted_by, approved_at, approved_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), $8,
                       CASE WHEN $7 = 'approved' THEN NOW() END,
                       CASE WHEN $7 = 'approved' THEN $8 END)
               ON CONFLICT ON CONSTRAINT lesson_plans_room_week_schedule_key
               DO UPDATE SET
                   status = EXCLUDED.status,
                   submitted_at = EXCLUDED.submitted_at,
                   submitted_by = EXCLUDED.submitted_by,
                   approved_at = EXCLUDED.approved_at,
                   approved_by = EXCLUDED.approved_by,
                   rejected_at = NULL,
                   rejected_by = NULL,
                   review_notes = NULL,
                   updated_at = NOW()
               RETURNING {}"#,
            PLAN_COLUMNS
        ))
        .bind(tenant_id)
        .bind(dto.location_id)
        .bind(dto.room_id)
        .bind(actor)
        .bind(dto.week_start)
        .bind(dto.schedule_type)
        .bind(status)
        .bind(actor)
        .fetch_one(db)
        .await
        .map_err(|e| {
            error!(error = %e, room.id = %dto.room_id, "Database error submitting lesson plan");
            AppError::from(e)
        })?;

        crate::metrics::track_plan_submitted(auto_approve);

        info!(
            plan.id = %plan.id,
            plan.status = %plan.status,
            user.id = %actor,
            "Lesson plan submitted"
        );

        Ok(plan)
    }

    /// Approve a plan that is waiting for review.
    ///
    /// A rejected plan can also be approved directly, which lets a reviewer
    /// reverse a rejection without a resubmission round-trip.
    #[instrument(skip(db, dto))]
    pub async fn approve_plan(
        db: &PgPool,
        tenant_id: Option<TenantId>,
        reviewer: UserId,
        plan_id: LessonPlanId,
        dto: ApproveLessonPlanDto,
    ) -> Result<LessonPlan, AppError> {
        let plan = Self::fetch_plan(db, tenant_id, plan_id).await?;

        if !matches!(plan.status, PlanStatus::Submitted | PlanStatus::Rejected) {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Only submitted or rejected plans can be approved"
            )));
        }

        let notes = dto
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let plan = sqlx::query_as::<_, LessonPlan>(&format!(
            r#"UPDATE lesson_plans
               SET status = 'approved', approved_at = NOW(), approved_by = $1,
                   rejected_at = NULL, rejected_by = NULL, review_notes = $2, updated_at = NOW()
               WHERE id = $3
               RETURNING {}"#,
            PLAN_COLUMNS
        ))
        .bind(reviewer)
        .bind(notes)
        .bind(plan.id)
        .fetch_one(db)
        .await?;

        crate::metrics::track_plan_approved();

        info!(
            plan.id = %plan.id,
            user.id = %reviewer,
            "Lesson plan approved"
        );

        Ok(plan)
    }

    /// Reject a submitted plan with reviewer notes.
    ///
    /// The notes are required: a returned plan without an explanation is
    /// useless to the submitter. The rejection and the notification it
    /// produces commit together.
    #[instrument(skip(db, dto))]
    pub async fn reject_plan(
        db: &PgPool,
        tenant_id: Option<TenantId>,
        reviewer: UserId,
        plan_id: LessonPlanId,
        dto: RejectLessonPlanDto,
    ) -> Result<LessonPlan, AppError> {
        let notes = dto.notes.trim();
        if notes.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Review notes are required when rejecting"
            )));
        }

        let mut tx = db.begin().await?;

        let mut query = format!("SELECT {} FROM lesson_plans WHERE id = $1", PLAN_COLUMNS);
        if tenant_id.is_some() {
            query.push_str(" AND tenant_id = $2");
        }
        query.push_str(" FOR UPDATE");

        let mut sql = sqlx::query_as::<_, LessonPlan>(&query).bind(plan_id);
        if let Some(tenant_id) = tenant_id {
            sql = sql.bind(tenant_id);
        }
        let plan = sql
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lesson plan not found")))?;

        if plan.status != PlanStatus::Submitted {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Only submitted plans can be rejected"
            )));
        }

        let plan = sqlx::query_as::<_, LessonPlan>(&format!(
            r#"UPDATE lesson_plans
               SET status = 'rejected', rejected_at = NOW(), rejected_by = $1,
                   approved_at = NULL, approved_by = NULL, review_notes = $2, updated_at = NOW()
               WHERE id = $3
               RETURNING {}"#,
            PLAN_COLUMNS
        ))
        .bind(reviewer)
        .bind(notes)
        .bind(plan.id)
        .fetch_one(&mut *tx)
        .await?;

        // The plan goes back to whoever submitted it
        let recipient = plan.submitted_by.unwrap_or(plan.teacher_id);
        NotificationService::create_lesson_plan_returned(&mut tx, &plan, recipient, notes).await?;

        tx.commit().await?;

        crate::metrics::track_plan_rejected();

        info!(
            plan.id = %plan.id,
            user.id = %reviewer,
            recipient.id = %recipient,
            "Lesson plan rejected"
        );

        Ok(plan)
    }

    /// Copy a plan's structure into other rooms for a given week.
    ///
    /// Each target room gets a fresh draft owned by the caller, with the
    /// source's activities minus their classroom outcomes (completion flags
    /// and ratings). Rooms that already have a plan in the target slot are
    /// reported as conflicts instead of failing the whole batch. Copies
    /// always land in the source plan's tenant.
    #[instrument(skip(db, dto), fields(targets = dto.target_room_ids.len()))]
    pub async fn copy_plan(
        db: &PgPool,
        tenant_id: Option<TenantId>,
        actor: UserId,
        plan_id: LessonPlanId,
        dto: CopyLessonPlanDto,
    ) -> Result<CopyLessonPlanResponse, AppError> {
        Self::ensure_monday(dto.target_week_start, "target_week_start")?;

        let mut tx = db.begin().await?;

        let mut query = format!("SELECT {} FROM lesson_plans WHERE id = $1", PLAN_COLUMNS);
        if tenant_id.is_some() {
            query.push_str(" AND tenant_id = $2");
        }
        let mut sql = sqlx::query_as::<_, LessonPlan>(&query).bind(plan_id);
        if let Some(tenant_id) = tenant_id {
            sql = sql.bind(tenant_id);
        }
        let source = sql
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lesson plan not found")))?;

        let mut created = Vec::new();
        let mut conflicts = Vec::new();

        for room_id in dto.target_room_ids {
            let Some(location_id) = sqlx::query_scalar::<_, LocationId>(
                "SELECT location_id FROM rooms WHERE id = $1 AND tenant_id = $2",
            )
            .bind(room_id)
            .bind(source.tenant_id)
            .fetch_optional(&mut *tx)
            .await?
            else {
                conflicts.push(CopyConflict {
                    room_id,
                    reason: "Room not found in this tenant".to_string(),
                });
                continue;
            };

            let copy = sqlx::query_as::<_, LessonPlan>(&format!(
                r#"INSERT INTO lesson_plans
                   (tenant_id, location_id, room_id, teacher_id, week_start, schedule_type, status)
                   VALUES ($1, $2, $3, $4, $5, $6, 'draft')
                   ON CONFLICT ON CONSTRAINT lesson_plans_room_week_schedule_key DO NOTHING
                   RETURNING {}"#,
                PLAN_COLUMNS
            ))
            .bind(source.tenant_id)
            .bind(location_id)
            .bind(room_id)
            .bind(actor)
            .bind(dto.target_week_start)
            .bind(source.schedule_type)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(copy) = copy else {
                conflicts.push(CopyConflict {
                    room_id,
                    reason: "A plan already exists for this room and week".to_string(),
                });
                continue;
            };

            // Copy the activity structure; completion flags and ratings stay
            // behind with the source
            sqlx::query(
                r#"INSERT INTO scheduled_activities
                   (lesson_plan_id, day_of_week, position, start_time, end_time, title, category, description)
                   SELECT $1, day_of_week, position, start_time, end_time, title, category, description
                   FROM scheduled_activities WHERE lesson_plan_id = $2"#,
            )
            .bind(copy.id)
            .bind(source.id)
            .execute(&mut *tx)
            .await?;

            created.push(copy);
        }

        tx.commit().await?;

        crate::metrics::track_plan_copied(created.len(), conflicts.len());

        info!(
            plan.id = %source.id,
            created = created.len(),
            conflicts = conflicts.len(),
            "Lesson plan copied"
        );

        Ok(CopyLessonPlanResponse { created, conflicts })
    }

    /// List plans, filtered and paginated. A `None` tenant means a
    /// cross-tenant read.
    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "lesson_plans"))]
    pub async fn get_lesson_plans(
        db: &PgPool,
        tenant_id: Option<TenantId>,
        filters: LessonPlanFilterParams,
    ) -> Result<PaginatedLessonPlansResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        debug!(
            limit = %limit,
            offset = %offset,
            filter.week_start = ?filters.week_start,
            filter.status = ?filters.status,
            "Fetching lesson plans"
        );

        let mut where_clause = String::from(" WHERE 1=1");
        let mut idx = 0;
        if tenant_id.is_some() {
            idx += 1;
            where_clause.push_str(&format!(" AND tenant_id = ${}", idx));
        }
        if filters.week_start.is_some() {
            idx += 1;
            where_clause.push_str(&format!(" AND week_start = ${}", idx));
        }
        if filters.location_id.is_some() {
            idx += 1;
            where_clause.push_str(&format!(" AND location_id = ${}", idx));
        }
        if filters.room_id.is_some() {
            idx += 1;
            where_clause.push_str(&format!(" AND room_id = ${}", idx));
        }
        if filters.status.is_some() {
            idx += 1;
            where_clause.push_str(&format!(" AND status = ${}", idx));
        }

        let count_query = format!("SELECT COUNT(*) FROM lesson_plans{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(tenant_id) = tenant_id {
            count_sql = count_sql.bind(tenant_id);
        }
        if let Some(week_start) = filters.week_start {
            count_sql = count_sql.bind(week_start);
        }
        if let Some(location_id) = filters.location_id {
            count_sql = count_sql.bind(location_id);
        }
        if let Some(room_id) = filters.room_id {
            count_sql = count_sql.bind(room_id);
        }
        if let Some(status) = filters.status {
            count_sql = count_sql.bind(status);
        }
        let total = count_sql.fetch_one(db).await.map_err(|e| {
            error!(error = %e, "Database error counting lesson plans");
            AppError::from(e)
        })?;

        let data_query = format!(
            "SELECT {} FROM lesson_plans{} ORDER BY week_start DESC, created_at DESC LIMIT {} OFFSET {}",
            PLAN_COLUMNS, where_clause, limit, offset
        );
        let mut data_sql = sqlx::query_as::<_, LessonPlan>(&data_query);
        if let Some(tenant_id) = tenant_id {
            data_sql = data_sql.bind(tenant_id);
        }
        if let Some(week_start) = filters.week_start {
            data_sql = data_sql.bind(week_start);
        }
        if let Some(location_id) = filters.location_id {
            data_sql = data_sql.bind(location_id);
        }
        if let Some(room_id) = filters.room_id {
            data_sql = data_sql.bind(room_id);
        }
        if let Some(status) = filters.status {
            data_sql = data_sql.bind(status);
        }
        let plans = data_sql.fetch_all(db).await.map_err(|e| {
            error!(error = %e, "Database error fetching lesson plans");
            AppError::from(e)
        })?;

        let has_more = offset + limit < total;

        Ok(PaginatedLessonPlansResponse {
            data: plans,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                page: filters.pagination.page(),
                has_more,
            },
        })
    }

    /// Fetch one plan with its activities in schedule order.
    #[instrument(skip(db))]
    pub async fn get_plan_with_activities(
        db: &PgPool,
        tenant_id: Option<TenantId>,
        plan_id: LessonPlanId,
    ) -> Result<LessonPlanWithActivities, AppError> {
        let plan = Self::fetch_plan(db, tenant_id, plan_id).await?;

        let activities = sqlx::query_as::<_, ScheduledActivity>(
            r#"SELECT id, lesson_plan_id, day_of_week, position, start_time, end_time,
                      title, category, description, is_completed, rating, created_at, updated_at
               FROM scheduled_activities
               WHERE lesson_plan_id = $1
               ORDER BY day_of_week, position, start_time"#,
        )
        .bind(plan.id)
        .fetch_all(db)
        .await?;

        Ok(LessonPlanWithActivities { plan, activities })
    }

    fn ensure_monday(date: NaiveDate, field: &str) -> Result<(), AppError> {
        if date.weekday() != Weekday::Mon {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "{} must be a Monday",
                field
            )));
        }
        Ok(())
    }

    async fn room_location(
        db: &PgPool,
        tenant_id: TenantId,
        room_id: RoomId,
    ) -> Result<Option<LocationId>, AppError> {
        let location_id = sqlx::query_scalar::<_, LocationId>(
            "SELECT location_id FROM rooms WHERE id = $1 AND tenant_id = $2",
        )
        .bind(room_id)
        .bind(tenant_id)
        .fetch_optional(db)
        .await?;

        Ok(location_id)
    }

    async fn fetch_plan(
        db: &PgPool,
        tenant_id: Option<TenantId>,
        plan_id: LessonPlanId,
    ) -> Result<LessonPlan, AppError> {
        let mut query = format!("SELECT {} FROM lesson_plans WHERE id = $1", PLAN_COLUMNS);
        if tenant_id.is_some() {
            query.push_str(" AND tenant_id = $2");
        }

        let mut sql = sqlx::query_as::<_, LessonPlan>(&query).bind(plan_id);
        if let Some(tenant_id) = tenant_id {
            sql = sql.bind(tenant_id);
        }

        sql.fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lesson plan not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use sproutplan_core::PaginationParams;
    use sproutplan_models::ScheduleType;
    use uuid::Uuid;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 18).unwrap()
    }

    fn next_monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()
    }

    async fn create_test_tenant(pool: &PgPool) -> TenantId {
        sqlx::query_scalar::<_, TenantId>(r#"INSERT INTO tenants (name) VALUES ($1) RETURNING id"#)
            .bind(format!("Tenant {}", Uuid::new_v4()))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn create_test_user(pool: &PgPool, tenant_id: TenantId, role: &str) -> UserId {
        sqlx::query_scalar::<_, UserId>(
            r#"INSERT INTO users (tenant_id, first_name, last_name, email, role)
               VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
        )
        .bind(tenant_id)
        .bind("Test")
        .bind("User")
        .bind(format!("user-{}@example.com", Uuid::new_v4()))
        .bind(role)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn create_test_room(pool: &PgPool, tenant_id: TenantId) -> (LocationId, RoomId) {
        let location_id = sqlx::query_scalar::<_, LocationId>(
            r#"INSERT INTO locations (tenant_id, name) VALUES ($1, $2) RETURNING id"#,
        )
        .bind(tenant_id)
        .bind(format!("Location {}", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap();

        let room_id = sqlx::query_scalar::<_, RoomId>(
            r#"INSERT INTO rooms (tenant_id, location_id, name) VALUES ($1, $2, $3) RETURNING id"#,
        )
        .bind(tenant_id)
        .bind(location_id)
        .bind(format!("Room {}", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap();

        (location_id, room_id)
    }

    fn submit_dto(
        location_id: LocationId,
        room_id: RoomId,
        week_start: NaiveDate,
    ) -> SubmitLessonPlanDto {
        SubmitLessonPlanDto {
            tenant_id: None,
            location_id,
            room_id,
            week_start,
            schedule_type: ScheduleType::PositionBased,
        }
    }

    async fn add_activity(
        pool: &PgPool,
        plan_id: LessonPlanId,
        day: i16,
        position: i16,
        completed: bool,
    ) {
        sqlx::query(
            r#"INSERT INTO scheduled_activities
               (lesson_plan_id, day_of_week, position, title, is_completed, rating)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(plan_id)
        .bind(day)
        .bind(position)
        .bind(format!("Activity {}", position))
        .bind(completed)
        .bind(if completed { Some(4i16) } else { None })
        .execute(pool)
        .await
        .unwrap();
    }

    async fn set_tenant_override(
        pool: &PgPool,
        tenant_id: TenantId,
        permission: &str,
        roles_required: &[&str],
        auto_approve_roles: &[&str],
    ) {
        let required: Vec<String> = roles_required.iter().map(|s| s.to_string()).collect();
        let auto: Vec<String> = auto_approve_roles.iter().map(|s| s.to_string()).collect();
        sqlx::query(
            r#"INSERT INTO permission_overrides (tenant_id, permission_name, roles_required, auto_approve_roles)
               VALUES ($1, $2, $3, $4)"#,
        )
        .bind(tenant_id)
        .bind(permission)
        .bind(required)
        .bind(auto)
        .execute(pool)
        .await
        .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_submit_teacher_lands_in_review(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        let plan = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();

        assert_eq!(plan.status, PlanStatus::Submitted);
        assert_eq!(plan.submitted_by, Some(teacher));
        assert_eq!(plan.teacher_id, teacher);
        assert!(plan.submitted_at.is_some());
        assert!(plan.approved_at.is_none());
        assert!(plan.rejected_at.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_submit_director_auto_approves(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let director = create_test_user(&pool, tenant_id, "director").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        let plan = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            director,
            "director",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();

        assert_eq!(plan.status, PlanStatus::Approved);
        assert_eq!(plan.approved_by, Some(director));
        assert!(plan.approved_at.is_some());

        // Auto-approval bypasses review entirely, so nothing is delivered
        let notification_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(notification_count, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_submit_requires_monday(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        let tuesday = NaiveDate::from_ymd_opt(2025, 8, 19).unwrap();
        let result = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, tuesday),
        )
        .await;

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.error.to_string().contains("Monday"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_submit_foreign_room_not_found(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let other_tenant = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let (location_id, room_id) = create_test_room(&pool, other_tenant).await;

        let result = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_resubmit_clears_rejection_audit(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let director = create_test_user(&pool, tenant_id, "director").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        let plan = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();

        LessonPlanService::reject_plan(
            &pool,
            Some(tenant_id),
            director,
            plan.id,
            RejectLessonPlanDto {
                notes: "Too little outdoor time".to_string(),
            },
        )
        .await
        .unwrap();

        let resubmitted = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();

        assert_eq!(resubmitted.id, plan.id);
        assert_eq!(resubmitted.status, PlanStatus::Submitted);
        assert!(resubmitted.rejected_at.is_none());
        assert!(resubmitted.rejected_by.is_none());
        assert!(resubmitted.review_notes.is_none());
        assert_eq!(resubmitted.teacher_id, teacher);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_reject_requires_notes(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let director = create_test_user(&pool, tenant_id, "director").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        let plan = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();

        let result = LessonPlanService::reject_plan(
            &pool,
            Some(tenant_id),
            director,
            plan.id,
            RejectLessonPlanDto {
                notes: "   ".to_string(),
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::BAD_REQUEST);

        // The plan is untouched
        let status =
            sqlx::query_scalar::<_, PlanStatus>("SELECT status FROM lesson_plans WHERE id = $1")
                .bind(plan.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, PlanStatus::Submitted);

        let notification_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE lesson_plan_id = $1",
        )
        .bind(plan.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(notification_count, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_reject_stores_notes_and_notifies_submitter(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let director = create_test_user(&pool, tenant_id, "director").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        let plan = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();

        let rejected = LessonPlanService::reject_plan(
            &pool,
            Some(tenant_id),
            director,
            plan.id,
            RejectLessonPlanDto {
                notes: "Please add a music activity".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(rejected.status, PlanStatus::Rejected);
        assert_eq!(rejected.rejected_by, Some(director));
        assert_eq!(
            rejected.review_notes.as_deref(),
            Some("Please add a music activity")
        );

        let notifications = sqlx::query_as::<_, sproutplan_models::Notification>(
            r#"SELECT id, tenant_id, user_id, notification_type, lesson_plan_id, week_start,
                      title, message, review_notes, is_read, is_dismissed, created_at
               FROM notifications WHERE lesson_plan_id = $1"#,
        )
        .bind(plan.id)
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(notifications.len(), 1);
        let notification = &notifications[0];
        assert_eq!(notification.user_id, teacher);
        assert_eq!(notification.notification_type, "lesson_plan_returned");
        assert_eq!(notification.week_start, Some(monday()));
        assert_eq!(
            notification.review_notes.as_deref(),
            Some("Please add a music activity")
        );
        assert!(!notification.is_read);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_approve_submitted_plan(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let director = create_test_user(&pool, tenant_id, "director").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        let plan = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();

        let approved = LessonPlanService::approve_plan(
            &pool,
            Some(tenant_id),
            director,
            plan.id,
            ApproveLessonPlanDto {
                notes: Some("Looks great".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(approved.status, PlanStatus::Approved);
        assert_eq!(approved.approved_by, Some(director));
        assert_eq!(approved.review_notes.as_deref(), Some("Looks great"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_approve_reverses_rejection(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let director = create_test_user(&pool, tenant_id, "director").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        let plan = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();

        LessonPlanService::reject_plan(
            &pool,
            Some(tenant_id),
            director,
            plan.id,
            RejectLessonPlanDto {
                notes: "Second thoughts".to_string(),
            },
        )
        .await
        .unwrap();

        // Cross-tenant reviewer path uses no tenant filter
        let approved = LessonPlanService::approve_plan(
            &pool,
            None,
            director,
            plan.id,
            ApproveLessonPlanDto { notes: None },
        )
        .await
        .unwrap();

        assert_eq!(approved.status, PlanStatus::Approved);
        assert!(approved.rejected_at.is_none());
        assert!(approved.rejected_by.is_none());
        assert!(approved.review_notes.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_reject_approved_plan_conflicts(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let director = create_test_user(&pool, tenant_id, "director").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        // Director submissions auto-approve
        let plan = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            director,
            "director",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();
        assert_eq!(plan.status, PlanStatus::Approved);

        let result = LessonPlanService::reject_plan(
            &pool,
            Some(tenant_id),
            director,
            plan.id,
            RejectLessonPlanDto {
                notes: "Too late".to_string(),
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::CONFLICT);

        let status =
            sqlx::query_scalar::<_, PlanStatus>("SELECT status FROM lesson_plans WHERE id = $1")
                .bind(plan.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, PlanStatus::Approved);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_approve_draft_conflicts(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let director = create_test_user(&pool, tenant_id, "director").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        let plan_id = sqlx::query_scalar::<_, LessonPlanId>(
            r#"INSERT INTO lesson_plans (tenant_id, location_id, room_id, teacher_id, week_start, schedule_type)
               VALUES ($1, $2, $3, $4, $5, 'position-based') RETURNING id"#,
        )
        .bind(tenant_id)
        .bind(location_id)
        .bind(room_id)
        .bind(teacher)
        .bind(monday())
        .fetch_one(&pool)
        .await
        .unwrap();

        let result = LessonPlanService::approve_plan(
            &pool,
            Some(tenant_id),
            director,
            plan_id,
            ApproveLessonPlanDto { notes: None },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_copy_creates_drafts_and_reports_conflicts(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let director = create_test_user(&pool, tenant_id, "director").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;
        let (_, target_a) = create_test_room(&pool, tenant_id).await;
        let (target_b_location, target_b) = create_test_room(&pool, tenant_id).await;

        let source = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();
        add_activity(&pool, source.id, 0, 1, true).await;
        add_activity(&pool, source.id, 2, 1, false).await;

        // target_b already has a plan in the target slot
        sqlx::query(
            r#"INSERT INTO lesson_plans (tenant_id, location_id, room_id, teacher_id, week_start, schedule_type)
               VALUES ($1, $2, $3, $4, $5, 'position-based')"#,
        )
        .bind(tenant_id)
        .bind(target_b_location)
        .bind(target_b)
        .bind(teacher)
        .bind(next_monday())
        .execute(&pool)
        .await
        .unwrap();

        let result = LessonPlanService::copy_plan(
            &pool,
            Some(tenant_id),
            director,
            source.id,
            CopyLessonPlanDto {
                target_room_ids: vec![target_a, target_b],
                target_week_start: next_monday(),
            },
        )
        .await
        .unwrap();

        assert_eq!(result.created.len(), 1);
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(result.conflicts[0].room_id, target_b);

        let copy = &result.created[0];
        assert_eq!(copy.status, PlanStatus::Draft);
        assert_eq!(copy.teacher_id, director);
        assert_eq!(copy.room_id, target_a);
        assert_eq!(copy.week_start, next_monday());
        assert!(copy.submitted_at.is_none());

        let activities = sqlx::query_as::<_, ScheduledActivity>(
            r#"SELECT id, lesson_plan_id, day_of_week, position, start_time, end_time,
                      title, category, description, is_completed, rating, created_at, updated_at
               FROM scheduled_activities WHERE lesson_plan_id = $1 ORDER BY day_of_week"#,
        )
        .bind(copy.id)
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(activities.len(), 2);
        assert!(activities.iter().all(|a| !a.is_completed));
        assert!(activities.iter().all(|a| a.rating.is_none()));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_copy_requires_monday_target(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;
        let (_, target) = create_test_room(&pool, tenant_id).await;

        let source = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();

        let friday = NaiveDate::from_ymd_opt(2025, 8, 22).unwrap();
        let result = LessonPlanService::copy_plan(
            &pool,
            Some(tenant_id),
            teacher,
            source.id,
            CopyLessonPlanDto {
                target_room_ids: vec![target],
                target_week_start: friday,
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_copy_foreign_room_is_conflict(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let other_tenant = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;
        let (_, good_target) = create_test_room(&pool, tenant_id).await;
        let (_, foreign_target) = create_test_room(&pool, other_tenant).await;

        let source = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();

        let result = LessonPlanService::copy_plan(
            &pool,
            Some(tenant_id),
            teacher,
            source.id,
            CopyLessonPlanDto {
                target_room_ids: vec![foreign_target, good_target],
                target_week_start: next_monday(),
            },
        )
        .await
        .unwrap();

        assert_eq!(result.created.len(), 1);
        assert_eq!(result.created[0].room_id, good_target);
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(result.conflicts[0].room_id, foreign_target);
        assert!(result.conflicts[0].reason.contains("not found"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_submit_honors_auto_approve_override(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        set_tenant_override(
            &pool,
            tenant_id,
            "lesson_plan.auto_approve",
            &[],
            &["teacher"],
        )
        .await;

        let plan = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();

        assert_eq!(plan.status, PlanStatus::Approved);
        assert_eq!(plan.approved_by, Some(teacher));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_approve_override_does_not_change_submit_outcome(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        // Granting the review permission's auto set says nothing about
        // submission outcomes
        set_tenant_override(&pool, tenant_id, "lesson_plan.approve", &[], &["teacher"]).await;

        let plan = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();

        assert_eq!(plan.status, PlanStatus::Submitted);
        assert!(plan.approved_at.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_filters_by_status_and_room(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let director = create_test_user(&pool, tenant_id, "director").await;
        let (location_a, room_a) = create_test_room(&pool, tenant_id).await;
        let (location_b, room_b) = create_test_room(&pool, tenant_id).await;

        LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_a, room_a, monday()),
        )
        .await
        .unwrap();
        LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            director,
            "director",
            submit_dto(location_b, room_b, monday()),
        )
        .await
        .unwrap();

        let filters = LessonPlanFilterParams {
            tenant_id: None,
            week_start: None,
            location_id: None,
            room_id: None,
            status: Some(PlanStatus::Submitted),
            pagination: PaginationParams::default(),
        };
        let result = LessonPlanService::get_lesson_plans(&pool, Some(tenant_id), filters)
            .await
            .unwrap();
        assert_eq!(result.meta.total, 1);
        assert_eq!(result.data[0].room_id, room_a);

        let filters = LessonPlanFilterParams {
            tenant_id: None,
            week_start: None,
            location_id: None,
            room_id: Some(room_b.into()),
            status: None,
            pagination: PaginationParams::default(),
        };
        let result = LessonPlanService::get_lesson_plans(&pool, Some(tenant_id), filters)
            .await
            .unwrap();
        assert_eq!(result.meta.total, 1);
        assert_eq!(result.data[0].status, PlanStatus::Approved);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_scoped_to_tenant(pool: PgPool) {
        let tenant_a = create_test_tenant(&pool).await;
        let tenant_b = create_test_tenant(&pool).await;
        let teacher_a = create_test_user(&pool, tenant_a, "teacher").await;
        let teacher_b = create_test_user(&pool, tenant_b, "teacher").await;
        let (location_a, room_a) = create_test_room(&pool, tenant_a).await;
        let (location_b, room_b) = create_test_room(&pool, tenant_b).await;

        LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_a,
            teacher_a,
            "teacher",
            submit_dto(location_a, room_a, monday()),
        )
        .await
        .unwrap();
        LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_b,
            teacher_b,
            "teacher",
            submit_dto(location_b, room_b, monday()),
        )
        .await
        .unwrap();

        let scoped = LessonPlanService::get_lesson_plans(
            &pool,
            Some(tenant_a),
            LessonPlanFilterParams {
                tenant_id: None,
                week_start: None,
                location_id: None,
                room_id: None,
                status: None,
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(scoped.meta.total, 1);
        assert_eq!(scoped.data[0].tenant_id, tenant_a);

        // Cross-tenant read sees both
        let all = LessonPlanService::get_lesson_plans(
            &pool,
            None,
            LessonPlanFilterParams {
                tenant_id: None,
                week_start: None,
                location_id: None,
                room_id: None,
                status: None,
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(all.meta.total, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_plan_with_activities_ordered(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        let plan = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();
        add_activity(&pool, plan.id, 2, 1, false).await;
        add_activity(&pool, plan.id, 0, 2, false).await;
        add_activity(&pool, plan.id, 0, 1, false).await;

        let detail = LessonPlanService::get_plan_with_activities(&pool, Some(tenant_id), plan.id)
            .await
            .unwrap();

        assert_eq!(detail.plan.id, plan.id);
        assert_eq!(detail.activities.len(), 3);
        let order: Vec<(i16, Option<i16>)> = detail
            .activities
            .iter()
            .map(|a| (a.day_of_week, a.position))
            .collect();
        assert_eq!(order, vec![(0, Some(1)), (0, Some(2)), (2, Some(1))]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_plan_foreign_tenant_not_found(pool: PgPool) {
        let tenant_id = create_test_tenant(&pool).await;
        let other_tenant = create_test_tenant(&pool).await;
        let teacher = create_test_user(&pool, tenant_id, "teacher").await;
        let (location_id, room_id) = create_test_room(&pool, tenant_id).await;

        let plan = LessonPlanService::submit_plan(
            &pool,
            None,
            tenant_id,
            teacher,
            "teacher",
            submit_dto(location_id, room_id, monday()),
        )
        .await
        .unwrap();

        let result =
            LessonPlanService::get_plan_with_activities(&pool, Some(other_tenant), plan.id).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }
}
