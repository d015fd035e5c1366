use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

use super::models::{ActivitySeed, PlanSeed, RoomContext};

// Rotated per (room, week) so seeded data covers the whole lifecycle
const STATUSES: [&str; 3] = ["approved", "submitted", "draft"];

const ACTIVITIES: [(&str, &str); 9] = [
    ("Morning circle", "social"),
    ("Finger painting", "art"),
    ("Story time", "literacy"),
    ("Counting games", "math"),
    ("Outdoor play", "outdoor"),
    ("Music and movement", "music"),
    ("Sensory bins", "sensory"),
    ("Nature walk", "science"),
    ("Dramatic play corner", "dramatic_play"),
];

// Start/end hours for time-based schedules
const TIME_SLOTS: [(u32, u32); 3] = [(9, 10), (10, 11), (14, 15)];

const SLOTS_PER_DAY: usize = 3;
const WEEKDAYS: usize = 5;

/// Seeds lesson plans with activities for every room, spread over recent
/// weeks and across the plan lifecycle
pub async fn seed_plans(
    db: &PgPool,
    rooms: &[RoomContext],
    staff: &[(Uuid, Uuid, &'static str)],
    weeks: usize,
) -> Result<(usize, usize), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "📅 Seeding lesson plans for {} rooms over {} weeks...",
        rooms.len(),
        weeks
    );

    let mut teachers_by_tenant: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut reviewers_by_tenant: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for &(user_id, tenant_id, role) in staff {
        match role {
            "teacher" => teachers_by_tenant
                .entry(tenant_id)
                .or_default()
                .push(user_id),
            "director" | "admin" => reviewers_by_tenant
                .entry(tenant_id)
                .or_default()
                .push(user_id),
            _ => {}
        }
    }

    let mondays = recent_mondays(weeks);
    let plans = generate_plans(rooms, &teachers_by_tenant, &reviewers_by_tenant, &mondays);

    let plan_ids = insert_plans_batch(db, &plans).await?;

    // Activities need the generated plan ids, which come back in insertion
    // order
    let mut activities = Vec::with_capacity(plan_ids.len() * WEEKDAYS * SLOTS_PER_DAY);
    for (plan_id, plan) in plan_ids.iter().zip(plans.iter()) {
        generate_activities(*plan_id, plan.schedule_type, &mut activities);
    }

    insert_activities_batch(db, &activities).await?;

    println!(
        "   ✓ Inserted {} plans and {} activities in {:?}",
        plan_ids.len(),
        activities.len(),
        start_time.elapsed()
    );

    Ok((plan_ids.len(), activities.len()))
}

/// Mondays of the most recent `weeks` weeks, newest first
fn recent_mondays(weeks: usize) -> Vec<NaiveDate> {
    let today = Utc::now().date_naive();
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    (0..weeks)
        .map(|w| monday - Duration::days(7 * w as i64))
        .collect()
}

fn generate_plans(
    rooms: &[RoomContext],
    teachers_by_tenant: &HashMap<Uuid, Vec<Uuid>>,
    reviewers_by_tenant: &HashMap<Uuid, Vec<Uuid>>,
    mondays: &[NaiveDate],
) -> Vec<PlanSeed> {
    let mut plans = Vec::with_capacity(rooms.len() * mondays.len());

    for (room_idx, room) in rooms.iter().enumerate() {
        // Tenants without teachers get no plans
        let Some(teachers) = teachers_by_tenant.get(&room.tenant_id) else {
            continue;
        };
        let teacher_id = teachers[room_idx % teachers.len()];
        let reviewer = reviewers_by_tenant
            .get(&room.tenant_id)
            .and_then(|r| r.first())
            .copied();

        for (week_idx, &week_start) in mondays.iter().enumerate() {
            let status = STATUSES[(room_idx + week_idx) % STATUSES.len()];
            plans.push(PlanSeed {
                tenant_id: room.tenant_id,
                location_id: room.location_id,
                room_id: room.room_id,
                teacher_id,
                week_start,
                schedule_type: room.schedule_type,
                status,
                submitted_by: (status != "draft").then_some(teacher_id),
                approved_by: (status == "approved").then_some(reviewer).flatten(),
            });
        }
    }

    plans
}

fn generate_activities(plan_id: Uuid, schedule_type: &str, out: &mut Vec<ActivitySeed>) {
    for day in 0..WEEKDAYS {
        for slot in 0..SLOTS_PER_DAY {
            let (title, category) = ACTIVITIES[(day * SLOTS_PER_DAY + slot) % ACTIVITIES.len()];

            let (position, start_time, end_time) = if schedule_type == "time-based" {
                let (start_hour, end_hour) = TIME_SLOTS[slot];
                (
                    None,
                    NaiveTime::from_hms_opt(start_hour, 0, 0),
                    NaiveTime::from_hms_opt(end_hour, 0, 0),
                )
            } else {
                (Some(slot as i16 + 1), None, None)
            };

            out.push(ActivitySeed {
                lesson_plan_id: plan_id,
                day_of_week: day as i16,
                position,
                start_time,
                end_time,
                title,
                category,
            });
        }
    }
}

async fn insert_plans_batch(
    db: &PgPool,
    plans: &[PlanSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 11 params per plan keeps batches well under the Postgres param limit
    const BATCH_SIZE: usize = 500;
    let mut all_ids = Vec::with_capacity(plans.len());

    for chunk in plans.chunks(BATCH_SIZE) {
        let ids = insert_plans_chunk(&mut tx, chunk).await?;
        all_ids.extend(ids);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_plans_chunk(
    tx: &mut Transaction<'_, Postgres>,
    plans: &[PlanSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    if plans.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO lesson_plans (tenant_id, location_id, room_id, teacher_id, week_start, \
         schedule_type, status, submitted_at, submitted_by, approved_at, approved_by) VALUES ",
    );

    for i in 0..plans.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 11;
        let placeholders: Vec<String> =
            (1..=11).map(|p| format!("${}", param_idx + p)).collect();
        query.push_str(&format!("({})", placeholders.join(", ")));
    }

    query.push_str(" RETURNING id");

    let now = Utc::now();
    let mut q = sqlx::query_scalar(&query);
    for plan in plans {
        q = q
            .bind(plan.tenant_id)
            .bind(plan.location_id)
            .bind(plan.room_id)
            .bind(plan.teacher_id)
            .bind(plan.week_start)
            .bind(plan.schedule_type)
            .bind(plan.status)
            .bind(plan.submitted_by.map(|_| now))
            .bind(plan.submitted_by)
            .bind(plan.approved_by.map(|_| now))
            .bind(plan.approved_by);
    }

    let ids: Vec<Uuid> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

async fn insert_activities_batch(
    db: &PgPool,
    activities: &[ActivitySeed],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    const BATCH_SIZE: usize = 1000;

    for chunk in activities.chunks(BATCH_SIZE) {
        insert_activities_chunk(&mut tx, chunk).await?;
    }

    tx.commit().await?;
    Ok(())
}

async fn insert_activities_chunk(
    tx: &mut Transaction<'_, Postgres>,
    activities: &[ActivitySeed],
) -> Result<(), Box<dyn std::error::Error>> {
    if activities.is_empty() {
        return Ok(());
    }

    let mut query = String::from(
        "INSERT INTO scheduled_activities (lesson_plan_id, day_of_week, position, start_time, \
         end_time, title, category) VALUES ",
    );

    for i in 0..activities.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 7;
        let placeholders: Vec<String> =
            (1..=7).map(|p| format!("${}", param_idx + p)).collect();
        query.push_str(&format!("({})", placeholders.join(", ")));
    }

    let mut q = sqlx::query(&query);
    for activity in activities {
        q = q
            .bind(activity.lesson_plan_id)
            .bind(activity.day_of_week)
            .bind(activity.position)
            .bind(activity.start_time)
            .bind(activity.end_time)
            .bind(activity.title)
            .bind(activity.category);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}
