use std::time::Instant;

use thiserror::Error;

use crate::db::PlanStore;
use crate::planner::types::{
    CourseBudget, CourseSnapshot, DependencyEdge, LessonNode, MasteryStatus, UserNodeState,
};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("query failed: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("course not found: {0}")]
    CourseNotFound(String),
}

type NodeRow = (
    String,
    Option<String>,
    Option<String>,
    Option<f64>,
    Option<String>,
    Option<f64>,
    Option<String>,
);
type EdgeRow = (String, String);
type StateRow = (String, Option<String>, Option<f64>);
type BudgetRow = (Option<f64>,);

const NODES_PG: &str = r#"SELECT CAST("id" AS TEXT), "title", "module_ref", CAST("estimated_minutes" AS DOUBLE PRECISION), CAST("bloom_level" AS TEXT), CAST("intrinsic_exam_value" AS DOUBLE PRECISION), CAST("content_payload" AS TEXT)
   FROM "course_nodes" WHERE CAST("course_id" AS TEXT) = $1 ORDER BY "position", "id""#;
const NODES_SQLITE: &str = r#"SELECT CAST("id" AS TEXT), "title", "module_ref", CAST("estimated_minutes" AS DOUBLE PRECISION), CAST("bloom_level" AS TEXT), CAST("intrinsic_exam_value" AS DOUBLE PRECISION), CAST("content_payload" AS TEXT)
   FROM "course_nodes" WHERE "course_id" = ? ORDER BY "position", "id""#;

const EDGES_PG: &str = r#"SELECT CAST("parent_id" AS TEXT), CAST("child_id" AS TEXT)
   FROM "node_dependencies" WHERE CAST("course_id" AS TEXT) = $1 ORDER BY "parent_id", "child_id""#;
const EDGES_SQLITE: &str = r#"SELECT CAST("parent_id" AS TEXT), CAST("child_id" AS TEXT)
   FROM "node_dependencies" WHERE "course_id" = ? ORDER BY "parent_id", "child_id""#;

const STATE_PG: &str = r#"SELECT CAST(s."node_id" AS TEXT), CAST(s."mastery_status" AS TEXT), CAST(s."familiarity_score" AS DOUBLE PRECISION)
   FROM "user_node_state" s JOIN "course_nodes" n ON n."id" = s."node_id"
   WHERE CAST(s."user_id" AS TEXT) = $1 AND CAST(n."course_id" AS TEXT) = $2"#;
const STATE_SQLITE: &str = r#"SELECT CAST(s."node_id" AS TEXT), CAST(s."mastery_status" AS TEXT), CAST(s."familiarity_score" AS DOUBLE PRECISION)
   FROM "user_node_state" s JOIN "course_nodes" n ON n."id" = s."node_id"
   WHERE s."user_id" = ? AND n."course_id" = ?"#;

const BUDGET_PG: &str =
    r#"SELECT CAST("seconds_to_complete" AS DOUBLE PRECISION) FROM "courses" WHERE CAST("id" AS TEXT) = $1"#;
const BUDGET_SQLITE: &str =
    r#"SELECT CAST("seconds_to_complete" AS DOUBLE PRECISION) FROM "courses" WHERE "id" = ?"#;

/// Loads everything the planner needs for one learner on one course.
///
/// The four reads run concurrently; the first failure aborts the load.
pub async fn load_snapshot(
    store: &PlanStore,
    course_id: &str,
    user_id: &str,
) -> Result<CourseSnapshot, SnapshotError> {
    let started = Instant::now();

    let (nodes, edges, user_state, budget) = tokio::try_join!(
        load_nodes(store, course_id),
        load_edges(store, course_id),
        load_user_state(store, course_id, user_id),
        load_budget(store, course_id),
    )?;

    let Some(budget) = budget else {
        return Err(SnapshotError::CourseNotFound(course_id.to_string()));
    };

    tracing::debug!(
        course_id,
        user_id,
        backend = store.backend_name(),
        nodes = nodes.len(),
        edges = edges.len(),
        user_state = user_state.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "course snapshot loaded"
    );

    Ok(CourseSnapshot {
        nodes,
        edges,
        user_state,
        budget: Some(budget),
    })
}

async fn load_nodes(store: &PlanStore, course_id: &str) -> Result<Vec<LessonNode>, SnapshotError> {
    let rows: Vec<NodeRow> = match store {
        PlanStore::Primary(pg) => sqlx::query_as(NODES_PG).bind(course_id).fetch_all(pg).await?,
        PlanStore::Fallback(sqlite) => {
            sqlx::query_as(NODES_SQLITE)
                .bind(course_id)
                .fetch_all(sqlite)
                .await?
        }
    };
    Ok(rows.into_iter().map(node_from_row).collect())
}

async fn load_edges(store: &PlanStore, course_id: &str) -> Result<Vec<DependencyEdge>, SnapshotError> {
    let rows: Vec<EdgeRow> = match store {
        PlanStore::Primary(pg) => sqlx::query_as(EDGES_PG).bind(course_id).fetch_all(pg).await?,
        PlanStore::Fallback(sqlite) => {
            sqlx::query_as(EDGES_SQLITE)
                .bind(course_id)
                .fetch_all(sqlite)
                .await?
        }
    };
    Ok(rows
        .into_iter()
        .map(|(parent_id, child_id)| DependencyEdge { parent_id, child_id })
        .collect())
}

async fn load_user_state(
    store: &PlanStore,
    course_id: &str,
    user_id: &str,
) -> Result<Vec<UserNodeState>, SnapshotError> {
    let rows: Vec<StateRow> = match store {
        PlanStore::Primary(pg) => {
            sqlx::query_as(STATE_PG)
                .bind(user_id)
                .bind(course_id)
                .fetch_all(pg)
                .await?
        }
        PlanStore::Fallback(sqlite) => {
            sqlx::query_as(STATE_SQLITE)
                .bind(user_id)
                .bind(course_id)
                .fetch_all(sqlite)
                .await?
        }
    };
    Ok(rows.into_iter().map(state_from_row).collect())
}

async fn load_budget(
    store: &PlanStore,
    course_id: &str,
) -> Result<Option<CourseBudget>, SnapshotError> {
    let row: Option<BudgetRow> = match store {
        PlanStore::Primary(pg) => {
            sqlx::query_as(BUDGET_PG)
                .bind(course_id)
                .fetch_optional(pg)
                .await?
        }
        PlanStore::Fallback(sqlite) => {
            sqlx::query_as(BUDGET_SQLITE)
                .bind(course_id)
                .fetch_optional(sqlite)
                .await?
        }
    };
    Ok(row.map(|(seconds_to_complete,)| CourseBudget { seconds_to_complete }))
}

fn node_from_row(row: NodeRow) -> LessonNode {
    let (id, title, module_ref, estimated_minutes, bloom_level, intrinsic_exam_value, payload) = row;

    let content_payload = payload.and_then(|raw| match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(node_id = %id, error = %err, "ignoring malformed content payload");
            None
        }
    });

    LessonNode {
        id,
        title: title.unwrap_or_default(),
        module_ref,
        estimated_minutes,
        bloom_level,
        intrinsic_exam_value,
        content_payload,
    }
}

fn state_from_row(row: StateRow) -> UserNodeState {
    let (node_id, status, familiarity_score) = row;
    UserNodeState {
        node_id,
        mastery_status: status
            .as_deref()
            .map(MasteryStatus::from_str)
            .unwrap_or_default(),
        familiarity_score,
    }
}
