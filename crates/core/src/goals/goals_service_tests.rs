#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Days, Utc};
    use uuid::Uuid;

    use crate::errors::Error;
    use crate::goals::{
        Goal, GoalError, GoalService, GoalServiceTrait, GoalStatus, GoalType,
    };
    use crate::test_support::InMemoryGoalRepository;

    fn service() -> (Arc<InMemoryGoalRepository>, GoalService) {
        let repo = Arc::new(InMemoryGoalRepository::new());
        let service = GoalService::new(repo.clone());
        (repo, service)
    }

    #[tokio::test]
    async fn auto_create_is_idempotent_within_the_month() {
        let (_repo, service) = service();
        let first = service
            .auto_create_goal("u1", GoalType::Points, 3)
            .await
            .unwrap();
        let second = service
            .auto_create_goal("u1", GoalType::Points, 3)
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.target_value, second.target_value);
        assert!(first.auto_generated);
    }

    #[tokio::test]
    async fn auto_create_target_scales_with_level_above_floor() {
        let (_repo, service) = service();
        let low = service
            .auto_create_goal("u1", GoalType::Points, 2)
            .await
            .unwrap();
        assert_eq!(low.target_value, 500);

        let high = service
            .auto_create_goal("u2", GoalType::Points, 7)
            .await
            .unwrap();
        assert_eq!(high.target_value, 700);
    }

    #[tokio::test]
    async fn auto_create_window_is_the_calendar_month() {
        use chrono::Datelike;

        let (_repo, service) = service();
        let goal = service
            .auto_create_goal("u1", GoalType::CheckIns, 1)
            .await
            .unwrap();
        let today = Utc::now().date_naive();
        assert!(goal.period_start <= today && today < goal.period_end);
        assert_eq!(goal.period_start.day(), 1);
        assert_eq!(goal.period_end.day(), 1);
    }

    #[tokio::test]
    async fn progress_completes_goal_at_target() {
        let (_repo, service) = service();
        service
            .auto_create_goal("u1", GoalType::CheckIns, 1)
            .await
            .unwrap();

        let partial = service
            .update_progress("u1", GoalType::CheckIns, 499)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(partial.status, GoalStatus::Active);
        assert_eq!(partial.current_value, 499);

        let done = service
            .update_progress("u1", GoalType::CheckIns, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.status, GoalStatus::Completed);
        assert_eq!(done.current_value, 500);
    }

    #[tokio::test]
    async fn progress_without_active_goal_is_a_noop() {
        let (_repo, service) = service();
        let updated = service
            .update_progress("u1", GoalType::Quizzes, 5)
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn overdue_goal_expires_lazily_on_read() {
        let (repo, service) = service();
        let today = Utc::now().date_naive();
        let stale = Goal {
            id: Uuid::new_v4().to_string(),
            user_id: "u1".to_string(),
            goal_type: GoalType::Points,
            target_value: 500,
            current_value: 120,
            period_start: today - Days::new(60),
            period_end: today - Days::new(30),
            status: GoalStatus::Active,
            auto_generated: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repo.rows.lock().unwrap().push(stale.clone());

        let active = service
            .get_active_goal("u1", GoalType::Points, today)
            .await
            .unwrap();
        assert!(active.is_none());

        let rows = repo.rows.lock().unwrap();
        assert_eq!(rows[0].status, GoalStatus::Expired);
    }

    #[tokio::test]
    async fn explicit_create_conflicts_with_active_goal() {
        let (_repo, service) = service();
        service
            .create_goal("u1", GoalType::Quizzes, 10)
            .await
            .unwrap();
        let err = service.create_goal("u1", GoalType::Quizzes, 20).await;
        assert!(matches!(
            err,
            Err(Error::Goal(GoalError::AlreadyActive(_)))
        ));
    }

    #[tokio::test]
    async fn explicit_create_rejects_non_positive_target() {
        let (_repo, service) = service();
        assert!(service.create_goal("u1", GoalType::Points, 0).await.is_err());
        assert!(service.create_goal("u1", GoalType::Points, -5).await.is_err());
    }
}
