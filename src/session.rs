//! Runs the weekly state through the remote and local collaborators.
//!
//! Each request is split into a ticket, the IO, and the resulting action so a
//! caller that keeps editing while a request is in flight still gets the
//! stale-response guard of [`WeekState::apply`].

use crate::client::RemoteClient;
use crate::error::Result;
use crate::reconcile::{days_from_entries, days_from_records, rate_from_records};
use crate::schema::WeeklyRecord;
use crate::storage::{LocalStore, LocalWeek};
use crate::week::{Action, Operation, Ticket, WeekState, DEFAULT_RATE};

fn failed(ticket: Ticket, err: &crate::Error) -> Action {
    tracing::error!(error = %err, operation = ?ticket.operation(), "Request failed");
    Action::Failed {
        ticket,
        message: err.to_string(),
    }
}

pub fn remote_loaded(ticket: Ticket, result: Result<Vec<WeeklyRecord>>) -> Action {
    match result {
        Ok(records) => Action::Loaded {
            ticket,
            days: days_from_records(&records),
            rate: rate_from_records(&records),
        },
        Err(e) => failed(ticket, &e),
    }
}

pub fn local_loaded(ticket: Ticket, result: Result<LocalWeek>) -> Action {
    match result {
        Ok(week) => Action::Loaded {
            ticket,
            days: days_from_entries(week.entries.as_deref().unwrap_or_default()),
            rate: Some(week.rate.unwrap_or_else(|| DEFAULT_RATE.to_string())),
        },
        Err(e) => failed(ticket, &e),
    }
}

pub fn saved(ticket: Ticket, result: Result<()>) -> Action {
    match result {
        Ok(()) => Action::Saved { ticket },
        Err(e) => failed(ticket, &e),
    }
}

pub fn deleted(ticket: Ticket, result: Result<()>) -> Action {
    match result {
        Ok(()) => Action::DeletedAll { ticket },
        Err(e) => failed(ticket, &e),
    }
}

#[tracing::instrument(skip_all)]
pub async fn pull(mut state: WeekState, client: &RemoteClient) -> WeekState {
    let ticket = state.begin(Operation::Load);
    let result = client.list().await;
    state.apply(remote_loaded(ticket, result))
}

#[tracing::instrument(skip_all)]
pub async fn push(mut state: WeekState, client: &RemoteClient) -> WeekState {
    let ticket = state.begin(Operation::Save);
    let result = client.save_week(&state.records()).await;
    state.apply(saved(ticket, result))
}

/// Local state is only cleared once the remote delete is confirmed.
#[tracing::instrument(skip_all)]
pub async fn wipe(mut state: WeekState, client: &RemoteClient) -> WeekState {
    let ticket = state.begin(Operation::DeleteAll);
    let result = client.delete_all().await;
    state.apply(deleted(ticket, result))
}

#[tracing::instrument(skip_all)]
pub async fn load_local(mut state: WeekState, store: &LocalStore) -> WeekState {
    let ticket = state.begin(Operation::Load);
    let result = store.load_week().await;
    state.apply(local_loaded(ticket, result))
}

#[tracing::instrument(skip_all)]
pub async fn save_local(mut state: WeekState, store: &LocalStore) -> WeekState {
    let ticket = state.begin(Operation::Save);
    let result = store.save_week(&state.entries, &state.rate).await;
    state.apply(saved(ticket, result))
}

#[tracing::instrument(skip_all)]
pub async fn clear_local(mut state: WeekState, store: &LocalStore) -> WeekState {
    let ticket = state.begin(Operation::DeleteAll);
    let result = store.clear_week().await;
    state.apply(deleted(ticket, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::spawn_backend;
    use crate::entry::{Day, TimeEntry};
    use crate::storage::tests::random_db_path;
    use crate::week::{Field, Notice};

    fn worked_week() -> WeekState {
        WeekState::default()
            .apply(Action::SetRate("12".to_string()))
            .apply(Action::SetTime {
                day: Day::Monday,
                field: Field::In,
                value: "10".to_string(),
            })
            .apply(Action::ToggleAmPm {
                day: Day::Monday,
                field: Field::In,
            })
            .apply(Action::SetTime {
                day: Day::Monday,
                field: Field::Out,
                value: "6".to_string(),
            })
            .apply(Action::ToggleAmPm {
                day: Day::Monday,
                field: Field::Out,
            })
    }

    #[tokio::test]
    async fn test_push_then_pull() {
        let client = RemoteClient::new(&spawn_backend().await);
        let state = worked_week();
        assert_eq!(state.entry(Day::Monday).salary, "96.00");

        let state = push(state, &client).await;
        assert!(matches!(state.notice, Some(Notice::Success(_))));

        let fresh = pull(WeekState::default(), &client).await;
        assert_eq!(fresh.rate, "12");
        assert_eq!(fresh.entry(Day::Monday), state.entry(Day::Monday));
        assert_eq!(fresh.entry(Day::Monday).hours, "8.00");
        assert_eq!(fresh.notice, None);
    }

    #[tokio::test]
    async fn test_pull_from_empty_backend_is_blank_week() {
        let client = RemoteClient::new(&spawn_backend().await);
        let state = pull(worked_week(), &client).await;

        assert_eq!(state.rate, "12");
        assert!(state.entries.iter().all(|e| e == &TimeEntry::default()));
        assert_eq!(state.notice, None);
    }

    #[tokio::test]
    async fn test_failed_wipe_keeps_entries() {
        let client = RemoteClient::new("http://127.0.0.1:1");
        let state = wipe(worked_week(), &client).await;

        assert_eq!(state.entry(Day::Monday).hours, "8.00");
        assert!(matches!(state.notice, Some(Notice::Error(_))));
    }

    #[tokio::test]
    async fn test_wipe_clears_remote_and_state() {
        let client = RemoteClient::new(&spawn_backend().await);
        let state = push(worked_week(), &client).await;
        let state = wipe(state, &client).await;

        assert!(state.entries.iter().all(|e| e == &TimeEntry::default()));
        assert!(client.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_flight_load_loses_to_edit() {
        let client = RemoteClient::new(&spawn_backend().await);
        push(worked_week(), &client).await;

        let mut state = WeekState::default();
        let ticket = state.begin(Operation::Load);
        let result = client.list().await;
        let state = state.apply(Action::SetTime {
            day: Day::Monday,
            field: Field::In,
            value: "7".to_string(),
        });
        let state = state.apply(remote_loaded(ticket, result));

        assert_eq!(state.entry(Day::Monday).in_time, "7");
        assert_eq!(state.rate, DEFAULT_RATE);
    }

    #[tokio::test]
    async fn test_local_round_trip() -> Result<()> {
        let store = LocalStore::open(&random_db_path()).await?;

        let fresh = load_local(WeekState::default(), &store).await;
        assert_eq!(fresh.rate, DEFAULT_RATE);

        let state = save_local(worked_week(), &store).await;
        assert!(matches!(state.notice, Some(Notice::Success(_))));

        let loaded = load_local(WeekState::default(), &store).await;
        assert_eq!(loaded.rate, "12");
        assert_eq!(loaded.entry(Day::Monday), state.entry(Day::Monday));

        let cleared = clear_local(loaded, &store).await;
        assert!(cleared.entries.iter().all(|e| e == &TimeEntry::default()));
        assert_eq!(store.load_week().await?, LocalWeek::default());

        Ok(())
    }
}
