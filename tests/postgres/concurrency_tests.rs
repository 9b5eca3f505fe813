//! Racing units of work against one database: row locks and savepoints
//! must keep the services' invariants when requests overlap.

use crate::postgres::helpers::{
    BoxError, StoreContext, insert_users, instant, store_context, task_created_at, user,
};
use corkboard::{
    account::domain::{UserId, UserIdentifier},
    group::{
        domain::{Group, JoinAction},
        services::MembershipService,
    },
    store::{
        adapters::PostgresStore,
        ports::{GroupStore, RelationStore, Store, StoreError, TaskStore},
    },
    task::{
        domain::{Reaction, Task, TaskId, TaskQuery},
        services::{ReactionUpdate, RelationService},
    },
};
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::Arc;

type Memberships = MembershipService<PostgresStore, DefaultClock>;

/// A group administered by `admin` with `member` accepted.
struct Team {
    admin: UserId,
    member: UserId,
    group: Group,
    memberships: Memberships,
}

async fn team(context: &StoreContext) -> Team {
    let admin = user("admin");
    let member = user("member");
    let (admin_id, member_id) = (admin.id(), member.id());
    insert_users(&context.store, vec![admin, member]).await;

    let memberships = MembershipService::new(Arc::clone(&context.store), Arc::new(DefaultClock));
    let group = memberships
        .create_group("Team1", admin_id)
        .await
        .expect("group creation should succeed");
    memberships
        .request_join(group.id(), "Team1", member_id)
        .await
        .expect("join request should succeed");
    memberships
        .resolve_join_request(group.id(), member_id, JoinAction::Approve, admin_id)
        .await
        .expect("approval should succeed");
    Team {
        admin: admin_id,
        member: member_id,
        group,
        memberships,
    }
}

async fn insert_tasks(context: &StoreContext, tasks: Vec<Task>) {
    context
        .store
        .transaction(move |tx| -> Result<(), StoreError> {
            tasks.iter().try_for_each(|scheduled| tx.insert_task(scheduled))
        })
        .await
        .expect("task inserts should commit");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_touches_of_one_relation_merge_into_a_single_row(
    #[future] store_context: Result<Option<StoreContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = store_context.await? else {
        return Ok(());
    };
    let Team {
        admin,
        member,
        group,
        ..
    } = team(&context).await;
    let tasks: Vec<Task> = (1..=8)
        .map(|day| task_created_at(group.id(), "Shift", day, instant(8)))
        .collect();
    let task_ids: Vec<TaskId> = tasks.iter().map(Task::id).collect();
    insert_tasks(&context, tasks).await;
    let relations = RelationService::new(Arc::clone(&context.store));

    for task_id in task_ids.iter().copied() {
        let (assigned, joined) = tokio::join!(
            relations.set_assignment(task_id, UserIdentifier::Id(member), true, admin),
            relations.set_reaction(
                task_id,
                member,
                ReactionUpdate {
                    reaction: Some(Reaction::Join),
                    comment: None,
                },
            ),
        );
        assigned.expect("assignment should succeed");
        joined.expect("reaction should succeed");
    }

    let rows = context
        .store
        .transaction(move |tx| -> Result<_, StoreError> {
            task_ids
                .iter()
                .map(|task_id| tx.list_task_relations(*task_id))
                .collect::<Result<Vec<_>, _>>()
        })
        .await?;
    for per_task in rows {
        assert_eq!(per_task.len(), 1, "one relation row per task and user");
        for row in per_task {
            assert_eq!(row.user_id(), member);
            assert!(row.is_assigned());
            assert_eq!(row.reaction(), Reaction::Join);
        }
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn last_two_members_leaving_together_dissolve_the_group_once(
    #[future] store_context: Result<Option<StoreContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = store_context.await? else {
        return Ok(());
    };
    let Team {
        admin,
        member,
        group,
        memberships,
    } = team(&context).await;
    let group_id = group.id();
    insert_tasks(
        &context,
        vec![task_created_at(group_id, "Standup", 10, instant(8))],
    )
    .await;

    let (admin_left, member_left) = tokio::join!(
        memberships.remove_member(group_id, admin, admin),
        memberships.remove_member(group_id, member, member),
    );
    let outcomes = [
        admin_left.expect("admin leaves"),
        member_left.expect("member leaves"),
    ];

    let dissolutions = outcomes
        .iter()
        .filter(|outcome| outcome.group_dissolved)
        .count();
    assert_eq!(dissolutions, 1);
    let (group_found, tasks_left) = context
        .store
        .transaction(move |tx| -> Result<_, StoreError> {
            Ok((
                tx.find_group(group_id)?.is_some(),
                tx.query_tasks(group_id, admin, &TaskQuery::new())?.len(),
            ))
        })
        .await?;
    assert!(!group_found);
    assert_eq!(tasks_left, 0);
    Ok(())
}
