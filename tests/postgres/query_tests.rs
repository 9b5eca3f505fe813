//! Task listing queries of [`PostgresStore`]: filters, ordering and
//! pagination pushed down into SQL.

use crate::postgres::helpers::{
    BoxError, StoreContext, day, group, instant, store_context, task_created_at, user,
};
use corkboard::{
    account::domain::UserId,
    group::domain::{GroupId, Membership},
    store::ports::{
        GroupStore, MembershipStore, RelationStore, Store, StoreError, TaskStore, UserStore,
    },
    task::domain::{Reaction, Task, TaskFilterKind, TaskQuery, TaskRelation},
};
use mockable::DefaultClock;
use rstest::rstest;

/// One group, four tasks and the owner's relations to them:
///
/// | task     | date  | created | owner relation |
/// |----------|-------|---------|----------------|
/// | Planning | 06-10 | 08:00   | assigned       |
/// | Review   | 06-12 | 10:00   | undecided      |
/// | Retro    | 06-14 | 09:00   | join           |
/// | Demo     | 06-20 | 07:00   | none           |
///
/// A second member joined Demo. A second group, where the owner's request
/// is still pending, holds a task the owner joined.
struct Board {
    owner: UserId,
    group_id: GroupId,
}

fn relation(task: &Task, user_id: UserId, assigned: bool, reaction: Reaction) -> TaskRelation {
    let mut row = TaskRelation::blank(task.id(), user_id);
    row.set_assigned(assigned);
    row.set_reaction(reaction);
    row
}

async fn board(context: &StoreContext) -> Board {
    let owner = user("owner");
    let peer = user("peer");
    let team = group("Team1");
    let other_team = group("Team2");
    let tasks = [
        task_created_at(team.id(), "Planning", 10, instant(8)),
        task_created_at(team.id(), "Review", 12, instant(10)),
        task_created_at(team.id(), "Retro", 14, instant(9)),
        task_created_at(team.id(), "Demo", 20, instant(7)),
    ];
    let pending_task = task_created_at(other_team.id(), "Elsewhere", 11, instant(6));
    let seeded = Board {
        owner: owner.id(),
        group_id: team.id(),
    };
    context
        .store
        .transaction(move |tx| -> Result<(), StoreError> {
            tx.insert_user(&owner)?;
            tx.insert_user(&peer)?;
            tx.insert_group(&team)?;
            tx.insert_group(&other_team)?;
            tx.insert_membership(&Membership::founder(owner.id(), team.id(), &DefaultClock))?;
            tx.insert_membership(&Membership::founder(
                peer.id(),
                other_team.id(),
                &DefaultClock,
            ))?;
            tx.insert_membership(&Membership::request(
                owner.id(),
                other_team.id(),
                &DefaultClock,
            ))?;
            for scheduled in tasks.iter().chain([&pending_task]) {
                tx.insert_task(scheduled)?;
            }
            let [planning, review, retro, demo] = &tasks;
            for row in [
                relation(planning, owner.id(), true, Reaction::NoReaction),
                relation(review, owner.id(), false, Reaction::Undecided),
                relation(retro, owner.id(), false, Reaction::Join),
                relation(demo, peer.id(), false, Reaction::Join),
                relation(&pending_task, owner.id(), false, Reaction::Join),
            ] {
                tx.insert_relation(&row)?;
            }
            Ok(())
        })
        .await
        .expect("seeding should succeed");
    seeded
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|listed| listed.title().as_str()).collect()
}

#[rstest]
#[case::unfiltered(TaskQuery::new(), &["Planning", "Review", "Retro", "Demo"])]
#[case::my_related(
    TaskQuery::new().with_filter(TaskFilterKind::MyRelated),
    &["Planning", "Retro"]
)]
#[case::undecided(TaskQuery::new().with_filter(TaskFilterKind::Undecided), &["Review"])]
#[case::recent_created(
    TaskQuery::new().with_filter(TaskFilterKind::RecentCreated),
    &["Review", "Retro", "Planning", "Demo"]
)]
#[case::inclusive_range(
    TaskQuery::new().with_range(Some(day(12)), Some(day(14))),
    &["Review", "Retro"]
)]
#[case::open_ended_range(TaskQuery::new().with_range(Some(day(14)), None), &["Retro", "Demo"])]
#[case::page(TaskQuery::new().with_page(1, 2), &["Review", "Retro"])]
#[case::filtered_page(
    TaskQuery::new().with_filter(TaskFilterKind::RecentCreated).with_page(3, 5),
    &["Demo"]
)]
#[tokio::test(flavor = "multi_thread")]
async fn query_tasks_filters_orders_and_pages_in_sql(
    #[future] store_context: Result<Option<StoreContext>, BoxError>,
    #[case] query: TaskQuery,
    #[case] expected: &[&str],
) -> Result<(), BoxError> {
    let Some(context) = store_context.await? else {
        return Ok(());
    };
    let Board { owner, group_id } = board(&context).await;

    let listed = context
        .store
        .transaction(move |tx| tx.query_tasks(group_id, owner, &query))
        .await?;

    assert_eq!(titles(&listed), expected);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn involved_tasks_cover_accepted_groups_only(
    #[future] store_context: Result<Option<StoreContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = store_context.await? else {
        return Ok(());
    };
    let Board { owner, group_id } = board(&context).await;

    let involved = context
        .store
        .transaction(move |tx| tx.list_involved_tasks(owner, day(1), day(30)))
        .await?;

    let listed: Vec<(&str, GroupId)> = involved
        .iter()
        .map(|(involved_task, owning)| (involved_task.title().as_str(), owning.id()))
        .collect();
    assert_eq!(listed, [("Planning", group_id), ("Retro", group_id)]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn date_windows_include_both_ends(
    #[future] store_context: Result<Option<StoreContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = store_context.await? else {
        return Ok(());
    };
    let Board { group_id, .. } = board(&context).await;

    let (between, on_day) = context
        .store
        .transaction(move |tx| -> Result<_, StoreError> {
            Ok((
                tx.list_tasks_between(group_id, day(10), day(14))?,
                tx.list_tasks_on(day(11))?,
            ))
        })
        .await?;

    assert_eq!(titles(&between), ["Planning", "Review", "Retro"]);
    let on_day_titles: Vec<(&str, &str)> = on_day
        .iter()
        .map(|(due, owning)| (due.title().as_str(), owning.name().as_str()))
        .collect();
    assert_eq!(on_day_titles, [("Elsewhere", "Team2")]);
    Ok(())
}
