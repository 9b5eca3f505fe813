//! Atomicity, uniqueness and cascade rules of [`PostgresStore`].

use crate::postgres::helpers::{
    BoxError, StoreContext, day, group, insert_users, instant, store_context, task_created_at,
    user,
};
use corkboard::{
    account::domain::UserId,
    group::domain::{GroupId, Membership, SlackIntegration},
    store::ports::{
        GroupStore, MembershipStore, RelationStore, Store, StoreError, TaskStore, TemplateStore,
        UserStore,
    },
    task::domain::{
        PersistedTaskData, Reaction, Task, TaskDetails, TaskId, TaskRelation, TaskTemplate,
        TaskTitle, TemplateDraft,
    },
};
use mockable::DefaultClock;
use rstest::rstest;

/// Ids of a group owned by one admin, with one task the admin joined.
struct Seeded {
    user_id: UserId,
    group_id: GroupId,
    task_id: TaskId,
}

async fn seed(context: &StoreContext) -> Seeded {
    let owner = user("owner");
    let team = group("Team1");
    let scheduled = task_created_at(team.id(), "Standup", 10, instant(8));
    let seeded = Seeded {
        user_id: owner.id(),
        group_id: team.id(),
        task_id: scheduled.id(),
    };
    context
        .store
        .transaction(move |tx| -> Result<(), StoreError> {
            tx.insert_user(&owner)?;
            tx.insert_group(&team)?;
            tx.insert_membership(&Membership::founder(owner.id(), team.id(), &DefaultClock))?;
            tx.insert_task(&scheduled)?;
            let mut relation = TaskRelation::blank(scheduled.id(), owner.id());
            relation.set_reaction(Reaction::Join);
            tx.insert_relation(&relation)?;
            let template = TaskTemplate::new(
                team.id(),
                TemplateDraft::new("sync", TaskTitle::new("Weekly sync").expect("valid title"))
                    .with_location("Room 1"),
                &DefaultClock,
            )
            .expect("valid template");
            tx.insert_template(&template)
        })
        .await
        .expect("seeding should succeed");
    seeded
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_unit_of_work_rolls_back_every_write(
    #[future] store_context: Result<Option<StoreContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = store_context.await? else {
        return Ok(());
    };
    let Seeded { group_id, .. } = seed(&context).await;
    let stray = user("stray");
    let stray_id = stray.id();

    let result = context
        .store
        .transaction(move |tx| -> Result<(), StoreError> {
            tx.insert_user(&stray)?;
            tx.delete_group(group_id)?;
            Err(StoreError::DuplicateMembership)
        })
        .await;

    assert!(matches!(result, Err(StoreError::DuplicateMembership)));
    let (user_found, group_found) = context
        .store
        .transaction(move |tx| -> Result<(bool, bool), StoreError> {
            Ok((
                tx.find_user(stray_id)?.is_some(),
                tx.find_group(group_id)?.is_some(),
            ))
        })
        .await?;
    assert!(!user_found);
    assert!(group_found);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unique_constraints_surface_as_typed_conflicts(
    #[future] store_context: Result<Option<StoreContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = store_context.await? else {
        return Ok(());
    };
    let Seeded {
        user_id,
        group_id,
        task_id,
    } = seed(&context).await;

    // A failed statement aborts a Postgres transaction, so each conflict
    // gets its own unit of work.
    let email = context
        .store
        .transaction(|tx| tx.insert_user(&user("owner")))
        .await;
    let membership = context
        .store
        .transaction(move |tx| {
            tx.insert_membership(&Membership::request(user_id, group_id, &DefaultClock))
        })
        .await;
    let relation = context
        .store
        .transaction(move |tx| tx.insert_relation(&TaskRelation::blank(task_id, user_id)))
        .await;

    assert!(matches!(email, Err(StoreError::DuplicateEmail)));
    assert!(matches!(membership, Err(StoreError::DuplicateMembership)));
    assert!(matches!(relation, Err(StoreError::DuplicateRelation)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn relation_conflict_leaves_the_unit_of_work_usable(
    #[future] store_context: Result<Option<StoreContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = store_context.await? else {
        return Ok(());
    };
    let Seeded {
        user_id,
        task_id,
        ..
    } = seed(&context).await;

    let (conflict, relation) = context
        .store
        .transaction(move |tx| -> Result<_, StoreError> {
            let conflict = tx.insert_relation(&TaskRelation::blank(task_id, user_id));
            let mut existing = tx
                .find_relation(task_id, user_id)?
                .expect("seeded relation is visible");
            existing.set_assigned(true);
            tx.update_relation(&existing)?;
            Ok((conflict, existing))
        })
        .await?;

    assert!(matches!(conflict, Err(StoreError::DuplicateRelation)));
    let stored = context
        .store
        .transaction(move |tx| tx.find_relation(task_id, user_id))
        .await?
        .expect("relation survives");
    assert_eq!(stored, relation);
    assert!(stored.is_assigned());
    assert_eq!(stored.reaction(), Reaction::Join);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_group_cascades_to_everything_it_owns(
    #[future] store_context: Result<Option<StoreContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = store_context.await? else {
        return Ok(());
    };
    let Seeded {
        user_id,
        group_id,
        task_id,
    } = seed(&context).await;

    let leftovers = context
        .store
        .transaction(move |tx| -> Result<_, StoreError> {
            let deleted = tx.delete_group(group_id)?;
            Ok((
                deleted,
                tx.list_task_relations(task_id)?.len(),
                tx.find_task(task_id)?.is_some(),
                tx.list_templates(group_id)?.len(),
                tx.count_memberships(group_id)?,
            ))
        })
        .await?;
    assert_eq!(leftovers, (true, 0, false, 0, 0));

    let (deleted_again, owner_survives) = context
        .store
        .transaction(move |tx| -> Result<_, StoreError> {
            Ok((tx.delete_group(group_id)?, tx.find_user(user_id)?.is_some()))
        })
        .await?;
    assert!(!deleted_again);
    assert!(owner_survives);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_user_cascades_to_memberships_and_relations(
    #[future] store_context: Result<Option<StoreContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = store_context.await? else {
        return Ok(());
    };
    let Seeded {
        user_id,
        group_id,
        task_id,
    } = seed(&context).await;

    let (deleted, memberships, relations, task_survives) = context
        .store
        .transaction(move |tx| -> Result<_, StoreError> {
            let deleted = tx.delete_user(user_id)?;
            Ok((
                deleted,
                tx.count_memberships(group_id)?,
                tx.list_task_relations(task_id)?.len(),
                tx.find_task(task_id)?.is_some(),
            ))
        })
        .await?;

    assert!(deleted);
    assert_eq!((memberships, relations), (0, 0));
    assert!(task_survives);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_rows_read_back_field_for_field(
    #[future] store_context: Result<Option<StoreContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = store_context.await? else {
        return Ok(());
    };
    let owner = user("owner");
    let owner_id = owner.id();
    insert_users(&context.store, vec![owner]).await;

    let mut team = group("Team1");
    team.connect_slack(SlackIntegration::new("xoxb-1", "C1").expect("complete integration"));
    let group_id = team.id();
    let details = TaskDetails::new(TaskTitle::new("Offsite").expect("valid title"), day(12))
        .with_span(
            day(12).and_hms_opt(9, 0, 0),
            day(12).and_hms_opt(17, 30, 0),
        )
        .with_location("Hall B")
        .with_description("Bring laptops")
        .with_status("in progress")
        .as_task();
    let scheduled = Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        group_id,
        details: details.clone(),
        created_at: instant(8),
        updated_at: instant(9),
    });
    let task_id = scheduled.id();

    let (group_row, task_row, membership_row) = context
        .store
        .transaction(move |tx| -> Result<_, StoreError> {
            tx.insert_group(&team)?;
            tx.insert_membership(&Membership::founder(owner_id, group_id, &DefaultClock))?;
            tx.insert_task(&scheduled)?;
            Ok((
                tx.find_group(group_id)?,
                tx.find_task(task_id)?,
                tx.find_membership(owner_id, group_id)?,
            ))
        })
        .await?;

    let stored_group = group_row.expect("group stored");
    assert_eq!(stored_group.name().as_str(), "Team1");
    let slack = stored_group.slack().expect("integration stored");
    assert_eq!((slack.bot_token(), slack.channel_id()), ("xoxb-1", "C1"));

    let stored_task = task_row.expect("task stored");
    assert_eq!(stored_task.details(), &details);
    assert_eq!(stored_task.created_at(), instant(8));
    assert_eq!(stored_task.updated_at(), instant(9));

    let membership = membership_row.expect("membership stored");
    assert!(membership.accepted());
    assert!(membership.is_admin());
    Ok(())
}
