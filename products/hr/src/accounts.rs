//! Console user accounts and their roles.

use entity::{role, user_account};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};

use crate::error::{HrError, HrResult, conflict_on, lost_race};
use crate::fsm::Label;
use crate::history::{self, Change};
use crate::lifecycle::{AccountAction, USER_ACCOUNT};
use crate::support::{now, optional, required};

#[derive(Clone, Debug, Default)]
pub struct RoleInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct UserAccountInput {
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role_id: i32,
}

#[derive(Clone, Debug, Default)]
pub struct UserAccountFilter {
    pub role_id: Option<i32>,
    pub status: Option<user_account::Status>,
}

const ROLE_NAME_TAKEN: &str = "a role with this name already exists";
const USERNAME_TAKEN: &str = "this username is already taken";

pub async fn list_roles<C: ConnectionTrait>(db: &C) -> HrResult<Vec<role::Model>> {
    Ok(role::Entity::find()
        .order_by_asc(role::Column::Name)
        .all(db)
        .await?)
}

pub async fn get_role<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<role::Model> {
    role::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("role", id))
}

#[instrument(name = "hr.role.create", skip_all)]
pub async fn create_role(db: &DatabaseConnection, input: RoleInput) -> HrResult<role::Model> {
    let name = required("name", &input.name)?;
    let ts = now();
    role::ActiveModel {
        id: NotSet,
        name: Set(name),
        description: Set(optional(input.description)),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(db)
    .await
    .map_err(conflict_on("name", ROLE_NAME_TAKEN))
}

#[instrument(name = "hr.role.update", skip(db, input))]
pub async fn update_role(
    db: &DatabaseConnection,
    id: i32,
    input: RoleInput,
) -> HrResult<role::Model> {
    let name = required("name", &input.name)?;
    let mut active: role::ActiveModel = get_role(db, id).await?.into();
    active.name = Set(name);
    active.description = Set(optional(input.description));
    active.updated_at = Set(now());
    active
        .update(db)
        .await
        .map_err(conflict_on("name", ROLE_NAME_TAKEN))
}

/// Roles still assigned to accounts cannot be removed.
#[instrument(name = "hr.role.delete", skip(db))]
pub async fn delete_role(db: &DatabaseConnection, id: i32) -> HrResult<bool> {
    let assigned = user_account::Entity::find()
        .filter(user_account::Column::RoleId.eq(id))
        .one(db)
        .await?;
    if assigned.is_some() {
        return Err(HrError::invalid_state(
            "role",
            "role is still assigned to user accounts",
        ));
    }
    let res = role::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn list_users<C: ConnectionTrait>(
    db: &C,
    filter: UserAccountFilter,
) -> HrResult<Vec<user_account::Model>> {
    let mut query = user_account::Entity::find();
    if let Some(role_id) = filter.role_id {
        query = query.filter(user_account::Column::RoleId.eq(role_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(user_account::Column::Status.eq(status));
    }
    Ok(query
        .order_by_asc(user_account::Column::Username)
        .all(db)
        .await?)
}

pub async fn get_user<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<user_account::Model> {
    user_account::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("user_account", id))
}

#[instrument(name = "hr.user.create", skip_all)]
pub async fn create_user(
    db: &DatabaseConnection,
    input: UserAccountInput,
) -> HrResult<user_account::Model> {
    let username = required("username", &input.username)?.to_lowercase();
    let full_name = required("full_name", &input.full_name)?;
    get_role(db, input.role_id).await?;
    let ts = now();
    let model = user_account::ActiveModel {
        id: NotSet,
        username: Set(username),
        full_name: Set(full_name),
        email: Set(optional(input.email)),
        role_id: Set(input.role_id),
        status: Set(USER_ACCOUNT.initial()),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(db)
    .await
    .map_err(conflict_on("username", USERNAME_TAKEN))?;
    info!(user_id = model.id, "user account created");
    Ok(model)
}

#[instrument(name = "hr.user.update", skip(db, input))]
pub async fn update_user(
    db: &DatabaseConnection,
    id: i32,
    input: UserAccountInput,
) -> HrResult<user_account::Model> {
    let username = required("username", &input.username)?.to_lowercase();
    let full_name = required("full_name", &input.full_name)?;
    let existing = get_user(db, id).await?;
    get_role(db, input.role_id).await?;
    let mut active: user_account::ActiveModel = existing.into();
    active.username = Set(username);
    active.full_name = Set(full_name);
    active.email = Set(optional(input.email));
    active.role_id = Set(input.role_id);
    active.updated_at = Set(now());
    active
        .update(db)
        .await
        .map_err(conflict_on("username", USERNAME_TAKEN))
}

pub async fn delete_user(db: &DatabaseConnection, id: i32) -> HrResult<bool> {
    let res = user_account::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Flip between active and inactive.
#[instrument(name = "hr.user.toggle_status", skip(db, actor))]
pub async fn toggle_status(
    db: &DatabaseConnection,
    id: i32,
    actor: Option<String>,
) -> HrResult<user_account::Model> {
    let txn = db.begin().await?;
    let existing = get_user(&txn, id).await?;
    let from = existing.status;
    let to = USER_ACCOUNT.next(from, AccountAction::Toggle)?;
    let mut active: user_account::ActiveModel = existing.into();
    active.status = Set(to);
    active.updated_at = Set(now());
    let updated = user_account::Entity::update(active)
        .filter(user_account::Column::Status.eq(from))
        .exec(&txn)
        .await
        .map_err(lost_race("user_account"))?;
    let actor = optional(actor);
    history::record(
        &txn,
        Change {
            machine: &USER_ACCOUNT,
            entity_id: id,
            from,
            action: AccountAction::Toggle,
            to,
            actor: actor.as_deref(),
            note: None,
        },
    )
    .await?;
    txn.commit().await?;
    info!(user_id = id, status = to.label(), "user account status toggled");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_db;

    async fn admin_role(db: &DatabaseConnection) -> role::Model {
        create_role(
            db,
            RoleInput {
                name: "Administrator".into(),
                description: None,
            },
        )
        .await
        .unwrap()
    }

    fn account(role_id: i32) -> UserAccountInput {
        UserAccountInput {
            username: "GHopper".into(),
            full_name: "Grace Hopper".into(),
            email: None,
            role_id,
        }
    }

    #[tokio::test]
    async fn role_names_are_unique() {
        let db = memory_db().await;
        admin_role(&db).await;
        let err = create_role(
            &db,
            RoleInput {
                name: "Administrator".into(),
                description: Some("dup".into()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, HrError::Conflict { field: "name", .. }));
    }

    #[tokio::test]
    async fn toggle_flips_and_records_history() {
        let db = memory_db().await;
        let role = admin_role(&db).await;
        let user = create_user(&db, account(role.id)).await.unwrap();
        assert_eq!(user.status, user_account::Status::Active);
        assert_eq!(user.username, "ghopper");

        let off = toggle_status(&db, user.id, None).await.unwrap();
        assert_eq!(off.status, user_account::Status::Inactive);
        let on = toggle_status(&db, user.id, Some("root".into())).await.unwrap();
        assert_eq!(on.status, user_account::Status::Active);

        let rows = history::history(&db, "user_account", user.id).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].to_status, "inactive");
        assert_eq!(rows[1].actor.as_deref(), Some("root"));
    }

    #[tokio::test]
    async fn usernames_are_unique_case_insensitively() {
        let db = memory_db().await;
        let role = admin_role(&db).await;
        create_user(&db, account(role.id)).await.unwrap();
        let mut again = account(role.id);
        again.username = "ghopper".into();
        let err = create_user(&db, again).await.unwrap_err();
        assert!(matches!(err, HrError::Conflict { field: "username", .. }));
    }

    #[tokio::test]
    async fn assigned_roles_cannot_be_deleted() {
        let db = memory_db().await;
        let role = admin_role(&db).await;
        let user = create_user(&db, account(role.id)).await.unwrap();
        let err = delete_role(&db, role.id).await.unwrap_err();
        assert!(matches!(err, HrError::InvalidState { .. }));
        assert!(delete_user(&db, user.id).await.unwrap());
        assert!(delete_role(&db, role.id).await.unwrap());
    }
}
