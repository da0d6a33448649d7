//! Employees and employee types.

use chrono::NaiveDate;
use entity::{employee, employee_type};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::{info, instrument};

use crate::error::{HrError, HrResult, conflict_on};
use crate::support::{now, optional, required};

#[derive(Clone, Debug, Default)]
pub struct EmployeeTypeInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct EmployeeInput {
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub employee_type_id: Option<i32>,
    pub hire_date: Option<NaiveDate>,
    /// Ignored on create, which always starts `active`.
    pub status: Option<employee::Status>,
}

#[derive(Clone, Debug, Default)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub employee_type_id: Option<i32>,
    pub status: Option<employee::Status>,
}

const TYPE_NAME_TAKEN: &str = "an employee type with this name already exists";
const NUMBER_TAKEN: &str = "an employee with this number already exists";

pub async fn list_employee_types<C: ConnectionTrait>(
    db: &C,
) -> HrResult<Vec<employee_type::Model>> {
    Ok(employee_type::Entity::find()
        .order_by_asc(employee_type::Column::Name)
        .all(db)
        .await?)
}

pub async fn get_employee_type<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> HrResult<employee_type::Model> {
    employee_type::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("employee_type", id))
}

#[instrument(name = "hr.employee_type.create", skip_all)]
pub async fn create_employee_type(
    db: &DatabaseConnection,
    input: EmployeeTypeInput,
) -> HrResult<employee_type::Model> {
    let name = required("name", &input.name)?;
    let ts = now();
    let model = employee_type::ActiveModel {
        id: NotSet,
        name: Set(name),
        description: Set(optional(input.description)),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(db)
    .await
    .map_err(conflict_on("name", TYPE_NAME_TAKEN))?;
    Ok(model)
}

#[instrument(name = "hr.employee_type.update", skip(db, input))]
pub async fn update_employee_type(
    db: &DatabaseConnection,
    id: i32,
    input: EmployeeTypeInput,
) -> HrResult<employee_type::Model> {
    let name = required("name", &input.name)?;
    let existing = get_employee_type(db, id).await?;
    let mut active: employee_type::ActiveModel = existing.into();
    active.name = Set(name);
    active.description = Set(optional(input.description));
    active.updated_at = Set(now());
    active
        .update(db)
        .await
        .map_err(conflict_on("name", TYPE_NAME_TAKEN))
}

pub async fn delete_employee_type(db: &DatabaseConnection, id: i32) -> HrResult<bool> {
    let res = employee_type::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn list_employees<C: ConnectionTrait>(
    db: &C,
    filter: EmployeeFilter,
) -> HrResult<Vec<employee::Model>> {
    let mut query = employee::Entity::find();
    if let Some(department) = optional(filter.department) {
        query = query.filter(employee::Column::Department.eq(department));
    }
    if let Some(type_id) = filter.employee_type_id {
        query = query.filter(employee::Column::EmployeeTypeId.eq(type_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(employee::Column::Status.eq(status));
    }
    Ok(query
        .order_by_asc(employee::Column::LastName)
        .order_by_asc(employee::Column::FirstName)
        .all(db)
        .await?)
}

pub async fn get_employee<C: ConnectionTrait>(db: &C, id: i32) -> HrResult<employee::Model> {
    employee::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrError::not_found("employee", id))
}

struct EmployeeFields {
    employee_number: String,
    first_name: String,
    last_name: String,
}

async fn check_employee_input<C: ConnectionTrait>(
    db: &C,
    input: &EmployeeInput,
) -> HrResult<EmployeeFields> {
    let fields = EmployeeFields {
        employee_number: required("employee_number", &input.employee_number)?,
        first_name: required("first_name", &input.first_name)?,
        last_name: required("last_name", &input.last_name)?,
    };
    if let Some(type_id) = input.employee_type_id {
        get_employee_type(db, type_id).await?;
    }
    Ok(fields)
}

#[instrument(name = "hr.employee.create", skip_all)]
pub async fn create_employee(
    db: &DatabaseConnection,
    input: EmployeeInput,
) -> HrResult<employee::Model> {
    let fields = check_employee_input(db, &input).await?;
    let ts = now();
    let model = employee::ActiveModel {
        id: NotSet,
        employee_number: Set(fields.employee_number),
        first_name: Set(fields.first_name),
        last_name: Set(fields.last_name),
        email: Set(optional(input.email)),
        department: Set(optional(input.department)),
        position: Set(optional(input.position)),
        employee_type_id: Set(input.employee_type_id),
        hire_date: Set(input.hire_date),
        status: Set(employee::Status::Active),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(db)
    .await
    .map_err(conflict_on("employee_number", NUMBER_TAKEN))?;
    info!(employee_id = model.id, "employee created");
    Ok(model)
}

#[instrument(name = "hr.employee.update", skip(db, input))]
pub async fn update_employee(
    db: &DatabaseConnection,
    id: i32,
    input: EmployeeInput,
) -> HrResult<employee::Model> {
    let existing = get_employee(db, id).await?;
    let fields = check_employee_input(db, &input).await?;
    let status = input.status.unwrap_or(existing.status);
    let mut active: employee::ActiveModel = existing.into();
    active.employee_number = Set(fields.employee_number);
    active.first_name = Set(fields.first_name);
    active.last_name = Set(fields.last_name);
    active.email = Set(optional(input.email));
    active.department = Set(optional(input.department));
    active.position = Set(optional(input.position));
    active.employee_type_id = Set(input.employee_type_id);
    active.hire_date = Set(input.hire_date);
    active.status = Set(status);
    active.updated_at = Set(now());
    active
        .update(db)
        .await
        .map_err(conflict_on("employee_number", NUMBER_TAKEN))
}

/// Leave requests and probation records of the employee go with it.
#[instrument(name = "hr.employee.delete", skip(db))]
pub async fn delete_employee(db: &DatabaseConnection, id: i32) -> HrResult<bool> {
    let res = employee::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_db;

    fn ada() -> EmployeeInput {
        EmployeeInput {
            employee_number: "E-001".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: Some("ada@example.test".into()),
            department: Some("Engineering".into()),
            position: None,
            employee_type_id: None,
            hire_date: NaiveDate::from_ymd_opt(2024, 1, 2),
            status: Some(employee::Status::Terminated),
        }
    }

    #[tokio::test]
    async fn new_employees_start_active() {
        let db = memory_db().await;
        let created = create_employee(&db, ada()).await.unwrap();
        assert_eq!(created.status, employee::Status::Active);
        assert_eq!(created.full_name(), "Ada Lovelace");
    }

    #[tokio::test]
    async fn duplicate_employee_number_is_a_conflict() {
        let db = memory_db().await;
        create_employee(&db, ada()).await.unwrap();
        let err = create_employee(&db, ada()).await.unwrap_err();
        assert!(matches!(
            err,
            HrError::Conflict {
                field: "employee_number",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn duplicate_type_name_is_a_conflict_on_name() {
        let db = memory_db().await;
        let input = EmployeeTypeInput {
            name: "Contractor".into(),
            description: None,
        };
        create_employee_type(&db, input.clone()).await.unwrap();
        let err = create_employee_type(&db, input).await.unwrap_err();
        assert!(matches!(err, HrError::Conflict { field: "name", .. }));
    }

    #[tokio::test]
    async fn unknown_employee_type_is_not_found() {
        let db = memory_db().await;
        let mut input = ada();
        input.employee_type_id = Some(42);
        let err = create_employee(&db, input).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn filters_by_department() {
        let db = memory_db().await;
        create_employee(&db, ada()).await.unwrap();
        let mut other = ada();
        other.employee_number = "E-002".into();
        other.department = Some("Finance".into());
        create_employee(&db, other).await.unwrap();

        let engineering = list_employees(
            &db,
            EmployeeFilter {
                department: Some("Engineering".into()),
                ..EmployeeFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(engineering.len(), 1);
        assert_eq!(engineering[0].employee_number, "E-001");
    }

    #[tokio::test]
    async fn deleted_employees_leave_the_list() {
        let db = memory_db().await;
        let created = create_employee(&db, ada()).await.unwrap();
        assert!(delete_employee(&db, created.id).await.unwrap());
        assert!(!delete_employee(&db, created.id).await.unwrap());
        let all = list_employees(&db, EmployeeFilter::default()).await.unwrap();
        assert!(all.is_empty());
    }
}
