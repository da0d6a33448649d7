use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    #[sea_orm(indexed)]
    pub department: Option<String>,
    pub position: Option<String>,
    #[sea_orm(indexed)]
    pub employee_type_id: Option<i32>,
    pub hire_date: Option<Date>,
    pub status: Status,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee_type::Entity",
        from = "Column::EmployeeTypeId",
        to = "super::employee_type::Column::Id",
        on_delete = "SetNull"
    )]
    EmployeeType,
    #[sea_orm(has_many = "super::leave_request::Entity")]
    LeaveRequest,
    #[sea_orm(has_many = "super::probation_record::Entity")]
    ProbationRecord,
}

impl Related<super::employee_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeType.def()
    }
}

impl Related<super::leave_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveRequest.def()
    }
}

impl Related<super::probation_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProbationRecord.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Status {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "terminated")]
    Terminated,
}

impl ActiveModelBehavior for ActiveModel {}
