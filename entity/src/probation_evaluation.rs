use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "probation_evaluation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub probation_id: i32,
    pub evaluator: String,
    pub evaluation_date: Date,
    pub rating: Rating,
    pub recommendation: Recommendation,
    pub extension_days: Option<i32>,
    pub comments: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::probation_record::Entity",
        from = "Column::ProbationId",
        to = "super::probation_record::Column::Id",
        on_delete = "Cascade"
    )]
    ProbationRecord,
}

impl Related<super::probation_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProbationRecord.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Rating {
    #[sea_orm(string_value = "excellent")]
    Excellent,
    #[sea_orm(string_value = "good")]
    Good,
    #[sea_orm(string_value = "satisfactory")]
    Satisfactory,
    #[sea_orm(string_value = "needs_improvement")]
    NeedsImprovement,
    #[sea_orm(string_value = "poor")]
    Poor,
}

impl Rating {
    /// Fixed numeric scale used for averages.
    pub fn score(self) -> u8 {
        match self {
            Rating::Excellent => 5,
            Rating::Good => 4,
            Rating::Satisfactory => 3,
            Rating::NeedsImprovement => 2,
            Rating::Poor => 1,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Recommendation {
    #[sea_orm(string_value = "confirm")]
    Confirm,
    #[sea_orm(string_value = "extend")]
    Extend,
    #[sea_orm(string_value = "terminate")]
    Terminate,
}

impl ActiveModelBehavior for ActiveModel {}
