use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movie_metrics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub metrics_id: i32,
    pub rating: Option<f64>,
    pub votes: Option<i64>,
    pub metascore: Option<i32>,
    pub revenue: Option<i64>,
    pub movie_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie::Entity",
        from = "Column::MovieId",
        to = "super::movie::Column::MovieId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Movie,
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movie.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
