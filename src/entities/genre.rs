use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "genre")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub genre_id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_genre_association::Entity")]
    MovieGenreAssociation,
}

impl Related<super::movie_genre_association::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieGenreAssociation.def()
    }
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_genre_association::Relation::Movie.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_genre_association::Relation::Genre.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
