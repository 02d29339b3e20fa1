//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::{Post, PostStatus, Tag};
use quill_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub author_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub publish: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    /// `DR` or `PB`, see [`PostStatus::code`].
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_tag::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert into a domain post carrying `tags`.
    pub fn into_post(self, tags: Vec<Tag>) -> Result<Post, RepoError> {
        let status = PostStatus::from_code(&self.status)
            .ok_or_else(|| RepoError::Query(format!("unknown post status: {}", self.status)))?;

        Ok(Post {
            id: self.id,
            title: self.title,
            slug: self.slug,
            author_id: self.author_id,
            body: self.body,
            publish_date: self.publish,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
            status,
            tags,
        })
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel. Tags are stored separately.
impl From<&Post> for ActiveModel {
    fn from(post: &Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title.clone()),
            slug: Set(post.slug.clone()),
            author_id: Set(post.author_id),
            body: Set(post.body.clone()),
            publish: Set(post.publish_date),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
            status: Set(post.status.code().to_string()),
        }
    }
}
