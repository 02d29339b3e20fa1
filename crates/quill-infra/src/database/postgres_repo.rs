//! PostgreSQL repository implementations.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, EntityTrait, FromQueryResult,
    JoinType, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
    Set, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Comment, Post, PostStatus, Tag, stamp_for_write};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, PostRepository, PostScope, TagRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL post repository. Posts are written together with their tag links.
pub struct PostgresPostRepository {
    db: DbConn,
}

/// PostgreSQL tag repository.
pub struct PostgresTagRepository {
    db: DbConn,
}

/// One row of the similar-posts ranking.
#[derive(Debug, FromQueryResult)]
struct SharedTags {
    post_id: Uuid,
    same_tags: i64,
}

fn scoped(scope: PostScope) -> Select<PostEntity> {
    let query = PostEntity::find();
    match scope {
        PostScope::All => query,
        PostScope::Published => {
            query.filter(post::Column::Status.eq(PostStatus::Published.code()))
        }
    }
}

fn tagged(query: Select<PostEntity>, tag: Option<&Tag>) -> Select<PostEntity> {
    match tag {
        Some(tag) => query.filter(
            post::Column::Id.in_subquery(
                Query::select()
                    .column(post_tag::Column::PostId)
                    .from(PostTagEntity)
                    .and_where(post_tag::Column::TagId.eq(tag.id))
                    .to_owned(),
            ),
        ),
        None => query,
    }
}

fn newest_first(query: Select<PostEntity>) -> Select<PostEntity> {
    query
        .order_by_desc(post::Column::Publish)
        .order_by_desc(post::Column::CreatedAt)
        .order_by_asc(post::Column::Id)
}

/// Load the tags of `models` and convert them into domain posts.
async fn with_tags<C: ConnectionTrait>(
    db: &C,
    models: Vec<post::Model>,
) -> Result<Vec<Post>, RepoError> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let links = PostTagEntity::find()
        .filter(post_tag::Column::PostId.is_in(post_ids))
        .all(db)
        .await
        .map_err(query_error)?;

    let mut tags_by_post: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    if !links.is_empty() {
        let tag_ids: BTreeSet<Uuid> = links.iter().map(|l| l.tag_id).collect();
        let tags: HashMap<Uuid, Tag> = TagEntity::find()
            .filter(tag::Column::Id.is_in(tag_ids))
            .all(db)
            .await
            .map_err(query_error)?
            .into_iter()
            .map(|m| (m.id, Tag::from(m)))
            .collect();

        for link in links {
            if let Some(tag) = tags.get(&link.tag_id) {
                tags_by_post
                    .entry(link.post_id)
                    .or_default()
                    .push(tag.clone());
            }
        }
    }

    models
        .into_iter()
        .map(|model| {
            let mut tags = tags_by_post.remove(&model.id).unwrap_or_default();
            tags.sort_by(|a, b| a.name.cmp(&b.name));
            model.into_post(tags)
        })
        .collect()
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn one(&self, query: Select<PostEntity>) -> Result<Option<Post>, RepoError> {
        let model = query.one(&self.db).await.map_err(query_error)?;
        let mut posts = with_tags(&self.db, model.into_iter().collect()).await?;
        Ok(posts.pop())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        self.find_in_scope(PostScope::All, id).await
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        post.validate()
            .map_err(|e| RepoError::Constraint(e.to_string()))?;

        let txn = self.db.begin().await.map_err(query_error)?;

        let clashes = PostEntity::find()
            .filter(post::Column::Slug.eq(post.slug.as_str()))
            .filter(post::Column::Publish.eq(post.publish_date))
            .filter(post::Column::Id.ne(post.id))
            .count(&txn)
            .await
            .map_err(query_error)?;
        if clashes > 0 {
            return Err(RepoError::Constraint(format!(
                "slug '{}' is already used on {}",
                post.slug, post.publish_date
            )));
        }

        let stored = PostEntity::find_by_id(post.id)
            .one(&txn)
            .await
            .map_err(query_error)?
            .map(|model| model.into_post(Vec::new()))
            .transpose()?;

        stamp_for_write(&mut post, stored.as_ref(), Utc::now());

        let active_model = post::ActiveModel::from(&post);
        if stored.is_some() {
            active_model.update(&txn).await.map_err(write_error)?;
        } else {
            active_model.insert(&txn).await.map_err(write_error)?;
        }

        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(post.id))
            .exec(&txn)
            .await
            .map_err(query_error)?;

        if !post.tags.is_empty() {
            let links = post.tags.iter().map(|tag| post_tag::ActiveModel {
                post_id: Set(post.id),
                tag_id: Set(tag.id),
            });
            PostTagEntity::insert_many(links)
                .exec(&txn)
                .await
                .map_err(write_error)?;
        }

        txn.commit().await.map_err(query_error)?;

        tracing::debug!(post_id = %post.id, slug = %post.slug, "Saved post");
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // Comments and tag links go with the post (ON DELETE CASCADE).
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_in_scope(&self, scope: PostScope, id: Uuid) -> Result<Option<Post>, RepoError> {
        self.one(scoped(scope).filter(post::Column::Id.eq(id))).await
    }

    async fn find_by_date(
        &self,
        scope: PostScope,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let query = scoped(scope)
            .filter(post::Column::Publish.eq(date))
            .filter(post::Column::Slug.eq(slug));
        self.one(query).await
    }

    async fn count(&self, scope: PostScope, tag: Option<&Tag>) -> Result<u64, RepoError> {
        tagged(scoped(scope), tag)
            .count(&self.db)
            .await
            .map_err(query_error)
    }

    async fn list(
        &self,
        scope: PostScope,
        tag: Option<&Tag>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let models = newest_first(tagged(scoped(scope), tag))
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        with_tags(&self.db, models).await
    }

    async fn list_similar(
        &self,
        scope: PostScope,
        post: &Post,
        limit: usize,
    ) -> Result<Vec<Post>, RepoError> {
        let tag_ids = post.tag_ids();
        if tag_ids.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let same_tags = Expr::col((PostTagEntity, post_tag::Column::TagId)).count();
        let mut ranking = PostTagEntity::find()
            .select_only()
            .column(post_tag::Column::PostId)
            .column_as(same_tags.clone(), "same_tags")
            .join(JoinType::InnerJoin, post_tag::Relation::Post.def())
            .filter(post_tag::Column::TagId.is_in(tag_ids))
            .filter(post_tag::Column::PostId.ne(post.id));
        if scope == PostScope::Published {
            ranking = ranking.filter(post::Column::Status.eq(PostStatus::Published.code()));
        }

        let ranked = ranking
            .group_by(post_tag::Column::PostId)
            .group_by(post::Column::Publish)
            .order_by(same_tags, Order::Desc)
            .order_by_desc(post::Column::Publish)
            .order_by_asc(post_tag::Column::PostId)
            .limit(limit as u64)
            .into_model::<SharedTags>()
            .all(&self.db)
            .await
            .map_err(query_error)?;
        if ranked.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = ranked.iter().map(|row| row.post_id).collect();
        let models = PostEntity::find()
            .filter(post::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(query_error)?;
        let mut by_id: HashMap<Uuid, Post> = with_tags(&self.db, models)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        tracing::debug!(
            post_id = %post.id,
            best = ranked[0].same_tags,
            found = ranked.len(),
            "Ranked similar posts"
        );

        Ok(ranked
            .into_iter()
            .filter_map(|row| by_id.remove(&row.post_id))
            .collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(
        &self,
        post_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Comment>, RepoError> {
        let mut query = CommentEntity::find().filter(comment::Column::PostId.eq(post_id));
        if active_only {
            query = query.filter(comment::Column::Active.eq(true));
        }

        let result = query
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_error)
    }
}

impl PostgresTagRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_or_create(&self, name: &str) -> Result<Tag, RepoError> {
        let new_tag = Tag::new(name);
        new_tag
            .validate()
            .map_err(|e| RepoError::Constraint(e.to_string()))?;

        let existing = TagEntity::find()
            .filter(tag::Column::Name.eq(new_tag.name.as_str()))
            .one(&self.db)
            .await
            .map_err(query_error)?;
        if let Some(model) = existing {
            return Ok(model.into());
        }

        let model = tag::ActiveModel::from(new_tag)
            .insert(&self.db)
            .await
            .map_err(write_error)?;
        tracing::debug!(tag = %model.slug, "Created tag");

        Ok(model.into())
    }
}
