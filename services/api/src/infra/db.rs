use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use siakad_api_schema::users;
use siakad_domain::pagination::PageRequest;
use siakad_domain::role::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::{User, UserFilter, UserPatch};
use crate::error::ApiError;

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            password_digest: Set(user.password_digest.clone()),
            role: Set(user.role.as_str().to_owned()),
            refresh_token: Set(user.refresh_token.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, ApiError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(email) = patch.email {
            am.email = Set(email);
        }
        if let Some(name) = patch.name {
            am.name = Set(Some(name));
        }
        if let Some(digest) = patch.password_digest {
            am.password_digest = Set(digest);
        }
        if let Some(role) = patch.role {
            am.role = Set(role.as_str().to_owned());
        }
        if let Some(token) = patch.refresh_token {
            am.refresh_token = Set(token);
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update user")?;
        user_from_model(model)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), ApiError> {
        let page = page.clamped();
        let mut query = users::Entity::find();
        if let Some(email) = &filter.email {
            query = query
                .filter(Expr::col(users::Column::Email).ilike(format!("%{}%", like_escape(email))));
        }
        if let Some(name) = &filter.name {
            query = query
                .filter(Expr::col(users::Column::Name).ilike(format!("%{}%", like_escape(name))));
        }
        if let Some(role) = filter.role {
            query = query.filter(users::Column::Role.eq(role.as_str()));
        }

        let total = query.clone().count(&self.db).await.context("count users")?;
        let models = query
            .order_by_desc(users::Column::CreatedAt)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list users")?;
        let users = models
            .into_iter()
            .map(user_from_model)
            .collect::<Result<_, _>>()?;
        Ok((users, total))
    }
}

/// Escape LIKE metacharacters so filter text matches literally.
fn like_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    let role = UserRole::parse(&model.role)
        .with_context(|| format!("unknown role in users row: {}", model.role))?;
    Ok(User {
        id: model.id,
        email: model.email,
        name: model.name,
        password_digest: model.password_digest,
        role,
        refresh_token: model.refresh_token,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
