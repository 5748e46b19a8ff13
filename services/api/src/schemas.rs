//! The request schema catalog: one immutable [`Schema`] per route input,
//! plus the typed payloads handlers receive after validation.

use std::sync::LazyLock;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use siakad_domain::pagination::PageRequest;
use siakad_domain::role::UserRole;
use siakad_validation::{Field, Schema};

const ROLES: &[&str] = &["USER", "ADMIN"];

fn email_field(name: &'static str) -> Field {
    Field::string(name).email("Invalid email format")
}

fn password_field(name: &'static str) -> Field {
    Field::string(name)
        .min_len(8, "Password must be at least 8 characters")
        .pattern("[A-Z]", "Password must contain at least one uppercase letter")
}

fn name_field(name: &'static str) -> Field {
    Field::string(name)
        .min_len(1, "Name is required")
        .max_len(100, "Name too long")
}

fn page_field() -> Field {
    Field::int("page")
        .coerced()
        .default_value(serde_json::json!(1))
        .min_int(1, "Page must be at least 1")
}

fn limit_field() -> Field {
    Field::int("limit")
        .coerced()
        .default_value(serde_json::json!(10))
        .min_int(1, "Limit must be at least 1")
        .max_int(100, "Limit cannot exceed 100")
}

pub static LOGIN: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(email_field("email"))
        .field(password_field("password"))
});

pub static REFRESH: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new().field(Field::string("refreshToken").min_len(1, "Refresh token is required"))
});

pub static CREATE_USER: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(email_field("email"))
        .field(name_field("name").optional())
        .field(password_field("password"))
        .field(
            Field::string("role")
                .one_of(ROLES, "Role must be either USER or ADMIN")
                .default_value(serde_json::json!("USER")),
        )
});

pub static UPDATE_USER: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(email_field("email").optional())
        .field(name_field("name").optional())
        .field(password_field("password").optional())
        .field(
            Field::string("role")
                .one_of(ROLES, "Role must be either USER or ADMIN")
                .optional(),
        )
        .rule(
            "fields",
            "At least one field must be provided for update",
            |out| !out.is_empty(),
        )
});

pub static LIST_USERS_QUERY: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(page_field())
        .field(limit_field())
        .field(Field::string("email").optional())
        .field(Field::string("name").optional())
        .field(
            Field::string("role")
                .one_of(ROLES, "Role must be either USER or ADMIN")
                .optional(),
        )
});

pub static PAGE_QUERY: LazyLock<Schema> =
    LazyLock::new(|| Schema::new().field(page_field()).field(limit_field()));

pub static ID_PARAM: LazyLock<Schema> =
    LazyLock::new(|| Schema::new().field(Field::string("id").uuid("Invalid user ID format")));

pub static NAME_PARAM: LazyLock<Schema> = LazyLock::new(|| Schema::new().field(name_field("name")));

pub static NIM_PARAM: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new().field(Field::string("nim").pattern(r"^\d{10}$", "NIM must be exactly 10 digits"))
});

pub static YMD_PARAM: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new().field(
        Field::string("ymd").pattern(r"^\d{8}$", "YMD must be exactly 8 digits in YYYYMMDD format"),
    )
});

/// A payload type producible from exactly one catalog schema. The validating
/// extractors deserialize the schema's coerced output into `Self`, so the
/// schema is the single authority on shape and defaults.
pub trait Validated: DeserializeOwned {
    fn schema() -> &'static Schema;
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

impl Validated for LoginBody {
    fn schema() -> &'static Schema {
        &LOGIN
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshBody {
    pub refresh_token: String,
}

impl Validated for RefreshBody {
    fn schema() -> &'static Schema {
        &REFRESH
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    pub email: String,
    pub name: Option<String>,
    pub password: String,
    /// Always present after validation; the schema defaults it to USER.
    pub role: UserRole,
}

impl Validated for CreateUserBody {
    fn schema() -> &'static Schema {
        &CREATE_USER
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserBody {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

impl Validated for UpdateUserBody {
    fn schema() -> &'static Schema {
        &UPDATE_USER
    }
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(flatten)]
    pub page: PageRequest,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<UserRole>,
}

impl Validated for ListUsersQuery {
    fn schema() -> &'static Schema {
        &LIST_USERS_QUERY
    }
}

impl Validated for PageRequest {
    fn schema() -> &'static Schema {
        &PAGE_QUERY
    }
}

#[derive(Debug, Deserialize)]
pub struct IdParam {
    pub id: Uuid,
}

impl Validated for IdParam {
    fn schema() -> &'static Schema {
        &ID_PARAM
    }
}

#[derive(Debug, Deserialize)]
pub struct NameParam {
    pub name: String,
}

impl Validated for NameParam {
    fn schema() -> &'static Schema {
        &NAME_PARAM
    }
}

#[derive(Debug, Deserialize)]
pub struct NimParam {
    pub nim: String,
}

impl Validated for NimParam {
    fn schema() -> &'static Schema {
        &NIM_PARAM
    }
}

#[derive(Debug, Deserialize)]
pub struct YmdParam {
    pub ymd: String,
}

impl Validated for YmdParam {
    fn schema() -> &'static Schema {
        &YMD_PARAM
    }
}
