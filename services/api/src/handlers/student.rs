use axum::extract::State;
use serde::Serialize;

use siakad_domain::pagination::{PageMeta, PageRequest};

use crate::domain::types::Student;
use crate::error::ApiError;
use crate::extract::identity::Identity;
use crate::extract::validate::{ValidParams, ValidQuery};
use crate::response::Reply;
use crate::schemas::{NameParam, NimParam, YmdParam};
use crate::state::AppState;
use crate::usecase::student::{
    SearchStudentsByNameUseCase, SearchStudentsByNimUseCase, SearchStudentsByYmdUseCase,
};

#[derive(Serialize)]
pub struct StudentsData {
    pub students: Vec<Student>,
    pub pagination: PageMeta,
}

// ── GET /v1/students/search/name/{name} ──────────────────────────────────────

pub async fn search_by_name(
    _identity: Identity,
    State(state): State<AppState>,
    ValidParams(params): ValidParams<NameParam>,
    ValidQuery(page): ValidQuery<PageRequest>,
) -> Result<Reply<StudentsData>, ApiError> {
    let usecase = SearchStudentsByNameUseCase {
        source: state.student_source(),
    };
    let (students, pagination) = usecase.execute(&params.name, page).await?;
    Ok(Reply::ok(
        "Students retrieved successfully",
        StudentsData {
            students,
            pagination,
        },
    ))
}

// ── GET /v1/students/search/nim/{nim} ────────────────────────────────────────

pub async fn search_by_nim(
    _identity: Identity,
    State(state): State<AppState>,
    ValidParams(params): ValidParams<NimParam>,
    ValidQuery(page): ValidQuery<PageRequest>,
) -> Result<Reply<StudentsData>, ApiError> {
    let usecase = SearchStudentsByNimUseCase {
        source: state.student_source(),
    };
    let (students, pagination) = usecase.execute(&params.nim, page).await?;
    Ok(Reply::ok(
        "Students retrieved successfully",
        StudentsData {
            students,
            pagination,
        },
    ))
}

// ── GET /v1/students/search/ymd/{ymd} ────────────────────────────────────────

pub async fn search_by_ymd(
    _identity: Identity,
    State(state): State<AppState>,
    ValidParams(params): ValidParams<YmdParam>,
    ValidQuery(page): ValidQuery<PageRequest>,
) -> Result<Reply<StudentsData>, ApiError> {
    let usecase = SearchStudentsByYmdUseCase {
        source: state.student_source(),
    };
    let (students, pagination) = usecase.execute(&params.ymd, page).await?;
    Ok(Reply::ok(
        "Students retrieved successfully",
        StudentsData {
            students,
            pagination,
        },
    ))
}
