use siakad_domain::pagination::{PageMeta, PageRequest, paginate};

use crate::domain::repository::StudentSource;
use crate::domain::types::Student;
use crate::error::ApiError;

// ── Dataset parsing ──────────────────────────────────────────────────────────

/// Locate the NAMA / NIM / YMD columns in the header row. Cells are trimmed
/// and matched case-insensitively, so column order and padding are free.
fn column_positions(header: &str) -> Option<(usize, usize, usize)> {
    let cells: Vec<String> = header
        .split('|')
        .map(|c| c.trim().to_uppercase())
        .collect();
    let position = |name: &str| cells.iter().position(|c| c == name);
    Some((position("NAMA")?, position("NIM")?, position("YMD")?))
}

/// Parse the pipe-delimited table into records, canonically ordered by
/// (nama, nim, ymd). Rows missing any of the three fields are discarded;
/// duplicate rows are kept. A header without all three columns is a data
/// source failure, not a client error.
fn parse_dataset(raw: &str) -> Result<Vec<Student>, ApiError> {
    let mut lines = raw.lines().filter(|l| !l.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| ApiError::DataSource(anyhow::anyhow!("student dataset is empty")))?;
    let (nama_at, nim_at, ymd_at) = column_positions(header).ok_or_else(|| {
        ApiError::DataSource(anyhow::anyhow!(
            "student dataset header is missing a NAMA, NIM, or YMD column"
        ))
    })?;

    let mut students = Vec::new();
    for line in lines {
        let cells: Vec<&str> = line.split('|').map(str::trim).collect();
        let cell = |at: usize| cells.get(at).copied().unwrap_or("");
        let (nama, nim, ymd) = (cell(nama_at), cell(nim_at), cell(ymd_at));
        if nama.is_empty() || nim.is_empty() || ymd.is_empty() {
            continue;
        }
        students.push(Student {
            nama: nama.to_string(),
            nim: nim.to_string(),
            ymd: ymd.to_string(),
        });
    }
    students.sort_by(|a, b| (&a.nama, &a.nim, &a.ymd).cmp(&(&b.nama, &b.nim, &b.ymd)));
    Ok(students)
}

// ── SearchStudentsByName ─────────────────────────────────────────────────────

pub struct SearchStudentsByNameUseCase<S: StudentSource> {
    pub source: S,
}

impl<S: StudentSource> SearchStudentsByNameUseCase<S> {
    /// Case-insensitive substring match on the student name. Every call
    /// fetches the dataset anew; results are ordered by name.
    pub async fn execute(
        &self,
        name: &str,
        page: PageRequest,
    ) -> Result<(Vec<Student>, PageMeta), ApiError> {
        let mut students = parse_dataset(&self.source.fetch_raw().await?)?;
        let needle = name.to_lowercase();
        students.retain(|s| s.nama.to_lowercase().contains(&needle));
        students.sort_by(|a, b| a.nama.cmp(&b.nama));
        Ok(paginate(students, page))
    }
}

// ── SearchStudentsByNim ──────────────────────────────────────────────────────

pub struct SearchStudentsByNimUseCase<S: StudentSource> {
    pub source: S,
}

impl<S: StudentSource> SearchStudentsByNimUseCase<S> {
    /// Exact match on the student number, ordered by it.
    pub async fn execute(
        &self,
        nim: &str,
        page: PageRequest,
    ) -> Result<(Vec<Student>, PageMeta), ApiError> {
        let mut students = parse_dataset(&self.source.fetch_raw().await?)?;
        students.retain(|s| s.nim == nim);
        students.sort_by(|a, b| a.nim.cmp(&b.nim));
        Ok(paginate(students, page))
    }
}

// ── SearchStudentsByYmd ──────────────────────────────────────────────────────

pub struct SearchStudentsByYmdUseCase<S: StudentSource> {
    pub source: S,
}

impl<S: StudentSource> SearchStudentsByYmdUseCase<S> {
    /// Exact match on the birth date key, ordered by it.
    pub async fn execute(
        &self,
        ymd: &str,
        page: PageRequest,
    ) -> Result<(Vec<Student>, PageMeta), ApiError> {
        let mut students = parse_dataset(&self.source.fetch_raw().await?)?;
        students.retain(|s| s.ymd == ymd);
        students.sort_by(|a, b| a.ymd.cmp(&b.ymd));
        Ok(paginate(students, page))
    }
}
