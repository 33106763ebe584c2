//! Handle database requests for the `students` collection.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};

use crate::database::generate_id;
use crate::error::Result;
use crate::student::Student;

const COLUMNS: &str = "id, first_name, last_name, email, phone_number, \
     address, department, year, gpa, courses, status, created_at, updated_at";

/// Storage adapter for [`Student`] records.
///
/// Exact-match, case-insensitive substring and numeric-threshold lookups are
/// the three query primitives every implementation must provide. The unique
/// index on `email` is the authoritative uniqueness guarantee; service-level
/// checks only reject early.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Persist a new record and return it with its store-assigned id.
    async fn insert(&self, student: Student) -> Result<Student>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Student>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>>;
    async fn email_exists(&self, email: &str) -> Result<bool>;
    /// Overwrite the scalar fields of an existing record. `courses` and
    /// `created_at` are never written by this path.
    async fn update(&self, student: &Student) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;
    async fn all(&self) -> Result<Vec<Student>>;
    async fn by_department(&self, department: &str) -> Result<Vec<Student>>;
    async fn by_status(&self, status: &str) -> Result<Vec<Student>>;
    async fn by_year(&self, year: i32) -> Result<Vec<Student>>;
    async fn by_first_name_contains(&self, fragment: &str) -> Result<Vec<Student>>;
    async fn by_last_name_contains(&self, fragment: &str) -> Result<Vec<Student>>;
    async fn by_gpa_at_least(&self, threshold: f64) -> Result<Vec<Student>>;
}

#[derive(Clone)]
pub struct PgStudentRepository {
    pool: Pool<Postgres>,
}

impl PgStudentRepository {
    /// Create a new [`PgStudentRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn select_cmp<T>(&self, field: &str, op: &str, value: T) -> Result<Vec<Student>>
    where
        T: Send + for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + 'static,
    {
        let query = format!("SELECT {COLUMNS} FROM students WHERE {field} {op} $1");
        let students = sqlx::query_as::<_, Student>(&query)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;

        Ok(students)
    }
}

#[async_trait]
impl StudentStore for PgStudentRepository {
    async fn insert(&self, mut student: Student) -> Result<Student> {
        student.id = generate_id();

        sqlx::query(
            r#"INSERT INTO students (id, first_name, last_name, email, phone_number,
                address, department, year, gpa, courses, status, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"#,
        )
        .bind(&student.id)
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .bind(&student.phone_number)
        .bind(&student.address)
        .bind(&student.department)
        .bind(student.year)
        .bind(student.gpa)
        .bind(Json(&student.courses))
        .bind(&student.status)
        .bind(student.created_at)
        .bind(student.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(student)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Student>> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        let student = sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(student)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE email = $1");
        let student = sqlx::query_as::<_, Student>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(student)
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update(&self, student: &Student) -> Result<()> {
        sqlx::query(
            r#"UPDATE students
                SET first_name = $1, last_name = $2, email = $3, phone_number = $4,
                    address = $5, department = $6, year = $7, gpa = $8, status = $9,
                    updated_at = $10
                WHERE id = $11"#,
        )
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .bind(&student.phone_number)
        .bind(&student.address)
        .bind(&student.department)
        .bind(student.year)
        .bind(student.gpa)
        .bind(&student.status)
        .bind(student.updated_at)
        .bind(&student.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn all(&self) -> Result<Vec<Student>> {
        let query = format!("SELECT {COLUMNS} FROM students");
        let students = sqlx::query_as::<_, Student>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(students)
    }

    async fn by_department(&self, department: &str) -> Result<Vec<Student>> {
        self.select_cmp("department", "=", department.to_owned()).await
    }

    async fn by_status(&self, status: &str) -> Result<Vec<Student>> {
        self.select_cmp("status", "=", status.to_owned()).await
    }

    async fn by_year(&self, year: i32) -> Result<Vec<Student>> {
        self.select_cmp("year", "=", year).await
    }

    async fn by_first_name_contains(&self, fragment: &str) -> Result<Vec<Student>> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE first_name ILIKE $1");
        let students = sqlx::query_as::<_, Student>(&query)
            .bind(like_pattern(fragment))
            .fetch_all(&self.pool)
            .await?;

        Ok(students)
    }

    async fn by_last_name_contains(&self, fragment: &str) -> Result<Vec<Student>> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE last_name ILIKE $1");
        let students = sqlx::query_as::<_, Student>(&query)
            .bind(like_pattern(fragment))
            .fetch_all(&self.pool)
            .await?;

        Ok(students)
    }

    async fn by_gpa_at_least(&self, threshold: f64) -> Result<Vec<Student>> {
        self.select_cmp("gpa", ">=", threshold).await
    }
}

/// Unanchored match with LIKE metacharacters escaped.
fn like_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{escaped}%")
}
