use std::sync::Arc;

use chrono::Utc;

use crate::error::{Result, ServerError};
use crate::student::{Student, StudentPayload, StudentStore};

const DEFAULT_STATUS: &str = "ACTIVE";

/// Student record manager.
///
/// Holds no mutable state; safe to call from concurrent requests.
#[derive(Clone)]
pub struct StudentService {
    store: Arc<dyn StudentStore>,
}

impl StudentService {
    /// Create a new [`StudentService`].
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    /// Persist a new student, rejecting duplicated emails.
    pub async fn create(&self, payload: StudentPayload) -> Result<Student> {
        tracing::debug!(email = %payload.email, "creating student");

        // Early rejection. The unique index on `email` stays authoritative
        // against concurrent creates.
        if self.store.email_exists(&payload.email).await? {
            return Err(ServerError::Duplicate {
                resource: "student",
                field: "email",
                value: payload.email,
            });
        }

        let now = Utc::now();
        let student = Student {
            id: String::default(),
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone_number: payload.phone_number,
            address: payload.address,
            department: payload.department,
            year: payload.year,
            gpa: payload.gpa,
            courses: payload.courses.unwrap_or_default(),
            status: payload.status.or_else(|| Some(DEFAULT_STATUS.to_owned())),
            created_at: now,
            updated_at: now,
        };

        self.store.insert(student).await
    }

    /// Find a student using the `id` field.
    pub async fn get_by_id(&self, id: &str) -> Result<Student> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServerError::NotFound("student"))
    }

    /// Find a student using the `email` field.
    pub async fn get_by_email(&self, email: &str) -> Result<Student> {
        self.store
            .find_by_email(email)
            .await?
            .ok_or(ServerError::NotFound("student"))
    }

    /// All students, storage order.
    pub async fn list(&self) -> Result<Vec<Student>> {
        self.store.all().await
    }

    /// Full-replace of the scalar fields of an existing record.
    ///
    /// `courses` and `created_at` are left untouched.
    pub async fn update(&self, id: &str, payload: StudentPayload) -> Result<Student> {
        tracing::debug!(%id, "updating student");

        let mut student = self.get_by_id(id).await?;

        if payload.email != student.email && self.store.email_exists(&payload.email).await? {
            return Err(ServerError::Duplicate {
                resource: "student",
                field: "email",
                value: payload.email,
            });
        }

        student.first_name = payload.first_name;
        student.last_name = payload.last_name;
        student.email = payload.email;
        student.phone_number = payload.phone_number;
        student.address = payload.address;
        student.department = payload.department;
        student.year = payload.year;
        student.gpa = payload.gpa;
        student.status = payload.status;
        student.updated_at = Utc::now();

        self.store.update(&student).await?;
        Ok(student)
    }

    /// Remove a student and its owned courses.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let student = self.get_by_id(id).await?;

        tracing::debug!(id = %student.id, "deleting student");
        self.store.delete(&student.id).await
    }

    pub async fn by_department(&self, department: &str) -> Result<Vec<Student>> {
        self.store.by_department(department).await
    }

    pub async fn by_status(&self, status: &str) -> Result<Vec<Student>> {
        self.store.by_status(status).await
    }

    pub async fn by_year(&self, year: i32) -> Result<Vec<Student>> {
        self.store.by_year(year).await
    }

    /// Case-insensitive, unanchored substring search on `firstName`.
    pub async fn search_by_first_name(&self, fragment: &str) -> Result<Vec<Student>> {
        self.store.by_first_name_contains(fragment).await
    }

    /// Case-insensitive, unanchored substring search on `lastName`.
    pub async fn search_by_last_name(&self, fragment: &str) -> Result<Vec<Student>> {
        self.store.by_last_name_contains(fragment).await
    }

    /// Students with `gpa >= threshold`; records without a gpa are excluded.
    pub async fn by_minimum_gpa(&self, threshold: f64) -> Result<Vec<Student>> {
        self.store.by_gpa_at_least(threshold).await
    }
}
