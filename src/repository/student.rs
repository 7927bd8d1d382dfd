//! Student repository

use crate::domain::{Student, StudentFilter, StringUuid};
use crate::error::{map_conflict_if_duplicate, AppError, Result};
use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

const SELECT_STUDENTS: &str = r#"
    SELECT id, name, enrollment, email, course_curriculum, phone_numbers, classes,
           created_at, updated_at
    FROM students
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn add(&self, student: &Student) -> Result<()>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Student>>;
    async fn list_all(&self) -> Result<Vec<Student>>;
    async fn find(&self, filter: &StudentFilter) -> Result<Vec<Student>>;
    /// Persist the whole aggregate, embedded collections included.
    async fn update(&self, student: &Student) -> Result<()>;
    /// Removing an unknown id is not an error.
    async fn delete(&self, id: StringUuid) -> Result<()>;
}

pub struct StudentRepositoryImpl {
    pool: MySqlPool,
}

impl StudentRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| AppError::Internal(e.into()))
}

#[async_trait]
impl StudentRepository for StudentRepositoryImpl {
    async fn add(&self, student: &Student) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO students (id, name, enrollment, email, course_curriculum,
                                  phone_numbers, classes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(student.id)
        .bind(&student.name)
        .bind(&student.enrollment)
        .bind(&student.email)
        .bind(&student.course_curriculum)
        .bind(to_json(&student.phone_numbers)?)
        .bind(to_json(&student.classes)?)
        .bind(student.created_at)
        .bind(student.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_conflict_if_duplicate)?;

        Ok(())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!("{SELECT_STUDENTS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(student)
    }

    async fn list_all(&self) -> Result<Vec<Student>> {
        let students =
            sqlx::query_as::<_, Student>(&format!("{SELECT_STUDENTS} ORDER BY created_at, id"))
                .fetch_all(&self.pool)
                .await?;

        Ok(students)
    }

    async fn find(&self, filter: &StudentFilter) -> Result<Vec<Student>> {
        let mut query = QueryBuilder::<MySql>::new(SELECT_STUDENTS);
        query.push(" WHERE 1 = 1");

        // Columns use a binary collation, so LOCATE and = are case-sensitive.
        if let Some(name) = &filter.name {
            query
                .push(" AND LOCATE(")
                .push_bind(name)
                .push(", name) > 0");
        }
        if let Some(enrollment) = &filter.enrollment {
            query.push(" AND enrollment = ").push_bind(enrollment);
        }
        if let Some(email) = &filter.email {
            query.push(" AND email = ").push_bind(email);
        }
        query.push(" ORDER BY created_at, id");

        let students = query
            .build_query_as::<Student>()
            .fetch_all(&self.pool)
            .await?;

        Ok(students)
    }

    async fn update(&self, student: &Student) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE students
            SET name = ?, enrollment = ?, email = ?, course_curriculum = ?,
                phone_numbers = ?, classes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&student.name)
        .bind(&student.enrollment)
        .bind(&student.email)
        .bind(&student.course_curriculum)
        .bind(to_json(&student.phone_numbers)?)
        .bind(to_json(&student.classes)?)
        .bind(student.updated_at)
        .bind(student.id)
        .execute(&self.pool)
        .await
        .map_err(map_conflict_if_duplicate)?;

        Ok(())
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
