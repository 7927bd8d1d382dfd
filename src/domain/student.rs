//! Student domain model

use super::common::StringUuid;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Phone number embedded in a student. Addressed by its position only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    pub ddd: i32,
    pub number: i64,
    #[serde(default)]
    pub description: Option<String>,
}

impl PhoneNumber {
    /// Apply a partial update.
    ///
    /// `ddd` and `number` keep their current value when the patch omits them
    /// or sends `0`. `description` keeps its value only when omitted or null;
    /// an empty string overwrites.
    pub fn merge(&mut self, patch: PatchPhoneNumberInput) {
        if let Some(ddd) = patch.ddd.filter(|v| *v != 0) {
            self.ddd = ddd;
        }
        if let Some(number) = patch.number.filter(|v| *v != 0) {
            self.number = number;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
    }
}

/// Current time at the precision of the `DATETIME(6)` columns.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Student aggregate root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[schema(value_type = String, format = Uuid)]
    pub id: StringUuid,
    pub name: String,
    pub enrollment: String,
    pub email: String,
    pub course_curriculum: String,
    #[sqlx(json)]
    pub phone_numbers: Vec<PhoneNumber>,
    #[sqlx(json)]
    #[schema(value_type = Vec<String>)]
    pub classes: Vec<StringUuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Build a new student with a fresh id. Fields are copied verbatim.
    pub fn new(input: CreateStudentInput) -> Self {
        let now = now();
        Self {
            id: StringUuid::new_v4(),
            name: input.name,
            enrollment: input.enrollment,
            email: input.email,
            course_curriculum: input.course_curriculum,
            phone_numbers: input.phone_numbers,
            classes: input.classes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every field the input supplies; absent fields keep their value.
    /// List fields are replaced whole.
    pub fn apply_update(&mut self, input: UpdateStudentInput) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(enrollment) = input.enrollment {
            self.enrollment = enrollment;
        }
        if let Some(email) = input.email {
            self.email = email;
        }
        if let Some(course_curriculum) = input.course_curriculum {
            self.course_curriculum = course_curriculum;
        }
        if let Some(phone_numbers) = input.phone_numbers {
            self.phone_numbers = phone_numbers;
        }
        if let Some(classes) = input.classes {
            self.classes = classes;
        }
    }

    /// Resolve a signed position against the phone list.
    pub fn phone_index(&self, index: i64) -> Option<usize> {
        usize::try_from(index)
            .ok()
            .filter(|i| *i < self.phone_numbers.len())
    }
}

/// Input for creating a new student.
///
/// Missing or null fields deserialize to empty values so the validator
/// reports them per field instead of the body being rejected as a whole.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentInput {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, max = 255, message = "enrollment must be 1 to 255 characters"))]
    pub enrollment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(
        email(message = "email must be a valid address"),
        length(max = 320, message = "email must be at most 320 characters")
    )]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "courseCurriculum is required"))]
    pub course_curriculum: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_numbers: Vec<PhoneNumber>,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "at least one class is required"))]
    #[schema(value_type = Vec<String>)]
    pub classes: Vec<StringUuid>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Input for updating a student. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentInput {
    pub name: Option<String>,
    #[validate(length(max = 255, message = "enrollment must be at most 255 characters"))]
    pub enrollment: Option<String>,
    #[validate(
        email(message = "email must be a valid address"),
        length(max = 320, message = "email must be at most 320 characters")
    )]
    pub email: Option<String>,
    pub course_curriculum: Option<String>,
    pub phone_numbers: Option<Vec<PhoneNumber>>,
    #[validate(length(min = 1, message = "classes cannot be emptied"))]
    #[schema(value_type = Option<Vec<String>>)]
    pub classes: Option<Vec<StringUuid>>,
}

/// Partial phone number update. See [`PhoneNumber::merge`].
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchPhoneNumberInput {
    pub ddd: Option<i32>,
    pub number: Option<i64>,
    pub description: Option<String>,
}

/// Student list filter. All present criteria must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentFilter {
    /// Case-sensitive substring of the name
    pub name: Option<String>,
    /// Exact enrollment
    pub enrollment: Option<String>,
    /// Exact email
    pub email: Option<String>,
}

impl StudentFilter {
    /// Drop empty criteria so that `?name=` behaves like an omitted parameter.
    pub fn normalized(self) -> Self {
        fn keep(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.is_empty())
        }
        Self {
            name: keep(self.name),
            enrollment: keep(self.enrollment),
            email: keep(self.email),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.enrollment.is_none() && self.email.is_none()
    }

    pub fn matches(&self, student: &Student) -> bool {
        self.name
            .as_deref()
            .map_or(true, |name| student.name.contains(name))
            && self
                .enrollment
                .as_deref()
                .map_or(true, |enrollment| student.enrollment == enrollment)
            && self
                .email
                .as_deref()
                .map_or(true, |email| student.email == email)
    }
}
