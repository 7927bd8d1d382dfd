//! Student business logic: aggregate CRUD and the phone number sub-resource

use crate::domain::{
    self, CreateStudentInput, PatchPhoneNumberInput, PhoneNumber, StringUuid, Student,
    StudentFilter, UpdateStudentInput,
};
use crate::error::{AppError, Result};
use crate::repository::StudentRepository;
use std::sync::Arc;
use tracing::debug;

pub struct StudentService<R: StudentRepository> {
    repo: Arc<R>,
}

impl<R: StudentRepository> StudentService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Input is expected to be validated by the caller.
    pub async fn create(&self, input: CreateStudentInput) -> Result<Student> {
        let student = Student::new(input);
        self.repo.add(&student).await?;
        Ok(student)
    }

    pub async fn get(&self, id: StringUuid) -> Result<Student> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student {} not found", id)))
    }

    pub async fn list(&self, filter: StudentFilter) -> Result<Vec<Student>> {
        let filter = filter.normalized();
        if filter.is_empty() {
            self.repo.list_all().await
        } else {
            self.repo.find(&filter).await
        }
    }

    /// Null-coalescing update. An unknown id is a silent no-op and yields `None`.
    pub async fn update(
        &self,
        id: StringUuid,
        input: UpdateStudentInput,
    ) -> Result<Option<Student>> {
        let Some(mut student) = self.repo.find_by_id(id).await? else {
            debug!(student_id = %id, "Update skipped, student does not exist");
            return Ok(None);
        };

        student.apply_update(input);
        student.updated_at = domain::now();
        self.repo.update(&student).await?;
        Ok(Some(student))
    }

    /// Idempotent: deleting an unknown id succeeds.
    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        self.repo.delete(id).await
    }

    // ---- phone numbers -------------------------------------------------

    /// Append a phone number. Returns its position and value.
    pub async fn add_phone_number(
        &self,
        student_id: StringUuid,
        phone: PhoneNumber,
    ) -> Result<(usize, PhoneNumber)> {
        let mut student = self.get(student_id).await?;
        student.phone_numbers.push(phone.clone());
        let index = student.phone_numbers.len() - 1;
        self.save(&mut student).await?;
        Ok((index, phone))
    }

    pub async fn list_phone_numbers(&self, student_id: StringUuid) -> Result<Vec<PhoneNumber>> {
        Ok(self.get(student_id).await?.phone_numbers)
    }

    pub async fn get_phone_number(
        &self,
        student_id: StringUuid,
        index: i64,
    ) -> Result<PhoneNumber> {
        let mut student = self.get(student_id).await?;
        let i = locate(&student, index)?;
        Ok(student.phone_numbers.swap_remove(i))
    }

    /// Replace all fields of the phone number at `index`.
    pub async fn replace_phone_number(
        &self,
        student_id: StringUuid,
        index: i64,
        phone: PhoneNumber,
    ) -> Result<PhoneNumber> {
        let mut student = self.get(student_id).await?;
        let i = locate(&student, index)?;
        student.phone_numbers[i] = phone.clone();
        self.save(&mut student).await?;
        Ok(phone)
    }

    /// Partial update of the phone number at `index`. See [`PhoneNumber::merge`].
    pub async fn merge_phone_number(
        &self,
        student_id: StringUuid,
        index: i64,
        patch: PatchPhoneNumberInput,
    ) -> Result<PhoneNumber> {
        let mut student = self.get(student_id).await?;
        let i = locate(&student, index)?;
        student.phone_numbers[i].merge(patch);
        let merged = student.phone_numbers[i].clone();
        self.save(&mut student).await?;
        Ok(merged)
    }

    /// Remove the phone number at `index`; later entries shift left.
    pub async fn remove_phone_number(&self, student_id: StringUuid, index: i64) -> Result<()> {
        let mut student = self.get(student_id).await?;
        let i = locate(&student, index)?;
        student.phone_numbers.remove(i);
        self.save(&mut student).await
    }

    async fn save(&self, student: &mut Student) -> Result<()> {
        student.updated_at = domain::now();
        self.repo.update(student).await
    }
}

fn locate(student: &Student, index: i64) -> Result<usize> {
    student
        .phone_index(index)
        .ok_or(AppError::IndexOutOfRange {
            index,
            len: student.phone_numbers.len(),
        })
}
