//! Student roster scenarios: listing, bulk import, deletion

use async_trait::async_trait;
use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;

use crate::common::{Error, Result};
use crate::http::{Attachment, CallSpec};
use crate::testing::TestRun;

use super::workbook::{self, XLSX_MIME};
use super::{Outcome, Scenario, ScenarioInfo};

/// Column headings expected by the import endpoint
pub const IMPORT_COLUMNS: [&str; 7] = [
    "Roll Number",
    "Full Name",
    "Department",
    "Year",
    "DOB",
    "Email",
    "Phone Number",
];

/// Rows uploaded by the import scenario. CS002 already exists on the server
/// and must be reported as skipped.
pub const IMPORT_ROWS: [[&str; 7]; 3] = [
    [
        "CS002",
        "Jane Smith",
        "Computer Science",
        "2",
        "2002-08-20",
        "jane@example.com",
        "9876543210",
    ],
    [
        "CS006",
        "New Student 1",
        "Computer Science",
        "1",
        "2003-05-15",
        "new1@example.com",
        "9876543211",
    ],
    [
        "CS007",
        "New Student 2",
        "Electronics",
        "3",
        "2001-12-10",
        "new2@example.com",
        "9876543212",
    ],
];

/// Roll number in `IMPORT_ROWS` that duplicates an existing record
pub const DUPLICATE_ROLL_NUMBER: &str = "CS002";

/// Records the delete scenario may remove; both are created by the import
pub const DELETE_CANDIDATES: [&str; 2] = ["CS006", "CS007"];

pub const IMPORT_FILE_NAME: &str = "test_students.xlsx";

/// The fields of a student record the scenarios rely on
#[derive(Debug, Clone, Deserialize)]
pub struct StudentRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl StudentRecord {
    /// Record id as a path segment
    pub fn id_segment(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Fetch `GET /students` and print a short preview
///
/// Returns `None` when the call itself failed.
pub async fn list_students(run: &mut TestRun) -> Result<Option<Vec<StudentRecord>>> {
    let result = run
        .call(CallSpec::get("Get Students List", "students", 200))
        .await;
    if !result.success {
        return Ok(None);
    }

    let students = parse_students(result.body)?;
    println!("   Found {} students", students.len());
    for student in students.iter().take(3) {
        println!(
            "   - {}: {}",
            student.roll_number.as_deref().unwrap_or("-"),
            student.full_name.as_deref().unwrap_or("-")
        );
    }
    Ok(Some(students))
}

fn parse_students(body: Value) -> Result<Vec<StudentRecord>> {
    match body {
        Value::Array(_) => serde_json::from_value(body).map_err(|e| {
            Error::unexpected_response("students", &format!("malformed student record: {e}"))
        }),
        // Unparseable bodies come back as an empty object
        Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        _ => Err(Error::unexpected_response(
            "students",
            "expected an array of student records",
        )),
    }
}

static LIST_INFO: ScenarioInfo = ScenarioInfo {
    name: "Get Students",
    requires: &["Admin Login"],
    critical: false,
};

/// `GET /students` as admin
pub struct GetStudents;

#[async_trait]
impl Scenario for GetStudents {
    fn info(&self) -> &ScenarioInfo {
        &LIST_INFO
    }

    async fn run(&self, run: &mut TestRun) -> Result<Outcome> {
        Ok(match list_students(run).await? {
            Some(_) => Outcome::Passed,
            None => Outcome::Failed("could not list students".to_string()),
        })
    }
}

static UPLOAD_INFO: ScenarioInfo = ScenarioInfo {
    name: "Excel Upload",
    requires: &["Admin Login"],
    critical: false,
};

/// Multipart upload of a generated workbook to `POST /students/upload-excel`
pub struct ExcelUpload;

/// Header row followed by the fixture rows
pub fn import_rows() -> Vec<Vec<&'static str>> {
    let mut rows = Vec::with_capacity(IMPORT_ROWS.len() + 1);
    rows.push(IMPORT_COLUMNS.to_vec());
    rows.extend(IMPORT_ROWS.iter().map(|row| row.to_vec()));
    rows
}

#[async_trait]
impl Scenario for ExcelUpload {
    fn info(&self) -> &ScenarioInfo {
        &UPLOAD_INFO
    }

    async fn run(&self, run: &mut TestRun) -> Result<Outcome> {
        let data = workbook::write_xlsx(&import_rows())?;
        let spec = CallSpec::post("Excel Upload", "students/upload-excel", 200)
            .with_attachment(Attachment::new("file", IMPORT_FILE_NAME, XLSX_MIME, data));

        let result = run.call(spec).await;
        if result.success {
            println!("   Added: {}", body_field(&result.body, "added", "0"));
            println!("   Skipped: {}", body_field(&result.body, "skipped", "0"));
            println!("   Message: {}", body_field(&result.body, "message", ""));
        }
        Ok(Outcome::from_call(&result))
    }
}

/// Render a response field as the server sent it
fn body_field(body: &Value, key: &str, default: &str) -> String {
    match body.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    }
}

static DELETE_INFO: ScenarioInfo = ScenarioInfo {
    name: "Delete Student",
    requires: &["Excel Upload"],
    critical: false,
};

/// Deletes one of the imported records via `DELETE /students/{id}`
pub struct DeleteStudent;

#[async_trait]
impl Scenario for DeleteStudent {
    fn info(&self) -> &ScenarioInfo {
        &DELETE_INFO
    }

    async fn run(&self, run: &mut TestRun) -> Result<Outcome> {
        let Some(students) = list_students(run).await? else {
            return Ok(Outcome::Failed("could not list students".to_string()));
        };

        let Some(target) = find_candidate(&students) else {
            println!(
                "   {}",
                format!(
                    "No test student ({}) found to delete",
                    DELETE_CANDIDATES.join("/")
                )
                .yellow()
            );
            return Ok(Outcome::Failed(format!(
                "no student with roll number in {:?}",
                DELETE_CANDIDATES
            )));
        };

        let roll_number = target.roll_number.clone().unwrap_or_default();
        let id = target.id_segment().ok_or_else(|| {
            Error::unexpected_response("students", &format!("record {roll_number} has no id"))
        })?;

        let result = run
            .call(CallSpec::delete(
                format!("Delete Student {roll_number}"),
                format!("students/{id}"),
                200,
            ))
            .await;

        if result.success {
            println!("   Successfully deleted student {roll_number}");
        }
        Ok(Outcome::from_call(&result))
    }
}

fn find_candidate(students: &[StudentRecord]) -> Option<&StudentRecord> {
    students.iter().find(|s| {
        s.roll_number
            .as_deref()
            .is_some_and(|roll| DELETE_CANDIDATES.contains(&roll))
    })
}
