use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "Backend Developer")]
    BackendDeveloper,
    #[serde(rename = "Frontend Developer")]
    FrontendDeveloper,
    #[serde(rename = "Data Scientist")]
    DataScientist,
    #[serde(rename = "AI/ML Engineer")]
    AiMlEngineer,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::BackendDeveloper,
        Position::FrontendDeveloper,
        Position::DataScientist,
        Position::AiMlEngineer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::BackendDeveloper => "Backend Developer",
            Position::FrontendDeveloper => "Frontend Developer",
            Position::DataScientist => "Data Scientist",
            Position::AiMlEngineer => "AI/ML Engineer",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    India,
    Europe,
    #[serde(rename = "USA")]
    Usa,
    Remote,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::India, Region::Europe, Region::Usa, Region::Remote];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::India => "India",
            Region::Europe => "Europe",
            Region::Usa => "USA",
            Region::Remote => "Remote",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The primary technology offered in the tech-stack picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimaryTech {
    Python,
    Java,
    JavaScript,
    #[serde(rename = "Machine Learning")]
    MachineLearning,
}

impl PrimaryTech {
    pub const ALL: [PrimaryTech; 4] = [
        PrimaryTech::Python,
        PrimaryTech::Java,
        PrimaryTech::JavaScript,
        PrimaryTech::MachineLearning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryTech::Python => "Python",
            PrimaryTech::Java => "Java",
            PrimaryTech::JavaScript => "JavaScript",
            PrimaryTech::MachineLearning => "Machine Learning",
        }
    }
}

impl fmt::Display for PrimaryTech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the stored tech-stack string: the primary technology followed by
/// the non-blank comma-separated extras, joined with ", ".
pub fn compose_tech_stack(primary: PrimaryTech, extras: &str) -> String {
    std::iter::once(primary.as_str())
        .chain(extras.split(',').map(str::trim).filter(|s| !s.is_empty()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Candidate fields in the order the dialogue collects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateField {
    Name,
    Email,
    Phone,
    Experience,
    Position,
    Location,
    TechStack,
}

impl CandidateField {
    pub const ORDER: [CandidateField; 7] = [
        CandidateField::Name,
        CandidateField::Email,
        CandidateField::Phone,
        CandidateField::Experience,
        CandidateField::Position,
        CandidateField::Location,
        CandidateField::TechStack,
    ];
}

impl fmt::Display for CandidateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CandidateField::Name => "name",
            CandidateField::Email => "email",
            CandidateField::Phone => "phone",
            CandidateField::Experience => "experience",
            CandidateField::Position => "position",
            CandidateField::Location => "location",
            CandidateField::TechStack => "tech_stack",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("cannot set '{field}' before '{expected}'")]
    OutOfOrder {
        field: CandidateField,
        expected: CandidateField,
    },

    #[error("'{0}' is already set")]
    AlreadySet(CandidateField),

    #[error("record is incomplete: '{0}' is missing")]
    Incomplete(CandidateField),
}

/// Profile accumulated over one screening session.
///
/// Fields fill strictly in `CandidateField::ORDER`; the setters refuse to skip
/// ahead or overwrite. Only a full session reset clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tech_stack: Option<String>,
}

impl CandidateRecord {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn experience(&self) -> Option<u32> {
        self.experience
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn location(&self) -> Option<Region> {
        self.location
    }

    pub fn tech_stack(&self) -> Option<&str> {
        self.tech_stack.as_deref()
    }

    fn is_set(&self, field: CandidateField) -> bool {
        match field {
            CandidateField::Name => self.name.is_some(),
            CandidateField::Email => self.email.is_some(),
            CandidateField::Phone => self.phone.is_some(),
            CandidateField::Experience => self.experience.is_some(),
            CandidateField::Position => self.position.is_some(),
            CandidateField::Location => self.location.is_some(),
            CandidateField::TechStack => self.tech_stack.is_some(),
        }
    }

    /// The first field not yet collected, or `None` when the record is complete.
    pub fn next_field(&self) -> Option<CandidateField> {
        CandidateField::ORDER
            .into_iter()
            .find(|field| !self.is_set(*field))
    }

    /// Fails with `Incomplete` naming the first missing field.
    pub fn ensure_complete(&self) -> Result<(), RecordError> {
        match self.next_field() {
            Some(field) => Err(RecordError::Incomplete(field)),
            None => Ok(()),
        }
    }

    fn check_next(&self, field: CandidateField) -> Result<(), RecordError> {
        if self.is_set(field) {
            return Err(RecordError::AlreadySet(field));
        }
        match self.next_field() {
            Some(expected) if expected != field => Err(RecordError::OutOfOrder { field, expected }),
            _ => Ok(()),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), RecordError> {
        self.check_next(CandidateField::Name)?;
        self.name = Some(name.into());
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), RecordError> {
        self.check_next(CandidateField::Email)?;
        self.email = Some(email.into());
        Ok(())
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) -> Result<(), RecordError> {
        self.check_next(CandidateField::Phone)?;
        self.phone = Some(phone.into());
        Ok(())
    }

    pub fn set_experience(&mut self, years: u32) -> Result<(), RecordError> {
        self.check_next(CandidateField::Experience)?;
        self.experience = Some(years);
        Ok(())
    }

    pub fn set_position(&mut self, position: Position) -> Result<(), RecordError> {
        self.check_next(CandidateField::Position)?;
        self.position = Some(position);
        Ok(())
    }

    pub fn set_location(&mut self, location: Region) -> Result<(), RecordError> {
        self.check_next(CandidateField::Location)?;
        self.location = Some(location);
        Ok(())
    }

    pub fn set_tech_stack(&mut self, tech_stack: impl Into<String>) -> Result<(), RecordError> {
        self.check_next(CandidateField::TechStack)?;
        self.tech_stack = Some(tech_stack.into());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn complete_record() -> CandidateRecord {
    let mut record = CandidateRecord::default();
    record.set_name("Alice Example").unwrap();
    record.set_email("alice@example.com").unwrap();
    record.set_phone("5551234567").unwrap();
    record.set_experience(4).unwrap();
    record.set_position(Position::BackendDeveloper).unwrap();
    record.set_location(Region::Europe).unwrap();
    record.set_tech_stack("Python, Django, SQL").unwrap();
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_fill_in_order() {
        let mut record = CandidateRecord::default();
        assert_eq!(record.next_field(), Some(CandidateField::Name));
        record.set_name("Alice").unwrap();
        assert_eq!(record.next_field(), Some(CandidateField::Email));
    }

    #[test]
    fn test_skipping_ahead_is_rejected() {
        let mut record = CandidateRecord::default();
        record.set_name("Alice").unwrap();
        let err = record.set_phone("5551234567").unwrap_err();
        assert_eq!(
            err,
            RecordError::OutOfOrder {
                field: CandidateField::Phone,
                expected: CandidateField::Email,
            }
        );
        assert!(record.phone().is_none());
    }

    #[test]
    fn test_set_field_cannot_be_overwritten() {
        let mut record = CandidateRecord::default();
        record.set_name("Alice").unwrap();
        assert_eq!(
            record.set_name("Bob"),
            Err(RecordError::AlreadySet(CandidateField::Name))
        );
        assert_eq!(record.name(), Some("Alice"));
    }

    #[test]
    fn test_complete_record() {
        let record = complete_record();
        assert!(record.ensure_complete().is_ok());
        assert_eq!(record.next_field(), None);
    }

    #[test]
    fn test_incomplete_record_names_missing_field() {
        let mut record = CandidateRecord::default();
        record.set_name("Alice").unwrap();
        assert_eq!(
            record.ensure_complete(),
            Err(RecordError::Incomplete(CandidateField::Email))
        );
    }

    #[test]
    fn test_serializes_with_display_names() {
        let json = serde_json::to_value(complete_record()).unwrap();
        assert_eq!(json["position"], "Backend Developer");
        assert_eq!(json["location"], "Europe");
        assert_eq!(json["experience"], 4);
        assert_eq!(json["tech_stack"], "Python, Django, SQL");
    }

    #[test]
    fn test_enum_serde_matches_display() {
        for position in Position::ALL {
            let json = serde_json::to_string(&position).unwrap();
            assert_eq!(json, format!("\"{position}\""));
        }
        for region in Region::ALL {
            let json = serde_json::to_string(&region).unwrap();
            assert_eq!(json, format!("\"{region}\""));
        }
        for tech in PrimaryTech::ALL {
            let json = serde_json::to_string(&tech).unwrap();
            assert_eq!(json, format!("\"{tech}\""));
        }
    }

    #[test]
    fn test_compose_tech_stack_primary_only() {
        assert_eq!(compose_tech_stack(PrimaryTech::Java, ""), "Java");
        assert_eq!(compose_tech_stack(PrimaryTech::Java, "   "), "Java");
    }

    #[test]
    fn test_compose_tech_stack_with_extras() {
        assert_eq!(
            compose_tech_stack(PrimaryTech::Python, " Django, ,SQL ,Docker,"),
            "Python, Django, SQL, Docker"
        );
    }
}
