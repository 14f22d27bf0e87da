use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse roster: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid roster: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RosterEntry {
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    pub name: String,
}

impl RosterEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Integer(n) => n.to_string(),
        }
    }
}

// Student numbers are usually written unquoted in YAML.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Scalar::into_string)
}

/// Either a list of `{id, name}` entries or an `id: name` mapping.
#[derive(Deserialize)]
#[serde(untagged)]
enum RosterFile {
    List(Vec<RosterEntry>),
    Map(serde_yaml::Mapping),
}

pub fn parse_roster(content: &str) -> Result<Vec<RosterEntry>, RosterError> {
    let entries = match serde_yaml::from_str::<RosterFile>(content)? {
        RosterFile::List(entries) => entries,
        RosterFile::Map(mapping) => mapping
            .into_iter()
            .map(|(id, name)| {
                let id = match id {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    other => {
                        return Err(RosterError::Invalid(format!(
                            "roster id must be a string or number, got {:?}",
                            other
                        )));
                    }
                };
                let name = name
                    .as_str()
                    .ok_or_else(|| RosterError::Invalid(format!("name for {} must be a string", id)))?
                    .to_string();
                Ok(RosterEntry { id, name })
            })
            .collect::<Result<Vec<_>, _>>()?,
    };

    for entry in &entries {
        if entry.id.trim().is_empty() || entry.name.trim().is_empty() {
            return Err(RosterError::Invalid(format!(
                "roster entry has an empty id or name: {:?}",
                entry
            )));
        }
    }

    Ok(entries)
}

#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn load(&self) -> Result<Vec<RosterEntry>, RosterError>;
}

pub struct FileRosterSource {
    path: PathBuf,
}

impl FileRosterSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RosterSource for FileRosterSource {
    async fn load(&self) -> Result<Vec<RosterEntry>, RosterError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_roster(&content)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::{FileRosterSource, RosterEntry, RosterError, RosterSource, parse_roster};

    #[test]
    fn list_form_accepts_numeric_ids() {
        let roster = parse_roster("- id: 2301\n  name: 강정민\n- id: \"2302\"\n  name: 김민수\n")
            .expect("list roster");

        assert_eq!(
            roster,
            vec![
                RosterEntry::new("2301", "강정민"),
                RosterEntry::new("2302", "김민수"),
            ]
        );
    }

    #[test]
    fn mapping_form_keeps_file_order() {
        let roster = parse_roster("2305: 이서연\n2301: 강정민\n").expect("map roster");

        assert_eq!(roster[0], RosterEntry::new("2305", "이서연"));
        assert_eq!(roster[1], RosterEntry::new("2301", "강정민"));
    }

    #[test]
    fn json_list_is_accepted() {
        let roster = parse_roster(r#"[{"id": "2301", "name": "강정민"}]"#).expect("json roster");
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn blank_names_are_rejected() {
        let err = parse_roster("- id: 2301\n  name: \"  \"\n").expect_err("blank name");
        assert!(matches!(err, RosterError::Invalid(_)));
    }

    #[tokio::test]
    async fn file_source_loads_roster() {
        let mut file = NamedTempFile::new().expect("temp roster");
        write!(file, "2301: 강정민\n2302: 김민수\n").expect("write roster");

        let roster = FileRosterSource::new(file.path())
            .load()
            .await
            .expect("load roster");

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[1].name, "김민수");
    }
}
