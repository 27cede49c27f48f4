//! Supabase cloud project model

use serde::{Deserialize, Serialize};

/// A project entry returned by the Supabase Management API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
}

impl Project {
    /// Name shown to the user, falling back to the project id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_id() {
        let mut project = Project {
            id: "abcd".to_string(),
            name: None,
            region: None,
            organization_id: None,
        };
        assert_eq!(project.display_name(), "abcd");

        project.name = Some("Production".to_string());
        assert_eq!(project.display_name(), "Production");
    }
}
