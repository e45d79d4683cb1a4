//! Whole-batch validation of data type models.
//!
//! Runs before anything is written. Every problem in the batch is collected
//! so an operator can fix all of them in one pass.

use std::collections::BTreeMap;
use std::fmt;

use jet_core::{DataTypeModel, EditorAlias, StableId};

/// One problem found in a batch of models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyName { index: usize },
    EmptyEditor { name: String },
    /// Several models declare the same stable id.
    DuplicateId { id: StableId, names: Vec<String> },
    /// Several models would match the same existing definition.
    DuplicateNameAndEditor {
        name: String,
        editor: EditorAlias,
        count: usize,
    },
    /// Models share a name but not an editor; the CMS keeps names unique.
    DuplicateName {
        name: String,
        editors: Vec<EditorAlias>,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyName { index } => {
                write!(f, "model #{index} has an empty name")
            }
            ValidationIssue::EmptyEditor { name } => {
                write!(f, "data type '{name}' has no editor alias")
            }
            ValidationIssue::DuplicateId { id, names } => {
                write!(f, "id {id} is declared by {}", names.join(", "))
            }
            ValidationIssue::DuplicateNameAndEditor {
                name,
                editor,
                count,
            } => write!(f, "{count} data types named '{name}' use editor '{editor}'"),
            ValidationIssue::DuplicateName { name, editors } => {
                let editors: Vec<_> = editors.iter().map(EditorAlias::as_str).collect();
                write!(
                    f,
                    "name '{name}' is used with different editors: {}",
                    editors.join(", ")
                )
            }
        }
    }
}

/// Aggregate of every [`ValidationIssue`] in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationIssue>);

impl ValidationErrors {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} problem(s)", self.0.len())?;
        for (i, issue) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a batch of models.
pub fn validate(models: &[DataTypeModel]) -> Result<(), ValidationErrors> {
    let mut issues = Vec::new();

    let mut by_id: BTreeMap<StableId, Vec<String>> = BTreeMap::new();
    let mut by_name: BTreeMap<&str, Vec<&EditorAlias>> = BTreeMap::new();

    for (index, model) in models.iter().enumerate() {
        if model.name.trim().is_empty() {
            issues.push(ValidationIssue::EmptyName { index });
            continue;
        }
        if model.editor.as_str().trim().is_empty() {
            issues.push(ValidationIssue::EmptyEditor {
                name: model.name.clone(),
            });
        }
        if let Some(id) = model.id {
            by_id.entry(id).or_default().push(model.name.clone());
        }
        by_name.entry(model.name.as_str()).or_default().push(&model.editor);
    }

    for (id, names) in by_id {
        if names.len() > 1 {
            issues.push(ValidationIssue::DuplicateId { id, names });
        }
    }

    for (name, editors) in by_name {
        let mut counts: BTreeMap<&EditorAlias, usize> = BTreeMap::new();
        for editor in &editors {
            *counts.entry(*editor).or_default() += 1;
        }
        for (editor, count) in &counts {
            if *count > 1 {
                issues.push(ValidationIssue::DuplicateNameAndEditor {
                    name: name.to_owned(),
                    editor: (*editor).clone(),
                    count: *count,
                });
            }
        }
        if counts.len() > 1 {
            issues.push(ValidationIssue::DuplicateName {
                name: name.to_owned(),
                editors: counts.keys().map(|e| (*e).clone()).collect(),
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(issues))
    }
}
