//! Classifiers live inside a group: `<group>/<classifier>/info.json`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::dir::{INFO_FILE, README_FILE};
use super::group::AssociationDisplay;
use super::slug::{validate_name, validate_slug};
use super::{
    create_populated_dir, list_subdirectories, random_color, read_text, read_validated,
    seed_readme, write_json, write_text, DataDirectory, DataError,
};
use crate::schema::CLASSIFIER_INFO;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Shown everywhere
    #[default]
    Visible,
    /// Reachable, but left out of the site menu
    Unlisted,
}

/// How to display associations to the labels of another classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierAssociation {
    pub title: String,
    pub display: AssociationDisplay,
    /// Show labels that associate to this one instead of labels this one
    /// associates to
    pub reverse_lookup: bool,
}

/// Contents of a classifier's `info.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierInfo {
    pub name: String,
    pub description: String,
    pub color: String,
    /// Higher values are placed earlier in lists
    pub sort: i64,
    pub filter_classifiers: Vec<String>,
    pub visibility: Visibility,
    /// Keyed by the slug of the associated classifier
    pub associations: BTreeMap<String, ClassifierAssociation>,
    pub extras: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct ClassifierStore {
    dir: DataDirectory,
}

impl ClassifierStore {
    pub fn new(dir: DataDirectory) -> Self {
        Self { dir }
    }

    fn classifier_dir(&self, group_id: &str, classifier_id: &str) -> Result<PathBuf, DataError> {
        validate_slug(group_id)?;
        validate_slug(classifier_id)?;
        Ok(self.dir.group_dir(group_id).join(classifier_id))
    }

    /// IDs of the classifiers within a group, in listing order
    pub async fn list(&self, group_id: &str) -> Result<Vec<String>, DataError> {
        validate_slug(group_id)?;
        let group_dir = self.dir.group_dir(group_id);
        if !tokio::fs::try_exists(&group_dir).await.unwrap_or(false) {
            return Err(DataError::NotFound(group_id.to_string()));
        }
        list_subdirectories(&group_dir).await
    }

    pub async fn get_info(&self, group_id: &str, classifier_id: &str) -> Result<ClassifierInfo, DataError> {
        let path = self.classifier_dir(group_id, classifier_id)?.join(INFO_FILE);
        read_validated(&path, &CLASSIFIER_INFO).await
    }

    pub async fn set_info(
        &self,
        group_id: &str,
        classifier_id: &str,
        info: &ClassifierInfo,
    ) -> Result<(), DataError> {
        let path = self.classifier_dir(group_id, classifier_id)?.join(INFO_FILE);
        write_json(&path, info).await
    }

    pub async fn get_readme(&self, group_id: &str, classifier_id: &str) -> Result<String, DataError> {
        read_text(&self.classifier_dir(group_id, classifier_id)?.join(README_FILE)).await
    }

    pub async fn set_readme(&self, group_id: &str, classifier_id: &str, readme: &str) -> Result<(), DataError> {
        write_text(&self.classifier_dir(group_id, classifier_id)?.join(README_FILE), readme).await
    }

    /// Create a classifier inside an existing group
    pub async fn create(
        &self,
        group_id: &str,
        classifier_id: &str,
        name: &str,
        description: &str,
    ) -> Result<ClassifierInfo, DataError> {
        let path = self.classifier_dir(group_id, classifier_id)?;
        validate_name(name)?;
        if !tokio::fs::try_exists(self.dir.group_dir(group_id)).await.unwrap_or(false) {
            return Err(DataError::NotFound(group_id.to_string()));
        }

        let info = ClassifierInfo {
            name: name.to_string(),
            description: description.to_string(),
            color: random_color(),
            sort: 0,
            filter_classifiers: Vec::new(),
            visibility: Visibility::Visible,
            associations: BTreeMap::new(),
            extras: Map::new(),
        };
        create_populated_dir(&path, classifier_id, || async {
            self.set_info(group_id, classifier_id, &info).await?;
            self.set_readme(group_id, classifier_id, &seed_readme(name, description)).await
        })
        .await?;

        info!("Created classifier '{}/{}'", group_id, classifier_id);
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GroupStore;
    use crate::testing::TestContext;
    use serde_json::json;

    #[tokio::test]
    async fn reads_defaults_for_sparse_info() {
        let ctx = TestContext::initialized().await;
        let dir = ctx.data_path().join("tags").join("languages");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(INFO_FILE),
            r##"{ "name": "Languages", "description": "", "color": "#00ff00" }"##,
        )
        .unwrap();

        let info = ClassifierStore::new(ctx.data_dir()).get_info("tags", "languages").await.unwrap();
        assert_eq!(info.sort, 0);
        assert_eq!(info.visibility, Visibility::Visible);
        assert!(info.associations.is_empty());
        assert!(info.extras.is_empty());
    }

    #[tokio::test]
    async fn create_then_update_round_trips() {
        let ctx = TestContext::initialized().await;
        GroupStore::new(ctx.data_dir()).create("tags", "Tags", "").await.unwrap();
        let classifiers = ClassifierStore::new(ctx.data_dir());

        classifiers.create("tags", "languages", "Languages", "Things I speak").await.unwrap();
        assert_eq!(
            classifiers.get_readme("tags", "languages").await.unwrap(),
            "# Languages\n\nThings I speak\n"
        );
        assert_eq!(classifiers.list("tags").await.unwrap(), vec!["languages".to_string()]);

        let updated: ClassifierInfo = CLASSIFIER_INFO
            .parse(&json!({
                "name": "Languages",
                "description": "Things I speak",
                "color": "#112233",
                "sort": 5,
                "visibility": "unlisted",
                "associations": { "projects": { "title": "Used in", "display": "card", "reverseLookup": true } },
                "extras": { "icon": "code" }
            }))
            .unwrap();
        classifiers.set_info("tags", "languages", &updated).await.unwrap();
        assert_eq!(classifiers.get_info("tags", "languages").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn create_requires_existing_group() {
        let ctx = TestContext::initialized().await;
        let err = ClassifierStore::new(ctx.data_dir())
            .create("missing", "languages", "Languages", "")
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }
}
