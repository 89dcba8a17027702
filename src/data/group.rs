//! Access to group data: `<group>/info.json` and `<group>/README.md`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::dir::{INFO_FILE, README_FILE};
use super::slug::{validate_name, validate_slug};
use super::{
    create_populated_dir, random_color, read_text, read_validated, seed_readme, write_json,
    write_text, DataDirectory, DataError,
};
use crate::schema::GROUP_INFO;

/// How associated items are displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssociationDisplay {
    Chip,
    Card,
}

/// How to display associations from one group's items to another group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAssociation {
    /// ID of the group to show associations for
    pub group: String,
    /// Title shown above the associated items
    pub title: String,
    pub display: AssociationDisplay,
}

/// Brief info about a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBrief {
    pub name: String,
    pub description: String,
    pub color: String,
}

/// Full contents of a group's `info.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub name: String,
    pub description: String,
    pub color: String,
    /// Groups whose items are used to filter this group
    pub filter_groups: Vec<String>,
    pub associations: Vec<GroupAssociation>,
    /// Item IDs listed on the group's page
    pub listed_items: Vec<String>,
    /// Keys this server does not interpret, kept as written
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<GroupInfo> for GroupBrief {
    fn from(info: GroupInfo) -> Self {
        Self {
            name: info.name,
            description: info.description,
            color: info.color,
        }
    }
}

/// Read/write access to the groups inside a data directory
#[derive(Debug, Clone)]
pub struct GroupStore {
    dir: DataDirectory,
}

impl GroupStore {
    pub fn new(dir: DataDirectory) -> Self {
        Self { dir }
    }

    /// IDs of every group, including groups not shown in the main list
    pub async fn list(&self) -> Result<Vec<String>, DataError> {
        self.dir.list_group_ids().await
    }

    pub async fn get_info(&self, group_id: &str) -> Result<GroupInfo, DataError> {
        validate_slug(group_id)?;
        let path = self.dir.group_dir(group_id).join(INFO_FILE);
        read_validated(&path, &GROUP_INFO).await
    }

    pub async fn get_brief(&self, group_id: &str) -> Result<GroupBrief, DataError> {
        self.get_info(group_id).await.map(GroupBrief::from)
    }

    pub async fn set_info(&self, group_id: &str, info: &GroupInfo) -> Result<(), DataError> {
        validate_slug(group_id)?;
        write_json(&self.dir.group_dir(group_id).join(INFO_FILE), info).await
    }

    pub async fn get_readme(&self, group_id: &str) -> Result<String, DataError> {
        validate_slug(group_id)?;
        read_text(&self.dir.group_dir(group_id).join(README_FILE)).await
    }

    pub async fn set_readme(&self, group_id: &str, readme: &str) -> Result<(), DataError> {
        validate_slug(group_id)?;
        write_text(&self.dir.group_dir(group_id).join(README_FILE), readme).await
    }

    /// Create a new group, seeding its `info.json` and `README.md`
    pub async fn create(
        &self,
        group_id: &str,
        name: &str,
        description: &str,
    ) -> Result<GroupInfo, DataError> {
        validate_slug(group_id)?;
        validate_name(name)?;
        if !self.dir.is_initialized().await {
            return Err(DataError::NotInitialized);
        }

        let info = GroupInfo {
            name: name.to_string(),
            description: description.to_string(),
            color: random_color(),
            filter_groups: Vec::new(),
            associations: Vec::new(),
            listed_items: Vec::new(),
            extra: Map::new(),
        };
        create_populated_dir(&self.dir.group_dir(group_id), group_id, || async {
            self.set_info(group_id, &info).await?;
            self.set_readme(group_id, &seed_readme(name, description)).await
        })
        .await?;

        info!("Created group '{}'", group_id);
        Ok(info)
    }
}
