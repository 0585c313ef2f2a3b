use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::models::Category;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSettings {
    /// Weekly training target in hours; windows other than a week scale it.
    pub weekly_goal_hours: f64,
    /// Which categories count toward the goal. Match play is excluded by
    /// default so the target tracks deliberate practice.
    pub goal_categories: Vec<Category>,
}

impl Default for GoalSettings {
    fn default() -> Self {
        Self {
            weekly_goal_hours: 6.0,
            goal_categories: vec![Category::SelfTraining, Category::ClubTraining],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserSettings {
    goals: GoalSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn goals(&self) -> GoalSettings {
        self.data.read().unwrap().goals.clone()
    }

    pub fn update_goals(&self, goals: GoalSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            guard.goals = goals;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
