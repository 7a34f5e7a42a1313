//! Scene state driven by the REPL: placed tokens, selection and targets.
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use anim_core::{EntityId, PositionedEntity, TargetingContext};

/// Tokens on the map and who is selected, targeted or last acted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub tokens: Vec<PositionedEntity>,
    #[serde(default)]
    pub last_actor: Option<EntityId>,
    #[serde(default)]
    pub selected: Vec<EntityId>,
    #[serde(default)]
    pub targeted: Vec<EntityId>,
}

impl Scene {
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read scene file: {}", path.display()))?;
        let scene: Scene = serde_json::from_str(&text)
            .with_context(|| format!("Invalid scene file: {}", path.display()))?;
        scene.validate()?;
        Ok(scene)
    }

    fn validate(&self) -> Result<()> {
        for id in self
            .last_actor
            .iter()
            .chain(&self.selected)
            .chain(&self.targeted)
        {
            if self.token(*id).is_none() {
                bail!("scene references unknown token {}", id.0);
            }
        }
        Ok(())
    }

    pub fn token(&self, id: EntityId) -> Option<&PositionedEntity> {
        self.tokens.iter().find(|token| token.id == id)
    }

    /// Resolves ids to tokens, failing on the first unknown id.
    pub fn lookup(&self, ids: &[EntityId]) -> Result<Vec<PositionedEntity>> {
        ids.iter()
            .map(|id| {
                self.token(*id)
                    .cloned()
                    .with_context(|| format!("no token with id {}", id.0))
            })
            .collect()
    }

    pub fn select(&mut self, ids: Vec<EntityId>) -> Result<()> {
        self.lookup(&ids)?;
        self.selected = ids;
        Ok(())
    }

    pub fn target(&mut self, ids: Vec<EntityId>) -> Result<()> {
        self.lookup(&ids)?;
        self.targeted = ids;
        Ok(())
    }

    pub fn set_actor(&mut self, id: Option<EntityId>) -> Result<()> {
        if let Some(id) = id {
            self.lookup(&[id])?;
        }
        self.last_actor = id;
        Ok(())
    }

    /// Snapshot handed to the engine for one command.
    pub fn targeting_context(&self, privileged: bool) -> TargetingContext {
        let pick = |ids: &[EntityId]| -> Vec<PositionedEntity> {
            ids.iter().filter_map(|id| self.token(*id).cloned()).collect()
        };
        TargetingContext {
            last_actor: self.last_actor.and_then(|id| self.token(id).cloned()),
            selection: pick(&self.selected),
            targets: pick(&self.targeted),
            privileged,
        }
    }
}
